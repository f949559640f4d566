//! Command line front end: evaluate or inspect EL expressions

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use clap::{Parser, Subcommand};

use uel::{
    CompositeResolver, ElContext, ElValue, ExpectedType, ExpressionFactory, RootResolver,
    TreeBuilder,
};

#[derive(Parser)]
#[command(name = "uel", version, about = "Evaluate Unified EL expressions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an expression against an optional JSON context
    Eval {
        /// The composite expression, e.g. 'Hello ${user.name}!'
        expression: String,
        /// JSON file whose top-level keys become identifiers
        #[arg(long, value_name = "FILE")]
        context: Option<PathBuf>,
        /// Extra identifier, as NAME=JSON (bare text for strings)
        #[arg(long = "var", value_name = "NAME=JSON")]
        vars: Vec<String>,
        /// Print the string coercion instead of JSON
        #[arg(long)]
        raw: bool,
    },
    /// Parse an expression and print its structure
    Parse {
        /// The composite expression
        expression: String,
        /// Dump the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    human_panic::setup_panic!();
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Eval {
            expression,
            context,
            vars,
            raw,
        } => eval(&expression, context.as_deref(), &vars, raw),
        Command::Parse { expression, json } => parse(&expression, json),
    }
}

fn eval(
    expression: &str,
    context: Option<&std::path::Path>,
    vars: &[String],
    raw: bool,
) -> anyhow::Result<()> {
    let root = RootResolver::new();
    if let Some(path) = context {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading context file {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing context file {}", path.display()))?;
        let serde_json::Value::Object(map) = value else {
            return Err(anyhow!("context file must hold a JSON object"));
        };
        for (name, value) in map {
            root.define(name, ElValue::from(value));
        }
    }
    for var in vars {
        let (name, value) = var
            .split_once('=')
            .ok_or_else(|| anyhow!("--var expects NAME=JSON, got '{var}'"))?;
        let parsed = serde_json::from_str::<serde_json::Value>(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        root.define(name, ElValue::from(parsed));
    }

    let ctx = ElContext::new(Arc::new(CompositeResolver::standard(Arc::new(root))));
    let factory = ExpressionFactory::default();
    let expr = factory.value_expression(&ctx, expression, ExpectedType::Any)?;
    let value = expr.value(&ctx)?;
    if raw {
        println!("{value}");
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::from(value))?
        );
    }
    Ok(())
}

fn parse(expression: &str, json: bool) -> anyhow::Result<()> {
    let tree = uel::Builder::default().build(expression)?;
    if json {
        println!("{}", serde_json::to_string_pretty(tree.root())?);
        return Ok(());
    }
    println!("{}", tree.root());
    if !tree.identifiers().is_empty() {
        let names: Vec<&str> = tree.identifiers().iter().map(|i| i.name.as_str()).collect();
        println!("identifiers: {}", names.join(", "));
    }
    if !tree.functions().is_empty() {
        let names: Vec<String> = tree
            .functions()
            .iter()
            .map(|f| format!("{}/{}", f.name, f.arg_count))
            .collect();
        println!("functions: {}", names.join(", "));
    }
    if tree.is_deferred() {
        println!("deferred");
    }
    Ok(())
}
