//! Resolution chain behavior: identifiers, properties, methods, writes

mod common;

use std::sync::Arc;

use common::{eval_err_in, eval_in, standard_context};
use pretty_assertions::assert_eq;
use serde_json::json;
use uel::{
    CompositeResolver, ElContext, ElResolver, ElValue, EvalError, ExpectedType,
    ExpressionFactory, ReadOnlyResolver, Resolution, RootResolver,
};

fn user_context() -> (Arc<RootResolver>, ElContext) {
    let (root, ctx) = standard_context();
    root.define(
        "user",
        ElValue::from(json!({
            "name": "ada",
            "age": 36,
            "roles": ["admin", "dev"],
        })),
    );
    (root, ctx)
}

#[test]
fn root_identifiers_resolve() {
    let (root, ctx) = standard_context();
    root.define("greeting", "hello");
    assert_eq!(eval_in(&ctx, "${greeting}"), ElValue::from("hello"));
}

#[test]
fn unresolved_identifier_is_an_error() {
    let (_root, ctx) = standard_context();
    assert_eq!(
        eval_err_in(&ctx, "${nobody}"),
        EvalError::UnresolvedIdentifier {
            name: "nobody".to_string()
        }
    );
}

#[test]
fn object_navigation() {
    let (_root, ctx) = user_context();
    assert_eq!(eval_in(&ctx, "${user.name}"), ElValue::from("ada"));
    assert_eq!(eval_in(&ctx, "${user['name']}"), ElValue::from("ada"));
    assert_eq!(eval_in(&ctx, "${user.age + 1}"), ElValue::Long(37));
}

#[test]
fn array_indexing() {
    let (_root, ctx) = user_context();
    assert_eq!(eval_in(&ctx, "${user.roles[0]}"), ElValue::from("admin"));
    assert_eq!(eval_in(&ctx, "${user.roles[1]}"), ElValue::from("dev"));
    // out of bounds reads resolve to null
    assert_eq!(eval_in(&ctx, "${user.roles[5]}"), ElValue::Null);
}

#[test]
fn missing_keys_and_null_bases_resolve_to_null() {
    let (_root, ctx) = user_context();
    assert_eq!(eval_in(&ctx, "${user.missing}"), ElValue::Null);
    assert_eq!(eval_in(&ctx, "${user.missing.deeper}"), ElValue::Null);
    assert_eq!(eval_in(&ctx, "${user.missing.size()}"), ElValue::Null);
}

#[test]
fn collection_methods() {
    let (_root, ctx) = user_context();
    assert_eq!(eval_in(&ctx, "${user.roles.size()}"), ElValue::Long(2));
    assert_eq!(
        eval_in(&ctx, "${user.roles.isEmpty()}"),
        ElValue::Bool(false)
    );
    assert_eq!(
        eval_in(&ctx, "${user.roles.contains('dev')}"),
        ElValue::Bool(true)
    );
    assert_eq!(eval_in(&ctx, "${user.size()}"), ElValue::Long(3));
    assert_eq!(
        eval_in(&ctx, "${user.containsKey('name')}"),
        ElValue::Bool(true)
    );
}

#[test]
fn string_methods() {
    let (_root, ctx) = user_context();
    assert_eq!(
        eval_in(&ctx, "${user.name.toUpperCase()}"),
        ElValue::from("ADA")
    );
    assert_eq!(eval_in(&ctx, "${user.name.length()}"), ElValue::Long(3));
    assert_eq!(eval_in(&ctx, "${' x '.trim()}"), ElValue::from("x"));
    assert_eq!(
        eval_in(&ctx, "${'hello'.substring(1, 3)}"),
        ElValue::from("el")
    );
    assert_eq!(eval_in(&ctx, "${'hello'.indexOf('ll')}"), ElValue::Long(2));
    assert_eq!(eval_in(&ctx, "${'hello'.indexOf('z')}"), ElValue::Long(-1));
    assert_eq!(
        eval_in(&ctx, "${'hello'.replace('l', 'L')}"),
        ElValue::from("heLLo")
    );
    assert_eq!(eval_in(&ctx, "${'a,b,c'.split(',')[1]}"), ElValue::from("b"));
    assert_eq!(
        eval_in(&ctx, "${'ada'.startsWith('ad') && 'ada'.endsWith('a')}"),
        ElValue::Bool(true)
    );
    assert_eq!(eval_in(&ctx, "${'hello'.charAt(1)}"), ElValue::from("e"));
    assert_eq!(
        eval_in(&ctx, "${'he'.concat('llo')}"),
        ElValue::from("hello")
    );
}

#[test]
fn unresolved_method_names_the_base_type() {
    let (_root, ctx) = user_context();
    assert_eq!(
        eval_err_in(&ctx, "${user.name.nosuch()}"),
        EvalError::UnresolvedMethod {
            method: "nosuch".to_string(),
            base_type: "string"
        }
    );
}

#[test]
fn writes_land_in_the_root_namespace() {
    let (root, ctx) = standard_context();
    let factory = ExpressionFactory::default();
    let expr = factory
        .value_expression(&ctx, "${counter}", ExpectedType::Any)
        .unwrap();

    expr.set_value(&ctx, ElValue::Long(5)).unwrap();
    assert_eq!(root.lookup("counter"), Some(ElValue::Long(5)));
    assert_eq!(eval_in(&ctx, "${counter + 1}"), ElValue::Long(6));
    assert_eq!(expr.is_read_only(&ctx), Ok(false));
}

#[test]
fn data_values_are_read_only() {
    let (_root, ctx) = user_context();
    let factory = ExpressionFactory::default();
    let expr = factory
        .value_expression(&ctx, "${user.name}", ExpectedType::Any)
        .unwrap();

    assert_eq!(expr.is_read_only(&ctx), Ok(true));
    assert!(matches!(
        expr.set_value(&ctx, ElValue::from("bob")),
        Err(EvalError::NotWritable { .. })
    ));
}

#[test]
fn literals_are_not_assignable() {
    let (_root, ctx) = standard_context();
    let factory = ExpressionFactory::default();
    let expr = factory
        .value_expression(&ctx, "${1 + 2}", ExpectedType::Any)
        .unwrap();
    assert_eq!(expr.is_read_only(&ctx), Ok(true));
    assert!(matches!(
        expr.set_value(&ctx, ElValue::Long(0)),
        Err(EvalError::NotWritable { .. })
    ));
}

struct ClockResolver;

impl ElResolver for ClockResolver {
    fn get(&self, _ctx: &ElContext, base: Option<&ElValue>, property: &ElValue) -> Resolution {
        match (base, property) {
            (None, ElValue::Str(name)) if name.as_ref() == "now" => {
                Resolution::Resolved(ElValue::Long(1_234_567_890))
            }
            _ => Resolution::NotResolved,
        }
    }
}

#[test]
fn custom_resolvers_join_the_chain() {
    let root = Arc::new(RootResolver::new());
    let chain = CompositeResolver::standard(root).with(Arc::new(ClockResolver));
    let ctx = ElContext::new(Arc::new(chain));
    assert_eq!(eval_in(&ctx, "${now}"), ElValue::Long(1_234_567_890));
}

#[test]
fn earlier_resolvers_shadow_later_ones() {
    let root = Arc::new(RootResolver::new().with_value("now", 1i64));
    let chain = CompositeResolver::standard(root).with(Arc::new(ClockResolver));
    let ctx = ElContext::new(Arc::new(chain));
    assert_eq!(eval_in(&ctx, "${now}"), ElValue::Long(1));
}

#[test]
fn read_only_wrapper_rejects_writes() {
    let root = Arc::new(RootResolver::new().with_value("x", 10i64));
    let chain = CompositeResolver::new().with(Arc::new(ReadOnlyResolver::new(root)));
    let ctx = ElContext::new(Arc::new(chain));
    let factory = ExpressionFactory::default();
    let expr = factory
        .value_expression(&ctx, "${x}", ExpectedType::Any)
        .unwrap();

    assert_eq!(expr.value(&ctx), Ok(ElValue::Long(10)));
    assert_eq!(expr.is_read_only(&ctx), Ok(true));
    assert!(matches!(
        expr.set_value(&ctx, ElValue::Long(0)),
        Err(EvalError::NotWritable { .. })
    ));
}
