//! Value and method expressions
//!
//! A [`ValueExpression`] pairs a shared tree with the bindings produced
//! against one context's mappers; evaluating it against a (possibly
//! different) context resolves identifiers and properties there. Two
//! expressions are equal when their trees are structurally identical and
//! their bindings match, regardless of source spelling.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::context::ElContext;
use crate::error::{ElError, EvalResult};
use crate::eval::Evaluator;
use crate::factory::Features;
use crate::model::{ElValue, ExpectedType, coerce};
use crate::tree::{Bindings, Tree};

/// A bound, reusable value expression
#[derive(Debug, Clone)]
pub struct ValueExpression {
    tree: Arc<Tree>,
    bindings: Bindings,
    source: String,
    expected: ExpectedType,
    features: Features,
}

impl ValueExpression {
    pub(crate) fn new(
        tree: Arc<Tree>,
        bindings: Bindings,
        source: String,
        expected: ExpectedType,
        features: Features,
    ) -> Self {
        Self {
            tree,
            bindings,
            source,
            expected,
            features,
        }
    }

    /// Evaluate and coerce the result to the expected type
    pub fn value(&self, ctx: &ElContext) -> EvalResult<ElValue> {
        let mut evaluator = Evaluator::new(ctx, &self.bindings, self.features.null_properties);
        let value = evaluator.eval(self.tree.root())?;
        coerce::apply(value, self.expected)
    }

    /// Write a value through the expression's final property access
    pub fn set_value(&self, ctx: &ElContext, value: ElValue) -> EvalResult<()> {
        let mut evaluator = Evaluator::new(ctx, &self.bindings, self.features.null_properties);
        evaluator.set(self.tree.root(), value)
    }

    /// Whether writing through this expression would fail
    pub fn is_read_only(&self, ctx: &ElContext) -> EvalResult<bool> {
        let mut evaluator = Evaluator::new(ctx, &self.bindings, self.features.null_properties);
        evaluator.read_only(self.tree.root())
    }

    /// The original source string
    pub fn expression_string(&self) -> &str {
        &self.source
    }

    /// Whether the source used `#{...}` delimiters
    pub fn is_deferred(&self) -> bool {
        self.tree.is_deferred()
    }

    /// The configured result coercion
    pub fn expected_type(&self) -> ExpectedType {
        self.expected
    }

    fn canonical(&self) -> String {
        self.tree.root().to_string()
    }
}

impl PartialEq for ValueExpression {
    /// Structural equality: canonical tree rendering plus bindings plus
    /// expected type; source spelling differences do not matter
    fn eq(&self, other: &Self) -> bool {
        self.expected == other.expected
            && self.canonical() == other.canonical()
            && self.bindings == other.bindings
    }
}

impl Hash for ValueExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
        self.expected.hash(state);
    }
}

impl fmt::Display for ValueExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A bound method expression
///
/// The source must be a single eval expression whose body is an
/// identifier, property access, or method invocation.
#[derive(Debug, Clone)]
pub struct MethodExpression {
    tree: Arc<Tree>,
    bindings: Bindings,
    source: String,
    features: Features,
}

fn invocable(node: &crate::ast::Node) -> bool {
    use crate::ast::Node;
    match node {
        Node::Nested(inner) => invocable(inner),
        Node::Identifier { .. } | Node::Dot { .. } | Node::Bracket { .. } | Node::Method { .. } => {
            true
        }
        _ => false,
    }
}

impl MethodExpression {
    pub(crate) fn new(
        tree: Arc<Tree>,
        bindings: Bindings,
        source: String,
        features: Features,
    ) -> Result<Self, ElError> {
        let valid = match tree.root() {
            crate::ast::Node::Eval { expr, .. } => invocable(expr),
            _ => false,
        };
        if !valid {
            return Err(ElError::Expression {
                message: format!(
                    "'{source}' is not a method expression; expected a single eval expression \
                     over an identifier, property, or method"
                ),
            });
        }
        Ok(Self {
            tree,
            bindings,
            source,
            features,
        })
    }

    /// Invoke the target method. Arguments parsed in the source win;
    /// an argument-less target is invoked with the supplied arguments.
    pub fn invoke(&self, ctx: &ElContext, args: &[ElValue]) -> EvalResult<ElValue> {
        let mut evaluator = Evaluator::new(ctx, &self.bindings, self.features.null_properties);
        evaluator.invoke_target(self.tree.root(), args)
    }

    /// The original source string
    pub fn expression_string(&self) -> &str {
        &self.source
    }

    /// Whether the source used `#{...}` delimiters
    pub fn is_deferred(&self) -> bool {
        self.tree.is_deferred()
    }

    fn canonical(&self) -> String {
        self.tree.root().to_string()
    }
}

impl PartialEq for MethodExpression {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical() && self.bindings == other.bindings
    }
}

impl Hash for MethodExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for MethodExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
