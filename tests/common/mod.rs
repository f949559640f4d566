#![allow(dead_code)]

use std::sync::Arc;

use uel::{
    CompositeResolver, ElContext, ElValue, EvalError, ExpectedType, ExpressionFactory,
    RootResolver,
};

/// A context over the standard resolver chain, returning the root
/// namespace so tests can seed and inspect it
pub fn standard_context() -> (Arc<RootResolver>, ElContext) {
    let root = Arc::new(RootResolver::new());
    let ctx = ElContext::new(Arc::new(CompositeResolver::standard(root.clone())));
    (root, ctx)
}

pub fn eval_in(ctx: &ElContext, source: &str) -> ElValue {
    ExpressionFactory::default()
        .value_expression(ctx, source, ExpectedType::Any)
        .unwrap()
        .value(ctx)
        .unwrap()
}

pub fn eval(source: &str) -> ElValue {
    let (_root, ctx) = standard_context();
    eval_in(&ctx, source)
}

pub fn eval_err_in(ctx: &ElContext, source: &str) -> EvalError {
    ExpressionFactory::default()
        .value_expression(ctx, source, ExpectedType::Any)
        .unwrap()
        .value(ctx)
        .unwrap_err()
}

pub fn eval_err(source: &str) -> EvalError {
    let (_root, ctx) = standard_context();
    eval_err_in(&ctx, source)
}
