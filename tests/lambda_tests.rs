//! Lambda literals, invocation, capture, and interaction with functions

mod common;

use std::sync::Arc;

use common::{eval, eval_in, standard_context};
use pretty_assertions::assert_eq;
use uel::{
    ElFunction, ElValue, EvalError, ExpectedType, ExpressionFactory, ObjectMap, ParamKind,
};

#[test]
fn immediate_invocation() {
    assert_eq!(eval("${(x -> x * 2)(21)}"), ElValue::Long(42));
    assert_eq!(eval("${((a, b) -> a + b)(1, 2)}"), ElValue::Long(3));
    assert_eq!(eval("${(() -> 7)()}"), ElValue::Long(7));
}

#[test]
fn curried_lambdas_capture_outer_parameters() {
    assert_eq!(eval("${(x -> y -> x + y)(1)(2)}"), ElValue::Long(3));
}

#[test]
fn inner_parameters_shadow_outer_ones() {
    assert_eq!(eval("${(x -> (x -> x + 1)(10) + x)(1)}"), ElValue::Long(12));
}

#[test]
fn missing_arguments_bind_null_and_extras_are_ignored() {
    assert_eq!(eval("${(x -> x == null)()}"), ElValue::Bool(true));
    assert_eq!(eval("${(x -> x)(1, 2, 3)}"), ElValue::Long(1));
}

#[test]
fn lambdas_are_values() {
    let value = eval("${x -> x * 2}");
    assert!(matches!(value, ElValue::Lambda(_)));
    assert_eq!(value.to_string(), "<lambda>");
}

#[test]
fn lambda_valued_identifiers_are_callable() {
    let (root, ctx) = standard_context();
    let twice = eval_in(&ctx, "${x -> x * 2}");
    root.define("twice", twice);
    assert_eq!(eval_in(&ctx, "${twice(5)}"), ElValue::Long(10));
}

#[test]
fn lambda_valued_variables_are_callable() {
    let (_root, mut ctx) = standard_context();
    let factory = ExpressionFactory::default();
    let double = factory
        .value_expression(&ctx, "${x -> x * 2}", ExpectedType::Any)
        .unwrap();
    ctx.set_variable("double", double);
    assert_eq!(eval_in(&ctx, "${double(4)}"), ElValue::Long(8));
    assert!(matches!(eval_in(&ctx, "${double}"), ElValue::Lambda(_)));
}

#[test]
fn lambda_valued_properties_support_method_syntax() {
    let (root, ctx) = standard_context();
    let inc = eval_in(&ctx, "${x -> x + 1}");
    let mut obj = ObjectMap::new();
    obj.insert("inc".to_string(), inc);
    root.define("obj", ElValue::Object(obj));
    assert_eq!(eval_in(&ctx, "${obj.inc(41)}"), ElValue::Long(42));
}

#[test]
fn lambda_arguments_skip_parameter_coercion() {
    let (_root, mut ctx) = standard_context();
    ctx.functions_mut().register(ElFunction::new(
        "kind",
        vec![ParamKind::Str],
        Arc::new(|args| Ok(ElValue::str(args[0].type_name()))),
    ));
    assert_eq!(eval_in(&ctx, "${kind(x -> x)}"), ElValue::from("lambda"));
    assert_eq!(eval_in(&ctx, "${kind(1)}"), ElValue::from("string"));
}

#[test]
fn calling_a_non_lambda_fails() {
    let (root, ctx) = standard_context();
    root.define("n", 5i64);
    assert_eq!(
        common::eval_err_in(&ctx, "${n(1)}"),
        EvalError::NotInvocable { target: "long" }
    );
    assert!(matches!(
        common::eval_err("${(1 + 2)(3)}"),
        EvalError::NotInvocable { .. }
    ));
}

#[test]
fn unresolvable_call_names_the_function() {
    assert_eq!(
        common::eval_err("${nothing(1)}"),
        EvalError::Function {
            name: "nothing".to_string(),
            message: "cannot be resolved to a function or lambda".to_string()
        }
    );
}
