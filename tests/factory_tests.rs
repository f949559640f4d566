//! Factory behavior: caching, structural equality, expected types,
//! method expressions, variables

mod common;

use std::sync::Arc;

use common::{eval_in, standard_context};
use pretty_assertions::assert_eq;
use serde_json::json;
use uel::{
    BindError, ElError, ElFunction, ElValue, ExpectedType, ExpressionFactory, Features,
    ParamKind,
};

#[test]
fn structural_equality_ignores_spelling() {
    let (_root, ctx) = standard_context();
    let factory = ExpressionFactory::default();

    let a = factory
        .value_expression(&ctx, "${1+2}", ExpectedType::Any)
        .unwrap();
    let b = factory
        .value_expression(&ctx, "${1 + 2}", ExpectedType::Any)
        .unwrap();
    let c = factory
        .value_expression(&ctx, "${2 + 1}", ExpectedType::Any)
        .unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn equality_includes_the_expected_type() {
    let (_root, ctx) = standard_context();
    let factory = ExpressionFactory::default();
    let any = factory
        .value_expression(&ctx, "${x}", ExpectedType::Any)
        .unwrap();
    let string = factory
        .value_expression(&ctx, "${x}", ExpectedType::Str)
        .unwrap();
    assert_ne!(any, string);
}

#[test]
fn builtin_bindings_compare_equal_across_contexts() {
    let (_r1, ctx1) = standard_context();
    let (_r2, ctx2) = standard_context();
    let factory = ExpressionFactory::default();
    let a = factory
        .value_expression(&ctx1, "${min(1, 2)}", ExpectedType::Any)
        .unwrap();
    let b = factory
        .value_expression(&ctx2, "${min(1, 2)}", ExpectedType::Any)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn separately_registered_functions_do_not_compare_equal() {
    let make_ctx = || {
        let (_root, mut ctx) = standard_context();
        ctx.functions_mut().register(ElFunction::new(
            "zero",
            vec![],
            Arc::new(|_| Ok(ElValue::Long(0))),
        ));
        ctx
    };
    let factory = ExpressionFactory::default();
    let a = factory
        .value_expression(&make_ctx(), "${zero()}", ExpectedType::Any)
        .unwrap();
    let b = factory
        .value_expression(&make_ctx(), "${zero()}", ExpectedType::Any)
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn the_tree_cache_is_shared_across_bindings() {
    let (root, ctx) = standard_context();
    let factory = ExpressionFactory::default();

    root.define("x", 1i64);
    let first = factory
        .value_expression(&ctx, "${x + 1}", ExpectedType::Any)
        .unwrap();
    assert_eq!(first.value(&ctx), Ok(ElValue::Long(2)));

    // same source re-binds against the changed context state
    root.define("x", 10i64);
    let second = factory
        .value_expression(&ctx, "${x + 1}", ExpectedType::Any)
        .unwrap();
    assert_eq!(second.value(&ctx), Ok(ElValue::Long(11)));
    assert_eq!(first, second);
}

#[test]
fn deferred_flag_is_surfaced() {
    let (_root, ctx) = standard_context();
    let factory = ExpressionFactory::default();
    assert!(
        factory
            .value_expression(&ctx, "#{1}", ExpectedType::Any)
            .unwrap()
            .is_deferred()
    );
    assert!(
        !factory
            .value_expression(&ctx, "${1}", ExpectedType::Any)
            .unwrap()
            .is_deferred()
    );
}

#[test]
fn unknown_prefixed_functions_fail_as_bind_errors() {
    let (_root, ctx) = standard_context();
    let factory = ExpressionFactory::default();
    let result = factory.value_expression(&ctx, "${ns:missing(1)}", ExpectedType::Any);
    assert_eq!(
        result.err(),
        Some(ElError::Bind(BindError::UnknownFunction {
            name: "ns:missing".to_string()
        }))
    );
}

#[test]
fn custom_functions_coerce_declared_parameters() {
    let (_root, mut ctx) = standard_context();
    ctx.functions_mut().register(ElFunction::new(
        "twice",
        vec![ParamKind::Long],
        Arc::new(|args| match &args[0] {
            ElValue::Long(n) => Ok(ElValue::Long(n * 2)),
            other => Err(uel::EvalError::Function {
                name: "twice".to_string(),
                message: format!("unexpected {}", other.type_name()),
            }),
        }),
    ));
    assert_eq!(eval_in(&ctx, "${twice(21)}"), ElValue::Long(42));
    assert_eq!(eval_in(&ctx, "${twice('21')}"), ElValue::Long(42));
}

#[test]
fn variables_bind_before_the_resolver_chain() {
    let (root, mut ctx) = standard_context();
    let factory = ExpressionFactory::default();

    root.define("who", "resolver");
    let variable = factory
        .value_expression(&ctx, "${'variable'}", ExpectedType::Any)
        .unwrap();
    ctx.set_variable("who", variable);

    assert_eq!(eval_in(&ctx, "${who}"), ElValue::from("variable"));
}

#[test]
fn method_expressions_invoke_their_target() {
    let (root, ctx) = standard_context();
    root.define("user", ElValue::from(json!({"name": "ada"})));
    let factory = ExpressionFactory::default();

    let upper = factory
        .method_expression(&ctx, "${user.name.toUpperCase}")
        .unwrap();
    assert_eq!(upper.invoke(&ctx, &[]), Ok(ElValue::from("ADA")));
}

#[test]
fn parsed_arguments_win_over_supplied_ones() {
    let (_root, ctx) = standard_context();
    let factory = ExpressionFactory::default();

    let parsed = factory
        .method_expression(&ctx, "${'abc'.substring(0, 2)}")
        .unwrap();
    assert_eq!(
        parsed.invoke(&ctx, &[ElValue::Long(1), ElValue::Long(3)]),
        Ok(ElValue::from("ab"))
    );

    let unparsed = factory
        .method_expression(&ctx, "${'abc'.substring}")
        .unwrap();
    assert_eq!(
        unparsed.invoke(&ctx, &[ElValue::Long(1), ElValue::Long(3)]),
        Ok(ElValue::from("bc"))
    );
}

#[test]
fn method_expressions_over_lambda_identifiers() {
    let (root, ctx) = standard_context();
    let double = eval_in(&ctx, "${x -> x * 2}");
    root.define("double", double);
    let factory = ExpressionFactory::default();

    let method = factory.method_expression(&ctx, "${double}").unwrap();
    assert_eq!(method.invoke(&ctx, &[ElValue::Long(4)]), Ok(ElValue::Long(8)));
}

#[test]
fn non_invocable_sources_are_rejected_at_construction() {
    let (_root, ctx) = standard_context();
    let factory = ExpressionFactory::default();
    assert!(matches!(
        factory.method_expression(&ctx, "${1 + 2}"),
        Err(ElError::Expression { .. })
    ));
    assert!(matches!(
        factory.method_expression(&ctx, "a${x}b"),
        Err(ElError::Expression { .. })
    ));
    assert!(matches!(
        factory.method_expression(&ctx, "plain text"),
        Err(ElError::Expression { .. })
    ));
}

#[test]
fn feature_defaults() {
    let features = Features::default();
    assert!(features.methods);
    assert!(features.varargs);
    assert!(!features.null_properties);
    assert_eq!(features.cache_size, 256);
}

#[test]
fn null_properties_feature_resolves_null_brackets() {
    let (root, ctx) = standard_context();
    root.define("data", ElValue::from(json!({"": "blank key"})));

    // default: a null bracket property short-circuits to null
    let default_factory = ExpressionFactory::default();
    let expr = default_factory
        .value_expression(&ctx, "${data[null]}", ExpectedType::Any)
        .unwrap();
    assert_eq!(expr.value(&ctx), Ok(ElValue::Null));

    // with the feature on, null coerces to the empty-string key
    let factory = ExpressionFactory::new(Features {
        null_properties: true,
        ..Features::default()
    });
    let expr = factory
        .value_expression(&ctx, "${data[null]}", ExpectedType::Any)
        .unwrap();
    assert_eq!(expr.value(&ctx), Ok(ElValue::from("blank key")));
}
