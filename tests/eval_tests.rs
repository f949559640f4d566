//! Operator and coercion semantics, end to end

mod common;

use common::{eval, eval_err};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uel::{ElValue, EvalError, ExpectedType, ExpressionFactory};

#[rstest]
#[case("${1 + 2}", ElValue::Long(3))]
#[case("${7 - 10}", ElValue::Long(-3))]
#[case("${6 * 7}", ElValue::Long(42))]
#[case("${10 % 3}", ElValue::Long(1))]
#[case("${-3}", ElValue::Long(-3))]
fn integer_arithmetic(#[case] source: &str, #[case] expected: ElValue) {
    assert_eq!(eval(source), expected);
}

#[rstest]
#[case("${1 + 2.5}", ElValue::Double(3.5))]
#[case("${'1.5' + 1}", ElValue::Double(2.5))]
#[case("${2.5 % 2}", ElValue::Double(0.5))]
fn double_promotion(#[case] source: &str, #[case] expected: ElValue) {
    assert_eq!(eval(source), expected);
}

#[test]
fn division_always_produces_doubles() {
    assert_eq!(eval("${10 / 4}"), ElValue::Double(2.5));
    assert_eq!(eval("${1 / 0}"), ElValue::Double(f64::INFINITY));
}

#[test]
fn numeric_strings_stay_integral() {
    assert_eq!(eval("${'10' + 5}"), ElValue::Long(15));
}

#[test]
fn null_arithmetic() {
    assert_eq!(eval("${null + null}"), ElValue::Long(0));
    assert_eq!(eval("${null + 1}"), ElValue::Long(1));
    assert_eq!(eval("${-null}"), ElValue::Long(0));
}

#[test]
fn long_arithmetic_wraps() {
    assert_eq!(
        eval("${9223372036854775807 + 1}"),
        ElValue::Long(i64::MIN)
    );
}

#[test]
fn integer_remainder_by_zero_fails() {
    assert_eq!(eval_err("${1 % 0}"), EvalError::DivisionByZero);
}

#[test]
fn word_addition_fails() {
    assert!(matches!(eval_err("${'a' + 1}"), EvalError::Coercion { .. }));
    assert!(matches!(
        eval_err("${true + 1}"),
        EvalError::Coercion { .. }
    ));
}

#[rstest]
#[case("${1 < 2}", true)]
#[case("${2 <= 2}", true)]
#[case("${'b' > 'a'}", true)]
#[case("${'10' > 9}", true)]
#[case("${null < 1}", false)]
#[case("${null <= null}", true)]
fn comparisons(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(eval(source), ElValue::Bool(expected));
}

#[rstest]
#[case("${1 == '1'}", true)]
#[case("${1.0 == 1}", true)]
#[case("${true == 'true'}", true)]
#[case("${null == null}", true)]
#[case("${null == 0}", false)]
#[case("${'a' != 'b'}", true)]
fn equality(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(eval(source), ElValue::Bool(expected));
}

#[test]
fn logic_short_circuits() {
    // the undefined identifier on the right is never evaluated
    assert_eq!(eval("${true || undefined}"), ElValue::Bool(true));
    assert_eq!(eval("${false && undefined}"), ElValue::Bool(false));
}

#[test]
fn ternary_evaluates_one_branch() {
    assert_eq!(eval("${1 < 2 ? 'yes' : 'no'}"), ElValue::from("yes"));
    assert_eq!(eval("${true ? 1 : undefined}"), ElValue::Long(1));
    assert_eq!(eval("${false ? undefined : 2}"), ElValue::Long(2));
}

#[rstest]
#[case("${empty null}", true)]
#[case("${empty ''}", true)]
#[case("${empty 'x'}", false)]
#[case("${not false}", true)]
#[case("${!('a' == 'a')}", false)]
fn unary_operators(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(eval(source), ElValue::Bool(expected));
}

#[test]
fn composites_concatenate_string_coercions() {
    assert_eq!(eval("a=${1}, b=${2 > 1}"), ElValue::from("a=1, b=true"));
    assert_eq!(eval("${null}!"), ElValue::from("!"));
}

#[test]
fn plain_text_passes_through() {
    assert_eq!(eval("hello world"), ElValue::from("hello world"));
    assert_eq!(eval(""), ElValue::from(""));
}

#[test]
fn expected_type_coerces_the_result() {
    let (_root, ctx) = common::standard_context();
    let factory = ExpressionFactory::default();

    let as_str = factory
        .value_expression(&ctx, "${1 + 1}", ExpectedType::Str)
        .unwrap();
    assert_eq!(as_str.value(&ctx), Ok(ElValue::from("2")));

    let as_long = factory
        .value_expression(&ctx, "${'42'}", ExpectedType::Long)
        .unwrap();
    assert_eq!(as_long.value(&ctx), Ok(ElValue::Long(42)));

    let as_bool = factory
        .value_expression(&ctx, "${'true'}", ExpectedType::Bool)
        .unwrap();
    assert_eq!(as_bool.value(&ctx), Ok(ElValue::Bool(true)));
}

#[test]
fn builtin_functions() {
    assert_eq!(eval("${min(3, 5)}"), ElValue::Long(3));
    assert_eq!(eval("${max(3, 5.5)}"), ElValue::Double(5.5));
    assert_eq!(eval("${abs(-4)}"), ElValue::Long(4));
    assert_eq!(eval("${floor(1.9)}"), ElValue::Double(1.0));
    assert_eq!(eval("${ceil(1.1)}"), ElValue::Double(2.0));
    assert_eq!(eval("${round(1.5)}"), ElValue::Double(2.0));
    assert_eq!(eval("${pow(2, 10)}"), ElValue::Double(1024.0));
    assert_eq!(eval("${concat('a', 1, 'b')}"), ElValue::from("a1b"));
    assert_eq!(eval("${join('-', 'x', 'y', 'z')}"), ElValue::from("x-y-z"));
    assert_eq!(eval("${size('abc')}"), ElValue::Long(3));
    assert_eq!(eval("${coalesce(null, null, 3)}"), ElValue::Long(3));
}
