//! Function mapper: named functions bound into trees at bind time
//!
//! Functions declare a parameter coercion per argument; the final
//! parameter of a varargs function absorbs all remaining arguments.
//! Lambda-valued arguments always pass through uncoerced.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ast::BinaryOp;
use crate::error::{BindError, EvalError, EvalResult};
use crate::model::{ElValue, coerce};

/// Declared parameter coercion of a function argument
pub use crate::model::ExpectedType as ParamKind;

/// Implementation of a registered function
pub type FunctionImpl = dyn Fn(&[ElValue]) -> EvalResult<ElValue> + Send + Sync;

/// A function the function mapper can bind
#[derive(Clone)]
pub struct ElFunction {
    name: String,
    params: Vec<ParamKind>,
    varargs: bool,
    body: Arc<FunctionImpl>,
}

impl ElFunction {
    /// Create a fixed-arity function
    pub fn new(name: impl Into<String>, params: Vec<ParamKind>, body: Arc<FunctionImpl>) -> Self {
        Self {
            name: name.into(),
            params,
            varargs: false,
            body,
        }
    }

    /// Create a varargs function; the last parameter kind absorbs the
    /// remaining arguments
    pub fn varargs(
        name: impl Into<String>,
        params: Vec<ParamKind>,
        body: Arc<FunctionImpl>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            varargs: true,
            body,
        }
    }

    /// Qualified function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this function accepts a variable argument count
    pub fn is_varargs(&self) -> bool {
        self.varargs
    }

    /// Validate an argument count at bind time
    pub fn check_arity(&self, actual: usize, varargs_enabled: bool) -> Result<(), BindError> {
        if self.varargs && varargs_enabled {
            let min = self.params.len().saturating_sub(1);
            if actual < min {
                return Err(BindError::Arity {
                    name: self.name.clone(),
                    min,
                    actual,
                });
            }
            return Ok(());
        }
        if actual != self.params.len() {
            return Err(BindError::ExactArity {
                name: self.name.clone(),
                expected: self.params.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Coerce arguments to the declared parameter kinds and call
    pub fn invoke(&self, args: &[ElValue]) -> EvalResult<ElValue> {
        let mut coerced: SmallVec<[ElValue; 4]> = SmallVec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let kind = if i < self.params.len() {
                self.params[i]
            } else {
                self.params.last().copied().unwrap_or(ParamKind::Any)
            };
            if matches!(arg, ElValue::Lambda(_)) {
                coerced.push(arg.clone());
            } else {
                coerced.push(coerce::apply(arg.clone(), kind)?);
            }
        }
        (self.body)(&coerced)
    }
}

impl PartialEq for ElFunction {
    /// Identity of the implementation is part of equality, so functions
    /// registered through the same registry instance compare equal and
    /// separately built duplicates do not
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && self.varargs == other.varargs
            && Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for ElFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("varargs", &self.varargs)
            .finish_non_exhaustive()
    }
}

/// The function mapper: qualified name to function
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<ElFunction>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard functions; the instances are
    /// shared, so expressions bound through different contexts still
    /// compare equal
    pub fn builtins() -> Self {
        BUILTINS.clone()
    }

    /// Register a function under its qualified name, replacing any
    /// previous registration
    pub fn register(&mut self, function: ElFunction) {
        self.functions
            .insert(function.name.clone(), Arc::new(function));
    }

    /// Look up a function by qualified name
    pub fn resolve(&self, name: &str) -> Option<Arc<ElFunction>> {
        self.functions.get(name).cloned()
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn function_error(name: &str, message: impl Into<String>) -> EvalError {
    EvalError::Function {
        name: name.to_string(),
        message: message.into(),
    }
}

static BUILTINS: Lazy<FunctionRegistry> = Lazy::new(|| {
    let mut registry = FunctionRegistry::new();

    registry.register(ElFunction::new(
        "min",
        vec![ParamKind::Any, ParamKind::Any],
        Arc::new(|args| {
            let le = coerce::compare(BinaryOp::Le, &args[0], &args[1])?;
            Ok(if le { args[0].clone() } else { args[1].clone() })
        }),
    ));

    registry.register(ElFunction::new(
        "max",
        vec![ParamKind::Any, ParamKind::Any],
        Arc::new(|args| {
            let ge = coerce::compare(BinaryOp::Ge, &args[0], &args[1])?;
            Ok(if ge { args[0].clone() } else { args[1].clone() })
        }),
    ));

    registry.register(ElFunction::new(
        "abs",
        vec![ParamKind::Any],
        Arc::new(|args| match coerce::to_number(&args[0])? {
            ElValue::Long(n) => Ok(ElValue::Long(n.wrapping_abs())),
            ElValue::Double(d) => Ok(ElValue::Double(d.abs())),
            ElValue::Decimal(d) => Ok(ElValue::Decimal(d.abs())),
            other => Err(function_error("abs", format!("not a number: {other}"))),
        }),
    ));

    registry.register(ElFunction::new(
        "floor",
        vec![ParamKind::Any],
        Arc::new(|args| match coerce::to_number(&args[0])? {
            ElValue::Long(n) => Ok(ElValue::Long(n)),
            ElValue::Double(d) => Ok(ElValue::Double(d.floor())),
            ElValue::Decimal(d) => Ok(ElValue::Decimal(d.floor())),
            other => Err(function_error("floor", format!("not a number: {other}"))),
        }),
    ));

    registry.register(ElFunction::new(
        "ceil",
        vec![ParamKind::Any],
        Arc::new(|args| match coerce::to_number(&args[0])? {
            ElValue::Long(n) => Ok(ElValue::Long(n)),
            ElValue::Double(d) => Ok(ElValue::Double(d.ceil())),
            ElValue::Decimal(d) => Ok(ElValue::Decimal(d.ceil())),
            other => Err(function_error("ceil", format!("not a number: {other}"))),
        }),
    ));

    registry.register(ElFunction::new(
        "round",
        vec![ParamKind::Any],
        Arc::new(|args| match coerce::to_number(&args[0])? {
            ElValue::Long(n) => Ok(ElValue::Long(n)),
            ElValue::Double(d) => Ok(ElValue::Double(d.round())),
            ElValue::Decimal(d) => Ok(ElValue::Decimal(d.round())),
            other => Err(function_error("round", format!("not a number: {other}"))),
        }),
    ));

    registry.register(ElFunction::new(
        "pow",
        vec![ParamKind::Double, ParamKind::Double],
        Arc::new(|args| match (&args[0], &args[1]) {
            (ElValue::Double(base), ElValue::Double(exp)) => {
                Ok(ElValue::Double(base.powf(*exp)))
            }
            _ => Err(function_error("pow", "expects two numbers")),
        }),
    ));

    registry.register(ElFunction::varargs(
        "concat",
        vec![ParamKind::Str],
        Arc::new(|args| {
            let mut out = String::new();
            for arg in args {
                out.push_str(&coerce::to_str(arg));
            }
            Ok(ElValue::str(out))
        }),
    ));

    registry.register(ElFunction::varargs(
        "join",
        vec![ParamKind::Str, ParamKind::Str],
        Arc::new(|args| {
            let separator = coerce::to_str(&args[0]);
            let parts: Vec<String> = args[1..].iter().map(coerce::to_str).collect();
            Ok(ElValue::str(parts.join(&separator)))
        }),
    ));

    registry.register(ElFunction::new(
        "size",
        vec![ParamKind::Any],
        Arc::new(|args| match &args[0] {
            ElValue::Null => Ok(ElValue::Long(0)),
            ElValue::Str(s) => Ok(ElValue::Long(s.chars().count() as i64)),
            ElValue::Array(items) => Ok(ElValue::Long(items.len() as i64)),
            ElValue::Object(map) => Ok(ElValue::Long(map.len() as i64)),
            other => Err(function_error(
                "size",
                format!("no size for {}", other.type_name()),
            )),
        }),
    ));

    registry.register(ElFunction::varargs(
        "coalesce",
        vec![ParamKind::Any],
        Arc::new(|args| {
            Ok(args
                .iter()
                .find(|v| !v.is_null())
                .cloned()
                .unwrap_or(ElValue::Null))
        }),
    ));

    registry
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn builtin(name: &str) -> Arc<ElFunction> {
        FunctionRegistry::builtins().resolve(name).unwrap()
    }

    #[test]
    fn min_max_over_mixed_numerics() {
        let min = builtin("min");
        assert_eq!(
            min.invoke(&[ElValue::Long(3), ElValue::Double(1.5)]),
            Ok(ElValue::Double(1.5))
        );
        let max = builtin("max");
        assert_eq!(
            max.invoke(&[ElValue::from("10"), ElValue::Long(9)]),
            Ok(ElValue::from("10"))
        );
    }

    #[test]
    fn concat_coerces_everything_to_string() {
        let concat = builtin("concat");
        assert_eq!(
            concat.invoke(&[ElValue::from("a"), ElValue::Long(1), ElValue::Null]),
            Ok(ElValue::from("a1"))
        );
    }

    #[test]
    fn join_with_separator() {
        let join = builtin("join");
        assert_eq!(
            join.invoke(&[ElValue::from("-"), ElValue::from("a"), ElValue::from("b")]),
            Ok(ElValue::from("a-b"))
        );
    }

    #[test]
    fn varargs_arity_checks() {
        let join = builtin("join");
        assert!(join.check_arity(1, true).is_ok());
        assert!(join.check_arity(0, true).is_err());
        // with varargs disabled the declared arity is exact
        assert!(join.check_arity(3, false).is_err());
        assert!(join.check_arity(2, false).is_ok());
    }

    #[test]
    fn coalesce_returns_first_non_null() {
        let coalesce = builtin("coalesce");
        assert_eq!(
            coalesce.invoke(&[ElValue::Null, ElValue::Long(2), ElValue::Long(3)]),
            Ok(ElValue::Long(2))
        );
    }

    #[test]
    fn shared_builtin_instances_compare_equal() {
        assert_eq!(*builtin("min"), *builtin("min"));
    }
}
