//! Resolvers for the bundled data types
//!
//! Arrays resolve integer-coercible properties as indexes, objects
//! resolve string-coerced keys, and each carries a small built-in method
//! surface. All three are read-only: an evaluated base is a detached
//! value, so deep writes go through a custom resolver over shared state.

use super::{ElResolver, Resolution};
use crate::context::ElContext;
use crate::error::EvalError;
use crate::model::{ElValue, coerce};

fn method_error(method: &str, message: impl Into<String>) -> Resolution {
    Resolution::Failed(EvalError::Function {
        name: method.to_string(),
        message: message.into(),
    })
}

fn expect_args(method: &str, args: &[ElValue], count: usize) -> Option<Resolution> {
    if args.len() == count {
        None
    } else {
        Some(method_error(
            method,
            format!("expects {count} arguments, got {}", args.len()),
        ))
    }
}

/// Index access and collection methods on array values
pub struct ArrayResolver;

impl ElResolver for ArrayResolver {
    fn get(&self, _ctx: &ElContext, base: Option<&ElValue>, property: &ElValue) -> Resolution {
        let Some(ElValue::Array(items)) = base else {
            return Resolution::NotResolved;
        };
        let Ok(index) = coerce::to_long(property) else {
            return Resolution::NotResolved;
        };
        if index < 0 {
            return Resolution::Resolved(ElValue::Null);
        }
        match items.get(index as usize) {
            Some(item) => Resolution::Resolved(item.clone()),
            None => Resolution::Resolved(ElValue::Null),
        }
    }

    fn read_only(
        &self,
        _ctx: &ElContext,
        base: Option<&ElValue>,
        _property: &ElValue,
    ) -> Resolution<bool> {
        match base {
            Some(ElValue::Array(_)) => Resolution::Resolved(true),
            _ => Resolution::NotResolved,
        }
    }

    fn invoke(
        &self,
        _ctx: &ElContext,
        base: &ElValue,
        method: &str,
        args: &[ElValue],
    ) -> Resolution {
        let ElValue::Array(items) = base else {
            return Resolution::NotResolved;
        };
        match method {
            "size" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return err;
                }
                Resolution::Resolved(ElValue::Long(items.len() as i64))
            }
            "isEmpty" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return err;
                }
                Resolution::Resolved(ElValue::Bool(items.is_empty()))
            }
            "contains" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return err;
                }
                let found = items
                    .iter()
                    .any(|item| coerce::equals(item, &args[0]).unwrap_or(false));
                Resolution::Resolved(ElValue::Bool(found))
            }
            _ => Resolution::NotResolved,
        }
    }
}

/// Key access and map methods on object values
pub struct ObjectResolver;

impl ElResolver for ObjectResolver {
    fn get(&self, _ctx: &ElContext, base: Option<&ElValue>, property: &ElValue) -> Resolution {
        let Some(ElValue::Object(map)) = base else {
            return Resolution::NotResolved;
        };
        let key = coerce::to_str(property);
        // a missing key resolves to null, matching map semantics
        match map.get(&key) {
            Some(value) => Resolution::Resolved(value.clone()),
            None => Resolution::Resolved(ElValue::Null),
        }
    }

    fn read_only(
        &self,
        _ctx: &ElContext,
        base: Option<&ElValue>,
        _property: &ElValue,
    ) -> Resolution<bool> {
        match base {
            Some(ElValue::Object(_)) => Resolution::Resolved(true),
            _ => Resolution::NotResolved,
        }
    }

    fn invoke(
        &self,
        _ctx: &ElContext,
        base: &ElValue,
        method: &str,
        args: &[ElValue],
    ) -> Resolution {
        let ElValue::Object(map) = base else {
            return Resolution::NotResolved;
        };
        match method {
            "size" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return err;
                }
                Resolution::Resolved(ElValue::Long(map.len() as i64))
            }
            "isEmpty" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return err;
                }
                Resolution::Resolved(ElValue::Bool(map.is_empty()))
            }
            "containsKey" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return err;
                }
                let key = coerce::to_str(&args[0]);
                Resolution::Resolved(ElValue::Bool(map.contains_key(&key)))
            }
            _ => Resolution::NotResolved,
        }
    }
}

/// String methods
pub struct StringResolver;

impl StringResolver {
    fn call(s: &str, method: &str, args: &[ElValue]) -> Option<Resolution> {
        let resolved = |v: ElValue| Some(Resolution::Resolved(v));
        match method {
            "length" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return Some(err);
                }
                resolved(ElValue::Long(s.chars().count() as i64))
            }
            "toUpperCase" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return Some(err);
                }
                resolved(ElValue::str(s.to_uppercase()))
            }
            "toLowerCase" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return Some(err);
                }
                resolved(ElValue::str(s.to_lowercase()))
            }
            "trim" => {
                if let Some(err) = expect_args(method, args, 0) {
                    return Some(err);
                }
                resolved(ElValue::str(s.trim()))
            }
            "substring" => {
                if let Some(err) = expect_args(method, args, 2) {
                    return Some(err);
                }
                let (begin, end) = match (coerce::to_long(&args[0]), coerce::to_long(&args[1])) {
                    (Ok(b), Ok(e)) => (b, e),
                    _ => return Some(method_error(method, "indexes must be numbers")),
                };
                let count = s.chars().count() as i64;
                if begin < 0 || end < begin || end > count {
                    return Some(method_error(
                        method,
                        format!("range {begin}..{end} out of bounds for length {count}"),
                    ));
                }
                let sub: String = s
                    .chars()
                    .skip(begin as usize)
                    .take((end - begin) as usize)
                    .collect();
                resolved(ElValue::str(sub))
            }
            "indexOf" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return Some(err);
                }
                let needle = coerce::to_str(&args[0]);
                match s.find(&needle) {
                    Some(byte_index) => {
                        resolved(ElValue::Long(s[..byte_index].chars().count() as i64))
                    }
                    None => resolved(ElValue::Long(-1)),
                }
            }
            "startsWith" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return Some(err);
                }
                resolved(ElValue::Bool(s.starts_with(&coerce::to_str(&args[0]))))
            }
            "endsWith" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return Some(err);
                }
                resolved(ElValue::Bool(s.ends_with(&coerce::to_str(&args[0]))))
            }
            "replace" => {
                if let Some(err) = expect_args(method, args, 2) {
                    return Some(err);
                }
                let from = coerce::to_str(&args[0]);
                let to = coerce::to_str(&args[1]);
                resolved(ElValue::str(s.replace(&from, &to)))
            }
            "split" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return Some(err);
                }
                let sep = coerce::to_str(&args[0]);
                if sep.is_empty() {
                    return Some(method_error(method, "separator must not be empty"));
                }
                let parts = s.split(sep.as_str()).map(ElValue::str).collect();
                resolved(ElValue::Array(parts))
            }
            "concat" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return Some(err);
                }
                let mut out = s.to_string();
                out.push_str(&coerce::to_str(&args[0]));
                resolved(ElValue::str(out))
            }
            "contains" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return Some(err);
                }
                resolved(ElValue::Bool(s.contains(&coerce::to_str(&args[0]))))
            }
            "charAt" => {
                if let Some(err) = expect_args(method, args, 1) {
                    return Some(err);
                }
                let Ok(index) = coerce::to_long(&args[0]) else {
                    return Some(method_error(method, "index must be a number"));
                };
                if index < 0 {
                    return Some(method_error(method, format!("index {index} out of bounds")));
                }
                match s.chars().nth(index as usize) {
                    Some(c) => resolved(ElValue::str(c.to_string())),
                    None => Some(method_error(method, format!("index {index} out of bounds"))),
                }
            }
            _ => None,
        }
    }
}

impl ElResolver for StringResolver {
    fn get(&self, _ctx: &ElContext, _base: Option<&ElValue>, _property: &ElValue) -> Resolution {
        Resolution::NotResolved
    }

    fn invoke(
        &self,
        _ctx: &ElContext,
        base: &ElValue,
        method: &str,
        args: &[ElValue],
    ) -> Resolution {
        let ElValue::Str(s) = base else {
            return Resolution::NotResolved;
        };
        Self::call(s, method, args).unwrap_or(Resolution::NotResolved)
    }
}
