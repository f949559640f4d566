//! Runtime values and EL type coercion

pub mod coerce;
mod value;

pub use coerce::ExpectedType;
pub use value::{ElLambda, ElValue, ObjectMap, ScopeFrame};
