//! An embedded Unified Expression Language interpreter
//!
//! Composite expressions mix literal text with `${...}` (dynamic) and
//! `#{...}` (deferred) eval expressions. Sources parse into shared,
//! cached trees; trees bind against a context's function and variable
//! mappers; bound expressions evaluate against a pluggable resolver
//! chain with EL coercion rules, lambdas, and varargs functions.
//!
//! ```
//! use std::sync::Arc;
//! use uel::{CompositeResolver, ElContext, ExpectedType, ExpressionFactory, RootResolver};
//!
//! let root = Arc::new(RootResolver::new().with_value("user", "ada"));
//! let ctx = ElContext::new(Arc::new(CompositeResolver::standard(root)));
//! let factory = ExpressionFactory::default();
//!
//! let expr = factory
//!     .value_expression(&ctx, "Hello ${user}!", ExpectedType::Str)
//!     .unwrap();
//! let greeting = expr.value(&ctx).unwrap();
//! assert_eq!(greeting.to_string(), "Hello ada!");
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod context;
pub mod error;
pub mod eval;
pub mod expr;
pub mod factory;
pub mod functions;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod tree;

pub use context::ElContext;
pub use error::{BindError, ElError, EvalError, EvalResult};
pub use expr::{MethodExpression, ValueExpression};
pub use factory::{ExpressionFactory, Features};
pub use functions::{ElFunction, FunctionRegistry, ParamKind};
pub use model::{ElLambda, ElValue, ExpectedType, ObjectMap};
pub use parser::{ParseError, ParserFeatures};
pub use resolver::{
    ArrayResolver, CompositeResolver, ElResolver, ObjectResolver, ReadOnlyResolver, Resolution,
    RootResolver, StringResolver,
};
pub use tree::{Bindings, Builder, Tree, TreeBuilder, TreeStore};
