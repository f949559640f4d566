//! Error types for binding and evaluation, and the crate-level error

use thiserror::Error;

pub use crate::parser::ParseError;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while evaluating a bound expression tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A value could not be coerced to the required type
    #[error("cannot coerce '{value}' ({from}) to {to}")]
    Coercion {
        /// String rendering of the offending value
        value: String,
        /// Type of the offending value
        from: &'static str,
        /// Target type
        to: &'static str,
    },

    /// An identifier resolved through no scope, variable, or resolver
    #[error("identifier '{name}' cannot be resolved")]
    UnresolvedIdentifier {
        /// The identifier name
        name: String,
    },

    /// A property access no resolver claimed
    #[error("property '{property}' cannot be resolved on {base_type}")]
    UnresolvedProperty {
        /// The property name
        property: String,
        /// Type of the base value
        base_type: &'static str,
    },

    /// A method invocation no resolver claimed
    #[error("method '{method}' cannot be resolved on {base_type}")]
    UnresolvedMethod {
        /// The method name
        method: String,
        /// Type of the base value
        base_type: &'static str,
    },

    /// Operand types a binary operator does not support
    #[error("operator '{operator}' cannot be applied to {left} and {right}")]
    InvalidOperandTypes {
        /// The operator symbol
        operator: &'static str,
        /// Type of the left operand
        left: &'static str,
        /// Type of the right operand
        right: &'static str,
    },

    /// Integer or decimal division/remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Decimal arithmetic overflowed
    #[error("arithmetic overflow in '{operation}'")]
    Overflow {
        /// The operator symbol
        operation: &'static str,
    },

    /// A registered or built-in function failed
    #[error("function '{name}': {message}")]
    Function {
        /// Qualified function name
        name: String,
        /// What went wrong
        message: String,
    },

    /// Call applied to a value that is not a lambda
    #[error("cannot invoke a value of type {target}")]
    NotInvocable {
        /// Type of the called value
        target: &'static str,
    },

    /// Assignment target that does not support writes
    #[error("expression '{expression}' is not writable")]
    NotWritable {
        /// Canonical rendering of the target expression
        expression: String,
    },

    /// Anything else
    #[error("{message}")]
    Message {
        /// Description of the failure
        message: String,
    },
}

impl EvalError {
    /// Shorthand for a free-form evaluation error
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Errors raised while binding a tree against function/variable mappers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// The function mapper knows no function of this name
    #[error("function '{name}' cannot be resolved")]
    UnknownFunction {
        /// Qualified function name
        name: String,
    },

    /// Call with fewer arguments than a varargs function requires
    #[error("function '{name}' expects at least {min} arguments, got {actual}")]
    Arity {
        /// Qualified function name
        name: String,
        /// Minimum argument count
        min: usize,
        /// Actual argument count
        actual: usize,
    },

    /// Call with the wrong argument count for a fixed-arity function
    #[error("function '{name}' expects {expected} arguments, got {actual}")]
    ExactArity {
        /// Qualified function name
        name: String,
        /// Declared argument count
        expected: usize,
        /// Actual argument count
        actual: usize,
    },
}

/// Top-level error for factory and expression operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElError {
    /// The source string failed to parse
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The tree failed to bind against the context's mappers
    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    /// Evaluation failed
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// The source parsed but is not usable as requested, e.g. a literal
    /// handed to the method-expression constructor
    #[error("invalid expression: {message}")]
    Expression {
        /// Description of the mismatch
        message: String,
    },
}
