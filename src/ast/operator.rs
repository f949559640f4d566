//! Operator enums shared by the parser and evaluator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators of the expression language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Logical or (`or`, `||`), short-circuiting
    Or,
    /// Logical and (`and`, `&&`), short-circuiting
    And,
    /// Equality (`==`, `eq`)
    Eq,
    /// Inequality (`!=`, `ne`)
    Ne,
    /// Less than (`<`, `lt`)
    Lt,
    /// Greater than (`>`, `gt`)
    Gt,
    /// Less than or equal (`<=`, `le`)
    Le,
    /// Greater than or equal (`>=`, `ge`)
    Ge,
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`, `div`)
    Div,
    /// Remainder (`%`, `mod`)
    Mod,
}

impl BinaryOp {
    /// Canonical operator symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators of the expression language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation (`-`)
    Neg,
    /// Logical negation (`!`, `not`)
    Not,
    /// Emptiness test (`empty`)
    Empty,
}

impl UnaryOp {
    /// Canonical operator symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::Empty => "empty ",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
