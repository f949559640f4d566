//! Syntax tree node definitions
//!
//! A parsed composite expression is a single [`Node`] tree. Identifier and
//! function nodes carry a bindings slot assigned after parsing (see
//! [`crate::tree::Tree`]); the slot indexes into the
//! [`crate::tree::Bindings`] produced when the tree is bound against a
//! context's mappers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::operator::{BinaryOp, UnaryOp};

/// A node of the expression syntax tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Literal text outside any eval expression
    Text(String),
    /// Interleaved text and eval pieces; evaluates to their concatenation
    Composite(Vec<Node>),
    /// A `${...}` or `#{...}` eval expression
    Eval {
        /// The wrapped expression
        expr: Box<Node>,
        /// true for `#{...}`
        deferred: bool,
    },

    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Integer literal
    Long(i64),
    /// Floating point literal
    Double(f64),
    /// String literal
    Str(String),

    /// Named identifier, resolved through scopes, variables, then resolvers
    Identifier {
        /// The identifier name
        name: String,
        /// Bindings slot, assigned by tree construction
        slot: usize,
    },
    /// Fixed-name property access: `base.name`
    Dot {
        /// The base expression
        base: Box<Node>,
        /// The property name
        property: String,
    },
    /// Computed property access: `base[expr]`
    Bracket {
        /// The base expression
        base: Box<Node>,
        /// The property expression
        property: Box<Node>,
    },
    /// Method invocation: `base.name(args)` or `base[expr](args)`;
    /// the target is always a `Dot` or `Bracket` node
    Method {
        /// The property node naming the method
        target: Box<Node>,
        /// Argument expressions
        args: Vec<Node>,
    },
    /// Call of a function bound through the function mapper
    Function {
        /// Qualified function name (`name` or `prefix:name`)
        name: String,
        /// Bindings slot, assigned by tree construction
        slot: usize,
        /// Argument expressions
        args: Vec<Node>,
    },
    /// Lambda literal: `x -> body` or `(a, b) -> body`
    Lambda {
        /// Parameter names
        params: Vec<String>,
        /// Body expression
        body: Box<Node>,
    },
    /// Application of a lambda-valued expression: `target(args)`
    Invoke {
        /// Expression evaluating to the lambda
        target: Box<Node>,
        /// Argument expressions
        args: Vec<Node>,
    },

    /// Binary operation
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// Unary operation
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Node>,
    },
    /// Ternary choice: `cond ? yes : no`
    Choice {
        /// Condition, coerced to boolean
        cond: Box<Node>,
        /// Branch taken when true
        yes: Box<Node>,
        /// Branch taken when false
        no: Box<Node>,
    },
    /// Parenthesized expression
    Nested(Box<Node>),
}

impl Node {
    /// Create an identifier node; the slot is assigned during tree
    /// construction
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier {
            name: name.into(),
            slot: 0,
        }
    }

    /// Create a string literal node
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Create a property access node
    pub fn dot(base: Node, property: impl Into<String>) -> Self {
        Self::Dot {
            base: Box::new(base),
            property: property.into(),
        }
    }

    /// Create a computed property access node
    pub fn bracket(base: Node, property: Node) -> Self {
        Self::Bracket {
            base: Box::new(base),
            property: Box::new(property),
        }
    }

    /// Create a function call node; the slot is assigned during tree
    /// construction
    pub fn function(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self::Function {
            name: name.into(),
            slot: 0,
            args,
        }
    }

    /// Create a binary operation node
    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary operation node
    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Human-readable node kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Composite(_) => "composite",
            Self::Eval { .. } => "eval expression",
            Self::Null => "null literal",
            Self::Boolean(_) => "boolean literal",
            Self::Long(_) => "integer literal",
            Self::Double(_) => "float literal",
            Self::Str(_) => "string literal",
            Self::Identifier { .. } => "identifier",
            Self::Dot { .. } => "property access",
            Self::Bracket { .. } => "bracket access",
            Self::Method { .. } => "method invocation",
            Self::Function { .. } => "function call",
            Self::Lambda { .. } => "lambda",
            Self::Invoke { .. } => "lambda invocation",
            Self::Binary { .. } => "binary operation",
            Self::Unary { .. } => "unary operation",
            Self::Choice { .. } => "conditional",
            Self::Nested(_) => "nested expression",
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Node]) -> fmt::Result {
    write!(f, "(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Node {
    /// Canonical source rendering; structurally identical trees render
    /// identically, which structural expression equality relies on
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => f.write_str(t),
            Self::Composite(pieces) => {
                for piece in pieces {
                    write!(f, "{piece}")?;
                }
                Ok(())
            }
            Self::Eval { expr, deferred } => {
                write!(f, "{}{{{expr}}}", if *deferred { '#' } else { '$' })
            }
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Str(s) => {
                write!(f, "'")?;
                for c in s.chars() {
                    match c {
                        '\'' | '\\' => write!(f, "\\{c}")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                write!(f, "'")
            }
            Self::Identifier { name, .. } => f.write_str(name),
            Self::Dot { base, property } => write!(f, "{base}.{property}"),
            Self::Bracket { base, property } => write!(f, "{base}[{property}]"),
            Self::Method { target, args } => {
                write!(f, "{target}")?;
                write_args(f, args)
            }
            Self::Function { name, args, .. } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            Self::Lambda { params, body } => {
                if params.len() == 1 {
                    write!(f, "{} -> {body}", params[0])
                } else {
                    write!(f, "(")?;
                    for (i, p) in params.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        f.write_str(p)?;
                    }
                    write!(f, ") -> {body}")
                }
            }
            Self::Invoke { target, args } => {
                write!(f, "{target}")?;
                write_args(f, args)
            }
            Self::Binary { op, left, right } => write!(f, "{left} {op} {right}"),
            Self::Unary { op, operand } => write!(f, "{op}{operand}"),
            Self::Choice { cond, yes, no } => write!(f, "{cond} ? {yes} : {no}"),
            Self::Nested(expr) => write!(f, "({expr})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_structure() {
        let expr = Node::binary(
            BinaryOp::Add,
            Node::Long(1),
            Node::binary(BinaryOp::Mul, Node::Long(2), Node::Long(3)),
        );
        assert_eq!(expr.to_string(), "1 + 2 * 3");
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(Node::string("it's").to_string(), r"'it\'s'");
    }

    #[test]
    fn display_eval_wrapper() {
        let eval = Node::Eval {
            expr: Box::new(Node::identifier("x")),
            deferred: true,
        };
        assert_eq!(eval.to_string(), "#{x}");
    }

    #[test]
    fn display_method() {
        let method = Node::Method {
            target: Box::new(Node::dot(Node::identifier("a"), "b")),
            args: vec![Node::Long(1), Node::Long(2)],
        };
        assert_eq!(method.to_string(), "a.b(1, 2)");
    }
}
