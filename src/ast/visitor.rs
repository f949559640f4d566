//! Tree walking support
//!
//! Pre-order walks over [`Node`] trees, immutable and mutable. Tree
//! construction uses the mutable walk to assign bindings slots to
//! identifier and function nodes.

use super::node::Node;

/// Pre-order visitor over an immutable tree
pub trait Visitor {
    /// Called for every node before its children
    fn visit(&mut self, node: &Node);
}

/// Walk a tree in pre-order, calling the visitor for every node
pub fn walk(node: &Node, visitor: &mut dyn Visitor) {
    visitor.visit(node);
    match node {
        Node::Composite(pieces) => {
            for piece in pieces {
                walk(piece, visitor);
            }
        }
        Node::Eval { expr, .. } | Node::Nested(expr) => walk(expr, visitor),
        Node::Dot { base, .. } => walk(base, visitor),
        Node::Bracket { base, property } => {
            walk(base, visitor);
            walk(property, visitor);
        }
        Node::Method { target, args } | Node::Invoke { target, args } => {
            walk(target, visitor);
            for arg in args {
                walk(arg, visitor);
            }
        }
        Node::Function { args, .. } => {
            for arg in args {
                walk(arg, visitor);
            }
        }
        Node::Lambda { body, .. } => walk(body, visitor),
        Node::Binary { left, right, .. } => {
            walk(left, visitor);
            walk(right, visitor);
        }
        Node::Unary { operand, .. } => walk(operand, visitor),
        Node::Choice { cond, yes, no } => {
            walk(cond, visitor);
            walk(yes, visitor);
            walk(no, visitor);
        }
        Node::Text(_)
        | Node::Null
        | Node::Boolean(_)
        | Node::Long(_)
        | Node::Double(_)
        | Node::Str(_)
        | Node::Identifier { .. } => {}
    }
}

/// Pre-order visitor over a mutable tree
pub trait VisitorMut {
    /// Called for every node before its children
    fn visit(&mut self, node: &mut Node);
}

/// Walk a tree in pre-order with mutable access to every node
pub fn walk_mut(node: &mut Node, visitor: &mut dyn VisitorMut) {
    visitor.visit(node);
    match node {
        Node::Composite(pieces) => {
            for piece in pieces {
                walk_mut(piece, visitor);
            }
        }
        Node::Eval { expr, .. } | Node::Nested(expr) => walk_mut(expr, visitor),
        Node::Dot { base, .. } => walk_mut(base, visitor),
        Node::Bracket { base, property } => {
            walk_mut(base, visitor);
            walk_mut(property, visitor);
        }
        Node::Method { target, args } | Node::Invoke { target, args } => {
            walk_mut(target, visitor);
            for arg in args {
                walk_mut(arg, visitor);
            }
        }
        Node::Function { args, .. } => {
            for arg in args {
                walk_mut(arg, visitor);
            }
        }
        Node::Lambda { body, .. } => walk_mut(body, visitor),
        Node::Binary { left, right, .. } => {
            walk_mut(left, visitor);
            walk_mut(right, visitor);
        }
        Node::Unary { operand, .. } => walk_mut(operand, visitor),
        Node::Choice { cond, yes, no } => {
            walk_mut(cond, visitor);
            walk_mut(yes, visitor);
            walk_mut(no, visitor);
        }
        Node::Text(_)
        | Node::Null
        | Node::Boolean(_)
        | Node::Long(_)
        | Node::Double(_)
        | Node::Str(_)
        | Node::Identifier { .. } => {}
    }
}
