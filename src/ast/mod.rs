//! Abstract syntax tree for composite EL expressions

mod node;
mod operator;
mod visitor;

pub use node::*;
pub use operator::*;
pub use visitor::*;
