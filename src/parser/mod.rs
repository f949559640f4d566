//! Parsing of composite EL expressions
//!
//! `${expr}` is a dynamic eval expression, `#{expr}` a deferred one; text
//! around them passes through verbatim. See [`crate::ast`] for the tree
//! the parser produces.

mod error;
mod pratt;
mod span;
mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use pratt::{PrattParser, Precedence};
pub use span::{Span, Spanned};
pub use tokenizer::{Token, Tokenizer};

use crate::tree::Tree;

/// Parser feature toggles, a subset of [`crate::factory::Features`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserFeatures {
    /// Parse `base.name(args)` / `base[expr](args)` as method invocations
    pub methods: bool,
}

impl Default for ParserFeatures {
    fn default() -> Self {
        Self { methods: true }
    }
}

/// Parse a composite expression source into a [`Tree`]
pub fn parse(source: &str, features: ParserFeatures) -> ParseResult<Tree> {
    let (root, deferred) = PrattParser::new(source, features).parse()?;
    Ok(Tree::new(root, deferred))
}
