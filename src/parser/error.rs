//! Parse error types

use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors produced while scanning or parsing an expression source string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// An unexpected token where something else was required
    #[error("error at position {position}: unexpected '{found}', expected {expected}")]
    UnexpectedToken {
        /// Byte offset of the offending token
        position: usize,
        /// Rendering of the token that was found
        found: String,
        /// What the parser was looking for
        expected: String,
    },

    /// Input ended in the middle of an expression
    #[error("error at position {position}: unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// Byte offset where input ended
        position: usize,
        /// What the parser was looking for
        expected: String,
    },

    /// An eval expression was opened but never closed with '}'
    #[error("error at position {position}: unterminated eval expression")]
    UnterminatedEval {
        /// Byte offset of the opening delimiter
        position: usize,
    },

    /// A string literal was opened but never closed
    #[error("error at position {position}: unterminated string literal")]
    UnterminatedString {
        /// Byte offset of the opening quote
        position: usize,
    },

    /// A composite mixed `${...}` and `#{...}` delimiters
    #[error("error at position {position}: cannot mix '${{...}}' and '#{{...}}' in one expression")]
    MixedDelimiters {
        /// Byte offset of the second, conflicting delimiter
        position: usize,
    },

    /// Any other malformed input
    #[error("error at position {position}: {message}")]
    Invalid {
        /// Byte offset of the problem
        position: usize,
        /// Description of the problem
        message: String,
    },
}

impl ParseError {
    /// Byte offset the error points at
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEof { position, .. }
            | Self::UnterminatedEval { position }
            | Self::UnterminatedString { position }
            | Self::MixedDelimiters { position }
            | Self::Invalid { position, .. } => *position,
        }
    }
}
