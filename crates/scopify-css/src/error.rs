//! Syntax errors shared by the stylesheet, selector, and value parsers.

use thiserror::Error;

/// Maximum nesting of blocks, pseudo-class arguments, or value functions.
///
/// Deeper input is rejected with [`SyntaxError::NestingTooDeep`] so that the
/// recursive parsers and the scoping walk never exhaust the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A CSS input that could not be turned into a tree.
///
/// Offsets are byte offsets into the string handed to the parser that failed
/// (a whole stylesheet, one selector, or one declaration value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A `{` without its matching `}`.
    #[error("Unclosed block at offset {offset}")]
    UnclosedBlock {
        /// Offset of the opening brace.
        offset: usize,
    },

    /// A `}` with no open block.
    #[error("Unexpected }} at offset {offset}")]
    UnexpectedCloseBrace {
        /// Offset of the stray brace.
        offset: usize,
    },

    /// A `(` or `[` without its closing counterpart.
    #[error("Unclosed {bracket} at offset {offset}")]
    UnclosedBracket {
        /// The opening bracket character.
        bracket: char,
        /// Offset of the opening bracket.
        offset: usize,
    },

    /// A `)` or `]` with nothing to close.
    #[error("Unexpected {bracket} at offset {offset}")]
    UnexpectedCloseBracket {
        /// The closing bracket character.
        bracket: char,
        /// Offset of the stray bracket.
        offset: usize,
    },

    /// Text inside a block that is neither a declaration nor a rule.
    #[error("Unknown word {word} at offset {offset}")]
    UnknownWord {
        /// The offending text.
        word: String,
        /// Offset where it starts.
        offset: usize,
    },

    /// Input nested deeper than [`MAX_NESTING_DEPTH`].
    #[error("Nesting deeper than {limit} levels at offset {offset}")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
        /// Offset where the limit was exceeded.
        offset: usize,
    },
}

/// Result alias for the parsers in this crate.
pub type Result<T> = core::result::Result<T, SyntaxError>;
