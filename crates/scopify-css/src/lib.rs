//! Lossless CSS tokenizer, stylesheet parser, and selector/value codecs for scopify.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Comments kept as tokens
//!   - Byte spans on every token
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Rules, at-rules, declarations, and comments
//!   - Nested rules inside style rule blocks
//!   - Raw whitespace kept on every node
//!
//! - **Selector trees** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Arena-allocated selector lists
//!   - Pseudo-class arguments parsed as nested selector lists
//!
//! - **Value trees**
//!   - Words, strings, functions, dividers, spaces, and comments
//!
//! Every parser here round-trips: printing an unmodified tree reproduces the
//! input exactly.
//!
//! # Not Yet Implemented
//!
//! - Numeric values (numbers are kept as raw words)
//! - Selector matching

/// Syntax errors and the nesting limit shared by all parsers.
pub mod error;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector trees per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Declaration value trees.
pub mod values;

// Re-exports for convenience
pub use error::{MAX_NESTING_DEPTH, SyntaxError};
pub use parser::{AtRule, Block, CSSParser, Comment, Declaration, Node, Rule, Stylesheet, parse_stylesheet};
pub use selector::{CombinatorKind, NodeId, NodeKind, SelectorNode, SelectorTree, Spaces};
pub use tokenizer::{CSSTokenizer, Token, TokenKind, tokenize};
pub use values::{Value, ValueKind, ValueNode, parse_value, stringify};
