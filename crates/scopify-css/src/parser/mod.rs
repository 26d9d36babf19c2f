//! Lossless stylesheet parser module.

/// Stylesheet tree and parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod css_parser;

pub use css_parser::{
    AtRule, Block, CSSParser, Comment, Declaration, Node, Rule, Stylesheet, parse_stylesheet,
};
