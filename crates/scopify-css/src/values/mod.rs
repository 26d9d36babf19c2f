//! Declaration value trees
//!
//! [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
//!
//! A declaration value is split into words, strings, functions, dividers,
//! spaces, and comments. The split is coarser than component values: adjacent
//! tokens that are not separated by whitespace, a divider, or a parenthesis
//! form a single [`ValueKind::Word`], which is the unit animation names and
//! URLs are rewritten at.
//!
//! Printing a parsed [`Value`] gives back the exact input.

mod parser;

use core::fmt;

/// A parsed declaration value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Value {
    /// Top-level nodes in source order.
    pub nodes: Vec<ValueNode>,
}

/// One node of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    /// What the node is.
    pub kind: ValueKind,
    /// Byte offset in the parsed value, 0 for synthesized nodes.
    pub source_index: usize,
}

/// The kinds of [`ValueNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// A run of adjacent tokens such as `fade`, `1s`, `#fff`, or `-1.5e3px`.
    Word {
        /// Raw text.
        value: String,
    },
    /// A quoted string.
    String {
        /// The quote character, `"` or `'`.
        quote: char,
        /// Raw text between the quotes.
        value: String,
        /// Whether EOF was reached before the closing quote.
        unclosed: bool,
    },
    /// A function call, or a bare parenthesized group when `name` is empty.
    Function {
        /// Name as written, e.g. `url`, `steps`, or `:local`.
        name: String,
        /// Whitespace after `(`.
        before: String,
        /// Arguments.
        nodes: Vec<ValueNode>,
        /// Whitespace before `)`.
        after: String,
        /// Whether EOF was reached before the closing parenthesis.
        unclosed: bool,
    },
    /// A `,` or `/` divider with the whitespace around it.
    Div {
        /// The divider character.
        value: char,
        /// Whitespace before the divider.
        before: String,
        /// Whitespace after the divider.
        after: String,
    },
    /// Whitespace between two nodes.
    Space {
        /// Raw whitespace.
        value: String,
    },
    /// A `/* ... */` comment, raw.
    Comment {
        /// Raw text including the delimiters.
        value: String,
    },
}

impl ValueNode {
    /// A synthesized word node.
    #[must_use]
    pub fn word(value: impl Into<String>, source_index: usize) -> Self {
        Self {
            kind: ValueKind::Word {
                value: value.into(),
            },
            source_index,
        }
    }

    /// The word text if this node is a [`ValueKind::Word`].
    #[must_use]
    pub fn as_word(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Word { value } => Some(value),
            _ => None,
        }
    }

    /// The function name if this node is a [`ValueKind::Function`].
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Function { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Parse a declaration value into its top-level nodes.
///
/// # Errors
///
/// Returns [`SyntaxError::NestingTooDeep`](crate::error::SyntaxError::NestingTooDeep)
/// when functions nest deeper than [`MAX_NESTING_DEPTH`](crate::error::MAX_NESTING_DEPTH).
pub fn parse_value(source: &str) -> crate::error::Result<Vec<ValueNode>> {
    Value::parse(source).map(|value| value.nodes)
}

/// Serialize a node sequence.
#[must_use]
pub fn stringify(nodes: &[ValueNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &ValueNode, out: &mut String) {
    match &node.kind {
        ValueKind::Word { value } | ValueKind::Space { value } | ValueKind::Comment { value } => {
            out.push_str(value);
        }
        ValueKind::String {
            quote,
            value,
            unclosed,
        } => {
            out.push(*quote);
            out.push_str(value);
            if !unclosed {
                out.push(*quote);
            }
        }
        ValueKind::Function {
            name,
            before,
            nodes,
            after,
            unclosed,
        } => {
            out.push_str(name);
            out.push('(');
            out.push_str(before);
            for child in nodes {
                write_node(child, out);
            }
            out.push_str(after);
            if !unclosed {
                out.push(')');
            }
        }
        ValueKind::Div {
            value,
            before,
            after,
        } => {
            out.push_str(before);
            out.push(*value);
            out.push_str(after);
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(&self.nodes))
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(core::slice::from_ref(self)))
    }
}
