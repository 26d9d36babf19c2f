//! Value parser.

use scopify_common::warning::warn_once;

use super::{Value, ValueKind, ValueNode};
use crate::error::{MAX_NESTING_DEPTH, Result, SyntaxError};
use crate::tokenizer::{Token, TokenKind, tokenize};
use crate::tokenizer::tokenizer::is_whitespace;

impl Value {
    /// Parse a declaration value.
    ///
    /// Unclosed strings and functions are accepted and printed back unclosed.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::NestingTooDeep`] for functions nested deeper
    /// than [`MAX_NESTING_DEPTH`].
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser = ValueParser {
            source,
            tokens: tokenize(source),
            position: 0,
            depth: 0,
        };
        let nodes = parser.parse_nodes(false)?;
        Ok(Self { nodes })
    }
}

struct ValueParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl<'a> ValueParser<'a> {
    /// Parse nodes up to EOF, or up to the `)` closing the current function
    /// when `nested` is set. The `)` is left unconsumed.
    fn parse_nodes(&mut self, nested: bool) -> Result<Vec<ValueNode>> {
        let mut nodes: Vec<ValueNode> = Vec::new();

        loop {
            let offset = self.offset();
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::RightParen if nested => break,
                TokenKind::Whitespace => {
                    self.bump();
                    nodes.push(ValueNode {
                        kind: ValueKind::Space {
                            value: self.text(&token).to_string(),
                        },
                        source_index: offset,
                    });
                }
                TokenKind::Comment { .. } => {
                    self.bump();
                    nodes.push(ValueNode {
                        kind: ValueKind::Comment {
                            value: self.text(&token).to_string(),
                        },
                        source_index: offset,
                    });
                }
                TokenKind::Comma | TokenKind::Delim('/') => {
                    self.bump();
                    let before = match nodes.last().map(|node| &node.kind) {
                        Some(ValueKind::Space { value }) => {
                            let value = value.clone();
                            let _ = nodes.pop();
                            value
                        }
                        _ => String::new(),
                    };
                    let after_start = self.offset();
                    while self.peek_kind() == TokenKind::Whitespace {
                        self.bump();
                    }
                    let after = self.slice(after_start, self.offset());
                    let value = if token.kind == TokenKind::Comma { ',' } else { '/' };
                    nodes.push(ValueNode {
                        kind: ValueKind::Div {
                            value,
                            before,
                            after,
                        },
                        source_index: offset,
                    });
                }
                TokenKind::String { terminated } => {
                    self.bump();
                    let raw = self.text(&token);
                    let quote = raw.chars().next().unwrap_or('"');
                    let end = if terminated { raw.len() - 1 } else { raw.len() };
                    nodes.push(ValueNode {
                        kind: ValueKind::String {
                            quote,
                            value: raw[1..end].to_string(),
                            unclosed: !terminated,
                        },
                        source_index: offset,
                    });
                }
                TokenKind::Url { terminated } => {
                    self.bump();
                    nodes.push(self.url_function(&token, terminated));
                }
                TokenKind::Function | TokenKind::LeftParen => {
                    nodes.push(self.parse_function("")?);
                }
                TokenKind::Colon if self.peek_at(1) == TokenKind::Function => {
                    self.bump();
                    nodes.push(self.parse_function(":")?);
                }
                TokenKind::RightParen => {
                    self.bump();
                    nodes.push(ValueNode::word(")", offset));
                }
                _ => nodes.push(self.parse_word()),
            }
        }

        Ok(nodes)
    }

    /// A maximal run of adjacent tokens that are not separators.
    fn parse_word(&mut self) -> ValueNode {
        let start = self.offset();
        loop {
            let kind = self.peek_kind();
            let separator = matches!(
                kind,
                TokenKind::Eof
                    | TokenKind::Whitespace
                    | TokenKind::Comment { .. }
                    | TokenKind::Comma
                    | TokenKind::Delim('/')
                    | TokenKind::String { .. }
                    | TokenKind::Url { .. }
                    | TokenKind::Function
                    | TokenKind::LeftParen
                    | TokenKind::RightParen
            ) || (kind == TokenKind::Colon && self.peek_at(1) == TokenKind::Function);
            if separator && self.offset() > start {
                break;
            }
            if matches!(kind, TokenKind::BadString | TokenKind::BadUrl) {
                let _ = warn_once("css", &format!("kept malformed {kind} in a value verbatim"));
            }
            self.bump();
            if separator {
                break;
            }
        }
        ValueNode::word(self.slice(start, self.offset()), start)
    }

    /// [§ 5.4.9 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    ///
    /// The current token is a `<function-token>` or `(`. `prefix` is prepended
    /// to the name.
    fn parse_function(&mut self, prefix: &str) -> Result<ValueNode> {
        let offset = self.offset();
        let token = self.peek().clone();
        let raw = self.text(&token);
        let paren = raw.find('(').unwrap_or(raw.len());
        let name = format!("{prefix}{}", &raw[..paren]);
        let mut before = raw[(paren + 1).min(raw.len())..].to_string();
        self.bump();

        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                offset,
            });
        }
        let mut nodes = self.parse_nodes(true)?;
        self.depth -= 1;

        if let Some(ValueNode {
            kind: ValueKind::Space { value },
            ..
        }) = nodes.first()
        {
            before.push_str(value);
            let _ = nodes.remove(0);
        }
        let mut after = String::new();
        if let Some(ValueNode {
            kind: ValueKind::Space { value },
            ..
        }) = nodes.last()
        {
            after = value.clone();
            let _ = nodes.pop();
        }

        let unclosed = self.peek_kind() != TokenKind::RightParen;
        if !unclosed {
            self.bump();
        }

        Ok(ValueNode {
            kind: ValueKind::Function {
                name,
                before,
                nodes,
                after,
                unclosed,
            },
            source_index: offset,
        })
    }

    /// Split an unquoted `<url-token>` into a `url` function holding one word.
    fn url_function(&self, token: &Token, terminated: bool) -> ValueNode {
        let raw = self.text(token);
        let paren = raw.find('(').unwrap_or(raw.len());
        let name = raw[..paren].to_string();
        let inner_end = if terminated { raw.len() - 1 } else { raw.len() };
        let inner = &raw[(paren + 1).min(inner_end)..inner_end];

        let body = inner.trim_start_matches(is_whitespace);
        let before = inner[..inner.len() - body.len()].to_string();
        let word = body.trim_end_matches(is_whitespace);
        let after = body[word.len()..].to_string();

        let word_offset = token.span.start + paren + 1 + before.len();
        let nodes = if word.is_empty() {
            Vec::new()
        } else {
            vec![ValueNode::word(word, word_offset)]
        };

        ValueNode {
            kind: ValueKind::Function {
                name,
                before,
                nodes,
                after,
                unclosed: !terminated,
            },
            source_index: token.span.start,
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_at(&self, ahead: usize) -> TokenKind {
        self.tokens
            .get(self.position + ahead)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    fn offset(&self) -> usize {
        self.peek().span.start
    }

    fn bump(&mut self) {
        if !self.peek().is_eof() {
            self.position += 1;
        }
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.source[start..end].to_string()
    }
}
