//! Selector list parser.
//!
//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! The grammar is applied loosely: anything that is not a recognized simple
//! selector is kept as a raw [`NodeKind::Tag`] so that the tree stays lossless.

use super::{CombinatorKind, NodeId, NodeKind, SelectorTree, Spaces};
use crate::error::{MAX_NESTING_DEPTH, Result, SyntaxError};
use crate::tokenizer::{Token, TokenKind, tokenize};

impl SelectorTree {
    /// [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
    ///
    /// "`<selector-list> = <complex-selector-list>`"
    ///
    /// Parse a comma-separated selector list.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for unbalanced parentheses or brackets and
    /// for pseudo-class arguments nested deeper than [`MAX_NESTING_DEPTH`].
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser = SelectorParser {
            source,
            tokens: tokenize(source),
            position: 0,
            depth: 0,
            tree: SelectorTree::new(),
        };
        parser.parse_list(NodeId::ROOT, false)?;
        Ok(parser.tree)
    }
}

struct SelectorParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    tree: SelectorTree,
}

impl SelectorParser<'_> {
    /// "`<complex-selector-list> = <complex-selector>#`"
    ///
    /// Stops in front of the `)` closing a pseudo-class argument list.
    fn parse_list(&mut self, parent: NodeId, nested: bool) -> Result<()> {
        loop {
            let selector = self.parse_complex_selector()?;
            self.tree.append_child(parent, selector);

            match self.peek_kind() {
                TokenKind::Comma => self.bump(),
                TokenKind::RightParen if !nested => {
                    return Err(SyntaxError::UnexpectedCloseBracket {
                        bracket: ')',
                        offset: self.offset(),
                    });
                }
                _ => return Ok(()),
            }
        }
    }

    /// "`<complex-selector> = <compound-selector> [ <combinator>? <compound-selector> ]*`"
    fn parse_complex_selector(&mut self) -> Result<NodeId> {
        let selector = self
            .tree
            .alloc(NodeKind::Selector, Spaces::default(), self.offset());
        let mut children: Vec<NodeId> = Vec::new();
        let mut leading = String::new();

        loop {
            let trivia_start = self.offset();
            let mut has_whitespace = false;
            while self.peek().is_trivia() {
                has_whitespace |= self.peek_kind() == TokenKind::Whitespace;
                self.bump();
            }
            let trivia = self.slice(trivia_start, self.offset());

            if matches!(
                self.peek_kind(),
                TokenKind::Comma | TokenKind::RightParen | TokenKind::Eof
            ) {
                match children.last() {
                    Some(&last) => self.tree[last].spaces.after.push_str(&trivia),
                    None => self.tree[selector].spaces.before = trivia,
                }
                break;
            }

            if let Some(kind) = self.peek_combinator() {
                let offset = self.offset();
                let value = self.peek().text(self.source).to_string();
                self.bump();
                let after_start = self.offset();
                while self.peek().is_trivia() {
                    self.bump();
                }
                let after = self.slice(after_start, self.offset());
                let combinator = self.tree.alloc(
                    NodeKind::Combinator { kind, value },
                    Spaces {
                        before: trivia,
                        after,
                    },
                    offset,
                );
                children.push(combinator);
                continue;
            }

            if children.is_empty() {
                leading = trivia;
            } else if !trivia.is_empty() {
                let kind = if has_whitespace {
                    NodeKind::Combinator {
                        kind: CombinatorKind::Descendant,
                        value: trivia,
                    }
                } else {
                    NodeKind::Comment(trivia)
                };
                let node = self.tree.alloc(kind, Spaces::default(), trivia_start);
                children.push(node);
            }

            let node = self.parse_simple_selector()?;
            if children.is_empty() {
                self.tree[node].spaces.before = core::mem::take(&mut leading);
            }
            children.push(node);
        }

        self.tree.set_children(selector, children);
        Ok(selector)
    }

    /// "`<combinator> = '>' | '+' | '~'`"
    fn peek_combinator(&self) -> Option<CombinatorKind> {
        match self.peek_kind() {
            TokenKind::Delim('>') => Some(CombinatorKind::Child),
            TokenKind::Delim('+') => Some(CombinatorKind::NextSibling),
            TokenKind::Delim('~') => Some(CombinatorKind::SubsequentSibling),
            _ => None,
        }
    }

    /// One simple selector, or one raw token sequence kept verbatim.
    fn parse_simple_selector(&mut self) -> Result<NodeId> {
        let offset = self.offset();
        let mut kind = match self.peek_kind() {
            // "A class selector is given as a full stop (. U+002E) immediately
            // followed by an identifier."
            TokenKind::Delim('.') => {
                self.bump();
                if self.peek_kind() == TokenKind::Ident {
                    let name = self.peek().text(self.source).to_string();
                    self.bump();
                    NodeKind::Class(name)
                } else {
                    NodeKind::Class(String::new())
                }
            }
            TokenKind::Hash(_) => {
                let name = self.peek().text(self.source)[1..].to_string();
                self.bump();
                NodeKind::Id(name)
            }
            TokenKind::Delim('#') => {
                self.bump();
                NodeKind::Id(String::new())
            }
            TokenKind::Delim('*') => {
                self.bump();
                NodeKind::Universal
            }
            TokenKind::Delim('&') => {
                self.bump();
                NodeKind::Nesting
            }
            TokenKind::Colon => return self.parse_pseudo(),
            TokenKind::LeftBracket => {
                let end = self.skip_balanced(TokenKind::RightBracket, '[')?;
                NodeKind::Attribute(self.slice(offset, end))
            }
            TokenKind::Function | TokenKind::LeftParen => {
                let end = self.skip_balanced(TokenKind::RightParen, '(')?;
                NodeKind::Tag(self.slice(offset, end))
            }
            TokenKind::RightBracket => {
                return Err(SyntaxError::UnexpectedCloseBracket {
                    bracket: ']',
                    offset,
                });
            }
            TokenKind::String { .. } => {
                let raw = self.peek().text(self.source).to_string();
                self.bump();
                NodeKind::String(raw)
            }
            _ => {
                let raw = self.peek().text(self.source).to_string();
                self.bump();
                NodeKind::Tag(raw)
            }
        };

        // A hex escape swallows one whitespace character. When the compound
        // ends there, that whitespace separates the name from what follows
        // and must stay outside of any wrapper around the name.
        let terminator = match &kind {
            NodeKind::Class(name) | NodeKind::Id(name) if self.at_compound_end() => {
                escape_terminator_start(name)
            }
            _ => None,
        };
        let mut spaces = Spaces::default();
        if let (Some(split), NodeKind::Class(name) | NodeKind::Id(name)) = (terminator, &mut kind) {
            spaces.after = name.split_off(split);
        }
        Ok(self.tree.alloc(kind, spaces, offset))
    }

    fn at_compound_end(&self) -> bool {
        self.peek().is_trivia()
            || self.peek_combinator().is_some()
            || matches!(
                self.peek_kind(),
                TokenKind::Comma | TokenKind::RightParen | TokenKind::Eof
            )
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// "Pseudo-classes are represented by a colon (:) followed by the name of
    /// the pseudo-class and optionally by a value between parentheses."
    fn parse_pseudo(&mut self) -> Result<NodeId> {
        let offset = self.offset();
        self.bump();
        if self.peek_kind() == TokenKind::Colon {
            self.bump();
        }
        let colons = self.slice(offset, self.offset());

        match self.peek_kind() {
            TokenKind::Ident => {
                let value = format!("{colons}{}", self.peek().text(self.source));
                self.bump();
                Ok(self.tree.alloc(
                    NodeKind::Pseudo {
                        value,
                        arguments: false,
                    },
                    Spaces::default(),
                    offset,
                ))
            }
            // A quoted `url(` token also holds the whitespace after the
            // parenthesis; it is kept as a raw tag instead.
            TokenKind::Function if self.peek().text(self.source).ends_with('(') => {
                let open = self.offset();
                let text = self.peek().text(self.source);
                let value = format!("{colons}{}", &text[..text.len() - 1]);
                self.bump();

                self.depth += 1;
                if self.depth > MAX_NESTING_DEPTH {
                    return Err(SyntaxError::NestingTooDeep {
                        limit: MAX_NESTING_DEPTH,
                        offset: open,
                    });
                }
                let pseudo = self.tree.alloc(
                    NodeKind::Pseudo {
                        value,
                        arguments: true,
                    },
                    Spaces::default(),
                    offset,
                );
                self.parse_list(pseudo, true)?;
                if self.peek_kind() != TokenKind::RightParen {
                    return Err(SyntaxError::UnclosedBracket {
                        bracket: '(',
                        offset: open,
                    });
                }
                self.bump();
                self.depth -= 1;
                Ok(pseudo)
            }
            _ => Ok(self
                .tree
                .alloc(NodeKind::Tag(colons), Spaces::default(), offset)),
        }
    }

    /// Skip from an opening token through its matching `close`, returning the
    /// end offset.
    fn skip_balanced(&mut self, close: TokenKind, bracket: char) -> Result<usize> {
        let start = self.offset();
        let mut depth = 0usize;
        loop {
            let kind = self.peek_kind();
            if kind == TokenKind::Eof {
                return Err(SyntaxError::UnclosedBracket {
                    bracket,
                    offset: start,
                });
            }
            let opens = match close {
                TokenKind::RightParen => {
                    matches!(kind, TokenKind::Function | TokenKind::LeftParen)
                }
                _ => kind == TokenKind::LeftBracket,
            };
            if opens {
                depth += 1;
            } else if kind == close {
                depth -= 1;
            }
            let end = self.peek().span.end;
            self.bump();
            if depth == 0 {
                return Ok(end);
            }
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn offset(&self) -> usize {
        self.peek().span.start
    }

    fn bump(&mut self) {
        if !self.peek().is_eof() {
            self.position += 1;
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.source[start..end].to_string()
    }
}

/// Byte offset of the whitespace ending a trailing hex escape in `name`.
///
/// An identifier can only end in whitespace through an escape: either an
/// escaped space (`\ `) or the whitespace consumed after hex digits (`\2b `).
/// Only the latter is a terminator.
fn escape_terminator_start(name: &str) -> Option<usize> {
    let last = name.chars().next_back().filter(char::is_ascii_whitespace)?;
    let body = &name[..name.len() - last.len_utf8()];
    let backslashes = body.len() - body.trim_end_matches('\\').len();
    (backslashes % 2 == 0).then_some(body.len())
}
