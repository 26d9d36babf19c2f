//! `@scope` preludes.
//!
//! [CSS Cascading Level 6 § 2.5 Scoping Styles: the @scope rule](https://www.w3.org/TR/css-cascade-6/#scoped-styles)
//!
//! "@scope [(<scope-start>)]? [to (<scope-end>)]? { <block-contents> }"
//!
//! Both selector lists are resolved like rule selectors and the prelude is
//! written back as `(<start>) to (<end>)`.

use scopify_css::tokenizer::{Token, TokenKind, tokenize};

/// The selector lists of an `@scope` prelude, untrimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopePrelude<'a> {
    /// The scoping root, `(<scope-start>)`.
    pub start: Option<&'a str>,
    /// The scoping limit, `to (<scope-end>)`.
    pub end: Option<&'a str>,
}

/// Whether an at-rule name is `scope`, possibly vendor-prefixed.
pub fn is_scope(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with("scope")
}

/// Split a prelude into its selector lists.
///
/// Returns `None` for an empty prelude or one that does not have the
/// `(...) to (...)` shape.
pub fn parse_prelude(params: &str) -> Option<ScopePrelude<'_>> {
    let tokens = tokenize(params);
    let mut cursor = Cursor {
        source: params,
        tokens: &tokens,
        pos: 0,
    };

    cursor.skip_trivia();
    let start = if cursor.peek_kind() == TokenKind::LeftParen {
        Some(cursor.group()?)
    } else {
        None
    };

    cursor.skip_trivia();
    let end = match cursor.peek_kind() {
        TokenKind::Ident if cursor.peek_text().eq_ignore_ascii_case("to") => {
            cursor.pos += 1;
            cursor.skip_trivia();
            if cursor.peek_kind() != TokenKind::LeftParen {
                return None;
            }
            Some(cursor.group()?)
        }
        TokenKind::Function if cursor.peek_text().eq_ignore_ascii_case("to(") => {
            Some(cursor.group()?)
        }
        _ => None,
    };

    cursor.skip_trivia();
    if cursor.peek_kind() != TokenKind::Eof || (start.is_none() && end.is_none()) {
        return None;
    }
    Some(ScopePrelude { start, end })
}

/// Write a prelude back from resolved selector lists.
pub fn print_prelude(start: Option<&str>, end: Option<&str>) -> String {
    let mut params = String::new();
    if let Some(start) = start {
        params.push('(');
        params.push_str(start);
        params.push(')');
    }
    if let Some(end) = end {
        if !params.is_empty() {
            params.push(' ');
        }
        params.push_str("to (");
        params.push_str(end);
        params.push(')');
    }
    params
}

struct Cursor<'a, 't> {
    source: &'a str,
    tokens: &'t [Token],
    pos: usize,
}

impl<'a, 't> Cursor<'a, 't> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::Eof, |token| token.kind)
    }

    fn peek_text(&self) -> &'a str {
        self.peek().map_or("", |token| token.text(self.source))
    }

    fn skip_trivia(&mut self) {
        while self.peek().is_some_and(Token::is_trivia) {
            self.pos += 1;
        }
    }

    /// Consume a parenthesized group opened by the current `(` or function
    /// token and return the text between the parentheses.
    fn group(&mut self) -> Option<&'a str> {
        let open = self.peek()?;
        let content_start = open.span.end;
        self.pos += 1;
        let mut depth = 1usize;
        while let Some(token) = self.peek() {
            self.pos += 1;
            match token.kind {
                TokenKind::LeftParen | TokenKind::Function => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.source.get(content_start..token.span.start);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }
}
