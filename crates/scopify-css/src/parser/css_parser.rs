//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! The tree produced here is lossless: every node keeps the raw text around
//! it (`before`, `between`, `after`, ...) so that printing an untouched
//! [`Stylesheet`] reproduces the input byte for byte. Selectors, at-rule
//! preludes, and declaration values are kept as raw strings; the selector and
//! value codecs parse them on demand.

use core::fmt;

use scopify_common::warning::warn_once;

use crate::error::{MAX_NESTING_DEPTH, Result, SyntaxError};
use crate::tokenizer::{Token, TokenKind, tokenize};

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    /// Top-level rules, at-rules, and comments in source order.
    pub nodes: Vec<Node>,
    /// Whitespace after the last node.
    pub after: String,
}

/// One entry of a stylesheet or of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A qualified rule such as `.a { ... }`, possibly nested.
    Rule(Rule),
    /// An at-rule such as `@media screen { ... }` or `@charset "utf-8";`.
    AtRule(AtRule),
    /// A declaration such as `color: red`.
    Declaration(Declaration),
    /// A `/* ... */` comment standing on its own.
    Comment(Comment),
}

/// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
///
/// The contents of a `{ ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Child nodes in source order.
    pub nodes: Vec<Node>,
    /// Whitespace between the last child and the closing brace.
    pub after: String,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Whitespace before the selector.
    pub before: String,
    /// The raw selector text, without surrounding whitespace.
    pub selector: String,
    /// Whitespace between the selector and `{`.
    pub between: String,
    /// The rule body.
    pub block: Block,
    /// Byte offset of the selector in the stylesheet source.
    pub offset: usize,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Whitespace before the `@`.
    pub before: String,
    /// The at-keyword name without the `@`.
    pub name: String,
    /// Whitespace between the name and the prelude.
    pub after_name: String,
    /// The raw prelude, without surrounding whitespace.
    pub params: String,
    /// Whitespace between the prelude and `{` or `;`.
    pub between: String,
    /// The body, if the at-rule has one.
    pub block: Option<Block>,
    /// Whether the at-rule was terminated by `;`.
    pub semicolon: bool,
    /// Byte offset of the `@` in the stylesheet source.
    pub offset: usize,
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Whitespace before the property name.
    pub before: String,
    /// The property name as written.
    pub prop: String,
    /// Everything between the property name and the value, colon included.
    pub between: String,
    /// The raw value, without `!important` and trailing whitespace.
    pub value: String,
    /// The raw `!important` suffix including the whitespace before it.
    pub important: Option<String>,
    /// Whitespace between the value and the terminating `;` or `}`.
    pub trailing: String,
    /// Whether the declaration was terminated by `;`.
    pub semicolon: bool,
    /// Byte offset of the property name in the stylesheet source.
    pub offset: usize,
}

/// A comment between rules or declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Whitespace before the comment.
    pub before: String,
    /// The comment including its `/*` and `*/` delimiters.
    pub text: String,
    /// Byte offset of the comment in the stylesheet source.
    pub offset: usize,
}

impl Block {
    /// Iterate the declarations that are direct children of this block.
    pub fn declarations_mut(&mut self) -> impl Iterator<Item = &mut Declaration> {
        self.nodes.iter_mut().filter_map(|node| match node {
            Node::Declaration(declaration) => Some(declaration),
            _ => None,
        })
    }
}

/// Parse a complete stylesheet.
///
/// # Errors
///
/// Returns a [`SyntaxError`] for unbalanced braces, text that is neither a
/// rule nor a declaration, or blocks nested deeper than [`MAX_NESTING_DEPTH`].
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet> {
    CSSParser::new(source).parse_stylesheet()
}

/// CSS parser
pub struct CSSParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl<'a> CSSParser<'a> {
    /// Create a new parser, tokenizing `source` up front.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            position: 0,
            depth: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// # Errors
    ///
    /// See [`parse_stylesheet`].
    pub fn parse_stylesheet(&mut self) -> Result<Stylesheet> {
        let (nodes, after) = self.consume_list_of_items(true)?;
        Ok(Stylesheet { nodes, after })
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// Blocks may mix declarations, nested rules, and at-rules, so the same
    /// loop serves the top level and every block.
    fn consume_list_of_items(&mut self, top_level: bool) -> Result<(Vec<Node>, String)> {
        let mut nodes = Vec::new();

        loop {
            let before_start = self.offset();
            while matches!(
                self.peek_kind(),
                TokenKind::Whitespace | TokenKind::Semicolon | TokenKind::Cdo | TokenKind::Cdc
            ) {
                self.bump();
            }
            let before = self.slice(before_start, self.offset());

            match self.peek_kind() {
                TokenKind::Eof => return Ok((nodes, before)),
                TokenKind::RightBrace if top_level => {
                    return Err(SyntaxError::UnexpectedCloseBrace {
                        offset: self.offset(),
                    });
                }
                TokenKind::RightBrace => return Ok((nodes, before)),
                TokenKind::Comment { .. } => {
                    let offset = self.offset();
                    let text = self.peek().text(self.source).to_string();
                    self.bump();
                    nodes.push(Node::Comment(Comment {
                        before,
                        text,
                        offset,
                    }));
                }
                TokenKind::AtKeyword => nodes.push(Node::AtRule(self.consume_at_rule(before)?)),
                _ => nodes.push(self.consume_rule_or_declaration(before)?),
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
    fn consume_at_rule(&mut self, before: String) -> Result<AtRule> {
        let offset = self.offset();
        let name = self.peek().text(self.source)[1..].to_string();
        self.bump();

        let after_name_start = self.offset();
        self.skip_whitespace();
        let after_name = self.slice(after_name_start, self.offset());

        // "Consume a component value" until `;`, `{`, or the end of the
        // enclosing block; that is the prelude.
        let params_start = self.offset();
        let terminator = self.find_terminator(false);
        let params_end = self.last_content_end(self.position, terminator);
        let params = self.slice(params_start, params_end);
        let between = self.slice(params_end, self.tokens[terminator].span.start);
        self.position = terminator;

        let mut block = None;
        let mut semicolon = false;
        match self.peek_kind() {
            TokenKind::LeftBrace => block = Some(self.consume_block()?),
            TokenKind::Semicolon => {
                self.bump();
                semicolon = true;
            }
            _ => {}
        }

        Ok(AtRule {
            before,
            name,
            after_name,
            params,
            between,
            block,
            semicolon,
            offset,
        })
    }

    /// Decide between a declaration and a nested qualified rule.
    ///
    /// Custom properties are always declarations, even when their value holds
    /// a `{}` block. Anything else is a rule iff a `{` comes before the first
    /// `;` or `}` at parenthesis depth zero.
    fn consume_rule_or_declaration(&mut self, before: String) -> Result<Node> {
        if self.at_custom_property() {
            return self.consume_declaration(before, true).map(Node::Declaration);
        }

        let terminator = self.find_terminator(false);
        if self.tokens[terminator].kind == TokenKind::LeftBrace {
            self.consume_qualified_rule(before, terminator).map(Node::Rule)
        } else {
            self.consume_declaration(before, false).map(Node::Declaration)
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
    fn consume_qualified_rule(&mut self, before: String, brace: usize) -> Result<Rule> {
        let offset = self.offset();
        let selector_end = self.last_content_end(self.position, brace);
        let selector = self.slice(offset, selector_end);
        let between = self.slice(selector_end, self.tokens[brace].span.start);
        self.position = brace;
        let block = self.consume_block()?;

        Ok(Rule {
            before,
            selector,
            between,
            block,
            offset,
        })
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// The current token must be `{`.
    fn consume_block(&mut self) -> Result<Block> {
        let open = self.offset();
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                offset: open,
            });
        }
        self.bump();

        let (nodes, after) = self.consume_list_of_items(false)?;
        if self.peek_kind() != TokenKind::RightBrace {
            return Err(SyntaxError::UnclosedBlock { offset: open });
        }
        self.bump();
        self.depth -= 1;

        Ok(Block { nodes, after })
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self, before: String, custom: bool) -> Result<Declaration> {
        let offset = self.offset();

        // "Consume the next input token. Create a new declaration with its name
        // set to the value of the current input token."
        if self.peek_kind() != TokenKind::Ident {
            return Err(self.unknown_word(offset));
        }
        let prop = self.peek().text(self.source).to_string();
        self.bump();

        // "While the next input token is a <whitespace-token>, consume the next
        // input token."
        // "If the next input token is anything other than a <colon-token>, this is
        // a parse error."
        let between_start = self.offset();
        while self.peek().is_trivia() {
            self.bump();
        }
        if self.peek_kind() != TokenKind::Colon {
            return Err(self.unknown_word(offset));
        }
        self.bump();
        self.skip_whitespace();
        let value_start = self.offset();
        let between = self.slice(between_start, value_start);

        let terminator = self.find_terminator(custom);
        let content: Vec<usize> = (self.position..terminator)
            .filter(|&index| self.tokens[index].kind != TokenKind::Whitespace)
            .collect();
        for &index in &content {
            let token = &self.tokens[index];
            if matches!(token.kind, TokenKind::BadString | TokenKind::BadUrl) {
                let _ = warn_once(
                    "css",
                    &format!("kept malformed {} in `{prop}` verbatim", token.kind),
                );
            }
        }
        let value_end = content
            .last()
            .map_or(value_start, |&index| self.tokens[index].span.end);

        // [§ 5.4.6](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
        //
        // "If the last two non-<whitespace-token>s in the declaration's value are
        // a <delim-token> with the value "!" followed by an <ident-token> with a
        // value that is an ASCII case-insensitive match for "important", remove
        // them from the declaration's value and set the declaration's important
        // flag to true."
        let mut raw_value_end = value_end;
        let mut important = None;
        if let [rest @ .., bang, last] = content.as_slice() {
            let bang_token = &self.tokens[*bang];
            let last_token = &self.tokens[*last];
            if bang_token.kind == TokenKind::Delim('!')
                && last_token.kind == TokenKind::Ident
                && last_token
                    .text(self.source)
                    .eq_ignore_ascii_case("important")
            {
                raw_value_end = rest
                    .last()
                    .map_or(value_start, |&index| self.tokens[index].span.end);
                important = Some(self.slice(raw_value_end, value_end));
            }
        }

        let value = self.slice(value_start, raw_value_end);
        let trailing = self.slice(value_end, self.tokens[terminator].span.start);
        self.position = terminator;
        let semicolon = self.peek_kind() == TokenKind::Semicolon;
        if semicolon {
            self.bump();
        }

        Ok(Declaration {
            before,
            prop,
            between,
            value,
            important,
            trailing,
            semicolon,
            offset,
        })
    }

    /// `--name` followed by optional whitespace and a colon.
    fn at_custom_property(&self) -> bool {
        let token = self.peek();
        if token.kind != TokenKind::Ident || !token.text(self.source).starts_with("--") {
            return false;
        }
        self.tokens[self.position + 1..]
            .iter()
            .find(|token| token.kind != TokenKind::Whitespace)
            .is_some_and(|token| token.kind == TokenKind::Colon)
    }

    /// Index of the first `;`, `{`, `}`, or EOF at parenthesis depth zero,
    /// starting at the current position. With `nest_braces`, `{}` pairs are
    /// skipped as well.
    fn find_terminator(&self, nest_braces: bool) -> usize {
        let mut depth = 0usize;
        let mut index = self.position;
        loop {
            match self.tokens[index].kind {
                TokenKind::Eof => return index,
                TokenKind::Function | TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::LeftBrace if nest_braces => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::RightBrace if nest_braces && depth > 0 => depth -= 1,
                TokenKind::Semicolon | TokenKind::LeftBrace | TokenKind::RightBrace
                    if depth == 0 =>
                {
                    return index;
                }
                _ => {}
            }
            index += 1;
        }
    }

    /// End offset of the last non-whitespace token in `from..to`, or the start
    /// of `from` when there is none.
    fn last_content_end(&self, from: usize, to: usize) -> usize {
        self.tokens[from..to]
            .iter()
            .rev()
            .find(|token| token.kind != TokenKind::Whitespace)
            .map_or(self.tokens[from].span.start, |token| token.span.end)
    }

    fn unknown_word(&self, offset: usize) -> SyntaxError {
        let terminator = self.find_terminator(false);
        let end = self.tokens[terminator].span.start.max(offset);
        SyntaxError::UnknownWord {
            word: self.source[offset..end].trim().to_string(),
            offset,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_kind() == TokenKind::Whitespace {
            self.bump();
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

    /// Advance past the current token; EOF is never passed.
    fn bump(&mut self) {
        if !self.peek().is_eof() {
            self.position += 1;
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.source[start..end].to_string()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        f.write_str(&self.after)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        write!(f, "{}}}", self.after)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(rule) => write!(
                f,
                "{}{}{}{}",
                rule.before, rule.selector, rule.between, rule.block
            ),
            Self::AtRule(at_rule) => {
                write!(
                    f,
                    "{}@{}{}{}{}",
                    at_rule.before,
                    at_rule.name,
                    at_rule.after_name,
                    at_rule.params,
                    at_rule.between
                )?;
                if let Some(block) = &at_rule.block {
                    write!(f, "{block}")?;
                }
                if at_rule.semicolon {
                    f.write_str(";")?;
                }
                Ok(())
            }
            Self::Declaration(declaration) => {
                write!(
                    f,
                    "{}{}{}{}{}{}",
                    declaration.before,
                    declaration.prop,
                    declaration.between,
                    declaration.value,
                    declaration.important.as_deref().unwrap_or_default(),
                    declaration.trailing
                )?;
                if declaration.semicolon {
                    f.write_str(";")?;
                }
                Ok(())
            }
            Self::Comment(comment) => write!(f, "{}{}", comment.before, comment.text),
        }
    }
}
