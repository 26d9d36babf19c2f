//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! "The output of the tokenization step is a stream of zero or more of the
//! following tokens: `<ident-token>`, `<function-token>`, `<at-keyword-token>`,
//! `<hash-token>`, `<string-token>`, `<bad-string-token>`, `<url-token>`,
//! `<bad-url-token>`, `<delim-token>`, `<number-token>`, `<percentage-token>`,
//! `<dimension-token>`, `<whitespace-token>`, `<CDO-token>`, `<CDC-token>`,
//! `<colon-token>`, `<semicolon-token>`, `<comma-token>`, `<[-token>`,
//! `<]-token>`, `<(-token>`, `<)-token>`, `<{-token>`, and `<}-token>`."
//!
//! Tokens do not own their text. Every token records the byte range it covers
//! in the source, and comments are kept as tokens, so the concatenation of all
//! token slices is the original input.

use core::fmt;
use core::ops::Range;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// The kind of a token. Payload-free apart from what the parsers need to
/// branch on; names and values are read back from the source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// "`<ident-token>`"
    Ident,
    /// "`<function-token>`", the span covers the name and the `(`
    Function,
    /// "`<at-keyword-token>`"
    AtKeyword,
    /// "`<hash-token>`"
    Hash(HashType),
    /// "`<string-token>`", including its quotes
    String {
        /// False when EOF was reached before the closing quote.
        terminated: bool,
    },
    /// "`<bad-string-token>`"
    BadString,
    /// "`<url-token>`", the span covers `url(` through `)`
    Url {
        /// False when EOF was reached before the closing parenthesis.
        terminated: bool,
    },
    /// "`<bad-url-token>`"
    BadUrl,
    /// "`<delim-token>`"
    Delim(char),
    /// "`<number-token>`"
    Number,
    /// "`<percentage-token>`"
    Percentage,
    /// "`<dimension-token>`"
    Dimension,
    /// "`<whitespace-token>`"
    Whitespace,
    /// A `/* ... */` comment.
    Comment {
        /// False when EOF was reached before `*/`.
        terminated: bool,
    },
    /// "`<CDO-token>`"
    Cdo,
    /// "`<CDC-token>`"
    Cdc,
    /// "`<colon-token>`"
    Colon,
    /// "`<semicolon-token>`"
    Semicolon,
    /// "`<comma-token>`"
    Comma,
    /// `<[-token>`
    LeftBracket,
    /// `<]-token>`
    RightBracket,
    /// `<(-token>`
    LeftParen,
    /// `<)-token>`
    RightParen,
    /// `<{-token>`
    LeftBrace,
    /// `<}-token>`
    RightBrace,
    /// End of file
    Eof,
}

/// A token together with the byte range of the source it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Byte range in the tokenized source.
    pub span: Range<usize>,
}

impl Token {
    /// The raw source text of this token.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// Returns true if this is the EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true for whitespace and comments.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::Comment { .. }
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident => write!(f, "<ident>"),
            Self::Function => write!(f, "<function>"),
            Self::AtKeyword => write!(f, "<at-keyword>"),
            Self::Hash(HashType::Id) => write!(f, "<hash (id)>"),
            Self::Hash(HashType::Unrestricted) => write!(f, "<hash (unrestricted)>"),
            Self::String { .. } => write!(f, "<string>"),
            Self::BadString => write!(f, "<bad-string>"),
            Self::Url { .. } => write!(f, "<url>"),
            Self::BadUrl => write!(f, "<bad-url>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number => write!(f, "<number>"),
            Self::Percentage => write!(f, "<percentage>"),
            Self::Dimension => write!(f, "<dimension>"),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::Comment { .. } => write!(f, "<comment>"),
            Self::Cdo => write!(f, "<CDO>"),
            Self::Cdc => write!(f, "<CDC>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
            Self::Eof => write!(f, "<EOF>"),
        }
    }
}
