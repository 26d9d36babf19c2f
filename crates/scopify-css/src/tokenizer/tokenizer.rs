use super::token::{HashType, Token, TokenKind};

/// Tokenize `input` completely. The last token is always [`TokenKind::Eof`].
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification, with
/// two deviations needed for lossless rewriting: comments are produced as
/// tokens, and every token carries its byte span.
pub struct CSSTokenizer {
    /// The input being tokenized, one entry per code point
    input: Vec<char>,
    /// Byte offset of each code point, plus the total length at the end
    offsets: Vec<usize>,
    /// Current position in `input`
    position: usize,
    /// Collected tokens
    tokens: Vec<Token>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut offsets = Vec::with_capacity(input.len() + 1);
        for (offset, c) in input.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        offsets.push(input.len());
        Self {
            input: chars,
            offsets,
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Repeatedly consume tokens until EOF.
    pub fn run(&mut self) {
        loop {
            let start = self.position;
            let kind = self.consume_token();
            let token = Token {
                kind,
                span: self.offsets[start]..self.offsets[self.position],
            };
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> TokenKind {
        if self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            return self.consume_comment();
        }

        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return TokenKind::Eof;
        };

        match c {
            // "whitespace"
            c if is_whitespace(c) => {
                self.consume_whitespace();
                TokenKind::Whitespace
            }

            '"' | '\'' => self.consume_string_token(c),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type = if self.would_start_ident_sequence() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    self.consume_ident_sequence();
                    TokenKind::Hash(hash_type)
                } else {
                    TokenKind::Delim('#')
                }
            }

            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,

            // "U+002B PLUS SIGN (+)" and "U+002E FULL STOP (.)"
            '+' | '.' => {
                self.reconsume();
                // "If the input stream starts with a number, reconsume the current
                // input code point, consume a numeric token, and return it."
                if self.would_start_number() {
                    self.consume_numeric_token()
                } else {
                    let _ = self.consume();
                    TokenKind::Delim(c)
                }
            }

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                self.reconsume();
                if self.would_start_number() {
                    self.consume_numeric_token()
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek_at(1) == Some('-') && self.peek_at(2) == Some('>') {
                    self.advance(3);
                    TokenKind::Cdc
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if self.would_start_ident_sequence() {
                    self.consume_ident_like_token()
                } else {
                    let _ = self.consume();
                    TokenKind::Delim('-')
                }
            }

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    self.advance(3);
                    TokenKind::Cdo
                } else {
                    TokenKind::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                if self.would_start_ident_sequence() {
                    self.consume_ident_sequence();
                    TokenKind::AtKeyword
                } else {
                    TokenKind::Delim('@')
                }
            }

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    // "This is a parse error."
                    TokenKind::Delim('\\')
                }
            }

            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            c => TokenKind::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Consumes a single comment, up to and including `*/` or EOF.
    fn consume_comment(&mut self) -> TokenKind {
        self.advance(2);
        loop {
            match self.consume() {
                Some('*') if self.peek() == Some('/') => {
                    let _ = self.consume();
                    return TokenKind::Comment { terminated: true };
                }
                Some(_) => {}
                None => return TokenKind::Comment { terminated: false },
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> TokenKind {
        loop {
            match self.consume() {
                Some(c) if c == ending_code_point => {
                    return TokenKind::String { terminated: true };
                }
                // "EOF: This is a parse error. Return the <string-token>."
                None => return TokenKind::String { terminated: false },
                // "newline: This is a parse error. Reconsume the current input code
                // point, create a <bad-string-token>, and return it."
                Some('\n' | '\r' | '\x0C') => {
                    self.reconsume();
                    return TokenKind::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => self.consume_escaped_code_point(),
                },
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> TokenKind {
        self.consume_number();

        if self.would_start_ident_sequence() {
            self.consume_ident_sequence();
            TokenKind::Dimension
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            TokenKind::Percentage
        } else {
            TokenKind::Number
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> TokenKind {
        let start = self.position;
        self.consume_ident_sequence();
        let is_url = self.input[start..self.position]
            .iter()
            .collect::<String>()
            .eq_ignore_ascii_case("url");

        // "If string's value is an ASCII case-insensitive match for 'url', and the
        // next input code point is U+0028 LEFT PARENTHESIS (()"
        if is_url && self.peek() == Some('(') {
            let _ = self.consume();
            self.consume_whitespace();

            // "If the next one or two input code points are U+0022 QUOTATION MARK
            // (") or U+0027 APOSTROPHE ('), return a <function-token>."
            if matches!(self.peek(), Some('"' | '\'')) {
                TokenKind::Function
            } else {
                self.consume_url_token()
            }
        } else if self.peek() == Some('(') {
            let _ = self.consume();
            TokenKind::Function
        } else {
            TokenKind::Ident
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> TokenKind {
        loop {
            match self.consume() {
                Some(')') => return TokenKind::Url { terminated: true },
                None => return TokenKind::Url { terminated: false },
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            let _ = self.consume();
                            TokenKind::Url { terminated: true }
                        }
                        None => TokenKind::Url { terminated: false },
                        Some(_) => {
                            self.consume_bad_url_remnants();
                            TokenKind::BadUrl
                        }
                    };
                }
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return TokenKind::BadUrl;
                }
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        self.consume_escaped_code_point();
                    } else {
                        self.consume_bad_url_remnants();
                        return TokenKind::BadUrl;
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) {
        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => {
                    let _ = self.consume();
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    let _ = self.consume();
                    self.consume_escaped_code_point();
                }
                _ => return,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Only the extent matters here; the numeric value is never needed.
    fn consume_number(&mut self) {
        if matches!(self.peek(), Some('+' | '-')) {
            let _ = self.consume();
        }
        self.consume_digits();

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance(2);
            self.consume_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_offset = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_offset).is_some_and(|c| c.is_ascii_digit()) {
                self.advance(digit_offset + 1);
                self.consume_digits();
            }
        }
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Assumes the backslash has already been consumed.
    fn consume_escaped_code_point(&mut self) {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                // "Consume as many hex digits as possible, but no more than 5."
                for _ in 0..5 {
                    if self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        let _ = self.consume();
                    } else {
                        break;
                    }
                }
                // "If the next input code point is whitespace, consume it as well."
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
            }
            Some(_) | None => {}
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        let first = self.peek();
        let second = self.peek_at(1);
        match first {
            Some('-') => {
                second.is_some_and(is_ident_start_code_point)
                    || second == Some('-')
                    || is_valid_escape(second, self.peek_at(2))
            }
            Some('\\') => is_valid_escape(first, second),
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self) -> bool {
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match self.peek() {
            Some('+' | '-') => {
                is_digit(self.peek_at(1))
                    || (self.peek_at(1) == Some('.') && is_digit(self.peek_at(2)))
            }
            Some('.') => is_digit(self.peek_at(1)),
            c => is_digit(c),
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.input.len());
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
const fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    matches!(first, Some('\\')) && !matches!(second, Some('\n' | '\r' | '\x0C') | None)
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
#[must_use]
pub const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
#[must_use]
pub const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
