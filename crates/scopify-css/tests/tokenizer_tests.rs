//! Integration tests for the CSS tokenizer.

use scopify_css::tokenizer::{HashType, Token, TokenKind, tokenize};

/// Helper to get the kinds of the tokens of a string
fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).into_iter().map(|token| token.kind).collect()
}

/// Helper to get the source text of each token
fn texts(input: &str) -> Vec<String> {
    tokenize(input)
        .iter()
        .map(|token: &Token| token.text(input).to_string())
        .collect()
}

#[test]
fn test_whitespace() {
    let tokens = kinds("   \t\n  ");
    assert_eq!(tokens, vec![TokenKind::Whitespace, TokenKind::Eof]);
}

#[test]
fn test_ident_and_function() {
    assert_eq!(
        kinds("color rgb("),
        vec![
            TokenKind::Ident,
            TokenKind::Whitespace,
            TokenKind::Function,
            TokenKind::Eof
        ]
    );
    assert_eq!(texts("rgb("), vec!["rgb(", ""]);
}

#[test]
fn test_ident_starting_with_double_hyphen() {
    assert_eq!(kinds("--main-color"), vec![TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn test_hash_types() {
    assert_eq!(kinds("#main")[0], TokenKind::Hash(HashType::Id));
    assert_eq!(kinds("#123")[0], TokenKind::Hash(HashType::Unrestricted));
    assert_eq!(kinds("# ")[0], TokenKind::Delim('#'));
}

#[test]
fn test_class_selector_tokens() {
    assert_eq!(
        kinds(".foo"),
        vec![TokenKind::Delim('.'), TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(kinds("10")[0], TokenKind::Number);
    assert_eq!(kinds("1.5s")[0], TokenKind::Dimension);
    assert_eq!(kinds("50%")[0], TokenKind::Percentage);
    assert_eq!(kinds(".5")[0], TokenKind::Number);
    assert_eq!(kinds("-2px")[0], TokenKind::Dimension);
    assert_eq!(kinds("+3")[0], TokenKind::Number);
    assert_eq!(texts("1e3px"), vec!["1e3px", ""]);
}

#[test]
fn test_sign_delims() {
    assert_eq!(
        kinds("a + b"),
        vec![
            TokenKind::Ident,
            TokenKind::Whitespace,
            TokenKind::Delim('+'),
            TokenKind::Whitespace,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
    assert_eq!(kinds("-")[0], TokenKind::Delim('-'));
}

#[test]
fn test_strings() {
    assert_eq!(
        kinds("\"hello\"")[0],
        TokenKind::String { terminated: true }
    );
    assert_eq!(
        kinds("'open")[0],
        TokenKind::String { terminated: false }
    );
    assert_eq!(kinds("'line\nbreak'")[0], TokenKind::BadString);
}

#[test]
fn test_url_token() {
    assert_eq!(kinds("url(a.png)")[0], TokenKind::Url { terminated: true });
    assert_eq!(texts("url( a.png )")[0], "url( a.png )");
    assert_eq!(kinds("url(a b)")[0], TokenKind::BadUrl);
}

#[test]
fn test_quoted_url_is_function() {
    let tokens = kinds("url( 'a.png')");
    assert_eq!(tokens[0], TokenKind::Function);
    assert_eq!(texts("url( 'a.png')")[0], "url( ");
    assert_eq!(tokens[1], TokenKind::String { terminated: true });
    assert_eq!(tokens[2], TokenKind::RightParen);
}

#[test]
fn test_comments_are_tokens() {
    assert_eq!(
        kinds("a/* note */b"),
        vec![
            TokenKind::Ident,
            TokenKind::Comment { terminated: true },
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
    assert_eq!(kinds("/* open")[0], TokenKind::Comment { terminated: false });
}

#[test]
fn test_cdo_cdc() {
    assert_eq!(
        kinds("<!-- -->"),
        vec![
            TokenKind::Cdo,
            TokenKind::Whitespace,
            TokenKind::Cdc,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_at_keyword() {
    assert_eq!(texts("@keyframes")[0], "@keyframes");
    assert_eq!(kinds("@keyframes")[0], TokenKind::AtKeyword);
    assert_eq!(kinds("@ ")[0], TokenKind::Delim('@'));
}

#[test]
fn test_escapes_stay_in_ident() {
    assert_eq!(texts(".a\\:b")[1], "a\\:b");
    assert_eq!(kinds("\\31 a")[0], TokenKind::Ident);
}

#[test]
fn test_spans_cover_input() {
    let input = ".a:not(.b) > #c { color: red; /* é */ }";
    let joined: String = texts(input).concat();
    assert_eq!(joined, input);
}

#[test]
fn test_non_ascii_ident() {
    assert_eq!(texts(".héllo")[1], "héllo");
}
