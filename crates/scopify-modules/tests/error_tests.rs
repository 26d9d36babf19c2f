//! Integration tests for rejected stylesheets and configuration errors.

use scopify_css::{SyntaxError, parse_stylesheet};
use scopify_modules::{Config, Error, LocalByDefault, Mode, Options, ScopeKeyword, Side, transform};

/// Helper to get the error for a stylesheet in local mode
fn error(css: &str) -> Error {
    transform(css, &Options::new()).unwrap_err()
}

#[test]
fn test_missing_whitespace_after_global() {
    let err = error(".foo :global.bar {}");
    assert_eq!(
        err,
        Error::MissingWhitespace {
            keyword: ScopeKeyword::Global,
            side: Side::After,
        }
    );
    assert_eq!(err.to_string(), "Missing whitespace after :global");
}

#[test]
fn test_missing_whitespace_before_local() {
    assert_eq!(
        error(".foo:local .bar {}").to_string(),
        "Missing whitespace before :local"
    );
}

#[test]
fn test_nested_scopes() {
    let cases = [
        (":local(:local(.foo)) {}", "A :local is not allowed inside of a :local(...)"),
        (":global(:global(.foo)) {}", "A :global is not allowed inside of a :global(...)"),
        (":local(:global(.foo)) {}", "A :global is not allowed inside of a :local(...)"),
        (":global(:local(.foo)) {}", "A :local is not allowed inside of a :global(...)"),
        (":global(:local .foo) {}", "A :local is not allowed inside of a :global(...)"),
        (
            ":global(.a:not(:global .b, :global .c)) {}",
            "A :global is not allowed inside of a :global(...)",
        ),
    ];
    for (input, message) in cases {
        assert_eq!(error(input).to_string(), message, "scoping {input:?}");
    }
}

#[test]
fn test_invalid_class_or_id() {
    for input in [". {}", "# {}", ":local(.) {}", ":local(#) {}", ":global(.) {}", ":global(#) {}"] {
        assert_eq!(error(input), Error::InvalidSyntax, "scoping {input:?}");
    }
    assert_eq!(
        Error::InvalidSyntax.to_string(),
        "Invalid class or id selector syntax"
    );
}

#[test]
fn test_inconsistent_rule() {
    let err = error(":global .foo, .bar {}");
    assert_eq!(
        err,
        Error::InconsistentScope {
            selector: ":global .foo, .bar".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Inconsistent rule global/local result in rule \":global .foo, .bar\" (multiple selectors must result in the same mode for the rule)"
    );
}

#[test]
fn test_empty_scope() {
    assert_eq!(error(":global() {}").to_string(), ":global() can't be empty");
    assert_eq!(
        error(".a :local() {}"),
        Error::EmptyScope {
            keyword: ScopeKeyword::Local,
        }
    );
}

#[test]
fn test_invalid_mode() {
    let err = Mode::parse("???").unwrap_err();
    assert!(err.to_string().contains("\"global\", \"local\" or \"pure\""));
    assert_eq!(err, Error::InvalidModeConfig("???".to_string()));
}

#[test]
fn test_config_from_json() {
    let config: Config = serde_json::from_str(r#"{"mode": "pure"}"#).unwrap();
    assert_eq!(config.into_options().unwrap().mode, Mode::Pure);

    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.into_options().unwrap().mode, Mode::Local);

    let config: Config = serde_json::from_str(r#"{"mode": "???"}"#).unwrap();
    assert!(matches!(config.into_options(), Err(Error::InvalidModeConfig(_))));
}

#[test]
fn test_mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Mode::Global).unwrap(), "\"global\"");
}

#[test]
fn test_syntax_error() {
    assert_eq!(
        error(".a { color: red"),
        Error::Syntax(SyntaxError::UnclosedBlock { offset: 3 })
    );
    assert!(matches!(error(".a {} }"), Error::Syntax(_)));
}

#[test]
fn test_nesting_too_deep() {
    let selector = format!("{}.a{}", ":not(".repeat(300), ")".repeat(300));
    assert_eq!(
        error(&format!("{selector} {{}}")),
        Error::NestingTooDeep { limit: 256 }
    );
}

#[test]
fn test_at_rule_error_wins_over_earlier_rule_error() {
    let css = ":global(.a) {} @keyframes :global(b) {}";
    assert_eq!(
        transform(css, &Options::new().with_mode(Mode::Pure)),
        Err(Error::PureKeyframesGlobal)
    );
}

#[test]
fn test_failed_process_leaves_sheet_untouched() {
    let css = ".a {} .b :global.c {}";
    let mut sheet = parse_stylesheet(css).unwrap();
    let result = LocalByDefault::new(Options::new()).process(&mut sheet);
    assert!(result.is_err());
    assert_eq!(sheet.to_string(), css);
}
