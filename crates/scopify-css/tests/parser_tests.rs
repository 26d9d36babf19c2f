//! Integration tests for the lossless stylesheet parser.

use scopify_css::error::SyntaxError;
use scopify_css::parser::{Node, parse_stylesheet};

/// Helper to parse and print a stylesheet
fn round_trip(input: &str) -> String {
    parse_stylesheet(input).unwrap().to_string()
}

#[test]
fn test_round_trip_preserves_formatting() {
    let inputs = [
        "",
        "   ",
        ".a { color: red; }",
        ".a{color:red}",
        "\n.a ,\n.b {\n  color : red ;\n  margin: 0 !important\n}\n",
        "@charset \"utf-8\";\n.a {}",
        "@media (min-width: 100px) {\n  .a { color: red }\n}",
        "@keyframes fade { from { opacity: 0 } to { opacity: 1 } }",
        "/* leading */\n.a { /* inner */ color: red; }\n/* trailing */",
        ".a { --custom: { a: b }; color: blue }",
        ".a { &:hover { color: red } .b & { color: blue } }",
        ".a { background: url(data:image/png;base64,xyz) }",
        ".a { content: \"}\"; }",
        ";;.a { color: red;; }",
        "<!-- .a { color: red } -->",
        "@import url(foo.css) screen;",
        "@font-face { font-family: x; src: local(Arial) }",
    ];
    for input in inputs {
        assert_eq!(round_trip(input), input, "round trip of {input:?}");
    }
}

#[test]
fn test_rule_fields() {
    let sheet = parse_stylesheet("\n.a .b  { color: red }").unwrap();
    assert_eq!(sheet.nodes.len(), 1);
    let Node::Rule(rule) = &sheet.nodes[0] else {
        panic!("Expected rule");
    };
    assert_eq!(rule.before, "\n");
    assert_eq!(rule.selector, ".a .b");
    assert_eq!(rule.between, "  ");
    assert_eq!(rule.offset, 1);
    assert_eq!(rule.block.nodes.len(), 1);
    assert_eq!(rule.block.after, "");
    let Node::Declaration(declaration) = &rule.block.nodes[0] else {
        panic!("Expected declaration");
    };
    assert_eq!(declaration.trailing, " ");
    assert!(!declaration.semicolon);
}

#[test]
fn test_declaration_fields() {
    let sheet = parse_stylesheet(".a { color : red  !IMPORTANT ; }").unwrap();
    let Node::Rule(rule) = &sheet.nodes[0] else {
        panic!("Expected rule");
    };
    let Node::Declaration(declaration) = &rule.block.nodes[0] else {
        panic!("Expected declaration");
    };
    assert_eq!(declaration.before, " ");
    assert_eq!(declaration.prop, "color");
    assert_eq!(declaration.between, " : ");
    assert_eq!(declaration.value, "red");
    assert_eq!(declaration.important.as_deref(), Some("  !IMPORTANT"));
    assert_eq!(declaration.trailing, " ");
    assert!(declaration.semicolon);
}

#[test]
fn test_at_rule_fields() {
    let sheet = parse_stylesheet("@keyframes  :global(fade) { }").unwrap();
    let Node::AtRule(at_rule) = &sheet.nodes[0] else {
        panic!("Expected at-rule");
    };
    assert_eq!(at_rule.name, "keyframes");
    assert_eq!(at_rule.after_name, "  ");
    assert_eq!(at_rule.params, ":global(fade)");
    assert_eq!(at_rule.between, " ");
    assert!(at_rule.block.is_some());
    assert!(!at_rule.semicolon);
}

#[test]
fn test_statement_at_rule() {
    let sheet = parse_stylesheet("@import \"a.css\";").unwrap();
    let Node::AtRule(at_rule) = &sheet.nodes[0] else {
        panic!("Expected at-rule");
    };
    assert_eq!(at_rule.params, "\"a.css\"");
    assert!(at_rule.block.is_none());
    assert!(at_rule.semicolon);
}

#[test]
fn test_nested_rule_inside_rule() {
    let sheet = parse_stylesheet(".a { color: red; .b { color: blue } }").unwrap();
    let Node::Rule(rule) = &sheet.nodes[0] else {
        panic!("Expected rule");
    };
    assert!(matches!(rule.block.nodes[0], Node::Declaration(_)));
    assert!(matches!(rule.block.nodes[1], Node::Rule(_)));
}

#[test]
fn test_pseudo_class_in_nested_rule_is_rule() {
    let sheet = parse_stylesheet(".a { &:hover { color: red } }").unwrap();
    let Node::Rule(rule) = &sheet.nodes[0] else {
        panic!("Expected rule");
    };
    let Node::Rule(nested) = &rule.block.nodes[0] else {
        panic!("Expected nested rule");
    };
    assert_eq!(nested.selector, "&:hover");
}

#[test]
fn test_custom_property_with_braces_is_declaration() {
    let sheet = parse_stylesheet(".a { --x: { b: c }; }").unwrap();
    let Node::Rule(rule) = &sheet.nodes[0] else {
        panic!("Expected rule");
    };
    let Node::Declaration(declaration) = &rule.block.nodes[0] else {
        panic!("Expected declaration");
    };
    assert_eq!(declaration.prop, "--x");
    assert_eq!(declaration.value, "{ b: c }");
}

#[test]
fn test_declarations_mut() {
    let mut sheet = parse_stylesheet(".a { color: red; .b {} margin: 0 }").unwrap();
    let Node::Rule(rule) = &mut sheet.nodes[0] else {
        panic!("Expected rule");
    };
    for declaration in rule.block.declarations_mut() {
        declaration.value = "inherit".to_string();
    }
    assert_eq!(
        sheet.to_string(),
        ".a { color: inherit; .b {} margin: inherit }"
    );
}

#[test]
fn test_comment_node() {
    let sheet = parse_stylesheet("/* a */ .b {}").unwrap();
    let Node::Comment(comment) = &sheet.nodes[0] else {
        panic!("Expected comment");
    };
    assert_eq!(comment.text, "/* a */");
}

#[test]
fn test_unclosed_block() {
    let err = parse_stylesheet(".a { color: red").unwrap_err();
    assert_eq!(err, SyntaxError::UnclosedBlock { offset: 3 });
}

#[test]
fn test_unexpected_close_brace() {
    let err = parse_stylesheet(".a {} }").unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedCloseBrace { offset: 6 });
}

#[test]
fn test_unknown_word() {
    let err = parse_stylesheet(".a { 12px; }").unwrap_err();
    assert!(matches!(err, SyntaxError::UnknownWord { ref word, offset: 5 } if word == "12px"));

    let err = parse_stylesheet(".a { color red }").unwrap_err();
    assert!(matches!(err, SyntaxError::UnknownWord { .. }));
}

#[test]
fn test_nesting_too_deep() {
    let input = format!("{}{}", ".a {".repeat(300), "}".repeat(300));
    let err = parse_stylesheet(&input).unwrap_err();
    assert!(matches!(err, SyntaxError::NestingTooDeep { limit: 256, .. }));
}

#[test]
fn test_nesting_at_limit_is_accepted() {
    let input = format!("{}{}", ".a {".repeat(256), "}".repeat(256));
    assert_eq!(round_trip(&input), input);
}
