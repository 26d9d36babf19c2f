//! Integration tests for selector tree parsing and serialization.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use scopify_css::error::SyntaxError;
use scopify_css::selector::{CombinatorKind, NodeId, NodeKind, SelectorTree};

/// Helper to get the node kinds of the first complex selector
fn first_selector_kinds(tree: &SelectorTree) -> Vec<NodeKind> {
    tree.children(tree.selectors()[0])
        .iter()
        .map(|&id| tree[id].kind.clone())
        .collect()
}

#[test]
fn test_parse_class() {
    let tree = SelectorTree::parse(".foo").unwrap();
    assert_eq!(tree.selectors().len(), 1);
    assert_eq!(first_selector_kinds(&tree), vec![NodeKind::Class("foo".into())]);
}

#[test]
fn test_parse_compound() {
    let tree = SelectorTree::parse("div.a#b*").unwrap();
    assert_eq!(
        first_selector_kinds(&tree),
        vec![
            NodeKind::Tag("div".into()),
            NodeKind::Class("a".into()),
            NodeKind::Id("b".into()),
            NodeKind::Universal,
        ]
    );
}

#[test]
fn test_escape_terminator_moves_after_name() {
    let tree = SelectorTree::parse("#u-m\\00002b , .a\\2b > .b").unwrap();
    let first = tree.children(tree.selectors()[0])[0];
    assert_eq!(tree[first].kind, NodeKind::Id("u-m\\00002b".into()));
    assert_eq!(tree[first].spaces.after, " ");

    let second = tree.children(tree.selectors()[1])[0];
    assert_eq!(tree[second].kind, NodeKind::Class("a\\2b".into()));
    assert_eq!(tree.to_string(), "#u-m\\00002b , .a\\2b > .b");
}

#[test]
fn test_escape_terminator_inside_compound() {
    let tree = SelectorTree::parse(".a\\2b .b").unwrap();
    assert_eq!(
        first_selector_kinds(&tree),
        vec![NodeKind::Class("a\\2b ".into()), NodeKind::Class("b".into())]
    );
}

#[test]
fn test_escaped_space_stays_in_name() {
    let tree = SelectorTree::parse(".a\\ ").unwrap();
    assert_eq!(first_selector_kinds(&tree), vec![NodeKind::Class("a\\ ".into())]);
}

#[test]
fn test_descendant_combinator_keeps_whitespace() {
    let tree = SelectorTree::parse(".a \n .b").unwrap();
    assert_eq!(
        first_selector_kinds(&tree),
        vec![
            NodeKind::Class("a".into()),
            NodeKind::Combinator {
                kind: CombinatorKind::Descendant,
                value: " \n ".into(),
            },
            NodeKind::Class("b".into()),
        ]
    );
}

#[test]
fn test_child_combinator_spaces() {
    let tree = SelectorTree::parse(".a  >  .b").unwrap();
    let parts = tree.children(tree.selectors()[0]);
    assert_eq!(parts.len(), 3);
    let combinator = &tree[parts[1]];
    assert_eq!(
        combinator.kind,
        NodeKind::Combinator {
            kind: CombinatorKind::Child,
            value: ">".into(),
        }
    );
    assert_eq!(combinator.spaces.before, "  ");
    assert_eq!(combinator.spaces.after, "  ");
    assert!(!tree.is_spacing(parts[1]));
}

#[test]
fn test_selector_list_spaces() {
    let tree = SelectorTree::parse(".a, .b ").unwrap();
    assert_eq!(tree.selectors().len(), 2);
    let second = tree.children(tree.selectors()[1])[0];
    assert_eq!(tree[second].spaces.before, " ");
    assert_eq!(tree[second].spaces.after, " ");
    assert_eq!(tree.to_string(), ".a, .b ");
}

#[test]
fn test_pseudo_with_arguments() {
    let tree = SelectorTree::parse(":not(.a, .b)").unwrap();
    let pseudo = tree.children(tree.selectors()[0])[0];
    assert_eq!(
        tree[pseudo].kind,
        NodeKind::Pseudo {
            value: ":not".into(),
            arguments: true,
        }
    );
    assert_eq!(tree.children(pseudo).len(), 2);
    assert!(matches!(tree[tree.children(pseudo)[0]].kind, NodeKind::Selector));
}

#[test]
fn test_pseudo_without_arguments() {
    let tree = SelectorTree::parse("a:hover::before").unwrap();
    assert_eq!(
        first_selector_kinds(&tree),
        vec![
            NodeKind::Tag("a".into()),
            NodeKind::Pseudo {
                value: ":hover".into(),
                arguments: false,
            },
            NodeKind::Pseudo {
                value: "::before".into(),
                arguments: false,
            },
        ]
    );
}

#[test]
fn test_empty_pseudo_arguments() {
    let tree = SelectorTree::parse(":global()").unwrap();
    let pseudo = tree.children(tree.selectors()[0])[0];
    let arguments = tree.children(pseudo);
    assert_eq!(arguments.len(), 1);
    assert!(tree.children(arguments[0]).is_empty());
    assert_eq!(tree.to_string(), ":global()");
}

#[test]
fn test_pseudo_argument_whitespace() {
    let tree = SelectorTree::parse(":local( .a )").unwrap();
    let pseudo = tree.children(tree.selectors()[0])[0];
    let class = tree.children(tree.children(pseudo)[0])[0];
    assert_eq!(tree[class].spaces.before, " ");
    assert_eq!(tree[class].spaces.after, " ");
}

#[test]
fn test_attribute_and_nesting() {
    let tree = SelectorTree::parse("&[data-x='1']").unwrap();
    assert_eq!(
        first_selector_kinds(&tree),
        vec![NodeKind::Nesting, NodeKind::Attribute("[data-x='1']".into())]
    );
}

#[test]
fn test_comment_between_compounds() {
    let tree = SelectorTree::parse(".a/* c */.b").unwrap();
    assert_eq!(
        first_selector_kinds(&tree),
        vec![
            NodeKind::Class("a".into()),
            NodeKind::Comment("/* c */".into()),
            NodeKind::Class("b".into()),
        ]
    );
}

#[test]
fn test_empty_class_name() {
    let tree = SelectorTree::parse(".").unwrap();
    assert_eq!(first_selector_kinds(&tree), vec![NodeKind::Class(String::new())]);
}

#[test]
fn test_source_index() {
    let tree = SelectorTree::parse(".a .b").unwrap();
    let parts = tree.children(tree.selectors()[0]);
    assert_eq!(tree[parts[0]].source_index, 0);
    assert_eq!(tree[parts[2]].source_index, 3);
}

#[test]
fn test_round_trip() {
    let inputs = [
        ".a",
        "  .a  ",
        ".a .b > .c + .d ~ .e",
        ".a,.b ,  .c",
        ":global .a :local(.b)",
        ":not( .a ,.b ) ::before",
        "a[href^='http'] > b:nth-child(2n + 1)",
        "@media",
        ".a\\:b",
        "/* x */ .a /* y */",
        ":global(.a .b, .c)",
        ".a:is(div, :where(.b))",
    ];
    for input in inputs {
        let tree = SelectorTree::parse(input).unwrap();
        assert_eq!(tree.to_string(), input, "round trip of {input:?}");
    }
}

#[test]
fn test_unclosed_paren() {
    let err = SelectorTree::parse(":not(.a").unwrap_err();
    assert_eq!(
        err,
        SyntaxError::UnclosedBracket {
            bracket: '(',
            offset: 1,
        }
    );
}

#[test]
fn test_unexpected_close_paren() {
    let err = SelectorTree::parse(".a)").unwrap_err();
    assert_eq!(
        err,
        SyntaxError::UnexpectedCloseBracket {
            bracket: ')',
            offset: 2,
        }
    );
}

#[test]
fn test_unclosed_attribute() {
    let err = SelectorTree::parse("[x").unwrap_err();
    assert!(matches!(err, SyntaxError::UnclosedBracket { bracket: '[', offset: 0 }));
}

#[test]
fn test_nesting_too_deep() {
    let input = ":not(".repeat(300);
    let err = SelectorTree::parse(&input).unwrap_err();
    assert!(matches!(err, SyntaxError::NestingTooDeep { limit: 256, .. }));
}

#[test]
fn test_node_to_string() {
    let tree = SelectorTree::parse(".a, :not(.b)").unwrap();
    let second = tree.selectors()[1];
    assert_eq!(tree.node_to_string(second), " :not(.b)");
    assert_eq!(tree.node_to_string(NodeId::ROOT), ".a, :not(.b)");
}

/// Selector text assembled from fragments that exercise every node kind.
#[derive(Debug, Clone)]
struct SelectorSource(String);

impl Arbitrary for SelectorSource {
    fn arbitrary(g: &mut Gen) -> Self {
        const FRAGMENTS: &[&str] = &[
            ".a", ".b", "#c", "div", "*", "&", ":global", ":local", ":not(", ":global(",
            "::before", ")", ",", " ", "\n", ">", "+", "~", "[x=y]", "/* c */", "'s'", ".",
        ];
        let len = usize::arbitrary(g) % 12;
        let mut source = String::new();
        for _ in 0..len {
            if let Some(fragment) = g.choose(FRAGMENTS) {
                source.push_str(fragment);
            }
        }
        Self(source)
    }
}

#[quickcheck]
fn prop_parse_then_print_is_identity(source: SelectorSource) -> bool {
    match SelectorTree::parse(&source.0) {
        Ok(tree) => tree.to_string() == source.0,
        Err(_) => true,
    }
}
