//! Animation name localization.
//!
//! [CSS Animations Level 1 § 3.10 The animation shorthand](https://www.w3.org/TR/css-animations-1/#animation)
//!
//! "Note that order is also important within each animation definition for
//! distinguishing animation-name values from other keywords. When parsing,
//! keywords that are valid for properties other than animation-name whose
//! values were not found earlier in the shorthand must be accepted for those
//! properties rather than for animation-name."
//!
//! The shorthand is resolved by counting keyword occurrences per comma
//! separated entry: a keyword becomes a name once it has been seen more often
//! than its property can absorb.

use std::collections::HashMap;

use scopify_css::values::{ValueKind, ValueNode};

use crate::declaration::DeclarationScope;
use crate::error::ScopeKeyword;
use crate::url::rewrite_url_function;

/// Keywords of the animation longhands, with how many earlier occurrences
/// they tolerate before an occurrence is read as the name.
const ANIMATION_KEYWORDS: &[(&str, usize)] = &[
    // animation-direction
    ("normal", 1),
    ("reverse", 1),
    ("alternate", 1),
    ("alternate-reverse", 1),
    // animation-fill-mode
    ("forwards", 1),
    ("backwards", 1),
    ("both", 1),
    // animation-iteration-count
    ("infinite", 1),
    // animation-play-state
    ("paused", 1),
    ("running", 1),
    // animation-timing-function
    ("ease", 1),
    ("ease-in", 1),
    ("ease-out", 1),
    ("ease-in-out", 1),
    ("linear", 1),
    ("step-end", 1),
    ("step-start", 1),
    // never a name
    ("none", usize::MAX),
    ("initial", usize::MAX),
    ("inherit", usize::MAX),
    ("unset", usize::MAX),
    ("revert", usize::MAX),
    ("revert-layer", usize::MAX),
];

/// CSS-wide keywords and `none`, which are never animation names.
const RESERVED_NAMES: &[&str] = &[
    "none",
    "inherit",
    "initial",
    "revert",
    "revert-layer",
    "unset",
];

/// How a function inside an animation value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionRole {
    /// `var()`, `env()`, and already scoped `:local()`/`:global()`.
    Opaque,
    /// `local(name)` or `global(name)`.
    Scoped(ScopeKeyword),
    /// `url()`.
    Url,
    /// `steps()`; its direct arguments are never names.
    Steps,
    /// Anything else; its arguments are walked.
    Transparent,
}

fn function_role(node: &ValueNode) -> Option<FunctionRole> {
    let name = node.function_name()?.to_ascii_lowercase();
    let role = match name.as_str() {
        "var" | "env" | ":local" | ":global" => FunctionRole::Opaque,
        "local" => FunctionRole::Scoped(ScopeKeyword::Local),
        "global" => FunctionRole::Scoped(ScopeKeyword::Global),
        "url" => FunctionRole::Url,
        "steps" => FunctionRole::Steps,
        _ => FunctionRole::Transparent,
    };
    Some(role)
}

fn arguments_mut(node: &mut ValueNode) -> Option<&mut Vec<ValueNode>> {
    match &mut node.kind {
        ValueKind::Function { nodes, .. } => Some(nodes),
        _ => None,
    }
}

/// Replace `local(name)` with `:local(name)` and `global(name)` with `name`.
///
/// Only a single word argument is unwrapped; anything else is left alone.
fn unwrap_scoped(node: &mut ValueNode, keyword: ScopeKeyword) {
    let ValueKind::Function { nodes, .. } = &node.kind else {
        return;
    };
    let [argument] = nodes.as_slice() else {
        return;
    };
    let Some(name) = argument.as_word() else {
        return;
    };
    let value = match keyword {
        ScopeKeyword::Local => format!(":local({name})"),
        ScopeKeyword::Global => name.to_string(),
    };
    node.kind = ValueKind::Word { value };
}

/// Whether `word` is a CSS identifier that can name an animation.
///
/// Matches `-?([a-z_]|non-ASCII|\escape|-(?!digit))([a-z0-9_-]|non-ASCII|\escape)*`
/// ignoring ASCII case.
pub fn is_identifier(word: &str) -> bool {
    identifier_body(word) || word.strip_prefix('-').is_some_and(identifier_body)
}

fn identifier_body(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    match chars.next() {
        Some('\\') => {
            if !consume_escape(&mut chars) {
                return false;
            }
        }
        Some('-') => {
            if chars.peek().is_some_and(char::is_ascii_digit) {
                return false;
            }
        }
        Some(c) if c.is_ascii_alphabetic() || c == '_' || !c.is_ascii() => {}
        _ => return false,
    }
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if !consume_escape(&mut chars) {
                    return false;
                }
            }
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii() => {}
            _ => return false,
        }
    }
    true
}

fn consume_escape(chars: &mut impl Iterator<Item = char>) -> bool {
    chars
        .next()
        .is_some_and(|c| !matches!(c, '\r' | '\n' | '\u{c}'))
}

fn keyword_tolerance(lowercase: &str) -> Option<usize> {
    ANIMATION_KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == lowercase)
        .map(|&(_, tolerance)| tolerance)
}

fn is_reserved_name(word: &str) -> bool {
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Wrap `word` in `:local(...)` unless the scope is global or it is an alias.
fn localize_word(word: &mut String, scope: &DeclarationScope<'_>) {
    if scope.global || scope.aliases.contains(word.as_str()) {
        return;
    }
    *word = format!(":local({word})");
}

/// Localize the names in an `animation` shorthand value.
///
/// Keyword counts start over at every `,` or `/` divider the walk
/// crosses, including the ones inside function arguments.
pub fn localize_animation_shorthand(nodes: &mut [ValueNode], scope: &DeclarationScope<'_>) {
    let mut seen = HashMap::new();
    walk_shorthand(nodes, scope, &mut seen, true);
}

fn walk_shorthand(
    nodes: &mut [ValueNode],
    scope: &DeclarationScope<'_>,
    seen: &mut HashMap<String, usize>,
    candidates: bool,
) {
    for node in nodes {
        let role = function_role(node);
        if matches!(
            role,
            Some(FunctionRole::Opaque | FunctionRole::Scoped(_) | FunctionRole::Url)
        ) && contains_div(node)
        {
            seen.clear();
        }
        match role {
            Some(FunctionRole::Opaque) => {}
            Some(FunctionRole::Scoped(keyword)) => unwrap_scoped(node, keyword),
            Some(FunctionRole::Url) => rewrite_url_function(node, scope),
            Some(FunctionRole::Steps) => {
                if let Some(arguments) = arguments_mut(node) {
                    walk_shorthand(arguments, scope, seen, false);
                }
            }
            Some(FunctionRole::Transparent) => {
                if let Some(arguments) = arguments_mut(node) {
                    walk_shorthand(arguments, scope, seen, true);
                }
            }
            None => match &mut node.kind {
                ValueKind::Div { .. } => seen.clear(),
                ValueKind::Word { value } if candidates => {
                    if is_animation_name(value, seen) {
                        localize_word(value, scope);
                    }
                }
                _ => {}
            },
        }
    }
}

/// Whether a function's arguments contain a divider at any depth.
fn contains_div(node: &ValueNode) -> bool {
    match &node.kind {
        ValueKind::Function { nodes, .. } => nodes
            .iter()
            .any(|node| matches!(node.kind, ValueKind::Div { .. }) || contains_div(node)),
        _ => false,
    }
}

/// Classify one shorthand word, counting keyword occurrences in `seen`.
fn is_animation_name(word: &str, seen: &mut HashMap<String, usize>) -> bool {
    if !is_identifier(word) {
        return false;
    }
    let lowercase = word.to_ascii_lowercase();
    match keyword_tolerance(&lowercase) {
        Some(tolerance) => {
            let count = seen
                .entry(lowercase)
                .and_modify(|count| *count += 1)
                .or_insert(0);
            *count >= tolerance
        }
        None => true,
    }
}

/// Localize every name in an `animation-name` value.
pub fn localize_animation_names(nodes: &mut [ValueNode], scope: &DeclarationScope<'_>) {
    for node in nodes {
        match function_role(node) {
            Some(FunctionRole::Opaque) => {}
            Some(FunctionRole::Scoped(keyword)) => unwrap_scoped(node, keyword),
            Some(FunctionRole::Url) => rewrite_url_function(node, scope),
            Some(FunctionRole::Steps | FunctionRole::Transparent) => {
                if let Some(arguments) = arguments_mut(node) {
                    localize_animation_names(arguments, scope);
                }
            }
            None => {
                if let ValueKind::Word { value } = &mut node.kind {
                    if !is_reserved_name(value) {
                        localize_word(value, scope);
                    }
                }
            }
        }
    }
}
