//! `url(...)` rewriting.
//!
//! Each string or word argument of a `url(...)` function is handed to the
//! configured [`UrlRewriter`](crate::UrlRewriter) together with the scope of
//! the declaration. The result is escaped for the quoting it is written back
//! into.

use scopify_css::values::{ValueKind, ValueNode};

use crate::declaration::DeclarationScope;

/// Walk a value and rewrite every `url(...)`, skipping `var()` and `env()`.
pub fn rewrite_urls(nodes: &mut [ValueNode], scope: &DeclarationScope<'_>) {
    for node in nodes {
        let Some(name) = node.function_name() else {
            continue;
        };
        if name.eq_ignore_ascii_case("url") {
            rewrite_url_function(node, scope);
        } else if !(name.eq_ignore_ascii_case("var") || name.eq_ignore_ascii_case("env")) {
            if let ValueKind::Function { nodes: arguments, .. } = &mut node.kind {
                rewrite_urls(arguments, scope);
            }
        }
    }
}

/// Rewrite the arguments of one `url(...)` node.
///
/// Does nothing when no rewriter is configured or `node` is not a function.
pub fn rewrite_url_function(node: &mut ValueNode, scope: &DeclarationScope<'_>) {
    let Some(rewrite) = scope.rewrite_url else {
        return;
    };
    let ValueKind::Function { nodes, .. } = &mut node.kind else {
        return;
    };
    for argument in nodes {
        match &mut argument.kind {
            ValueKind::String { quote, value, .. } => {
                let rewritten = rewrite(scope.global, value);
                *value = escape_string(&rewritten, *quote);
            }
            ValueKind::Word { value } => {
                let rewritten = rewrite(scope.global, value);
                *value = escape_word(&rewritten);
            }
            _ => {}
        }
    }
}

/// Escape backslashes and the surrounding quote character.
fn escape_string(url: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        if c == '\\' || c == quote {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape the characters that would end or corrupt an unquoted url.
fn escape_word(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        if matches!(c, '"' | '\'' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
