//! [Interoperable CSS](https://github.com/css-modules/icss) imports.
//!
//! ```css
//! :import("./colors.css") {
//!   primary: __imported_primary_0;
//! }
//! ```
//!
//! The declaration names of an `:import(...)` block are aliases for imported
//! values; they stand for names that are already scoped elsewhere.

use std::collections::HashSet;

use scopify_css::parser::{Node, Stylesheet};

/// Whether a rule selector is an `:import(...)` block.
fn is_import_rule(selector: &str) -> bool {
    selector
        .get(..":import(".len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(":import("))
        && selector.ends_with(')')
}

/// Collect the alias names declared by top-level `:import(...)` rules.
pub fn collect_import_aliases(sheet: &Stylesheet) -> HashSet<String> {
    let mut aliases = HashSet::new();
    for node in &sheet.nodes {
        let Node::Rule(rule) = node else {
            continue;
        };
        if !is_import_rule(&rule.selector) {
            continue;
        }
        for child in &rule.block.nodes {
            if let Node::Declaration(declaration) = child {
                let _ = aliases.insert(declaration.prop.clone());
            }
        }
    }
    aliases
}
