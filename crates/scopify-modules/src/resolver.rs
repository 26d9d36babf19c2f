//! Selector scope resolution.
//!
//! [CSS Modules: Naming](https://github.com/css-modules/css-modules#naming)
//!
//! Rewrites a parsed selector list so that every class and id in local scope
//! is wrapped in `:local(...)`, while `:global(...)` arguments and the parts
//! after a broad `:global` keyword are emitted bare.
//!
//! The walk threads one [`Alternative`] state through the nodes of each comma
//! separated alternative. A broad keyword (`:local` / `:global` without
//! parentheses) switches the scope for the rest of its alternative and is
//! removed together with one adjacent descendant combinator; a narrow keyword
//! (`:local(...)` / `:global(...)`) is replaced by its resolved argument.
//!
//! The input tree is never modified. The result is built in a fresh arena.

use std::collections::HashSet;

use scopify_css::selector::{CombinatorKind, NodeId, NodeKind, SelectorTree, Spaces};

use crate::error::{Error, Result, ScopeKeyword, Side};

/// Outcome of resolving a selector list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the alternatives ended in global scope.
    pub global: bool,
    /// Whether some alternative contains no local class or id.
    pub has_pure_globals: bool,
}

/// What the resolver needs to know about the surrounding stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Names imported through `:import(...)`; kept bare unless explicitly local.
    pub aliases: &'a HashSet<String>,
    /// Whether the nearest enclosing rule resolved pure, which makes `&` count
    /// as a local part.
    pub parent_rule_pure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scope {
    global: bool,
    /// Set by a scope keyword rather than inherited from the mode.
    explicit: bool,
    /// The narrow keyword whose argument is being resolved.
    inside: Option<ScopeKeyword>,
}

/// Whitespace owed by a broad keyword to the next node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    /// The keyword followed whitespace, so whitespace must follow it too.
    FollowSpace(ScopeKeyword),
    /// The keyword was attached to the previous compound; no whitespace may follow.
    ForbidSpace(ScopeKeyword),
}

/// Per-alternative walk state.
#[derive(Debug, Clone, Copy)]
struct Alternative {
    scope: Scope,
    last_was_spacing: bool,
    pending: Pending,
    has_locals: bool,
}

impl Alternative {
    const fn new(scope: Scope) -> Self {
        Self {
            scope,
            last_was_spacing: true,
            pending: Pending::None,
            has_locals: false,
        }
    }
}

/// Resolve the scopes of `input`.
///
/// `initial_global` is the scope unmarked selectors start in. Returns the
/// rewritten tree and the scope the alternatives resolved to.
///
/// # Errors
///
/// - [`Error::InconsistentScope`] when alternatives end in different scopes
/// - [`Error::NestedScope`] for a scope keyword inside `:local(...)`/`:global(...)`
/// - [`Error::MissingWhitespace`] when a broad keyword is not separated properly
/// - [`Error::EmptyScope`] for `:local()`/`:global()`
/// - [`Error::InvalidSyntax`] for a `.` or `#` without a name
pub fn resolve(
    input: &SelectorTree,
    initial_global: bool,
    context: ResolveContext<'_>,
) -> Result<(SelectorTree, Resolution)> {
    let mut resolver = Resolver {
        input,
        output: SelectorTree::new(),
        context,
    };
    let resolution = resolver.resolve_root(initial_global)?;
    Ok((resolver.output, resolution))
}

struct Resolver<'i, 'c> {
    input: &'i SelectorTree,
    output: SelectorTree,
    context: ResolveContext<'c>,
}

impl Resolver<'_, '_> {
    fn resolve_root(&mut self, initial_global: bool) -> Result<Resolution> {
        let input = self.input;
        self.output[NodeId::ROOT]
            .spaces
            .clone_from(&input[input.root()].spaces);

        let mut resolved_global = None;
        let mut has_pure_globals = false;
        for &selector in input.selectors() {
            let mut alternative = Alternative::new(Scope {
                global: initial_global,
                explicit: false,
                inside: None,
            });
            let resolved = self.resolve_selector(selector, &mut alternative)?;
            self.output.append_child(NodeId::ROOT, resolved);

            match resolved_global {
                Some(global) if global != alternative.scope.global => {
                    return Err(Error::InconsistentScope {
                        selector: input.to_string(),
                    });
                }
                Some(_) => {}
                None => resolved_global = Some(alternative.scope.global),
            }
            if !alternative.has_locals {
                has_pure_globals = true;
            }
        }

        Ok(Resolution {
            global: resolved_global.unwrap_or(initial_global),
            has_pure_globals,
        })
    }

    fn resolve_selector(&mut self, id: NodeId, alternative: &mut Alternative) -> Result<NodeId> {
        let nodes = self.resolve_sequence(id, alternative)?;
        let node = &self.input[id];
        let selector = self
            .output
            .alloc(NodeKind::Selector, node.spaces.clone(), node.source_index);
        self.output.set_children(selector, nodes);
        Ok(selector)
    }

    /// Resolve the children of a selector, dropping trailing descendant
    /// combinators left behind by removed keywords.
    fn resolve_sequence(
        &mut self,
        id: NodeId,
        alternative: &mut Alternative,
    ) -> Result<Vec<NodeId>> {
        let input = self.input;
        let mut nodes = Vec::new();
        for &child in input.children(id) {
            nodes.extend(self.resolve_node(child, alternative)?);
        }
        while nodes.last().is_some_and(|&last| self.output.is_spacing(last)) {
            let _ = nodes.pop();
        }
        Ok(nodes)
    }

    fn resolve_node(&mut self, id: NodeId, alternative: &mut Alternative) -> Result<Vec<NodeId>> {
        let input = self.input;
        let spacing = input.is_spacing(id);
        match alternative.pending {
            Pending::FollowSpace(keyword) if !spacing => {
                return Err(Error::MissingWhitespace {
                    keyword,
                    side: Side::After,
                });
            }
            Pending::ForbidSpace(keyword) if spacing => {
                return Err(Error::MissingWhitespace {
                    keyword,
                    side: Side::Before,
                });
            }
            _ => {}
        }

        let resolved = match &input[id].kind {
            NodeKind::Combinator {
                kind: CombinatorKind::Descendant,
                ..
            } => {
                if matches!(alternative.pending, Pending::FollowSpace(_)) {
                    alternative.pending = Pending::None;
                    alternative.last_was_spacing = false;
                    return Ok(Vec::new());
                }
                alternative.last_was_spacing = true;
                return Ok(vec![self.output.clone_subtree(input, id)]);
            }
            NodeKind::Pseudo { value, arguments } => match ScopeKeyword::from_pseudo(value) {
                Some(keyword) if *arguments => self.resolve_narrow_scope(id, keyword, alternative)?,
                Some(keyword) => return self.resolve_broad_scope(id, keyword, alternative),
                None if is_icss_pseudo(value) => {
                    alternative.has_locals = true;
                    vec![self.output.clone_subtree(input, id)]
                }
                None if *arguments => vec![self.resolve_pseudo_arguments(id, alternative)?],
                None => vec![self.output.clone_subtree(input, id)],
            },
            NodeKind::Class(name) | NodeKind::Id(name) => {
                vec![self.resolve_class_or_id(id, name, alternative)?]
            }
            NodeKind::Nesting => {
                alternative.has_locals |= self.context.parent_rule_pure;
                vec![self.output.clone_subtree(input, id)]
            }
            _ => vec![self.output.clone_subtree(input, id)],
        };

        alternative.last_was_spacing = false;
        alternative.pending = Pending::None;
        Ok(resolved)
    }

    /// `:local` / `:global` without parentheses.
    fn resolve_broad_scope(
        &mut self,
        id: NodeId,
        keyword: ScopeKeyword,
        alternative: &mut Alternative,
    ) -> Result<Vec<NodeId>> {
        if let Some(outer) = alternative.scope.inside {
            return Err(Error::NestedScope {
                outer,
                inner: keyword,
            });
        }
        alternative.pending = if alternative.last_was_spacing {
            Pending::FollowSpace(keyword)
        } else {
            Pending::ForbidSpace(keyword)
        };
        alternative.scope.global = keyword.is_global();
        alternative.scope.explicit = true;
        log::trace!(target: "scopify", "broad {keyword} at {}", self.input[id].source_index);

        // The whitespace before the keyword would be lost with it.
        let node = &self.input[id];
        if node.spaces.before.is_empty() {
            return Ok(Vec::new());
        }
        let spacing = self.output.alloc(
            NodeKind::Combinator {
                kind: CombinatorKind::Descendant,
                value: node.spaces.before.clone(),
            },
            Spaces::default(),
            node.source_index,
        );
        Ok(vec![spacing])
    }

    /// `:local(...)` / `:global(...)`, replaced by its resolved arguments.
    fn resolve_narrow_scope(
        &mut self,
        id: NodeId,
        keyword: ScopeKeyword,
        alternative: &mut Alternative,
    ) -> Result<Vec<NodeId>> {
        let input = self.input;
        let arguments = input.children(id);
        if arguments
            .iter()
            .all(|&argument| input.children(argument).is_empty())
        {
            return Err(Error::EmptyScope { keyword });
        }
        if let Some(outer) = alternative.scope.inside {
            return Err(Error::NestedScope {
                outer,
                inner: keyword,
            });
        }

        let mut inner = Alternative {
            scope: Scope {
                global: keyword.is_global(),
                explicit: true,
                inside: Some(keyword),
            },
            last_was_spacing: false,
            pending: Pending::None,
            has_locals: false,
        };
        let mut flattened = Vec::new();
        for &argument in arguments {
            let mut state = Alternative {
                pending: Pending::None,
                ..inner
            };
            flattened.extend(self.resolve_sequence(argument, &mut state)?);
            inner.scope.global = state.scope.global;
            inner.has_locals = state.has_locals;
        }

        let spaces = &input[id].spaces;
        if let Some(&first) = flattened.first() {
            self.output[first].spaces.before.clone_from(&spaces.before);
        }
        if let Some(&last) = flattened.last() {
            self.output[last].spaces.after.clone_from(&spaces.after);
        }
        alternative.has_locals |= inner.has_locals;
        Ok(flattened)
    }

    /// Any other pseudo with arguments, such as `:not(...)` or `:is(...)`.
    ///
    /// Each argument starts in the current scope; a broad keyword in one
    /// argument carries into the following arguments but not out of the
    /// parentheses.
    fn resolve_pseudo_arguments(
        &mut self,
        id: NodeId,
        alternative: &mut Alternative,
    ) -> Result<NodeId> {
        let input = self.input;
        let mut scope = alternative.scope;
        let mut has_locals = false;
        let mut resolved = Vec::new();
        for &argument in input.children(id) {
            let mut state = Alternative {
                scope,
                last_was_spacing: true,
                pending: Pending::None,
                has_locals,
            };
            resolved.push(self.resolve_selector(argument, &mut state)?);
            scope.global = state.scope.global;
            has_locals = state.has_locals;
        }
        alternative.has_locals |= has_locals;

        let node = &input[id];
        let pseudo = self
            .output
            .alloc(node.kind.clone(), node.spaces.clone(), node.source_index);
        self.output.set_children(pseudo, resolved);
        Ok(pseudo)
    }

    fn resolve_class_or_id(
        &mut self,
        id: NodeId,
        name: &str,
        alternative: &mut Alternative,
    ) -> Result<NodeId> {
        if name.is_empty() {
            return Err(Error::InvalidSyntax);
        }
        let input = self.input;
        if alternative.scope.global {
            return Ok(self.output.clone_subtree(input, id));
        }
        if self.context.aliases.contains(name) && !alternative.scope.explicit {
            log::trace!(target: "scopify", "keeping imported name {name}");
            return Ok(self.output.clone_subtree(input, id));
        }

        let node = &input[id];
        let inner = self
            .output
            .alloc(node.kind.clone(), Spaces::default(), node.source_index);
        let argument = self
            .output
            .alloc(NodeKind::Selector, Spaces::default(), node.source_index);
        self.output.append_child(argument, inner);
        let wrapper = self.output.alloc(
            NodeKind::Pseudo {
                value: ScopeKeyword::Local.to_string(),
                arguments: true,
            },
            node.spaces.clone(),
            node.source_index,
        );
        self.output.append_child(wrapper, argument);
        alternative.has_locals = true;
        Ok(wrapper)
    }
}

/// `:import` and `:export` blocks are interchange declarations, kept as written.
fn is_icss_pseudo(value: &str) -> bool {
    value.eq_ignore_ascii_case(":import") || value.eq_ignore_ascii_case(":export")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_str(selector: &str, global: bool) -> Result<(String, Resolution)> {
        let aliases = HashSet::new();
        let tree = SelectorTree::parse(selector).map_err(Error::from)?;
        let context = ResolveContext {
            aliases: &aliases,
            parent_rule_pure: false,
        };
        resolve(&tree, global, context).map(|(tree, resolution)| (tree.to_string(), resolution))
    }

    #[test]
    fn test_input_tree_is_untouched() {
        let aliases = HashSet::new();
        let tree = SelectorTree::parse(".a :global .b").unwrap();
        let before = tree.clone();
        let context = ResolveContext {
            aliases: &aliases,
            parent_rule_pure: false,
        };
        let _ = resolve(&tree, false, context).unwrap();
        assert_eq!(tree, before);
    }

    #[test]
    fn test_resolution_flags() {
        let (output, resolution) = resolve_str(":global .a", false).unwrap();
        assert_eq!(output, ".a");
        assert_eq!(
            resolution,
            Resolution {
                global: true,
                has_pure_globals: true,
            }
        );

        let (_, resolution) = resolve_str(".a", false).unwrap();
        assert!(!resolution.global);
        assert!(!resolution.has_pure_globals);
    }

    #[test]
    fn test_empty_scope() {
        assert_eq!(
            resolve_str(":global()", false),
            Err(Error::EmptyScope {
                keyword: ScopeKeyword::Global,
            })
        );
    }

    #[test]
    fn test_trailing_combinators_are_trimmed() {
        let (output, _) = resolve_str(".bar :global :global", false).unwrap();
        assert_eq!(output, ":local(.bar)");
    }
}
