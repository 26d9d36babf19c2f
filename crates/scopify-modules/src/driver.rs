//! The stylesheet transform.
//!
//! Runs in two passes over the tree:
//!
//! 1. At-rules, in document order: `@keyframes` names and bodies, `@scope`
//!    preludes, and the declarations placed directly in any at-rule block.
//! 2. Qualified rules, in document order: selectors and their direct
//!    declarations. Rules directly inside `@keyframes` are keyframe selectors
//!    and are skipped.
//!
//! The transform works on a copy and only replaces the caller's stylesheet
//! once every rule has been processed, so a failed transform leaves the input
//! untouched.

use std::collections::HashSet;

use scopify_common::warning::warn_once;
use scopify_css::parser::{AtRule, Block, Node, Rule, Stylesheet, parse_stylesheet};
use scopify_css::selector::SelectorTree;

use crate::at_scope::{is_scope, parse_prelude, print_prelude};
use crate::declaration::{DeclarationScope, localize_declaration};
use crate::error::{Error, Result};
use crate::icss::collect_import_aliases;
use crate::keyframes::{is_keyframes, localize_keyframes};
use crate::options::{Mode, Options};
use crate::resolver::{ResolveContext, resolve};

/// Local-by-default scoping of a stylesheet.
///
/// # Example
///
/// ```
/// use scopify_css::parse_stylesheet;
/// use scopify_modules::{LocalByDefault, Options};
///
/// let mut sheet = parse_stylesheet(".foo { animation-name: bar; }").unwrap();
/// LocalByDefault::new(Options::new()).process(&mut sheet).unwrap();
/// assert_eq!(sheet.to_string(), ":local(.foo) { animation-name: :local(bar); }");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalByDefault {
    options: Options,
}

/// Where a rule sits, as far as pass 2 cares.
#[derive(Debug, Clone, Copy)]
struct RuleParent {
    in_keyframes: bool,
    rule_pure: bool,
}

impl LocalByDefault {
    /// Create a transform with the given options.
    #[must_use]
    pub const fn new(options: Options) -> Self {
        Self { options }
    }

    /// The configured options.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Scope `sheet` in place.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error`] raised by any rule or at-rule; `sheet` is
    /// left unchanged in that case.
    pub fn process(&self, sheet: &mut Stylesheet) -> Result<()> {
        let aliases = collect_import_aliases(sheet);
        let mut working = sheet.clone();
        self.process_at_rules(&mut working.nodes, &aliases)?;
        self.process_rules(
            &mut working.nodes,
            RuleParent {
                in_keyframes: false,
                rule_pure: false,
            },
            &aliases,
        )?;
        *sheet = working;
        Ok(())
    }

    const fn ambient_global(&self) -> bool {
        self.options.mode.is_global()
    }

    fn declaration_scope<'a>(
        &'a self,
        global: bool,
        aliases: &'a HashSet<String>,
    ) -> DeclarationScope<'a> {
        DeclarationScope {
            global,
            aliases,
            rewrite_url: self.options.rewrite_url.as_ref(),
        }
    }

    fn process_at_rules(&self, nodes: &mut [Node], aliases: &HashSet<String>) -> Result<()> {
        for node in nodes {
            match node {
                Node::AtRule(at_rule) => self.process_at_rule(at_rule, aliases)?,
                Node::Rule(rule) => self.process_at_rules(&mut rule.block.nodes, aliases)?,
                Node::Declaration(_) | Node::Comment(_) => {}
            }
        }
        Ok(())
    }

    fn process_at_rule(&self, at_rule: &mut AtRule, aliases: &HashSet<String>) -> Result<()> {
        if is_keyframes(&at_rule.name) {
            let keyframes = localize_keyframes(&at_rule.params, self.options.mode, aliases)?;
            log::debug!(
                target: "scopify",
                "@{} {} -> {}",
                at_rule.name,
                at_rule.params,
                keyframes.params
            );
            at_rule.params = keyframes.params;
            if let Some(block) = &mut at_rule.block {
                let scope = self.declaration_scope(keyframes.global, aliases);
                localize_nested_declarations(block, &scope)?;
            }
            return Ok(());
        }

        if is_scope(&at_rule.name) {
            self.process_scope_prelude(at_rule, aliases)?;
        }
        if let Some(block) = &mut at_rule.block {
            let scope = self.declaration_scope(self.ambient_global(), aliases);
            for declaration in block.declarations_mut() {
                localize_declaration(declaration, &scope)?;
            }
            self.process_at_rules(&mut block.nodes, aliases)?;
        }
        Ok(())
    }

    fn process_scope_prelude(&self, at_rule: &mut AtRule, aliases: &HashSet<String>) -> Result<()> {
        if at_rule.params.is_empty() {
            return Ok(());
        }
        let Some(prelude) = parse_prelude(&at_rule.params) else {
            let _ = warn_once(
                "modules",
                &format!("unrecognized @{} prelude `{}`", at_rule.name, at_rule.params),
            );
            return Ok(());
        };
        let start = prelude
            .start
            .map(|selector| self.resolve_prelude_selector(selector, aliases))
            .transpose()?;
        let end = prelude
            .end
            .map(|selector| self.resolve_prelude_selector(selector, aliases))
            .transpose()?;
        let params = print_prelude(start.as_deref(), end.as_deref());
        log::debug!(target: "scopify", "@{} {} -> {params}", at_rule.name, at_rule.params);
        at_rule.params = params;
        Ok(())
    }

    fn resolve_prelude_selector(&self, selector: &str, aliases: &HashSet<String>) -> Result<String> {
        let selector = selector.trim();
        let tree = SelectorTree::parse(selector)?;
        let context = ResolveContext {
            aliases,
            parent_rule_pure: false,
        };
        let (resolved, resolution) = resolve(&tree, self.ambient_global(), context)?;
        if self.options.mode == Mode::Pure && resolution.has_pure_globals {
            return Err(Error::NotPureAtRuleSelector {
                selector: selector.to_string(),
            });
        }
        Ok(resolved.to_string().trim().to_string())
    }

    fn process_rules(
        &self,
        nodes: &mut [Node],
        parent: RuleParent,
        aliases: &HashSet<String>,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Rule(rule) => {
                    if parent.in_keyframes {
                        continue;
                    }
                    let rule_pure = self.process_rule(rule, parent.rule_pure, aliases)?;
                    self.process_rules(
                        &mut rule.block.nodes,
                        RuleParent {
                            in_keyframes: false,
                            rule_pure,
                        },
                        aliases,
                    )?;
                }
                Node::AtRule(at_rule) => {
                    let in_keyframes = is_keyframes(&at_rule.name);
                    if let Some(block) = &mut at_rule.block {
                        self.process_rules(
                            &mut block.nodes,
                            RuleParent {
                                in_keyframes,
                                ..parent
                            },
                            aliases,
                        )?;
                    }
                }
                Node::Declaration(_) | Node::Comment(_) => {}
            }
        }
        Ok(())
    }

    /// Resolve one rule's selector and its direct declarations.
    ///
    /// Returns whether the rule is pure.
    fn process_rule(
        &self,
        rule: &mut Rule,
        parent_rule_pure: bool,
        aliases: &HashSet<String>,
    ) -> Result<bool> {
        let tree = SelectorTree::parse(&rule.selector)?;
        let context = ResolveContext {
            aliases,
            parent_rule_pure,
        };
        let (resolved, resolution) = resolve(&tree, self.ambient_global(), context)?;
        if self.options.mode == Mode::Pure && resolution.has_pure_globals {
            return Err(Error::NotPureSelector {
                selector: rule.selector.clone(),
            });
        }

        let selector = resolved.to_string();
        log::debug!(target: "scopify", "{} -> {selector}", rule.selector);
        rule.selector = selector;

        let scope = self.declaration_scope(resolution.global, aliases);
        for declaration in rule.block.declarations_mut() {
            localize_declaration(declaration, &scope)?;
        }
        Ok(!resolution.has_pure_globals)
    }
}

/// Localize every declaration inside `block`, at any depth.
fn localize_nested_declarations(block: &mut Block, scope: &DeclarationScope<'_>) -> Result<()> {
    for node in &mut block.nodes {
        match node {
            Node::Declaration(declaration) => localize_declaration(declaration, scope)?,
            Node::Rule(rule) => localize_nested_declarations(&mut rule.block, scope)?,
            Node::AtRule(at_rule) => {
                if let Some(block) = &mut at_rule.block {
                    localize_nested_declarations(block, scope)?;
                }
            }
            Node::Comment(_) => {}
        }
    }
    Ok(())
}

/// Parse, scope, and print a stylesheet.
///
/// # Errors
///
/// Returns [`Error::Syntax`] when `css` cannot be parsed, or the first
/// scoping error.
///
/// # Example
///
/// ```
/// use scopify_modules::{Mode, Options, transform};
///
/// let options = Options::new().with_mode(Mode::Global);
/// assert_eq!(transform(".foo :local(.bar) {}", &options).unwrap(), ".foo :local(.bar) {}");
/// ```
pub fn transform(css: &str, options: &Options) -> Result<String> {
    let mut sheet = parse_stylesheet(css)?;
    LocalByDefault::new(options.clone()).process(&mut sheet)?;
    Ok(sheet.to_string())
}
