//! Errors raised while scoping a stylesheet.
//!
//! Every error aborts the whole transform. Messages name the offending
//! selector or keyword so the hosting build tool can point at the source.

use scopify_css::error::SyntaxError;
use strum_macros::Display;
use thiserror::Error;

/// One of the two scope keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ScopeKeyword {
    /// `:local`
    #[strum(serialize = ":local")]
    Local,
    /// `:global`
    #[strum(serialize = ":global")]
    Global,
}

impl ScopeKeyword {
    /// Match a pseudo name (`:local`, `:GLOBAL`, ...) against the keywords.
    #[must_use]
    pub fn from_pseudo(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case(":local") {
            Some(Self::Local)
        } else if value.eq_ignore_ascii_case(":global") {
            Some(Self::Global)
        } else {
            None
        }
    }

    /// Whether this keyword selects the global scope.
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }
}

/// Which side of a broad scope keyword lacks whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Whitespace was required before the keyword.
    Before,
    /// Whitespace was required after the keyword.
    After,
}

/// A stylesheet that cannot be scoped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The configured mode is not one of `global`, `local`, `pure`.
    #[error("options.mode must be either \"global\", \"local\" or \"pure\" (default \"local\")")]
    InvalidModeConfig(String),

    /// The alternatives of one selector list resolved to different scopes.
    #[error(
        "Inconsistent rule global/local result in rule \"{selector}\" (multiple selectors must result in the same mode for the rule)"
    )]
    InconsistentScope {
        /// The full selector text.
        selector: String,
    },

    /// A scope keyword inside the argument of another.
    #[error("A {inner} is not allowed inside of a {outer}(...)")]
    NestedScope {
        /// The enclosing `:local(...)` or `:global(...)`.
        outer: ScopeKeyword,
        /// The keyword found inside it.
        inner: ScopeKeyword,
    },

    /// A broad scope keyword without the whitespace it needs.
    #[error("Missing whitespace {side} {keyword}")]
    MissingWhitespace {
        /// The keyword.
        keyword: ScopeKeyword,
        /// The side lacking whitespace.
        side: Side,
    },

    /// In pure mode, a rule selector with an alternative that has no local part.
    #[error(
        "Selector \"{selector}\" is not pure (pure selectors must contain at least one local class or id)"
    )]
    NotPureSelector {
        /// The full selector text.
        selector: String,
    },

    /// In pure mode, an at-rule prelude selector with no local part.
    #[error(
        "Selector in at-rule \"{selector}\" is not pure (pure selectors must contain at least one local class or id)"
    )]
    NotPureAtRuleSelector {
        /// The prelude selector text.
        selector: String,
    },

    /// In pure mode, `@keyframes :global(...)`.
    #[error("@keyframes :global(...) is not allowed in pure mode")]
    PureKeyframesGlobal,

    /// A `.` or `#` without a name.
    #[error("Invalid class or id selector syntax")]
    InvalidSyntax,

    /// `:local()` or `:global()` without a selector.
    #[error("{keyword}() can't be empty")]
    EmptyScope {
        /// The keyword.
        keyword: ScopeKeyword,
    },

    /// Input nested deeper than the parsers accept.
    #[error("Nesting deeper than {limit} levels")]
    NestingTooDeep {
        /// The nesting limit.
        limit: usize,
    },

    /// The stylesheet, a selector, or a value could not be parsed.
    #[error("{0}")]
    Syntax(#[source] SyntaxError),
}

impl From<SyntaxError> for Error {
    fn from(error: SyntaxError) -> Self {
        match error {
            SyntaxError::NestingTooDeep { limit, .. } => Self::NestingTooDeep { limit },
            other => Self::Syntax(other),
        }
    }
}

/// Result alias for the scoping transform.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_display() {
        assert_eq!(ScopeKeyword::Local.to_string(), ":local");
        assert_eq!(ScopeKeyword::Global.to_string(), ":global");
        assert_eq!(Side::After.to_string(), "after");
    }

    #[test]
    fn test_keyword_from_pseudo_ignores_case() {
        assert_eq!(ScopeKeyword::from_pseudo(":GLOBAL"), Some(ScopeKeyword::Global));
        assert_eq!(ScopeKeyword::from_pseudo(":not"), None);
    }

    #[test]
    fn test_nesting_error_is_lifted() {
        let error = Error::from(SyntaxError::NestingTooDeep {
            limit: 256,
            offset: 9,
        });
        assert_eq!(error, Error::NestingTooDeep { limit: 256 });
    }
}
