//! Transform configuration.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::{Error, Result};

/// How unmarked class and id selectors are scoped.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    AsRefStr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unmarked selectors become `:local(...)`.
    #[default]
    Local,
    /// Unmarked selectors stay as written.
    Global,
    /// Like [`Mode::Local`], and every selector must contain a local part.
    Pure,
}

impl Mode {
    /// Parse a configured mode name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModeConfig`] for anything but `local`,
    /// `global`, or `pure`.
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(value).map_err(|_| Error::InvalidModeConfig(value.to_string()))
    }

    /// Whether unmarked selectors start out global.
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }
}

/// Callback that rewrites the raw argument of a `url(...)`.
///
/// Receives whether the declaration is globally scoped and the url as
/// written, and returns the replacement url (unescaped).
pub type UrlRewriter = Arc<dyn Fn(bool, &str) -> String + Send + Sync>;

/// Options for [`LocalByDefault`](crate::LocalByDefault).
#[derive(Clone, Default)]
pub struct Options {
    /// The scoping mode.
    pub mode: Mode,
    /// Optional `url(...)` rewrite callback.
    pub rewrite_url: Option<UrlRewriter>,
}

impl Options {
    /// Default options: local mode, no url rewriting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Install a `url(...)` rewrite callback.
    #[must_use]
    pub fn with_rewrite_url<F>(mut self, rewrite: F) -> Self
    where
        F: Fn(bool, &str) -> String + Send + Sync + 'static,
    {
        self.rewrite_url = Some(Arc::new(rewrite));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("mode", &self.mode)
            .field("rewrite_url", &self.rewrite_url.is_some())
            .finish()
    }
}

/// On-disk configuration, e.g. `{"mode": "pure"}`.
///
/// The mode is kept as a string so an unknown value is reported as
/// [`Error::InvalidModeConfig`] rather than as a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The mode name, `local` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl Config {
    /// Validate into [`Options`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModeConfig`] for an unknown mode.
    pub fn into_options(self) -> Result<Options> {
        let mode = match self.mode.as_deref() {
            Some(value) => Mode::parse(value)?,
            None => Mode::default(),
        };
        Ok(Options::new().with_mode(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names() {
        assert_eq!(Mode::parse("pure"), Ok(Mode::Pure));
        assert_eq!(Mode::Global.as_ref(), "global");
        assert_eq!(Mode::default(), Mode::Local);
        assert!(matches!(Mode::parse("???"), Err(Error::InvalidModeConfig(ref value)) if value == "???"));
    }

    #[test]
    fn test_config_defaults_to_local() {
        let options = Config::default().into_options().unwrap();
        assert_eq!(options.mode, Mode::Local);
        assert!(options.rewrite_url.is_none());
    }
}
