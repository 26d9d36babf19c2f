//! `@keyframes` name localization.
//!
//! [CSS Animations Level 1 § 4 Declaring Keyframes](https://www.w3.org/TR/css-animations-1/#keyframes)

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::options::Mode;

static GLOBAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:global\s*\((.+)\)\s*$").expect("global keyframes pattern is valid")
});

static LOCAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:local\s*\((.+)\)\s*$").expect("local keyframes pattern is valid")
});

/// Whether an at-rule name is `keyframes` or a vendor-prefixed form of it.
pub fn is_keyframes(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with("keyframes")
}

/// A resolved `@keyframes` prelude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyframesScope {
    /// The prelude to write back.
    pub params: String,
    /// The scope of the declarations inside the at-rule.
    pub global: bool,
}

/// Resolve the name of a `@keyframes` at-rule.
///
/// `:global(name)` is unwrapped, `:local(name)` is kept, and any other name is
/// wrapped in `:local(...)` unless the mode is global or the name is an alias.
pub fn localize_keyframes(
    params: &str,
    mode: Mode,
    aliases: &HashSet<String>,
) -> Result<KeyframesScope> {
    if let Some(captures) = GLOBAL_NAME.captures(params) {
        if mode == Mode::Pure {
            return Err(Error::PureKeyframesGlobal);
        }
        let name = captures.get(1).map_or("", |name| name.as_str());
        return Ok(KeyframesScope {
            params: name.to_string(),
            global: true,
        });
    }
    if LOCAL_NAME.is_match(params) {
        return Ok(KeyframesScope {
            params: params.to_string(),
            global: false,
        });
    }

    let global = mode.is_global();
    let params = if params.is_empty() || global || aliases.contains(params) {
        params.to_string()
    } else {
        format!(":local({params})")
    };
    Ok(KeyframesScope { params, global })
}
