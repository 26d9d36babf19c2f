//! Deduplicated warnings.
//!
//! Recoverable problems in the input (a bad `url(...)`, an unterminated
//! string, an `@scope` prelude we cannot read) are reported once per unique
//! message and forwarded to the [`log`] facade, so the binary decides how they
//! are rendered.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (emitted once per unique message).
///
/// Returns `true` when the warning was emitted, `false` when it had already
/// been seen.
///
/// # Example
/// ```ignore
/// warn_once("css", "unterminated string in value `\"abc`");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        log::warn!(target: component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call between unrelated stylesheets)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        let message = "duplicate-warning-probe";
        assert!(warn_once("test", message));
        assert!(!warn_once("test", message));
        assert!(warn_once("other", message));

        clear_warnings();
        assert!(warn_once("test", message));
    }
}
