//! Declaration routing.
//!
//! Picks how a declaration value is localized from its property name:
//! `animation` shorthands, `animation-name` lists, or values that only need
//! their `url(...)` arguments rewritten.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scopify_css::parser::Declaration;
use scopify_css::values::{parse_value, stringify};

use crate::animation::{localize_animation_names, localize_animation_shorthand};
use crate::error::Result;
use crate::options::UrlRewriter;
use crate::url::rewrite_urls;

static URL_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)url\(").expect("url call pattern is valid"));

/// The scope a declaration is localized in.
#[derive(Clone, Copy)]
pub struct DeclarationScope<'a> {
    /// Whether names and urls are global.
    pub global: bool,
    /// Names imported through `:import(...)`, never localized.
    pub aliases: &'a HashSet<String>,
    /// The `url(...)` rewrite callback, if any.
    pub rewrite_url: Option<&'a UrlRewriter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Shorthand,
    Names,
    Urls,
}

fn route(declaration: &Declaration, scope: &DeclarationScope<'_>) -> Option<Route> {
    let prop = declaration.prop.to_ascii_lowercase();
    if prop.ends_with("animation") {
        Some(Route::Shorthand)
    } else if prop.ends_with("animation-name") {
        Some(Route::Names)
    } else if scope.rewrite_url.is_some() && URL_CALL.is_match(&declaration.value) {
        Some(Route::Urls)
    } else {
        None
    }
}

/// Localize one declaration value in place.
///
/// Values that need no rewriting are left byte for byte as they were.
pub fn localize_declaration(
    declaration: &mut Declaration,
    scope: &DeclarationScope<'_>,
) -> Result<()> {
    let Some(route) = route(declaration, scope) else {
        return Ok(());
    };
    let mut nodes = parse_value(&declaration.value)?;
    match route {
        Route::Shorthand => localize_animation_shorthand(&mut nodes, scope),
        Route::Names => localize_animation_names(&mut nodes, scope),
        Route::Urls => rewrite_urls(&mut nodes, scope),
    }
    let value = stringify(&nodes);
    if value != declaration.value {
        log::trace!(
            target: "scopify",
            "{}: {} -> {value}",
            declaration.prop,
            declaration.value
        );
        declaration.value = value;
    }
    Ok(())
}
