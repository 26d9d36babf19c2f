//! Local-by-default scoping for [CSS Modules](https://github.com/css-modules/css-modules).
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector scope resolution** ([`resolver`])
//!   - Unmarked classes and ids become `:local(...)`
//!   - `:global(...)` / `:local(...)` and the broad `:global` / `:local` keywords
//!   - Consistency, nesting, whitespace, and purity checks
//!
//! - **Animation names**
//!   - `animation` shorthand keyword disambiguation
//!   - `animation-name` lists, `local(...)` / `global(...)` wrappers
//!   - `@keyframes` names, including `:global(...)` / `:local(...)` preludes
//!
//! - **At-rules**
//!   - `@scope (<start>) to (<end>)` preludes
//!   - Declarations placed directly in at-rule blocks
//!
//! - **`url(...)` rewriting** through a user callback
//!
//! - **ICSS** `:import(...)` aliases and `:export` blocks
//!
//! # Example
//!
//! ```
//! use scopify_modules::{Options, transform};
//!
//! let css = ".foo :global(.bar) { animation: fade 1s; }";
//! assert_eq!(
//!     transform(css, &Options::new()).unwrap(),
//!     ":local(.foo) .bar { animation: :local(fade) 1s; }"
//! );
//! ```

mod animation;
mod at_scope;
mod declaration;
mod driver;
/// Errors raised while scoping a stylesheet.
pub mod error;
mod icss;
mod keyframes;
/// Transform configuration.
pub mod options;
/// Selector scope resolution.
pub mod resolver;
mod url;

// Re-exports for convenience
pub use driver::{LocalByDefault, transform};
pub use error::{Error, Result, ScopeKeyword, Side};
pub use options::{Config, Mode, Options, UrlRewriter};
pub use resolver::{Resolution, ResolveContext, resolve};
