//! Common utilities for the scopify crates.
//!
//! This crate provides shared infrastructure used by the CSS codecs and the
//! scoping transform:
//! - **Warning System** - deduplicated warnings for recoverable input problems

pub mod warning;
