//! Common utilities for the Sift selector engine.
//!
//! This crate provides shared infrastructure used by the DOM and selector crates:
//! - **Warning System** - deduplicated, colored terminal output for inert or
//!   unsupported selector features

pub mod warning;
