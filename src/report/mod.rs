//! Report renderers for processed leads.
//!
//! - [`terminal`] — colored summary box and per-category tables; respects `--verbose` / `--quiet`.
//! - [`json`] — machine-readable statistics plus every processed lead, on stdout.

pub mod json;
pub mod terminal;
