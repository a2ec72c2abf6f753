// src/crawl/mod.rs
// =============================================================================
// This module finds the documents of a site and the links inside them.
//
// Features:
// - Recursive walk of the site root, following no symlinks
// - Only files with the configured extension (".html" by default)
// - Deterministic order (sorted by path) so reports are stable
//
// The engine in `checker` never reads HTML itself; it only sees the
// Document / Node pairs produced here.
// =============================================================================

mod walk;

pub use walk::{crawl_directory, Page};
