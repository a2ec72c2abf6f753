// src/htmldoc/mod.rs
// =============================================================================
// The document model the checkers work on.
//
// Submodules:
// - document: Document, Node, and extraction of link nodes from HTML
// - reference: Reference, one parsed href occurrence
// =============================================================================

mod document;
mod reference;

pub use document::{extract_link_nodes, Document, Node};
pub use reference::{strip_query_string, Reference};
