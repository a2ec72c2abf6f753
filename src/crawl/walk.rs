// src/crawl/walk.rs
// =============================================================================
// Walks a site directory and parses every HTML document in it.
//
// How it works:
// 1. Walk the root recursively with `walkdir`
// 2. Keep regular files whose name ends with the configured extension
// 3. Read each file and pull out its <a> and <link> nodes
// 4. Return one Page per file, sorted by path
// =============================================================================

use crate::error::Result;
use crate::htmldoc::{extract_link_nodes, Document, Node};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A document together with the link-like nodes found in it
#[derive(Debug, Clone)]
pub struct Page {
    pub document: Arc<Document>,
    pub nodes: Vec<Arc<Node>>,
}

impl Page {
    /// (document, node) pairs, ready for `Checker::check_documents`
    pub fn links(&self) -> impl Iterator<Item = (Arc<Document>, Arc<Node>)> + '_ {
        self.nodes
            .iter()
            .map(move |node| (Arc::clone(&self.document), Arc::clone(node)))
    }
}

// Crawls a site directory
//
// Parameters:
//   root: the site root (Options::directory_path)
//   extension: file name suffix of documents, e.g. ".html"
//
// Returns: one Page per document, sorted by site-relative path
pub fn crawl_directory(root: &Path, extension: &str) -> Result<Vec<Page>> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(extension) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative = relative.to_string_lossy().replace('\\', "/");

        let bytes = std::fs::read(entry.path())?;
        let html = String::from_utf8(bytes).unwrap_or_else(|e| {
            warn!(document = %relative, "document is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        });
        let nodes: Vec<Arc<Node>> = extract_link_nodes(&html).into_iter().map(Arc::new).collect();
        debug!(document = %relative, links = nodes.len(), "parsed document");

        pages.push(Page {
            document: Arc::new(Document::new(relative)),
            nodes,
        });
    }

    pages.sort_by(|a, b| a.document.path.cmp(&b.document.path));
    Ok(pages)
}
