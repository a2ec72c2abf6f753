// src/checker/mod.rs
// =============================================================================
// This module contains the link checking engine.
//
// Submodules:
// - http: Sends the probe request and classifies transport failures
// - external: http:// and https:// links (cached)
// - internal: links to files inside the site
// - contact: mailto: and tel: links
//
// This file holds the `Checker` itself, the pre-checks every link goes
// through, and the router that hands a link to exactly one of the checkers
// based on its scheme.
//
// Rust concepts:
// - impl blocks across files: each submodule adds methods to `Checker`
// - Arc<T>: Shared ownership, so many issues can point at one Reference
// - Trait objects (dyn IssueSink): The engine doesn't care where issues go
// =============================================================================

mod contact;
mod external;
mod http;
mod internal;

pub use http::{status_text, ErrorKind, ProbeError, Prober, PROBE_RANGE};

use crate::config::Options;
use crate::error::{CheckError, Result};
use crate::htmldoc::{Document, Node, Reference};
use crate::issues::{Issue, IssueSink, Level};
use crate::refcache::RefCache;
use futures::stream::{self, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

/// Attribute that excludes an element from checking
pub const IGNORE_ATTRIBUTE: &str = "data-proofer-ignore";

/// One link-checking run: options, HTTP client, result cache and issue sink.
///
/// Share it by reference between concurrent checks; everything that changes
/// during a run (the cache, the sink) handles its own locking.
pub struct Checker {
    options: Options,
    prober: Prober,
    cache: RefCache<ProbeError>,
    issues: Arc<dyn IssueSink>,
}

impl Checker {
    pub fn new(options: Options, issues: Arc<dyn IssueSink>) -> Result<Self> {
        options.validate()?;
        let prober = Prober::new(options.timeout())?;

        Ok(Self {
            options,
            prober,
            cache: RefCache::new(),
            issues,
        })
    }

    /// Number of distinct external URLs with a known status so far
    pub fn cached_urls(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn cache(&self) -> &RefCache<ProbeError> {
        &self.cache
    }

    /// Checks one link-like node of `document`.
    ///
    /// Only a fatal filesystem problem is returned as an error; every
    /// finding about the link itself goes to the issue sink.
    pub async fn check_link(&self, document: &Arc<Document>, node: &Arc<Node>) -> Result<()> {
        // Canonical links point at the page itself, often on the live site
        if node.attr("rel") == Some("canonical") {
            return Ok(());
        }
        if node.has_attr(IGNORE_ATTRIBUTE) {
            return Ok(());
        }

        if !node.has_attr("href") {
            if node.is_anchor() {
                self.issues.add(Issue::for_document(
                    Level::Debug,
                    "anchor without href",
                    document,
                ));
                return Ok(());
            }
            if node.is_resource_link() {
                self.issues.add(Issue::for_document(
                    Level::Error,
                    "link tag missing href",
                    document,
                ));
                return Ok(());
            }
        }

        // Other elements without an href are treated as a blank href
        let href = node.attr("href").unwrap_or_default();
        let reference = Arc::new(Reference::new(
            Arc::clone(document),
            Arc::clone(node),
            href,
        ));

        if href.is_empty() {
            self.report(Level::Error, "href blank", &reference);
            return Ok(());
        }
        if href == "#" {
            self.report(Level::Error, "empty hash", &reference);
            return Ok(());
        }

        self.route(&reference).await
    }

    /// Hands a reference to the checker for its scheme
    pub async fn route(&self, reference: &Arc<Reference>) -> Result<()> {
        match reference.scheme() {
            "http" => {
                if self.options.enforce_https {
                    self.report(Level::Error, "is not an HTTPS target", reference);
                }
                self.check_external(reference).await;
            }
            "https" => self.check_external(reference).await,
            "file" => self.check_internal(reference).await?,
            "mailto" => self.check_mailto(reference),
            "tel" => self.check_tel(reference),
            other => {
                debug!(scheme = other, href = %reference.href, "scheme not checked");
                self.report(Level::Debug, "unchecked scheme", reference);
            }
        }
        Ok(())
    }

    /// Checks every (document, node) pair, at most `concurrency` at a time.
    ///
    /// Stops at the first fatal error. Returns the number of links checked.
    pub async fn check_documents(&self, links: Vec<(Arc<Document>, Arc<Node>)>) -> Result<usize> {
        let total = links.len();

        stream::iter(links.into_iter().map(Ok::<_, CheckError>))
            .try_for_each_concurrent(self.options.concurrency, |(document, node)| async move {
                self.check_link(&document, &node).await
            })
            .await?;

        Ok(total)
    }

    fn report(&self, level: Level, message: impl Into<String>, reference: &Arc<Reference>) {
        self.issues
            .add(Issue::for_reference(level, message, reference));
    }
}
