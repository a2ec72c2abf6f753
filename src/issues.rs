// src/issues.rs
// =============================================================================
// Findings produced while checking links.
//
// Every outcome, good or bad, becomes an Issue with a severity Level. Passing
// links and skipped checks are recorded at DEBUG so they can still be
// inspected; problems are ERROR. Whatever renders the report decides which
// levels to show and what the exit code should be.
//
// Checkers only ever *append* to a sink. Many checks run at once, so the sink
// has to accept appends from several tasks; the order of issues between two
// different references is not meaningful.
// =============================================================================

use crate::htmldoc::{Document, Reference};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of an Issue, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone)]
pub struct Issue {
    pub level: Level,
    pub message: String,
    /// The link this issue is about, if it got far enough to have one
    pub reference: Option<Arc<Reference>>,
    /// Set for document-level issues that have no Reference
    pub document: Option<Arc<Document>>,
}

impl Issue {
    pub fn for_reference(level: Level, message: impl Into<String>, reference: &Arc<Reference>) -> Self {
        Self {
            level,
            message: message.into(),
            reference: Some(Arc::clone(reference)),
            document: None,
        }
    }

    pub fn for_document(level: Level, message: impl Into<String>, document: &Arc<Document>) -> Self {
        Self {
            level,
            message: message.into(),
            reference: None,
            document: Some(Arc::clone(document)),
        }
    }

    /// The document this issue belongs to, directly or through its reference
    pub fn document(&self) -> Option<&Document> {
        match (&self.reference, &self.document) {
            (Some(reference), _) => Some(reference.document.as_ref()),
            (None, Some(document)) => Some(document.as_ref()),
            (None, None) => None,
        }
    }

    pub fn href(&self) -> Option<&str> {
        self.reference.as_ref().map(|r| r.href.as_str())
    }
}

/// Anything that can collect issues.
///
/// Implementations must be safe to call from many tasks at once and must
/// keep the order of issues added by a single task.
pub trait IssueSink: Send + Sync {
    fn add(&self, issue: Issue);
}

/// In-memory sink that keeps every issue for the report
#[derive(Debug, Default)]
pub struct IssueStore {
    issues: Mutex<Vec<Issue>>,
}

impl IssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything collected so far, in insertion order
    pub fn issues(&self) -> Vec<Issue> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of issues at `level` or above
    pub fn count_at_least(&self, level: Level) -> usize {
        self.lock().iter().filter(|i| i.level >= level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count_at_least(Level::Error) > 0
    }

    /// Issues whose reference has exactly this href, in insertion order
    pub fn for_href(&self, href: &str) -> Vec<Issue> {
        self.lock()
            .iter()
            .filter(|i| i.href() == Some(href))
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Issue>> {
        // A panic while holding the lock can't leave a Vec half-pushed,
        // so a poisoned lock is still safe to use.
        self.issues.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IssueSink for IssueStore {
    fn add(&self, issue: Issue) {
        self.lock().push(issue);
    }
}
