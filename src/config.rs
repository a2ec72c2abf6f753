// src/config.rs
// =============================================================================
// Run options.
//
// Options come from three places, lowest priority first:
// 1. Built-in defaults (the Default impl below)
// 2. An optional JSON file passed with --config
// 3. Command-line flags (applied in main.rs)
//
// Every field has a default, so a JSON file only needs the keys it changes:
//
//   { "enforce_https": true, "strip_query_excludes": ["https://example.com/?a=1"] }
// =============================================================================

use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Report plain http:// links as errors (the link is still probed)
    pub enforce_https: bool,
    pub check_external: bool,
    pub check_internal: bool,
    pub check_mailto: bool,
    pub check_tel: bool,
    /// Drop the query string before using a URL as a cache key
    pub strip_query_string: bool,
    /// URLs that keep their query string even when stripping is on
    pub strip_query_excludes: Vec<String>,
    /// Site root; internal links are resolved below this directory
    pub directory_path: PathBuf,
    /// File served for a directory, e.g. "index.html"
    pub directory_index: String,
    /// Per-request timeout for external probes, in seconds
    pub external_timeout: u64,
    /// Maximum number of links checked at the same time
    pub concurrency: usize,
    /// Only files with this suffix are treated as documents
    pub file_extension: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            enforce_https: false,
            check_external: true,
            check_internal: true,
            check_mailto: true,
            check_tel: true,
            strip_query_string: false,
            strip_query_excludes: Vec::new(),
            directory_path: PathBuf::from("."),
            directory_index: "index.html".to_string(),
            external_timeout: 15,
            concurrency: 50,
            file_extension: ".html".to_string(),
        }
    }
}

impl Options {
    /// Loads options from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| CheckError::InvalidOptions(format!("{}: {}", path.display(), e)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.external_timeout)
    }

    /// Whether `url` is listed in `strip_query_excludes`.
    ///
    /// `url` is expected in the normalized form `Url` prints (the way cache
    /// keys are built), so each exclude is normalized the same way first:
    /// `https://example.com?x=1` matches `https://example.com/?x=1`.
    pub fn keeps_query(&self, url: &str) -> bool {
        self.strip_query_excludes
            .iter()
            .any(|excluded| normalize_url(excluded) == url)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(CheckError::InvalidOptions(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.external_timeout == 0 {
            return Err(CheckError::InvalidOptions(
                "external_timeout must be at least 1 second".to_string(),
            ));
        }
        // An empty index, or one that walks into another directory, would
        // make directory resolution revisit the same path forever.
        if self.directory_index.is_empty()
            || self.directory_index.contains('/')
            || self.directory_index.contains('\\')
            || self.directory_index == "."
            || self.directory_index == ".."
        {
            return Err(CheckError::InvalidOptions(format!(
                "directory_index must be a plain file name, got {:?}",
                self.directory_index
            )));
        }
        Ok(())
    }
}

// Fragment-less `Url` form of `raw`; strings that don't parse are kept as is
fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.to_string(),
    }
}
