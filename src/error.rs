// src/error.rs
// =============================================================================
// Errors that stop a run.
//
// Almost everything that goes wrong while checking a link is a *finding*
// (an Issue), not an error. The variants here are the few situations where
// the environment itself is broken and continuing would produce nonsense.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    /// Stat failed for a reason other than "not found" (permissions, I/O).
    #[error("cannot stat {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("cannot walk site directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;
