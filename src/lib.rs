// src/lib.rs
// =============================================================================
// htmlproof: verifies the links in a directory of HTML files.
//
// - internal links must point at files that exist
// - external http(s) links must answer 200 or 206
// - mailto: and tel: links must not be empty (and mailto needs an "@")
//
// Typical use:
//
//   let store = Arc::new(IssueStore::new());
//   let checker = Checker::new(options, store.clone())?;
//   checker.check_documents(links).await?;
//   for issue in store.issues() { ... }
// =============================================================================

pub mod checker;
pub mod config;
pub mod crawl;
pub mod error;
pub mod htmldoc;
pub mod issues;
pub mod refcache;
pub mod report;

pub use checker::Checker;
pub use config::Options;
pub use error::{CheckError, Result};
pub use issues::{Issue, IssueSink, IssueStore, Level};
