// src/checker/internal.rs
// =============================================================================
// Checks links to files inside the site (relative and absolute-path hrefs).
//
// The target is looked up under `directory_path`:
// - missing                          -> ERROR, the link is broken
// - a directory, href without "/"    -> ERROR
// - a directory, href ending in "/"  -> DEBUG, then check <dir>/<index file>
// - a regular file                   -> pass, nothing reported
//
// Any other stat failure (permission denied, I/O error) means we can't trust
// the answers for the rest of the site either, so it aborts the run.
// =============================================================================

use super::Checker;
use crate::error::{CheckError, Result};
use crate::htmldoc::Reference;
use crate::issues::Level;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

impl Checker {
    pub(super) async fn check_internal(&self, reference: &Arc<Reference>) -> Result<()> {
        if !self.options.check_internal {
            self.report(Level::Debug, "skipping", reference);
            return Ok(());
        }

        self.check_file(reference, reference.site_path()).await
    }

    /// `site_path` is relative to the site root (a leading "/" is allowed).
    ///
    /// Directory targets are followed into their index file; an index that
    /// is itself a directory is followed again until a file or a miss.
    async fn check_file(&self, reference: &Arc<Reference>, site_path: PathBuf) -> Result<()> {
        let mut site_path = site_path;

        loop {
            let check_path = self.resolve(&site_path);

            let metadata = match tokio::fs::metadata(&check_path).await {
                Ok(metadata) => metadata,
                Err(e) if is_missing(&e) => {
                    self.report(Level::Error, "target does not exist", reference);
                    return Ok(());
                }
                Err(source) => {
                    return Err(CheckError::Filesystem {
                        path: check_path,
                        source,
                    })
                }
            };

            if !metadata.is_dir() {
                return Ok(());
            }

            if !reference.path().ends_with('/') {
                self.report(
                    Level::Error,
                    "target is a directory, href lacks trailing slash",
                    reference,
                );
                return Ok(());
            }

            self.report(Level::Debug, "target is a directory", reference);
            site_path = site_path.join(&self.options.directory_index);
        }
    }

    fn resolve(&self, site_path: &Path) -> PathBuf {
        let relative = site_path.strip_prefix("/").unwrap_or(site_path);
        self.options.directory_path.join(relative)
    }
}

// "a.html/b" fails with NotADirectory rather than NotFound; both mean the
// target isn't there.
fn is_missing(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
mod tests {
    use super::super::tests::{anchor, checker, summary};
    use crate::config::Options;
    use crate::htmldoc::Document;
    use crate::issues::Level;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    // A small site:
    //   index.html
    //   about.html
    //   docs/index.html
    //   empty/
    //   nested/index.html/index.html   (an "index file" that is a directory)
    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("about.html"), "<html></html>").unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/index.html"), "<html></html>").unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::create_dir_all(root.join("nested/index.html")).unwrap();
        fs::write(root.join("nested/index.html/index.html"), "<html></html>").unwrap();
        dir
    }

    fn options(dir: &TempDir) -> Options {
        Options {
            directory_path: dir.path().to_path_buf(),
            ..Options::default()
        }
    }

    #[tokio::test]
    async fn test_existing_file_passes() {
        let dir = site();
        let (checker, store, doc) = checker(options(&dir));
        checker.check_link(&doc, &anchor("about.html")).await.unwrap();
        checker.check_link(&doc, &anchor("/about.html#team")).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let dir = site();
        let (checker, store, doc) = checker(options(&dir));
        checker.check_link(&doc, &anchor("missing.html")).await.unwrap();
        assert_eq!(
            summary(&store),
            vec![(Level::Error, "target does not exist".to_string())]
        );
    }

    #[tokio::test]
    async fn test_file_used_as_directory_is_missing() {
        let dir = site();
        let (checker, store, doc) = checker(options(&dir));
        checker
            .check_link(&doc, &anchor("about.html/child.html"))
            .await
            .unwrap();
        assert_eq!(
            summary(&store),
            vec![(Level::Error, "target does not exist".to_string())]
        );
    }

    #[tokio::test]
    async fn test_directory_without_trailing_slash_fails() {
        let dir = site();
        let (checker, store, doc) = checker(options(&dir));
        checker.check_link(&doc, &anchor("docs")).await.unwrap();
        assert_eq!(
            summary(&store),
            vec![(
                Level::Error,
                "target is a directory, href lacks trailing slash".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_directory_with_index_passes() {
        let dir = site();
        let (checker, store, doc) = checker(options(&dir));
        checker.check_link(&doc, &anchor("docs/")).await.unwrap();
        assert_eq!(
            summary(&store),
            vec![(Level::Debug, "target is a directory".to_string())]
        );
    }

    #[tokio::test]
    async fn test_directory_without_index_fails_on_original_reference() {
        let dir = site();
        let (checker, store, doc) = checker(options(&dir));
        checker.check_link(&doc, &anchor("empty/")).await.unwrap();

        assert_eq!(
            summary(&store),
            vec![
                (Level::Debug, "target is a directory".to_string()),
                (Level::Error, "target does not exist".to_string()),
            ]
        );
        for issue in store.issues() {
            assert_eq!(issue.href(), Some("empty/"));
        }
    }

    #[tokio::test]
    async fn test_index_that_is_a_directory_is_followed() {
        let dir = site();
        let (checker, store, doc) = checker(options(&dir));
        checker.check_link(&doc, &anchor("nested/")).await.unwrap();
        assert_eq!(
            summary(&store),
            vec![
                (Level::Debug, "target is a directory".to_string()),
                (Level::Debug, "target is a directory".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_custom_directory_index() {
        let dir = site();
        fs::write(dir.path().join("empty/default.htm"), "<html></html>").unwrap();
        let options = Options {
            directory_index: "default.htm".to_string(),
            ..options(&dir)
        };
        let (checker, store, doc) = checker(options);
        checker.check_link(&doc, &anchor("empty/")).await.unwrap();
        assert!(!store.has_errors());
    }

    #[tokio::test]
    async fn test_relative_to_nested_document() {
        let dir = site();
        let (checker, store, _) = checker(options(&dir));
        let doc = Arc::new(Document::new("docs/index.html"));
        checker.check_link(&doc, &anchor("../about.html")).await.unwrap();
        checker.check_link(&doc, &anchor("about.html")).await.unwrap();
        assert_eq!(
            summary(&store),
            vec![(Level::Error, "target does not exist".to_string())]
        );
        assert_eq!(store.issues()[0].href(), Some("about.html"));
    }

    #[tokio::test]
    async fn test_disabled_internal_check_skips() {
        let dir = site();
        let options = Options {
            check_internal: false,
            ..options(&dir)
        };
        let (checker, store, doc) = checker(options);
        checker.check_link(&doc, &anchor("missing.html")).await.unwrap();
        assert_eq!(summary(&store), vec![(Level::Debug, "skipping".to_string())]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_directory_aborts_the_run() {
        use crate::error::CheckError;
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let dir = site();
        // root can stat through any mode bits
        if fs::metadata(dir.path()).unwrap().uid() == 0 {
            return;
        }
        let locked = dir.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("x.html"), "<html></html>").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let (checker, store, doc) = checker(options(&dir));
        let result = checker.check_link(&doc, &anchor("locked/x.html")).await;

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(CheckError::Filesystem { path, .. }) => {
                assert_eq!(path, locked.join("x.html"));
            }
            other => panic!("expected a filesystem error, got {:?}", other),
        }
        assert!(store.is_empty());
    }
}
