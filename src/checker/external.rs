// src/checker/external.rs
// =============================================================================
// Checks http:// and https:// links.
//
// Steps:
// 1. Skip (with a DEBUG note) when external checking is turned off
// 2. Build the cache key: the URL without fragment, and without query string
//    when stripping is on and the URL isn't in the exclusion list
// 3. Ask the cache; only a miss sends a request
// 4. 200 and 206 pass, any other status fails
// =============================================================================

use super::http::{status_text, ErrorKind};
use super::Checker;
use crate::htmldoc::{strip_query_string, Reference};
use crate::issues::Level;
use std::sync::Arc;
use tracing::{debug, warn};

impl Checker {
    pub(super) async fn check_external(&self, reference: &Arc<Reference>) {
        if !self.options.check_external {
            self.report(Level::Debug, "skipping", reference);
            return;
        }

        let mut url = reference.url_string();
        if self.options.strip_query_string && !self.options.keeps_query(&url) {
            url = strip_query_string(&url);
        }

        let outcome = self
            .cache
            .get_or_probe(&url, || {
                debug!(url = %url, "probing external link");
                self.prober.probe(&url)
            })
            .await;

        match outcome {
            Ok(code @ (200 | 206)) => {
                self.report(Level::Debug, status_text(code), reference);
            }
            Ok(code) => {
                self.report(Level::Error, status_text(code), reference);
            }
            Err(error) => match error.kind {
                ErrorKind::DnsFailure => {
                    self.report(Level::Error, error.message, reference);
                }
                ErrorKind::Timeout => {
                    self.report(
                        Level::Error,
                        "request exceeded our ExternalTimeout",
                        reference,
                    );
                }
                ErrorKind::Other => {
                    warn!(url = %url, error = %error.message, "unhandled HTTP client error");
                    self.report(Level::Error, error.message, reference);
                }
            },
        }
    }
}
