// src/checker/http.rs
// =============================================================================
// This module sends the actual HTTP request for an external link.
//
// Key functionality:
// - Makes one GET request asking for only the first 64 bytes (Range header),
//   so range-aware servers answer 206 without sending the whole page
// - Never reads the body; the status code is all we need
// - Sorts transport failures into a small ErrorKind enum, once, right here.
//   Nothing outside this file looks at error text.
//
// Rust concepts:
// - async/await: For network I/O
// - Result<T, E>: Probe succeeds with a status code or fails with ProbeError
// - Error source chains: std::error::Error::source() walks from the outer
//   error down to the root cause
// =============================================================================

use crate::error::Result;
use reqwest::header::RANGE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Range header sent with every probe
pub const PROBE_RANGE: &str = "bytes=0-63";

/// The kinds of transport failure the checkers tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The host could not be resolved or connected to
    DnsFailure,
    /// The request ran past the configured timeout
    Timeout,
    /// Anything else (TLS, protocol, redirect loops...)
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeError {
    pub kind: ErrorKind,
    /// Human-readable description, already trimmed for DnsFailure
    pub message: String,
}

impl ProbeError {
    fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self {
                kind: ErrorKind::Timeout,
                message: error.to_string(),
            };
        }

        if error.is_connect() {
            // reqwest wraps the interesting part ("failed to lookup address
            // information", "Connection refused") several layers deep.
            // Keep only that, prefixed with the host, like "host: cause".
            let host = error
                .url()
                .and_then(|u| u.host_str().map(str::to_string))
                .or_else(|| {
                    url::Url::parse(url)
                        .ok()
                        .and_then(|u| u.host_str().map(str::to_string))
                });
            let cause = root_cause(error);
            let message = match host {
                Some(host) => format!("{}: {}", host, cause),
                None => cause,
            };
            return Self {
                kind: ErrorKind::DnsFailure,
                message,
            };
        }

        Self {
            kind: ErrorKind::Other,
            message: error_chain(error),
        }
    }
}

/// Reusable HTTP client for probing external links
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    pub fn new(timeout: Duration) -> Result<Self> {
        // We'll reuse this client for all requests (connection pooling)
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("htmlproof/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    /// Requests `url` and returns the response status code
    pub async fn probe(&self, url: &str) -> std::result::Result<u16, ProbeError> {
        let response = self
            .client
            .get(url)
            .header(RANGE, PROBE_RANGE)
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(url, &e))?;

        Ok(response.status().as_u16())
    }
}

/// Reason phrase for a status code ("Not Found"), or the bare number when
/// the code has none
pub fn status_text(code: u16) -> String {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

// The deepest error in the source chain
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

// "outer: inner: root", for errors we can't classify
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error;
    while let Some(source) = current.source() {
        let text = source.to_string();
        // hyper and reqwest sometimes repeat the cause in the outer message
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        current = source;
    }
    parts.join(": ")
}
