//! Typed errors for calls across the remote service boundary.
//!
//! Application code works in `anyhow::Result`; these variants survive as the
//! root cause so callers (and tests) can tell a rejected request from a
//! broken connection or a failed long-running operation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {url} failed with HTTP {status}: {body}")]
    Status {
        status: u16,
        method: String,
        url: String,
        body: String,
    },

    #[error("{method} {url} could not be sent: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("operation {name} failed (code {code}): {message}")]
    Operation {
        name: String,
        code: i32,
        message: String,
    },

    #[error("operation {name} did not finish within {secs}s")]
    OperationTimeout { name: String, secs: u64 },

    #[error("failed to obtain credentials: {0}")]
    Auth(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Keep error bodies readable in a terminal.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.trim().is_empty() {
        return "<empty body>".to_string();
    }
    body.chars().take(MAX).collect()
}
