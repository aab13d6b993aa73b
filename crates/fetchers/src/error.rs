//! Fetch errors.

use thiserror::Error;

/// Errors returned by [`crate::HttpFetcher`] and the record mappers.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure: connect, timeout, TLS.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status. The body is kept for
    /// logging; the message only carries the status reason.
    #[error("Unexpected response: {}", reason(.status))]
    Status { status: u16, body: String },

    /// The body was not valid JSON.
    #[error("{message}")]
    Parse { status: u16, message: String },

    /// A field the record needs is missing or has the wrong type.
    #[error("Missing or invalid field '{field}'")]
    MissingField { status: u16, field: String },
}

impl FetchError {
    /// HTTP status the failure was observed with, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
            FetchError::Status { status, .. }
            | FetchError::Parse { status, .. }
            | FetchError::MissingField { status, .. } => Some(*status),
        }
    }
}

fn reason(status: &u16) -> &'static str {
    reqwest::StatusCode::from_u16(*status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown status")
}
