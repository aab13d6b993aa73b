//! Gateway adapter errors.

use bot_core::OutboxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Interaction already answered")]
    AlreadyResponded,
}

impl GatewayError {
    /// Sort a serenity error by the HTTP status it carries, if any.
    pub fn classify(err: serenity::Error) -> Self {
        let status = match &err {
            serenity::Error::Http(http) => http.status_code().map(|s| s.as_u16()),
            _ => None,
        };
        match status {
            Some(403) => GatewayError::Forbidden(err.to_string()),
            Some(404) => GatewayError::NotFound(err.to_string()),
            _ => GatewayError::Discord(err),
        }
    }
}

impl From<GatewayError> for OutboxError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Forbidden(msg) => OutboxError::Forbidden(msg),
            GatewayError::NotFound(msg) => OutboxError::NotFound(msg),
            other => OutboxError::Transport(other.to_string()),
        }
    }
}
