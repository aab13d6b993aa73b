//! Blacklist store errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlacklistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported blacklist file version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
