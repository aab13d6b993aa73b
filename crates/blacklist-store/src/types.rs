//! Blacklist record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current on-disk format version.
pub const DATA_VERSION: u32 = 1;

/// A blacklisted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}

impl BlacklistEntry {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// On-disk document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistData {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<BlacklistEntry>,
}

impl Default for BlacklistData {
    fn default() -> Self {
        Self {
            version: DATA_VERSION,
            entries: Vec::new(),
        }
    }
}
