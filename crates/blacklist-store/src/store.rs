//! File-backed, read-mostly blacklist.

use crate::error::BlacklistError;
use crate::types::*;
use async_trait::async_trait;
use bot_core::{Blacklist, UserId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Blacklist loaded from a JSON document.
///
/// Entries are administered outside the bot; this store only reads them.
/// Call [`BlacklistStore::reload`], or run [`BlacklistStore::watch`], to pick
/// up external changes.
#[derive(Clone)]
pub struct BlacklistStore {
    entries: Arc<RwLock<HashMap<u64, BlacklistEntry>>>,
    path: Option<PathBuf>,
}

impl BlacklistStore {
    /// Load the blacklist at `path`. A missing file is an empty blacklist.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, BlacklistError> {
        let store = Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            path: Some(path.into()),
        };
        store.reload().await?;
        Ok(store)
    }

    /// In-memory blacklist with fixed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = BlacklistEntry>) -> Self {
        let entries = entries.into_iter().map(|e| (e.user_id, e)).collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
            path: None,
        }
    }

    /// Re-read the backing file. Returns the number of entries.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<usize, BlacklistError> {
        let Some(path) = &self.path else {
            return Ok(self.len().await);
        };

        let data = read_data(path).await?;
        let count = data.entries.len();
        let mut entries = self.entries.write().await;
        *entries = data.entries.into_iter().map(|e| (e.user_id, e)).collect();
        info!("Blacklist loaded from {} ({} entries)", path.display(), count);
        Ok(count)
    }

    /// Reload the backing file every `every` on a background task.
    ///
    /// Clones share their entries, so every holder of this store sees the
    /// reloaded set. A failed reload keeps the previous entries.
    pub fn watch(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the file was just loaded.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = store.reload().await {
                    warn!("Blacklist reload failed, keeping previous entries: {}", e);
                }
            }
        })
    }

    pub async fn contains_id(&self, user_id: u64) -> bool {
        self.entries.read().await.contains_key(&user_id)
    }

    pub async fn get(&self, user_id: u64) -> Option<BlacklistEntry> {
        self.entries.read().await.get(&user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Blacklist for BlacklistStore {
    async fn contains(&self, user: UserId) -> bool {
        self.contains_id(user.get()).await
    }
}

async fn read_data(path: &Path) -> Result<BlacklistData, BlacklistError> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No blacklist file at {}, starting empty", path.display());
            return Ok(BlacklistData::default());
        }
        Err(e) => return Err(e.into()),
    };

    let data: BlacklistData = serde_json::from_slice(&raw)?;
    if data.version != DATA_VERSION {
        return Err(BlacklistError::UnsupportedVersion {
            found: data.version,
            expected: DATA_VERSION,
        });
    }
    Ok(data)
}
