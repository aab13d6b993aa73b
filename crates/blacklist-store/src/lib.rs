//! Persistent blacklist of users denied access to the bot.

mod error;
mod store;
mod types;

pub use error::BlacklistError;
pub use store::BlacklistStore;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use bot_core::{Blacklist, UserId};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_entries() {
        let file = write_file(
            r#"{
                "version": 1,
                "entries": [
                    { "user_id": 111, "created_at": "2024-01-01T00:00:00Z" },
                    { "user_id": 222, "created_at": "2024-02-01T00:00:00Z" }
                ]
            }"#,
        );

        let store = BlacklistStore::load(file.path()).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert!(store.contains(UserId(111)).await);
        assert!(store.contains(UserId(222)).await);
        assert!(!store.contains(UserId(333)).await);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlacklistStore::load(dir.path().join("blacklist.json"))
            .await
            .unwrap();
        assert!(store.is_empty().await);
        assert!(!store.contains(UserId(1)).await);
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_changes() {
        let file = write_file(r#"{ "version": 1, "entries": [] }"#);
        let store = BlacklistStore::load(file.path()).await.unwrap();
        assert!(!store.contains(UserId(7)).await);

        std::fs::write(
            file.path(),
            r#"{ "version": 1, "entries": [{ "user_id": 7, "created_at": "2024-03-01T00:00:00Z" }] }"#,
        )
        .unwrap();

        assert_eq!(store.reload().await.unwrap(), 1);
        assert!(store.contains(UserId(7)).await);
        let entry = store.get(7).await.unwrap();
        assert_eq!(entry.created_at.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_watch_reloads_in_background() {
        let file = write_file(r#"{ "version": 1, "entries": [] }"#);
        let store = BlacklistStore::load(file.path()).await.unwrap();
        let watcher = store.watch(Duration::from_millis(20));

        std::fs::write(
            file.path(),
            r#"{ "version": 1, "entries": [{ "user_id": 9, "created_at": "2024-03-01T00:00:00Z" }] }"#,
        )
        .unwrap();

        let seen = tokio::time::timeout(Duration::from_secs(5), async {
            while !store.contains(UserId(9)).await {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(seen.is_ok(), "watcher never picked up the new entry");

        // A broken file leaves the last good entries in place.
        std::fs::write(file.path(), "not json").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.contains(UserId(9)).await);

        watcher.abort();
    }

    #[tokio::test]
    async fn test_rejects_unknown_version() {
        let file = write_file(r#"{ "version": 9, "entries": [] }"#);
        let err = BlacklistStore::load(file.path()).await.err().unwrap();
        assert!(matches!(
            err,
            BlacklistError::UnsupportedVersion { found: 9, expected: 1 }
        ));
    }

    #[tokio::test]
    async fn test_rejects_malformed_file() {
        let file = write_file("not json");
        let err = BlacklistStore::load(file.path()).await.err().unwrap();
        assert!(matches!(err, BlacklistError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_from_entries() {
        let store = BlacklistStore::from_entries([BlacklistEntry::new(5)]);
        assert!(store.contains(UserId(5)).await);
        assert_eq!(store.reload().await.unwrap(), 1);
    }
}
