//! The running pipeline follows edits to the blacklist file.

mod common;

use blacklist_store::BlacklistStore;
use bot_core::testing::RecordingOutbox;
use bot_core::{Colour, InteractionController, UserId};
use common::*;
use fetchers::HttpFetcher;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_user_added_to_file_is_denied_without_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blacklist.json");
    std::fs::write(&path, r#"{ "version": 1, "entries": [] }"#).unwrap();

    let config = test_config(None);
    let store = BlacklistStore::load(&path).await.unwrap();
    let watcher = store.watch(Duration::from_millis(20));
    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5), config.fetch.cache_ttl).unwrap());
    let interactions = Arc::new(InteractionController::new(config.interaction.timeout));
    let pipeline = hybrid_bot::build_pipeline(&config, Arc::new(store.clone()), fetcher, interactions);

    let out = RecordingOutbox::new();
    pipeline.handle(&text_ctx(42, "ping", ""), &out).await.unwrap();
    assert_eq!(out.sent()[0].embed.as_ref().unwrap().colour, Colour::GREEN);

    std::fs::write(
        &path,
        r#"{ "version": 1, "entries": [{ "user_id": 42, "created_at": "2024-05-01T00:00:00Z" }] }"#,
    )
    .unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !bot_core::Blacklist::contains(&store, UserId(42)).await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("blacklist edit was never reloaded");

    let out = RecordingOutbox::new();
    pipeline.handle(&text_ctx(42, "ping", ""), &out).await.unwrap();
    let sent = out.sent();
    assert_eq!(sent.len(), 1);
    let embed = sent[0].embed.as_ref().unwrap();
    assert_eq!(embed.colour, Colour::RED);
    assert_eq!(
        embed.description.as_deref(),
        Some("You are blacklisted from using the bot!")
    );

    watcher.abort();
}
