//! Common test utilities for integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use blacklist_store::{BlacklistEntry, BlacklistStore};
use bot_core::{
    ChannelId, CommandPipeline, ExecutionContext, GuildId, GuildInfo, InteractionController,
    RawArgs, Surface, UserId, UserProfile,
};
use chrono::Utc;
use fetchers::HttpFetcher;
use hybrid_bot::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const BLACKLISTED: u64 = 666;

/// Configuration whose fetch endpoints point at `server`.
pub fn test_config(server: Option<&MockServer>) -> Config {
    let mut env: HashMap<String, String> = [
        ("DISCORD__TOKEN", "test-token"),
        ("DISCORD__APPLICATION_ID", "1014200453960912896"),
        ("INTERACTION__TIMEOUT", "180s"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    if let Some(server) = server {
        let uri = server.uri();
        env.insert("FETCH__FACT_URL".into(), format!("{}/random.json", uri));
        env.insert("FETCH__DOG_URL".into(), format!("{}/api/breeds/image/random", uri));
        env.insert("FETCH__BITCOIN_URL".into(), format!("{}/v1/bpi/currentprice/BTC.json", uri));
        env.insert("FETCH__COVID_URL".into(), format!("{}/records/LATEST", uri));
        // Every request reaches the mock.
        env.insert("FETCH__CACHE_TTL".into(), "0s".into());
    }

    Config::load_from("does-not-exist.json", Some(env)).unwrap()
}

/// Pipeline with every command registered and one blacklisted user.
pub fn test_pipeline(config: &Config) -> (Arc<CommandPipeline>, Arc<InteractionController>) {
    let blacklist = BlacklistStore::from_entries([BlacklistEntry::new(BLACKLISTED)]);
    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5), config.fetch.cache_ttl).unwrap());
    let interactions = Arc::new(InteractionController::new(config.interaction.timeout));
    let pipeline = hybrid_bot::build_pipeline(config, Arc::new(blacklist), fetcher, interactions.clone());
    (Arc::new(pipeline), interactions)
}

pub fn user(id: u64, name: &str) -> UserProfile {
    let mut profile = UserProfile::new(UserId(id), name, Utc::now());
    profile.avatar_url = Some(format!("https://cdn.discordapp.com/embed/avatars/{}.png", id % 5));
    profile
}

/// Text invocation in DMs.
pub fn text_ctx(author: u64, command: &str, args: &str) -> ExecutionContext {
    ExecutionContext::new(
        user(author, "tester"),
        ChannelId(1),
        command,
        RawArgs::Text(args.into()),
        Surface::Prefix,
    )
}

pub fn guild() -> GuildInfo {
    GuildInfo {
        id: GuildId(77),
        name: "trqngdk's Shelter".into(),
        icon_url: None,
        created_at: Utc::now(),
        member_count: 4,
        online_count: 3,
        boosters: 1,
    }
}
