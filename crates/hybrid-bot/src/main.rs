//! Hybrid bot - Main entry point.

use anyhow::Context;
use blacklist_store::BlacklistStore;
use bot_core::InteractionController;
use discord_gateway::{DiscordGateway, GatewayConfig};
use fetchers::HttpFetcher;
use hybrid_bot::config::Config;
use hybrid_bot::error::AppResult;
use hybrid_bot::logging::init_logging;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level, &config.bot.log_file)?;

    info!("Starting hybrid bot...");

    // Initialize collaborators
    let blacklist = BlacklistStore::load(&config.blacklist.path).await?;
    info!(
        "Blacklist loaded from {} ({} entries)",
        config.blacklist.path.display(),
        blacklist.len().await
    );
    let blacklist_watcher = (!config.blacklist.reload_interval.is_zero())
        .then(|| blacklist.watch(config.blacklist.reload_interval));

    let fetcher = Arc::new(HttpFetcher::new(config.fetch.timeout, config.fetch.cache_ttl)?);
    let interactions = Arc::new(InteractionController::new(config.interaction.timeout));

    let pipeline = Arc::new(hybrid_bot::build_pipeline(
        &config,
        Arc::new(blacklist),
        fetcher,
        interactions.clone(),
    ));
    info!("Registered {} commands", pipeline.registry().len());

    let settings = config.gateway_settings();
    let gateway = DiscordGateway::connect(
        GatewayConfig {
            token: config.discord.token,
            message_content: config.discord.message_content,
            settings,
        },
        pipeline,
        interactions,
    )
    .await?;
    let shard_manager = gateway.shard_manager();

    tokio::select! {
        result = gateway.run() => {
            if let Err(e) = result {
                error!("Gateway stopped: {}", e);
                return Err(e.into());
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            shard_manager.shutdown_all().await;
        }
    }

    if let Some(watcher) = blacklist_watcher {
        watcher.abort();
    }
    info!("Shutting down...");
    Ok(())
}
