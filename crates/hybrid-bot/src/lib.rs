//! Hybrid (prefix + slash) Discord bot.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

use crate::config::Config;
use bot_core::{Blacklist, CommandPipeline, CommandRegistry, Guard, InteractionController, UserId};
use fetchers::HttpFetcher;
use std::sync::Arc;

/// Build the command pipeline with every command registered.
pub fn build_pipeline(
    config: &Config,
    blacklist: Arc<dyn Blacklist>,
    fetcher: Arc<HttpFetcher>,
    interactions: Arc<InteractionController>,
) -> CommandPipeline {
    let owners = config.bot.owners.iter().copied().map(UserId);
    let mut registry = CommandRegistry::new(Guard::new(blacklist), owners);
    commands::register_all(&mut registry, config, fetcher, interactions);
    CommandPipeline::new(registry)
}
