//! Gateway client wiring.

use crate::error::GatewayError;
use crate::handler::{GatewaySettings, Handler};
use bot_core::{CommandPipeline, InteractionController};
use secrecy::{ExposeSecret, SecretString};
use serenity::all::{GatewayIntents, ShardManager};
use serenity::Client;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Connection options.
pub struct GatewayConfig {
    pub token: SecretString,
    /// Request the privileged message content intent (needed for prefix commands).
    pub message_content: bool,
    pub settings: GatewaySettings,
}

/// A configured, not yet started, gateway client.
pub struct DiscordGateway {
    client: Client,
}

impl DiscordGateway {
    pub async fn connect(
        config: GatewayConfig,
        pipeline: Arc<CommandPipeline>,
        interactions: Arc<InteractionController>,
    ) -> Result<Self, GatewayError> {
        let mut intents = GatewayIntents::non_privileged();
        if config.message_content {
            intents |= GatewayIntents::MESSAGE_CONTENT;
        }

        let shard_manager = Arc::new(OnceLock::new());
        let handler = Handler::new(pipeline, interactions, config.settings, shard_manager.clone());

        let client = Client::builder(config.token.expose_secret(), intents)
            .event_handler(handler)
            .await?;
        let _ = shard_manager.set(client.shard_manager.clone());

        info!(?intents, "Gateway client created");
        Ok(Self { client })
    }

    /// Handle used to shut the connection down.
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        self.client.shard_manager.clone()
    }

    /// Run until the connection closes.
    pub async fn run(mut self) -> Result<(), GatewayError> {
        self.client.start().await?;
        Ok(())
    }
}
