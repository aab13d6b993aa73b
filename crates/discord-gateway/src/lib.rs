//! Discord adapter for the command pipeline.
//!
//! Converts serenity events into [`bot_core::ExecutionContext`]s and component
//! events, implements [`bot_core::Outbox`] for text and slash invocations,
//! registers slash commands on ready and rotates the bot's presence.

mod client;
mod convert;
mod error;
mod handler;
mod outbox;
mod presence;

pub use client::{DiscordGateway, GatewayConfig};
pub use error::GatewayError;
pub use handler::{CommandSync, GatewaySettings, Handler};
pub use outbox::{ChannelOutbox, InteractionOutbox};
pub use presence::pick_status;
