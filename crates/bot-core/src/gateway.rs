//! Narrow seam to the chat platform gateway.

use crate::embed::Reply;
use crate::failure::FailureRecord;
use crate::types::{ChannelId, GuildId, MessageId, UserId, UserProfile};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the gateway when sending or looking things up.
#[derive(Error, Debug)]
pub enum OutboxError {
    /// The platform refused the request (e.g. the user has DMs closed).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gateway error: {0}")]
    Transport(String),
}

impl From<OutboxError> for FailureRecord {
    fn from(err: OutboxError) -> Self {
        FailureRecord::unclassified(err)
    }
}

/// Handle to a message sent through an [`Outbox`], used to edit it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    /// A regular channel message.
    Channel {
        channel: ChannelId,
        message: MessageId,
    },
    /// The initial response to a slash-style invocation.
    Original,
    /// A follow-up to a slash-style invocation.
    Followup { message: MessageId },
}

/// Outbound side of one invocation.
#[async_trait]
pub trait Outbox: Send + Sync {
    /// Reply where the command was invoked.
    async fn send(&self, reply: Reply) -> Result<SentMessage, OutboxError>;

    /// Replace the content of a message sent earlier.
    async fn edit(&self, message: &SentMessage, reply: Reply) -> Result<(), OutboxError>;

    /// Send a direct message to `user`.
    async fn send_direct(&self, user: UserId, reply: Reply) -> Result<(), OutboxError>;

    /// Look up another user, as a guild member when `guild` is given.
    async fn lookup_user(
        &self,
        guild: Option<GuildId>,
        user: UserId,
    ) -> Result<Option<UserProfile>, OutboxError>;
}
