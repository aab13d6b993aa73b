//! `Outbox` implementations for the two invocation surfaces.

use crate::convert;
use crate::error::GatewayError;
use async_trait::async_trait;
use bot_core::{Outbox, OutboxError, Reply, SentMessage, UserProfile};
use serenity::all::{CommandInteraction, CreateInteractionResponse};
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

fn sent_in_channel(message: &serenity::model::channel::Message) -> SentMessage {
    SentMessage::Channel {
        channel: bot_core::ChannelId(message.channel_id.get()),
        message: bot_core::MessageId(message.id.get()),
    }
}

async fn edit_channel_message(
    http: &Arc<Http>,
    message: &SentMessage,
    reply: &Reply,
) -> Result<(), GatewayError> {
    let SentMessage::Channel { channel, message } = message else {
        return Err(GatewayError::NotFound(format!("{:?} is not a channel message", message)));
    };
    ChannelId::new(channel.get())
        .edit_message(http, MessageId::new(message.get()), convert::edit_message(reply))
        .await
        .map_err(GatewayError::classify)?;
    Ok(())
}

async fn send_direct(http: &Arc<Http>, user: bot_core::UserId, reply: &Reply) -> Result<(), GatewayError> {
    UserId::new(user.get())
        .direct_message(http, convert::create_message(reply))
        .await
        .map_err(GatewayError::classify)?;
    Ok(())
}

/// Guild member first, then the global user. `None` if neither exists.
async fn lookup_user(
    http: &Arc<Http>,
    guild: Option<bot_core::GuildId>,
    user: bot_core::UserId,
) -> Result<Option<UserProfile>, GatewayError> {
    let user_id = UserId::new(user.get());

    if let Some(guild) = guild {
        match GuildId::new(guild.get()).member(http, user_id).await {
            Ok(member) => {
                let mut profile = convert::user_profile(&member.user);
                convert::apply_membership(&mut profile, member.joined_at, &member.roles);
                return Ok(Some(profile));
            }
            Err(e) => match GatewayError::classify(e) {
                GatewayError::NotFound(_) => debug!(%user, "Not a member, falling back to user lookup"),
                other => return Err(other),
            },
        }
    }

    match user_id.to_user(http).await {
        Ok(found) => Ok(Some(convert::user_profile(&found))),
        Err(e) => match GatewayError::classify(e) {
            GatewayError::NotFound(_) => Ok(None),
            other => Err(other),
        },
    }
}

/// Replies to a text (prefix/mention) command in its channel.
pub struct ChannelOutbox {
    http: Arc<Http>,
    channel: ChannelId,
}

impl ChannelOutbox {
    pub fn new(http: Arc<Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait]
impl Outbox for ChannelOutbox {
    async fn send(&self, reply: Reply) -> Result<SentMessage, OutboxError> {
        let message = self
            .channel
            .send_message(&self.http, convert::create_message(&reply))
            .await
            .map_err(GatewayError::classify)?;
        Ok(sent_in_channel(&message))
    }

    async fn edit(&self, message: &SentMessage, reply: Reply) -> Result<(), OutboxError> {
        Ok(edit_channel_message(&self.http, message, &reply).await?)
    }

    async fn send_direct(&self, user: bot_core::UserId, reply: Reply) -> Result<(), OutboxError> {
        Ok(send_direct(&self.http, user, &reply).await?)
    }

    async fn lookup_user(
        &self,
        guild: Option<bot_core::GuildId>,
        user: bot_core::UserId,
    ) -> Result<Option<UserProfile>, OutboxError> {
        Ok(lookup_user(&self.http, guild, user).await?)
    }
}

/// Replies to a slash command: the first send answers the interaction, later
/// sends are followups.
pub struct InteractionOutbox {
    http: Arc<Http>,
    interaction: CommandInteraction,
    responded: AtomicBool,
}

impl InteractionOutbox {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self {
            http,
            interaction,
            responded: AtomicBool::new(false),
        }
    }

    async fn respond(&self, reply: &Reply) -> Result<SentMessage, GatewayError> {
        if self.responded.swap(true, Ordering::SeqCst) {
            let message = self
                .interaction
                .create_followup(&self.http, convert::followup(reply))
                .await
                .map_err(GatewayError::classify)?;
            return Ok(SentMessage::Followup {
                message: bot_core::MessageId(message.id.get()),
            });
        }

        let response = CreateInteractionResponse::Message(convert::interaction_message(reply));
        if let Err(e) = self.interaction.create_response(&self.http, response).await {
            self.responded.store(false, Ordering::SeqCst);
            return Err(GatewayError::classify(e));
        }
        Ok(SentMessage::Original)
    }
}

#[async_trait]
impl Outbox for InteractionOutbox {
    async fn send(&self, reply: Reply) -> Result<SentMessage, OutboxError> {
        Ok(self.respond(&reply).await?)
    }

    async fn edit(&self, message: &SentMessage, reply: Reply) -> Result<(), OutboxError> {
        match message {
            SentMessage::Original => {
                self.interaction
                    .edit_response(&self.http, convert::edit_response(&reply))
                    .await
                    .map_err(GatewayError::classify)?;
            }
            SentMessage::Followup { message } => {
                self.interaction
                    .edit_followup(
                        &self.http,
                        MessageId::new(message.get()),
                        convert::edit_followup(&reply),
                    )
                    .await
                    .map_err(GatewayError::classify)?;
            }
            SentMessage::Channel { .. } => edit_channel_message(&self.http, message, &reply).await?,
        }
        Ok(())
    }

    async fn send_direct(&self, user: bot_core::UserId, reply: Reply) -> Result<(), OutboxError> {
        Ok(send_direct(&self.http, user, &reply).await?)
    }

    async fn lookup_user(
        &self,
        guild: Option<bot_core::GuildId>,
        user: bot_core::UserId,
    ) -> Result<Option<UserProfile>, OutboxError> {
        Ok(lookup_user(&self.http, guild, user).await?)
    }
}
