//! Invite links, delivered by direct message.

use async_trait::async_trait;
use bot_core::{Colour, CommandHandler, CommandResult, Embed, Invocation, OutboxError, Reply};
use tracing::debug;

/// DM `embed` to the invoker and confirm in the channel; post it in the
/// channel instead when the invoker does not accept direct messages.
async fn send_privately(invocation: &Invocation<'_>, embed: Embed) -> CommandResult {
    let out = invocation.out;
    match out.send_direct(invocation.ctx.author.id, embed.clone().into()).await {
        Ok(()) => {
            out.send(Reply::text("I sent you a private message!")).await?;
        }
        Err(OutboxError::Forbidden(reason)) => {
            debug!(user = %invocation.ctx.author.id, %reason, "Direct message refused, replying in channel");
            out.send(embed.into()).await?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub struct InviteHandler {
    application_id: u64,
    permissions: u64,
}

impl InviteHandler {
    pub fn new(application_id: u64, permissions: u64) -> Self {
        Self {
            application_id,
            permissions,
        }
    }

    pub fn link(&self) -> String {
        format!(
            "https://discordapp.com/oauth2/authorize?&client_id={}&scope=bot+applications.commands&permissions={}",
            self.application_id, self.permissions
        )
    }
}

#[async_trait]
impl CommandHandler for InviteHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = Embed::new(Colour::PINK)
            .description(format!("Invite me by clicking [here]({}).", self.link()));
        send_privately(invocation, embed).await
    }
}

pub struct SupportServerHandler {
    invite: String,
}

impl SupportServerHandler {
    pub fn new(invite: impl Into<String>) -> Self {
        Self {
            invite: invite.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for SupportServerHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = Embed::new(Colour::PINK).description(format!(
            "Join the support server for the bot by clicking [here]({}).",
            self.invite
        ));
        send_privately(invocation, embed).await
    }
}
