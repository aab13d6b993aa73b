//! Per-invocation execution context.

use crate::types::{ChannelId, GuildInfo, PermissionSet, UserId, UserProfile};
use std::collections::BTreeMap;
use std::time::Duration;

/// Which surface a command arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Prefixed or mention-prefixed text message.
    Prefix,
    /// Declarative slash-style command.
    Slash,
}

/// Raw, unbound command arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArgs {
    /// Everything after the command name in a text invocation.
    Text(String),
    /// Named options from a slash-style invocation.
    Named(BTreeMap<String, String>),
}

impl Default for RawArgs {
    fn default() -> Self {
        RawArgs::Text(String::new())
    }
}

/// Everything the pipeline knows about one command invocation.
///
/// Created by the gateway layer and passed by reference through guard,
/// registry, handler and dispatcher. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub author: UserProfile,
    /// Absent for direct messages.
    pub guild: Option<GuildInfo>,
    pub channel_id: ChannelId,
    pub command: String,
    pub args: RawArgs,
    pub surface: Surface,
    /// Invoker's permissions in the channel, when the gateway could resolve them.
    pub author_permissions: Option<PermissionSet>,
    /// Bot's permissions in the channel, when the gateway could resolve them.
    pub bot_permissions: Option<PermissionSet>,
    /// Gateway heartbeat latency.
    pub latency: Option<Duration>,
}

impl ExecutionContext {
    pub fn new(
        author: UserProfile,
        channel_id: ChannelId,
        command: impl Into<String>,
        args: RawArgs,
        surface: Surface,
    ) -> Self {
        Self {
            author,
            guild: None,
            channel_id,
            command: command.into(),
            args,
            surface,
            author_permissions: None,
            bot_permissions: None,
            latency: None,
        }
    }

    pub fn with_guild(mut self, guild: GuildInfo) -> Self {
        self.guild = Some(guild);
        self
    }

    pub fn author_id(&self) -> UserId {
        self.author.id
    }

    pub fn is_direct_message(&self) -> bool {
        self.guild.is_none()
    }

    /// Human-readable location for log lines.
    pub fn location(&self) -> String {
        match &self.guild {
            Some(guild) => format!("in {} (ID: {})", guild.name, guild.id),
            None => "in DMs".to_string(),
        }
    }
}

/// Command name and remaining text of a text invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInvocation<'a> {
    pub command: &'a str,
    pub rest: &'a str,
}

/// Split a message into command name and arguments.
///
/// A message is an invocation when it starts with `prefix` or with a mention
/// of the bot (`<@id>` or `<@!id>`). Returns `None` for ordinary messages.
pub fn parse_text_invocation<'a>(
    content: &'a str,
    prefix: &str,
    bot_id: Option<UserId>,
) -> Option<TextInvocation<'a>> {
    let content = content.trim_start();
    let body = strip_mention(content, bot_id).or_else(|| {
        if prefix.is_empty() {
            None
        } else {
            content.strip_prefix(prefix)
        }
    })?;

    let body = body.trim_start();
    let (command, rest) = match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], body[idx..].trim()),
        None => (body, ""),
    };

    if command.is_empty() {
        return None;
    }
    Some(TextInvocation { command, rest })
}

fn strip_mention(content: &str, bot_id: Option<UserId>) -> Option<&str> {
    let id = bot_id?;
    let plain = format!("<@{}>", id);
    let nick = format!("<@!{}>", id);
    content
        .strip_prefix(plain.as_str())
        .or_else(|| content.strip_prefix(nick.as_str()))
}
