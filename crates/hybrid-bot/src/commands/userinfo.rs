//! Userinfo command - profile of the invoker or of a mentioned user.

use anyhow::anyhow;
use async_trait::async_trait;
use bot_core::{Colour, CommandHandler, CommandResult, Embed, FailureRecord, Invocation, UserProfile};
use chrono::{DateTime, Utc};

const DATE_FORMAT: &str = "%a, %d %b %Y %I:%M %p";

pub struct UserInfoHandler;

impl UserInfoHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UserInfoHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole days, or `H:MM:SS` under a day.
pub fn account_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(created_at);
    match age.num_days() {
        0 => {
            let secs = age.num_seconds().max(0);
            format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
        }
        1 => "1 day".to_string(),
        days => format!("{} days", days),
    }
}

pub fn render(user: &UserProfile, now: DateTime<Utc>) -> Embed {
    let badges = if user.badges.is_empty() {
        "None".to_string()
    } else {
        user.badges.join(", ")
    };

    let mut embed = Embed::new(Colour::BLACK).title(&user.name);
    if let Some(avatar) = &user.avatar_url {
        embed = embed.thumbnail(avatar);
    }
    embed = embed.field("Badges", badges, true).field(
        "Origin",
        format!(
            "{} ({})",
            user.created_at.format(DATE_FORMAT),
            account_age(user.created_at, now)
        ),
        false,
    );
    if let Some(joined) = user.joined_at {
        embed = embed.field("Joined", joined.format(DATE_FORMAT).to_string(), false);
    }
    if !user.roles.is_empty() {
        embed = embed.field("\n", user.roles.join(" "), false);
    }
    embed
}

#[async_trait]
impl CommandHandler for UserInfoHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let ctx = invocation.ctx;
        let user = match invocation.args.user("user") {
            None => ctx.author.clone(),
            Some(id) if id == ctx.author.id => ctx.author.clone(),
            Some(id) => invocation
                .out
                .lookup_user(ctx.guild.as_ref().map(|g| g.id), id)
                .await?
                .ok_or_else(|| FailureRecord::Unclassified(anyhow!("Member \"{}\" not found.", id)))?,
        };

        invocation.out.send(render(&user, Utc::now()).into()).await?;
        Ok(())
    }
}
