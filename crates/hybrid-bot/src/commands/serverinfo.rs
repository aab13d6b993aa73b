use crate::config::DisplayConfig;
use async_trait::async_trait;
use bot_core::{Colour, CommandHandler, CommandResult, Embed, GuildInfo, Invocation};

pub struct ServerInfoHandler {
    display: DisplayConfig,
}

impl ServerInfoHandler {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    pub fn render(&self, guild: &GuildInfo) -> Embed {
        let title = self
            .display
            .server_title
            .clone()
            .unwrap_or_else(|| guild.name.clone());
        let description = self
            .display
            .server_description
            .clone()
            .unwrap_or_else(|| format!("This server is owned by {}", self.display.owner_name));

        let mut embed = Embed::new(Colour::BLACK).title(title).description(description);
        if let Some(icon) = &guild.icon_url {
            embed = embed.thumbnail(icon);
        }
        embed
            .field("Created", guild.created_at.format("%a, %d %b %Y").to_string(), false)
            .field(
                "Members",
                format!(
                    "{} online out of {} ({}%)",
                    guild.online_count,
                    guild.member_count,
                    online_percentage(guild)
                ),
                false,
            )
            .field("Booster", guild.boosters.to_string(), false)
    }
}

/// Share of online members, rounded to two decimals.
fn online_percentage(guild: &GuildInfo) -> f64 {
    if guild.member_count == 0 {
        return 0.0;
    }
    let pct = guild.online_count as f64 / guild.member_count as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

#[async_trait]
impl CommandHandler for ServerInfoHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = match &invocation.ctx.guild {
            Some(guild) => self.render(guild),
            None => Embed::failure("This command can only be used in a server."),
        };
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
