use crate::config::DisplayConfig;
use async_trait::async_trait;
use bot_core::{Colour, CommandHandler, CommandResult, Embed, Invocation};

pub struct BotInfoHandler {
    display: DisplayConfig,
    prefix: String,
}

impl BotInfoHandler {
    pub fn new(display: DisplayConfig, prefix: impl Into<String>) -> Self {
        Self {
            display,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for BotInfoHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = Embed::new(Colour::BLACK)
            .description(&self.display.description)
            .author("Bot Information", None)
            .field("Owner:", &self.display.owner_name, true)
            .field("Version:", env!("CARGO_PKG_VERSION"), true)
            .field(
                "Prefix:",
                format!("/ (Slash Commands) or {} for normal commands", self.prefix),
                false,
            )
            .footer(format!("Requested by {}", invocation.ctx.author.name));

        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
