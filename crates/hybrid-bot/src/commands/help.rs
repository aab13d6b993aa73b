//! Help command - lists every registered command by category.

use async_trait::async_trait;
use bot_core::{capitalize, CommandHandler, CommandResult, Embed, Invocation};

pub struct HelpHandler {
    prefix: String,
}

impl HelpHandler {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Help embed for everything in the registry.
    pub fn render(&self, invocation: &Invocation<'_>) -> Embed {
        let mut embed = Embed::success("List of available commands:").title("Help");
        for (category, specs) in invocation.registry.by_category() {
            let lines = specs
                .iter()
                .map(|spec| format!("{}{} - {}", self.prefix, spec.name, spec.summary()))
                .collect::<Vec<_>>()
                .join("\n");
            embed = embed.field(capitalize(category), format!("```{}```", lines), false);
        }
        embed
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        invocation.out.send(self.render(invocation).into()).await?;
        Ok(())
    }
}
