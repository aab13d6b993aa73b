use async_trait::async_trait;
use bot_core::{CommandHandler, CommandResult, Embed, Invocation};

pub struct PingHandler;

impl PingHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PingHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for PingHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        // No heartbeat has been acknowledged yet right after connecting.
        let latency = invocation
            .ctx
            .latency
            .map(|l| l.as_millis().to_string())
            .unwrap_or_else(|| "?".into());

        let embed = Embed::success(format!("The bot latency is `{}ms.`", latency)).title("🏓 Pong!");
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
