use super::{fetch_error_embed, fetch_record};
use async_trait::async_trait;
use bot_core::{CommandHandler, CommandResult, Embed, Invocation};
use fetchers::{BitcoinPrice, HttpFetcher};
use std::sync::Arc;

pub struct BitcoinHandler {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl BitcoinHandler {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for BitcoinHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = match fetch_record::<BitcoinPrice>(&self.fetcher, &self.url).await {
            Ok(price) => Embed::success(format!("The current price is {} dollar", price.rate)),
            Err(e) => fetch_error_embed(&e),
        };
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
