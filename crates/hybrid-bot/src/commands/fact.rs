use super::{fetch_error_embed, fetch_record};
use async_trait::async_trait;
use bot_core::{CommandHandler, CommandResult, Embed, Invocation};
use fetchers::{FactRecord, HttpFetcher};
use std::sync::Arc;

pub struct FactHandler {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl FactHandler {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for FactHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = match fetch_record::<FactRecord>(&self.fetcher, &self.url).await {
            Ok(fact) => Embed::success(fact.text),
            Err(e) => fetch_error_embed(&e),
        };
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
