use super::{fetch_error_embed, fetch_record};
use async_trait::async_trait;
use bot_core::{Colour, CommandHandler, CommandResult, Embed, Invocation};
use chrono::Utc;
use fetchers::{CovidStatus, HttpFetcher};
use std::sync::Arc;

pub struct CovidHandler {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl CovidHandler {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

fn render(status: CovidStatus) -> Embed {
    Embed::new(Colour::GREEN)
        .title("Vietnam's Covid-19 Status")
        .field("Infected", status.infected, true)
        .field("Recovered", status.recovered, true)
        .field("Died", status.died, true)
        .field("Infected Today", status.infected_today, true)
        .field("Recovered Today", status.recovered_today, true)
        .field("Died Today", status.died_today, true)
        .timestamp(Utc::now())
}

#[async_trait]
impl CommandHandler for CovidHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = match fetch_record::<CovidStatus>(&self.fetcher, &self.url).await {
            Ok(status) => render(status),
            Err(e) => fetch_error_embed(&e),
        };
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
