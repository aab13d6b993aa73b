use super::{fetch_error_embed, fetch_record};
use async_trait::async_trait;
use bot_core::{Colour, CommandHandler, CommandResult, Embed, Invocation};
use fetchers::{DogImage, HttpFetcher};
use std::sync::Arc;

pub struct DogHandler {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl DogHandler {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for DogHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let embed = match fetch_record::<DogImage>(&self.fetcher, &self.url).await {
            Ok(dog) => Embed::new(Colour::GREEN).title("Woof Woof!").image(dog.url),
            Err(e) => fetch_error_embed(&e),
        };
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
