use async_trait::async_trait;
use bot_core::{Colour, CommandHandler, CommandResult, Embed, Invocation};
use fetchers::cat_image_url;

pub struct CatHandler {
    base_url: String,
}

impl CatHandler {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for CatHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        // Both are required; binding has already rejected a missing value.
        let word = invocation.args.str("word").unwrap_or_default();
        let size = invocation.args.int("size").unwrap_or_default();

        let embed = Embed::new(Colour::GREEN)
            .title("Meow")
            .image(cat_image_url(&self.base_url, word, size));
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
