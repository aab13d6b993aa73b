//! Coinflip command - bet on heads or tails with buttons.

use super::expired_embed;
use async_trait::async_trait;
use bot_core::games::{CoinSide, Verdict};
use bot_core::{
    choice_buttons, CommandHandler, CommandResult, Embed, FailureRecord, InteractionController,
    Invocation, Reply, SessionOutcome,
};
use std::sync::Arc;

pub struct CoinFlipHandler {
    interactions: Arc<InteractionController>,
}

impl CoinFlipHandler {
    pub fn new(interactions: Arc<InteractionController>) -> Self {
        Self { interactions }
    }
}

/// Result embed for a resolved bet.
pub fn render(bet: CoinSide, flipped: CoinSide) -> Embed {
    match CoinSide::judge(bet, flipped) {
        Verdict::Win => Embed::success(format!(
            "Correct! You guessed `{}` and I flipped the coin to `{}`.",
            bet.token(),
            flipped.token()
        )),
        _ => Embed::failure(format!(
            "Woops! You guessed `{}` and I flipped the coin to `{}`, better luck next time!",
            bet.token(),
            flipped.token()
        )),
    }
}

#[async_trait]
impl CommandHandler for CoinFlipHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let tokens = CoinSide::ALL.map(CoinSide::token);
        let session = self.interactions.open(&tokens);
        let buttons = choice_buttons(&session, &CoinSide::ALL.map(|side| (side.token(), side.label())));
        let prompt = Reply::embed(Embed::success("What is your bet?")).with_component(buttons);

        let message = invocation.out.send(prompt).await?;

        let result = match self.interactions.wait(&session).await {
            SessionOutcome::Resolved(token) => {
                let bet: CoinSide = token.parse().map_err(FailureRecord::unclassified)?;
                // Flip only once the bet is known.
                let flipped = CoinSide::flip(&mut rand::thread_rng());
                render(bet, flipped)
            }
            SessionOutcome::TimedOut => expired_embed(),
        };

        invocation.out.edit(&message, result.into()).await?;
        Ok(())
    }
}
