//! Rps command - rock paper scissors through a select menu.

use super::expired_embed;
use async_trait::async_trait;
use bot_core::games::{Hand, Verdict};
use bot_core::{
    choice_select, Colour, CommandHandler, CommandResult, Embed, FailureRecord,
    InteractionController, Invocation, Reply, SelectOption, SessionOutcome, UserProfile,
};
use std::sync::Arc;

pub struct RpsHandler {
    interactions: Arc<InteractionController>,
}

impl RpsHandler {
    pub fn new(interactions: Arc<InteractionController>) -> Self {
        Self { interactions }
    }
}

fn options() -> Vec<SelectOption> {
    [
        ("Scissors", Hand::Scissors, "You choose scissors.", "✂"),
        ("Rock", Hand::Rock, "You choose rock.", "🪨"),
        ("paper", Hand::Paper, "You choose paper.", "🧻"),
    ]
    .into_iter()
    .map(|(label, hand, description, emoji)| SelectOption {
        label: label.to_string(),
        value: hand.token().to_string(),
        description: Some(description.to_string()),
        emoji: Some(emoji.to_string()),
    })
    .collect()
}

/// Result embed, authored by the player.
pub fn render(player: &UserProfile, chosen: Hand, drawn: Hand) -> Embed {
    let (headline, colour) = match Hand::judge(chosen, drawn) {
        Verdict::Draw => ("That's a draw!", Colour::ORANGE),
        Verdict::Win => ("You won!", Colour::GREEN),
        Verdict::Loss => ("I won!", Colour::RED),
    };
    Embed::new(colour)
        .author(&player.name, player.avatar_url.clone())
        .description(format!(
            "**{}**\nYou've chosen {} and I've chosen {}.",
            headline,
            chosen.token(),
            drawn.token()
        ))
}

#[async_trait]
impl CommandHandler for RpsHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let tokens = Hand::ALL.map(Hand::token);
        let session = self.interactions.open(&tokens);
        let prompt = Reply::text("Please make your choice")
            .with_component(choice_select(&session, "Choose...", options()));

        let message = invocation.out.send(prompt).await?;

        let result = match self.interactions.wait(&session).await {
            SessionOutcome::Resolved(token) => {
                let chosen: Hand = token.parse().map_err(FailureRecord::unclassified)?;
                let drawn = Hand::draw(&mut rand::thread_rng());
                render(&invocation.ctx.author, chosen, drawn)
            }
            SessionOutcome::TimedOut => expired_embed(),
        };

        invocation.out.edit(&message, result.into()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_core::UserId;
    use chrono::Utc;

    #[test]
    fn test_render_colours() {
        let player = UserProfile::new(UserId(1), "trqngdk", Utc::now());

        let draw = render(&player, Hand::Rock, Hand::Rock);
        assert_eq!(draw.colour, Colour::ORANGE);
        assert_eq!(
            draw.description.as_deref(),
            Some("**That's a draw!**\nYou've chosen rock and I've chosen rock.")
        );
        assert_eq!(draw.author.unwrap().name, "trqngdk");

        assert_eq!(render(&player, Hand::Paper, Hand::Rock).colour, Colour::GREEN);
        assert_eq!(render(&player, Hand::Scissors, Hand::Rock).colour, Colour::RED);
    }

    #[test]
    fn test_option_values_are_tokens() {
        let values: Vec<String> = options().into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["scissors", "rock", "paper"]);
    }
}
