use async_trait::async_trait;
use bot_core::{CommandHandler, CommandResult, Embed, Invocation};
use rand::seq::SliceRandom;

pub const ANSWERS: [&str; 20] = [
    "It is certain.",
    "It is decidedly so.",
    "You may rely on it.",
    "Without a doubt.",
    "Yes - definitely.",
    "As I see, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again later.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very doubtful.",
];

pub struct EightBallHandler;

impl EightBallHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EightBallHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for EightBallHandler {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
        let question = invocation.args.str("question").unwrap_or_default();
        let answer = ANSWERS.choose(&mut rand::thread_rng()).copied().unwrap_or(ANSWERS[0]);

        let embed = Embed::success(answer)
            .title("**My answer:**")
            .footer(format!("The question was: {}", question));
        invocation.out.send(embed.into()).await?;
        Ok(())
    }
}
