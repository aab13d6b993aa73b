//! Command dispatch core for a hybrid (prefix + slash) chat bot.
//!
//! The gateway delivers [`ExecutionContext`]s; the [`CommandPipeline`] runs the
//! blacklist [`Guard`], the registry checks and the handler, and turns known
//! failures into replies through the [`ErrorDispatcher`]. Interactive flows
//! (buttons, selects) go through the [`InteractionController`].

mod args;
mod context;
mod cooldown;
mod dispatcher;
mod embed;
mod failure;
mod gateway;
mod guard;
mod interaction;
mod pipeline;
mod registry;
mod types;

pub mod games;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use args::{bind, parse_user, ArgValue, Arguments, ParamKind, ParamSpec};
pub use context::{parse_text_invocation, ExecutionContext, RawArgs, Surface, TextInvocation};
pub use cooldown::Cooldowns;
pub use dispatcher::{capitalize, format_retry_after, ErrorDispatcher};
pub use embed::*;
pub use failure::{CommandResult, FailureRecord};
pub use gateway::{Outbox, OutboxError, SentMessage};
pub use guard::{Blacklist, DenyReason, Guard, GuardResult};
pub use interaction::{
    choice_buttons, choice_select, ComponentEvent, InteractionController, InteractionSession,
    OpenSession, RouteOutcome, SessionOutcome, SessionState,
};
pub use pipeline::CommandPipeline;
pub use registry::{CommandHandler, CommandRegistry, CommandSpec, Invocation};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingOutbox;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StaticBlacklist(Vec<UserId>);

    #[async_trait]
    impl Blacklist for StaticBlacklist {
        async fn contains(&self, user: UserId) -> bool {
            self.0.contains(&user)
        }
    }

    struct Echo;

    #[async_trait]
    impl CommandHandler for Echo {
        async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
            let word = invocation.args.str("word").unwrap_or_default().to_string();
            invocation.out.send(Reply::embed(Embed::success(word))).await?;
            Ok(())
        }
    }

    struct Explodes;

    #[async_trait]
    impl CommandHandler for Explodes {
        async fn execute(&self, _invocation: &Invocation<'_>) -> CommandResult {
            Err(FailureRecord::unclassified(anyhow::anyhow!("boom")))
        }
    }

    fn pipeline() -> CommandPipeline {
        let guard = Guard::new(Arc::new(StaticBlacklist(vec![UserId(66)])));
        let mut registry = CommandRegistry::new(guard, Vec::new());
        registry
            .register("echo", "Echo a word.", Echo)
            .param(ParamSpec::string("word", "Provide a word."));
        registry.register("explode", "Always fails.", Explodes);
        CommandPipeline::new(registry)
    }

    fn ctx(user: u64, command: &str, args: &str) -> ExecutionContext {
        ExecutionContext::new(
            UserProfile::new(UserId(user), "user", chrono::Utc::now()),
            ChannelId(1),
            command,
            RawArgs::Text(args.into()),
            Surface::Prefix,
        )
    }

    #[tokio::test]
    async fn test_success_reply() {
        let out = RecordingOutbox::new();
        pipeline().handle(&ctx(1, "echo", "hello"), &out).await.unwrap();

        let sent = out.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].embed.as_ref().unwrap().colour, Colour::GREEN);
    }

    #[tokio::test]
    async fn test_blacklisted_user_gets_red_notice() {
        let out = RecordingOutbox::new();
        pipeline().handle(&ctx(66, "echo", "hello"), &out).await.unwrap();

        let sent = out.sent();
        assert_eq!(sent.len(), 1);
        let embed = sent[0].embed.as_ref().unwrap();
        assert_eq!(embed.colour, Colour::RED);
        assert_eq!(
            embed.description.as_deref(),
            Some("You are blacklisted from using the bot!")
        );
    }

    #[tokio::test]
    async fn test_missing_argument_reply() {
        let out = RecordingOutbox::new();
        pipeline().handle(&ctx(1, "echo", ""), &out).await.unwrap();

        let embed = out.sent()[0].embed.clone().unwrap();
        assert_eq!(
            embed.description.as_deref(),
            Some("Word is a required argument that is missing.")
        );
    }

    #[tokio::test]
    async fn test_unknown_command_sends_nothing() {
        let out = RecordingOutbox::new();
        pipeline().handle(&ctx(1, "nope", ""), &out).await.unwrap();
        assert!(out.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unclassified_escapes_pipeline() {
        let out = RecordingOutbox::new();
        let err = pipeline().handle(&ctx(1, "explode", ""), &out).await.unwrap_err();
        assert!(matches!(err, FailureRecord::Unclassified(_)));
        assert!(out.sent().is_empty());
    }
}
