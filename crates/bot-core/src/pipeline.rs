//! Inbound command event → registry → dispatcher → reply.

use crate::context::ExecutionContext;
use crate::dispatcher::ErrorDispatcher;
use crate::failure::CommandResult;
use crate::gateway::Outbox;
use crate::registry::CommandRegistry;
use tracing::info;

/// Runs one invocation end to end.
pub struct CommandPipeline {
    registry: CommandRegistry,
    dispatcher: ErrorDispatcher,
}

impl CommandPipeline {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            dispatcher: ErrorDispatcher::new(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch `ctx` and turn known failures into replies.
    ///
    /// Returns `Err` only for unclassified failures, which the caller is
    /// expected to log and surface as its own fault.
    pub async fn handle(&self, ctx: &ExecutionContext, out: &dyn Outbox) -> CommandResult {
        match self.registry.dispatch(ctx, out).await {
            Ok(()) => {
                info!(
                    "Executed {} command {} by {} (ID: {})",
                    ctx.command,
                    ctx.location(),
                    ctx.author.name,
                    ctx.author.id
                );
                Ok(())
            }
            Err(failure) => {
                if let Some(reply) = self.dispatcher.handle(failure, ctx)? {
                    out.send(reply).await?;
                }
                Ok(())
            }
        }
    }
}
