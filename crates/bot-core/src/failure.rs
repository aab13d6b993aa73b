//! Failure taxonomy consumed by the error dispatcher.

use crate::types::Permission;
use std::time::Duration;
use thiserror::Error;

/// A failure raised while dispatching or executing a command.
#[derive(Error, Debug)]
pub enum FailureRecord {
    #[error("You are on cooldown. Try again in {:.2}s", .retry_after.as_secs_f64())]
    Cooldown { retry_after: Duration },

    #[error("User is blacklisted")]
    Blacklisted,

    #[error("User is not an owner of the bot")]
    NotOwner,

    #[error("Missing permissions: {}", join_permissions(.0))]
    MissingPermission(Vec<Permission>),

    #[error("Bot is missing permissions: {}", join_permissions(.0))]
    BotMissingPermission(Vec<Permission>),

    #[error("{0} is a required argument that is missing.")]
    MissingArgument(String),

    #[error("Command \"{0}\" is not found")]
    UnknownCommand(String),

    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl FailureRecord {
    /// Wrap any error as an unclassified failure.
    pub fn unclassified(error: impl Into<anyhow::Error>) -> Self {
        FailureRecord::Unclassified(error.into())
    }
}

pub(crate) fn join_permissions(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type returned by command handlers and the registry.
pub type CommandResult<T = ()> = Result<T, FailureRecord>;
