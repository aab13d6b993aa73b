//! Maps failures to user-facing messages and log records.

use crate::context::ExecutionContext;
use crate::embed::{Embed, Reply};
use crate::failure::{join_permissions, FailureRecord};
use std::time::Duration;
use tracing::{debug, warn};

/// Classifies failures raised by the registry or by handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorDispatcher;

impl ErrorDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Produce the reply for a known failure.
    ///
    /// `Ok(None)` means the failure is deliberately silent (unknown command).
    /// Unclassified failures are handed back unchanged so the caller can
    /// propagate them to the process boundary.
    pub fn handle(
        &self,
        failure: FailureRecord,
        ctx: &ExecutionContext,
    ) -> Result<Option<Reply>, FailureRecord> {
        let embed = match failure {
            FailureRecord::Cooldown { retry_after } => Embed::failure(format!(
                "**Please slow down** - You can use this command again in {}.",
                format_retry_after(retry_after)
            )),
            FailureRecord::Blacklisted => {
                warn!(
                    "{} (ID: {}) tried to execute a command {}, but the user is blacklisted from using the bot.",
                    ctx.author.name,
                    ctx.author.id,
                    ctx.location()
                );
                Embed::failure("You are blacklisted from using the bot!")
            }
            FailureRecord::NotOwner => {
                warn!(
                    "{} (ID: {}) tried to execute an owner only command {}, but the user is not an owner of the bot.",
                    ctx.author.name,
                    ctx.author.id,
                    ctx.location()
                );
                Embed::failure("You are not the owner of the bot!")
            }
            FailureRecord::MissingPermission(missing) => Embed::failure(format!(
                "You are missing the permission(s) `{}` to execute this command!",
                join_permissions(&missing)
            )),
            FailureRecord::BotMissingPermission(missing) => Embed::failure(format!(
                "I am missing the permission(s) `{}` to fully perform this command!",
                join_permissions(&missing)
            )),
            failure @ FailureRecord::MissingArgument(_) => {
                Embed::error(capitalize(&failure.to_string()))
            }
            FailureRecord::UnknownCommand(name) => {
                debug!(command = %name, "Ignoring unknown command");
                return Ok(None);
            }
            unclassified @ FailureRecord::Unclassified(_) => return Err(unclassified),
        };

        Ok(Some(Reply::embed(embed)))
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Render a wait as `"1 hours 2 minutes 5 seconds"`, skipping zero parts.
///
/// Hours wrap at 24, as the cooldown message never spans days.
pub fn format_retry_after(retry_after: Duration) -> String {
    let total = retry_after.as_secs_f64();
    let minutes = (total / 60.0).floor();
    let seconds = total - minutes * 60.0;
    let hours = (minutes / 60.0).floor();
    let minutes = minutes - hours * 60.0;
    let hours = hours % 24.0;

    let parts: Vec<String> = [(hours, "hours"), (minutes, "minutes"), (seconds, "seconds")]
        .into_iter()
        .filter_map(|(value, unit)| {
            let rounded = value.round() as u64;
            (rounded > 0).then(|| format!("{} {}", rounded, unit))
        })
        .collect();

    parts.join(" ")
}
