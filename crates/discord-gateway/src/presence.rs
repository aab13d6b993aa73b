//! Rotating "playing" status.

use rand::seq::SliceRandom;
use rand::Rng;
use serenity::client::Context;
use serenity::gateway::ActivityData;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const MIN_INTERVAL: Duration = Duration::from_secs(1);

pub fn pick_status<'a, R: Rng + ?Sized>(statuses: &'a [String], rng: &mut R) -> Option<&'a str> {
    statuses.choose(rng).map(String::as_str)
}

/// Set a random status from `statuses` now and every `interval` after.
pub fn spawn_rotation(ctx: Context, statuses: Vec<String>, interval: Duration) -> Option<JoinHandle<()>> {
    if statuses.is_empty() {
        return None;
    }
    info!(count = statuses.len(), ?interval, "Starting status rotation");

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));
        loop {
            ticker.tick().await;
            let status = pick_status(&statuses, &mut rand::thread_rng()).map(str::to_owned);
            if let Some(status) = status {
                debug!(status = %status, "Changing presence");
                ctx.set_activity(Some(ActivityData::playing(status)));
            }
        }
    }))
}
