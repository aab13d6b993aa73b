//! Per-user, per-command cooldown buckets.

use crate::types::UserId;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Default)]
pub struct Cooldowns {
    last_used: Mutex<HashMap<(String, UserId), Instant>>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use of `command` by `user`.
    ///
    /// Returns the remaining wait when the previous use is still within
    /// `period`; the bucket is not refreshed in that case.
    pub fn hit(&self, command: &str, user: UserId, period: Duration) -> Option<Duration> {
        let now = Instant::now();
        let mut last_used = match self.last_used.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let key = (command.to_string(), user);
        if let Some(previous) = last_used.get(&key) {
            let elapsed = now.duration_since(*previous);
            if elapsed < period {
                return Some(period - elapsed);
            }
        }

        last_used.insert(key, now);
        // Drop buckets that can no longer block anyone.
        last_used.retain(|_, at| now.duration_since(*at) < period.max(Duration::from_secs(3600)));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_second_use_within_period_is_blocked() {
        let cooldowns = Cooldowns::new();
        let period = Duration::from_secs(3);

        assert!(cooldowns.hit("dog", UserId(1), period).is_none());
        tokio::time::advance(Duration::from_secs(1)).await;

        let remaining = cooldowns.hit("dog", UserId(1), period).unwrap();
        assert_eq!(remaining, Duration::from_secs(2));

        // Other users and other commands have their own buckets.
        assert!(cooldowns.hit("dog", UserId(2), period).is_none());
        assert!(cooldowns.hit("cat", UserId(1), period).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_use_after_period_is_allowed() {
        let cooldowns = Cooldowns::new();
        let period = Duration::from_secs(3);

        assert!(cooldowns.hit("dog", UserId(1), period).is_none());
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(cooldowns.hit("dog", UserId(1), period).is_none());
    }
}
