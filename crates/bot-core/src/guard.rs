//! Pre-execution blacklist guard.

use crate::failure::FailureRecord;
use crate::types::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Read-only view of the blacklist store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Blacklist: Send + Sync {
    /// Whether `user` is blacklisted.
    async fn contains(&self, user: UserId) -> bool;
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResult {
    Allowed,
    Denied(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Blacklisted,
}

impl GuardResult {
    /// Convert into the failure that routes a denial to the dispatcher.
    pub fn into_result(self) -> Result<(), FailureRecord> {
        match self {
            GuardResult::Allowed => Ok(()),
            GuardResult::Denied(DenyReason::Blacklisted) => Err(FailureRecord::Blacklisted),
        }
    }
}

/// Runs before every command body, on every surface.
#[derive(Clone)]
pub struct Guard {
    blacklist: Arc<dyn Blacklist>,
}

impl Guard {
    pub fn new(blacklist: Arc<dyn Blacklist>) -> Self {
        Self { blacklist }
    }

    pub async fn check(&self, user: UserId) -> GuardResult {
        if self.blacklist.contains(user).await {
            debug!(user = %user, "Guard denied blacklisted user");
            GuardResult::Denied(DenyReason::Blacklisted)
        } else {
            GuardResult::Allowed
        }
    }
}
