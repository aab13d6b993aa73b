//! Test doubles for crates built on top of the pipeline.

use crate::embed::Reply;
use crate::gateway::{Outbox, OutboxError, SentMessage};
use crate::types::{ChannelId, GuildId, MessageId, UserId, UserProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Outbox that records everything sent through it.
#[derive(Default)]
pub struct RecordingOutbox {
    sent: Mutex<Vec<Reply>>,
    edits: Mutex<Vec<(SentMessage, Reply)>>,
    direct: Mutex<Vec<(UserId, Reply)>>,
    users: Mutex<HashMap<UserId, UserProfile>>,
    dm_forbidden: Mutex<bool>,
    activity: Notify,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `send_direct` fail with `Forbidden`.
    pub fn forbid_direct_messages(&self) {
        *self.dm_forbidden.lock().unwrap() = true;
    }

    /// Make `lookup_user` find `profile`.
    pub fn add_user(&self, profile: UserProfile) {
        self.users.lock().unwrap().insert(profile.id, profile);
    }

    pub fn sent(&self) -> Vec<Reply> {
        self.sent.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<(SentMessage, Reply)> {
        self.edits.lock().unwrap().clone()
    }

    pub fn direct(&self) -> Vec<(UserId, Reply)> {
        self.direct.lock().unwrap().clone()
    }

    /// Wait until at least `count` replies were sent.
    pub async fn wait_for_sent(&self, count: usize) -> Vec<Reply> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let notified = self.activity.notified();
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                panic!("expected {} sent replies, got {}", count, self.sent().len());
            }
        }
    }
}

#[async_trait]
impl Outbox for RecordingOutbox {
    async fn send(&self, reply: Reply) -> Result<SentMessage, OutboxError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(reply);
        let handle = SentMessage::Channel {
            channel: ChannelId(1),
            message: MessageId(sent.len() as u64),
        };
        drop(sent);
        self.activity.notify_waiters();
        Ok(handle)
    }

    async fn edit(&self, message: &SentMessage, reply: Reply) -> Result<(), OutboxError> {
        self.edits.lock().unwrap().push((message.clone(), reply));
        self.activity.notify_waiters();
        Ok(())
    }

    async fn send_direct(&self, user: UserId, reply: Reply) -> Result<(), OutboxError> {
        if *self.dm_forbidden.lock().unwrap() {
            return Err(OutboxError::Forbidden("Cannot send messages to this user".into()));
        }
        self.direct.lock().unwrap().push((user, reply));
        Ok(())
    }

    async fn lookup_user(
        &self,
        _guild: Option<GuildId>,
        user: UserId,
    ) -> Result<Option<UserProfile>, OutboxError> {
        Ok(self.users.lock().unwrap().get(&user).cloned())
    }
}
