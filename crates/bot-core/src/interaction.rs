//! Short-lived interactive sessions (buttons and select menus).
//!
//! A command opens a session, attaches components whose custom ids address
//! it, and then suspends in [`InteractionController::wait`] until the first
//! valid selection arrives or the timeout elapses. Component events from the
//! gateway are routed back with [`InteractionController::route`]. Dropping
//! the [`OpenSession`] handle, even mid-wait, unregisters the session.

use crate::embed::{ActionRow, Button, ButtonStyle, SelectMenu, SelectOption};
use crate::types::UserId;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;
use tracing::{debug, info};

/// Custom id suffix used by select menus; the chosen value carries the token.
const SELECT_SUFFIX: &str = "select";

/// State of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Resolved(String),
    TimedOut,
}

/// How a finished wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Resolved(String),
    TimedOut,
}

/// A component event delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEvent {
    pub custom_id: String,
    /// Selected values, for select menus.
    pub values: Vec<String>,
    pub user: UserId,
}

/// What happened to a routed component event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The event resolved its session.
    Resolved,
    /// Unknown session, completed session or invalid token.
    Ignored,
}

/// One pending UI flow.
pub struct InteractionSession {
    id: String,
    choices: Vec<String>,
    state: Mutex<SessionState>,
    resolved: Notify,
}

impl InteractionSession {
    fn new(id: String, choices: &[&str]) -> Self {
        Self {
            id,
            choices: choices.iter().map(|c| c.to_lowercase()).collect(),
            state: Mutex::new(SessionState::Pending),
            resolved: Notify::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn state(&self) -> SessionState {
        self.lock().clone()
    }

    /// Custom id of the button for `token`.
    pub fn button_id(&self, token: &str) -> String {
        format!("{}:{}", self.id, token.to_lowercase())
    }

    /// Custom id of this session's select menu.
    pub fn select_id(&self) -> String {
        format!("{}:{}", self.id, SELECT_SUFFIX)
    }

    /// Resolve with `token` if the session is still pending and the token is
    /// one of the offered choices. Only the first successful call has effect.
    pub fn resolve(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        let mut state = self.lock();
        if *state != SessionState::Pending || !self.choices.contains(&token) {
            return false;
        }
        *state = SessionState::Resolved(token);
        drop(state);
        self.resolved.notify_one();
        true
    }

    /// Move a still-pending session to `TimedOut`; returns how it ended.
    fn expire(&self) -> SessionOutcome {
        let mut state = self.lock();
        match &*state {
            SessionState::Resolved(token) => SessionOutcome::Resolved(token.clone()),
            SessionState::Pending | SessionState::TimedOut => {
                *state = SessionState::TimedOut;
                SessionOutcome::TimedOut
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Owns every open session and routes component events to them.
pub struct InteractionController {
    sessions: Mutex<HashMap<String, Arc<InteractionSession>>>,
    timeout: Duration,
}

impl InteractionController {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open a pending session offering `choices`. It stays registered until
    /// the returned handle is waited on or dropped.
    pub fn open(&self, choices: &[&str]) -> OpenSession<'_> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let session = Arc::new(InteractionSession::new(id.clone(), choices));
        self.sessions().insert(id, session.clone());
        debug!(session = %session.id, choices = ?session.choices, "Opened interaction session");
        OpenSession {
            controller: self,
            session,
        }
    }

    /// Number of sessions still registered.
    pub fn open_sessions(&self) -> usize {
        self.sessions().len()
    }

    /// Deliver a component event to the session its custom id addresses.
    pub fn route(&self, event: &ComponentEvent) -> RouteOutcome {
        let Some((session_id, suffix)) = event.custom_id.split_once(':') else {
            return RouteOutcome::Ignored;
        };
        let token = match event.values.first() {
            Some(value) => value.as_str(),
            None if suffix != SELECT_SUFFIX => suffix,
            None => return RouteOutcome::Ignored,
        };

        let session = self.sessions().get(session_id).cloned();
        match session {
            Some(session) if session.resolve(token) => {
                info!(session = %session_id, user = %event.user, token = %token, "Interaction resolved");
                RouteOutcome::Resolved
            }
            _ => {
                debug!(custom_id = %event.custom_id, "Ignoring component event");
                RouteOutcome::Ignored
            }
        }
    }

    /// Suspend until `session` resolves or the timeout elapses, then forget it.
    pub async fn wait(&self, session: &InteractionSession) -> SessionOutcome {
        let notified = session.resolved.notified();
        if session.state() == SessionState::Pending {
            let _ = timeout(self.timeout, notified).await;
        }

        let outcome = self.forget(session);
        if outcome == SessionOutcome::TimedOut {
            info!(session = %session.id(), "Interaction timed out");
        }
        outcome
    }

    fn forget(&self, session: &InteractionSession) -> SessionOutcome {
        let outcome = session.expire();
        self.sessions().remove(session.id());
        outcome
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Arc<InteractionSession>>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Handle to a registered session; dropping it expires and unregisters the
/// session.
pub struct OpenSession<'a> {
    controller: &'a InteractionController,
    session: Arc<InteractionSession>,
}

impl Deref for OpenSession<'_> {
    type Target = InteractionSession;

    fn deref(&self) -> &InteractionSession {
        &self.session
    }
}

impl Drop for OpenSession<'_> {
    fn drop(&mut self) {
        self.controller.forget(&self.session);
    }
}

/// Buttons for a two-choice session, one per token.
pub fn choice_buttons(session: &InteractionSession, labels: &[(&str, &str)]) -> ActionRow {
    ActionRow::Buttons(
        labels
            .iter()
            .map(|(token, label)| Button {
                custom_id: session.button_id(token),
                label: (*label).to_string(),
                style: ButtonStyle::Primary,
            })
            .collect(),
    )
}

/// Single-value select menu for a multi-choice session.
pub fn choice_select(
    session: &InteractionSession,
    placeholder: &str,
    options: Vec<SelectOption>,
) -> ActionRow {
    ActionRow::Select(SelectMenu {
        custom_id: session.select_id(),
        placeholder: Some(placeholder.to_string()),
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    fn click(session: &InteractionSession, token: &str) -> ComponentEvent {
        ComponentEvent {
            custom_id: session.button_id(token),
            values: Vec::new(),
            user: UserId(1),
        }
    }

    #[test]
    fn test_first_resolution_wins() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let session = controller.open(&["heads", "tails"]);

        assert_eq!(controller.route(&click(&session, "tails")), RouteOutcome::Resolved);
        assert_eq!(controller.route(&click(&session, "heads")), RouteOutcome::Ignored);
        assert!(!session.resolve("heads"));
        assert_eq!(session.state(), SessionState::Resolved("tails".into()));
    }

    #[test]
    fn test_invalid_tokens_are_ignored() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let session = controller.open(&["heads", "tails"]);

        assert_eq!(controller.route(&click(&session, "edge")), RouteOutcome::Ignored);
        let stray = ComponentEvent {
            custom_id: "no-such-session:heads".into(),
            values: Vec::new(),
            user: UserId(1),
        };
        assert_eq!(controller.route(&stray), RouteOutcome::Ignored);
        assert_eq!(session.state(), SessionState::Pending);
    }

    #[test]
    fn test_select_value_carries_token() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let session = controller.open(&["rock", "paper", "scissors"]);

        let empty = ComponentEvent {
            custom_id: session.select_id(),
            values: Vec::new(),
            user: UserId(2),
        };
        assert_eq!(controller.route(&empty), RouteOutcome::Ignored);

        let event = ComponentEvent {
            custom_id: session.select_id(),
            values: vec!["Rock".into()],
            user: UserId(2),
        };
        assert_eq!(controller.route(&event), RouteOutcome::Resolved);
        assert_eq!(session.state(), SessionState::Resolved("rock".into()));
    }

    #[tokio::test]
    async fn test_wait_returns_after_resolution() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let session = controller.open(&["heads", "tails"]);

        let mut waiting = task::spawn(controller.wait(&session));
        assert_pending!(waiting.poll());

        assert_eq!(controller.route(&click(&session, "heads")), RouteOutcome::Resolved);
        assert!(waiting.is_woken());
        assert_ready_eq!(waiting.poll(), SessionOutcome::Resolved("heads".into()));
        drop(waiting);
        assert_eq!(controller.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_resolution_before_wait_is_not_lost() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let session = controller.open(&["heads", "tails"]);
        assert!(session.resolve("heads"));

        assert_eq!(controller.wait(&session).await, SessionOutcome::Resolved("heads".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_terminal() {
        let controller = InteractionController::new(Duration::from_secs(5));
        let session = controller.open(&["heads", "tails"]);

        assert_eq!(controller.wait(&session).await, SessionOutcome::TimedOut);

        // Late selections have no effect, through the controller or directly.
        assert_eq!(controller.route(&click(&session, "heads")), RouteOutcome::Ignored);
        assert!(!session.resolve("heads"));
        assert_eq!(session.state(), SessionState::TimedOut);
        assert_eq!(controller.open_sessions(), 0);
    }

    #[test]
    fn test_dropped_handle_discards_session() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let session = controller.open(&["heads", "tails"]);
        let event = click(&session, "heads");
        assert_eq!(controller.open_sessions(), 1);

        drop(session);
        assert_eq!(controller.open_sessions(), 0);
        assert_eq!(controller.route(&event), RouteOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_abandoned_wait_discards_session() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let event;
        {
            let session = controller.open(&["heads", "tails"]);
            event = click(&session, "tails");
            let mut waiting = task::spawn(controller.wait(&session));
            assert_pending!(waiting.poll());
            // The caller goes away while still suspended.
            drop(waiting);
            assert_eq!(controller.open_sessions(), 1);
        }

        assert_eq!(controller.open_sessions(), 0);
        assert_eq!(controller.route(&event), RouteOutcome::Ignored);
    }

    #[test]
    fn test_component_builders_address_session() {
        let controller = InteractionController::new(Duration::from_secs(180));
        let session = controller.open(&["heads", "tails"]);
        let row = choice_buttons(&session, &[("heads", "Heads"), ("tails", "Tails")]);
        let ids = row.custom_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids[0].starts_with(session.id()));
        assert!(ids[1].ends_with(":tails"));
    }
}
