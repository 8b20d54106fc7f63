//! Webhook delivery lifecycle.
//!
//! ```text
//! Received → Verifying → Rejected
//!                      → Verified → Acknowledged            (not processed)
//!                                 → Processing → Stored      → Acknowledged
//!                                              → StoreFailed → Acknowledged
//! ```

use serde::Serialize;

use crate::domain::foundation::{StateMachine, ValidationError};

/// State of a single webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookState {
    Received,
    Verifying,
    Rejected,
    Verified,
    Processing,
    Stored,
    StoreFailed,
    Acknowledged,
}

impl WebhookState {
    /// True once the provider will receive a 200.
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, WebhookState::Acknowledged)
    }

    /// Label used in structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookState::Received => "received",
            WebhookState::Verifying => "verifying",
            WebhookState::Rejected => "rejected",
            WebhookState::Verified => "verified",
            WebhookState::Processing => "processing",
            WebhookState::Stored => "stored",
            WebhookState::StoreFailed => "store_failed",
            WebhookState::Acknowledged => "acknowledged",
        }
    }
}

impl std::fmt::Display for WebhookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for WebhookState {
    fn valid_transitions(&self) -> Vec<Self> {
        use WebhookState::*;
        match self {
            Received => vec![Verifying],
            Verifying => vec![Rejected, Verified],
            Rejected => vec![],
            Verified => vec![Processing, Acknowledged],
            Processing => vec![Stored, StoreFailed],
            Stored => vec![Acknowledged],
            StoreFailed => vec![Acknowledged],
            Acknowledged => vec![],
        }
    }
}

/// Tracks one delivery through its lifecycle, keeping the visited states.
#[derive(Debug, Clone)]
pub struct WebhookLifecycle {
    state: WebhookState,
    history: Vec<WebhookState>,
}

impl Default for WebhookLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookLifecycle {
    pub fn new() -> Self {
        Self {
            state: WebhookState::Received,
            history: vec![WebhookState::Received],
        }
    }

    pub fn state(&self) -> WebhookState {
        self.state
    }

    /// Every state visited so far, starting with `Received`.
    pub fn history(&self) -> &[WebhookState] {
        &self.history
    }

    /// Moves to `next`, refusing transitions the lifecycle does not allow.
    pub fn advance(&mut self, next: WebhookState) -> Result<WebhookState, ValidationError> {
        self.state = self.state.transition_to(next)?;
        self.history.push(self.state);
        Ok(self.state)
    }
}
