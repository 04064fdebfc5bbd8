//! # Conversation State
//!
//! The message store: one ordered log of turns plus two transient UI flags.
//!
//! ```text
//! ConversationState
//! ├── history: Vec<Turn>            // conversation order, append-only
//! ├── is_awaiting_reply: bool       // a request is in flight
//! └── last_error: Option<String>    // user-facing failure text
//! ```
//!
//! The mutators are `pub(crate)`: state changes only happen through
//! `update(state, action)` in action.rs.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    System,
}

/// One message in the conversation. Immutable once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    #[serde(rename = "message")]
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    history: Vec<Turn>,
    is_awaiting_reply: bool,
    last_error: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.is_awaiting_reply
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True exactly when nothing has been said yet.
    pub fn is_first_message(&self) -> bool {
        self.history.is_empty()
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    pub(crate) fn set_awaiting(&mut self, awaiting: bool) {
        self.is_awaiting_reply = awaiting;
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.last_error = error;
    }
}
