//! # Actions
//!
//! Everything that can happen to a conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Endpoint answers? That's `Action::ReplyReceived(result)`.
//!
//! `update()` takes the current state and an action, mutates the state, and
//! returns the effects the caller must carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + [Effect]
//! ```
//!
//! ```text
//!            Submit (non-empty)
//!   Idle ─────────────────────────► Awaiting
//!    ▲                                │  │
//!    │  ReplyReceived(output)         │  │ ReplyReceived(failure)
//!    └────────────────────────────────┘  ▼
//!                                      Error ── Submit ──► Awaiting
//! ```

use log::{debug, info, warn};

use crate::client::{ChatError, ChatReply, RequestError};
use crate::core::state::{ConversationState, Turn};

/// Shown to the user for every kind of failed cycle.
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

#[derive(Debug)]
pub enum Action {
    /// User asked to send this text.
    Submit(String),
    /// The in-flight request resolved.
    ReplyReceived(Result<Option<ChatReply>, RequestError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Redraw from state. `follow` is set when a turn was appended: scroll to
    /// the end and give focus back to the input.
    Render { follow: bool },
    /// Send the full history to the endpoint.
    SendRequest,
    /// Hand technical failure detail to the diagnostics sink.
    Report(ChatError),
}

/// Where the conversation controller currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Awaiting,
    Error,
}

impl Phase {
    pub fn of(state: &ConversationState) -> Self {
        if state.is_awaiting_reply() {
            Phase::Awaiting
        } else if state.last_error().is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    pub fn accepts_submit(self) -> bool {
        !matches!(self, Phase::Awaiting)
    }
}

pub fn update(state: &mut ConversationState, action: Action) -> Vec<Effect> {
    match action {
        Action::Submit(text) => {
            let text = text.trim();
            if text.is_empty() {
                debug!("Ignoring empty submit");
                return Vec::new();
            }
            if !Phase::of(state).accepts_submit() {
                debug!("Dropping submit while awaiting a reply");
                return Vec::new();
            }

            state.append(Turn::user(text));
            state.set_awaiting(true);
            info!("User turn appended (history={})", state.history().len());

            vec![Effect::Render { follow: true }, Effect::SendRequest]
        }
        Action::ReplyReceived(result) => {
            if !state.is_awaiting_reply() {
                warn!("Reply received with no request in flight; ignoring");
                return Vec::new();
            }
            state.set_awaiting(false);

            let outcome = match result {
                Ok(Some(reply)) => reply.text().map(str::to_owned).ok_or(ChatError::MissingOutput),
                Ok(None) => Err(ChatError::MissingOutput),
                Err(e) => Err(ChatError::Request(e)),
            };

            match outcome {
                Ok(output) => {
                    state.append(Turn::system(output));
                    state.set_error(None);
                    info!("System turn appended (history={})", state.history().len());
                    vec![Effect::Render { follow: true }]
                }
                Err(error) => {
                    state.set_error(Some(FAILURE_MESSAGE.to_string()));
                    vec![Effect::Report(error), Effect::Render { follow: false }]
                }
            }
        }
    }
}
