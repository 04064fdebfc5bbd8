//! # Chat Widget
//!
//! The owned handle a host creates. It owns the conversation state and runs
//! every effect `update()` asks for: drawing to the surface, building the
//! request, and reporting failures.
//!
//! Two ways to drive a cycle:
//!
//! - `submit(text).await` runs the whole cycle inline.
//! - `begin_submit(text)` / `complete(result)` split it around the network
//!   call, for event loops that run the request on a spawned task.

use std::sync::Arc;

use log::debug;

use crate::client::{ChatEndpoint, ChatReply, ChatRequest, RequestError};
use crate::core::action::{Action, Effect, Phase, update};
use crate::core::config::WidgetOptions;
use crate::core::diagnostics::{Diagnostics, LogDiagnostics};
use crate::core::state::ConversationState;
use crate::render::{Surface, render};

pub struct ChatWidget<S: Surface> {
    options: WidgetOptions,
    state: ConversationState,
    endpoint: Arc<dyn ChatEndpoint>,
    surface: S,
    diagnostics: Box<dyn Diagnostics>,
}

impl<S: Surface> ChatWidget<S> {
    /// Create a widget and draw its initial (empty) view.
    pub fn new(options: WidgetOptions, endpoint: Arc<dyn ChatEndpoint>, surface: S) -> Self {
        let mut widget = Self {
            options,
            state: ConversationState::new(),
            endpoint,
            surface,
            diagnostics: Box::new(LogDiagnostics),
        };
        widget.redraw();
        widget
    }

    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        Phase::of(&self.state)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn endpoint(&self) -> Arc<dyn ChatEndpoint> {
        self.endpoint.clone()
    }

    /// Redraw from current state without scrolling or stealing focus.
    pub fn redraw(&mut self) {
        self.apply(vec![Effect::Render { follow: false }]);
    }

    /// Start a cycle. Returns the request to send, or `None` if the submit
    /// was rejected (empty text, or a reply is still pending).
    pub fn begin_submit(&mut self, text: &str) -> Option<ChatRequest> {
        let effects = update(&mut self.state, Action::Submit(text.to_string()));
        self.apply(effects)
    }

    /// Finish the cycle started by `begin_submit`.
    pub fn complete(&mut self, result: Result<Option<ChatReply>, RequestError>) {
        let effects = update(&mut self.state, Action::ReplyReceived(result));
        self.apply(effects);
    }

    /// Run one full request/response cycle.
    pub async fn submit(&mut self, text: &str) {
        let Some(request) = self.begin_submit(text) else {
            return;
        };
        let endpoint = self.endpoint.clone();
        debug!("Sending {} turns via {}", request.messages.len(), endpoint.name());
        let result = endpoint.exchange(&request).await;
        self.complete(result);
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Option<ChatRequest> {
        let mut request = None;
        for effect in effects {
            match effect {
                Effect::Render { follow } => {
                    render(&self.state, &self.options).mount(&mut self.surface);
                    if follow {
                        self.surface.scroll_to_end();
                        self.surface.focus();
                    }
                }
                Effect::SendRequest => {
                    request = Some(ChatRequest {
                        messages: self.state.history().to_vec(),
                    });
                }
                Effect::Report(error) => self.diagnostics.report(&error),
            }
        }
        request
    }
}
