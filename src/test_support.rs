//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::{ChatEndpoint, ChatError, ChatReply, ChatRequest, RequestError};
use crate::core::diagnostics::Diagnostics;

pub type Scripted = Result<Option<ChatReply>, RequestError>;

pub fn ok_reply(output: &str) -> Scripted {
    Ok(Some(ChatReply {
        output: Some(output.to_string()),
    }))
}

/// Endpoint that answers from a fixed script and records what it was sent.
/// Runs out → transport error.
pub struct ScriptedEndpoint {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedEndpoint {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatEndpoint for ScriptedEndpoint {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn exchange(&self, request: &ChatRequest) -> Scripted {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Transport("script exhausted".into())))
    }
}

/// Diagnostics sink that keeps every report for later assertions.
#[derive(Clone, Default)]
pub struct RecordingDiagnostics {
    reports: Arc<Mutex<Vec<ChatError>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<ChatError> {
        self.reports.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&mut self, error: &ChatError) {
        self.reports.lock().unwrap().push(error.clone());
    }
}
