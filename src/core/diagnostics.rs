//! Where technical failure detail goes. Never the screen.

use log::error;

use crate::client::{ChatError, RequestError};

pub trait Diagnostics: Send {
    fn report(&mut self, error: &ChatError);
}

/// Default sink: writes failures to the log file.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, err: &ChatError) {
        match err {
            ChatError::Request(RequestError::Http { status, body }) => {
                error!("Chat request failed: HTTP {} body={}", status, body);
            }
            other => error!("Chat request failed: {}", other),
        }
    }
}
