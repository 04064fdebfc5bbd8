//! chatui: a chat widget that talks to a JSON endpoint, with a terminal host.
//!
//! - [`client`]: JSON-over-HTTP requests and the chat endpoint
//! - [`core`]: conversation state, the reducer, and the `ChatWidget` handle
//! - [`render`]: state → view, and the `Surface` a host implements
//! - [`tui`]: ratatui host

pub mod client;
pub mod core;
pub mod render;
pub mod tui;

#[cfg(test)]
pub mod test_support;
