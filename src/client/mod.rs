//! # JSON Request Client
//!
//! The HTTP side of the widget: a strict single-shot JSON fetch and the chat
//! endpoint built on top of it. Nothing here touches conversation state.

pub mod endpoint;
pub mod error;
pub mod fetch;

pub use endpoint::{ChatEndpoint, ChatReply, ChatRequest, HttpEndpoint};
pub use error::{ChatError, RequestError};
pub use fetch::{FetchOptions, fetch_json, is_json_content_type};
