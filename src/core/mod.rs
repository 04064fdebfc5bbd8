//! # Core Application Logic
//!
//! This module contains the conversation logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (turns, flags) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • ChatWidget (handle)  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   render   │      │   client   │      │    TUI     │
//!     │  (View,    │      │  (HTTP +   │      │  (ratatui  │
//!     │  Surface)  │      │   JSON)    │      │   host)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `ConversationState`: turns plus awaiting/error flags
//! - [`action`]: `Action`, `Effect`, and the `update()` reducer
//! - [`widget`]: `ChatWidget`, owns state and carries out effects
//! - [`config`]: widget options and config file resolution
//! - [`diagnostics`]: sink for technical failure detail

pub mod action;
pub mod config;
pub mod diagnostics;
pub mod state;
pub mod widget;
