//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Created fresh each frame from the data they draw:
//! - `TitleBar`: endpoint and conversation status
//! - `Message`: one mounted node (turn, typing placeholder, or error)
//! - `LandingPage`: first-message view
//!
//! ### Stateful Components (Event-Driven)
//!
//! Own local state and emit events:
//! - `InputBox`: multi-line input that grows with its content
//! - `MessageList`: scrollable transcript with layout caching
//!
//! Props are plain struct fields set by the parent; components never reach
//! into the widget's state on their own.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── landing.rs
//! ├── message.rs
//! ├── message_list.rs
//! └── input_box/
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;

pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
