//! # Render Pipeline
//!
//! A pure function from conversation state to a described visual tree, plus
//! the `Surface` seam a host implements to display it.
//!
//! ```text
//! ConversationState ──render()──► View ──mount()──► Surface
//!                                  │                 ├── clear()
//!                                  │                 ├── append(node) × N
//!                                  │                 └── set_first_message()
//!                                  └── nodes: [Turn…, Typing?, Error?]
//! ```
//!
//! Every mount replaces the surface contents entirely. Scrolling and focus
//! are separate calls, made by the controller only after an append.

use crate::core::config::WidgetOptions;
use crate::core::state::{ConversationState, Role, Turn};

/// Marker shown while a reply is pending.
pub const TYPING_MARKER: &str = "...";

/// How a turn's text must be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Trusted text, converted with the markdown renderer.
    Markdown(String),
    /// User text, shown verbatim and never interpreted.
    Literal(String),
}

impl Content {
    pub fn as_str(&self) -> &str {
        match self {
            Content::Markdown(s) | Content::Literal(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Turn {
        role: Role,
        author: String,
        content: Content,
    },
    /// In-progress placeholder, authored by the system.
    Typing { author: String, marker: String },
    /// Error region shown after everything else.
    Error(String),
}

impl Node {
    fn from_turn(turn: &Turn, options: &WidgetOptions) -> Self {
        match turn.role() {
            Role::System => Node::Turn {
                role: Role::System,
                author: options.system_name.clone(),
                content: Content::Markdown(turn.text().to_string()),
            },
            Role::User => Node::Turn {
                role: Role::User,
                author: options.user_name.clone(),
                content: Content::Literal(turn.text().to_string()),
            },
        }
    }
}

/// The full description of what the widget shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub nodes: Vec<Node>,
    /// True exactly when the history is empty.
    pub first_message: bool,
    /// Input prompt selected by `first_message`.
    pub placeholder: String,
}

impl View {
    /// Replace everything on the surface with this view.
    pub fn mount<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for node in &self.nodes {
            surface.append(node.clone());
        }
        surface.set_first_message(self.first_message, &self.placeholder);
    }
}

pub fn render(state: &ConversationState, options: &WidgetOptions) -> View {
    let mut nodes: Vec<Node> = state
        .history()
        .iter()
        .map(|turn| Node::from_turn(turn, options))
        .collect();

    if state.is_awaiting_reply() {
        nodes.push(Node::Typing {
            author: options.system_name.clone(),
            marker: TYPING_MARKER.to_string(),
        });
    }

    if let Some(error) = state.last_error() {
        nodes.push(Node::Error(error.to_string()));
    }

    let first_message = state.is_first_message();
    let placeholder = if first_message {
        options.placeholder.clone()
    } else {
        options.follow_up_placeholder.clone()
    };

    View {
        nodes,
        first_message,
        placeholder,
    }
}

/// A display the widget fully owns.
pub trait Surface {
    fn clear(&mut self);
    fn append(&mut self, node: Node);
    fn set_first_message(&mut self, first_message: bool, placeholder: &str);
    fn scroll_to_end(&mut self);
    fn focus(&mut self);
}

/// In-memory surface: keeps the mounted nodes and queues scroll/focus
/// requests for the host loop to pick up on its next frame.
#[derive(Debug, Clone, Default)]
pub struct ViewBuffer {
    nodes: Vec<Node>,
    first_message: bool,
    placeholder: String,
    scroll_pending: bool,
    focus_pending: bool,
}

impl ViewBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_first_message(&self) -> bool {
        self.first_message
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Number of conversation turns currently shown (placeholder included).
    pub fn turn_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Turn { .. } | Node::Typing { .. }))
            .count()
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_pending)
    }
}

impl Surface for ViewBuffer {
    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn append(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn set_first_message(&mut self, first_message: bool, placeholder: &str) {
        self.first_message = first_message;
        self.placeholder = placeholder.to_string();
    }

    fn scroll_to_end(&mut self) {
        self.scroll_pending = true;
    }

    fn focus(&mut self) {
        self.focus_pending = true;
    }
}
