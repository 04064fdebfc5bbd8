//! # TitleBar Component
//!
//! Top status line: the endpoint in use, the current phase of the
//! conversation, and a "↓ New" hint when the transcript has been scrolled
//! away from the bottom.
//!
//! Purely presentational. Every field is a prop set by the run loop:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(endpoint.name(), "Waiting for reply", false);
//! title_bar.render(frame, area);
//! ```
//!
//! The status is dropped from the line when empty, so the idle line reads
//! `"chatui (http://host/api)"`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::action::Phase;
use crate::tui::component::Component;

pub struct TitleBar {
    /// Where messages are sent
    pub endpoint: String,
    pub status_message: String,
    /// Transcript is scrolled up and new content may be below
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        endpoint: impl Into<String>,
        status_message: impl Into<String>,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            status_message: status_message.into(),
            has_unseen_content,
        }
    }

    /// Status text for a conversation phase.
    pub fn status_for(phase: Phase) -> &'static str {
        match phase {
            Phase::Idle => "",
            Phase::Awaiting => "Waiting for reply",
            Phase::Error => "Last message failed",
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(format!("chatui ({})", self.endpoint))];

        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                self.status_message.as_str(),
                Style::default().fg(Color::Yellow),
            ));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Cyan)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
