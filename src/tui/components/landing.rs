//! # Landing Page Component
//!
//! Shown in place of the transcript while the conversation is empty
//! (first-message mode).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct LandingPage<'a> {
    /// Who will be answering
    pub system_name: &'a str,
    /// Prompt from the first-message view
    pub placeholder: &'a str,
}

impl<'a> LandingPage<'a> {
    pub fn new(system_name: &'a str, placeholder: &'a str) -> Self {
        Self {
            system_name,
            placeholder,
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled(
                self.system_name,
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.placeholder,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
            Line::default(),
            Line::from(Span::styled(
                format!("chatui v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            centered,
        );
    }
}
