use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::state::Role;
use crate::render::{Content, Node};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

const USER_COLOR: Color = Color::Green;
const SYSTEM_COLOR: Color = Color::Blue;
const ERROR_COLOR: Color = Color::Red;

/// One transcript entry: a turn, the typing placeholder, or the error region.
///
/// Created fresh each frame from a mounted `Node`; holds no state of its own.
///
/// System turns go through the markdown renderer. User turns are shown as
/// literal text, so markup a user types is never interpreted.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub node: &'a Node,
}

impl<'a> Message<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self { node }
    }

    /// Rows this node occupies at `width`, borders included.
    ///
    /// Measured with the same `Paragraph` used for drawing, so markdown
    /// output (code blocks, lists) wraps exactly as it will be rendered.
    pub fn calculate_height(node: &Node, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row
            return 1;
        }

        let text = body(node);
        if text.width() == 0 {
            return VERTICAL_OVERHEAD;
        }

        let lines = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

fn title(node: &Node) -> &str {
    match node {
        Node::Turn { author, .. } | Node::Typing { author, .. } => author,
        Node::Error(_) => "error",
    }
}

fn style(node: &Node) -> Style {
    match node {
        Node::Turn { role: Role::User, .. } => Style::default().fg(USER_COLOR),
        Node::Turn { role: Role::System, .. } => Style::default().fg(SYSTEM_COLOR),
        Node::Typing { .. } => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        Node::Error(_) => Style::default().fg(ERROR_COLOR),
    }
}

fn body(node: &Node) -> Text<'static> {
    match node {
        Node::Turn {
            content: Content::Markdown(source),
            ..
        } => markdown::render(source.trim(), SYSTEM_COLOR),
        Node::Turn {
            content: Content::Literal(text),
            ..
        } => Text::raw(text.trim().to_string()),
        Node::Typing { marker, .. } => Text::raw(marker.clone()),
        Node::Error(message) => Text::raw(message.clone()),
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = style(self.node);
        let border_style = match self.node {
            Node::Error(_) => style.add_modifier(Modifier::BOLD),
            _ => style.add_modifier(Modifier::DIM),
        };

        let block = Block::bordered()
            .title(title(self.node))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(body(self.node))
            .style(style)
            .wrap(Wrap { trim: false })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
