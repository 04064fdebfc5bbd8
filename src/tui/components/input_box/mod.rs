//! # InputBox Component
//!
//! The chat input: a growing, wrapping text area.
//!
//! ## Responsibilities
//!
//! - Capture text input and editing (backspace, delete, cursor movement, paste)
//! - Submit on Enter, insert a line break on Shift/Alt+Enter
//! - Grow with its content up to whatever height the layout allows
//! - Show the placeholder chosen by the view when empty
//!
//! ## State Management
//!
//! The buffer is internal state. `placeholder`, `disabled` and `focused` are
//! props set by the parent from the widget's state each frame. Cursor
//! position and scroll state are encapsulated in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary, wrap_line_count,
    wrap_options,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted non-blank text; already trimmed
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `placeholder`: prompt shown while the buffer is empty
/// - `disabled`: true while a reply is pending; the draft is kept but Enter does nothing
/// - `focused`: whether keystrokes land here (controls the terminal cursor)
///
/// # State
///
/// - `buffer`: Current text being typed
/// - `cursor`: Cursor position, scroll offset, and cached width (see `CursorState`)
pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    pub placeholder: String,
    pub disabled: bool,
    pub focused: bool,
    cursor: CursorState,
}

impl InputBox {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            placeholder: placeholder.into(),
            disabled: false,
            focused: true,
            cursor: CursorState::new(),
        }
    }

    /// Height needed to show the whole draft, capped by `max_height`.
    ///
    /// Never less than one text row plus borders.
    pub fn calculate_height(&self, content_width: u16, max_height: u16) -> u16 {
        let width = inner_width(content_width);
        let needed = wrap_line_count(&self.buffer, width) + VERTICAL_OVERHEAD;
        needed.min(max_height).max(1 + VERTICAL_OVERHEAD)
    }

    /// Recompute wrapping for a new width (terminal resize).
    pub fn relayout(&mut self, content_width: u16) {
        self.cursor.last_content_width = content_width;
        self.cursor.scroll_offset = 0;
    }

    /// Slice of wrapped lines visible at the current scroll offset.
    fn get_visible_text(&self, content_width: u16, visible_lines: u16) -> String {
        if self.cursor.scroll_offset == 0 {
            return self.buffer.clone();
        }

        let width = inner_width(content_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));

        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + visible_lines as usize).min(lines.len());

        lines[start..end].join("\n")
    }

    /// Render scrollbar when content exceeds visible area
    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, visible_lines: u16) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total_lines = wrap_line_count(&self.buffer, inner_width(area.width));
        if total_lines <= visible_lines {
            return;
        }

        // ScrollbarState content_length is max scrollable position, not total items
        let max_scroll = total_lines.saturating_sub(visible_lines);

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible_lines = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1);
        self.cursor.last_content_width = area.width;
        self.cursor
            .update_scroll_offset(&self.buffer, area.width, visible_lines);

        let title = if self.disabled {
            " Waiting for reply... "
        } else {
            " Message "
        };
        let border_color = if self.focused && !self.disabled {
            Color::Green
        } else {
            Color::DarkGray
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(title);

        let input = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder.as_str())
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(self.get_visible_text(area.width, visible_lines))
                .style(Style::default().fg(Color::Green))
        };

        frame.render_widget(input.block(block), area);
        self.render_scrollbar(frame, area, visible_lines);

        if self.focused {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Newline => {
                self.buffer.insert(self.cursor.pos, '\n');
                self.cursor.pos += 1;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.cursor.pos, &text);
                self.cursor.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                if self.disabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                Some(InputEvent::Submit(text.trim().to_string()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(input: &mut InputBox, s: &str) {
        for c in s.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_input_box_new() {
        let input = InputBox::new("Type a message...");
        assert!(input.buffer.is_empty());
        assert_eq!(input.placeholder, "Type a message...");
        assert!(!input.disabled);
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new("");

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "a");

        let res = input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_trims_and_clears() {
        let mut input = InputBox::new("");
        input.buffer = "  hello \n".to_string();

        let res = input.handle_event(&TuiEvent::Submit);
        assert_eq!(res, Some(InputEvent::Submit("hello".into())));
        assert!(input.buffer.is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = InputBox::new("");
        input.buffer = " \n\t ".to_string();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, " \n\t ");
    }

    #[test]
    fn test_disabled_keeps_draft() {
        let mut input = InputBox::new("");
        input.disabled = true;
        type_str(&mut input, "next question");

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "next question");

        input.disabled = false;
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("next question".into()))
        );
    }

    #[test]
    fn test_newline_inserts_line_break() {
        let mut input = InputBox::new("");
        type_str(&mut input, "ab");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::Newline);
        assert_eq!(input.buffer, "a\nb");
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let mut input = InputBox::new("");
        input.handle_event(&TuiEvent::Paste("one\r\ntwo\rthree".into()));
        assert_eq!(input.buffer, "one\ntwo\nthree");
        assert_eq!(input.cursor.pos, input.buffer.len());
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new("");
        // Empty: one row plus borders
        assert_eq!(input.calculate_height(40, 20), 3);

        input.buffer = "1\n2\n3\n4".to_string();
        assert_eq!(input.calculate_height(40, 20), 6);

        // Host cap wins
        input.buffer = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10".to_string();
        assert_eq!(input.calculate_height(40, 8), 8);

        // Shrinks back after deletion
        input.buffer = "1".to_string();
        assert_eq!(input.calculate_height(40, 20), 3);
    }

    #[test]
    fn test_height_follows_width() {
        let mut input = InputBox::new("");
        input.buffer = "a".repeat(30);
        // inner width 36: fits on one line
        assert_eq!(input.calculate_height(40, 20), 3);
        // inner width 10: three lines
        input.relayout(14);
        assert_eq!(input.calculate_height(14, 20), 5);
    }

    #[test]
    fn test_render_shows_placeholder_when_empty() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut input = InputBox::new("Type a follow up...");

        terminal
            .draw(|f| {
                input.render(f, f.area());
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Type a follow up..."));
        assert!(text.contains("Message"));
    }

    #[test]
    fn test_render_shows_waiting_title_when_disabled() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut input = InputBox::new("");
        input.disabled = true;
        input.buffer = "draft".into();

        terminal
            .draw(|f| {
                input.render(f, f.area());
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Waiting for reply"));
        assert!(text.contains("draft"));
    }
}
