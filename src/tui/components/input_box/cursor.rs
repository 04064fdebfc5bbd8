//! Cursor position tracking and navigation for the InputBox.
//!
//! `CursorState` owns the cursor byte offset, scroll offset, and cached
//! layout. All navigation methods take `buffer: &str` explicitly; the text
//! itself is owned by `InputBox`.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::text_wrap::{BORDER_OFFSET, inner_width, wrap_line_count, wrap_options};

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped line (0 when content fits the box)
    pub scroll_offset: u16,
    /// Content width from the last layout pass
    pub last_content_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_content_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Back to the start (used after Submit clears the buffer).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Move cursor up or down one wrapped line, keeping the column where possible.
    ///
    /// Returns `true` if the cursor moved.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let width = inner_width(self.last_content_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let lines = textwrap::wrap(buffer, wrap_options(width));
        if lines.is_empty() {
            return false;
        }

        // Byte length of a wrapped line including its trailing newline (if present)
        let line_byte_span = |line: &str, offset: usize| -> usize {
            let has_newline = offset + line.len() < buffer.len()
                && buffer.as_bytes()[offset + line.len()] == b'\n';
            line.len() + usize::from(has_newline)
        };

        let mut byte_offset = 0;
        let mut current_line_idx = 0;
        let mut column_in_line = 0;

        for (idx, line) in lines.iter().enumerate() {
            if byte_offset + line.len() >= self.pos {
                current_line_idx = idx;
                column_in_line = self.pos - byte_offset;
                break;
            }
            byte_offset += line_byte_span(line, byte_offset);
        }

        let target_line_idx = if direction < 0 {
            if current_line_idx == 0 {
                return false;
            }
            current_line_idx - 1
        } else {
            if current_line_idx >= lines.len() - 1 {
                return false;
            }
            current_line_idx + 1
        };

        let mut target_line_start = 0;
        for line in lines.iter().take(target_line_idx) {
            target_line_start += line_byte_span(line, target_line_start);
        }

        let target_line = &lines[target_line_idx];
        let mut target_column = column_in_line.min(target_line.len());
        while !target_line.is_char_boundary(target_column) {
            target_column -= 1;
        }
        self.pos = target_line_start + target_column;

        true
    }

    /// Wrapped line (0-based) the cursor is on.
    pub fn calculate_line(&self, buffer: &str, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        if width == 0 {
            return 0;
        }

        let text_before_cursor = &buffer[..self.pos];
        let lines = textwrap::wrap(text_before_cursor, wrap_options(width));
        let mut cursor_line = lines.len().saturating_sub(1) as u16;

        // Cursor right after a newline that textwrap didn't represent
        if self.pos > 0
            && buffer.as_bytes()[self.pos - 1] == b'\n'
            && !lines.last().is_some_and(|l| l.is_empty())
        {
            cursor_line += 1;
        }

        cursor_line
    }

    /// Keep the cursor inside the `visible_lines` window the host layout gave us.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16, visible_lines: u16) {
        let visible_lines = visible_lines.max(1);
        let total_lines = wrap_line_count(buffer, inner_width(content_width));

        if total_lines <= visible_lines {
            self.scroll_offset = 0;
            return;
        }

        let cursor_line = self.calculate_line(buffer, content_width);

        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + visible_lines {
            self.scroll_offset = cursor_line.saturating_sub(visible_lines - 1);
        }

        let max_offset = total_lines - visible_lines;
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Screen position (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + BORDER_OFFSET, area.y + BORDER_OFFSET);
        }

        let cursor_line = self.calculate_line(buffer, area.width);

        // Column from the last newline; textwrap trims trailing spaces, so
        // wrapped line lengths can't be used directly.
        let text_before_cursor = &buffer[..self.pos];
        let last_newline = text_before_cursor.rfind('\n').map(|p| p + 1).unwrap_or(0);
        let logical_line = &text_before_cursor[last_newline..];

        let segments = textwrap::wrap(logical_line, wrap_options(width));
        let cursor_col = match segments.len() {
            0 => 0,
            n => {
                let consumed: usize = segments
                    .iter()
                    .take(n - 1)
                    .map(|seg| seg.chars().count())
                    .sum();
                let remainder: String = logical_line.chars().skip(consumed).collect();
                remainder.trim_start_matches(' ').width().min(width as usize) as u16
            }
        };

        let visible_line = cursor_line.saturating_sub(self.scroll_offset);
        (
            area.x + BORDER_OFFSET + cursor_col,
            area.y + BORDER_OFFSET + visible_line,
        )
    }
}
