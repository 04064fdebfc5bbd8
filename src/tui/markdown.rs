//! Markdown → ratatui `Text` for system turns.
//!
//! System replies are trusted markup: GitHub-flavoured markdown with inline
//! HTML allowed. Markdown is styled; HTML tags are interpreted where a
//! terminal has an equivalent (`<br>`, `<b>`, `<i>`, `<code>`) and otherwise
//! dropped, never printed. Fenced code blocks are highlighted with syntect.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const TAB: &str = "    ";
const RULE_WIDTH: usize = 40;
const CELL_SEPARATOR: &str = " │ ";

fn frame_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn code_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

/// Convert markdown into styled, owned text.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_TABLES);

    let mut writer = MarkdownWriter::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        writer.event(event);
    }
    Text::from(writer.lines)
}

/// Fenced code block currently being written.
enum CodeBlock {
    Highlighted(HighlightLines<'static>),
    Plain,
}

struct MarkdownWriter {
    lines: Vec<Line<'static>>,
    base_fg: Color,
    /// Inline styles; each entry is already patched onto its parent
    inline: Vec<Style>,
    /// Spans repeated at the start of every line (quote bars, code frame)
    prefixes: Vec<Span<'static>>,
    /// One entry per open list: `None` bulleted, `Some(n)` numbered from n
    lists: Vec<Option<u64>>,
    code: Option<CodeBlock>,
    /// Link target, printed after the link text
    link: Option<String>,
    /// Separate the next block from the previous one
    gap: bool,
    /// Cells of the table row being built
    row: Option<Vec<Vec<Span<'static>>>>,
    in_table_head: bool,
    /// Inline styles opened by HTML tags that are still unclosed
    html_depth: usize,
}

impl MarkdownWriter {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            base_fg,
            inline: Vec::new(),
            prefixes: Vec::new(),
            lists: Vec::new(),
            code: None,
            link: None,
            gap: false,
            row: None,
            in_table_head: false,
            html_depth: 0,
        }
    }

    fn current_style(&self) -> Style {
        self.inline
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_inline(&mut self, overlay: Style) {
        let style = self.current_style().patch(overlay);
        self.inline.push(style);
    }

    fn pop_inline(&mut self) {
        self.inline.pop();
    }

    fn new_line(&mut self) {
        self.lines.push(Line::from(self.prefixes.clone()));
    }

    fn new_line_with(&mut self, spans: Vec<Span<'static>>) {
        let mut all = self.prefixes.clone();
        all.extend(spans);
        self.lines.push(Line::from(all));
    }

    fn span(&mut self, span: Span<'static>) {
        // Inside a table, spans collect into the open cell
        if let Some(cell) = self.row.as_mut().and_then(|row| row.last_mut()) {
            cell.push(span);
            return;
        }
        match self.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line_with(vec![span]),
        }
    }

    fn start_block(&mut self) {
        if self.gap {
            self.new_line();
            self.gap = false;
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(text),
            Event::Code(code) => self.span(Span::styled(code.to_string(), code_style())),
            Event::SoftBreak => self.span(Span::raw(" ")),
            Event::HardBreak => self.new_line(),
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
            Event::Rule => {
                self.start_block();
                self.new_line_with(vec![Span::styled("─".repeat(RULE_WIDTH), frame_style())]);
                self.gap = true;
            }
            Event::TaskListMarker(done) => {
                self.span(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.start_block();
                self.new_line();
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                let style = heading_style(self.base_fg, level);
                self.new_line_with(vec![Span::styled(
                    format!("{} ", "#".repeat(level as usize)),
                    style,
                )]);
                self.push_inline(style);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.prefixes.push(Span::styled("│ ", frame_style()));
                self.push_inline(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => self.open_code(kind),
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}- "),
                };
                self.new_line_with(vec![Span::styled(marker, frame_style())]);
            }
            Tag::Table(_) => self.start_block(),
            Tag::TableHead => {
                self.in_table_head = true;
                self.row = Some(Vec::new());
            }
            Tag::TableRow => self.row = Some(Vec::new()),
            Tag::TableCell => {
                if let Some(row) = self.row.as_mut() {
                    row.push(Vec::new());
                }
            }
            Tag::Emphasis => self.push_inline(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_inline(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_inline(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.push_inline(link_style());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.gap = true,
            TagEnd::Heading(_) => {
                self.pop_inline();
                self.gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.prefixes.pop();
                self.pop_inline();
                self.gap = true;
            }
            TagEnd::CodeBlock => {
                self.code = None;
                self.prefixes.pop();
                self.new_line_with(vec![Span::styled("╰──", frame_style())]);
                self.gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap = true;
                }
            }
            TagEnd::TableHead => {
                self.flush_row();
                self.in_table_head = false;
            }
            TagEnd::TableRow => self.flush_row(),
            TagEnd::Table => self.gap = true,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_inline(),
            TagEnd::Link => {
                self.pop_inline();
                if let Some(url) = self.link.take() {
                    self.span(Span::raw(" ("));
                    self.span(Span::styled(url, link_style()));
                    self.span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    fn open_code(&mut self, kind: CodeBlockKind<'_>) {
        if !self.lines.is_empty() {
            self.new_line();
        }
        self.gap = false;

        let lang = match &kind {
            CodeBlockKind::Fenced(lang) => lang.split_whitespace().next().unwrap_or(""),
            CodeBlockKind::Indented => "",
        };

        let mut top = vec![Span::styled("╭──", frame_style())];
        if !lang.is_empty() {
            top.push(Span::styled(
                format!(" {lang} ──"),
                frame_style().add_modifier(Modifier::BOLD),
            ));
        }
        self.new_line_with(top);
        self.prefixes.push(Span::styled("│ ", frame_style()));

        let syntax = (!lang.is_empty())
            .then(|| SYNTAX_SET.find_syntax_by_token(lang))
            .flatten();
        self.code = Some(match (syntax, THEME_SET.themes.get(CODE_THEME)) {
            (Some(syntax), Some(theme)) => CodeBlock::Highlighted(HighlightLines::new(syntax, theme)),
            _ => CodeBlock::Plain,
        });
    }

    fn text(&mut self, text: CowStr<'_>) {
        // ratatui draws \t as zero-width
        let text = text.replace('\t', TAB);

        match self.code.take() {
            Some(CodeBlock::Highlighted(mut highlighter)) => {
                for line in LinesWithEndings::from(&text) {
                    let spans = highlighter
                        .highlight_line(line, &SYNTAX_SET)
                        .map(|ranges| {
                            ranges
                                .into_iter()
                                .map(|(style, fragment)| {
                                    let fg = style.foreground;
                                    Span::styled(
                                        fragment.trim_end_matches('\n').to_string(),
                                        Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                                    )
                                })
                                .filter(|span| !span.content.is_empty())
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_else(|_| {
                            vec![Span::raw(line.trim_end_matches('\n').to_string())]
                        });
                    self.new_line_with(spans);
                }
                self.code = Some(CodeBlock::Highlighted(highlighter));
            }
            Some(CodeBlock::Plain) => {
                for line in text.lines() {
                    self.new_line_with(vec![Span::styled(
                        line.to_string(),
                        Style::default().fg(Color::White),
                    )]);
                }
                self.code = Some(CodeBlock::Plain);
            }
            None => {
                let style = self.current_style();
                self.span(Span::styled(text, style));
            }
        }
    }

    /// Interpret the handful of tags a terminal can express; drop the rest.
    fn html(&mut self, html: &str) {
        let mut rest = html;
        while let Some(open) = rest.find('<') {
            let before = &rest[..open];
            if !before.trim().is_empty() {
                let style = self.current_style();
                self.span(Span::styled(before.to_string(), style));
            }
            let Some(close) = rest[open..].find('>') else {
                break;
            };
            let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
            self.html_tag(&tag);
            rest = &rest[open + close + 1..];
        }
        if !rest.trim().is_empty() {
            let style = self.current_style();
            self.span(Span::styled(rest.to_string(), style));
        }
    }

    fn html_tag(&mut self, tag: &str) {
        let closing = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");

        let overlay = match name {
            "br" => {
                self.new_line();
                return;
            }
            "b" | "strong" => Style::default().add_modifier(Modifier::BOLD),
            "i" | "em" => Style::default().add_modifier(Modifier::ITALIC),
            "s" | "del" => Style::default().add_modifier(Modifier::CROSSED_OUT),
            "u" => Style::default().add_modifier(Modifier::UNDERLINED),
            "code" => code_style(),
            _ => return,
        };
        if closing {
            // A stray closer must not pop emphasis or heading styles
            if self.html_depth > 0 {
                self.html_depth -= 1;
                self.pop_inline();
            }
        } else {
            self.html_depth += 1;
            self.push_inline(overlay);
        }
    }

    fn flush_row(&mut self) {
        let Some(cells) = self.row.take() else {
            return;
        };
        let mut spans = Vec::new();
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(CELL_SEPARATOR, frame_style()));
            }
            for span in cell {
                spans.push(if self.in_table_head {
                    let style = span.style.add_modifier(Modifier::BOLD);
                    span.style(style)
                } else {
                    span
                });
            }
        }
        self.new_line_with(spans);
    }
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    let modifiers = match level {
        HeadingLevel::H1 => Modifier::BOLD | Modifier::UNDERLINED,
        HeadingLevel::H2 => Modifier::BOLD,
        _ => Modifier::BOLD | Modifier::ITALIC,
    };
    Style::default().fg(base_fg).add_modifier(modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Hello", Color::Blue);
        let line = &text.lines[0];
        assert_eq!(plain(&text)[0], "## Hello");
        let hello = line.spans.iter().find(|s| s.content == "Hello").unwrap();
        assert!(hello.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(hello.style.fg, Some(Color::Blue));
    }

    #[test]
    fn bold_and_plain_text() {
        let text = render("Some **bold** text", Color::Green);
        let line = &text.lines[0];
        let bold = line.spans.iter().find(|s| s.content == "bold").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[0].style.fg, Some(Color::Green));
        assert_eq!(plain(&text)[0], "Some bold text");
    }

    #[test]
    fn inline_code_styled() {
        let text = render("Use `foo()` here", Color::Blue);
        let code = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "foo()")
            .unwrap();
        assert_eq!(code.style, code_style());
    }

    #[test]
    fn code_block_is_framed() {
        let lines = plain(&render("```\nline1\n\tline2\n```", Color::Blue));
        assert!(lines[0].starts_with('╭'));
        assert_eq!(lines[1], "│ line1");
        assert_eq!(lines[2], "│     line2");
        assert!(lines.last().unwrap().starts_with('╰'));
        assert!(!lines.iter().any(|l| l.contains('\t')));
    }

    #[test]
    fn highlighted_code_keeps_text() {
        let lines = plain(&render("```rust\nfn main() {}\n```", Color::Blue));
        assert!(lines[0].contains("rust"));
        assert_eq!(lines[1], "│ fn main() {}");
    }

    #[test]
    fn lists_are_numbered_and_bulleted() {
        let lines = plain(&render("1. one\n2. two\n\n- a\n- b", Color::Blue));
        assert!(lines.contains(&"1. one".to_string()));
        assert!(lines.contains(&"2. two".to_string()));
        assert!(lines.contains(&"- a".to_string()));
    }

    #[test]
    fn links_show_target() {
        let lines = plain(&render("[docs](http://x.test)", Color::Blue));
        assert_eq!(lines[0], "docs (http://x.test)");
    }

    #[test]
    fn tables_render_as_rows() {
        let text = render("| a | b |\n|---|---|\n| 1 | 2 |", Color::Blue);
        let lines = plain(&text);
        assert_eq!(lines[0], "a │ b");
        assert_eq!(lines[1], "1 │ 2");
        assert!(text.lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn inline_html_is_interpreted_not_printed() {
        let text = render("one<br>two and <b>bold</b> <span>x</span>", Color::Blue);
        let lines = plain(&text);
        assert!(lines.iter().all(|l| !l.contains('<')));
        assert_eq!(lines[0], "one");
        assert!(lines[1].starts_with("two and bold"));
        let bold = text.lines[1]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn unmatched_closing_tag_keeps_markdown_style() {
        let text = render("## Head </b>tail", Color::Blue);
        let tail = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content.contains("tail"))
            .unwrap();
        assert!(tail.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(tail.style.fg, Some(Color::Blue));
    }
}
