//! # TUI Host
//!
//! The ratatui-specific layer. Handles terminal I/O, draws the mounted view,
//! and turns key presses into widget calls.
//!
//! This is the only module that knows about ratatui and crossterm. The widget
//! draws into a `ViewBuffer`; this loop reads that buffer every frame and
//! picks up its scroll and focus requests.
//!
//! ## Request flow
//!
//! ```text
//! Enter ──► InputBox ──Submit(text)──► widget.begin_submit()
//!                                          │ Some(request)
//!                                          ▼
//!                                 tokio::spawn(exchange)
//!                                          │
//!          widget.complete(result) ◄──mpsc─┘
//! ```
//!
//! ## Redraw Strategy
//!
//! Draws only after an event or a reply arrived. While a reply is pending the
//! loop polls on a short timeout so the reply shows up promptly; otherwise it
//! sleeps up to 500ms between checks.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::client::{ChatReply, ChatRequest, RequestError};
use crate::core::widget::ChatWidget;
use crate::render::ViewBuffer;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

type ReplyResult = Result<Option<ChatReply>, RequestError>;

const PENDING_POLL: Duration = Duration::from_millis(50);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys go to the input box. Esc switches to Browse.
    Input,
    /// Arrow keys scroll the transcript. Typing switches back to Input,
    /// Esc again quits.
    Browse,
}

/// TUI-specific presentation state (not part of the conversation)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
}

impl TuiState {
    pub fn new(placeholder: &str) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(placeholder),
            input_mode: InputMode::Input, // User expects to type immediately
        }
    }

    /// Pick up scroll/focus requests the widget left on the surface.
    fn apply_surface_requests(&mut self, view: &mut ViewBuffer) {
        if view.take_scroll_request() {
            self.message_list.scroll_to_end();
        }
        if view.take_focus_request() {
            self.input_mode = InputMode::Input;
        }
    }
}

/// What the loop should do after an event.
#[derive(Debug, PartialEq)]
enum Outcome {
    Continue,
    Send(ChatRequest),
    Quit,
}

/// Route one event. Kept free of terminal I/O so it can be tested.
fn handle_event(
    widget: &mut ChatWidget<ViewBuffer>,
    tui: &mut TuiState,
    event: TuiEvent,
) -> Outcome {
    // Events are drained in batches between draws, so the input box cannot
    // rely on the draw pass to learn that a reply is pending
    tui.input_box.disabled = widget.state().is_awaiting_reply();

    match event {
        // Ctrl+C always quits regardless of mode
        TuiEvent::Quit => return Outcome::Quit,
        TuiEvent::Resize(width, _) => {
            tui.input_box.relayout(width);
            widget.redraw();
            return Outcome::Continue;
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            return Outcome::Continue;
        }
        _ => {}
    }

    match tui.input_mode {
        InputMode::Input => {
            if event == TuiEvent::Escape {
                tui.input_mode = InputMode::Browse;
                return Outcome::Continue;
            }
            if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                // Rejected submits (reply pending) never reach the wire
                return match widget.begin_submit(&text) {
                    Some(request) => Outcome::Send(request),
                    None => Outcome::Continue,
                };
            }
            Outcome::Continue
        }
        InputMode::Browse => match event {
            TuiEvent::Escape => Outcome::Quit,
            TuiEvent::CursorUp => {
                tui.message_list.handle_event(&TuiEvent::ScrollUp);
                Outcome::Continue
            }
            TuiEvent::CursorDown => {
                tui.message_list.handle_event(&TuiEvent::ScrollDown);
                Outcome::Continue
            }
            TuiEvent::Submit => {
                tui.input_mode = InputMode::Input;
                Outcome::Continue
            }
            // Typing switches back to Input and keeps the keystroke
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                tui.input_mode = InputMode::Input;
                tui.input_box.handle_event(&event);
                Outcome::Continue
            }
            _ => Outcome::Continue,
        },
    }
}

/// Owns the terminal setup; dropping it undoes everything, so every early
/// return out of [`run`] leaves the terminal usable.
struct TerminalModeGuard;

impl TerminalModeGuard {
    /// Call after `ratatui::init()`.
    fn new() -> std::io::Result<Self> {
        // Built first so a failed mode switch is still restored
        let guard = Self;
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter;
        // terminals that lack it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(guard)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
        ratatui::restore();
    }
}

/// Run the terminal UI until the user quits.
///
/// Must be called from inside a tokio runtime; requests run on spawned tasks.
pub fn run(mut widget: ChatWidget<ViewBuffer>) -> std::io::Result<()> {
    let mut tui = TuiState::new(widget.surface().placeholder());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    // Replies from background tasks
    let (tx, rx) = mpsc::channel::<ReplyResult>();

    let mut needs_redraw = true; // Force first frame

    loop {
        tui.apply_surface_requests(widget.surface_mut());

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &widget, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if widget.state().is_awaiting_reply() {
            PENDING_POLL
        } else {
            IDLE_POLL
        };
        let first_event = poll_event_timeout(timeout)?;

        // Process first event + drain all pending events before next draw
        let mut should_quit = false;
        let mut next = first_event;
        while let Some(event) = next {
            needs_redraw = true;
            match handle_event(&mut widget, &mut tui, event) {
                Outcome::Continue => {}
                Outcome::Send(request) => spawn_request(&widget, request, tx.clone()),
                Outcome::Quit => {
                    should_quit = true;
                    break;
                }
            }
            next = poll_event_immediate()?;
        }

        if should_quit {
            break;
        }

        while let Ok(result) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received reply: ok={}", result.is_ok());
            widget.complete(result);
        }
    }

    info!("Shutting down");
    Ok(())
}

fn spawn_request(widget: &ChatWidget<ViewBuffer>, request: ChatRequest, tx: mpsc::Sender<ReplyResult>) {
    let endpoint = widget.endpoint();
    info!(
        "Spawning chat request ({} turns) to {}",
        request.messages.len(),
        endpoint.name()
    );

    tokio::spawn(async move {
        let result = endpoint.exchange(&request).await;
        if tx.send(result).is_err() {
            warn!("Failed to deliver reply: receiver dropped");
        }
    });
}
