use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A piece of the terminal UI.
///
/// Props are plain struct fields the parent sets before drawing. Anything
/// else a component keeps (scroll position, layout caches) is its own.
///
/// `render` takes `&mut self` so that presentation state can be updated
/// during the draw pass, the same way ratatui's `StatefulWidget` works.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns raw terminal events into its own higher-level events.
pub trait EventHandler {
    type Event;

    /// Returns `None` when the event was ignored.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
