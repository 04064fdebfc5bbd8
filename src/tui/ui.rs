use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::widget::ChatWidget;
use crate::render::ViewBuffer;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, TitleBar};
use crate::tui::{InputMode, TuiState};

/// Rows always left for the transcript, however tall the draft gets.
const MIN_TRANSCRIPT_HEIGHT: u16 = 3;
const TITLE_HEIGHT: u16 = 1;

pub fn draw_ui(frame: &mut Frame, widget: &ChatWidget<ViewBuffer>, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let view = widget.surface();

    // Sync InputBox props with the mounted view
    tui.input_box.placeholder = view.placeholder().to_string();
    tui.input_box.disabled = widget.state().is_awaiting_reply();
    tui.input_box.focused = tui.input_mode == InputMode::Input;

    let max_input = area
        .height
        .saturating_sub(TITLE_HEIGHT + MIN_TRANSCRIPT_HEIGHT);
    let input_height = tui.input_box.calculate_height(area.width, max_input);

    let [title_area, main_area, input_area] =
        Layout::vertical([Length(TITLE_HEIGHT), Min(0), Length(input_height)]).areas(area);

    let mut title_bar = TitleBar::new(
        widget.endpoint().name(),
        TitleBar::status_for(widget.phase()),
        !tui.message_list.stick_to_bottom,
    );
    title_bar.render(frame, title_area);

    if view.is_first_message() && view.nodes().is_empty() {
        LandingPage::new(&widget.options().system_name, view.placeholder())
            .render(frame, main_area);
    } else {
        MessageList::new(&mut tui.message_list, view.nodes()).render(frame, main_area);
    }

    tui.input_box.render(frame, input_area);
}
