//! iced rendering of a progress slot
//!
//! Hosts embed [`file_progress`] over the media preview of a file. When the
//! slot is not in progress there is no element at all, so the preview
//! underneath stays fully interactive.

use crate::core::tracker::RenderState;
use iced::widget::{button, container, progress_bar, row, text};
use iced::{Alignment, Element, Length};

pub fn file_progress<'a, Message: Clone + 'a>(
    state: &RenderState,
    on_cancel: Option<Message>,
) -> Option<Element<'a, Message>> {
    if !state.in_progress {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let value = state.progress_percent as f32;
    let mut content = row![progress_bar(0.0..=100.0, value)]
        .spacing(8)
        .align_y(Alignment::Center);

    if state.show_cancel_control
        && let Some(message) = on_cancel
    {
        content = content.push(button(text("✕").size(12)).padding([2, 6]).on_press(message));
    }

    Some(container(content).padding(4).width(Length::Fill).into())
}
