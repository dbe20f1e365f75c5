//! UI rendering components

pub mod chapters;
pub mod command_line;
pub mod content;
pub mod help;
pub mod layout;
pub mod questions;
pub mod reader;
pub mod subjects;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Block,
};

use crate::app::state::{AppState, Focus, Screen};
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let background = Block::default().style(Style::default().bg(theme.bg_primary));
    frame.render_widget(background, frame.area());

    let [main_area, command_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    match state.screen {
        Screen::Chapter => reader::draw(frame, main_area, state, theme),
        Screen::Subjects | Screen::Chapters => {
            let list_area = split_questions(frame, main_area, state, theme);
            let focused = state.focus == Focus::Main;
            if state.screen == Screen::Subjects {
                subjects::draw(frame, list_area, &state.subjects, theme, focused);
            } else {
                chapters::draw(frame, list_area, &state.chapters, theme, focused);
            }
        }
    }

    command_line::draw(frame, command_area, &state.command_line, theme);

    if state.show_help {
        help::draw(frame, theme);
    }
    if let Some(label) = &state.loading {
        layout::draw_loading(frame, label, theme);
    }
}

/// Give the questions panel the right side when it is open
fn split_questions(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) -> Rect {
    if !state.show_questions {
        return area;
    }
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
    questions::draw(frame, right, &state.questions, theme, state.focus == Focus::Questions);
    left
}
