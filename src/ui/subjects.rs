//! Subject grid

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout;
use crate::theme::Theme;
use crate::views::SubjectListView;
use crate::views::subjects::card_lines;

/// Cards per grid row
pub const COLUMNS: usize = 3;

/// Height of one card including borders
const CARD_HEIGHT: u16 = 4;

pub fn draw(frame: &mut Frame, area: Rect, view: &SubjectListView, theme: &Theme, focused: bool) {
    let block = layout::panel(" Subjects ", focused, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !view.is_loaded() {
        return;
    }
    if let Some(message) = view.message() {
        let color = if message == crate::views::subjects::SUBJECTS_FAILED {
            theme.error
        } else {
            theme.fg_muted
        };
        layout::draw_message(frame, inner, message, Style::default().fg(color));
        return;
    }

    let subjects = view.subjects();
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = view.selected() / COLUMNS;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let rows = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(inner);
    for (row_idx, row_area) in rows.iter().enumerate() {
        let columns = Layout::horizontal(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(*row_area);
        for (col, card_area) in columns.iter().enumerate() {
            let index = (first_row + row_idx) * COLUMNS + col;
            let Some(subject) = subjects.get(index) else {
                return;
            };
            draw_card(frame, *card_area, subject, index == view.selected(), theme);
        }
    }
}

fn draw_card(
    frame: &mut Frame,
    area: Rect,
    subject: &crate::api::Subject,
    selected: bool,
    theme: &Theme,
) {
    let block = layout::panel("", selected, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (name, grade) = card_lines(subject);
    let name_style = if selected {
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![Line::from(Span::styled(name, name_style))];
    if let Some(grade) = grade {
        lines.push(Line::from(Span::styled(grade, Style::default().fg(theme.fg_muted))));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
