//! Chapter list of one subject

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout;
use crate::theme::Theme;
use crate::views::ChapterListView;
use crate::views::chapters::{CHAPTERS_FAILED, description};

/// Lines per chapter entry: title, description, spacer
const ENTRY_HEIGHT: usize = 3;

pub fn draw(frame: &mut Frame, area: Rect, view: &ChapterListView, theme: &Theme, focused: bool) {
    let title = format!(" {} · Chapters ", view.heading());
    let block = layout::panel(title, focused, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(message) = view.message() {
        let color = if message == CHAPTERS_FAILED { theme.error } else { theme.fg_muted };
        layout::draw_message(frame, inner, message, Style::default().fg(color));
        return;
    }

    let visible = (inner.height as usize / ENTRY_HEIGHT).max(1);
    let first = view.selected().saturating_sub(visible - 1);
    let width = inner.width.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (index, chapter) in view.chapters().iter().enumerate().skip(first).take(visible) {
        let selected = index == view.selected();
        let marker = if selected { "▶ " } else { "  " };
        let title_style = if selected {
            Style::default()
                .fg(theme.bg_primary)
                .bg(theme.accent_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent_primary)),
            Span::styled(format!("{}. {}", index + 1, chapter.title), title_style),
        ]));
        let desc = textwrap::wrap(description(chapter), width.max(10));
        let mut first_line = desc.first().map(|l| l.to_string()).unwrap_or_default();
        if desc.len() > 1 {
            first_line.push('…');
        }
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(first_line, Style::default().fg(theme.fg_muted)),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
