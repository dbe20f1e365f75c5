//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Bordered panel with the theme's colors
pub fn panel<'a>(title: impl Into<Line<'a>>, focused: bool, theme: &Theme) -> Block<'a> {
    let border_color = if focused { theme.border_focused } else { theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary))
}

/// Centered message filling an area, e.g. an empty or failed state
pub fn draw_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let top = area.height.saturating_sub(1) / 2;
    let area = Rect { y: area.y + top, height: area.height - top, ..area };
    let paragraph =
        Paragraph::new(message).style(style).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Small popup saying a request is in flight
pub fn draw_loading(frame: &mut Frame, label: &str, theme: &Theme) {
    let width = (label.chars().count() as u16 + 6).min(frame.area().width);
    let area = centered_fixed(width, 3, frame.area());
    frame.render_widget(Clear, area);
    let block = panel("", true, theme).style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(label).style(Style::default().fg(theme.info)).alignment(Alignment::Center),
        inner,
    );
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Center a rectangle of fixed size, clipped to `r`
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
