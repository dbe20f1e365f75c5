//! Chapter screen: title bar, topic content, navigation bar

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::{content, layout, questions};
use crate::app::state::{AppState, Focus};
use crate::theme::Theme;
use crate::views::TopicNavigator;
use crate::views::navigator::{NO_TOPICS, TOPIC_EMPTY};

/// Height of the navigation bar
pub const NAV_HEIGHT: u16 = 3;

/// Draw the chapter screen
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [title_area, body_area, nav_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(NAV_HEIGHT),
    ])
    .areas(area);

    draw_title(frame, title_area, &state.reader, theme);

    let content_area = if state.show_questions {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(body_area);
        questions::draw(frame, right, &state.questions, theme, state.focus == Focus::Questions);
        left
    } else {
        body_area
    };

    draw_content(frame, content_area, state, theme);
    draw_navigation(frame, nav_area, &state.reader, theme);
}

fn draw_title(frame: &mut Frame, area: Rect, reader: &TopicNavigator, theme: &Theme) {
    let block = layout::panel(" Chapter ", false, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![Span::styled(
        reader.title().to_string(),
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    )];
    if let Some(topic) = reader.current_topic() {
        spans.push(Span::styled("  ›  ", Style::default().fg(theme.fg_muted)));
        spans.push(Span::styled(topic.display_title(), Style::default().fg(theme.fg_secondary)));
        if let Some(time) = &topic.estimated_time {
            spans.push(Span::styled(format!("  ({})", time), Style::default().fg(theme.fg_muted)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn draw_content(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let block = layout::panel(" Content ", state.focus == Focus::Main, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(notice) = state.reader.notice() {
        let color = if notice == NO_TOPICS || notice == TOPIC_EMPTY {
            theme.fg_muted
        } else {
            theme.error
        };
        layout::draw_message(frame, inner, notice, Style::default().fg(color));
        return;
    }
    if let Some(page) = state.reader.page() {
        content::draw(frame, inner, page, &mut state.content, theme);
    }
}

/// Previous button, progress gauge, next button
fn draw_navigation(frame: &mut Frame, area: Rect, reader: &TopicNavigator, theme: &Theme) {
    let [prev_area, gauge_area, next_area] = Layout::horizontal([
        Constraint::Length(16),
        Constraint::Min(10),
        Constraint::Length(16),
    ])
    .areas(area);

    frame.render_widget(button("◀ Previous", reader.can_go_previous(), theme), prev_area);
    frame.render_widget(button("Next ▶", reader.can_go_next(), theme), next_area);

    let total = reader.topics().len();
    let label = if total == 0 {
        "No topics".to_string()
    } else {
        format!("Topic {} of {}", reader.current_index() + 1, total)
    };
    let frame_block =
        Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border));
    let gauge = Gauge::default()
        .block(frame_block)
        .gauge_style(Style::default().fg(theme.accent_primary).bg(theme.bg_secondary))
        .ratio(progress_ratio(reader))
        .label(Span::styled(label, Style::default().fg(theme.fg_secondary)));
    frame.render_widget(gauge, gauge_area);
}

fn progress_ratio(reader: &TopicNavigator) -> f64 {
    (reader.progress_percent() / 100.0).clamp(0.0, 1.0)
}

fn button<'a>(label: &'a str, enabled: bool, theme: &Theme) -> Paragraph<'a> {
    let (text_style, border) = if enabled {
        let style = Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD);
        (style, theme.border_focused)
    } else {
        (Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM), theme.border)
    };
    Paragraph::new(Span::styled(label, text_style))
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)))
}
