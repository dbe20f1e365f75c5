//! Questions panel: answer log plus the question box

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{command_line, layout};
use crate::theme::Theme;
use crate::views::QuestionLog;
use crate::views::questions::Exchange;

pub fn draw(frame: &mut Frame, area: Rect, log: &QuestionLog, theme: &Theme, focused: bool) {
    let block = layout::panel(" Questions ", focused, theme)
        .title_bottom(Line::from(" [a] ask  [Enter] send  [Esc] leave ").centered());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [log_area, status_area, input_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
            .areas(inner);

    let width = log_area.width.saturating_sub(1) as usize;
    let lines: Vec<Line> =
        log.entries().iter().flat_map(|entry| exchange_lines(entry, width, theme)).collect();

    if lines.is_empty() {
        let hint = "Ask anything about what you are reading.";
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(theme.fg_muted)),
            log_area,
        );
    } else {
        // Keep the newest answer in view
        let skip = lines.len().saturating_sub(log_area.height as usize);
        let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
        frame.render_widget(Paragraph::new(visible), log_area);
    }

    let status = if log.is_pending() {
        Some(Span::styled("Getting answer...", Style::default().fg(theme.info)))
    } else {
        log.error().map(|e| Span::styled(e, Style::default().fg(theme.error)))
    };
    if let Some(status) = status {
        frame.render_widget(Paragraph::new(status), status_area);
    }

    let prompt = format!("> {}", log.input.text());
    let line = if focused {
        let style = Style::default().fg(theme.fg_primary);
        command_line::line_with_cursor(&prompt, log.input.cursor() + 2, style, theme)
    } else {
        Line::from(Span::styled(prompt, Style::default().fg(theme.fg_muted)))
    };
    frame.render_widget(Paragraph::new(line), input_area);
}

/// Wrapped lines for one question and its answer
fn exchange_lines(entry: &Exchange, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let width = width.max(10);
    let mut lines = Vec::new();

    let label = Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD);
    let question_style = Style::default().fg(theme.fg_secondary);
    let answer_style = Style::default().fg(theme.fg_primary);
    push_labelled(&mut lines, "Q: ", &entry.question, label, question_style, width);
    push_labelled(&mut lines, "A: ", &entry.answer.answer, label, answer_style, width);

    let answer = &entry.answer;
    if !answer.sources.is_empty() {
        let sources = format!("Sources: {}", answer.sources.join(", "));
        let style = Style::default().fg(theme.fg_muted);
        for line in textwrap::wrap(&sources, width) {
            lines.push(Line::from(Span::styled(line.into_owned(), style)));
        }
    }
    if !answer.related_concepts.is_empty() {
        let related = format!("Related: {}", answer.related_concepts.join(", "));
        let style = Style::default().fg(theme.info);
        for line in textwrap::wrap(&related, width) {
            lines.push(Line::from(Span::styled(line.into_owned(), style)));
        }
    }
    lines.push(Line::from(""));
    lines
}

fn push_labelled(
    lines: &mut Vec<Line<'static>>,
    label: &'static str,
    text: &str,
    label_style: Style,
    text_style: Style,
    width: usize,
) {
    let options = textwrap::Options::new(width).subsequent_indent("   ");
    for (i, line) in textwrap::wrap(text, options).into_iter().enumerate() {
        let prefix = if i == 0 { Span::styled(label, label_style) } else { Span::raw("") };
        lines.push(Line::from(vec![prefix, Span::styled(line.into_owned(), text_style)]));
    }
}
