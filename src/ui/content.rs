//! Topic page renderer

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::ContentState;
use crate::document::{ContentBlock, Document};
use crate::theme::Theme;

/// Draw a topic page into `area`, updating the scroll metrics
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    doc: &Document,
    content: &mut ContentState,
    theme: &Theme,
) {
    // Reserve 1 column for scrollbar
    let content_width = area.width.saturating_sub(2) as usize;
    let content_area =
        Rect { x: area.x, y: area.y, width: area.width.saturating_sub(1), height: area.height };
    let scrollbar_x = area.x + area.width.saturating_sub(1);

    let lines = render_document(doc, theme, content_width);
    let total_lines = lines.len();
    let visible_height = area.height as usize;

    content.total_lines = total_lines;
    content.visible_height = visible_height;
    content.clamp_scroll();

    let scroll_offset = content.scroll_offset;
    let visible_lines: Vec<Line> =
        lines.into_iter().skip(scroll_offset).take(visible_height).collect();
    frame.render_widget(Paragraph::new(visible_lines), content_area);

    draw_scrollbar(frame, scrollbar_x, area.y, area.height, scroll_offset, total_lines, theme);
}

/// Draw a scrollbar indicator
fn draw_scrollbar(
    frame: &mut Frame,
    x: u16,
    y: u16,
    height: u16,
    scroll_offset: usize,
    total_lines: usize,
    theme: &Theme,
) {
    let height = height as usize;
    if total_lines <= height || height == 0 {
        return;
    }

    let visible_ratio = height as f64 / total_lines as f64;
    let thumb_height = ((height as f64 * visible_ratio).ceil() as usize).max(1);

    let max_scroll = total_lines.saturating_sub(height / 2);
    let scroll_ratio =
        if max_scroll == 0 { 0.0 } else { scroll_offset as f64 / max_scroll as f64 };
    let thumb_top = ((height - thumb_height) as f64 * scroll_ratio).round() as usize;

    for i in 0..height {
        let on_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let (ch, color) =
            if on_thumb { ("█", theme.accent_secondary) } else { ("░", theme.bg_tertiary) };
        frame.render_widget(
            Paragraph::new(ch).style(Style::default().fg(color)),
            Rect { x, y: y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}

/// Render a page, title first, to styled lines
pub fn render_document(doc: &Document, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if !doc.title.is_empty() {
        lines.push(Line::from(Span::styled(
            doc.title.clone(),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }
    lines.extend(render_content_blocks(&doc.blocks, theme, width));

    // Drop trailing spacing
    while lines.last().is_some_and(|line| line.width() == 0) {
        lines.pop();
    }
    lines
}

/// Render content blocks to styled lines
pub fn render_content_blocks(
    blocks: &[ContentBlock],
    theme: &Theme,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Heading { level, text } => {
                render_heading(&mut lines, *level, text, theme)
            }
            ContentBlock::Paragraph(text) => render_paragraph(&mut lines, text, theme, width),
            ContentBlock::Code { language, code } => {
                render_code_block(&mut lines, language.as_deref(), code, theme)
            }
            ContentBlock::List { ordered, items } => {
                render_list(&mut lines, *ordered, items, theme, width)
            }
            ContentBlock::Quote(text) => render_blockquote(&mut lines, text, theme, width),
            ContentBlock::Image { alt } => {
                let label = if alt.is_empty() {
                    "[Image]".to_string()
                } else {
                    format!("[Image: {}]", alt)
                };
                lines.push(Line::from(Span::styled(label, Style::default().fg(theme.fg_muted))));
                lines.push(Line::from(""));
            }
            ContentBlock::Rule => {
                let rule_width = width.saturating_sub(4).min(32);
                lines.push(Line::from(Span::styled(
                    "─".repeat(rule_width),
                    Style::default().fg(theme.border),
                )));
                lines.push(Line::from(""));
            }
        }
    }

    lines
}

fn render_heading(lines: &mut Vec<Line<'static>>, level: u8, text: &str, theme: &Theme) {
    let (style, prefix) = match level {
        1 => (
            Style::default()
                .fg(theme.accent_primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            "",
        ),
        2 => (Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD), ""),
        3 => (Style::default().fg(theme.info).add_modifier(Modifier::BOLD), "  "),
        _ => (Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD), "    "),
    };

    let mut spans = vec![Span::styled(prefix, style)];
    for (i, part) in text.split('`').enumerate() {
        if part.is_empty() {
            continue;
        }
        // Odd parts sat between backticks
        let part_style = if i % 2 == 1 { style.fg(theme.code) } else { style };
        spans.push(Span::styled(part.to_string(), part_style));
    }

    lines.push(Line::from(spans));
    lines.push(Line::from(""));
}

fn render_paragraph(lines: &mut Vec<Line<'static>>, text: &str, theme: &Theme, width: usize) {
    let spans = parse_inline_formatting(text, theme);
    lines.extend(wrap_spans(spans, width));
    lines.push(Line::from(""));
}

/// Parse inline markdown markers into styled spans
pub fn parse_inline_formatting(text: &str, theme: &Theme) -> Vec<Span<'static>> {
    let plain = Style::default().fg(theme.fg_primary);
    let mut spans = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current = String::new();

    while let Some(c) = chars.next() {
        match c {
            '`' => {
                if !current.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut current), plain));
                }
                let mut code = String::new();
                for next in chars.by_ref() {
                    if next == '`' {
                        break;
                    }
                    code.push(next);
                }
                let style = Style::default().fg(theme.code).bg(theme.bg_secondary);
                spans.push(Span::styled(code, style));
            }
            '*' => {
                let is_double = chars.peek() == Some(&'*');
                if is_double {
                    chars.next();
                }

                let mut inner = String::new();
                let mut found_end = false;
                while let Some(next) = chars.next() {
                    if next == '*' {
                        if !is_double {
                            found_end = true;
                            break;
                        }
                        if chars.peek() == Some(&'*') {
                            chars.next();
                            found_end = true;
                            break;
                        }
                    }
                    inner.push(next);
                }

                if found_end && !inner.is_empty() {
                    if !current.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut current), plain));
                    }
                    let modifier = if is_double { Modifier::BOLD } else { Modifier::ITALIC };
                    spans.push(Span::styled(inner, plain.add_modifier(modifier)));
                } else {
                    // Not a valid marker, treat as literal
                    current.push('*');
                    if is_double {
                        current.push('*');
                    }
                    current.push_str(&inner);
                    if found_end {
                        current.push('*');
                        if is_double {
                            current.push('*');
                        }
                    }
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        spans.push(Span::styled(current, plain));
    }
    if spans.is_empty() {
        spans.push(Span::raw(""));
    }
    spans
}

/// Wrap styled spans into lines while preserving formatting
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }

    let mut lines = Vec::new();
    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    for span in spans {
        let style = span.style;
        for word in span.content.split_inclusive(char::is_whitespace) {
            let word_len = word.chars().count();

            if current_width + word_len > width && current_width > 0 {
                lines.push(Line::from(std::mem::take(&mut current_line)));
                current_width = 0;
            }

            current_line.push(Span::styled(word.to_string(), style));
            current_width += word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(Line::from(current_line));
    }
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

fn render_code_block(
    lines: &mut Vec<Line<'static>>,
    language: Option<&str>,
    code: &str,
    theme: &Theme,
) {
    lines.push(Line::from(vec![
        Span::styled("┌─ ", Style::default().fg(theme.border)),
        Span::styled(language.unwrap_or("code").to_string(), Style::default().fg(theme.info)),
        Span::styled(" ─", Style::default().fg(theme.border)),
    ]));
    for line in code.lines() {
        lines.push(Line::from(vec![
            Span::styled("│ ", Style::default().fg(theme.border)),
            Span::styled(line.to_string(), Style::default().fg(theme.code)),
        ]));
    }
    let border = Style::default().fg(theme.border);
    lines.push(Line::from(Span::styled("└──────", border)));
    lines.push(Line::from(""));
}

fn render_list(
    lines: &mut Vec<Line<'static>>,
    ordered: bool,
    items: &[String],
    theme: &Theme,
    width: usize,
) {
    for (i, item) in items.iter().enumerate() {
        let marker = if ordered { format!("  {}. ", i + 1) } else { "  • ".to_string() };
        let indent = " ".repeat(marker.chars().count());
        let wrapped = wrap_spans(
            parse_inline_formatting(item, theme),
            width.saturating_sub(marker.chars().count()),
        );

        for (j, line) in wrapped.into_iter().enumerate() {
            let prefix = if j == 0 {
                Span::styled(marker.clone(), Style::default().fg(theme.accent_secondary))
            } else {
                Span::raw(indent.clone())
            };
            let mut line_spans = vec![prefix];
            line_spans.extend(line.spans);
            lines.push(Line::from(line_spans));
        }
    }
    lines.push(Line::from(""));
}

fn render_blockquote(lines: &mut Vec<Line<'static>>, text: &str, theme: &Theme, width: usize) {
    let prefix = "  │ ";
    let muted: Vec<Span<'static>> = parse_inline_formatting(text, theme)
        .into_iter()
        .map(|s| Span::styled(s.content.to_string(), s.style.fg(theme.fg_muted)))
        .collect();

    for line in wrap_spans(muted, width.saturating_sub(4)) {
        let mut line_spans = vec![Span::styled(prefix, Style::default().fg(theme.accent_primary))];
        line_spans.extend(line.spans);
        lines.push(Line::from(line_spans));
    }
    lines.push(Line::from(""));
}
