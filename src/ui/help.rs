//! Keybinding overlay

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use super::layout;
use crate::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browsing",
        &[
            ("j/k  ↑/↓", "Move selection or scroll"),
            ("h/l  ←/→", "Move between subject cards"),
            ("Enter", "Open subject or chapter"),
            ("Esc", "Go back"),
            ("r", "Reload"),
        ],
    ),
    (
        "Reading",
        &[
            ("n / →", "Next topic"),
            ("p / ←", "Previous topic"),
            ("g / G", "Top or bottom of topic"),
            ("Ctrl-d / Ctrl-u", "Half page down or up"),
        ],
    ),
    (
        "Questions",
        &[
            ("a", "Open the question box"),
            ("Enter", "Send question"),
            ("↑/↓", "Question history"),
            ("Esc", "Leave the question box"),
        ],
    ),
    (
        "Commands",
        &[
            (":ask <question>", "Ask about the current topic"),
            (":chapters <id>", "Open a subject's chapters"),
            (":chapter <id>", "Open a chapter"),
            (":topic <n>", "Jump to topic n"),
            (":subjects", "Back to the subject list"),
            (":q", "Quit"),
        ],
    ),
];

pub fn draw(frame: &mut Frame, theme: &Theme) {
    let area = layout::centered_rect(60, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = layout::panel(" Help ", true, theme)
        .title_bottom(Line::from(" press any key to close ").centered());

    let key_style = Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    for (heading, bindings) in SECTIONS {
        let heading_style = Style::default()
            .fg(theme.accent_secondary)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        lines.push(Line::from(Span::styled(*heading, heading_style)));
        for (keys, what) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<18}", keys), key_style),
                Span::styled(*what, Style::default().fg(theme.fg_primary)),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
