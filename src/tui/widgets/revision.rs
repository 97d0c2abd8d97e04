//! Revision Screen
//!
//! Terminal branch for input the backend rejected. Shows the feedback and the
//! literal input; the only way forward is to try again.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Shown when the backend gives no feedback of its own
pub const DEFAULT_REVISION: &str = "The input provided doesn't appear to be a valid research \
topic or abstract. Please try again with more specific technical details.";

pub fn revision_lines(feedback: Option<&str>, input: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("⚠ Input Needs Revision", Theme::error_banner())),
        Line::from(""),
        Line::from(Span::styled(
            feedback.unwrap_or(DEFAULT_REVISION).to_string(),
            Theme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled("YOU ENTERED:", Theme::text_dim())),
        Line::from(Span::styled(format!("\"{}\"", input), Theme::quote())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Ctrl+R]", Theme::shortcut_key()),
            Span::styled(" Try Again", Theme::shortcut_desc()),
        ]),
    ]
}

pub fn render_revision(frame: &mut Frame, area: Rect, feedback: Option<&str>, input: &str) {
    let paragraph = Paragraph::new(revision_lines(feedback, input))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::error()),
        );

    frame.render_widget(paragraph, area);
}
