//! Loading Widget
//!
//! Spinner, rotating status text and an indeterminate bar shown while an
//! analysis is in flight.

use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const BAR_SEGMENT: usize = 8;

/// Render the loading indicator
pub fn render_loading(frame: &mut Frame, area: Rect, status: &str, ticks: usize) {
    let block = Block::default()
        .title(" Analyzing ")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let spinner = Icons::SPINNER[ticks % Icons::SPINNER.len()];
    let width = inner.width as usize;

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", spinner), Theme::active()),
            Span::styled(truncate_string(status, width.saturating_sub(2)), Theme::active()),
        ]),
        Line::from(Span::styled(indeterminate_bar(width, ticks), Theme::keyword())),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// A segment sweeping across `width` cells
fn indeterminate_bar(width: usize, ticks: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let segment = BAR_SEGMENT.min(width);
    let start = ticks % width;
    (0..width)
        .map(|i| {
            let offset = (i + width - start) % width;
            if offset < segment {
                '━'
            } else {
                '─'
            }
        })
        .collect()
}

/// Truncate a string to fit within a given width
fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_width).collect()
    }
}
