//! Metrics Chart
//!
//! Radar metrics drawn as horizontal bars on a 0-100 scale.

use crate::analysis::RadarMetric;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Direction, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

pub fn render_metrics(frame: &mut Frame, area: Rect, metrics: &[RadarMetric]) {
    let block = Block::default()
        .title(" Vibe Metrics ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if metrics.is_empty() {
        let empty = Paragraph::new(Line::styled("No metrics provided.", Theme::text_dim()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = metrics
        .iter()
        .map(|m| {
            Bar::default()
                .label(Line::from(m.metric.clone()))
                .value(u64::from(m.value))
                .text_value(format!("{}%", m.value))
                .style(Theme::keyword())
                .value_style(Theme::badge_primary())
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(100)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Rows the chart needs for `count` metrics
pub fn metrics_height(count: usize) -> u16 {
    (count.max(1) as u16).saturating_add(2)
}
