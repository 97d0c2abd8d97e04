//! Roadmap Timeline

use crate::analysis::RoadmapStep;
use crate::tui::theme::{Icons, Theme};
use ratatui::text::{Line, Span};

/// Ordered timeline lines, one block per step
pub fn roadmap_lines(steps: &[RoadmapStep]) -> Vec<Line<'static>> {
    if steps.is_empty() {
        return vec![Line::from(Span::styled("No roadmap provided.", Theme::text_dim()))];
    }

    let mut lines = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", i + 1), Theme::selected()),
            Span::styled(step.phase.clone(), Theme::heading()),
            Span::raw("  "),
            Span::styled(format!("[{}]", step.timeline), Theme::active()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("    {} ", Icons::DOT), Theme::text_dim()),
            Span::styled(step.description.clone(), Theme::text()),
        ]));
    }
    lines
}
