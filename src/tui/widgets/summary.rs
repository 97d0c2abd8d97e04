//! Result Summary
//!
//! Scrollable left column of the result screen: echoed input, prompt panel,
//! abstract, keywords, trend score, methodology and roadmap.

use super::roadmap::roadmap_lines;
use crate::analysis::prompt::prompt_summary;
use crate::analysis::{ScoreBand, ValidAnalysis};
use crate::tui::theme::Theme;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::cell::Cell;

/// Everything the summary column shows
pub struct SummaryContext<'a> {
    pub analysis: &'a ValidAnalysis,
    pub input: &'a str,
    pub diagram: &'a [String],
    pub show_prompt: bool,
    pub analyzed_at: Option<DateTime<Utc>>,
}

pub fn summary_lines(ctx: &SummaryContext) -> Vec<Line<'static>> {
    let analysis = ctx.analysis;
    let mut lines = vec![
        Line::from(Span::styled("YOU ENTERED", Theme::text_dim())),
        Line::from(Span::styled(format!("\"{}\"", ctx.input), Theme::quote())),
        Line::from(""),
    ];

    if ctx.show_prompt {
        lines.push(Line::from(Span::styled("⚙ Prompt Used", Theme::heading())));
        for (label, value) in prompt_summary() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", label), Theme::text_secondary()),
                Span::styled(value, Theme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }

    if let Some(generated) = &analysis.generated_abstract {
        lines.push(Line::from(Span::styled("💡 Generated Research Idea", Theme::heading())));
        lines.push(Line::from(Span::styled(generated.clone(), Theme::text())));
        lines.push(Line::from(""));
    }

    lines.push(score_line(analysis.trend_match_score));
    if !analysis.one_liner.is_empty() {
        lines.push(Line::from(Span::styled(
            analysis.one_liner.clone(),
            Theme::quote(),
        )));
    }
    if !analysis.keywords.is_empty() {
        let tags: Vec<Span> = analysis
            .keywords
            .iter()
            .flat_map(|k| {
                [
                    Span::styled(format!("#{}", k), Theme::keyword()),
                    Span::raw(" "),
                ]
            })
            .collect();
        lines.push(Line::from(tags));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("🧩 Proposed Methodology", Theme::heading())));
    if !analysis.methodology.description.is_empty() {
        lines.push(Line::from(Span::styled(
            analysis.methodology.description.clone(),
            Theme::text(),
        )));
    }
    if ctx.diagram.is_empty() {
        lines.push(Line::from(Span::styled("No diagram provided.", Theme::text_dim())));
    } else {
        lines.extend(
            ctx.diagram
                .iter()
                .map(|l| Line::from(Span::styled(l.clone(), Theme::text_secondary()))),
        );
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("🚀 Roadmap (Dec '25 Start)", Theme::heading())));
    lines.extend(roadmap_lines(&analysis.roadmap));

    if let Some(at) = ctx.analyzed_at {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Analyzed {}", at.format("%Y-%m-%d %H:%M UTC")),
            Theme::text_dim(),
        )));
    }

    lines
}

fn score_line(score: Option<u8>) -> Line<'static> {
    let label = Span::styled("Trend Match ", Theme::text_secondary());
    match score {
        Some(score) => {
            let band = ScoreBand::from_score(score);
            Line::from(vec![
                label,
                Span::styled(format!("{}%", score), Theme::score(band)),
                Span::raw(" "),
                Span::raw(band.icon()),
            ])
        }
        None => Line::from(vec![label, Span::styled("N/A", Theme::text_dim())]),
    }
}

/// Rows `lines` occupy once wrapped to `width`
pub fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

pub fn render_summary(
    frame: &mut Frame,
    area: Rect,
    ctx: &SummaryContext,
    scroll: u16,
    max_scroll: &Cell<u16>,
) {
    let block = Block::default()
        .title(" Analysis ")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(area);

    let lines = summary_lines(ctx);
    let limit = wrapped_height(&lines, inner.width).saturating_sub(inner.height);
    max_scroll.set(limit);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(limit), 0));
    frame.render_widget(paragraph, area);
}
