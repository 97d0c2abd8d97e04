//! Conference Tabs
//!
//! One tab per recommended venue. Papers under the active tab expand to show
//! the abstract and outbound links.

use crate::analysis::links::{github_url, scholar_url};
use crate::analysis::{ConferenceRecommendation, Paper};
use crate::tui::app::ResultsView;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render_conferences(
    frame: &mut Frame,
    area: Rect,
    conferences: &[ConferenceRecommendation],
    view: &ResultsView,
) {
    let block = Block::default()
        .title(" Target Venues ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if conferences.is_empty() {
        let empty = Paragraph::new(Line::styled("No venue recommendations.", Theme::text_dim()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let active = view.active_conference.min(conferences.len() - 1);
    let titles: Vec<Line> = conferences
        .iter()
        .map(|c| Line::from(c.name.clone()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(active)
        .style(Theme::text_secondary())
        .highlight_style(Theme::selected())
        .divider("│");
    frame.render_widget(tabs, chunks[0]);

    let body = Paragraph::new(conference_lines(active, &conferences[active], view))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[1]);
}

/// Body of the active tab
pub fn conference_lines(
    index: usize,
    conference: &ConferenceRecommendation,
    view: &ResultsView,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(conference.reason.clone(), Theme::text())),
        Line::from(Span::styled(conference.url.clone(), Theme::link())),
        Line::from(""),
        Line::from(Span::styled("Relevant Papers", Theme::heading())),
    ];

    if conference.relevant_papers.is_empty() {
        lines.push(Line::from(Span::styled("  none listed", Theme::text_dim())));
    }

    for (i, paper) in conference.relevant_papers.iter().enumerate() {
        let selected = i == view.selected_paper;
        let expanded = view.is_expanded(index, i);
        lines.extend(paper_lines(paper, selected, expanded));
    }

    lines
}

fn paper_lines(paper: &Paper, selected: bool, expanded: bool) -> Vec<Line<'static>> {
    let marker = if selected { Icons::SELECTED } else { " " };
    let fold = if expanded { Icons::EXPANDED } else { Icons::COLLAPSED };
    let title_style = if selected { Theme::selected() } else { Theme::text() };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} {} ", marker, fold), Theme::selected()),
        Span::styled(paper.title.clone(), title_style),
        Span::styled(format!(" ({})", paper.year), Theme::text_secondary()),
    ])];

    if !expanded {
        return lines;
    }

    lines.push(Line::from(vec![
        Span::styled("    Key Insight: ", Theme::keyword()),
        Span::styled(paper.one_liner.clone(), Theme::text()),
    ]));
    lines.push(Line::from(Span::styled(
        format!("    {}", paper.abstract_text),
        Theme::text_secondary(),
    )));
    lines.push(Line::from(vec![
        Span::styled("    Scholar ", Theme::text_dim()),
        Span::styled(scholar_url(&paper.title), Theme::link()),
    ]));
    if let Some(url) = paper.github.as_deref().and_then(github_url) {
        lines.push(Line::from(vec![
            Span::styled("    Code    ", Theme::text_dim()),
            Span::styled(url, Theme::link()),
        ]));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn conference() -> ConferenceRecommendation {
        ConferenceRecommendation {
            name: "ICLR 2026".to_string(),
            url: "https://iclr.cc".to_string(),
            reason: "Strong efficiency track".to_string(),
            relevant_papers: vec![
                Paper {
                    title: "Fast Inference from Transformers via Speculative Decoding".to_string(),
                    year: 2023,
                    one_liner: "Draft then verify.".to_string(),
                    abstract_text: "We accelerate sampling...".to_string(),
                    github: None,
                },
                Paper {
                    title: "FlashAttention".to_string(),
                    year: 2022,
                    one_liner: "IO-aware attention.".to_string(),
                    abstract_text: "Transformers are slow...".to_string(),
                    github: Some("github.com/Dao-AILab/flash-attention".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_collapsed_papers_hide_details() {
        let text = flatten(&conference_lines(0, &conference(), &ResultsView::default()));
        assert!(text.contains("FlashAttention (2022)"));
        assert!(!text.contains("Key Insight"));
        assert!(!text.contains("scholar.google.com"));
    }

    #[test]
    fn test_expanded_paper_shows_links() {
        let mut view = ResultsView::default();
        view.expanded.insert((0, 0));
        view.expanded.insert((0, 1));
        let text = flatten(&conference_lines(0, &conference(), &view));

        assert!(text.contains("Key Insight: Draft then verify."));
        assert!(text.contains(
            "https://scholar.google.com/scholar?q=Fast%20Inference%20from%20Transformers%20via%20Speculative%20Decoding"
        ));
        assert!(text.contains("https://github.com/Dao-AILab/flash-attention"));
        // Only the paper with a repository gets a code link
        assert_eq!(text.matches("Code").count(), 1);
    }
}
