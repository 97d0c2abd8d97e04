//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::analysis::prompt::SIMULATED_DATE;
use crate::analysis::{AnalysisMode, AnalysisResult, ValidAnalysis};
use crate::tui::app::{self, App};
use crate::tui::state::View;
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets::{self, SummaryContext};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    match (app.state.view(), app.state.result()) {
        (View::Result, Some(AnalysisResult::Valid(analysis))) => {
            render_result(frame, chunks[1], app, analysis)
        }
        (View::Result, Some(AnalysisResult::Invalid { feedback })) => {
            let area = centered_rect(70, 70, chunks[1]);
            widgets::render_revision(
                frame,
                area,
                feedback.as_deref(),
                app.state.last_input().unwrap_or_default(),
            );
        }
        _ => render_input_view(frame, chunks[1], app),
    }

    render_status_bar(frame, chunks[2], app);

    if app.show_help {
        render_help(frame);
    }
}

/// Title plus simulated-date and model badges
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title_text = vec![Line::from(vec![
        Span::raw("🧭 "),
        Span::styled("Research Vibe", Theme::title()),
        Span::styled(" Navigator", Theme::text_secondary()),
        Span::raw("  "),
        Span::styled(format!(" Simulating {} ", SIMULATED_DATE), Theme::badge_muted()),
        Span::raw(" "),
        Span::styled(format!(" {} ", app.config.llm.model), Theme::badge_primary()),
    ])];

    let title = Paragraph::new(title_text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(title, area);
}

fn render_input_view(frame: &mut Frame, area: Rect, app: &App) {
    let busy = app.state.is_busy();
    let footer_height = if busy || app.state.error().is_some() { 4 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Mode tabs
            Constraint::Length(2),             // Heading + hint
            Constraint::Min(5),                // Text field
            Constraint::Length(1),             // Fast track + submit
            Constraint::Length(footer_height), // Loading or error
        ])
        .split(area);

    let selected = match app.mode {
        AnalysisMode::Idea => 0,
        AnalysisMode::Abstract => 1,
    };
    let tabs = Tabs::new(vec!["💡 Get Research Idea", "📝 Evaluate Abstract"])
        .select(selected)
        .style(Theme::text_secondary())
        .highlight_style(Theme::selected())
        .divider("│");
    frame.render_widget(tabs, chunks[0]);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(app::heading(app.mode), Theme::heading())),
        Line::from(Span::styled(app::hint(app.mode), Theme::text_secondary())),
    ]);
    frame.render_widget(heading, chunks[1]);

    let block = Block::default()
        .title(" Input ")
        .borders(Borders::ALL)
        .border_style(if busy {
            Theme::border()
        } else {
            Theme::border_focused()
        });
    let inner = block.inner(chunks[2]);
    frame.render_widget(block, chunks[2]);
    frame.render_widget(&app.input, inner);

    let toggle = if app.fast_track {
        Icons::TOGGLE_ON
    } else {
        Icons::TOGGLE_OFF
    };
    let submit_style = if app.can_submit() {
        Theme::shortcut_key()
    } else {
        Theme::text_dim()
    };
    let controls = Line::from(vec![
        Span::styled(
            format!("{} 🚀 Apply Fast ", toggle),
            Theme::fast_track(app.fast_track),
        ),
        Span::styled("(Deadline < 2 months) ", Theme::text_dim()),
        Span::styled("[Ctrl+F]", Theme::shortcut_key()),
        Span::raw("   "),
        Span::styled("Analyze Vibe 🔎 [Enter]", submit_style),
    ]);
    frame.render_widget(Paragraph::new(controls), chunks[3]);

    if let Some(status) = app.state.loading_text() {
        widgets::render_loading(frame, chunks[4], status, app.ticks);
    } else if let Some(error) = app.state.error() {
        let banner = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", Icons::ACTIVE), Theme::error()),
            Span::styled(error.to_string(), Theme::error_banner()),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::error()),
        );
        frame.render_widget(banner, chunks[4]);
    }
}

fn render_result(frame: &mut Frame, area: Rect, app: &App, analysis: &ValidAnalysis) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let ctx = SummaryContext {
        analysis,
        input: app.state.last_input().unwrap_or_default(),
        diagram: app.diagram.lines(),
        show_prompt: app.results.show_prompt,
        analyzed_at: app.state.analyzed_at(),
    };
    widgets::render_summary(
        frame,
        columns[0],
        &ctx,
        app.results.scroll,
        &app.results.max_scroll,
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(widgets::metrics_height(analysis.metrics.len())),
        ])
        .split(columns[1]);

    widgets::render_conferences(frame, right[0], &analysis.conferences, &app.results);
    widgets::render_metrics(frame, right[1], &analysis.metrics);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match app.state.view() {
        View::Input if app.state.is_busy() => Span::styled("Analyzing...", Theme::active()),
        View::Input if app.state.error().is_some() => Span::styled("Failed", Theme::error()),
        View::Input => Span::styled(
            format!("Ready ({} mode)", app.mode),
            Theme::text_secondary(),
        ),
        View::Result => Span::styled("Analysis complete", Theme::text_secondary()),
    };

    let keys: &[(&str, &str)] = match app.state.view() {
        View::Input => &[
            ("[Enter]", " Analyze "),
            ("[Tab]", " Mode "),
            ("[Ctrl+F]", " Fast "),
            ("[Ctrl+Q]", " Quit "),
            ("[F1]", " Help"),
        ],
        View::Result => &[
            ("[Tab]", " Venue "),
            ("[←/→]", " Paper "),
            ("[Enter]", " Expand "),
            ("[Ctrl+P]", " Prompt "),
            ("[Ctrl+R]", " New "),
            ("[F1]", " Help"),
        ],
    };

    let shortcuts = keys.iter().flat_map(|(key, desc)| {
        [
            Span::styled(*key, Theme::shortcut_key()),
            Span::styled(*desc, Theme::shortcut_desc()),
        ]
    });

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let rows = [
        ("Enter        ", "Analyze / expand selected paper"),
        ("Alt+Enter    ", "New line in the input field"),
        ("Tab          ", "Switch mode / next venue"),
        ("Shift+Tab    ", "Previous venue"),
        ("Ctrl+F       ", "Toggle fast track"),
        ("←/→          ", "Select paper"),
        ("↑/↓          ", "Scroll results"),
        ("PageUp/Down  ", "Scroll page"),
        ("Ctrl+P       ", "Show prompt used"),
        ("Ctrl+R       ", "Start a new analysis"),
        ("Ctrl+Q       ", "Quit application"),
        ("Ctrl+C       ", "Force quit"),
        ("F1           ", "Show this help"),
    ];

    let mut help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
    ];
    help_lines.extend(rows.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(*key, Theme::shortcut_key()),
            Span::styled(*desc, Theme::text()),
        ])
    }));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Theme::text_dim(),
    )));

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        AnalysisError, AnalysisRequest, Analyzer, ConferenceRecommendation, Methodology,
        RadarMetric,
    };
    use crate::config::Config;
    use crate::types::AppError;
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl Analyzer for Unreachable {
        async fn analyze(&self, _: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
            Err(AnalysisError::Transport(AppError::Internal("unused".to_string())))
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(input: &str, result: AnalysisResult) -> App {
        let mut app = App::new(Config::with_api_key("k"), Arc::new(Unreachable));
        assert!(app.state.begin_submit(input));
        app.state.complete(Ok(result));
        app
    }

    fn venue(name: &str) -> ConferenceRecommendation {
        ConferenceRecommendation {
            name: name.to_string(),
            url: "https://example.org".to_string(),
            reason: "Efficiency focus".to_string(),
            relevant_papers: Vec::new(),
        }
    }

    #[test]
    fn test_valid_result_shows_score_and_venue_tabs() {
        let result = AnalysisResult::Valid(ValidAnalysis {
            generated_abstract: Some("We propose speculative decoding.".to_string()),
            keywords: vec!["LLM".to_string()],
            trend_match_score: Some(72),
            one_liner: "Faster decoding.".to_string(),
            methodology: Methodology::default(),
            conferences: vec![venue("ICLR 2026"), venue("ICML 2026"), venue("MLSys 2026")],
            metrics: vec![RadarMetric {
                metric: "Novelty".to_string(),
                value: 64,
            }],
            roadmap: Vec::new(),
        });
        let text = screen(&app_with("Efficient LLM Inference", result));

        assert!(text.contains("72%"));
        assert!(text.contains("ICLR 2026"));
        assert!(text.contains("ICML 2026"));
        assert!(text.contains("MLSys 2026"));
        assert!(text.contains("Novelty"));
    }

    #[test]
    fn test_invalid_result_shows_feedback_and_input_only() {
        let result = AnalysisResult::Invalid {
            feedback: Some("Input is not a coherent research abstract.".to_string()),
        };
        let text = screen(&app_with("1234", result));

        assert!(text.contains("Input is not a coherent research abstract."));
        assert!(text.contains("\"1234\""));
        assert!(text.contains("Try Again"));
        assert!(!text.contains("Trend Match"));
        assert!(!text.contains("Target Venues"));
    }

    #[test]
    fn test_input_view_shows_error_banner() {
        let mut app = App::new(Config::with_api_key("k"), Arc::new(Unreachable));
        app.state.begin_submit("Efficient LLM Inference");
        app.state.complete(Err(AnalysisError::EmptyResponse {
            finish_reason: None,
        }));
        let text = screen(&app);

        assert!(text.contains("Analysis failed. Please try again."));
        assert!(text.contains("Enter a Research Topic"));
        assert!(text.contains("Simulating December 2025"));
    }
}
