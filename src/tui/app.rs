//! Application State
//!
//! Wires the view state machine to the input form, the result navigation and
//! the background analysis task.

use crate::analysis::{
    AnalysisError, AnalysisMode, AnalysisRequest, AnalysisResult, Analyzer, ConferenceRecommendation,
};
use crate::config::Config;
use crate::tui::diagram::DiagramView;
use crate::tui::event::AppAction;
use crate::tui::state::{View, ViewState};
use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tui_textarea::{CursorMove, TextArea};

const PAGE: u16 = 10;

/// Events from the background analysis task
#[derive(Debug)]
pub enum AppEvent {
    AnalysisFinished(Result<AnalysisResult, AnalysisError>),
}

/// Navigation state of the result screen
#[derive(Debug, Default)]
pub struct ResultsView {
    pub active_conference: usize,
    pub selected_paper: usize,
    pub expanded: HashSet<(usize, usize)>,
    pub scroll: u16,
    /// Written by the renderer once the viewport is known
    pub max_scroll: Cell<u16>,
    pub show_prompt: bool,
}

impl ResultsView {
    pub fn is_expanded(&self, conference: usize, paper: usize) -> bool {
        self.expanded.contains(&(conference, paper))
    }

    fn toggle_selected(&mut self) {
        let key = (self.active_conference, self.selected_paper);
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }
}

pub struct App {
    pub config: Config,

    pub state: ViewState,
    pub show_help: bool,
    pub should_quit: bool,
    /// Animation counter, advanced on every tick
    pub ticks: usize,

    // Input form
    pub input: TextArea<'static>,
    pub mode: AnalysisMode,
    pub fast_track: bool,

    pub results: ResultsView,
    pub diagram: DiagramView,

    analyzer: Arc<dyn Analyzer>,
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(config: Config, analyzer: Arc<dyn Analyzer>) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let state = ViewState::new(config.tui.loading_step());

        Self {
            config,
            state,
            show_help: false,
            should_quit: false,
            ticks: 0,
            input: new_input(AnalysisMode::default()),
            mode: AnalysisMode::default(),
            fast_track: false,
            results: ResultsView::default(),
            diagram: DiagramView::default(),
            analyzer,
            event_rx: rx,
            event_tx: tx,
        }
    }

    /// Text currently in the input field
    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    /// Whether Enter would start an analysis right now
    pub fn can_submit(&self) -> bool {
        !self.state.is_busy() && !self.input_text().trim().is_empty()
    }

    /// Wait for the next outcome from the background task
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AnalysisFinished(outcome) => {
                self.state.complete(outcome);
                if self.state.view() == View::Result {
                    self.results = ResultsView::default();
                    self.sync_diagram();
                }
            }
        }
    }

    fn sync_diagram(&mut self) {
        match self.state.result().and_then(AnalysisResult::as_valid) {
            Some(analysis) => {
                if self.diagram.sync(&analysis.methodology.mermaid_code) {
                    debug!("Methodology diagram rendered");
                }
            }
            None => self.diagram.clear(),
        }
    }

    pub fn handle_action(&mut self, action: AppAction) {
        if action == AppAction::Tick {
            self.ticks = self.ticks.wrapping_add(1);
            return;
        }

        if action == AppAction::ForceQuit {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            // Any other key closes the help overlay
            self.show_help = false;
            return;
        }

        match action {
            AppAction::Quit => {
                self.should_quit = true;
            }
            AppAction::ToggleHelp => {
                self.show_help = true;
            }
            AppAction::Escape => {}
            _ => match self.state.view() {
                View::Input => self.handle_input_action(action),
                View::Result => self.handle_result_action(action),
            },
        }
    }

    fn handle_input_action(&mut self, action: AppAction) {
        // The form is read-only while a request is in flight
        if self.state.is_busy() {
            return;
        }

        match action {
            AppAction::Submit => self.submit(),
            AppAction::NextTab | AppAction::PrevTab => self.set_mode(self.mode.toggle()),
            AppAction::ToggleFastTrack => {
                self.fast_track = !self.fast_track;
            }
            AppAction::ScrollUp => self.input.move_cursor(CursorMove::Up),
            AppAction::ScrollDown => self.input.move_cursor(CursorMove::Down),
            AppAction::ScrollPageUp => self.input.move_cursor(CursorMove::Top),
            AppAction::ScrollPageDown => self.input.move_cursor(CursorMove::Bottom),
            AppAction::Prev => self.input.move_cursor(CursorMove::Back),
            AppAction::Next => self.input.move_cursor(CursorMove::Forward),
            AppAction::Paste(text) => {
                self.input.insert_str(text.replace("\r\n", "\n").replace('\r', "\n"));
            }
            AppAction::Input(key) => {
                self.input.input(key);
            }
            _ => {}
        }
    }

    fn handle_result_action(&mut self, action: AppAction) {
        match action {
            AppAction::Reset => self.reset(),
            AppAction::TogglePrompt => {
                self.results.show_prompt = !self.results.show_prompt;
            }
            AppAction::ScrollUp => {
                self.results.scroll = self.results.scroll.saturating_sub(1);
            }
            AppAction::ScrollDown => {
                self.results.scroll = (self.results.scroll + 1).min(self.results.max_scroll.get());
            }
            AppAction::ScrollPageUp => {
                self.results.scroll = self.results.scroll.saturating_sub(PAGE);
            }
            AppAction::ScrollPageDown => {
                self.results.scroll =
                    (self.results.scroll + PAGE).min(self.results.max_scroll.get());
            }
            AppAction::NextTab | AppAction::PrevTab => {
                let count = self.conferences().len();
                if count > 0 {
                    let current = self.results.active_conference;
                    self.results.active_conference = if action == AppAction::NextTab {
                        (current + 1) % count
                    } else {
                        (current + count - 1) % count
                    };
                    self.results.selected_paper = 0;
                }
            }
            AppAction::Prev => {
                self.results.selected_paper = self.results.selected_paper.saturating_sub(1);
            }
            AppAction::Next => {
                let papers = self.active_paper_count();
                if self.results.selected_paper + 1 < papers {
                    self.results.selected_paper += 1;
                }
            }
            AppAction::Submit => {
                if self.active_paper_count() > 0 {
                    self.results.toggle_selected();
                }
            }
            _ => {}
        }
    }

    fn conferences(&self) -> &[ConferenceRecommendation] {
        self.state
            .result()
            .and_then(AnalysisResult::as_valid)
            .map(|analysis| analysis.conferences.as_slice())
            .unwrap_or_default()
    }

    fn active_paper_count(&self) -> usize {
        self.conferences()
            .get(self.results.active_conference)
            .map(|c| c.relevant_papers.len())
            .unwrap_or(0)
    }

    fn set_mode(&mut self, mode: AnalysisMode) {
        self.mode = mode;
        self.input.set_placeholder_text(placeholder(mode));
    }

    /// Start an analysis of the current input in the background
    fn submit(&mut self) {
        let text = self.input_text();
        let request = match AnalysisRequest::new(text, self.mode, self.fast_track) {
            Ok(request) => request,
            Err(_) => return,
        };
        if !self.state.begin_submit(request.input()) {
            return;
        }

        info!(mode = %request.mode(), fast_track = request.fast_track(), "Analysis submitted");

        let tx = self.event_tx.clone();
        let analyzer = Arc::clone(&self.analyzer);
        tokio::spawn(async move {
            let outcome = analyzer.analyze(&request).await;
            if tx.send(AppEvent::AnalysisFinished(outcome)).await.is_err() {
                warn!("UI closed before analysis finished");
            }
        });
    }

    /// Back to a fresh input form
    fn reset(&mut self) {
        if !self.state.reset() {
            return;
        }
        self.mode = AnalysisMode::default();
        self.fast_track = false;
        self.input = new_input(self.mode);
        self.results = ResultsView::default();
        self.diagram.clear();
    }
}

pub fn heading(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Idea => "Enter a Research Topic",
        AnalysisMode::Abstract => "Input Research Abstract",
    }
}

pub fn hint(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Idea => "We will generate a novel abstract for you and then analyze its vibe.",
        AnalysisMode::Abstract => {
            "Paste your existing abstract to check its trendiness and conference fit."
        }
    }
}

pub fn placeholder(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Idea => "e.g., 'Generative Video for Robotics', 'Efficient LLM Inference'...",
        AnalysisMode::Abstract => "Paste your research abstract here...",
    }
}

fn new_input(mode: AnalysisMode) -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_cursor_line_style(ratatui::style::Style::default());
    input.set_placeholder_text(placeholder(mode));
    input
}
