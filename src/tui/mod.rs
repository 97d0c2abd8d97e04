//! Terminal User Interface Module
//!
//! Interactive front end for the Research Vibe Navigator.
//! Built with Ratatui for high-performance terminal rendering.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  🧭 Research Vibe Navigator   [Simulating Dec 2025] [model]     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Input view                      │  Result view                 │
//! │   💡 Idea │ 📝 Abstract          │   summary     │ venue tabs   │
//! │   [text field]                   │   score       │ papers       │
//! │   [x] Apply Fast   Analyze 🔎    │   diagram     │ metrics      │
//! │   loading / error banner         │   roadmap     │              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  status │ shortcuts                                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The analysis call runs on a spawned task and its outcome comes back over a
//! channel. The main loop sleeps until a key, a tick or that outcome arrives,
//! then redraws.

pub mod app;
pub mod diagram;
pub mod event;
pub mod state;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent};
pub use event::{AppAction, EventHandler};
pub use state::{View, ViewState};

use crate::analysis::{AnalysisClient, Analyzer};
use anyhow::Context;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(config: crate::config::Config) -> anyhow::Result<()> {
    info!(model = %config.llm.model, "Starting TUI mode");

    let client = AnalysisClient::new(&config.llm).context("Failed to build analysis client")?;
    let analyzer: Arc<dyn Analyzer> = Arc::new(client);

    let mut terminal = init_terminal()?;

    let mut events = EventHandler::new(config.tui.tick_rate());
    let mut app = App::new(config, analyzer);

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// What woke the main loop
enum Wake {
    Action(Option<AppAction>),
    Analysis(Option<AppEvent>),
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let wake = tokio::select! {
            action = events.next() => Wake::Action(action),
            event = app.next_event() => Wake::Analysis(event),
        };

        match wake {
            Wake::Action(Some(action)) => app.handle_action(action),
            Wake::Analysis(Some(event)) => app.handle_event(event),
            Wake::Action(None) | Wake::Analysis(None) => {
                error!("Event channel closed");
                break;
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("TUI exited normally");
    Ok(())
}
