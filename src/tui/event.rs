//! Event Handling
//!
//! Maps keyboard, paste and timer events to application actions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit without confirmation
    ForceQuit,
    /// Enter: submit on the input screen, expand a paper on the result screen
    Submit,
    /// Toggle help view
    ToggleHelp,
    /// Escape - close help
    Escape,
    /// Toggle fast track (Ctrl+F)
    ToggleFastTrack,
    /// Show or hide the prompt summary (Ctrl+P)
    TogglePrompt,
    /// Start over (Ctrl+R)
    Reset,
    /// Scroll up one line
    ScrollUp,
    /// Scroll down one line
    ScrollDown,
    /// Scroll up one page
    ScrollPageUp,
    /// Scroll down one page
    ScrollPageDown,
    /// Previous item (Left)
    Prev,
    /// Next item (Right)
    Next,
    /// Next tab (Tab)
    NextTab,
    /// Previous tab (Shift+Tab)
    PrevTab,
    /// Pasted text
    Paste(String),
    /// Regular input character
    Input(KeyEvent),
    /// Timer tick for animations
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = Self::map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }

    /// Map a crossterm event to an app action
    fn map_event(event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::map_key_event(key),
            Event::Paste(text) => Some(AppAction::Paste(text)),
            _ => None,
        }
    }

    /// Map a key event to an app action
    pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
        match (key.modifiers, key.code) {
            // Quit shortcuts
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),

            (KeyModifiers::CONTROL, KeyCode::Char('f')) => Some(AppAction::ToggleFastTrack),
            (KeyModifiers::CONTROL, KeyCode::Char('p')) => Some(AppAction::TogglePrompt),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(AppAction::Reset),
            (KeyModifiers::CONTROL, KeyCode::Char('h')) => Some(AppAction::ToggleHelp),

            (KeyModifiers::SHIFT, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::BackTab) => {
                Some(AppAction::PrevTab)
            }

            // Alt+Enter inserts a newline in the input field
            (KeyModifiers::ALT, KeyCode::Enter) => Some(AppAction::Input(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::NONE,
            ))),

            (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => Some(AppAction::Escape),
                KeyCode::Enter => Some(AppAction::Submit),
                KeyCode::F(1) => Some(AppAction::ToggleHelp),

                KeyCode::Up => Some(AppAction::ScrollUp),
                KeyCode::Down => Some(AppAction::ScrollDown),
                KeyCode::PageUp => Some(AppAction::ScrollPageUp),
                KeyCode::PageDown => Some(AppAction::ScrollPageDown),
                KeyCode::Left => Some(AppAction::Prev),
                KeyCode::Right => Some(AppAction::Next),

                KeyCode::Tab => Some(AppAction::NextTab),

                _ => Some(AppAction::Input(key)),
            },

            _ => Some(AppAction::Input(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Option<AppAction> {
        EventHandler::map_key_event(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(key(KeyModifiers::CONTROL, KeyCode::Char('c')), Some(AppAction::ForceQuit));
        assert_eq!(key(KeyModifiers::CONTROL, KeyCode::Char('f')), Some(AppAction::ToggleFastTrack));
        assert_eq!(key(KeyModifiers::CONTROL, KeyCode::Char('r')), Some(AppAction::Reset));
        assert_eq!(key(KeyModifiers::NONE, KeyCode::Enter), Some(AppAction::Submit));
        assert_eq!(key(KeyModifiers::SHIFT, KeyCode::BackTab), Some(AppAction::PrevTab));
        assert_eq!(key(KeyModifiers::NONE, KeyCode::F(1)), Some(AppAction::ToggleHelp));
    }

    #[test]
    fn test_text_passes_through() {
        let action = key(KeyModifiers::SHIFT, KeyCode::Char('A'));
        assert!(matches!(action, Some(AppAction::Input(k)) if k.code == KeyCode::Char('A')));

        let newline = key(KeyModifiers::ALT, KeyCode::Enter);
        assert!(matches!(newline, Some(AppAction::Input(k)) if k.code == KeyCode::Enter));
    }

    #[test]
    fn test_paste_event() {
        let action = EventHandler::map_event(Event::Paste("multi\nline".to_string()));
        assert_eq!(action, Some(AppAction::Paste("multi\nline".to_string())));
    }
}
