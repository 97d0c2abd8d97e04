//! Theme and Styling
//!
//! Defines colors and styles for the TUI interface.

use crate::analysis::ScoreBand;
use ratatui::style::{Color, Modifier, Style};

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (indigo)
    pub const ACCENT: Color = Color::Rgb(99, 102, 241);

    /// Fast track highlight (rose)
    pub const FAST_TRACK: Color = Color::Rgb(244, 63, 94);

    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    /// Cold scores
    pub const COOL: Color = Color::Rgb(56, 189, 248);

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);

    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);

    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    // === Border Colors ===

    pub const BORDER: Color = Color::Rgb(51, 51, 51);

    pub const BORDER_FOCUSED: Color = Color::Rgb(129, 140, 248);

    // === Styles ===

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Echoed user input
    pub fn quote() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn error_banner() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Shortcut description style
    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Active/in-progress indicator
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    pub fn keyword() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn link() -> Style {
        Style::default()
            .fg(Self::COOL)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn fast_track(enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(Self::FAST_TRACK)
                .add_modifier(Modifier::BOLD)
        } else {
            Self::text_secondary()
        }
    }

    /// Trend score colored by band
    pub fn score(band: ScoreBand) -> Style {
        let color = match band {
            ScoreBand::Hot => Self::FAST_TRACK,
            ScoreBand::Balanced => Self::WARNING,
            ScoreBand::Cold => Self::COOL,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Badge style for primary/default
    pub fn badge_primary() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn badge_muted() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::BORDER)
    }
}

pub struct Icons;

impl Icons {
    pub const ACTIVE: &'static str = "●";
    pub const SELECTED: &'static str = "▶";
    pub const EXPANDED: &'static str = "▾";
    pub const COLLAPSED: &'static str = "▸";
    pub const DOT: &'static str = "•";
    pub const TOGGLE_ON: &'static str = "[x]";
    pub const TOGGLE_OFF: &'static str = "[ ]";
    pub const SPINNER: [&'static str; 4] = ["◐", "◓", "◑", "◒"];
}
