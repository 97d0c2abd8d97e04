//! TUI Widgets
//!
//! Custom widgets for the Research Vibe Navigator TUI.

mod conferences;
mod metrics;
mod progress;
mod revision;
mod roadmap;
mod summary;

pub use conferences::render_conferences;
pub use metrics::{metrics_height, render_metrics};
pub use progress::render_loading;
pub use revision::{render_revision, DEFAULT_REVISION};
pub use summary::{render_summary, SummaryContext};
