//! View State Machine
//!
//! Owns the top-level UI record: current view, stored result, error banner,
//! busy flag and the last submitted input. It changes only through
//! [`ViewState::begin_submit`], [`ViewState::complete`] and [`ViewState::reset`].

use crate::analysis::{AnalysisError, AnalysisResult};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Banner text for any failed analysis
pub const GENERIC_ERROR: &str = "Analysis failed. Please try again.";

/// Status strings rotated while a request is in flight
pub const LOADING_STEPS: [&str; 6] = [
    "Initializing Vibe Check...",
    "Scanning CVPR/NeurIPS Trends...",
    "Synthesizing Novel Methodology...",
    "Cross-referencing SOTA Papers...",
    "Calculating Success Probability...",
    "Finalizing Visual Roadmap...",
];

/// Loading string for a given time since submit
pub fn loading_step(elapsed: Duration, interval: Duration) -> &'static str {
    let interval_ms = interval.as_millis().max(1);
    let index = (elapsed.as_millis() / interval_ms) as usize % LOADING_STEPS.len();
    LOADING_STEPS[index]
}

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Input,
    Result,
}

#[derive(Debug)]
pub struct ViewState {
    view: View,
    result: Option<AnalysisResult>,
    error: Option<String>,
    loading_since: Option<Instant>,
    loading_interval: Duration,
    last_input: Option<String>,
    analyzed_at: Option<DateTime<Utc>>,
}

impl ViewState {
    pub fn new(loading_interval: Duration) -> Self {
        Self {
            view: View::Input,
            result: None,
            error: None,
            loading_since: None,
            loading_interval,
            last_input: None,
            analyzed_at: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.loading_since.is_some()
    }

    /// Input of the most recent submission, echoed on the result screens
    pub fn last_input(&self) -> Option<&str> {
        self.last_input.as_deref()
    }

    pub fn analyzed_at(&self) -> Option<DateTime<Utc>> {
        self.analyzed_at
    }

    /// Current loading string, `None` when idle
    pub fn loading_text(&self) -> Option<&'static str> {
        self.loading_since
            .map(|since| loading_step(since.elapsed(), self.loading_interval))
    }

    /// Marks a request as in flight. Returns `false`, changing nothing, when
    /// one is already pending or the input is blank.
    pub fn begin_submit(&mut self, input: &str) -> bool {
        if self.is_busy() {
            debug!("Submit ignored: analysis already in flight");
            return false;
        }
        if input.trim().is_empty() {
            return false;
        }

        self.loading_since = Some(Instant::now());
        self.error = None;
        self.last_input = Some(input.to_string());
        true
    }

    /// Applies the outcome of the pending request
    pub fn complete(&mut self, outcome: Result<AnalysisResult, AnalysisError>) {
        let Some(started) = self.loading_since.take() else {
            debug!("Dropping completion with no pending request");
            return;
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                info!(elapsed_ms, valid = result.is_valid(), "Analysis finished");
                self.result = Some(result);
                self.error = None;
                self.analyzed_at = Some(Utc::now());
                self.view = View::Result;
            }
            Err(e) => {
                error!(elapsed_ms, error = %e, "Analysis failed");
                self.result = None;
                self.error = Some(GENERIC_ERROR.to_string());
                self.view = View::Input;
            }
        }
    }

    /// Returns to a clean input screen. Refused while a request is pending.
    pub fn reset(&mut self) -> bool {
        if self.is_busy() {
            debug!("Reset ignored: analysis in flight");
            return false;
        }
        self.view = View::Input;
        self.result = None;
        self.error = None;
        self.analyzed_at = None;
        true
    }
}
