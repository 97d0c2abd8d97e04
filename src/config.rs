use anyhow::{bail, Result};
use std::env;
use std::time::Duration;

use crate::types::LLMProvider;

/// Default Gemini model used for analyses
pub const DEFAULT_MODEL: &str = crate::llm::google::models::DEFAULT;
/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LLMConfig,
    pub tui: TuiConfig,
}

#[derive(Clone)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

// Keeps the key out of logs
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("api_key", &mask_key(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TuiConfig {
    pub tick_rate_ms: u64,
    pub loading_step_ms: u64,
}

impl TuiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn loading_step(&self) -> Duration {
        Duration::from_millis(self.loading_step_ms)
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            loading_step_ms: 2500,
        }
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// The only variable read is the API credential: `GEMINI_API_KEY`,
    /// falling back to `API_KEY`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .unwrap_or_default();

        if api_key.trim().is_empty() {
            bail!("GEMINI_API_KEY (or API_KEY) must be set");
        }

        Ok(Self::with_api_key(api_key))
    }

    /// Build a configuration with defaults around an explicit key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            llm: LLMConfig {
                provider: LLMProvider::Google,
                api_key: api_key.into(),
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                request_timeout_secs: 120,
            },
            tui: TuiConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.llm.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.llm.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

fn mask_key(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("••••{}", tail)
}
