use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider
pub struct LLMProviderConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl From<&LLMConfig> for LLMProviderConfig {
    fn from(config: &LLMConfig) -> Self {
        Self {
            provider: config.provider,
            api_key: config.api_key.clone(),
            base_url: Some(config.base_url.clone()),
            timeout_secs: config.request_timeout_secs,
        }
    }
}

#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider: LLMProvider,
}

impl LLM {
    pub fn new(config: LLMProviderConfig) -> AppResult<Self> {
        let adapter: Arc<dyn LLMAdapter> = match config.provider {
            LLMProvider::Google => Arc::new(crate::llm::google::GoogleAdapter::with_options(
                &config.api_key,
                config.base_url.as_deref(),
                config.timeout_secs,
            )?),
        };

        Ok(Self {
            adapter,
            provider: config.provider,
        })
    }

    /// Wrap an existing adapter (used to plug in alternative transports)
    pub fn from_adapter(provider: LLMProvider, adapter: Arc<dyn LLMAdapter>) -> Self {
        Self { adapter, provider }
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
