// Analysis client: one structured generation call per submission

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::model::{AnalysisRequest, AnalysisResult, WireAnalysis};
use super::prompt;
use super::schema::{self, ContractValidator, SchemaViolation};
use crate::config::LLMConfig;
use crate::llm::{LLMProviderConfig, LLM};
use crate::types::{AppError, AppResult, LLMRequest};

/// Everything that can go wrong between submit and a typed result
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Transport(#[from] AppError),

    #[error("model returned no content (finish reason: {})", .finish_reason.as_deref().unwrap_or("unknown"))]
    EmptyResponse { finish_reason: Option<String> },

    #[error("model returned malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error(transparent)]
    Contract(#[from] SchemaViolation),

    #[error("payload could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Seam between the view and the backend
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

pub struct AnalysisClient {
    llm: LLM,
    model: String,
    validator: ContractValidator,
    response_schema: Value,
}

impl AnalysisClient {
    pub fn new(config: &LLMConfig) -> AppResult<Self> {
        let llm = LLM::new(LLMProviderConfig::from(config))?;
        info!(provider = %llm.provider(), model = %config.model, "Analysis client ready");
        Self::with_llm(llm, &config.model)
    }

    /// Build on top of an existing LLM handle
    pub fn with_llm(llm: LLM, model: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            llm,
            model: model.into(),
            validator: ContractValidator::new()?,
            response_schema: schema::response_schema(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(&self, request: &AnalysisRequest) -> LLMRequest {
        let composed = prompt::compose(request);
        LLMRequest::new(&self.model, composed.user_prompt)
            .with_system_instruction(composed.system_instruction)
            .with_json_schema(self.response_schema.clone())
    }

    /// Parse, validate, and normalize a raw text payload
    pub fn parse_payload(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let value: Value =
            serde_json::from_str(strip_code_fence(text)).map_err(AnalysisError::MalformedJson)?;
        self.validator.validate(&value)?;
        let wire: WireAnalysis = serde_json::from_value(value).map_err(AnalysisError::Decode)?;
        Ok(wire.into())
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let request_id = uuid::Uuid::new_v4();
        info!(
            %request_id,
            mode = %request.mode(),
            fast_track = request.fast_track(),
            model = %self.model,
            "Submitting analysis"
        );

        let llm_request = self.build_request(request);
        let response = self.llm.create_chat_completion(&llm_request).await?;

        let text = match response.content {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn!(%request_id, finish_reason = ?response.finish_reason, "Empty model response");
                return Err(AnalysisError::EmptyResponse {
                    finish_reason: response.finish_reason,
                });
            }
        };

        debug!(
            %request_id,
            bytes = text.len(),
            total_tokens = response.usage.total_tokens,
            "Received analysis payload"
        );

        let result = self.parse_payload(&text)?;
        info!(%request_id, valid = result.is_valid(), "Analysis complete");
        Ok(result)
    }
}

// Some models wrap JSON in a markdown fence even in JSON mode
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::AnalysisMode;
    use crate::llm::LLMAdapter;
    use crate::types::{LLMProvider, LLMResponse, TokenUsage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct ScriptedAdapter {
        reply: Mutex<Option<AppResult<LLMResponse>>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<LLMRequest>>,
    }

    impl ScriptedAdapter {
        fn replying(reply: AppResult<LLMResponse>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn text(content: Option<&str>) -> Arc<Self> {
            Self::replying(Ok(LLMResponse {
                content: content.map(str::to_string),
                finish_reason: Some("STOP".to_string()),
                model: None,
                usage: TokenUsage::default(),
            }))
        }
    }

    #[async_trait]
    impl LLMAdapter for ScriptedAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(AppError::Internal("no scripted reply".to_string())))
        }
    }

    fn client(adapter: Arc<ScriptedAdapter>) -> AnalysisClient {
        let llm = LLM::from_adapter(LLMProvider::Google, adapter);
        AnalysisClient::with_llm(llm, "gemini-2.5-flash").unwrap()
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("Efficient LLM Inference", AnalysisMode::Idea, false).unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_single_call() {
        let adapter = ScriptedAdapter::text(Some(
            r#"{"isValid": true, "trendMatchScore": 72, "keywords": ["LLM", "Inference"], "oneLiner": "Faster decoding."}"#,
        ));
        let client = client(adapter.clone());

        let result = client.analyze(&request()).await.unwrap();
        let analysis = result.as_valid().unwrap();
        assert_eq!(analysis.trend_match_score, Some(72));
        assert_eq!(analysis.keywords, vec!["LLM", "Inference"]);
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);

        let seen = adapter.seen.lock().unwrap();
        assert_eq!(seen[0].model, "gemini-2.5-flash");
        assert_eq!(seen[0].response_mime_type.as_deref(), Some("application/json"));
        assert_eq!(seen[0].response_schema.as_ref().unwrap()["type"], "OBJECT");
        assert!(seen[0].system_instruction.as_deref().unwrap().contains("Research Vibe Navigator"));
    }

    #[tokio::test]
    async fn test_invalid_verdict_is_not_an_error() {
        let adapter = ScriptedAdapter::text(Some(
            r#"{"isValid": false, "validationFeedback": "Input is not a coherent research abstract."}"#,
        ));
        let result = client(adapter).analyze(&request()).await.unwrap();
        assert_eq!(
            result,
            AnalysisResult::Invalid {
                feedback: Some("Input is not a coherent research abstract.".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_empty_content_is_reported() {
        for content in [None, Some(""), Some("   \n")] {
            let adapter = ScriptedAdapter::text(content);
            let err = client(adapter).analyze(&request()).await.unwrap_err();
            assert!(matches!(err, AnalysisError::EmptyResponse { .. }), "{:?}", content);
        }
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let adapter = ScriptedAdapter::text(Some("{\"isValid\": tru"));
        let err = client(adapter).analyze(&request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedJson(_)));
    }

    #[tokio::test]
    async fn test_contract_violation() {
        let adapter = ScriptedAdapter::text(Some(r#"{"isValid": true, "trendMatchScore": 140}"#));
        let err = client(adapter).analyze(&request()).await.unwrap_err();
        match err {
            AnalysisError::Contract(violation) => {
                assert!(violation.issues.iter().any(|i| i.starts_with("/trendMatchScore")));
            }
            other => panic!("expected contract violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_integral_float_score_fails_decoding() {
        let payload = r#"{"isValid": true, "trendMatchScore": 72.0}"#;
        let client = client(ScriptedAdapter::text(Some(payload)));

        // Passes the integer check in the contract
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert!(client.validator.validate(&value).is_ok());

        let err = client.analyze(&request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let adapter = ScriptedAdapter::replying(Err(AppError::LLMApi("HTTP 503".to_string())));
        let err = client(adapter.clone()).analyze(&request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(AppError::LLMApi(_))));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_payload_accepts_fenced_json() {
        let client = client(ScriptedAdapter::text(None));
        let result = client
            .parse_payload("```json\n{\"isValid\": true}\n```")
            .unwrap();
        assert!(result.is_valid());
    }
}
