// Google Gemini adapter
// Talks to the native `models/{model}:generateContent` endpoint.
// Documentation: https://ai.google.dev/api/generate-content
//
// Differences from OpenAI-style chat APIs:
// - the system prompt is a top-level `systemInstruction`, not a message
// - roles are "user" / "model"
// - structured output is requested through `generationConfig.responseSchema`

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse, Role, TokenUsage};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

// Request types for the Gemini API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    // Thinking models flag their reasoning parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

// Response types for the Gemini API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GoogleAdapter {
    /// Create an adapter against the public Gemini endpoint
    pub fn new(api_key: &str) -> AppResult<Self> {
        Self::with_options(api_key, None, 120)
    }

    /// Create an adapter with an explicit endpoint and request timeout
    pub fn with_options(api_key: &str, base_url: Option<&str>, timeout_secs: u64) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("Gemini API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or(GEMINI_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn endpoint_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn convert_message(msg: &LLMMessage) -> GeminiContent {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "model",
        };

        GeminiContent {
            role: Some(role.to_string()),
            parts: vec![GeminiPart {
                text: Some(msg.content.clone()),
                thought: None,
            }],
        }
    }

    fn build_request_body(request: &LLMRequest) -> GeminiRequest {
        let system_instruction = request.system_instruction.as_ref().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(text.clone()),
                thought: None,
            }],
        });

        let generation_config = GeminiGenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
            response_mime_type: request.response_mime_type.clone(),
            response_schema: request.response_schema.clone(),
        };

        GeminiRequest {
            contents: request.messages.iter().map(Self::convert_message).collect(),
            system_instruction,
            generation_config: Some(generation_config),
        }
    }

    /// Map a non-success status to an error
    fn map_http_error(status: StatusCode, body_text: &str) -> AppError {
        let detail = match serde_json::from_str::<GeminiErrorResponse>(body_text) {
            Ok(parsed) => match parsed.error.status {
                Some(code) => format!("{} ({})", parsed.error.message, code),
                None => parsed.error.message,
            },
            Err(_) => body_text.to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::Auth(format!("Gemini rejected the API key: {}", detail))
            }
            _ => AppError::LLMApi(format!("Gemini API error ({}): {}", status, detail)),
        }
    }

    fn parse_response(response: GeminiResponse) -> LLMResponse {
        let usage = response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        let candidate = response.candidates.into_iter().next();
        let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());

        let texts: Vec<String> = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|p| !p.thought.unwrap_or(false))
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        let content = if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        };

        LLMResponse {
            content,
            finish_reason,
            model: response.model_version,
            usage,
        }
    }
}

#[async_trait]
impl LLMAdapter for GoogleAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let url = self.endpoint_url(&request.model);
        let body = Self::build_request_body(request);

        debug!(model = %request.model, url = %url, "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "Gemini returned an error status");
            return Err(Self::map_http_error(status, &body_text));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body_text)
            .map_err(|e| AppError::LLMApi(format!("Failed to parse Gemini response: {}", e)))?;

        let parsed = Self::parse_response(gemini_response);
        debug!(
            finish_reason = ?parsed.finish_reason,
            total_tokens = parsed.usage.total_tokens,
            "Gemini response received"
        );

        Ok(parsed)
    }
}

/// Gemini model identifiers
pub mod models {
    /// Fast default for structured analyses
    pub const GEMINI_2_5_FLASH: &str = "gemini-2.5-flash";

    pub const DEFAULT: &str = GEMINI_2_5_FLASH;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_request() -> LLMRequest {
        LLMRequest::new(models::DEFAULT, "Analyze this")
            .with_system_instruction("You are strict.")
            .with_json_schema(json!({"type": "OBJECT"}))
    }

    #[test]
    fn test_endpoint_url() {
        let adapter = GoogleAdapter::with_options("k", Some("http://localhost:1234/"), 5).unwrap();
        assert_eq!(
            adapter.endpoint_url("gemini-2.5-flash"),
            "http://localhost:1234/models/gemini-2.5-flash:generateContent"
        );

        let default = GoogleAdapter::new("k").unwrap();
        assert!(default.endpoint_url("m").starts_with(GEMINI_API_BASE));
    }

    #[test]
    fn test_blank_api_key_rejected() {
        assert!(matches!(GoogleAdapter::new("  "), Err(AppError::Config(_))));
    }

    #[test]
    fn test_build_request_body() {
        let body = serde_json::to_value(GoogleAdapter::build_request_body(&test_request())).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze this");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are strict.");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_assistant_role_maps_to_model() {
        let content = GoogleAdapter::convert_message(&LLMMessage::assistant("earlier answer"));
        assert_eq!(content.role.as_deref(), Some("model"));
    }

    #[test]
    fn test_parse_text_response() {
        let raw: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"isValid\":"}, {"text": " true}"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 25, "candidatesTokenCount": 10, "totalTokenCount": 35},
            "modelVersion": "gemini-2.5-flash"
        }))
        .unwrap();

        let parsed = GoogleAdapter::parse_response(raw);
        assert_eq!(parsed.content.as_deref(), Some("{\"isValid\": true}"));
        assert_eq!(parsed.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(parsed.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(parsed.usage.total_tokens, 35);
    }

    #[test]
    fn test_parse_skips_thought_parts() {
        let raw: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking out loud", "thought": true},
                    {"text": "{}"}
                ]}
            }]
        }))
        .unwrap();

        assert_eq!(GoogleAdapter::parse_response(raw).content.as_deref(), Some("{}"));
    }

    #[test]
    fn test_parse_without_text() {
        let empty: GeminiResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(GoogleAdapter::parse_response(empty).content.is_none());

        let blocked: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        let parsed = GoogleAdapter::parse_response(blocked);
        assert!(parsed.content.is_none());
        assert_eq!(parsed.finish_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_http_error_mapping() {
        let err = GoogleAdapter::map_http_error(
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#,
        );
        assert!(matches!(err, AppError::Auth(ref m) if m.contains("API key not valid")));

        let err = GoogleAdapter::map_http_error(StatusCode::TOO_MANY_REQUESTS, "quota exceeded");
        match err {
            AppError::LLMApi(message) => {
                assert!(message.contains("429"));
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("Expected LLMApi, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_chat_completion_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJson(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [{"text": "{\"isValid\": false}"}]}, "finishReason": "STOP"}]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let adapter = GoogleAdapter::with_options("test-key", Some(&server.url()), 5).unwrap();
        let response = adapter.create_chat_completion(&test_request()).await.unwrap();

        assert_eq!(response.content.as_deref(), Some("{\"isValid\": false}"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_chat_completion_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(500)
            .with_body(r#"{"error":{"code":500,"message":"backend exploded","status":"INTERNAL"}}"#)
            .create_async()
            .await;

        let adapter = GoogleAdapter::with_options("test-key", Some(&server.url()), 5).unwrap();
        let err = adapter.create_chat_completion(&test_request()).await.unwrap_err();

        assert!(matches!(err, AppError::LLMApi(ref m) if m.contains("backend exploded")));
    }
}
