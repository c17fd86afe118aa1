//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the Gemini `generateContent` endpoint,
//! using its native structured-output support (`responseMimeType` plus
//! `responseSchema`) when the request asks for JSON.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmError, ResponseFormat, TokenUsage};
use crate::config::LlmConfig;

/// Default wait suggested when a 429 carries no `retry-after` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(provider = %config.provider, model = %config.model, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::MissingApiKey(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut generation_config = serde_json::json!({
            "maxOutputTokens": request.max_tokens.min(self.max_tokens),
        });

        if let ResponseFormat::Json { schema, .. } = &request.response_format {
            debug!("build_request_body: adding response schema");
            generation_config["responseMimeType"] = serde_json::json!("application/json");
            generation_config["responseSchema"] = to_gemini_schema(schema);
        }

        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        });

        if !request.system_prompt.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": request.system_prompt }],
            });
        }

        body
    }

    /// Parse the Gemini API response
    fn parse_response(&self, api_response: GeminiResponse) -> Result<CompletionResponse, LlmError> {
        debug!("parse_response: called");
        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count.unwrap_or(0),
                output_tokens: u.candidates_token_count.unwrap_or(0),
            })
            .unwrap_or_default();

        let Some(candidate) = api_response.candidates.unwrap_or_default().into_iter().next() else {
            if let Some(reason) = api_response.prompt_feedback.and_then(|f| f.block_reason) {
                debug!(%reason, "parse_response: prompt blocked");
                return Err(LlmError::InvalidResponse(format!("Prompt blocked by provider: {}", reason)));
            }
            debug!("parse_response: no candidates");
            return Ok(CompletionResponse {
                content: None,
                finish_reason: FinishReason::Stop,
                usage,
            });
        };

        let text: String = candidate
            .content
            .and_then(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text)
            .collect();

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map(FinishReason::from_gemini)
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: if text.is_empty() { None } else { Some(text) },
            finish_reason,
            usage,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();

        if status == 429 {
            debug!("complete: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status,
                message: api_error_message(&text),
            });
        }

        debug!("complete: success");
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        let api_response: GeminiResponse = serde_json::from_str(&text)?;
        self.parse_response(api_response)
    }
}

/// Convert a JSON Schema into the OpenAPI subset Gemini accepts
///
/// Type names are upper-cased and keywords Gemini rejects are dropped.
pub fn to_gemini_schema(schema: &serde_json::Value) -> serde_json::Value {
    match schema {
        serde_json::Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                match key.as_str() {
                    "additionalProperties" | "$schema" => continue,
                    "type" => {
                        let converted = value
                            .as_str()
                            .map(|t| serde_json::Value::String(t.to_uppercase()))
                            .unwrap_or_else(|| value.clone());
                        out.insert(key.clone(), converted);
                    }
                    "properties" => {
                        let props = value
                            .as_object()
                            .map(|p| {
                                p.iter()
                                    .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                    .collect::<serde_json::Map<_, _>>()
                            })
                            .unwrap_or_default();
                        out.insert(key.clone(), serde_json::Value::Object(props));
                    }
                    "items" => {
                        out.insert(key.clone(), to_gemini_schema(value));
                    }
                    _ => {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
            serde_json::Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Pull the human-readable message out of a Google API error body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|e| match e.status {
            Some(status) => format!("{} ({})", e.message, status),
            None => e.message,
        })
        .unwrap_or_else(|| body.to_string())
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(max_tokens: u32) -> GeminiClient {
        GeminiClient {
            model: "gemini-3-flash-preview".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            http: Client::new(),
            max_tokens,
            timeout: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = test_client(8192);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_build_request_body_text() {
        let client = test_client(8192);
        let body = client.build_request_body(&CompletionRequest::text("Hello", 1000));

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
        assert!(body["generationConfig"].get("responseSchema").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_build_request_body_json_schema() {
        let client = test_client(8192);
        let schema = serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["title"],
            "properties": {
                "title": {"type": "string"},
                "steps": {"type": "array", "items": {"type": "string"}}
            }
        });
        let request = CompletionRequest::json("Plan it", "goal_plan", schema, 1000).with_system_prompt("coach");
        let body = client.build_request_body(&request);

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert!(config["responseSchema"].get("additionalProperties").is_none());
        assert_eq!(config["responseSchema"]["properties"]["title"]["type"], "STRING");
        assert_eq!(config["responseSchema"]["properties"]["steps"]["items"]["type"], "STRING");
        assert_eq!(config["responseSchema"]["required"][0], "title");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "coach");
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = test_client(1000);
        let body = client.build_request_body(&CompletionRequest::text("Test", 5000));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn test_parse_response_joins_text_parts() {
        let client = test_client(8192);
        let raw = serde_json::json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"a\":"},
                    {"text": "1}"}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
        });
        let parsed: GeminiResponse = serde_json::from_value(raw).unwrap();
        let response = client.parse_response(parsed).unwrap();

        assert_eq!(response.content.as_deref(), Some("{\"a\":1}"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 5);
    }

    #[test]
    fn test_parse_response_without_text_is_empty() {
        let client = test_client(8192);
        let parsed: GeminiResponse =
            serde_json::from_value(serde_json::json!({"candidates": [{"finishReason": "MAX_TOKENS"}]})).unwrap();
        let response = client.parse_response(parsed).unwrap();
        assert!(response.content.is_none());
        assert_eq!(response.finish_reason, FinishReason::MaxTokens);
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let client = test_client(8192);
        let parsed: GeminiResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        let err = client.parse_response(parsed).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(api_error_message(body), "API key not valid (PERMISSION_DENIED)");
        assert_eq!(api_error_message("plain failure"), "plain failure");
    }
}
