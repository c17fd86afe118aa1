//! LLM request/response types for GoalPlan
//!
//! Provider-agnostic: each client translates these into its own wire format.

use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction, sent separately when the provider supports it
    pub system_prompt: String,

    /// The single user prompt
    pub prompt: String,

    /// Shape the provider must answer in
    pub response_format: ResponseFormat,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Plain text request with no system prompt
    pub fn text(prompt: impl Into<String>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "CompletionRequest::text: called");
        Self {
            system_prompt: String::new(),
            prompt: prompt.into(),
            response_format: ResponseFormat::Text,
            max_tokens,
        }
    }

    /// Request that the provider answer with one JSON document matching `schema`
    pub fn json(
        prompt: impl Into<String>,
        name: impl Into<String>,
        schema: serde_json::Value,
        max_tokens: u32,
    ) -> Self {
        let name = name.into();
        debug!(%name, %max_tokens, "CompletionRequest::json: called");
        Self {
            system_prompt: String::new(),
            prompt: prompt.into(),
            response_format: ResponseFormat::Json { name, schema },
            max_tokens,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }
}

/// Response-format directive sent with the request
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free-form text
    Text,
    /// Exactly one JSON document conforming to `schema`
    Json { name: String, schema: serde_json::Value },
}

/// Response from a completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub finish_reason: FinishReason,

    /// Token usage reported by the provider
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// A finished response carrying `text`
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            finish_reason: FinishReason::Stop,
            usage: TokenUsage::default(),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FinishReason {
    #[default]
    Stop,
    MaxTokens,
    Safety,
    Other(String),
}

impl FinishReason {
    /// Parse from Gemini's `finishReason`
    pub fn from_gemini(s: &str) -> Self {
        debug!(%s, "FinishReason::from_gemini: called");
        match s {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => FinishReason::Safety,
            other => FinishReason::Other(other.to_string()),
        }
    }

    /// Parse from OpenAI's `finish_reason`
    pub fn from_openai(s: &str) -> Self {
        debug!(%s, "FinishReason::from_openai: called");
        match s {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::MaxTokens,
            "content_filter" => FinishReason::Safety,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Token usage for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
