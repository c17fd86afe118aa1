//! LLM Client module for GoalPlan
//!
//! Provides the provider-agnostic client trait and the Gemini and OpenAI
//! implementations.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::{GeminiClient, to_gemini_schema};
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, FinishReason, ResponseFormat, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Builds a fresh client on every call; callers own the client for the
/// lifetime of one request. Supports "gemini" and "openai" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}
