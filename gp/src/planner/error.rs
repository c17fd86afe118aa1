//! Plan generation errors
//!
//! Every variant collapses to the same user-facing message, while `kind()`
//! and `Display` keep the cause visible to logs and tests.

use thiserror::Error;

use super::schema::SchemaViolation;
use crate::llm::LlmError;

/// The single message shown to the user for any plan generation failure
pub const USER_MESSAGE: &str = "Failed to generate your plan. This might be due to a complex request or API limit. \
                                Please try again with a simpler aim.";

/// Why plan generation failed
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Provider response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Provider response does not match the plan schema {0}")]
    SchemaMismatch(#[from] SchemaViolation),

    #[error("Provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("Failed to build plan prompt: {0}")]
    Prompt(String),
}

/// Coarse classification used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    EmptyResponse,
    MalformedJson,
    SchemaMismatch,
    /// Provider unreachable or timed out
    Transport,
    /// Rate limit or exhausted quota
    Quota,
    /// Missing or rejected credential
    Credential,
    /// Any other provider-side failure
    Provider,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::EmptyResponse => "empty-response",
            Self::MalformedJson => "malformed-json",
            Self::SchemaMismatch => "schema-mismatch",
            Self::Transport => "transport",
            Self::Quota => "quota",
            Self::Credential => "credential",
            Self::Provider => "provider",
        };
        write!(f, "{}", name)
    }
}

impl PlanError {
    /// Classify the failure
    pub fn kind(&self) -> FailureKind {
        match self {
            PlanError::EmptyResponse => FailureKind::EmptyResponse,
            PlanError::MalformedJson(_) => FailureKind::MalformedJson,
            PlanError::SchemaMismatch(_) => FailureKind::SchemaMismatch,
            PlanError::Prompt(_) => FailureKind::Provider,
            PlanError::Provider(e) => classify_llm_error(e),
        }
    }

    /// The uniform message shown to the user regardless of cause
    pub fn user_message(&self) -> &'static str {
        USER_MESSAGE
    }
}

fn classify_llm_error(e: &LlmError) -> FailureKind {
    if e.is_transport() {
        return FailureKind::Transport;
    }
    if e.is_rate_limit() {
        return FailureKind::Quota;
    }
    match (e, e.status()) {
        (LlmError::MissingApiKey(_), _) | (_, Some(401)) => FailureKind::Credential,
        (LlmError::ApiError { message, .. }, Some(403)) => {
            let lowered = message.to_lowercase();
            if lowered.contains("quota") || lowered.contains("exhausted") {
                FailureKind::Quota
            } else {
                FailureKind::Credential
            }
        }
        _ => FailureKind::Provider,
    }
}
