//! Plan Request Adapter
//!
//! Turns a `GoalInput` into exactly one provider request and the provider's
//! answer into a validated `GoalPlan`.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info};

use super::clock::{Clock, SystemClock};
use super::error::PlanError;
use super::schema::{self, SCHEMA_NAME};
use crate::domain::{GoalInput, GoalPlan};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::PromptLoader;

/// Default response budget for a plan
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Builds plan requests and interprets plan responses
pub struct PlanAdapter {
    llm: Arc<dyn LlmClient>,
    clock: Arc<dyn Clock>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl PlanAdapter {
    /// Create an adapter using the system clock and embedded prompts
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        debug!("PlanAdapter::new: called");
        Self {
            llm,
            clock: Arc::new(SystemClock),
            prompts: PromptLoader::embedded_only(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptLoader) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Today's date according to the adapter's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Build the request that `generate_plan` would send for `input` today
    pub fn build_request(&self, input: &GoalInput) -> Result<CompletionRequest, PlanError> {
        let today = self.clock.today();
        debug!(%today, topic = %input.topic, "PlanAdapter::build_request: called");

        let prompt = self
            .prompts
            .plan_prompt(input, today)
            .map_err(|e| PlanError::Prompt(e.to_string()))?;
        let system_prompt = self.prompts.system_prompt().map_err(|e| PlanError::Prompt(e.to_string()))?;

        Ok(
            CompletionRequest::json(prompt, SCHEMA_NAME, schema::goal_plan_schema(), self.max_tokens)
                .with_system_prompt(system_prompt),
        )
    }

    /// Generate a plan for `input`
    ///
    /// Makes exactly one provider call. Any failure is logged once with its
    /// kind and returned; no partial plan is ever produced.
    pub async fn generate_plan(&self, input: &GoalInput) -> Result<GoalPlan, PlanError> {
        info!(
            topic = %input.topic,
            category = %input.category,
            difficulty = %input.difficulty,
            due = %input.due_date,
            "generate_plan: requesting plan"
        );

        let result = self.request_plan(input).await;

        match &result {
            Ok(plan) => info!(
                title = %plan.title,
                milestones = plan.milestones.len(),
                realistic = plan.is_timeframe_realistic,
                "generate_plan: plan received"
            ),
            Err(e) => error!(kind = %e.kind(), error = %e, "generate_plan: plan generation failed"),
        }

        result
    }

    async fn request_plan(&self, input: &GoalInput) -> Result<GoalPlan, PlanError> {
        let request = self.build_request(input)?;
        let response = self.llm.complete(request).await?;
        debug!(
            finish_reason = ?response.finish_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "request_plan: provider responded"
        );
        parse_plan(response.content.as_deref())
    }
}

/// Interpret the provider's raw text as a plan
///
/// Missing or blank text is `EmptyResponse`. The text must be one JSON
/// document that satisfies the plan schema; the document's values are then
/// taken verbatim.
pub fn parse_plan(text: Option<&str>) -> Result<GoalPlan, PlanError> {
    debug!(text_len = text.map(str::len), "parse_plan: called");
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(PlanError::EmptyResponse),
    };

    let value: serde_json::Value = serde_json::from_str(text).map_err(PlanError::MalformedJson)?;
    schema::validate(&schema::goal_plan_schema(), &value)?;

    // The schema check above covers every field GoalPlan requires, so a
    // failure here means the schema and the type have drifted apart.
    serde_json::from_value(value).map_err(PlanError::MalformedJson)
}
