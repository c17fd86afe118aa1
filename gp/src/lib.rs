//! GoalPlan - structured action plans for personal goals
//!
//! A goal (topic, category, current level, due date) goes to a language
//! model provider together with a JSON schema. The answer comes back as a
//! validated [`GoalPlan`]: milestones, resources, habits, a weekly checklist
//! and common obstacles, plus the model's judgment of whether the deadline
//! is realistic.
//!
//! # Modules
//!
//! - [`domain`] - Goal input and plan types
//! - [`planner`] - Prompt, schema and the single provider call
//! - [`llm`] - Provider client trait with Gemini and OpenAI implementations
//! - [`prompts`] - Handlebars prompt templates
//! - [`session`] - Single-flight plan session
//! - [`form`], [`render`], [`export`], [`interactive`] - Terminal front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod form;
pub mod interactive;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod render;
pub mod session;

pub use config::{Config, LlmConfig};
pub use domain::{DifficultyLevel, GoalCategory, GoalInput, GoalPlan, Milestone, Obstacle, Resource, ResourceType};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use planner::{FailureKind, PlanAdapter, PlanError};
pub use render::{RenderMode, render_error, render_plan};
pub use session::{PlanSession, SessionError};
