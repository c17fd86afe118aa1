//! Domain types for GoalPlan
//!
//! Core domain types: GoalInput (what the user asks for) and GoalPlan (what
//! the provider returns). Category, difficulty and resource type are closed
//! enumerations so the form can list their options without reflection.

mod input;
mod plan;

pub use input::{DifficultyLevel, GoalCategory, GoalInput, InputProblem, ParseOptionError};
pub use plan::{GoalPlan, Milestone, Obstacle, Resource, ResourceType};
