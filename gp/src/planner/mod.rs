//! Plan request adapter
//!
//! Builds the plan prompt and response schema, makes the single provider
//! call and turns the answer into a validated `GoalPlan`.

mod adapter;
mod clock;
mod error;
pub mod schema;

pub use adapter::{DEFAULT_MAX_TOKENS, PlanAdapter, parse_plan};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{FailureKind, PlanError, USER_MESSAGE};
pub use schema::{SchemaViolation, goal_plan_schema};
