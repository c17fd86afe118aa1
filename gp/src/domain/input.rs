//! GoalInput domain type
//!
//! The value a single form submission produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error returned when an option label does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: '{value}'. Use one of: {options}")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub options: String,
}

/// Goal category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    Education,
    Skills,
    Fitness,
    Creative,
    Projects,
    #[serde(rename = "Other Structured Goals")]
    Other,
}

impl GoalCategory {
    /// Every category, in the order the form offers them
    pub const ALL: &'static [GoalCategory] = &[
        GoalCategory::Education,
        GoalCategory::Skills,
        GoalCategory::Fitness,
        GoalCategory::Creative,
        GoalCategory::Projects,
        GoalCategory::Other,
    ];

    /// Human-readable label, also used in the prompt
    pub fn label(&self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Skills => "Skills",
            Self::Fitness => "Fitness",
            Self::Creative => "Creative",
            Self::Projects => "Projects",
            Self::Other => "Other Structured Goals",
        }
    }
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for GoalCategory {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "GoalCategory::from_str: called");
        let wanted = s.trim().to_lowercase();
        if wanted == "other" {
            return Ok(Self::Other);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| ParseOptionError {
                kind: "category",
                value: s.to_string(),
                options: option_list(Self::ALL.iter().map(|c| c.label())),
            })
    }
}

/// Current skill level of the person pursuing the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Every level, in the order the form offers them
    pub const ALL: &'static [DifficultyLevel] = &[
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "DifficultyLevel::from_str: called");
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.label().to_lowercase() == wanted)
            .ok_or_else(|| ParseOptionError {
                kind: "difficulty",
                value: s.to_string(),
                options: option_list(Self::ALL.iter().map(|d| d.label())),
            })
    }
}

fn option_list<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

/// A problem with a GoalInput that the form must reject before submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputProblem {
    #[error("Please describe your goal")]
    EmptyTopic,

    #[error("Due date {due} is before today ({today})")]
    DueDateInPast { due: NaiveDate, today: NaiveDate },
}

/// A goal as submitted by the user
///
/// Immutable once built; the adapter consumes it exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub topic: String,
    pub category: GoalCategory,
    pub difficulty: DifficultyLevel,
    pub due_date: NaiveDate,
}

impl GoalInput {
    /// Create a new input, trimming the topic
    pub fn new(
        topic: impl Into<String>,
        category: GoalCategory,
        difficulty: DifficultyLevel,
        due_date: NaiveDate,
    ) -> Self {
        let topic = topic.into().trim().to_string();
        debug!(%topic, %category, %difficulty, %due_date, "GoalInput::new: called");
        Self {
            topic,
            category,
            difficulty,
            due_date,
        }
    }

    /// Check the constraints the form enforces: a non-empty topic and a due
    /// date no earlier than `today`
    pub fn check(&self, today: NaiveDate) -> Result<(), InputProblem> {
        debug!(%today, "GoalInput::check: called");
        if self.topic.trim().is_empty() {
            return Err(InputProblem::EmptyTopic);
        }
        if self.due_date < today {
            return Err(InputProblem::DueDateInPast {
                due: self.due_date,
                today,
            });
        }
        Ok(())
    }
}
