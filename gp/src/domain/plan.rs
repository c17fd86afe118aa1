//! GoalPlan domain type
//!
//! The structured roadmap returned by the provider. Field names follow the
//! wire format the provider is asked to produce, so a conforming document
//! deserializes into these types without any renaming on the caller's side.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of learning resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Video,
    Article,
    Book,
    Course,
    Tool,
}

impl ResourceType {
    pub const ALL: &'static [ResourceType] = &[
        ResourceType::Video,
        ResourceType::Article,
        ResourceType::Book,
        ResourceType::Course,
        ResourceType::Tool,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Article => "Article",
            Self::Book => "Book",
            Self::Course => "Course",
            Self::Tool => "Tool",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One ordered step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub description: String,
    /// Free text such as "Week 1-2"
    pub timeframe: String,
}

/// A recommended resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub description: String,
    pub estimated_cost: String,
}

/// A likely hurdle and how to get past it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub obstacle: String,
    pub solution: String,
}

/// A complete goal plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub title: String,
    pub summary: String,
    pub difficulty: String,
    pub is_timeframe_realistic: bool,
    /// Only meaningful when `is_timeframe_realistic` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe_warning: Option<String>,
    pub milestones: Vec<Milestone>,
    pub resources: Vec<Resource>,
    pub daily_habits: Vec<String>,
    pub weekly_checklist: Vec<String>,
    pub common_obstacles: Vec<Obstacle>,
}

impl GoalPlan {
    /// Status label shown next to the title
    pub fn status_label(&self) -> &'static str {
        if self.is_timeframe_realistic { "Realistic" } else { "Intensive" }
    }

    /// The warning to surface, if the plan was judged unrealistic and the
    /// provider explained why
    pub fn active_warning(&self) -> Option<&str> {
        debug!(realistic = %self.is_timeframe_realistic, "GoalPlan::active_warning: called");
        if self.is_timeframe_realistic {
            return None;
        }
        self.timeframe_warning
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }

    /// The first milestone, which the clipboard summary calls the next step
    pub fn next_step(&self) -> Option<&Milestone> {
        self.milestones.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "title": "Marathon Ready",
            "summary": "Build up mileage safely.",
            "difficulty": "Beginner",
            "isTimeframeRealistic": false,
            "timeframeWarning": "One week is not enough to train for 42km.",
            "milestones": [
                {"title": "Base walk/run", "description": "Alternate walking and jogging.", "timeframe": "Day 1-3"}
            ],
            "resources": [
                {
                    "name": "Couch to 5K",
                    "type": "Tool",
                    "description": "Beginner running app.",
                    "estimated_cost": "Free"
                }
            ],
            "dailyHabits": ["Stretch for 10 minutes"],
            "weeklyChecklist": ["Log total distance"],
            "commonObstacles": [{"obstacle": "Shin splints", "solution": "Rest and ice."}]
        })
    }

    #[test]
    fn test_deserialize_wire_names() {
        let plan: GoalPlan = serde_json::from_value(sample_json()).unwrap();
        assert!(!plan.is_timeframe_realistic);
        assert_eq!(plan.resources[0].kind, ResourceType::Tool);
        assert_eq!(plan.resources[0].estimated_cost, "Free");
        assert_eq!(plan.daily_habits, vec!["Stretch for 10 minutes"]);
    }

    #[test]
    fn test_serialize_round_trips_to_same_document() {
        let original = sample_json();
        let plan: GoalPlan = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&plan).unwrap(), original);
    }

    #[test]
    fn test_missing_warning_is_not_fabricated() {
        let mut doc = sample_json();
        doc["isTimeframeRealistic"] = serde_json::json!(true);
        doc.as_object_mut().unwrap().remove("timeframeWarning");

        let plan: GoalPlan = serde_json::from_value(doc.clone()).unwrap();
        assert!(plan.timeframe_warning.is_none());
        assert_eq!(serde_json::to_value(&plan).unwrap(), doc);
    }

    #[test]
    fn test_active_warning() {
        let mut plan: GoalPlan = serde_json::from_value(sample_json()).unwrap();
        assert!(plan.active_warning().is_some());

        plan.timeframe_warning = Some("  ".to_string());
        assert!(plan.active_warning().is_none());

        plan.timeframe_warning = Some("too short".to_string());
        plan.is_timeframe_realistic = true;
        assert!(plan.active_warning().is_none());
    }

    #[test]
    fn test_status_label() {
        let mut plan: GoalPlan = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(plan.status_label(), "Intensive");
        plan.is_timeframe_realistic = true;
        assert_eq!(plan.status_label(), "Realistic");
    }
}
