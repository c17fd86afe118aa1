//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults, then renders them with Handlebars.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::GoalInput;

/// Context for rendering the plan prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanPromptContext {
    pub topic: String,
    pub category: String,
    pub difficulty: String,
    /// Due date, ISO `YYYY-MM-DD`
    pub target_date: String,
    /// Date the request is made, ISO `YYYY-MM-DD`
    pub current_date: String,
}

impl PlanPromptContext {
    /// Build the context for `input` as of `today`
    pub fn new(input: &GoalInput, today: NaiveDate) -> Self {
        debug!(%today, "PlanPromptContext::new: called");
        Self {
            topic: input.topic.clone(),
            category: input.category.label().to_string(),
            difficulty: input.difficulty.label().to_string(),
            target_date: input.due_date.format("%Y-%m-%d").to_string(),
            current_date: today.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory holding `{name}.pmt` files
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `override_dir` before the embedded templates
    pub fn new(override_dir: Option<impl AsRef<Path>>) -> Self {
        let override_dir = override_dir.map(|d| d.as_ref().to_path_buf());
        debug!(?override_dir, "PromptLoader::new: called");

        let override_dir = match override_dir {
            Some(dir) if dir.exists() => Some(dir),
            Some(dir) => {
                debug!(?dir, "PromptLoader::new: override directory missing, ignoring");
                None
            }
            None => None,
        };

        Self {
            hbs: Self::engine(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle quotes in topics.
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `{override_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in override directory");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in override directory");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the plan prompt for `input` as of `today`
    pub fn plan_prompt(&self, input: &GoalInput, today: NaiveDate) -> Result<String> {
        let context = PlanPromptContext::new(input, today);
        info!(
            "Rendering plan prompt (category: {}, difficulty: {}, due: {})",
            context.category, context.difficulty, context.target_date
        );
        self.render("plan", &context)
    }

    /// The system instruction sent with every plan request
    pub fn system_prompt(&self) -> Result<String> {
        self.load_template("system").map(|s| s.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DifficultyLevel, GoalCategory};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn piano() -> GoalInput {
        GoalInput::new(
            "Learn \"Clair de Lune\" on piano",
            GoalCategory::Skills,
            DifficultyLevel::Beginner,
            date(2027, 10, 16),
        )
    }

    #[test]
    fn test_context_uses_iso_dates_and_labels() {
        let ctx = PlanPromptContext::new(&piano(), date(2026, 10, 16));
        assert_eq!(ctx.target_date, "2027-10-16");
        assert_eq!(ctx.current_date, "2026-10-16");
        assert_eq!(ctx.category, "Skills");
        assert_eq!(ctx.difficulty, "Beginner");
    }

    #[test]
    fn test_plan_prompt_embeds_all_fields() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.plan_prompt(&piano(), date(2026, 10, 16)).unwrap();

        assert!(prompt.contains("- Topic/Aim: Learn \"Clair de Lune\" on piano"));
        assert!(prompt.contains("- Category: Skills"));
        assert!(prompt.contains("- Difficulty/Current Level: Beginner"));
        assert!(prompt.contains("- Target Date: 2027-10-16"));
        assert!(prompt.contains("- Current Date: 2026-10-16"));
        assert!(prompt.contains("from 2026-10-16 until 2027-10-16"));
        assert!(prompt.contains("real-world resources"));
        assert!(!prompt.contains("{{"));
        assert!(!prompt.contains("&quot;"));
    }

    #[test]
    fn test_plan_prompt_is_deterministic() {
        let loader = PromptLoader::embedded_only();
        let a = loader.plan_prompt(&piano(), date(2026, 10, 16)).unwrap();
        let b = loader.plan_prompt(&piano(), date(2026, 10, 16)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plan_prompt_changes_with_current_date() {
        let loader = PromptLoader::embedded_only();
        let a = loader.plan_prompt(&piano(), date(2026, 10, 16)).unwrap();
        let b = loader.plan_prompt(&piano(), date(2026, 10, 17)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_override_directory_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("plan.pmt"), "Goal={{topic}} by {{target_date}}").unwrap();

        let loader = PromptLoader::new(Some(dir.path()));
        let prompt = loader.plan_prompt(&piano(), date(2026, 10, 16)).unwrap();
        assert_eq!(prompt, "Goal=Learn \"Clair de Lune\" on piano by 2027-10-16");

        // Templates missing from the override directory still fall back
        assert!(loader.system_prompt().unwrap().contains("JSON"));
    }

    #[test]
    fn test_missing_override_directory_is_ignored() {
        let loader = PromptLoader::new(Some("/nonexistent/goalplan/prompts"));
        assert!(loader.plan_prompt(&piano(), date(2026, 10, 16)).is_ok());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
