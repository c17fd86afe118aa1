//! Plain-text export
//!
//! The layout is fixed so a saved plan reads the same everywhere, and the
//! function is pure: the same plan always produces the same bytes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use super::ExportError;
use crate::domain::GoalPlan;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

/// Render `plan` in the fixed plain-text layout
pub fn export_text(plan: &GoalPlan) -> String {
    debug!(title = %plan.title, "export_text: called");

    let milestones = plan
        .milestones
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}. {} ({})\n   {}", i + 1, m.title, m.timeframe, m.description))
        .collect::<Vec<_>>()
        .join("\n\n");

    let resources = plan
        .resources
        .iter()
        .map(|r| format!("- {} ({}): {}", r.name, r.kind, r.description))
        .collect::<Vec<_>>()
        .join("\n");

    let habits = plan
        .daily_habits
        .iter()
        .map(|h| format!("- {}", h))
        .collect::<Vec<_>>()
        .join("\n");

    let checklist = plan
        .weekly_checklist
        .iter()
        .map(|c| format!("- [ ] {}", c))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{title}\n\
         Difficulty: {difficulty}\n\
         Status: {status}\n\
         \n\
         SUMMARY:\n\
         {summary}\n\
         \n\
         MILESTONES:\n\
         {milestones}\n\
         \n\
         RESOURCES:\n\
         {resources}\n\
         \n\
         DAILY HABITS:\n\
         {habits}\n\
         \n\
         WEEKLY CHECKLIST:\n\
         {checklist}\n",
        title = plan.title.to_uppercase(),
        difficulty = plan.difficulty,
        status = plan.status_label(),
        summary = plan.summary,
    )
}

/// File name for a saved plan: whitespace runs become `_`, characters that
/// are unsafe in paths are dropped, and `_Plan.txt` is appended
pub fn export_file_name(title: &str) -> String {
    debug!(%title, "export_file_name: called");
    let cleaned: String = title
        .trim()
        .chars()
        .filter(|c| (!is_path_unsafe(*c) && !c.is_control()) || c.is_whitespace())
        .collect();
    let stem = WHITESPACE_RUN.replace_all(cleaned.trim(), "_");
    let stem = stem.trim_matches('.');

    if stem.is_empty() {
        "Goal_Plan.txt".to_string()
    } else {
        format!("{}_Plan.txt", stem)
    }
}

fn is_path_unsafe(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Write the text export of `plan` into `dir`, returning the file's path
pub fn write_text_export(plan: &GoalPlan, dir: &Path) -> Result<PathBuf, ExportError> {
    debug!(?dir, "write_text_export: called");
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(export_file_name(&plan.title));
    fs::write(&path, export_text(plan)).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!("Saved plan to {}", path.display());
    Ok(path)
}
