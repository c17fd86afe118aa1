//! Clipboard summary
//!
//! The copy is sent to the terminal as an OSC 52 sequence, which most
//! terminal emulators (and tmux with `set-clipboard on`) forward to the
//! system clipboard.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use super::ExportError;
use crate::domain::GoalPlan;

/// Short summary of a plan: title, summary and the first milestone
pub fn clipboard_summary(plan: &GoalPlan) -> String {
    debug!(title = %plan.title, "clipboard_summary: called");
    let mut text = format!("{}\n\nSummary: {}", plan.title, plan.summary);
    if let Some(next) = plan.next_step() {
        text.push_str(&format!("\n\nNext Steps: {}", next.title));
    }
    text
}

/// OSC 52 escape sequence that sets the clipboard to `text`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Copy the plan's summary to the clipboard through `out`
pub fn copy_to_clipboard<W: Write>(plan: &GoalPlan, out: &mut W) -> Result<(), ExportError> {
    debug!("copy_to_clipboard: called");
    let sequence = osc52_sequence(&clipboard_summary(plan));
    out.write_all(sequence.as_bytes()).map_err(ExportError::Clipboard)?;
    out.flush().map_err(ExportError::Clipboard)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Milestone;

    fn plan(milestones: Vec<Milestone>) -> GoalPlan {
        GoalPlan {
            title: "Learn Piano".to_string(),
            summary: "Play simple pieces.".to_string(),
            difficulty: "Beginner".to_string(),
            is_timeframe_realistic: true,
            timeframe_warning: None,
            milestones,
            resources: vec![],
            daily_habits: vec![],
            weekly_checklist: vec![],
            common_obstacles: vec![],
        }
    }

    fn milestone(title: &str) -> Milestone {
        Milestone {
            title: title.to_string(),
            description: "d".to_string(),
            timeframe: "Week 1".to_string(),
        }
    }

    #[test]
    fn test_summary_names_first_milestone() {
        let p = plan(vec![milestone("Learn the keys"), milestone("Scales")]);
        assert_eq!(
            clipboard_summary(&p),
            "Learn Piano\n\nSummary: Play simple pieces.\n\nNext Steps: Learn the keys"
        );
    }

    #[test]
    fn test_summary_without_milestones() {
        assert_eq!(clipboard_summary(&plan(vec![])), "Learn Piano\n\nSummary: Play simple pieces.");
    }

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_copy_writes_sequence() {
        let p = plan(vec![milestone("Learn the keys")]);
        let mut out = Vec::new();
        copy_to_clipboard(&p, &mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        let payload = written
            .strip_prefix("\x1b]52;c;")
            .and_then(|s| s.strip_suffix('\x07'))
            .unwrap();
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), clipboard_summary(&p));
    }
}
