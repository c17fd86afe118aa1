//! Terminal rendering of plans and errors
//!
//! `Screen` output is colored and carries the interactive-only elements
//! (warning banner, badges, actions footer). `Print` output is plain text
//! meant for paper.

use colored::{ColoredString, Colorize};
use std::fmt::Write;
use tracing::debug;

use crate::domain::GoalPlan;

/// Target of a rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Screen,
    Print,
}

impl RenderMode {
    fn is_screen(self) -> bool {
        self == RenderMode::Screen
    }
}

pub const WARNING_HEADING: &str = "Ambitious Timeline Detected";

pub const ACTIONS_FOOTER: &str = "[s]ave text  [c]opy summary  [p]rint  [n]ew plan  [q]uit";

/// Applies a style only when rendering for the screen
struct Painter(RenderMode);

impl Painter {
    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.0.is_screen() {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn heading(s: &str) -> ColoredString {
    s.bright_cyan().bold()
}

fn title(s: &str) -> ColoredString {
    s.bright_white().bold()
}

fn warning(s: &str) -> ColoredString {
    s.bright_yellow().bold()
}

fn accent(s: &str) -> ColoredString {
    s.yellow()
}

fn muted(s: &str) -> ColoredString {
    s.dimmed()
}

fn good(s: &str) -> ColoredString {
    s.bright_green()
}

/// Render a plan for the given target
pub fn render_plan(plan: &GoalPlan, mode: RenderMode) -> String {
    debug!(title = %plan.title, ?mode, "render_plan: called");
    let p = Painter(mode);
    let mut out = String::new();

    if mode.is_screen()
        && let Some(text) = plan.active_warning()
    {
        let _ = writeln!(out, "{} {}", p.paint("!", warning), p.paint(WARNING_HEADING, warning));
        let _ = writeln!(out, "  {}", text);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", p.paint(&plan.title, title));
    if mode.is_screen() {
        let status = if plan.is_timeframe_realistic {
            p.paint(plan.status_label(), good)
        } else {
            p.paint(plan.status_label(), warning)
        };
        let _ = writeln!(out, "[{}] [{}]", status, p.paint(&plan.difficulty, accent));
    }
    let _ = writeln!(out, "{}", plan.summary);

    section(&mut out, &p, "Strategic Milestones");
    for (i, m) in plan.milestones.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({})", i + 1, m.title, p.paint(&m.timeframe, accent));
        let _ = writeln!(out, "     {}", m.description);
    }

    section(&mut out, &p, "Curated Resources");
    for r in &plan.resources {
        let _ = writeln!(
            out,
            "  - [{}] {} ({})",
            p.paint(r.kind.label(), accent),
            r.name,
            p.paint(&r.estimated_cost, muted)
        );
        let _ = writeln!(out, "      {}", r.description);
    }

    section(&mut out, &p, "Daily Habits");
    for h in &plan.daily_habits {
        let _ = writeln!(out, "  - {}", h);
    }

    section(&mut out, &p, "Weekly Checklist");
    for c in &plan.weekly_checklist {
        let _ = writeln!(out, "  [ ] {}", c);
    }

    section(&mut out, &p, "Common Hurdles");
    for o in &plan.common_obstacles {
        let _ = writeln!(out, "  \"{}\"", o.obstacle);
        let _ = writeln!(out, "     Solution: {}", o.solution);
    }

    if mode.is_screen() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", p.paint(ACTIONS_FOOTER, muted));
    }

    out
}

fn section(out: &mut String, p: &Painter, name: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", p.paint(name, heading));
}

/// Inline error banner; the next prompt dismisses it
pub fn render_error(message: &str) -> String {
    debug!("render_error: called");
    format!("{} {}\n", "Error:".red().bold(), message.red())
}
