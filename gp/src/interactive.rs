//! Interactive goal session
//!
//! Form, plan, then an action menu over the plan until the user starts over
//! or quits.

use std::io;
use std::path::PathBuf;

use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::OutputFormat;
use crate::config::{Config, PrintConfig};
use crate::domain::GoalPlan;
use crate::export::{self, ExportError, PrintOutcome};
use crate::form::{LineReader, collect_input};
use crate::render::{RenderMode, render_error, render_plan};
use crate::session::{PlanSession, SessionError};

/// Action offered once a plan is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    Copy,
    Print,
    NewPlan,
    Quit,
}

impl Action {
    /// Parse a menu answer: the bracketed letter or the full word
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "s" | "save" => Some(Self::Save),
            "c" | "copy" => Some(Self::Copy),
            "p" | "print" => Some(Self::Print),
            "n" | "new" => Some(Self::NewPlan),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Where the action menu leaves the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    NewPlan,
    Quit,
}

/// Interactive session
pub struct InteractiveApp<R: LineReader> {
    session: PlanSession,
    reader: R,
    export_dir: PathBuf,
    print: PrintConfig,
}

impl<R: LineReader> InteractiveApp<R> {
    pub fn new(session: PlanSession, reader: R, config: &Config) -> Self {
        Self {
            session,
            reader,
            export_dir: config.export.expanded_dir(),
            print: config.print.clone(),
        }
    }

    /// Run the main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let today = self.session.adapter().today();
            let Some(input) = collect_input(&mut self.reader, today)? else {
                break;
            };

            println!("{}", "Architecting your success plan...".dimmed());
            match self.session.submit(&input).await {
                Ok(plan) => {
                    println!();
                    print!("{}", render_plan(plan, RenderMode::Screen));
                }
                Err(e) => {
                    print!("{}", render_error(&session_message(&e)));
                    continue;
                }
            }

            match self.action_loop()? {
                Next::NewPlan => {
                    self.session.reset();
                    println!();
                }
                Next::Quit => break,
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "GoalPlan".bright_cyan().bold());
        println!("Describe a goal and get a step-by-step roadmap. Ctrl-D to quit.");
        println!();
    }

    fn action_loop(&mut self) -> Result<Next> {
        loop {
            let Some(line) = self.reader.read_line(&format!("{} ", ">".bright_green()))? else {
                return Ok(Next::Quit);
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some(action) = Action::parse(&line) else {
                println!("{} Unknown action: {}", "?".yellow(), line.trim());
                continue;
            };
            match action {
                Action::NewPlan => return Ok(Next::NewPlan),
                Action::Quit => return Ok(Next::Quit),
                _ => {}
            }
            let Some(plan) = self.session.last_plan() else {
                return Ok(Next::NewPlan);
            };
            match perform(action, plan, &self.export_dir, &self.print, &mut io::stdout()) {
                Ok(status) => println!("{}", status.bright_green()),
                Err(e) => {
                    warn!(?action, error = %e, "action_loop: action failed");
                    print!("{}", render_error(&e.to_string()));
                }
            }
        }
    }
}

/// Text shown to the user for a failed submission
pub fn session_message(e: &SessionError) -> String {
    match e {
        SessionError::Plan(plan_err) => plan_err.user_message().to_string(),
        SessionError::Busy => e.to_string(),
    }
}

/// Carry out a plan action and describe the result
pub fn perform<W: io::Write>(
    action: Action,
    plan: &GoalPlan,
    export_dir: &std::path::Path,
    print: &PrintConfig,
    terminal: &mut W,
) -> Result<String, ExportError> {
    debug!(?action, "perform: called");
    let status = match action {
        Action::Save => {
            let path = export::write_text_export(plan, export_dir)?;
            format!("Saved {}", path.display())
        }
        Action::Copy => {
            export::copy_to_clipboard(plan, terminal)?;
            "Summary copied to clipboard".to_string()
        }
        Action::Print => match export::print_plan(plan, print)? {
            PrintOutcome::Sent(command) => format!("Sent to {}", command),
            PrintOutcome::Stdout => "Printed".to_string(),
        },
        Action::NewPlan | Action::Quit => String::new(),
    };
    info!(?action, "perform: {}", status);
    Ok(status)
}

/// Write a one-shot plan to `out`, then carry out `actions`
///
/// Terminal control output from the actions (the clipboard sequence) goes to
/// `terminal`, so `out` holds only the plan. Returns each action's status.
pub fn deliver_plan<O: io::Write, T: io::Write>(
    plan: &GoalPlan,
    format: &OutputFormat,
    actions: &[Action],
    export_dir: &std::path::Path,
    print: &PrintConfig,
    out: &mut O,
    terminal: &mut T,
) -> Result<Vec<String>> {
    debug!(%format, ?actions, "deliver_plan: called");
    match format {
        OutputFormat::Text => write!(out, "{}", render_plan(plan, RenderMode::Screen))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(plan)?)?,
    }
    out.flush()?;

    actions
        .iter()
        .map(|&action| {
            perform(action, plan, export_dir, print, terminal).with_context(|| format!("Failed to {:?} plan", action))
        })
        .collect()
}
