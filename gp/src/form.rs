//! Goal input form
//!
//! Prompts for topic, category, difficulty and due date in that order and
//! re-asks a field until its answer is valid.

use chrono::NaiveDate;
use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use thiserror::Error;
use tracing::debug;

use crate::domain::{DifficultyLevel, GoalCategory, GoalInput, InputProblem, ParseOptionError};

/// Fields of the form, in prompting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Topic,
    Category,
    Difficulty,
    DueDate,
}

impl FormField {
    pub const ORDER: &'static [FormField] = &[
        FormField::Topic,
        FormField::Category,
        FormField::Difficulty,
        FormField::DueDate,
    ];

    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Topic => "What do you want to achieve? ",
            Self::Category => "Category: ",
            Self::Difficulty => "Current level: ",
            Self::DueDate => "Target date (YYYY-MM-DD): ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Choice(#[from] ParseOptionError),

    #[error("'{0}' is not a date, use YYYY-MM-DD")]
    BadDate(String),

    #[error(transparent)]
    Input(#[from] InputProblem),
}

/// Source of answered lines
///
/// `Ok(None)` means the user abandoned the form (Ctrl-C or Ctrl-D).
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.trim());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                println!();
                Ok(None)
            }
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }
}

fn pick<T: Copy>(answer: &str, all: &[T]) -> Option<T> {
    let index: usize = answer.trim().parse().ok()?;
    index.checked_sub(1).and_then(|i| all.get(i)).copied()
}

/// Category by name (case-insensitive) or 1-based position in `GoalCategory::ALL`
pub fn parse_category(answer: &str) -> Result<GoalCategory, ParseOptionError> {
    debug!(%answer, "parse_category: called");
    match pick(answer, GoalCategory::ALL) {
        Some(category) => Ok(category),
        None => answer.parse(),
    }
}

/// Difficulty by name (case-insensitive) or 1-based position in `DifficultyLevel::ALL`
pub fn parse_difficulty(answer: &str) -> Result<DifficultyLevel, ParseOptionError> {
    debug!(%answer, "parse_difficulty: called");
    match pick(answer, DifficultyLevel::ALL) {
        Some(difficulty) => Ok(difficulty),
        None => answer.parse(),
    }
}

/// A `YYYY-MM-DD` date no earlier than `today`
pub fn parse_due_date(answer: &str, today: NaiveDate) -> Result<NaiveDate, FormError> {
    debug!(%answer, %today, "parse_due_date: called");
    let trimmed = answer.trim();
    let due =
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| FormError::BadDate(trimmed.to_string()))?;
    if due < today {
        return Err(InputProblem::DueDateInPast { due, today }.into());
    }
    Ok(due)
}

/// Numbered option list, one per line
pub fn option_menu(labels: &[&str]) -> String {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("  {}. {}", i + 1, label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask until `parse` accepts the answer; `None` if the user abandons the form
fn ask<R, T, E>(reader: &mut R, field: FormField, parse: impl Fn(&str) -> Result<T, E>) -> Result<Option<T>>
where
    R: LineReader + ?Sized,
    E: std::fmt::Display,
{
    loop {
        let Some(line) = reader.read_line(field.prompt())? else {
            return Ok(None);
        };
        match parse(&line) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => println!("{} {}", "!".yellow(), e),
        }
    }
}

/// Run the form and build a `GoalInput`
pub fn collect_input<R: LineReader + ?Sized>(reader: &mut R, today: NaiveDate) -> Result<Option<GoalInput>> {
    debug!(%today, "collect_input: called");

    let Some(topic) = ask(reader, FormField::Topic, |s| {
        let topic = s.trim();
        if topic.is_empty() {
            Err(InputProblem::EmptyTopic)
        } else {
            Ok(topic.to_string())
        }
    })?
    else {
        return Ok(None);
    };

    let categories: Vec<&str> = GoalCategory::ALL.iter().map(|c| c.label()).collect();
    println!("{}", option_menu(&categories));
    let Some(category) = ask(reader, FormField::Category, parse_category)? else {
        return Ok(None);
    };

    let levels: Vec<&str> = DifficultyLevel::ALL.iter().map(|d| d.label()).collect();
    println!("{}", option_menu(&levels));
    let Some(difficulty) = ask(reader, FormField::Difficulty, parse_difficulty)? else {
        return Ok(None);
    };

    let Some(due) = ask(reader, FormField::DueDate, |s| parse_due_date(s, today))? else {
        return Ok(None);
    };

    Ok(Some(GoalInput::new(topic, category, difficulty, due)))
}
