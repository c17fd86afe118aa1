//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{DifficultyLevel, GoalCategory, GoalInput};
use crate::form::{parse_category, parse_difficulty};

/// GoalPlan - turn a goal into a structured action plan
#[derive(Parser)]
#[command(
    name = "gp",
    about = "Turn a goal into a structured, resource-backed action plan",
    version,
    after_help = "Logs are written to: ~/.local/share/goalplan/logs/goalplan.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Fill in the goal form and work with the resulting plan (default)
    Interactive,

    /// Generate a plan in one shot
    Generate {
        #[command(flatten)]
        goal: GoalArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Also save the text export into this directory
        #[arg(long, value_name = "DIR")]
        save: Option<PathBuf>,

        /// Also copy the summary to the clipboard
        #[arg(long)]
        copy: bool,

        /// Also send the plan to the print command
        #[arg(long)]
        print: bool,
    },

    /// Show the prompt that would be sent, without calling the provider
    Prompt {
        #[command(flatten)]
        goal: GoalArgs,
    },

    /// Print the plan response schema
    Schema,

    /// List the category and difficulty options
    Options,
}

/// The four goal fields as flags
#[derive(Args, Debug, Clone)]
pub struct GoalArgs {
    /// What you want to achieve
    #[arg(short, long)]
    pub topic: String,

    /// Goal category, by name or number (see `gp options`)
    #[arg(long, value_parser = parse_category, default_value = "Skills")]
    pub category: GoalCategory,

    /// Current level, by name or number (see `gp options`)
    #[arg(short, long, value_parser = parse_difficulty, default_value = "Beginner")]
    pub difficulty: DifficultyLevel,

    /// Target date (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub due: NaiveDate,
}

impl GoalArgs {
    pub fn to_input(&self) -> GoalInput {
        GoalInput::new(self.topic.clone(), self.category, self.difficulty, self.due)
    }
}

/// Output format for generated plans
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["gp"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_interactive() {
        let cli = Cli::parse_from(["gp", "interactive"]);
        assert!(matches!(cli.command, Some(Command::Interactive)));
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from([
            "gp",
            "generate",
            "--topic",
            "Run a Marathon",
            "--category",
            "fitness",
            "--difficulty",
            "1",
            "--due",
            "2026-10-23",
            "--format",
            "json",
            "--save",
            "/tmp/plans",
            "--copy",
        ]);
        if let Some(Command::Generate {
            goal,
            format,
            save,
            copy,
            print,
        }) = cli.command
        {
            assert_eq!(goal.topic, "Run a Marathon");
            assert_eq!(goal.category, GoalCategory::Fitness);
            assert_eq!(goal.difficulty, DifficultyLevel::Beginner);
            assert_eq!(goal.due, NaiveDate::from_ymd_opt(2026, 10, 23).unwrap());
            assert_eq!(format, OutputFormat::Json);
            assert_eq!(save, Some(PathBuf::from("/tmp/plans")));
            assert!(copy);
            assert!(!print);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_generate_defaults() {
        let cli = Cli::parse_from(["gp", "generate", "-t", "Learn Piano", "--due", "2027-10-16"]);
        if let Some(Command::Generate { goal, format, .. }) = cli.command {
            assert_eq!(goal.category, GoalCategory::Skills);
            assert_eq!(goal.difficulty, DifficultyLevel::Beginner);
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_rejects_bad_options() {
        let bad_category = ["gp", "generate", "-t", "x", "--due", "2027-01-01", "--category", "cooking"];
        assert!(Cli::try_parse_from(bad_category).is_err());
        assert!(Cli::try_parse_from(["gp", "generate", "-t", "x", "--due", "tomorrow"]).is_err());
        assert!(Cli::try_parse_from(["gp", "generate", "--due", "2027-01-01"]).is_err());
    }

    #[test]
    fn test_cli_parse_prompt() {
        let cli = Cli::parse_from(["gp", "prompt", "-t", "Learn Piano", "--due", "2027-10-16"]);
        if let Some(Command::Prompt { goal }) = cli.command {
            let input = goal.to_input();
            assert_eq!(input.topic, "Learn Piano");
        } else {
            panic!("Expected Prompt command");
        }
    }

    #[test]
    fn test_cli_parse_schema_and_options() {
        assert!(matches!(Cli::parse_from(["gp", "schema"]).command, Some(Command::Schema)));
        assert!(matches!(Cli::parse_from(["gp", "options"]).command, Some(Command::Options)));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["gp", "-c", "/path/to/goalplan.yml", "schema"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/goalplan.yml")));
    }
}
