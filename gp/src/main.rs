//! GoalPlan - structured action plans for personal goals
//!
//! CLI entry point for the interactive form and one-shot generation.

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use tracing::info;

use goalplan::cli::{Cli, Command, GoalArgs, OutputFormat};
use goalplan::config::Config;
use goalplan::domain::{DifficultyLevel, GoalCategory};
use goalplan::form::option_menu;
use goalplan::interactive::{Action, InteractiveApp, deliver_plan};
use goalplan::llm::create_client;
use goalplan::planner::{Clock, PlanAdapter, SystemClock, goal_plan_schema};
use goalplan::prompts::PromptLoader;
use goalplan::render::render_error;
use goalplan::session::PlanSession;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goalplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Log to a file so the terminal stays clean for the form and plan
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("goalplan.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "GoalPlan loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        None | Some(Command::Interactive) => cmd_interactive(&config).await,
        Some(Command::Generate {
            goal,
            format,
            save,
            copy,
            print,
        }) => cmd_generate(&config, &goal, format, save, copy, print).await,
        Some(Command::Prompt { goal }) => cmd_prompt(&config, &goal),
        Some(Command::Schema) => cmd_schema(),
        Some(Command::Options) => cmd_options(),
    }
}

/// Build an adapter around a fresh provider client
fn build_adapter(config: &Config) -> Result<PlanAdapter> {
    config.validate()?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = PromptLoader::new(config.prompts.expanded_dir());
    Ok(PlanAdapter::new(llm)
        .with_prompts(prompts)
        .with_max_tokens(config.llm.max_tokens))
}

/// Run the interactive form
async fn cmd_interactive(config: &Config) -> Result<()> {
    let session = PlanSession::new(build_adapter(config)?);
    let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
    InteractiveApp::new(session, editor, config).run().await
}

/// Generate one plan from flags
async fn cmd_generate(
    config: &Config,
    goal: &GoalArgs,
    format: OutputFormat,
    save: Option<PathBuf>,
    copy: bool,
    print: bool,
) -> Result<()> {
    let input = goal.to_input();
    let adapter = build_adapter(config)?;
    input.check(adapter.today())?;

    let plan = match adapter.generate_plan(&input).await {
        Ok(plan) => plan,
        Err(e) => {
            eprint!("{}", render_error(e.user_message()));
            std::process::exit(1);
        }
    };

    let mut actions = Vec::new();
    if save.is_some() {
        actions.push(Action::Save);
    }
    if copy {
        actions.push(Action::Copy);
    }
    if print {
        actions.push(Action::Print);
    }

    let export_dir = save.unwrap_or_else(|| config.export.expanded_dir());
    let statuses = deliver_plan(
        &plan,
        &format,
        &actions,
        &export_dir,
        &config.print,
        &mut io::stdout(),
        &mut io::stderr(),
    )?;
    for status in statuses {
        eprintln!("{}", status);
    }
    Ok(())
}

/// Show the prompt that would be sent
fn cmd_prompt(config: &Config, goal: &GoalArgs) -> Result<()> {
    let prompts = PromptLoader::new(config.prompts.expanded_dir());
    let prompt = prompts.plan_prompt(&goal.to_input(), SystemClock.today())?;
    println!("{}", prompt);
    Ok(())
}

fn cmd_schema() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&goal_plan_schema())?);
    Ok(())
}

fn cmd_options() -> Result<()> {
    let categories: Vec<&str> = GoalCategory::ALL.iter().map(|c| c.label()).collect();
    let levels: Vec<&str> = DifficultyLevel::ALL.iter().map(|d| d.label()).collect();
    println!("Categories:");
    println!("{}", option_menu(&categories));
    println!();
    println!("Difficulty levels:");
    println!("{}", option_menu(&levels));
    Ok(())
}
