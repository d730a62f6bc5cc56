use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use herdr::artifact::ArtifactStore;
use herdr::cli::Cli;
use herdr::config::Config;
use herdr::executor::PythonExecutor;
use herdr::llm::{OpenAiClient, OpenAiConfig};
use herdr::prompt;
use herdr::runner::{RepairRunner, RepairRunnerConfig, RunOutcome};

fn setup_logging(default_filter: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("herdr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("herdr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn print_usage_info() -> Result<()> {
    Cli::command().print_help().context("Failed to print usage")?;
    println!("\nEither a prompt or a path to an existing code file to modify must be provided.");
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    // Missing or doubled prompt source is a no-op with help text, not a failure
    if !cli.has_valid_input() {
        return print_usage_info();
    }

    // Credentials are read once at startup; absence is fatal before any generation
    let api_key = config.read_api_key()?;

    let llm = OpenAiClient::with_api_key(
        api_key,
        OpenAiConfig {
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            timeout: Duration::from_millis(config.llm.timeout_ms),
        },
    )?;

    let executor = PythonExecutor::new(
        config.execution.interpreter.as_str(),
        Duration::from_millis(config.execution.timeout_ms),
        config.execution.max_output_bytes,
    )?;

    let store = ArtifactStore::new(&config.storage.scripts_dir);

    let runner = RepairRunner::new(
        Arc::new(llm),
        Arc::new(executor),
        store,
        RepairRunnerConfig {
            max_iterations: cli.iterations,
        },
    );

    // Resolve the prompt and the generation instruction
    let (initial_prompt, instruction) = if let Some(arg) = &cli.prompt {
        let resolved = prompt::resolve_prompt(arg)?;
        (resolved, prompt::generation_instruction(&cli.code_type))
    } else {
        // --modify: revise an existing file, description asked interactively
        let path = cli.modify.as_ref().expect("checked by has_valid_input");
        let existing = fs::read_to_string(path)
            .context(format!("Failed to read code file {}", path.display()))?;
        let description = prompt::ask_modification_description()?;
        (description, prompt::modification_instruction(&existing))
    };

    let report = runner.run(&initial_prompt, &instruction, &cli.code_type).await?;

    match report.outcome {
        RunOutcome::Debugged => println!("{}", "Run complete: code executed successfully.".green()),
        RunOutcome::Skipped => println!("Run complete: code saved without execution."),
        RunOutcome::Stagnant => println!("{}", "Run stopped: model stagnated on the same error.".yellow()),
        RunOutcome::Exhausted => println!("{}", "Run stopped: iteration budget exhausted.".yellow()),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then bring up logging with its filter level
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_filter()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
