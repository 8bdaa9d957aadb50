use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod agent;
mod chat;
mod cli;
mod commands;
mod config;
mod gateway;
mod ui;

use cli::{Cli, Commands, OutputFormat};
use config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gate-prep")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("gate-prep.log");

    // Log to a file so the chat transcript stays clean
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(&config),
        Commands::Ask { prompt, format } => commands::ask::run(&prompt, OutputFormat::resolve(format), &config),
        Commands::Route { prompt, format } => commands::route::run(&prompt, OutputFormat::resolve(format), &config),
        Commands::Agents { format } => commands::agents::run(OutputFormat::resolve(format), &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Doctor => commands::doctor::run(&config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging, so Config::load stays silent
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level).context("Failed to setup logging")?;

    info!("Starting gate-prep with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
