use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "gate-prep Configuration".bold());
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
            println!();

            println!("{}:", "gateway".cyan());
            println!("  base_url: {}", config.gateway.base_url);
            println!("  api_key_env: {}", config.gateway.api_key_env);
            println!(
                "  model: {}",
                config.gateway.model.as_deref().unwrap_or("(per agent)")
            );
            println!();

            println!("{}:", "ui".cyan());
            println!("  show_trace: {}", config.ui.show_trace);
            println!("  max_width_percent: {}", config.ui.max_width_percent);
        }
    }

    Ok(())
}

fn get(key: &str, config: &Config) -> Result<()> {
    match config.get(key) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}
