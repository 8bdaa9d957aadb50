//! List agents and their personas

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::agent::persona;
use crate::cli::OutputFormat;
use crate::config::Config;

#[derive(Serialize)]
struct AgentSummary {
    name: String,
    handles: String,
    model: String,
    system_instruction: &'static str,
}

fn summaries(config: &Config) -> Vec<AgentSummary> {
    persona::all()
        .map(|p| AgentSummary {
            name: p.name.to_string(),
            handles: p.handles.to_string(),
            model: p.model_for(config.gateway.model.as_deref()).to_string(),
            system_instruction: p.system_instruction,
        })
        .collect()
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries(config))?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries(config))?),
        OutputFormat::Text => print_text(config),
    }
    Ok(())
}

pub fn print_text(config: &Config) {
    println!("{}", "Available Agents:".bold());
    println!();

    for persona in persona::all() {
        println!("  {} {}", "●".green(), persona.name.to_string().bold());
        println!("    Handles: {}", persona.handles.to_string().cyan());
        println!("    Model: {}", persona.model_for(config.gateway.model.as_deref()).yellow());
        // First sentence only
        let instruction = persona.system_instruction;
        let first = instruction.split_once(". ").map(|(s, _)| s).unwrap_or(instruction);
        println!("    {}", first.dimmed());
        println!();
    }
}
