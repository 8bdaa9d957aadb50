//! Diagnose gate-prep setup issues

use colored::*;
use eyre::Result;

use crate::agent::{AgentName, persona};
use crate::config::Config;
use crate::gateway::Gateway;

pub fn run(config: &Config) -> Result<()> {
    println!("{}", "gate-prep Doctor".bold());
    println!("{}", "═".repeat(50));
    println!();

    let mut issues = 0;

    let app_dir = Config::app_dir();
    match config.source {
        Some(ref path) => println!("{} Config file: {}", "✓".green(), path.display()),
        None => println!(
            "{} No config file found (using defaults); expected {}",
            "⚠".yellow(),
            app_dir.join("gate-prep.yaml").display()
        ),
    }

    let gateway = Gateway::from_config(&config.gateway);
    let source = gateway.client().api_key_source();
    match source.resolve() {
        Ok(_) => println!("{} API key: found via {}", "✓".green(), source.env_var.cyan()),
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            println!(
                "  Export {} or add it to {}",
                source.env_var.cyan(),
                app_dir.join(".env").display()
            );
            issues += 1;
        }
    }

    println!("{} Endpoint: {}", "✓".green(), config.gateway.base_url);

    let missing: Vec<String> = AgentName::ALL
        .iter()
        .filter(|agent| persona::persona(agent).is_none())
        .map(|agent| agent.to_string())
        .collect();
    if missing.is_empty() {
        println!("{} Personas: {} configured", "✓".green(), AgentName::ALL.len());
    } else {
        println!("{} No persona for: {}", "✗".red(), missing.join(", "));
        issues += missing.len();
    }

    let mut models: Vec<&str> = persona::all()
        .map(|p| p.model_for(config.gateway.model.as_deref()))
        .collect();
    models.dedup();
    println!("{} Models: {}", "✓".green(), models.join(", "));

    println!();
    if issues == 0 {
        println!("{} All checks passed", "✓".green().bold());
    } else {
        println!(
            "{} {} issue(s) found; every question will get the fallback reply until fixed",
            "✗".red().bold(),
            issues
        );
    }

    Ok(())
}
