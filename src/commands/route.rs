//! Show the coordinator's routing decision without generating a reply

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::chat::SystemTrace;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::gateway::Gateway;

pub fn run(prompt: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        eprintln!("{} Nothing to route: the message is empty", "✗".red());
        return Ok(());
    }

    let gateway = Gateway::from_config(&config.gateway);
    let decision = gateway.route(prompt);
    let trace = SystemTrace::new(&decision);

    #[derive(Serialize)]
    struct RouteOutput<'a> {
        intent: &'a str,
        agent: &'a str,
        trace: &'a SystemTrace,
    }

    let output = RouteOutput {
        intent: decision.intent.as_str(),
        agent: decision.agent.as_str(),
        trace: &trace,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&output)?),
        OutputFormat::Text => {
            println!("{} {}", "Intent:".bold(), decision.intent.to_string().cyan());
            println!("{} {}", "Agent:".bold(), decision.agent.to_string().green());
            println!("{}", trace.routing_decision.dimmed());
        }
    }

    Ok(())
}
