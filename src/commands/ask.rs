//! One-shot exchange

use colored::*;
use eyre::Result;

use crate::chat::{ChatSession, LoadingFlag};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::gateway::Gateway;
use crate::ui::ChatView;
use crate::ui::render::terminal_width;

pub fn run(prompt: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let gateway = Gateway::from_config(&config.gateway);
    let mut session = ChatSession::new(&gateway, LoadingFlag::new());

    let Some(appended) = session.submit(prompt) else {
        eprintln!("{} Nothing to send: the message is empty", "✗".red());
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(appended)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(appended)?),
        OutputFormat::Text => {
            let mut view = ChatView::new(&config.ui);
            for line in view.refresh(appended, terminal_width()) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
