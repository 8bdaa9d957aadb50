//! Interactive chat loop

use colored::*;
use eyre::{Context, Result};
use rustyline::error::ReadlineError;

use crate::chat::{ChatSession, LoadingFlag};
use crate::config::Config;
use crate::gateway::Gateway;
use crate::ui::input::{self, SLASH_COMMANDS, SlashCommand};
use crate::ui::render::terminal_width;
use crate::ui::{ChatView, Spinner};

pub fn run(config: &Config) -> Result<()> {
    let gateway = Gateway::from_config(&config.gateway);
    let loading = LoadingFlag::new();
    let mut session = ChatSession::new(&gateway, loading.clone());
    let mut view = ChatView::new(&config.ui);
    let mut editor = input::editor()?;

    print_banner();
    log::info!("Chat session started");

    loop {
        let line = match editor.readline(&format!("{} ", "you ›".blue().bold())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match SlashCommand::parse(&line) {
            Some(Ok(SlashCommand::Quit)) => break,
            Some(Ok(SlashCommand::Help)) => {
                print_help();
                continue;
            }
            Some(Ok(SlashCommand::History)) => {
                for rendered in view.render_all(session.messages(), terminal_width()) {
                    println!("{}", rendered);
                }
                continue;
            }
            Some(Ok(SlashCommand::Agents)) => {
                super::agents::print_text(config);
                continue;
            }
            Some(Err(unknown)) => {
                eprintln!("{} Unknown command: {} (try {})", "✗".red(), unknown, "/help".cyan());
                continue;
            }
            None => {}
        }

        if !input::can_submit(&line, session.is_loading()) {
            continue;
        }

        if let Err(e) = editor.add_history_entry(line.as_str()) {
            log::warn!("Failed to record input history: {}", e);
        }

        {
            let _spinner = Spinner::start(loading.clone());
            session.submit(&line);
        }
        view.print_new(session.messages());
    }

    log::info!("Chat session ended after {} messages", session.messages().len());
    println!("{}", "Good luck with your preparation!".dimmed());
    Ok(())
}

fn print_banner() {
    println!("{}", "GATE Prep Help".bold());
    println!("{}", "═".repeat(50));
    println!("Ask about OS, DBMS or algorithms, ask for motivation, or request a study plan.");
    println!("{}", "Enter sends, Alt+Enter adds a new line, /help lists commands.".dimmed());
    println!();
}

fn print_help() {
    println!("{}", "Commands:".bold());
    for (command, description) in SLASH_COMMANDS {
        println!("  {} {}", format!("{:<10}", command).cyan(), description.dimmed());
    }
    println!();
}
