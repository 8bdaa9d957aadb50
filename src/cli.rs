use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "gate-prep",
    about = "GATE Prep Help - chat with routed study agents",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/gate-prep/logs/gate-prep.log\n\nThe API key is read from $API_KEY (see gateway.api_key_env)."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to gate-prep.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,

    /// Send one message and print the exchange
    Ask {
        /// Question to send
        prompt: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show which agent a message would be routed to
    Route {
        /// Message to classify
        prompt: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the agents and their personas
    Agents {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose setup issues
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_chat() {
        let cli = Cli::try_parse_from(["gate-prep"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_parses_format() {
        let cli = Cli::try_parse_from(["gate-prep", "ask", "What is a semaphore?", "-o", "json"]).unwrap();
        match cli.command {
            Some(Commands::Ask { prompt, format }) => {
                assert_eq!(prompt, "What is a semaphore?");
                assert_eq!(format, Some(OutputFormat::Json));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_resolve_explicit_format() {
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Yaml)), OutputFormat::Yaml);
    }
}
