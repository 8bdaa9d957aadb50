//! Line editor for the chat prompt
//!
//! Plain Enter submits. Shift+Enter (where the terminal reports it) and
//! Alt+Enter insert a newline instead.

use eyre::{Context, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Cmd, Editor, Helper, KeyCode, KeyEvent, Modifiers};
use std::borrow::Cow;

/// REPL commands recognised at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    History,
    Agents,
    Quit,
}

pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show this help"),
    ("/history", "Reprint the whole conversation"),
    ("/agents", "List the agents questions are routed to"),
    ("/quit", "Leave the chat"),
    ("/exit", "Leave the chat"),
];

impl SlashCommand {
    /// `None` for ordinary chat text; `Some(Err)` for an unknown command
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') || trimmed.contains(char::is_whitespace) {
            return None;
        }

        let command = match trimmed {
            "/help" | "/?" => Self::Help,
            "/history" => Self::History,
            "/agents" => Self::Agents,
            "/quit" | "/exit" => Self::Quit,
            other => return Some(Err(other.to_string())),
        };
        Some(Ok(command))
    }
}

/// Whether the send action is enabled
pub fn can_submit(input: &str, loading: bool) -> bool {
    !loading && !input.trim().is_empty()
}

/// Rustyline helper with slash command completion and history hints
pub struct ChatHelper {
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new() -> Self {
        Self {
            hinter: HistoryHinter::new(),
        }
    }
}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') || line[..pos].contains(' ') {
            return Ok((pos, vec![]));
        }

        let matches = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(&line[..pos]))
            .map(|(cmd, _)| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &rustyline::Context<'_>) -> Option<String> {
        if line.starts_with('/') {
            None
        } else {
            self.hinter.hint(line, pos, ctx)
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }
}

impl Validator for ChatHelper {}

impl Helper for ChatHelper {}

/// Build the prompt editor with newline bindings installed
pub fn editor() -> Result<Editor<ChatHelper, DefaultHistory>> {
    let mut editor: Editor<ChatHelper, DefaultHistory> = Editor::new().context("Failed to initialize line editor")?;
    editor.set_helper(Some(ChatHelper::new()));
    editor.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::SHIFT), Cmd::Newline);
    editor.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::ALT), Cmd::Newline);
    Ok(editor)
}
