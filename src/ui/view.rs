//! Incremental transcript view and loading indicator

use colored::*;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::render::{render, terminal_width};
use crate::chat::{ChatMessage, LoadingFlag};
use crate::config::UiConfig;

/// Tracks how much of the transcript has been printed.
///
/// `refresh` emits only messages appended since the last call, so the
/// newest entry always lands at the bottom of the terminal.
pub struct ChatView {
    rendered: usize,
    show_trace: bool,
    max_width_percent: u8,
}

impl ChatView {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            rendered: 0,
            show_trace: config.show_trace,
            max_width_percent: config.max_width_percent,
        }
    }

    /// Lines for messages not yet shown
    pub fn refresh(&mut self, messages: &[ChatMessage], width: usize) -> Vec<String> {
        let start = self.rendered.min(messages.len());
        self.rendered = messages.len();
        self.lines_for(&messages[start..], width)
    }

    /// Lines for the whole transcript, e.g. after the screen was cleared
    pub fn render_all(&mut self, messages: &[ChatMessage], width: usize) -> Vec<String> {
        self.rendered = messages.len();
        self.lines_for(messages, width)
    }

    fn lines_for(&self, messages: &[ChatMessage], width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for message in messages {
            if message.is_trace && !self.show_trace {
                continue;
            }
            lines.extend(render(message, width, self.max_width_percent));
            lines.push(String::new());
        }
        lines
    }

    /// Print new messages at the current terminal width
    pub fn print_new(&mut self, messages: &[ChatMessage]) {
        for line in self.refresh(messages, terminal_width()) {
            println!("{}", line);
        }
    }
}

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draws a spinner on stderr while the loading flag is set
pub struct Spinner {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(loading: LoadingFlag) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::spawn(move || {
            let mut frame = 0;
            let mut drawn = false;
            while !stop_flag.load(Ordering::SeqCst) {
                if loading.is_set() {
                    eprint!("\r{} {}", FRAMES[frame % FRAMES.len()].blue(), "thinking...".dimmed());
                    let _ = io::stderr().flush();
                    frame += 1;
                    drawn = true;
                }
                thread::sleep(Duration::from_millis(80));
            }
            if drawn {
                eprint!("\r{}\r", " ".repeat(16));
                let _ = io::stderr().flush();
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("Spinner thread panicked");
        }
    }
}
