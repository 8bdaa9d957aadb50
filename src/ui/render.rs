//! Terminal rendering of chat messages as bordered bubbles

use colored::*;
use terminal_size::{Width, terminal_size};

use super::style::{Align, BubbleStyle, Shape, Tone, style_for};
use crate::chat::{ChatMessage, Payload};

const TRACE_HEADING: &str = "SYSTEM TRACE";
const MIN_INNER_WIDTH: usize = 10;

/// Get terminal width, defaulting to 80 if not available
pub fn terminal_width() -> usize {
    terminal_size().map(|(Width(w), _)| w as usize).unwrap_or(80)
}

/// Wrap text to max_width on word boundaries, returning lines
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![s.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in s.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines.into_iter().flat_map(|line| hard_wrap(&line, max_width)).collect()
}

/// Split a line into chunks of at most `width` characters, keeping spacing
fn hard_wrap(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if width == 0 || chars.len() <= width {
        return vec![line.to_string()];
    }
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

/// Plain text lines inside the bubble
fn content_lines(message: &ChatMessage, inner_width: usize) -> Vec<String> {
    match message.payload {
        Payload::Text(ref text) => {
            let mut lines = Vec::new();
            for paragraph in text.lines() {
                if paragraph.trim().is_empty() {
                    lines.push(String::new());
                } else {
                    lines.extend(wrap_text(paragraph, inner_width));
                }
            }
            if lines.is_empty() {
                lines.push(String::new());
            }
            lines
        }
        Payload::Trace(ref trace) => {
            let json = serde_json::to_string_pretty(trace).unwrap_or_else(|e| format!("<unprintable trace: {}>", e));
            let mut lines = vec![TRACE_HEADING.to_string()];
            lines.extend(json.lines().flat_map(|line| hard_wrap(line, inner_width)));
            lines
        }
    }
}

/// A laid-out bubble: its style, left offset and uncoloured box lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub style: BubbleStyle,
    pub offset: usize,
    pub lines: Vec<String>,
}

/// Lay out one message for a terminal `term_width` columns wide
pub fn layout(message: &ChatMessage, term_width: usize, max_width_percent: u8) -> Bubble {
    let style = style_for(message.sender, message.is_trace);
    let max_block = term_width * usize::from(max_width_percent.clamp(10, 100)) / 100;
    let inner_width = max_block.saturating_sub(4).max(MIN_INNER_WIDTH);

    let content = content_lines(message, inner_width);
    let width = content.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(content.len() + 2);
    lines.push(format!("╭{}╮", "─".repeat(width + 2)));
    for (i, line) in content.iter().enumerate() {
        let len = line.chars().count();
        let body = if message.is_trace && i == 0 {
            let left = (width - len) / 2;
            format!("{}{}{}", " ".repeat(left), line, " ".repeat(width - len - left))
        } else {
            format!("{}{}", line, " ".repeat(width - len))
        };
        lines.push(format!("│ {} │", body));
    }
    let (bottom_left, bottom_right) = match style.shape {
        Shape::Rounded => ('╰', '╯'),
        Shape::SquareBottomRight => ('╰', '┘'),
        Shape::SquareBottomLeft => ('└', '╯'),
    };
    lines.push(format!("{}{}{}", bottom_left, "─".repeat(width + 2), bottom_right));

    let block_width = width + 4;
    let offset = match style.align {
        Align::Left => 0,
        Align::Right => term_width.saturating_sub(block_width),
        Align::Center => term_width.saturating_sub(block_width) / 2,
    };

    Bubble { style, offset, lines }
}

fn paint(line: &str, tone: Tone) -> String {
    match tone {
        Tone::User => line.white().on_blue().to_string(),
        Tone::Agent => line.black().on_white().to_string(),
        Tone::Trace => line.dimmed().to_string(),
    }
}

/// Coloured, positioned lines for one message
pub fn render(message: &ChatMessage, term_width: usize, max_width_percent: u8) -> Vec<String> {
    let bubble = layout(message, term_width, max_width_percent);
    let pad = " ".repeat(bubble.offset);
    bubble
        .lines
        .iter()
        .map(|line| format!("{}{}", pad, paint(line, bubble.style.tone)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::SystemTrace;
    use crate::gateway::RoutingDecision;

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let lines = wrap_text("abcdefghijklmnop", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "klmno", "p"]);
    }

    #[test]
    fn test_user_bubble_is_right_aligned() {
        let msg = ChatMessage::user("hello");
        let bubble = layout(&msg, 80, 75);

        assert_eq!(bubble.lines.len(), 3);
        assert_eq!(bubble.lines[1], "│ hello │");
        assert_eq!(bubble.offset, 80 - 9);
        assert!(bubble.lines[2].ends_with('┘'));
    }

    #[test]
    fn test_agent_bubble_is_left_aligned() {
        let msg = ChatMessage::agent("hi there");
        let bubble = layout(&msg, 80, 75);

        assert_eq!(bubble.offset, 0);
        assert!(bubble.lines[2].starts_with('└'));
        assert!(bubble.lines[2].ends_with('╯'));
    }

    #[test]
    fn test_bubble_respects_max_width() {
        let msg = ChatMessage::agent(&"word ".repeat(100));
        let bubble = layout(&msg, 80, 75);

        for line in &bubble.lines {
            assert!(line.chars().count() <= 60, "line too wide: {}", line);
        }
    }

    #[test]
    fn test_multiline_text_keeps_blank_lines() {
        let msg = ChatMessage::agent("Day 1: OS\n\nDay 2: DBMS");
        let bubble = layout(&msg, 80, 75);

        assert_eq!(bubble.lines.len(), 5);
        assert!(bubble.lines[1].contains("Day 1: OS"));
        assert_eq!(bubble.lines[2].trim_matches(|c| c == '│' || c == ' '), "");
        assert!(bubble.lines[3].contains("Day 2: DBMS"));
    }

    #[test]
    fn test_trace_bubble_is_centered_with_heading() {
        let msg = ChatMessage::trace(SystemTrace::new(&RoutingDecision::fallback()));
        let bubble = layout(&msg, 120, 75);

        let block_width = bubble.lines[0].chars().count();
        assert_eq!(bubble.offset, (120 - block_width) / 2);
        assert!(bubble.lines[1].contains(TRACE_HEADING));
        assert!(bubble.lines.iter().any(|l| l.contains("\"intent_detected\": \"Unknown\"")));
        assert!(bubble.lines.iter().any(|l| l.contains("Routing to CoordinatorAgent")));
        assert!(bubble.lines.last().unwrap().starts_with('╰'));
        assert!(bubble.lines.last().unwrap().ends_with('╯'));
    }

    #[test]
    fn test_render_prefixes_offset() {
        colored::control::set_override(false);
        let msg = ChatMessage::user("yo");
        let lines = render(&msg, 40, 75);
        assert_eq!(lines[1], format!("{}│ yo │", " ".repeat(34)));
    }
}
