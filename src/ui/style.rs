//! Bubble style per message kind

use crate::chat::Sender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Light grey panel
    Trace,
    /// White on blue
    User,
    /// Dark text on grey
    Agent,
}

/// Which corner, if any, is drawn square instead of rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rounded,
    SquareBottomRight,
    SquareBottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleStyle {
    pub align: Align,
    pub tone: Tone,
    pub shape: Shape,
}

pub fn style_for(sender: Sender, is_trace: bool) -> BubbleStyle {
    let is_user = sender == Sender::User;

    let tone = if is_trace {
        Tone::Trace
    } else if is_user {
        Tone::User
    } else {
        Tone::Agent
    };

    let align = if is_user {
        Align::Right
    } else if is_trace {
        Align::Center
    } else {
        Align::Left
    };

    let shape = if is_user {
        Shape::SquareBottomRight
    } else if is_trace {
        Shape::Rounded
    } else {
        Shape::SquareBottomLeft
    };

    BubbleStyle { align, tone, shape }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_style() {
        let style = style_for(Sender::User, false);
        assert_eq!(style.align, Align::Right);
        assert_eq!(style.tone, Tone::User);
        assert_eq!(style.shape, Shape::SquareBottomRight);
    }

    #[test]
    fn test_agent_style() {
        let style = style_for(Sender::Agent, false);
        assert_eq!(style.align, Align::Left);
        assert_eq!(style.tone, Tone::Agent);
        assert_eq!(style.shape, Shape::SquareBottomLeft);
    }

    #[test]
    fn test_trace_style() {
        let style = style_for(Sender::System, true);
        assert_eq!(style.align, Align::Center);
        assert_eq!(style.tone, Tone::Trace);
        assert_eq!(style.shape, Shape::Rounded);
    }

    #[test]
    fn test_system_text_renders_like_agent() {
        assert_eq!(style_for(Sender::System, false), style_for(Sender::Agent, false));
    }
}
