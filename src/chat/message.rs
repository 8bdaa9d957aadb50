//! Chat message and routing trace types

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::Intent;
use crate::gateway::RoutingDecision;

pub const MEMORY_CONTEXT_PLACEHOLDER: &str = "Simulating retrieval of student's weak topics (not implemented yet).";

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
    System,
}

/// Display-only summary of one routing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemTrace {
    /// UTC ISO 8601
    pub timestamp: String,
    pub intent_detected: Intent,
    pub memory_context: String,
    pub routing_decision: String,
}

impl SystemTrace {
    pub fn new(decision: &RoutingDecision) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            intent_detected: decision.intent.clone(),
            memory_context: MEMORY_CONTEXT_PLACEHOLDER.to_string(),
            routing_decision: format!("Routing to {}", decision.agent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Trace(SystemTrace),
}

/// One entry in the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    #[serde(rename = "text")]
    pub payload: Payload,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_trace: bool,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self::text(Sender::User, text)
    }

    pub fn agent(text: &str) -> Self {
        Self::text(Sender::Agent, text)
    }

    pub fn trace(trace: SystemTrace) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::System,
            payload: Payload::Trace(trace),
            is_trace: true,
        }
    }

    fn text(sender: Sender, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            payload: Payload::Text(text.to_string()),
            is_trace: false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self.payload {
            Payload::Text(ref text) => Some(text),
            Payload::Trace(_) => None,
        }
    }

    pub fn as_trace(&self) -> Option<&SystemTrace> {
        match self.payload {
            Payload::Trace(ref trace) => Some(trace),
            Payload::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentName;

    #[test]
    fn test_trace_from_decision() {
        let decision = RoutingDecision {
            intent: Intent::ConceptExplanation,
            agent: AgentName::Teacher,
        };
        let trace = SystemTrace::new(&decision);

        assert_eq!(trace.intent_detected, Intent::ConceptExplanation);
        assert_eq!(trace.routing_decision, "Routing to TeacherAgent");
        assert_eq!(trace.memory_context, MEMORY_CONTEXT_PLACEHOLDER);
        assert!(chrono::DateTime::parse_from_rfc3339(&trace.timestamp).is_ok());
    }

    #[test]
    fn test_trace_message_is_flagged() {
        let msg = ChatMessage::trace(SystemTrace::new(&RoutingDecision::fallback()));
        assert!(msg.is_trace);
        assert_eq!(msg.sender, Sender::System);
        assert!(msg.as_trace().is_some());
        assert!(msg.as_text().is_none());
    }

    #[test]
    fn test_text_messages() {
        let user = ChatMessage::user("hi");
        assert_eq!(user.sender, Sender::User);
        assert!(!user.is_trace);
        assert_eq!(user.as_text(), Some("hi"));

        let agent = ChatMessage::agent("hello");
        assert_eq!(agent.sender, Sender::Agent);
        assert_ne!(user.id, agent.id);
    }

    #[test]
    fn test_trace_json_field_names() {
        let msg = ChatMessage::trace(SystemTrace::new(&RoutingDecision::fallback()));
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["sender"], "system");
        assert_eq!(json["is_trace"], true);
        assert_eq!(json["text"]["intent_detected"], "Unknown");
        assert_eq!(json["text"]["routing_decision"], "Routing to CoordinatorAgent");
    }

    #[test]
    fn test_text_message_json_omits_trace_flag() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json["text"], "hi");
        assert!(json.get("is_trace").is_none());
    }
}
