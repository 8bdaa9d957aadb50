//! Intent labels and agent names
//!
//! Both are closed sets of four literal values. The model may still answer
//! with something outside the set; that label is kept verbatim in `Other`
//! so the routing trace shows exactly what was said.

use serde::{Deserialize, Serialize};

/// Classified purpose of a user message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    ConceptExplanation,
    Motivation,
    Planning,
    Unknown,
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::ConceptExplanation => "Concept Explanation",
            Intent::Motivation => "Motivation",
            Intent::Planning => "Planning",
            Intent::Unknown => "Unknown",
            Intent::Other(label) => label,
        }
    }
}

impl From<&str> for Intent {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Concept Explanation" => Intent::ConceptExplanation,
            "Motivation" => Intent::Motivation,
            "Planning" => Intent::Planning,
            "Unknown" => Intent::Unknown,
            other => Intent::Other(other.to_string()),
        }
    }
}

impl From<String> for Intent {
    fn from(s: String) -> Self {
        Intent::from(s.as_str())
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.as_str().to_string()
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the persona a message is routed to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentName {
    Coordinator,
    Teacher,
    Mentor,
    Planner,
    Other(String),
}

impl AgentName {
    pub const ALL: [AgentName; 4] = [
        AgentName::Coordinator,
        AgentName::Teacher,
        AgentName::Mentor,
        AgentName::Planner,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AgentName::Coordinator => "CoordinatorAgent",
            AgentName::Teacher => "TeacherAgent",
            AgentName::Mentor => "MentorAgent",
            AgentName::Planner => "PlannerTool",
            AgentName::Other(name) => name,
        }
    }
}

impl From<&str> for AgentName {
    fn from(s: &str) -> Self {
        match s.trim() {
            "CoordinatorAgent" => AgentName::Coordinator,
            "TeacherAgent" => AgentName::Teacher,
            "MentorAgent" => AgentName::Mentor,
            "PlannerTool" => AgentName::Planner,
            other => AgentName::Other(other.to_string()),
        }
    }
}

impl From<String> for AgentName {
    fn from(s: String) -> Self {
        AgentName::from(s.as_str())
    }
}

impl From<AgentName> for String {
    fn from(agent: AgentName) -> Self {
        agent.as_str().to_string()
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
