//! Remote model gateway
//!
//! Two operations over one generation endpoint:
//! - `route` asks the coordinator persona for an `{intent, agent}` pair
//! - `respond` asks the routed persona for the answer
//!
//! Both swallow every failure into a fixed fallback. One attempt per call.

pub mod gemini;

use eyre::{Context, Result};
use lazy_regex::regex_captures;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentName, Intent, persona};
use crate::config::GatewayConfig;

pub use gemini::GeminiClient;

/// A single generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub system_instruction: &'a str,
    pub prompt: &'a str,
    /// JSON schema hint for structured output
    pub response_schema: Option<serde_json::Value>,
}

/// Transport to a text generation endpoint
pub trait ModelClient: Send + Sync {
    /// Issue one call and return the generated text (possibly empty)
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<String>;

    /// Local preconditions such as credentials, checked without a network call
    fn ready(&self) -> Result<()> {
        Ok(())
    }
}

/// Coordinator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub intent: Intent,
    pub agent: AgentName,
}

impl RoutingDecision {
    /// Used whenever routing fails
    pub fn fallback() -> Self {
        Self {
            intent: Intent::Unknown,
            agent: AgentName::Coordinator,
        }
    }
}

pub const EMPTY_RESPONSE: &str = "No response from agent.";

/// Reply substituted when a generation call fails
pub fn generation_error(agent: &AgentName) -> String {
    format!(
        "An error occurred while getting a response from {}. Please try again.",
        agent
    )
}

/// Reply for an agent with no configured persona
pub fn agent_not_found(agent: &AgentName) -> String {
    format!("Error: Agent {} not found.", agent)
}

fn routing_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "intent": {
                "type": "STRING",
                "description": "The detected intent: Concept Explanation, Motivation, Planning, or Unknown."
            },
            "agent": {
                "type": "STRING",
                "description": "The recommended agent: TeacherAgent, MentorAgent, PlannerTool, or CoordinatorAgent."
            }
        },
        "required": ["intent", "agent"]
    })
}

/// Parse coordinator output, tolerating a Markdown code fence around the JSON
pub fn parse_decision(text: &str) -> Result<RoutingDecision> {
    let text = text.trim();
    if text.is_empty() {
        eyre::bail!("CoordinatorAgent did not return a valid JSON response");
    }

    let json = match regex_captures!(r"^```(?:json)?\s*([\s\S]*?)\s*```$", text) {
        Some((_, inner)) => inner,
        None => text,
    };

    serde_json::from_str(json).context("Failed to parse routing decision")
}

/// Routing and generation over a model client
pub struct Gateway<C: ModelClient> {
    client: C,
    model_override: Option<String>,
}

impl<C: ModelClient> Gateway<C> {
    pub fn new(client: C, model_override: Option<String>) -> Self {
        Self { client, model_override }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Ask the coordinator for a routing decision, propagating failures
    pub fn try_route(&self, prompt: &str) -> Result<RoutingDecision> {
        let coordinator = persona::coordinator();
        let request = GenerateRequest {
            model: coordinator.model_for(self.model_override.as_deref()),
            system_instruction: coordinator.system_instruction,
            prompt,
            response_schema: Some(routing_schema()),
        };

        let text = self.client.generate(&request).context("Coordinator call failed")?;
        log::debug!("Coordinator returned: {}", text);
        parse_decision(&text)
    }

    /// Routing decision, or the fallback pair on any failure
    pub fn route(&self, prompt: &str) -> RoutingDecision {
        match self.try_route(prompt) {
            Ok(decision) => {
                log::info!("Routed to {} (intent: {})", decision.agent, decision.intent);
                decision
            }
            Err(e) => {
                log::error!("Error getting coordinator decision: {:#}", e);
                RoutingDecision::fallback()
            }
        }
    }

    /// Generate the routed agent's reply; failures become a canned message
    pub fn respond(&self, agent: &AgentName, prompt: &str) -> String {
        // Credentials first: without them every agent gets the same error reply
        if let Err(e) = self.client.ready() {
            log::error!("Error getting response from {}: {:#}", agent, e);
            return generation_error(agent);
        }

        let Some(persona) = persona::persona(agent) else {
            log::warn!("No persona configured for {}", agent);
            return agent_not_found(agent);
        };

        let request = GenerateRequest {
            model: persona.model_for(self.model_override.as_deref()),
            system_instruction: persona.system_instruction,
            prompt,
            response_schema: None,
        };

        match self.client.generate(&request) {
            Ok(text) if text.is_empty() => EMPTY_RESPONSE.to_string(),
            Ok(text) => text,
            Err(e) => {
                log::error!("Error getting response from {}: {:#}", agent, e);
                generation_error(agent)
            }
        }
    }
}

impl Gateway<GeminiClient> {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(GeminiClient::from_config(config), config.model.clone())
    }
}
