//! Persona table
//!
//! Each agent name maps to a fixed system instruction and model. The table
//! is static; nothing registers personas at runtime.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

use super::names::{AgentName, Intent};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// System instruction and model used for one remote call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub name: AgentName,
    /// Intent this persona answers
    pub handles: Intent,
    pub model: &'static str,
    pub system_instruction: &'static str,
}

impl Persona {
    /// Model to call, honouring a configured override
    pub fn model_for<'a>(&'a self, override_model: Option<&'a str>) -> &'a str {
        override_model.unwrap_or(self.model)
    }
}

const COORDINATOR_INSTRUCTION: &str = r#"You are an intelligent router for the GATE Prep Help system. Your task is to analyze a student's query and determine its primary intent. Classify the intent into one of the following categories:
- 'Concept Explanation' (for technical questions about OS, DBMS, Algorithms, etc.)
- 'Motivation' (for requests related to stress management, motivation, or general exam strategy)
- 'Planning' (for requests to create study schedules or plans)
- 'Unknown' (if the intent doesn't clearly fit any of the above)

After identifying the intent, suggest the appropriate agent to handle it:
- 'TeacherAgent' for 'Concept Explanation'
- 'MentorAgent' for 'Motivation'
- 'PlannerTool' for 'Planning'
- 'CoordinatorAgent' for 'Unknown' or to clarify if the query is ambiguous.

Your output MUST be a JSON object with two fields: 'intent' and 'agent'.
Example for Concept Explanation:
{ "intent": "Concept Explanation", "agent": "TeacherAgent" }
Example for Motivation:
{ "intent": "Motivation", "agent": "MentorAgent" }
Example for Planning:
{ "intent": "Planning", "agent": "PlannerTool" }
Example for Unknown:
{ "intent": "Unknown", "agent": "CoordinatorAgent" }"#;

const TEACHER_INSTRUCTION: &str = "You are the TeacherAgent, specializing in explaining technical concepts related to GATE Computer Science (OS, DBMS, Algorithms). Explain concepts simply, using analogies and examples relevant to Indian students (e.g., relating concurrency to railway platforms, database transactions to banking, etc.). Be clear, concise, and helpful.";

const MENTOR_INSTRUCTION: &str = "You are the MentorAgent. Your role is to provide motivation, stress management tips, and strategic advice for GATE exam preparation. Offer encouraging words, practical study strategies, and mindfulness techniques.";

const PLANNER_INSTRUCTION: &str = "You are the PlannerTool. Your task is to create structured study schedules based on the student's available days. Ask for the number of days if not specified. Provide a balanced schedule covering key GATE CS subjects. Structure the response clearly, perhaps with daily breakdown.";

static PERSONAS: Lazy<IndexMap<AgentName, Persona>> = Lazy::new(|| {
    [
        (AgentName::Coordinator, Intent::Unknown, COORDINATOR_INSTRUCTION),
        (AgentName::Teacher, Intent::ConceptExplanation, TEACHER_INSTRUCTION),
        (AgentName::Mentor, Intent::Motivation, MENTOR_INSTRUCTION),
        (AgentName::Planner, Intent::Planning, PLANNER_INSTRUCTION),
    ]
    .into_iter()
    .map(|(name, handles, system_instruction)| {
        let persona = Persona {
            name: name.clone(),
            handles,
            model: DEFAULT_MODEL,
            system_instruction,
        };
        (name, persona)
    })
    .collect()
});

/// Look up the persona for an agent name
pub fn persona(agent: &AgentName) -> Option<&'static Persona> {
    PERSONAS.get(agent)
}

/// The routing persona
pub fn coordinator() -> &'static Persona {
    &PERSONAS[&AgentName::Coordinator]
}

/// Whether `agent` is the persona configured for `intent`
pub fn handles(agent: &AgentName, intent: &Intent) -> bool {
    persona(agent).is_some_and(|p| p.handles == *intent)
}

/// All personas in table order
pub fn all() -> impl Iterator<Item = &'static Persona> {
    PERSONAS.values()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_closed_agent_has_a_persona() {
        for agent in AgentName::ALL {
            let persona = persona(&agent).expect("persona missing");
            assert_eq!(persona.name, agent);
            assert_eq!(persona.model, DEFAULT_MODEL);
        }
    }

    #[test]
    fn test_unconfigured_agent_has_no_persona() {
        assert!(persona(&AgentName::Other("HistorianAgent".to_string())).is_none());
    }

    #[test]
    fn test_intent_to_agent_pairs() {
        assert!(handles(&AgentName::Teacher, &Intent::ConceptExplanation));
        assert!(handles(&AgentName::Mentor, &Intent::Motivation));
        assert!(handles(&AgentName::Planner, &Intent::Planning));
        assert!(handles(&AgentName::Coordinator, &Intent::Unknown));

        assert!(!handles(&AgentName::Teacher, &Intent::Planning));
        assert!(!handles(&AgentName::Other("QuizMaster".to_string()), &Intent::Unknown));
        assert!(!handles(&AgentName::Mentor, &Intent::Other("Trivia".to_string())));
    }

    #[test]
    fn test_coordinator_instruction_asks_for_json() {
        let instruction = coordinator().system_instruction;
        assert!(instruction.contains("'intent' and 'agent'"));
        assert!(instruction.contains(r#"{ "intent": "Unknown", "agent": "CoordinatorAgent" }"#));
    }

    #[test]
    fn test_teacher_instruction_names_itself() {
        let teacher = persona(&AgentName::Teacher).unwrap();
        assert!(teacher.system_instruction.starts_with("You are the TeacherAgent"));
    }

    #[test]
    fn test_model_override() {
        let mentor = persona(&AgentName::Mentor).unwrap();
        assert_eq!(mentor.model_for(None), DEFAULT_MODEL);
        assert_eq!(mentor.model_for(Some("gemini-2.5-pro")), "gemini-2.5-pro");
    }

    #[test]
    fn test_all_is_in_table_order() {
        let names: Vec<String> = all().map(|p| p.name.to_string()).collect();
        assert_eq!(names, vec!["CoordinatorAgent", "TeacherAgent", "MentorAgent", "PlannerTool"]);
    }
}
