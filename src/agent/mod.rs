//! Agents for routed GATE prep answers
//!
//! Agents are named personas; each contributes only a system instruction
//! and a model identifier to one remote call:
//! - CoordinatorAgent classifies intent and picks an agent
//! - TeacherAgent, MentorAgent and PlannerTool answer

pub mod names;
pub mod persona;

pub use names::{AgentName, Intent};
