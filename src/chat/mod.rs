//! Chat transcript and orchestration
//!
//! Each submission appends exactly three messages: the user's text, a
//! routing trace, and the routed agent's reply.

pub mod message;
pub mod session;
pub mod store;

pub use message::{ChatMessage, Payload, Sender, SystemTrace};
pub use session::{ChatSession, LoadingFlag};
