pub mod agents;
pub mod ask;
pub mod chat;
pub mod completions;
pub mod config;
pub mod doctor;
pub mod route;
