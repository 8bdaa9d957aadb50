//! Terminal presentation: bubble styling, rendering, input

pub mod input;
pub mod render;
pub mod style;
pub mod view;

pub use view::{ChatView, Spinner};
