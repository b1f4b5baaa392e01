pub mod orchestrator;
pub mod render;
pub mod retrieve;
pub mod summarize;

pub use orchestrator::{GeneratedReport, generate_full_report};
