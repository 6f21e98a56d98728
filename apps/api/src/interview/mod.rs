// Interview flow: resume → question → answer → evaluation → (clarification) → next,
// for MAX_ROUNDS rounds, then the report.
// All model calls go through llm_client via InterviewService.

pub mod evaluation;
pub mod handlers;
pub mod model;
pub mod prompts;
pub mod report;
pub mod service;
pub mod session;
pub mod store;
pub mod view;
