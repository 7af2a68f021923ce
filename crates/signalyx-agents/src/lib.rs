//! signalyx-agents — AI task-runner integration for data enrichment.
//!
//! A thin client over a Manus-style task API (create a task, poll its
//! status, read its output) plus the orchestration that applies agent
//! output to contacts and signals.

pub mod client;
pub mod enrich;

pub use client::{AgentTaskClient, AgentTaskState, AgentTaskStatus};
pub use enrich::{run_enrichment, EnrichmentContext, EnrichmentTarget, PollSettings};
