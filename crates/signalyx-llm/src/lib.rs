//! signalyx-llm — LLM backends and tone analysis.
//!
//! A small abstraction over chat-completion providers, used for exactly
//! one product feature: analyzing the tone of LinkedIn engagement around
//! a signal to suggest an outreach angle.

pub mod backend;
pub mod tone;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message};
pub use tone::{ToneAnalyzer, ToneProfile};
