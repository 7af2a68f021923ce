//! signalyx-common — Shared error types and the outbound HTTP client used across all Signalyx crates.

pub mod error;
pub mod http;

pub use error::{ApiError, SignalyxError};
pub use http::OutboundClient;
