//! signalyx-sources — Signal source clients and the scan pipeline.
//!
//! Each source turns an external API's responses into [`models::SignalDraft`]s;
//! the pipeline deduplicates drafts and persists the survivors.

pub mod dedup;
pub mod models;
pub mod pipeline;
pub mod sources;

pub use models::{ScanParams, SignalDraft};
pub use pipeline::{run_scan, ScanContext, ScanOutcome};
pub use sources::SignalSource;
