//! signalyx-web — JSON API server for the sales-intelligence dashboard.

pub mod handlers;
pub mod router;
pub mod state;
