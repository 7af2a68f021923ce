//! Data models for the scan pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signalyx_db::schema::{SignalKind, SignalOrigin};

/// A discovered company event before deduplication and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalDraft {
    pub company_name: String,
    pub siren: Option<String>,
    pub kind: SignalKind,
    pub title: String,
    pub summary: Option<String>,
    pub origin: SignalOrigin,
    pub source_url: Option<String>,
    pub published_on: Option<NaiveDate>,
}

impl SignalDraft {
    pub fn new(company_name: String, kind: SignalKind, title: String, origin: SignalOrigin) -> Self {
        Self {
            company_name,
            siren: None,
            kind,
            title,
            summary: None,
            origin,
            source_url: None,
            published_on: None,
        }
    }
}

/// Parameters for a single scan run, supplied by the API caller with
/// settings-table defaults filled in by the launching handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanParams {
    /// Free-text query for press search / RSS feeds.
    pub query: Option<String>,
    /// Upper bound on items fetched per source.
    pub max_results: Option<usize>,
    /// Anniversary milestones (years) for registry scans.
    pub anniversary_years: Option<Vec<u32>>,
    /// How many days ahead a registry scan looks for anniversaries.
    pub window_days: Option<i64>,
    /// LinkedIn post URLs for engagement scans.
    pub post_urls: Option<Vec<String>>,
}

impl ScanParams {
    pub fn max_results(&self) -> usize {
        self.max_results.unwrap_or(50).clamp(1, 200)
    }
}
