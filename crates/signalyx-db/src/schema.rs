//! Row structs and domain enums shared by the repositories.
//!
//! Enum-like columns are stored as TEXT; the enums here are the accepted
//! vocabulary, parsed at the API boundary and rendered with `Display`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Signals
// =============================================================================

/// Kind of company event a signal describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Anniversary,
    Funding,
    Acquisition,
    LeadershipChange,
    Award,
    Expansion,
    Other,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Anniversary => write!(f, "anniversary"),
            SignalKind::Funding => write!(f, "funding"),
            SignalKind::Acquisition => write!(f, "acquisition"),
            SignalKind::LeadershipChange => write!(f, "leadership_change"),
            SignalKind::Award => write!(f, "award"),
            SignalKind::Expansion => write!(f, "expansion"),
            SignalKind::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "anniversary" => Ok(SignalKind::Anniversary),
            "funding" => Ok(SignalKind::Funding),
            "acquisition" => Ok(SignalKind::Acquisition),
            "leadership_change" => Ok(SignalKind::LeadershipChange),
            "award" => Ok(SignalKind::Award),
            "expansion" => Ok(SignalKind::Expansion),
            "other" => Ok(SignalKind::Other),
            _ => Err(format!("unknown signal kind: {s}")),
        }
    }
}

/// Where a signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalOrigin {
    Press,
    Registry,
    Linkedin,
    Manual,
}

impl std::fmt::Display for SignalOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalOrigin::Press => write!(f, "press"),
            SignalOrigin::Registry => write!(f, "registry"),
            SignalOrigin::Linkedin => write!(f, "linkedin"),
            SignalOrigin::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for SignalOrigin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "press" => Ok(SignalOrigin::Press),
            "registry" => Ok(SignalOrigin::Registry),
            "linkedin" => Ok(SignalOrigin::Linkedin),
            "manual" => Ok(SignalOrigin::Manual),
            _ => Err(format!("unknown signal origin: {s}")),
        }
    }
}

/// Outreach pipeline position of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    New,
    Qualified,
    Contacted,
    Archived,
}

impl std::fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalStatus::New => write!(f, "new"),
            SignalStatus::Qualified => write!(f, "qualified"),
            SignalStatus::Contacted => write!(f, "contacted"),
            SignalStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for SignalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" => Ok(SignalStatus::New),
            "qualified" => Ok(SignalStatus::Qualified),
            "contacted" => Ok(SignalStatus::Contacted),
            "archived" => Ok(SignalStatus::Archived),
            _ => Err(format!("unknown signal status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Signal {
    pub id: Uuid,
    pub company_name: String,
    pub siren: Option<String>,
    pub kind: String,
    pub title: String,
    pub summary: Option<String>,
    pub origin: String,
    pub source_url: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub status: String,
    pub dedup_hash: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a signal row.
#[derive(Debug, Clone)]
pub struct NewSignal {
    pub company_name: String,
    pub siren: Option<String>,
    pub kind: SignalKind,
    pub title: String,
    pub summary: Option<String>,
    pub origin: SignalOrigin,
    pub source_url: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub dedup_hash: Option<i64>,
}

// =============================================================================
// Contacts
// =============================================================================

/// Enrichment lifecycle of a contact (mirrors the owning job's status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    None,
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentStatus::None => write!(f, "none"),
            EnrichmentStatus::Pending => write!(f, "pending"),
            EnrichmentStatus::Processing => write!(f, "processing"),
            EnrichmentStatus::Completed => write!(f, "completed"),
            EnrichmentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for EnrichmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(EnrichmentStatus::None),
            "pending" => Ok(EnrichmentStatus::Pending),
            "processing" => Ok(EnrichmentStatus::Processing),
            "completed" => Ok(EnrichmentStatus::Completed),
            "failed" => Ok(EnrichmentStatus::Failed),
            _ => Err(format!("unknown enrichment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub notes: Option<String>,
    pub enrichment_status: String,
    pub enriched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Partners
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Prospect,
    Active,
    Dormant,
}

impl std::fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartnerStatus::Prospect => write!(f, "prospect"),
            PartnerStatus::Active => write!(f, "active"),
            PartnerStatus::Dormant => write!(f, "dormant"),
        }
    }
}

impl std::str::FromStr for PartnerStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "prospect" => Ok(PartnerStatus::Prospect),
            "active" => Ok(PartnerStatus::Active),
            "dormant" => Ok(PartnerStatus::Dormant),
            _ => Err(format!("unknown partner status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub starts_on: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventContact {
    pub id: Uuid,
    pub event_id: Uuid,
    pub full_name: String,
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub followed_up: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Settings & credits
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SettingRow {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CreditUsage {
    pub id: Uuid,
    pub provider: String,
    pub period: String,
    pub used: i32,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Scans
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    Press,
    Registry,
    Linkedin,
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanKind::Press => write!(f, "press"),
            ScanKind::Registry => write!(f, "registry"),
            ScanKind::Linkedin => write!(f, "linkedin"),
        }
    }
}

impl std::str::FromStr for ScanKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "press" => Ok(ScanKind::Press),
            "registry" => Ok(ScanKind::Registry),
            "linkedin" => Ok(ScanKind::Linkedin),
            _ => Err(format!("unknown scan kind: {s}")),
        }
    }
}

/// Lifecycle of a one-shot background operation (scans, enrichment jobs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Pending => write!(f, "pending"),
            ScanStatus::Processing => write!(f, "processing"),
            ScanStatus::Completed => write!(f, "completed"),
            ScanStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ScanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScanStatus::Pending),
            "processing" => Ok(ScanStatus::Processing),
            "completed" => Ok(ScanStatus::Completed),
            "failed" => Ok(ScanStatus::Failed),
            _ => Err(format!("unknown scan status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Scan {
    pub id: Uuid,
    pub kind: String,
    pub params: serde_json::Value,
    pub status: String,
    pub signals_found: i32,
    pub signals_inserted: i32,
    pub duplicates_skipped: i32,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Enrichment jobs & tone analyses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnrichmentJob {
    pub id: Uuid,
    pub target_kind: String,
    pub target_id: Uuid,
    pub agent_task_id: Option<String>,
    pub status: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ToneAnalysis {
    pub id: Uuid,
    pub signal_id: Uuid,
    pub post_url: Option<String>,
    pub audience_mood: String,
    pub themes: serde_json::Value,
    pub outreach_angle: String,
    pub model: String,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_signal_kind_round_trip() {
        for kind in [
            SignalKind::Anniversary,
            SignalKind::Funding,
            SignalKind::Acquisition,
            SignalKind::LeadershipChange,
            SignalKind::Award,
            SignalKind::Expansion,
            SignalKind::Other,
        ] {
            assert_eq!(SignalKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_vocabulary_is_rejected() {
        assert!(SignalKind::from_str("ipo").is_err());
        assert!(SignalStatus::from_str("won").is_err());
        assert!(ScanKind::from_str("twitter").is_err());
    }

    #[test]
    fn test_status_display_matches_db_literals() {
        assert_eq!(ScanStatus::Pending.to_string(), "pending");
        assert_eq!(EnrichmentStatus::None.to_string(), "none");
        assert_eq!(SignalStatus::New.to_string(), "new");
    }
}
