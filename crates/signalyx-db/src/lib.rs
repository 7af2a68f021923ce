//! Signalyx Database Layer
//!
//! PostgreSQL repositories for every domain entity: signals, contacts,
//! partners, events and event contacts, settings, credit counters, scans,
//! enrichment jobs, and tone analyses. One repository struct per entity,
//! all raw SQL over a shared `PgPool`.

pub mod contacts;
pub mod credits;
pub mod enrichments;
pub mod error;
pub mod events;
pub mod partners;
pub mod pool;
pub mod scans;
pub mod schema;
pub mod settings;
pub mod signals;
pub mod tones;

pub use contacts::ContactRepository;
pub use credits::CreditUsageRepository;
pub use enrichments::EnrichmentJobRepository;
pub use error::{DbError, Result};
pub use events::EventRepository;
pub use partners::PartnerRepository;
pub use pool::{connect, MIGRATOR};
pub use scans::ScanRepository;
pub use schema::{
    Contact, CreditUsage, EnrichmentJob, EnrichmentStatus, Event, EventContact, Partner,
    PartnerStatus, Scan, ScanKind, ScanStatus, SettingRow, Signal, SignalKind, SignalOrigin,
    SignalStatus, ToneAnalysis,
};
pub use settings::SettingsRepository;
pub use signals::SignalRepository;
pub use tones::ToneAnalysisRepository;
