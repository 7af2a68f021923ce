//! End-to-end scan pipeline.
//!
//! One-shot flow for a single scan row:
//!   1. Mark the scan `processing`
//!   2. Gate on the provider's credit level
//!   3. Call each enabled source, tolerating per-source failures
//!   4. Collapse in-batch near-duplicates
//!   5. Insert drafts whose fingerprint is unseen
//!   6. Record credit usage
//!   7. Mark `completed` (or `failed`) — the row is the client's poll target
//!
//! No retries, no resumption: a failed scan is re-run by the user.

use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use signalyx_credits::{CreditLedger, Provider, UsageLevel};
use signalyx_db::schema::{NewSignal, ScanKind};
use signalyx_db::{ScanRepository, SignalRepository};

use crate::dedup::{collapse_similar, draft_hash};
use crate::models::ScanParams;
use crate::sources::SignalSource;

/// Repositories and accounting the pipeline writes through.
#[derive(Clone)]
pub struct ScanContext {
    pub signals: SignalRepository,
    pub scans: ScanRepository,
    pub ledger: CreditLedger,
}

/// Summary of a finished scan, mirrored into the scan row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanOutcome {
    pub scan_id: Uuid,
    pub found: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub source_errors: Vec<String>,
}

fn provider_for(kind: ScanKind) -> Option<Provider> {
    match kind {
        ScanKind::Press => Some(Provider::News),
        ScanKind::Registry => Some(Provider::Pappers),
        ScanKind::Linkedin => Some(Provider::Apify),
    }
}

/// Run one scan to completion, updating the scan row as it goes.
///
/// Returns the outcome for logging; API callers read the row instead.
#[instrument(skip(ctx, sources, params), fields(scan_id = %scan_id, kind = %kind))]
pub async fn run_scan(
    scan_id: Uuid,
    kind: ScanKind,
    params: ScanParams,
    ctx: ScanContext,
    sources: Vec<Arc<dyn SignalSource>>,
) -> ScanOutcome {
    let mut outcome = ScanOutcome {
        scan_id,
        found: 0,
        inserted: 0,
        duplicates: 0,
        source_errors: Vec::new(),
    };

    if let Err(e) = ctx.scans.mark_processing(scan_id).await {
        warn!(error = %e, "could not mark scan processing");
        return outcome;
    }

    // ── Credit gate ──────────────────────────────────────────────────────────
    if let Some(provider) = provider_for(kind) {
        match ctx.ledger.level(provider).await {
            Ok(UsageLevel::Blocked) => {
                let msg = format!(
                    "monthly credit limit reached for provider '{}'",
                    provider.as_str()
                );
                let _ = ctx.scans.mark_failed(scan_id, &msg).await;
                return outcome;
            }
            Ok(_) => {}
            Err(e) => {
                let _ = ctx.scans.mark_failed(scan_id, &e.to_string()).await;
                return outcome;
            }
        }
    }

    // ── Collect drafts from every source ─────────────────────────────────────
    let mut drafts = Vec::new();
    for source in &sources {
        match source.scan(&params).await {
            Ok(mut found) => {
                info!(source = source.name(), n = found.len(), "source scan done");
                drafts.append(&mut found);
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "source scan failed");
                outcome.source_errors.push(format!("{}: {e}", source.name()));
            }
        }
    }
    outcome.found = drafts.len();

    // Every source failed and nothing was found: surface it as a failure.
    if drafts.is_empty() && !outcome.source_errors.is_empty() {
        let _ = ctx
            .scans
            .mark_failed(scan_id, &outcome.source_errors.join("; "))
            .await;
        return outcome;
    }

    // ── Dedup and insert ─────────────────────────────────────────────────────
    let (drafts, in_batch_dupes) = collapse_similar(drafts);
    outcome.duplicates += in_batch_dupes;

    for draft in drafts {
        let hash = draft_hash(&draft);
        match ctx.signals.hash_exists(hash).await {
            Ok(true) => {
                outcome.duplicates += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "dedup lookup failed, inserting anyway");
            }
        }

        let new = NewSignal {
            company_name: draft.company_name,
            siren: draft.siren,
            kind: draft.kind,
            title: draft.title,
            summary: draft.summary,
            origin: draft.origin,
            source_url: draft.source_url,
            published_on: draft.published_on,
            dedup_hash: Some(hash),
        };
        match ctx.signals.insert(&new).await {
            Ok(_) => outcome.inserted += 1,
            Err(e) => warn!(error = %e, company = %new.company_name, "signal insert failed"),
        }
    }

    // ── Credits & completion ─────────────────────────────────────────────────
    if let Some(provider) = provider_for(kind) {
        // One unit per scan invocation.
        if let Err(e) = ctx.ledger.record(provider, 1).await {
            warn!(error = %e, "credit record failed");
        }
    }

    let result = ctx
        .scans
        .mark_completed(
            scan_id,
            outcome.found as i32,
            outcome.inserted as i32,
            outcome.duplicates as i32,
        )
        .await;
    if let Err(e) = result {
        warn!(error = %e, "could not mark scan completed");
    }

    info!(
        found = outcome.found,
        inserted = outcome.inserted,
        duplicates = outcome.duplicates,
        "scan finished"
    );
    outcome
}
