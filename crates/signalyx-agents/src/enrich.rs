//! Enrichment orchestration.
//!
//! Flow for one job: create the agent task, poll it on a fixed interval
//! up to a fixed attempt cap, parse the output, apply it to the target
//! row, and move the job through `processing` → `completed`/`failed`.
//! The SPA polls the job row; nothing here is durable or resumable.

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use signalyx_credits::{CreditLedger, Provider, UsageLevel};
use signalyx_db::schema::{Contact, EnrichmentStatus, Signal};
use signalyx_db::signals::SignalPatch;
use signalyx_db::{ContactRepository, EnrichmentJobRepository, SignalRepository};

use crate::client::{AgentTaskClient, AgentTaskState};

/// What an enrichment job operates on.
#[derive(Debug, Clone)]
pub enum EnrichmentTarget {
    Contact(Contact),
    Signal(Signal),
}

impl EnrichmentTarget {
    pub fn kind_str(&self) -> &'static str {
        match self {
            EnrichmentTarget::Contact(_) => "contact",
            EnrichmentTarget::Signal(_) => "signal",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            EnrichmentTarget::Contact(c) => c.id,
            EnrichmentTarget::Signal(s) => s.id,
        }
    }
}

/// Fixed-interval polling knobs. A plain loop, not a scheduler.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

/// Repositories and accounting the orchestration writes through.
#[derive(Clone)]
pub struct EnrichmentContext {
    pub jobs: EnrichmentJobRepository,
    pub contacts: ContactRepository,
    pub signals: SignalRepository,
    pub ledger: CreditLedger,
}

// ── Prompts ───────────────────────────────────────────────────────────────────

pub fn contact_prompt(contact: &Contact) -> String {
    format!(
        "Recherche les informations professionnelles publiques de {name}{company}. \
         Réponds uniquement avec un objet JSON contenant les clés \"role\", \
         \"email\" et \"linkedin_url\" (null si introuvable).",
        name = contact.full_name,
        company = contact
            .company_name
            .as_deref()
            .map(|c| format!(", qui travaille chez {c}"))
            .unwrap_or_default(),
    )
}

pub fn signal_prompt(signal: &Signal) -> String {
    format!(
        "Recherche les informations publiques de l'entreprise française \
         \"{company}\"{siren}. Réponds uniquement avec un objet JSON contenant \
         les clés \"siren\", \"website\", \"headcount\" et \"summary\" \
         (null si introuvable).",
        company = signal.company_name,
        siren = signal
            .siren
            .as_deref()
            .map(|s| format!(" (SIREN {s})"))
            .unwrap_or_default(),
    )
}

// ── Output parsing ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ContactEnrichment {
    pub role: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CompanyEnrichment {
    pub siren: Option<String>,
    pub website: Option<String>,
    pub headcount: Option<String>,
    pub summary: Option<String>,
}

/// Agents wrap JSON in prose or fences often enough that we extract the
/// first object literal instead of parsing the whole reply.
pub fn extract_json_object(output: &str) -> Option<serde_json::Value> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&output[start..=end]).ok()
}

// ── Orchestration ─────────────────────────────────────────────────────────────

/// Run one enrichment job to completion. Called from a spawned task; the
/// handler returns the job id immediately and the SPA polls the row.
#[instrument(skip(ctx, client, target, poll), fields(job_id = %job_id, target_kind = target.kind_str()))]
pub async fn run_enrichment(
    job_id: Uuid,
    target: EnrichmentTarget,
    ctx: EnrichmentContext,
    client: AgentTaskClient,
    poll: PollSettings,
) {
    // Credit gate first, before any outbound call.
    match ctx.ledger.level(Provider::Agent).await {
        Ok(UsageLevel::Blocked) => {
            fail(&ctx, job_id, &target, "monthly agent credit limit reached").await;
            return;
        }
        Ok(_) => {}
        Err(e) => {
            fail(&ctx, job_id, &target, &e.to_string()).await;
            return;
        }
    }

    let prompt = match &target {
        EnrichmentTarget::Contact(c) => contact_prompt(c),
        EnrichmentTarget::Signal(s) => signal_prompt(s),
    };

    let task_id = match client.create_task(&prompt).await {
        Ok(id) => id,
        Err(e) => {
            fail(&ctx, job_id, &target, &format!("task creation failed: {e}")).await;
            return;
        }
    };

    if let Err(e) = ctx.jobs.mark_processing(job_id, &task_id).await {
        warn!(error = %e, "could not mark job processing");
    }
    if let EnrichmentTarget::Contact(c) = &target {
        let _ = ctx
            .contacts
            .set_enrichment_status(c.id, EnrichmentStatus::Processing)
            .await;
    }
    if let Err(e) = ctx.ledger.record(Provider::Agent, 1).await {
        warn!(error = %e, "agent credit record failed");
    }

    // Fixed-interval poll loop.
    let mut output = None;
    let mut last_error = format!(
        "agent task did not finish within {} attempts",
        poll.max_attempts
    );
    for attempt in 0..poll.max_attempts {
        tokio::time::sleep(poll.interval).await;
        match client.get_task(&task_id).await {
            Ok(status) if status.state == AgentTaskState::Finished => {
                output = status.output;
                break;
            }
            Ok(status) if status.state == AgentTaskState::Failed => {
                last_error = status
                    .error
                    .unwrap_or_else(|| "agent task failed".to_string());
                break;
            }
            Ok(_) => {}
            Err(e) => {
                // A single failed poll is not fatal; the cap bounds us.
                warn!(attempt, error = %e, "poll failed");
            }
        }
    }

    let Some(output) = output else {
        fail(&ctx, job_id, &target, &last_error).await;
        return;
    };

    let Some(parsed) = extract_json_object(&output) else {
        fail(&ctx, job_id, &target, "agent output contained no JSON object").await;
        return;
    };

    if let Err(e) = apply(&ctx, &target, &parsed).await {
        fail(&ctx, job_id, &target, &format!("applying enrichment failed: {e}")).await;
        return;
    }

    if let Err(e) = ctx.jobs.mark_completed(job_id, &parsed).await {
        warn!(error = %e, "could not mark job completed");
    }
    info!("enrichment completed");
}

async fn apply(
    ctx: &EnrichmentContext,
    target: &EnrichmentTarget,
    parsed: &serde_json::Value,
) -> anyhow::Result<()> {
    match target {
        EnrichmentTarget::Contact(c) => {
            let data: ContactEnrichment = serde_json::from_value(parsed.clone())?;
            ctx.contacts
                .apply_enrichment(
                    c.id,
                    data.role.as_deref(),
                    data.email.as_deref(),
                    data.linkedin_url.as_deref(),
                )
                .await?;
        }
        EnrichmentTarget::Signal(s) => {
            let data: CompanyEnrichment = serde_json::from_value(parsed.clone())?;
            // Registry id and a richer summary are the only fields a
            // signal can absorb; the rest stays in the job result JSON.
            let patch = SignalPatch {
                siren: data.siren.filter(|s| !s.is_empty()),
                summary: data.summary.filter(|s| !s.is_empty()),
                ..Default::default()
            };
            ctx.signals.update(s.id, &patch).await?;
        }
    }
    Ok(())
}

async fn fail(ctx: &EnrichmentContext, job_id: Uuid, target: &EnrichmentTarget, error: &str) {
    warn!(error, "enrichment failed");
    if let Err(e) = ctx.jobs.mark_failed(job_id, error).await {
        warn!(error = %e, "could not mark job failed");
    }
    if let EnrichmentTarget::Contact(c) = target {
        let _ = ctx
            .contacts
            .set_enrichment_status(c.id, EnrichmentStatus::Failed)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_contact() -> Contact {
        Contact {
            id: Uuid::new_v4(),
            full_name: "Claire Martin".to_string(),
            role: None,
            company_name: Some("Acme Conseil".to_string()),
            email: None,
            phone: None,
            linkedin_url: None,
            notes: None,
            enrichment_status: "none".to_string(),
            enriched_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_contact_prompt_mentions_company() {
        let prompt = contact_prompt(&sample_contact());
        assert!(prompt.contains("Claire Martin"));
        assert!(prompt.contains("Acme Conseil"));
        assert!(prompt.contains("linkedin_url"));
    }

    #[test]
    fn test_extract_json_object_from_prose() {
        let output = "Voici le résultat demandé :\n```json\n{\"role\": \"DG\", \"email\": null, \"linkedin_url\": null}\n```\nBonne journée.";
        let v = extract_json_object(output).unwrap();
        let parsed: ContactEnrichment = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.role.as_deref(), Some("DG"));
        assert_eq!(parsed.email, None);
    }

    #[test]
    fn test_extract_json_object_none_for_prose_only() {
        assert!(extract_json_object("aucun résultat trouvé").is_none());
    }

    #[test]
    fn test_company_enrichment_parses_partial() {
        let v = extract_json_object(r#"{"siren": "123456789", "summary": "ESN nantaise"}"#).unwrap();
        let parsed: CompanyEnrichment = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.siren.as_deref(), Some("123456789"));
        assert!(parsed.website.is_none());
    }
}
