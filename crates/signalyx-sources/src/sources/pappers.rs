//! Pappers corporate-registry client.
//!
//! Two uses:
//! 1. Anniversary scans — find companies whose registration date lands
//!    N years before a date inside the scan window.
//! 2. Company sheets — resolve a SIREN to registry details for the
//!    signal detail view.
//!
//! API: https://api.pappers.fr/v2 (token via `api_token` query param).

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use signalyx_common::OutboundClient;
use signalyx_db::schema::{SignalKind, SignalOrigin};
use tracing::{debug, instrument, warn};

use super::SignalSource;
use crate::models::{ScanParams, SignalDraft};

const SEARCH_URL: &str = "https://api.pappers.fr/v2/recherche";
const COMPANY_URL: &str = "https://api.pappers.fr/v2/entreprise";

const DEFAULT_MILESTONES: &[u32] = &[10, 20, 50];
const DEFAULT_WINDOW_DAYS: i64 = 30;

pub struct PappersClient {
    client: OutboundClient,
    api_key: String,
}

impl PappersClient {
    pub fn new(client: OutboundClient, api_key: String) -> Self {
        Self { client, api_key }
    }

    #[instrument(skip(self))]
    async fn search_by_creation_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        max_results: usize,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let resp = self
            .client
            .get(SEARCH_URL)?
            .query(&[
                ("api_token", self.api_key.as_str()),
                ("date_creation_min", &from.format("%Y-%m-%d").to_string()),
                ("date_creation_max", &to.format("%Y-%m-%d").to_string()),
                ("par_page", &max_results.min(100).to_string()),
                ("precision", "standard"),
            ])
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;
        if let Some(err) = body["erreur"].as_str() {
            anyhow::bail!("Pappers error: {err}");
        }

        Ok(body["resultats"].as_array().cloned().unwrap_or_default())
    }

    /// Fetch the registry sheet for one company.
    #[instrument(skip(self))]
    pub async fn company_sheet(&self, siren: &str) -> anyhow::Result<Option<CompanySheet>> {
        let resp = self
            .client
            .get(COMPANY_URL)?
            .query(&[("api_token", self.api_key.as_str()), ("siren", siren)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body: serde_json::Value = resp.json().await?;
        Ok(Some(sheet_from_value(&body)))
    }
}

#[async_trait]
impl SignalSource for PappersClient {
    fn name(&self) -> &'static str {
        "registry"
    }

    async fn scan(&self, params: &ScanParams) -> anyhow::Result<Vec<SignalDraft>> {
        let today = Utc::now().date_naive();
        let window = params.window_days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, 366);
        let milestones = params
            .anniversary_years
            .clone()
            .unwrap_or_else(|| DEFAULT_MILESTONES.to_vec());

        let mut drafts = Vec::new();
        for years in milestones {
            let Some(from) = shift_years(today, years) else {
                warn!(years, "anniversary milestone out of range, skipped");
                continue;
            };
            let Some(to) = shift_years(today + Duration::days(window), years) else {
                continue;
            };

            let hits = self
                .search_by_creation_range(from, to, params.max_results())
                .await?;
            debug!(years, n = hits.len(), "registry anniversary hits");
            drafts.extend(hits.iter().filter_map(|hit| hit_to_draft(hit, years)));
        }
        Ok(drafts)
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────

/// Company registry sheet, trimmed to the fields the dashboard shows.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompanySheet {
    pub siren: Option<String>,
    pub name: Option<String>,
    pub legal_form: Option<String>,
    pub naf_label: Option<String>,
    pub city: Option<String>,
    pub created_on: Option<NaiveDate>,
    pub headcount_range: Option<String>,
}

fn sheet_from_value(body: &serde_json::Value) -> CompanySheet {
    CompanySheet {
        siren: body["siren"].as_str().map(String::from),
        name: body["nom_entreprise"].as_str().map(String::from),
        legal_form: body["forme_juridique"].as_str().map(String::from),
        naf_label: body["libelle_code_naf"].as_str().map(String::from),
        city: body["siege"]["ville"].as_str().map(String::from),
        created_on: parse_fr_date(body["date_creation"].as_str()),
        headcount_range: body["tranche_effectif"].as_str().map(String::from),
    }
}

fn hit_to_draft(hit: &serde_json::Value, years: u32) -> Option<SignalDraft> {
    let name = hit["nom_entreprise"].as_str()?.to_string();
    let created = parse_fr_date(hit["date_creation"].as_str())?;
    let anniversary = shift_years_signed(created, years as i32)?;

    let mut draft = SignalDraft::new(
        name.clone(),
        SignalKind::Anniversary,
        format!("{name} fête ses {years} ans"),
        SignalOrigin::Registry,
    );
    draft.siren = hit["siren"].as_str().map(String::from);
    draft.summary = Some(format!(
        "Immatriculée le {}, {years} ans le {}.",
        created.format("%d/%m/%Y"),
        anniversary.format("%d/%m/%Y")
    ));
    draft.published_on = Some(anniversary);
    Some(draft)
}

/// Registration dates arrive as ISO "YYYY-MM-DD".
fn parse_fr_date(s: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s?, "%Y-%m-%d").ok()
}

/// `date - years`, handling Feb 29 by clamping to Feb 28.
fn shift_years(date: NaiveDate, years_back: u32) -> Option<NaiveDate> {
    shift_years_signed(date, -(years_back as i32))
}

fn shift_years_signed(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let year = date.year() + delta;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_to_draft_anniversary() {
        let hit = serde_json::json!({
            "siren": "552100554",
            "nom_entreprise": "Boulangerie Petit",
            "date_creation": "2016-03-01"
        });
        let d = hit_to_draft(&hit, 10).unwrap();
        assert_eq!(d.company_name, "Boulangerie Petit");
        assert_eq!(d.kind, SignalKind::Anniversary);
        assert_eq!(d.siren.as_deref(), Some("552100554"));
        assert_eq!(d.published_on, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert!(d.title.contains("10 ans"));
    }

    #[test]
    fn test_hit_without_creation_date_is_skipped() {
        let hit = serde_json::json!({ "nom_entreprise": "Sans Date SARL" });
        assert!(hit_to_draft(&hit, 20).is_none());
    }

    #[test]
    fn test_shift_years_handles_leap_day() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            shift_years(leap, 10),
            NaiveDate::from_ymd_opt(2014, 2, 28)
        );
    }

    #[test]
    fn test_sheet_from_value() {
        let body = serde_json::json!({
            "siren": "123456789",
            "nom_entreprise": "Acme Conseil",
            "forme_juridique": "SAS",
            "libelle_code_naf": "Conseil en systèmes informatiques",
            "siege": { "ville": "Nantes" },
            "date_creation": "2006-06-12",
            "tranche_effectif": "20 à 49 salariés"
        });
        let sheet = sheet_from_value(&body);
        assert_eq!(sheet.name.as_deref(), Some("Acme Conseil"));
        assert_eq!(sheet.city.as_deref(), Some("Nantes"));
        assert_eq!(sheet.created_on, NaiveDate::from_ymd_opt(2006, 6, 12));
    }
}
