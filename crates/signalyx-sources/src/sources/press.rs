//! Press search client (newsapi.org `/v2/everything`).
//!
//! One request per scan: query terms, French language, newest first.
//! Each article becomes a draft whose kind is inferred from the headline.

use async_trait::async_trait;
use chrono::NaiveDate;
use signalyx_common::OutboundClient;
use signalyx_db::schema::SignalOrigin;
use tracing::{debug, instrument};

use super::{infer_kind, SignalSource};
use crate::models::{ScanParams, SignalDraft};

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

pub struct PressClient {
    client: OutboundClient,
    api_key: String,
}

impl PressClient {
    pub fn new(client: OutboundClient, api_key: String) -> Self {
        Self { client, api_key }
    }

    #[instrument(skip(self))]
    async fn search_articles(
        &self,
        query: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let resp = self
            .client
            .get(EVERYTHING_URL)?
            .query(&[
                ("q", query),
                ("language", "fr"),
                ("sortBy", "publishedAt"),
                ("pageSize", &max_results.to_string()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;
        if body["status"].as_str() == Some("error") {
            anyhow::bail!(
                "news API error: {}",
                body["message"].as_str().unwrap_or("unknown")
            );
        }

        Ok(body["articles"].as_array().cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SignalSource for PressClient {
    fn name(&self) -> &'static str {
        "press"
    }

    async fn scan(&self, params: &ScanParams) -> anyhow::Result<Vec<SignalDraft>> {
        let query = params
            .query
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("press scan requires a query"))?;
        let articles = self.search_articles(query, params.max_results()).await?;
        debug!(n = articles.len(), "press search results");
        Ok(articles.iter().filter_map(article_to_draft).collect())
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────

fn article_to_draft(article: &serde_json::Value) -> Option<SignalDraft> {
    let title = article["title"].as_str()?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    // The outlet name is the best company guess the API offers; the
    // headline's leading segment is usually the subject company.
    let company = headline_company(&title)
        .or_else(|| article["source"]["name"].as_str().map(String::from))?;

    let published_on = article["publishedAt"]
        .as_str()
        .and_then(|ts| ts.get(..10))
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    Some(SignalDraft {
        company_name: company,
        siren: None,
        kind: infer_kind(&title),
        title: title.clone(),
        summary: article["description"].as_str().map(String::from),
        origin: SignalOrigin::Press,
        source_url: article["url"].as_str().map(String::from),
        published_on,
    })
}

/// Extract the subject company from a headline of the common French press
/// shape "Company verbe ..." or "Company : ...". Returns None when the
/// leading segment looks like a sentence rather than a name.
pub(crate) fn headline_company(title: &str) -> Option<String> {
    let head = title.split([':', '—', '-']).next()?.trim();
    let words: Vec<&str> = head.split_whitespace().collect();

    // A company name starts uppercase and is short.
    if words.is_empty() || !words[0].chars().next()?.is_uppercase() {
        return None;
    }

    const VERBS: &[&str] = &["lève", "rachète", "nomme", "ouvre", "inaugure", "fête", "remporte", "annonce", "acquiert"];
    match words
        .iter()
        .position(|w| VERBS.contains(&w.to_lowercase().as_str()))
    {
        // "Company verbe ..." — the name is whatever precedes the verb.
        Some(cut) if cut > 0 && cut <= 4 => Some(words[..cut].join(" ")),
        Some(_) => None,
        // "Company : ..." — accept only a short leading segment.
        None if words.len() <= 4 => Some(words.join(" ")),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signalyx_db::schema::SignalKind;

    #[test]
    fn test_article_to_draft_full() {
        let article = serde_json::json!({
            "title": "Dougs lève 25 millions d'euros pour accélérer",
            "description": "La startup lyonnaise annonce une série B.",
            "url": "https://presse.example/dougs",
            "publishedAt": "2026-02-14T08:30:00Z",
            "source": { "name": "La Tribune" }
        });
        let d = article_to_draft(&article).unwrap();
        assert_eq!(d.company_name, "Dougs");
        assert_eq!(d.kind, SignalKind::Funding);
        assert_eq!(d.origin, SignalOrigin::Press);
        assert_eq!(d.source_url.as_deref(), Some("https://presse.example/dougs"));
        assert_eq!(
            d.published_on,
            NaiveDate::from_ymd_opt(2026, 2, 14)
        );
    }

    #[test]
    fn test_article_without_title_is_skipped() {
        let article = serde_json::json!({ "url": "https://presse.example/x" });
        assert!(article_to_draft(&article).is_none());
    }

    #[test]
    fn test_headline_company_with_colon() {
        assert_eq!(
            headline_company("Alan : la licorne santé ouvre un bureau à Lyon").as_deref(),
            Some("Alan")
        );
    }

    #[test]
    fn test_headline_company_stops_at_verb() {
        assert_eq!(
            headline_company("Groupe Berger rachète son concurrent alsacien").as_deref(),
            Some("Groupe Berger")
        );
    }

    #[test]
    fn test_headline_company_rejects_sentences() {
        assert!(headline_company("le marché de la cybersécurité explose en France").is_none());
    }

    #[test]
    fn test_draft_falls_back_to_outlet_name() {
        let article = serde_json::json!({
            "title": "la région salue une levée de fonds exemplaire",
            "source": { "name": "Ouest-France" }
        });
        let d = article_to_draft(&article).unwrap();
        assert_eq!(d.company_name, "Ouest-France");
        assert_eq!(d.kind, SignalKind::Funding);
    }
}
