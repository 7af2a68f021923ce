//! LinkedIn engagement client (Apify actor).
//!
//! Runs a scraping actor synchronously and reads the dataset items it
//! produced: reactions and comments on the configured post URLs. Each
//! engaged person becomes a draft; the engagement text rides along in
//! the summary so tone analysis can pick it up later.

use async_trait::async_trait;
use signalyx_common::OutboundClient;
use signalyx_db::schema::{SignalKind, SignalOrigin};
use tracing::{debug, instrument};

use super::SignalSource;
use crate::models::{ScanParams, SignalDraft};

const APIFY_BASE: &str = "https://api.apify.com/v2/acts";
const DEFAULT_ACTOR: &str = "curious_coder~linkedin-post-reactions-scraper";

pub struct LinkedinClient {
    client: OutboundClient,
    token: String,
    actor: String,
}

impl LinkedinClient {
    pub fn new(client: OutboundClient, token: String, actor: Option<String>) -> Self {
        Self {
            client,
            token,
            actor: actor.unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
        }
    }

    /// One synchronous actor run; the response body is the dataset.
    #[instrument(skip(self, post_urls))]
    async fn run_actor(
        &self,
        post_urls: &[String],
        max_items: usize,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let url = format!(
            "{APIFY_BASE}/{}/run-sync-get-dataset-items",
            self.actor.replace('/', "~")
        );
        let body = serde_json::json!({
            "postUrls": post_urls,
            "maxItems": max_items,
        });

        let resp = self
            .client
            .post(&url)?
            .query(&[("token", self.token.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let json: serde_json::Value = resp.json().await?;
        if !status.is_success() {
            anyhow::bail!(
                "Apify actor run failed [{status}]: {}",
                json["error"]["message"].as_str().unwrap_or("unknown")
            );
        }

        Ok(json.as_array().cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SignalSource for LinkedinClient {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    async fn scan(&self, params: &ScanParams) -> anyhow::Result<Vec<SignalDraft>> {
        let post_urls = params
            .post_urls
            .as_deref()
            .filter(|urls| !urls.is_empty())
            .ok_or_else(|| anyhow::anyhow!("LinkedIn scan requires at least one post URL"))?;

        let items = self.run_actor(post_urls, params.max_results()).await?;
        debug!(n = items.len(), "Apify dataset items");
        Ok(items.iter().filter_map(item_to_draft).collect())
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────

fn item_to_draft(item: &serde_json::Value) -> Option<SignalDraft> {
    let person = item["name"]
        .as_str()
        .or_else(|| item["authorName"].as_str())?
        .trim()
        .to_string();
    if person.is_empty() {
        return None;
    }

    // Company comes from the headline ("Role chez Company") or an
    // explicit field, depending on the actor version.
    let company = item["company"]
        .as_str()
        .map(String::from)
        .or_else(|| headline_employer(item["headline"].as_str()?))?;

    let reaction = item["reactionType"].as_str().unwrap_or("comment");
    let engagement_text = item["commentText"].as_str().unwrap_or("").trim().to_string();

    let mut draft = SignalDraft::new(
        company,
        SignalKind::Other,
        format!("{person} a réagi ({reaction}) à une publication suivie"),
        SignalOrigin::Linkedin,
    );
    draft.source_url = item["postUrl"].as_str().map(String::from);
    draft.summary = if engagement_text.is_empty() {
        item["headline"].as_str().map(String::from)
    } else {
        Some(engagement_text)
    };
    Some(draft)
}

/// "Directeur commercial chez Acme Conseil" → "Acme Conseil".
fn headline_employer(headline: &str) -> Option<String> {
    let lowered = headline.to_lowercase();
    let idx = lowered
        .find(" chez ")
        .map(|i| i + " chez ".len())
        .or_else(|| lowered.find(" @ ").map(|i| i + 3))?;
    let employer = headline[idx..].split(['|', '·', ',']).next()?.trim();
    if employer.is_empty() {
        None
    } else {
        Some(employer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_to_draft_reaction() {
        let item = serde_json::json!({
            "name": "Claire Martin",
            "headline": "Directrice commerciale chez Acme Conseil | B2B SaaS",
            "reactionType": "like",
            "postUrl": "https://www.linkedin.com/posts/xyz"
        });
        let d = item_to_draft(&item).unwrap();
        assert_eq!(d.company_name, "Acme Conseil");
        assert_eq!(d.origin, SignalOrigin::Linkedin);
        assert!(d.title.contains("Claire Martin"));
        assert_eq!(d.summary.as_deref(), Some("Directrice commerciale chez Acme Conseil | B2B SaaS"));
    }

    #[test]
    fn test_item_to_draft_comment_keeps_text() {
        let item = serde_json::json!({
            "authorName": "Paul Durand",
            "company": "Durand & Fils",
            "commentText": "Très intéressé par cette approche, on en discute ?",
        });
        let d = item_to_draft(&item).unwrap();
        assert_eq!(d.company_name, "Durand & Fils");
        assert_eq!(
            d.summary.as_deref(),
            Some("Très intéressé par cette approche, on en discute ?")
        );
    }

    #[test]
    fn test_item_without_employer_is_skipped() {
        let item = serde_json::json!({
            "name": "Anonyme",
            "headline": "Ouvert aux opportunités"
        });
        assert!(item_to_draft(&item).is_none());
    }

    #[test]
    fn test_headline_employer_at_sign() {
        assert_eq!(
            headline_employer("CTO @ Nexloop · ex-Dataiku").as_deref(),
            Some("Nexloop")
        );
    }
}
