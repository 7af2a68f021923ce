//! Press RSS client (Google News query feeds).
//!
//! Public feeds, no credit cost. The feed URL pattern is
//! `https://news.google.com/rss/search?q={query}&hl=fr&gl=FR&ceid=FR:fr`.

use async_trait::async_trait;
use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use signalyx_common::OutboundClient;
use signalyx_db::schema::SignalOrigin;
use tracing::{debug, instrument};

use super::{infer_kind, SignalSource};
use crate::models::{ScanParams, SignalDraft};

const FEED_URL: &str = "https://news.google.com/rss/search";

pub struct RssPressClient {
    client: OutboundClient,
}

impl RssPressClient {
    pub fn new(client: OutboundClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    async fn fetch_feed(&self, query: &str) -> anyhow::Result<String> {
        let resp = self
            .client
            .get(FEED_URL)?
            .query(&[("q", query), ("hl", "fr"), ("gl", "FR"), ("ceid", "FR:fr")])
            .send()
            .await?;
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl SignalSource for RssPressClient {
    fn name(&self) -> &'static str {
        "rss"
    }

    async fn scan(&self, params: &ScanParams) -> anyhow::Result<Vec<SignalDraft>> {
        let query = params
            .query
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("RSS scan requires a query"))?;
        let xml = self.fetch_feed(query).await?;
        let items = parse_rss(&xml)?;
        debug!(n = items.len(), "RSS feed items");
        Ok(items
            .into_iter()
            .take(params.max_results())
            .filter_map(item_to_draft)
            .collect())
    }
}

// ── Feed parsing ───────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct RssItem {
    pub title: String,
    pub link: Option<String>,
    pub pub_date: Option<NaiveDate>,
    /// Outlet name from `<source>`, Google News' attribution element.
    pub source: Option<String>,
}

/// Parse an RSS 2.0 document into items. Only the elements the pipeline
/// needs are read; everything else is skipped.
pub fn parse_rss(xml: &str) -> anyhow::Result<Vec<RssItem>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<RssItem> = None;
    let mut in_title = false;
    let mut in_link = false;
    let mut in_pub_date = false;
    let mut in_source = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => current = Some(RssItem::default()),
                b"title" => in_title = current.is_some(),
                b"link" => in_link = current.is_some(),
                b"pubDate" => in_pub_date = current.is_some(),
                b"source" => in_source = current.is_some(),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        if !item.title.is_empty() {
                            items.push(item);
                        }
                    }
                }
                b"title" => in_title = false,
                b"link" => in_link = false,
                b"pubDate" => in_pub_date = false,
                b"source" => in_source = false,
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if let Some(ref mut item) = current {
                    let text = t.unescape().unwrap_or_default().to_string();
                    if in_title {
                        item.title = text;
                    } else if in_link {
                        item.link = Some(text);
                    } else if in_pub_date {
                        item.pub_date = parse_rfc2822_date(&text);
                    } else if in_source {
                        item.source = Some(text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => anyhow::bail!("RSS parse error: {e}"),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

/// RSS dates are RFC 2822 ("Sat, 14 Feb 2026 08:30:00 GMT").
fn parse_rfc2822_date(s: &str) -> Option<NaiveDate> {
    chrono::DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.date_naive())
}

fn item_to_draft(item: RssItem) -> Option<SignalDraft> {
    // Google News titles carry the outlet as a " - Outlet" suffix.
    let title = item
        .title
        .rsplit_once(" - ")
        .map(|(head, _)| head.to_string())
        .unwrap_or(item.title);

    let company = super::press::headline_company(&title).or(item.source)?;

    Some(SignalDraft {
        company_name: company,
        siren: None,
        kind: infer_kind(&title),
        title,
        summary: None,
        origin: SignalOrigin::Press,
        source_url: item.link,
        published_on: item.pub_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use signalyx_db::schema::SignalKind;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>"levée de fonds" - Google Actualités</title>
  <item>
    <title>Dougs lève 25 millions d'euros - La Tribune</title>
    <link>https://news.google.com/rss/articles/abc</link>
    <pubDate>Sat, 14 Feb 2026 08:30:00 GMT</pubDate>
    <source url="https://latribune.fr">La Tribune</source>
  </item>
  <item>
    <title>Groupe Berger rachète son concurrent - Les Echos</title>
    <link>https://news.google.com/rss/articles/def</link>
    <pubDate>Fri, 13 Feb 2026 17:02:11 GMT</pubDate>
    <source url="https://lesechos.fr">Les Echos</source>
  </item>
</channel></rss>"#;

    #[test]
    fn test_parse_rss_items() {
        let items = parse_rss(SAMPLE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Dougs lève 25 millions d'euros - La Tribune");
        assert_eq!(items[0].source.as_deref(), Some("La Tribune"));
        assert_eq!(items[0].pub_date, NaiveDate::from_ymd_opt(2026, 2, 14));
        assert_eq!(
            items[1].link.as_deref(),
            Some("https://news.google.com/rss/articles/def")
        );
    }

    #[test]
    fn test_item_to_draft_strips_outlet_suffix() {
        let items = parse_rss(SAMPLE).unwrap();
        let d = item_to_draft(items[0].clone()).unwrap();
        assert_eq!(d.title, "Dougs lève 25 millions d'euros");
        assert_eq!(d.company_name, "Dougs");
        assert_eq!(d.kind, SignalKind::Funding);
    }

    #[test]
    fn test_parse_rss_tolerates_empty_channel() {
        let items = parse_rss(r#"<rss version="2.0"><channel></channel></rss>"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_bad_date_is_none() {
        assert!(parse_rfc2822_date("le 14 février").is_none());
    }
}
