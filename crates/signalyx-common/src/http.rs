use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use crate::error::SignalyxError;

/// An allowlist-capped HTTP client. Every outbound integration call in
/// Signalyx goes through this client; requests to hosts outside the
/// allowlist are rejected before any connection is opened.
#[derive(Debug, Clone)]
pub struct OutboundClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl OutboundClient {
    /// Creates a client with the default allowlist of integration hosts.
    pub fn new() -> Result<Self, SignalyxError> {
        let mut allowlist = HashSet::new();
        let domains = vec![
            "newsapi.org",        // press search
            "news.google.com",    // press RSS feeds
            "api.pappers.fr",     // corporate registry
            "api.apify.com",      // LinkedIn engagement actors
            "api.manus.im",       // AI task-runner agents
            "api.openai.com",     // LLM tone analysis
            "api.anthropic.com",  // LLM tone analysis
            "localhost",          // local OpenAI-compatible endpoints
            "127.0.0.1",
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SignalyxError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist (e.g. a self-hosted
    /// OpenAI-compatible inference server).
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Checks whether a URL's host is covered by the allowlist, either
    /// exactly or as a subdomain of an allowed entry.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{allowed}")) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, SignalyxError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, SignalyxError> {
        self.check(url)?;
        Ok(self.client.post(url))
    }

    fn check(&self, url: &str) -> Result<(), SignalyxError> {
        if !self.is_allowed(url) {
            return Err(SignalyxError::Blocked(format!(
                "host not in outbound allowlist for URL {url}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist_covers_integrations() {
        let c = OutboundClient::new().unwrap();
        assert!(c.is_allowed("https://api.pappers.fr/v2/recherche"));
        assert!(c.is_allowed("https://newsapi.org/v2/everything?q=x"));
        assert!(c.is_allowed("https://api.apify.com/v2/acts/x/runs"));
    }

    #[test]
    fn test_subdomains_of_allowed_hosts_pass() {
        let c = OutboundClient::new().unwrap();
        assert!(c.is_allowed("https://eu.api.apify.com/v2/acts"));
    }

    #[test]
    fn test_unknown_host_is_rejected() {
        let c = OutboundClient::new().unwrap();
        assert!(!c.is_allowed("https://example.com/exfil"));
        assert!(c.get("https://example.com/exfil").is_err());
    }

    #[test]
    fn test_allow_domain_extends_the_list() {
        let mut c = OutboundClient::new().unwrap();
        assert!(!c.is_allowed("https://llm.internal.corp/v1"));
        c.allow_domain("llm.internal.corp");
        assert!(c.is_allowed("https://llm.internal.corp/v1"));
    }
}
