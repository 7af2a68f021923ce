//! Shared application state for the web server.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use signalyx_agents::AgentTaskClient;
use signalyx_common::{ApiError, OutboundClient};
use signalyx_config::AppConfig;
use signalyx_credits::CreditLedger;
use signalyx_db::{
    ContactRepository, CreditUsageRepository, EnrichmentJobRepository, EventRepository,
    PartnerRepository, ScanRepository, SettingsRepository, SignalRepository,
    ToneAnalysisRepository,
};
use signalyx_llm::backend::{AnthropicBackend, OpenAiBackend, OpenAiCompatibleBackend};
use signalyx_llm::ToneAnalyzer;
use signalyx_sources::sources::pappers::PappersClient;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub http: OutboundClient,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let mut http = OutboundClient::new()?;
        // A self-hosted task-runner lives outside the default allowlist;
        // admit its host explicitly.
        if let Some(base) = &config.providers.agent_base_url {
            if let Some(host) = url_host(base) {
                http.allow_domain(&host);
            }
        }
        Ok(Self {
            db,
            config: Arc::new(config),
            http,
        })
    }

    // ── Repositories ─────────────────────────────────────────────────────────

    pub fn signals(&self) -> SignalRepository {
        SignalRepository::new(self.db.clone())
    }

    pub fn contacts(&self) -> ContactRepository {
        ContactRepository::new(self.db.clone())
    }

    pub fn partners(&self) -> PartnerRepository {
        PartnerRepository::new(self.db.clone())
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.db.clone())
    }

    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.db.clone())
    }

    pub fn scans(&self) -> ScanRepository {
        ScanRepository::new(self.db.clone())
    }

    pub fn enrichment_jobs(&self) -> EnrichmentJobRepository {
        EnrichmentJobRepository::new(self.db.clone())
    }

    pub fn tones(&self) -> ToneAnalysisRepository {
        ToneAnalysisRepository::new(self.db.clone())
    }

    pub fn ledger(&self) -> CreditLedger {
        CreditLedger::new(CreditUsageRepository::new(self.db.clone()), self.config.credits)
    }

    // ── Credentials ──────────────────────────────────────────────────────────

    /// Resolve a credential: the settings table wins, the config file is
    /// the bootstrap fallback. Missing credentials are a 400, not a 500:
    /// the fix belongs to the operator, not the code.
    pub async fn credential(
        &self,
        setting_key: &str,
        config_value: Option<&SecretString>,
    ) -> Result<String, ApiError> {
        if let Some(value) = self
            .settings()
            .get_string(setting_key)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
        {
            if !value.is_empty() {
                return Ok(value);
            }
        }
        config_value
            .map(|s| s.expose_secret().to_string())
            .ok_or_else(|| {
                ApiError::BadRequest(format!("credential '{setting_key}' is not configured"))
            })
    }

    // ── Integration clients ──────────────────────────────────────────────────

    pub async fn pappers_client(&self) -> Result<PappersClient, ApiError> {
        let key = self
            .credential("pappers_api_key", self.config.providers.pappers_api_key.as_ref())
            .await?;
        Ok(PappersClient::new(self.http.clone(), key))
    }

    pub async fn agent_client(&self) -> Result<AgentTaskClient, ApiError> {
        let key = self
            .credential("agent_api_key", self.config.providers.agent_api_key.as_ref())
            .await?;
        Ok(AgentTaskClient::new(
            self.http.clone(),
            key,
            self.config.providers.agent_base_url.clone(),
        ))
    }

    pub async fn tone_analyzer(&self) -> Result<ToneAnalyzer, ApiError> {
        let llm = &self.config.llm;
        let key = self.credential("llm_api_key", llm.api_key.as_ref()).await;
        let backend: Arc<dyn signalyx_llm::LlmBackend> = match llm.provider.as_str() {
            "openai" => Arc::new(OpenAiBackend::new(key?, llm.model.clone())),
            "anthropic" => Arc::new(AnthropicBackend::new(key?, llm.model.clone())),
            "compatible" => {
                let base = llm.base_url.clone().ok_or_else(|| {
                    ApiError::BadRequest("llm.base_url is required for provider 'compatible'".into())
                })?;
                Arc::new(OpenAiCompatibleBackend::new(base, llm.model.clone(), key.ok()))
            }
            other => {
                return Err(ApiError::BadRequest(format!("unknown llm provider '{other}'")))
            }
        };
        Ok(ToneAnalyzer::new(backend))
    }
}

fn url_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
}
