//! LLM backend trait and concrete implementations.
//!
//! Backends:
//!   OpenAiBackend           — OpenAI chat completions
//!   AnthropicBackend        — Anthropic Messages API (claude-*)
//!   OpenAiCompatibleBackend — any OpenAI-compatible endpoint (vLLM,
//!                             LMStudio, OpenRouter, …)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },
}

// ── Request / Response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String, // "system" | "user" | "assistant"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError>;
    fn model_id(&self) -> &str;
    fn is_local(&self) -> bool;
}

// ── Shared helpers ────────────────────────────────────────────────────────────

async fn read_json_checked(resp: reqwest::Response) -> Result<serde_json::Value, LlmError> {
    let status = resp.status().as_u16();
    let body: serde_json::Value = resp.json().await?;
    if status >= 400 {
        let message = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(LlmError::Api { status, message });
    }
    Ok(body)
}

fn parse_openai_reply(json: &serde_json::Value, fallback_model: &str) -> LlmResponse {
    LlmResponse {
        content: json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string(),
        model: json["model"].as_str().unwrap_or(fallback_model).to_string(),
        prompt_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    }
}

// ── OpenAI ────────────────────────────────────────────────────────────────────

pub struct OpenAiBackend {
    pub model: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = serde_json::json!({
            "model":       &self.model,
            "messages":    req.messages,
            "max_tokens":  req.max_tokens.unwrap_or(1024),
            "temperature": req.temperature.unwrap_or(0.2),
        });
        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let json = read_json_checked(resp).await?;
        Ok(parse_openai_reply(&json, &self.model))
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_local(&self) -> bool {
        false
    }
}

// ── Anthropic ─────────────────────────────────────────────────────────────────

pub struct AnthropicBackend {
    pub model: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        // Messages API wants the system prompt outside the message list.
        let system = req
            .messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.clone());

        let messages: Vec<serde_json::Value> = req
            .messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| serde_json::json!({"role": m.role, "content": m.content}))
            .collect();

        let mut body = serde_json::json!({
            "model":      &self.model,
            "messages":   messages,
            "max_tokens": req.max_tokens.unwrap_or(1024),
        });
        if let Some(system) = system {
            body["system"] = serde_json::Value::String(system);
        }

        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;
        let json = read_json_checked(resp).await?;

        let content = json["content"]
            .as_array()
            .and_then(|blocks| blocks.first())
            .and_then(|b| b["text"].as_str())
            .unwrap_or("")
            .to_string();

        Ok(LlmResponse {
            content,
            model: json["model"].as_str().unwrap_or(&self.model).to_string(),
            prompt_tokens: json["usage"]["input_tokens"].as_u64().unwrap_or(0) as u32,
            completion_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0) as u32,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_local(&self) -> bool {
        false
    }
}

// ── OpenAI-compatible ─────────────────────────────────────────────────────────

pub struct OpenAiCompatibleBackend {
    pub base_url: String,
    pub model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatibleBackend {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(k) => req.bearer_auth(k),
            None => req,
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatibleBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model":       &self.model,
            "messages":    req.messages,
            "max_tokens":  req.max_tokens.unwrap_or(1024),
            "temperature": req.temperature.unwrap_or(0.2),
        });
        let resp = self.auth(self.client.post(&url)).json(&body).send().await?;
        let json = read_json_checked(resp).await?;
        Ok(parse_openai_reply(&json, &self.model))
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_local(&self) -> bool {
        self.base_url.contains("localhost") || self.base_url.contains("127.0.0.1")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_backend_identity() {
        let b = OpenAiBackend::new("sk-test", "gpt-4o-mini");
        assert!(!b.is_local());
        assert_eq!(b.model_id(), "gpt-4o-mini");
    }

    #[test]
    fn test_anthropic_backend_identity() {
        let b = AnthropicBackend::new("sk-ant-test", "claude-sonnet-4-5");
        assert!(!b.is_local());
        assert_eq!(b.model_id(), "claude-sonnet-4-5");
    }

    #[test]
    fn test_compatible_backend_local_detection() {
        let local = OpenAiCompatibleBackend::new("http://localhost:1234", "local-model", None);
        assert!(local.is_local());
        let remote =
            OpenAiCompatibleBackend::new("https://openrouter.ai/api", "some-model", None);
        assert!(!remote.is_local());
    }

    #[test]
    fn test_parse_openai_reply_shape() {
        let json = serde_json::json!({
            "model": "gpt-4o-mini-2024",
            "choices": [{"message": {"role": "assistant", "content": "bonjour"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        });
        let r = parse_openai_reply(&json, "fallback");
        assert_eq!(r.content, "bonjour");
        assert_eq!(r.model, "gpt-4o-mini-2024");
        assert_eq!(r.prompt_tokens, 12);
        assert_eq!(r.completion_tokens, 3);
    }

    #[test]
    fn test_parse_openai_reply_missing_fields() {
        let r = parse_openai_reply(&serde_json::json!({}), "fallback");
        assert_eq!(r.content, "");
        assert_eq!(r.model, "fallback");
        assert_eq!(r.prompt_tokens, 0);
    }
}
