//! Task-runner HTTP client.
//!
//! API shape (Manus-style):
//!   POST {base}/v1/tasks            {"prompt": "..."}      → {"task_id": "..."}
//!   GET  {base}/v1/tasks/{task_id}                         → {"status": "...", "output": "..."}

use signalyx_common::OutboundClient;
use thiserror::Error;
use tracing::instrument;

const DEFAULT_BASE_URL: &str = "https://api.manus.im";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Outbound request rejected: {0}")]
    Outbound(String),

    #[error("Agent API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed agent response: {0}")]
    Malformed(String),
}

impl From<signalyx_common::SignalyxError> for AgentError {
    fn from(err: signalyx_common::SignalyxError) -> Self {
        AgentError::Outbound(err.to_string())
    }
}

/// Remote task lifecycle, mapped from the provider's status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentTaskState {
    Queued,
    Running,
    Finished,
    Failed,
}

impl AgentTaskState {
    pub fn from_provider(s: &str) -> Self {
        match s {
            "queued" | "pending" | "created" => AgentTaskState::Queued,
            "running" | "in_progress" | "processing" => AgentTaskState::Running,
            "finished" | "completed" | "succeeded" | "done" => AgentTaskState::Finished,
            _ => AgentTaskState::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentTaskState::Finished | AgentTaskState::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct AgentTaskStatus {
    pub state: AgentTaskState,
    pub output: Option<String>,
    pub error: Option<String>,
}

pub struct AgentTaskClient {
    client: OutboundClient,
    base_url: String,
    api_key: String,
}

impl AgentTaskClient {
    pub fn new(client: OutboundClient, api_key: String, base_url: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        }
    }

    /// Create a task and return its provider-side id.
    #[instrument(skip(self, prompt))]
    pub async fn create_task(&self, prompt: &str) -> Result<String, AgentError> {
        let url = format!("{}/v1/tasks", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)?
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await?;

        let json = read_json_checked(resp).await?;
        json["task_id"]
            .as_str()
            .or_else(|| json["id"].as_str())
            .map(String::from)
            .ok_or_else(|| AgentError::Malformed("missing task_id".to_string()))
    }

    /// Poll a task once.
    #[instrument(skip(self))]
    pub async fn get_task(&self, task_id: &str) -> Result<AgentTaskStatus, AgentError> {
        let url = format!("{}/v1/tasks/{task_id}", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)?
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let json = read_json_checked(resp).await?;
        Ok(parse_task_status(&json)?)
    }
}

async fn read_json_checked(resp: reqwest::Response) -> Result<serde_json::Value, AgentError> {
    let status = resp.status().as_u16();
    let body: serde_json::Value = resp.json().await?;
    if status >= 400 {
        let message = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("unknown agent API error")
            .to_string();
        return Err(AgentError::Api { status, message });
    }
    Ok(body)
}

fn parse_task_status(json: &serde_json::Value) -> Result<AgentTaskStatus, AgentError> {
    let raw_state = json["status"]
        .as_str()
        .ok_or_else(|| AgentError::Malformed("missing status".to_string()))?;

    // Output may be a plain string or a structured block with a text field.
    let output = json["output"]
        .as_str()
        .map(String::from)
        .or_else(|| json["output"]["text"].as_str().map(String::from))
        .or_else(|| json["result"].as_str().map(String::from));

    Ok(AgentTaskStatus {
        state: AgentTaskState::from_provider(raw_state),
        output,
        error: json["error"].as_str().map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_mapping() {
        assert_eq!(AgentTaskState::from_provider("pending"), AgentTaskState::Queued);
        assert_eq!(AgentTaskState::from_provider("running"), AgentTaskState::Running);
        assert_eq!(AgentTaskState::from_provider("completed"), AgentTaskState::Finished);
        assert_eq!(AgentTaskState::from_provider("errored"), AgentTaskState::Failed);
        assert!(AgentTaskState::Finished.is_terminal());
        assert!(!AgentTaskState::Running.is_terminal());
    }

    #[test]
    fn test_parse_task_status_string_output() {
        let json = serde_json::json!({
            "status": "finished",
            "output": "{\"siren\": \"123456789\"}"
        });
        let s = parse_task_status(&json).unwrap();
        assert_eq!(s.state, AgentTaskState::Finished);
        assert!(s.output.unwrap().contains("123456789"));
    }

    #[test]
    fn test_parse_task_status_structured_output() {
        let json = serde_json::json!({
            "status": "done",
            "output": { "text": "résultat" }
        });
        let s = parse_task_status(&json).unwrap();
        assert_eq!(s.output.as_deref(), Some("résultat"));
    }

    #[test]
    fn test_parse_task_status_requires_status() {
        assert!(parse_task_status(&serde_json::json!({"output": "x"})).is_err());
    }
}
