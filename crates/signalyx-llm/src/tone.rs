//! Tone analysis of LinkedIn engagement.
//!
//! One prompt, one completion, one parsed profile. The model is asked
//! for strict JSON; anything else falls back to a degraded profile so
//! the handler always has something to persist.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message};

/// Parsed result of a tone analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToneProfile {
    /// Dominant mood of the engaged audience ("enthousiaste", "sceptique", …).
    pub audience_mood: String,
    /// Recurring themes in the comments.
    #[serde(default)]
    pub themes: Vec<String>,
    /// Suggested angle for the first outreach message.
    pub outreach_angle: String,
}

const SYSTEM_PROMPT: &str = "\
Tu es un assistant commercial B2B. Tu analyses l'engagement autour d'une \
publication LinkedIn (réactions et commentaires) pour aider un commercial \
à préparer sa prise de contact. Réponds UNIQUEMENT avec un objet JSON \
contenant exactement les clés \"audience_mood\" (string), \"themes\" \
(tableau de strings) et \"outreach_angle\" (string). Pas de texte autour.";

/// Build the two-message prompt for one analysis.
pub fn build_prompt(company: &str, post_text: &str, engagement: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            "Entreprise ciblée : {company}\n\nPublication :\n{post_text}\n\n\
             Engagement observé :\n{engagement}"
        )),
    ]
}

/// Parse the model reply. Tolerates Markdown code fences; anything
/// unparseable degrades to a profile carrying the raw content.
pub fn parse_reply(content: &str) -> ToneProfile {
    let stripped = strip_code_fences(content);
    match serde_json::from_str::<ToneProfile>(stripped) {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "tone reply was not strict JSON, degrading");
            ToneProfile {
                audience_mood: "unknown".to_string(),
                themes: Vec::new(),
                outreach_angle: content.trim().to_string(),
            }
        }
    }
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

/// Runs tone analyses against whichever backend the configuration selected.
pub struct ToneAnalyzer {
    backend: Arc<dyn LlmBackend>,
}

impl ToneAnalyzer {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    pub fn model_id(&self) -> &str {
        self.backend.model_id()
    }

    /// One-shot analysis; returns the profile plus the raw response for
    /// token accounting.
    #[instrument(skip(self, post_text, engagement))]
    pub async fn analyze(
        &self,
        company: &str,
        post_text: &str,
        engagement: &str,
    ) -> Result<(ToneProfile, LlmResponse), LlmError> {
        let req = LlmRequest {
            messages: build_prompt(company, post_text, engagement),
            max_tokens: Some(512),
            temperature: Some(0.2),
        };
        let resp = self.backend.complete(req).await?;
        let profile = parse_reply(&resp.content);
        Ok((profile, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_json() {
        let profile = parse_reply(
            r#"{"audience_mood": "enthousiaste", "themes": ["IA", "recrutement"], "outreach_angle": "Mentionner la levée de fonds"}"#,
        );
        assert_eq!(profile.audience_mood, "enthousiaste");
        assert_eq!(profile.themes, vec!["IA", "recrutement"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let profile = parse_reply(
            "```json\n{\"audience_mood\": \"sceptique\", \"themes\": [], \"outreach_angle\": \"Rassurer sur le ROI\"}\n```",
        );
        assert_eq!(profile.audience_mood, "sceptique");
        assert_eq!(profile.outreach_angle, "Rassurer sur le ROI");
    }

    #[test]
    fn test_parse_prose_degrades() {
        let profile = parse_reply("L'audience semble plutôt positive dans l'ensemble.");
        assert_eq!(profile.audience_mood, "unknown");
        assert!(profile.themes.is_empty());
        assert!(profile.outreach_angle.contains("positive"));
    }

    #[test]
    fn test_missing_themes_defaults_empty() {
        let profile = parse_reply(
            r#"{"audience_mood": "neutre", "outreach_angle": "Poser une question ouverte"}"#,
        );
        assert!(profile.themes.is_empty());
    }

    #[test]
    fn test_prompt_carries_inputs() {
        let messages = build_prompt("Acme Conseil", "Nous recrutons !", "Bravo ! (12 réactions)");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[1].content.contains("Acme Conseil"));
        assert!(messages[1].content.contains("Nous recrutons !"));
    }
}
