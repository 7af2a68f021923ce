//! Signal source clients.

pub mod linkedin;
pub mod pappers;
pub mod press;
pub mod rss;

use crate::models::{ScanParams, SignalDraft};
use async_trait::async_trait;

/// Common interface for all signal source clients.
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Stable name used in scan error reporting and logs.
    fn name(&self) -> &'static str;

    /// Run one scan against the external API, returning raw drafts.
    async fn scan(&self, params: &ScanParams) -> anyhow::Result<Vec<SignalDraft>>;
}

/// Infer the signal kind from a French-language headline.
///
/// Keyword buckets are checked in order of specificity; the first hit
/// wins. Headlines that match nothing fall back to `Other`.
pub fn infer_kind(title: &str) -> signalyx_db::schema::SignalKind {
    use signalyx_db::schema::SignalKind;

    let t = title.to_lowercase();

    const FUNDING: &[&str] = &["levée de fonds", "lève ", "série a", "série b", "tour de table"];
    const ACQUISITION: &[&str] = &["acquisition", "rachat", "rachète", "fusionne", "fusion avec"];
    const LEADERSHIP: &[&str] = &["nomme", "nommé", "nommée", "nouveau directeur", "nouvelle directrice", "prend la tête", "rejoint la direction"];
    const ANNIVERSARY: &[&str] = &["anniversaire", "fête ses", "ans d'existence"];
    const AWARD: &[&str] = &["lauréat", "remporte le prix", "trophée", "médaille"];
    const EXPANSION: &[&str] = &["ouvre", "s'implante", "inaugure", "nouvelle agence", "nouveau site"];

    for (words, kind) in [
        (FUNDING, SignalKind::Funding),
        (ACQUISITION, SignalKind::Acquisition),
        (LEADERSHIP, SignalKind::LeadershipChange),
        (ANNIVERSARY, SignalKind::Anniversary),
        (AWARD, SignalKind::Award),
        (EXPANSION, SignalKind::Expansion),
    ] {
        if words.iter().any(|w| t.contains(w)) {
            return kind;
        }
    }
    SignalKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use signalyx_db::schema::SignalKind;

    #[test]
    fn test_infer_kind_funding() {
        assert_eq!(infer_kind("Dougs lève 25 millions d'euros"), SignalKind::Funding);
        assert_eq!(
            infer_kind("Levée de fonds record pour la fintech lyonnaise"),
            SignalKind::Funding
        );
    }

    #[test]
    fn test_infer_kind_acquisition_beats_leadership() {
        // "nomme" also appears but acquisition vocabulary is checked first
        assert_eq!(
            infer_kind("Après le rachat, le groupe nomme un nouveau DG"),
            SignalKind::Acquisition
        );
    }

    #[test]
    fn test_infer_kind_leadership() {
        assert_eq!(
            infer_kind("Sopra nomme Claire Martin directrice commerciale"),
            SignalKind::LeadershipChange
        );
    }

    #[test]
    fn test_infer_kind_fallback() {
        assert_eq!(infer_kind("Résultats trimestriels en hausse"), SignalKind::Other);
    }
}
