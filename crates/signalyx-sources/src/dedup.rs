//! Draft deduplication.
//!
//! Two layers:
//! 1. A 64-bit FNV-1a fingerprint over the draft's identity fields,
//!    checked against `signals.dedup_hash` before insert.
//! 2. An in-batch fuzzy pass collapsing drafts that are the same story
//!    under slightly different company spellings.

use crate::models::SignalDraft;
use strsim::jaro_winkler;

/// Company-name similarity above which two same-kind drafts in one batch
/// are treated as the same signal.
const SIMILARITY_THRESHOLD: f64 = 0.93;

/// Fingerprint for a draft. Uses the source URL when present (the
/// strongest identity a press item has), otherwise the published date.
///
/// Returns i64 for PostgreSQL BIGINT compatibility; values above
/// `i64::MAX` are clamped rather than wrapped so the sign stays stable.
pub fn draft_hash(draft: &SignalDraft) -> i64 {
    let tail = draft
        .source_url
        .clone()
        .or_else(|| draft.published_on.map(|d| d.to_string()))
        .unwrap_or_default();
    let key = format!(
        "{}|{}|{}",
        normalize(&draft.company_name),
        draft.kind,
        tail
    );
    clamp_u64_to_i64(fnv64(key.as_bytes()))
}

/// Lowercase, collapse whitespace, drop corporate suffixes that vary
/// between sources ("SAS", "SARL", …).
pub fn normalize(company: &str) -> String {
    const SUFFIXES: &[&str] = &["sas", "sarl", "sa", "sasu", "eurl", "sci", "groupe"];
    company
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !SUFFIXES.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse near-duplicate drafts inside one scan batch, keeping the
/// first occurrence. Returns (kept, dropped_count).
pub fn collapse_similar(drafts: Vec<SignalDraft>) -> (Vec<SignalDraft>, usize) {
    let mut kept: Vec<SignalDraft> = Vec::with_capacity(drafts.len());
    let mut dropped = 0usize;

    for draft in drafts {
        let duplicate = kept.iter().any(|existing| {
            existing.kind == draft.kind
                && jaro_winkler(
                    &normalize(&existing.company_name),
                    &normalize(&draft.company_name),
                ) >= SIMILARITY_THRESHOLD
        });
        if duplicate {
            dropped += 1;
        } else {
            kept.push(draft);
        }
    }
    (kept, dropped)
}

fn clamp_u64_to_i64(value: u64) -> i64 {
    if value > i64::MAX as u64 {
        i64::MAX
    } else {
        value as i64
    }
}

/// FNV-1a 64-bit hash.
fn fnv64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 14695981039346656037;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use signalyx_db::schema::{SignalKind, SignalOrigin};

    fn draft(company: &str, kind: SignalKind, url: Option<&str>) -> SignalDraft {
        let mut d = SignalDraft::new(
            company.to_string(),
            kind,
            format!("{company} fait l'actualité"),
            SignalOrigin::Press,
        );
        d.source_url = url.map(String::from);
        d
    }

    #[test]
    fn test_same_identity_same_hash() {
        let a = draft("Acme Conseil", SignalKind::Funding, Some("https://p.example/1"));
        let b = draft("ACME CONSEIL", SignalKind::Funding, Some("https://p.example/1"));
        assert_eq!(draft_hash(&a), draft_hash(&b));
    }

    #[test]
    fn test_different_url_different_hash() {
        let a = draft("Acme Conseil", SignalKind::Funding, Some("https://p.example/1"));
        let b = draft("Acme Conseil", SignalKind::Funding, Some("https://p.example/2"));
        assert_ne!(draft_hash(&a), draft_hash(&b));
    }

    #[test]
    fn test_hash_is_non_negative_clamped() {
        let a = draft("Acme", SignalKind::Other, None);
        assert!(draft_hash(&a) >= 0);
    }

    #[test]
    fn test_normalize_drops_legal_suffix() {
        assert_eq!(normalize("Acme Conseil SAS"), "acme conseil");
        assert_eq!(normalize("  ACME   Conseil "), "acme conseil");
    }

    #[test]
    fn test_collapse_similar_same_kind() {
        let batch = vec![
            draft("Acme Conseil", SignalKind::Funding, Some("https://a.example")),
            draft("Acme Conseil SAS", SignalKind::Funding, Some("https://b.example")),
            draft("Totalement Autre", SignalKind::Funding, Some("https://c.example")),
        ];
        let (kept, dropped) = collapse_similar(batch);
        assert_eq!(kept.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(kept[0].company_name, "Acme Conseil");
    }

    #[test]
    fn test_collapse_keeps_different_kinds() {
        let batch = vec![
            draft("Acme Conseil", SignalKind::Funding, None),
            draft("Acme Conseil", SignalKind::Acquisition, None),
        ];
        let (kept, dropped) = collapse_similar(batch);
        assert_eq!(kept.len(), 2);
        assert_eq!(dropped, 0);
    }
}
