//! signalyx-credits — Credit-usage accounting for the external providers.
//!
//! Plain arithmetic over stored counters: each provider has a monthly
//! ceiling from configuration, usage accumulates in `credit_usage` rows,
//! and the percent used maps onto one of four levels. Only `Blocked`
//! (100 % and above) refuses new work; `Warning` and `Critical` exist so
//! the dashboard can color its meters.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use signalyx_config::CreditLimits;
use signalyx_db::CreditUsageRepository;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreditError {
    #[error("Database error: {0}")]
    Db(#[from] signalyx_db::DbError),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

/// External APIs whose usage is metered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Pappers,
    News,
    Apify,
    Agent,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Pappers,
        Provider::News,
        Provider::Apify,
        Provider::Agent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Pappers => "pappers",
            Provider::News => "news",
            Provider::Apify => "apify",
            Provider::Agent => "agent",
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = CreditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pappers" => Ok(Provider::Pappers),
            "news" => Ok(Provider::News),
            "apify" => Ok(Provider::Apify),
            "agent" => Ok(Provider::Agent),
            _ => Err(CreditError::UnknownProvider(s.to_string())),
        }
    }
}

/// Consumption level derived from percent used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    Ok,
    Warning,
    Critical,
    Blocked,
}

impl UsageLevel {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            0..=69 => UsageLevel::Ok,
            70..=89 => UsageLevel::Warning,
            90..=99 => UsageLevel::Critical,
            _ => UsageLevel::Blocked,
        }
    }
}

/// Point-in-time view of one provider's counter.
#[derive(Debug, Clone, Serialize)]
pub struct CreditSnapshot {
    pub provider: Provider,
    pub used: u32,
    pub limit: u32,
    pub percent: u32,
    pub level: UsageLevel,
}

/// Percent used, saturating at 999 to keep the arithmetic honest on
/// grossly exceeded counters. A limit of 0 means unmetered.
pub fn percent_used(used: u32, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    ((used as u64 * 100) / limit as u64).min(999) as u32
}

/// Accounting period key for a timestamp, `YYYY-MM`.
pub fn period_for(now: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", now.year(), now.month())
}

fn limit_for(limits: &CreditLimits, provider: Provider) -> u32 {
    match provider {
        Provider::Pappers => limits.pappers_monthly,
        Provider::News => limits.news_monthly,
        Provider::Apify => limits.apify_monthly,
        Provider::Agent => limits.agent_monthly,
    }
}

/// Ledger combining stored counters with configured ceilings.
#[derive(Clone)]
pub struct CreditLedger {
    repo: CreditUsageRepository,
    limits: CreditLimits,
}

impl CreditLedger {
    pub fn new(repo: CreditUsageRepository, limits: CreditLimits) -> Self {
        Self { repo, limits }
    }

    pub async fn snapshot(&self, provider: Provider) -> Result<CreditSnapshot, CreditError> {
        let period = period_for(Utc::now());
        let used = self.repo.used(provider.as_str(), &period).await?.max(0) as u32;
        let limit = limit_for(&self.limits, provider);
        let percent = percent_used(used, limit);
        Ok(CreditSnapshot {
            provider,
            used,
            limit,
            percent,
            level: UsageLevel::from_percent(percent),
        })
    }

    pub async fn snapshot_all(&self) -> Result<Vec<CreditSnapshot>, CreditError> {
        let mut out = Vec::with_capacity(Provider::ALL.len());
        for provider in Provider::ALL {
            out.push(self.snapshot(provider).await?);
        }
        Ok(out)
    }

    /// Current level for a provider, consulted before starting new work.
    pub async fn level(&self, provider: Provider) -> Result<UsageLevel, CreditError> {
        Ok(self.snapshot(provider).await?.level)
    }

    /// Record `n` consumed units in the current period.
    pub async fn record(&self, provider: Provider, n: u32) -> Result<(), CreditError> {
        let period = period_for(Utc::now());
        self.repo.record(provider.as_str(), &period, n as i32).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_percent_used_basic() {
        assert_eq!(percent_used(0, 500), 0);
        assert_eq!(percent_used(250, 500), 50);
        assert_eq!(percent_used(500, 500), 100);
        assert_eq!(percent_used(750, 500), 150);
    }

    #[test]
    fn test_zero_limit_is_unmetered() {
        assert_eq!(percent_used(10_000, 0), 0);
        assert_eq!(UsageLevel::from_percent(percent_used(10_000, 0)), UsageLevel::Ok);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(UsageLevel::from_percent(0), UsageLevel::Ok);
        assert_eq!(UsageLevel::from_percent(69), UsageLevel::Ok);
        assert_eq!(UsageLevel::from_percent(70), UsageLevel::Warning);
        assert_eq!(UsageLevel::from_percent(89), UsageLevel::Warning);
        assert_eq!(UsageLevel::from_percent(90), UsageLevel::Critical);
        assert_eq!(UsageLevel::from_percent(99), UsageLevel::Critical);
        assert_eq!(UsageLevel::from_percent(100), UsageLevel::Blocked);
        assert_eq!(UsageLevel::from_percent(140), UsageLevel::Blocked);
    }

    #[test]
    fn test_percent_saturates() {
        assert_eq!(percent_used(u32::MAX, 1), 999);
    }

    #[test]
    fn test_period_format() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(period_for(ts), "2026-03");
    }

    #[test]
    fn test_provider_round_trip() {
        for p in Provider::ALL {
            assert_eq!(p.as_str().parse::<Provider>().unwrap(), p);
        }
        assert!("stripe".parse::<Provider>().is_err());
    }
}
