//! Engine version record.
//!
//! The record is plain data held in `AppState`. Upgrades go through [`next_version`],
//! which never mutates its input; [`check_availability`] is the only place that swaps a
//! new record in.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Chance that an availability check rolls the version forward.
pub const UPDATE_PROBABILITY: f64 = 0.1;
pub const CAPABILITY_STEP: f64 = 0.01;
pub const CAPABILITY_CEILING: f64 = 0.99;

const INITIAL_CAPABILITIES: &[(&str, f64)] = &[
    ("text_generation", 0.85),
    ("image_generation", 0.75),
    ("embeddings", 0.80),
    ("analysis", 0.82),
    ("moderation", 0.70),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub capabilities: BTreeMap<String, f64>,
    pub last_updated: DateTime<Utc>,
}

impl SystemVersion {
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            major: 1,
            minor: 0,
            patch: 0,
            capabilities: INITIAL_CAPABILITIES
                .iter()
                .map(|(name, score)| (name.to_string(), *score))
                .collect(),
            last_updated: now,
        }
    }

    /// `major.minor.patch`
    pub fn label(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The record after one self-update: patch + 1, every capability + 0.01 (capped at 0.99).
pub fn next_version(current: &SystemVersion, now: DateTime<Utc>) -> SystemVersion {
    SystemVersion {
        major: current.major,
        minor: current.minor,
        patch: current.patch + 1,
        capabilities: current
            .capabilities
            .iter()
            .map(|(name, score)| {
                let bumped = ((score + CAPABILITY_STEP) * 100.0).round() / 100.0;
                (name.clone(), bumped.min(CAPABILITY_CEILING))
            })
            .collect(),
        last_updated: now,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available: bool,
    pub version: String,
    pub capabilities: BTreeMap<String, f64>,
    pub last_updated: DateTime<Utc>,
    pub providers: Vec<String>,
    pub updated: bool,
}

/// Reports the current version, first rolling it forward with [`UPDATE_PROBABILITY`].
pub fn check_availability<R: Rng + ?Sized>(
    record: &RwLock<SystemVersion>,
    providers: Vec<String>,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Availability {
    let updated = rng.gen_bool(UPDATE_PROBABILITY);
    let snapshot = if updated {
        let mut guard = record.write().unwrap_or_else(PoisonError::into_inner);
        let next = next_version(&guard, now);
        info!(from = %guard.label(), to = %next.label(), "engine version updated");
        *guard = next.clone();
        next
    } else {
        record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    };

    Availability {
        available: true,
        version: snapshot.label(),
        capabilities: snapshot.capabilities,
        last_updated: snapshot.last_updated,
        providers,
        updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_next_version_is_pure() {
        let v = SystemVersion::initial(t(0));
        let before = v.clone();
        let n = next_version(&v, t(60));
        assert_eq!(v, before);
        assert_eq!(n.label(), "1.0.1");
        assert_eq!(n.capabilities["text_generation"], 0.86);
        assert_eq!(n.last_updated, t(60));
    }

    #[test]
    fn test_capabilities_capped() {
        let mut v = SystemVersion::initial(t(0));
        for _ in 0..100 {
            v = next_version(&v, t(1));
        }
        assert_eq!(v.patch, 100);
        assert!(v.capabilities.values().all(|s| *s == CAPABILITY_CEILING));
    }

    #[test]
    fn test_check_availability_updates_roughly_one_in_ten() {
        let record = RwLock::new(SystemVersion::initial(t(0)));
        let mut rng = StdRng::seed_from_u64(42);
        let updates = (0..1000)
            .filter(|_| check_availability(&record, vec![], &mut rng, t(5)).updated)
            .count();
        assert!((50..=150).contains(&updates), "{updates} updates");
        assert_eq!(record.read().unwrap().patch as usize, updates);
    }

    #[test]
    fn test_availability_reports_providers() {
        let record = RwLock::new(SystemVersion::initial(t(0)));
        let mut rng = StdRng::seed_from_u64(1);
        let a = check_availability(&record, vec!["local-engine".into()], &mut rng, t(0));
        assert!(a.available);
        assert_eq!(a.providers, vec!["local-engine".to_string()]);
        assert!(a.version.starts_with("1.0."));
    }
}
