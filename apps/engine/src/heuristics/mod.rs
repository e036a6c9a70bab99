//! Heuristic scorers.
//!
//! Every scorer is a pure function of its input: tokenise, count keyword groups
//! (see [`keyword`]), combine the counts linearly and bucket the result through fixed
//! thresholds. The thresholds are placeholder business rules, named as constants in
//! each module so they can be tuned without touching the logic.

pub mod jobs;
pub mod keyword;
pub mod marketplace;
pub mod matching;
pub mod resume;
pub mod task;
pub mod verification;

use serde::{Deserialize, Serialize};

/// Ordinal risk bucket shared by the fraud scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}
