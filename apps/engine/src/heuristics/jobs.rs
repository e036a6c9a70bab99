//! Job listing fraud detection and legitimacy verification.
//!
//! Fraud is a 0–100 point score. Each red-flag group adds a fixed penalty once,
//! however many of its phrases appear.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::heuristics::keyword::{KeywordGroup, KeywordScorer, ThresholdTable, Tokens};
use crate::heuristics::RiskLevel;

const FRAUD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "payment_upfront",
        keywords: &[
            "registration fee", "training fee", "application fee", "processing fee", "admin fee",
            "starter kit", "pay a fee", "upfront payment", "payment upfront", "deposit required",
            "buy your own equipment",
        ],
        weight: 50.0,
    },
    KeywordGroup {
        name: "personal_info",
        keywords: &[
            "social security", "ssn", "passport", "bank details", "bank account",
            "national insurance number", "credit card", "card details", "date of birth",
            "copy of your id",
        ],
        weight: 40.0,
    },
    KeywordGroup {
        name: "unrealistic_earnings",
        keywords: &[
            "guaranteed income", "get rich", "unlimited earning", "unlimited earnings",
            "easy money", "make money fast", "earn thousands", "no experience needed earn",
            "financial freedom", "be your own boss",
        ],
        weight: 30.0,
    },
    KeywordGroup {
        name: "pressure",
        keywords: &[
            "start immediately", "act now", "limited spots", "limited places", "urgent hire",
            "respond today", "don't miss out",
        ],
        weight: 10.0,
    },
];

static FRAUD_SCORER: KeywordScorer = KeywordScorer::new(FRAUD_GROUPS);

/// Earnings claims such as "earn £500 a day" or "$3000 per week".
static EARNINGS_CLAIM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\bearn(?:ing)?s?\s+(?:up\s+to\s+)?",
        r"[£$€]\s?\d[\d,]*\s*(?:a|per|/)\s*(?:day|hour|week)",
    ))
    .expect("valid regex")
});

const PERSONAL_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com", "yahoo.com", "yahoo.co.uk", "hotmail.com", "hotmail.co.uk", "outlook.com",
    "live.com", "aol.com", "icloud.com", "protonmail.com",
];

const RISK_TABLE: ThresholdTable<RiskLevel> = ThresholdTable {
    rules: &[
        (70.0, RiskLevel::Critical),
        (40.0, RiskLevel::High),
        (20.0, RiskLevel::Medium),
    ],
    fallback: RiskLevel::Low,
};

const FRAUD_DETECTED_THRESHOLD: u32 = 40;
const UNREALISTIC_SALARY_POINTS: u32 = 25;
const PERSONAL_EMAIL_POINTS: u32 = 15;
const VAGUE_DESCRIPTION_POINTS: u32 = 10;
const MISSING_COMPANY_POINTS: u32 = 10;
const VAGUE_DESCRIPTION_CHARS: usize = 50;

/// Above these a student/entry-level listing is implausible.
const MAX_PLAUSIBLE_HOURLY: f64 = 50.0;
const MAX_PLAUSIBLE_DAILY: f64 = 400.0;
const MAX_PLAUSIBLE_WEEKLY: f64 = 2_000.0;
const MAX_PLAUSIBLE_MONTHLY: f64 = 8_000.0;
const MAX_PLAUSIBLE_ANNUAL: f64 = 90_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryPeriod {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobListing {
    pub title: String,
    pub description: String,
    pub company: Option<String>,
    pub salary: Option<f64>,
    pub salary_period: Option<SalaryPeriod>,
    pub contact_email: Option<String>,
    pub location: Option<String>,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudFlags {
    pub payment_upfront: bool,
    pub personal_info_requested: bool,
    pub unrealistic_earnings: bool,
    pub unrealistic_salary: bool,
    pub personal_email_domain: bool,
    pub pressure_tactics: bool,
    pub vague_description: bool,
    pub missing_company: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFraudReport {
    pub fraud_detected: bool,
    pub fraud_score: u32,
    pub risk_level: RiskLevel,
    pub flags: FraudFlags,
    pub reasons: Vec<String>,
    pub recommendation: String,
}

fn salary_is_unrealistic(salary: f64, period: Option<SalaryPeriod>) -> bool {
    let cap = match period {
        Some(SalaryPeriod::Hour) => MAX_PLAUSIBLE_HOURLY,
        Some(SalaryPeriod::Day) => MAX_PLAUSIBLE_DAILY,
        Some(SalaryPeriod::Week) => MAX_PLAUSIBLE_WEEKLY,
        Some(SalaryPeriod::Month) => MAX_PLAUSIBLE_MONTHLY,
        Some(SalaryPeriod::Year) => MAX_PLAUSIBLE_ANNUAL,
        // without a period, small numbers read as hourly and large ones as annual
        None if salary < 1_000.0 => MAX_PLAUSIBLE_HOURLY,
        None => MAX_PLAUSIBLE_ANNUAL,
    };
    salary > cap
}

pub(crate) fn email_domain(email: &str) -> Option<String> {
    email
        .trim()
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .filter(|d| !d.is_empty())
}

pub(crate) fn is_personal_email(email: &str) -> bool {
    email_domain(email)
        .map(|d| PERSONAL_EMAIL_DOMAINS.contains(&d.as_str()))
        .unwrap_or(false)
}

pub fn detect_job_fraud(job: &JobListing) -> JobFraudReport {
    let text = format!("{} {}", job.title, job.description);
    let tokens = Tokens::new(&text);
    let kw = FRAUD_SCORER.score(&tokens);

    let mut flags = FraudFlags::default();
    let mut score: u32 = 0;
    let mut reasons = Vec::new();

    for group in FRAUD_GROUPS {
        if !kw.hit(group.name) {
            continue;
        }
        score += group.weight as u32;
        let matched = kw.matched(group.name).join(", ");
        match group.name {
            "payment_upfront" => {
                flags.payment_upfront = true;
                reasons.push(format!("Asks candidates to pay upfront ({matched})"));
            }
            "personal_info" => {
                flags.personal_info_requested = true;
                reasons.push(format!("Requests sensitive personal information ({matched})"));
            }
            "unrealistic_earnings" => {
                flags.unrealistic_earnings = true;
                reasons.push(format!("Promises unrealistic earnings ({matched})"));
            }
            "pressure" => {
                flags.pressure_tactics = true;
                reasons.push(format!("Uses pressure tactics ({matched})"));
            }
            _ => {}
        }
    }

    if !flags.unrealistic_earnings && EARNINGS_CLAIM_RE.is_match(&text) {
        flags.unrealistic_earnings = true;
        score += 30;
        reasons.push("Advertises fixed earnings per day or week".to_string());
    }

    if let Some(salary) = job.salary {
        if salary_is_unrealistic(salary, job.salary_period) {
            flags.unrealistic_salary = true;
            score += UNREALISTIC_SALARY_POINTS;
            reasons.push(format!("Salary of {salary:.2} is implausibly high for the role"));
        }
    }

    if job.contact_email.as_deref().map(is_personal_email).unwrap_or(false) {
        flags.personal_email_domain = true;
        score += PERSONAL_EMAIL_POINTS;
        reasons.push("Contact email uses a personal email provider".to_string());
    }

    if job.description.trim().chars().count() < VAGUE_DESCRIPTION_CHARS {
        flags.vague_description = true;
        score += VAGUE_DESCRIPTION_POINTS;
        reasons.push("Description is too vague to assess".to_string());
    }

    if job.company.as_deref().map(str::trim).unwrap_or("").is_empty() {
        flags.missing_company = true;
        score += MISSING_COMPANY_POINTS;
        reasons.push("No company name given".to_string());
    }

    let fraud_score = score.min(100);
    let risk_level = RISK_TABLE.classify(fraud_score as f64);
    let fraud_detected = fraud_score >= FRAUD_DETECTED_THRESHOLD;

    let recommendation = match risk_level {
        RiskLevel::Critical => "Remove this listing and warn students who have applied.",
        RiskLevel::High => "Suspend the listing pending manual review of the employer.",
        RiskLevel::Medium => "Ask the employer for more detail before publishing.",
        RiskLevel::Low => "No significant fraud indicators.",
    }
    .to_string();

    debug!(fraud_score, ?risk_level, "job listing scored for fraud");

    JobFraudReport {
        fraud_detected,
        fraud_score,
        risk_level,
        flags,
        reasons,
        recommendation,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Verification
// ────────────────────────────────────────────────────────────────────────────

const LEGITIMACY_VERIFIED_THRESHOLD: u32 = 70;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobVerification {
    pub verified: bool,
    pub legitimacy_score: u32,
    pub positive_signals: Vec<String>,
    pub concerns: Vec<String>,
    pub fraud: JobFraudReport,
}

pub fn verify_job_listing(job: &JobListing) -> JobVerification {
    let fraud = detect_job_fraud(job);
    let mut score: i64 = 100 - fraud.fraud_score as i64;
    let mut positive_signals = Vec::new();

    // Signals that are only worth credit when nothing else looks wrong.
    let mut bonus = 0i64;
    if let Some(company) = job.company.as_deref().filter(|c| !c.trim().is_empty()) {
        bonus += 5;
        positive_signals.push(format!("Named employer: {}", company.trim()));
    }
    if let Some(email) = job.contact_email.as_deref() {
        if !is_personal_email(email) && email_domain(email).is_some() {
            bonus += 5;
            positive_signals.push("Business email domain".to_string());
        }
    }
    if job.description.trim().chars().count() >= 200 {
        bonus += 5;
        positive_signals.push("Detailed description".to_string());
    }
    if !job.requirements.is_empty() {
        bonus += 5;
        positive_signals.push("Lists concrete requirements".to_string());
    }
    if job.location.as_deref().map(|l| !l.trim().is_empty()).unwrap_or(false) {
        bonus += 5;
        positive_signals.push("Specifies a work location".to_string());
    }
    if job.salary.is_some() && !fraud.flags.unrealistic_salary {
        bonus += 5;
        positive_signals.push("States a realistic salary".to_string());
    }

    score = (score + bonus).clamp(0, 100);
    if fraud.fraud_detected {
        score = score.min(LEGITIMACY_VERIFIED_THRESHOLD as i64 - 1);
    }
    let legitimacy_score = score as u32;

    JobVerification {
        verified: legitimacy_score >= LEGITIMACY_VERIFIED_THRESHOLD,
        legitimacy_score,
        positive_signals,
        concerns: fraud.reasons.clone(),
        fraud,
    }
}
