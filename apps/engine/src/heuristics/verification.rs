//! Business and voucher verification.
//!
//! Both verifiers accept the raw JSON body. Input that does not parse is not an error:
//! it produces an unverified, low-confidence result naming the parse failure.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::heuristics::jobs::{email_domain, is_personal_email};

const VERIFIED_THRESHOLD: f64 = 0.7;
const MALFORMED_CONFIDENCE: f64 = 0.1;
const MAX_PLAUSIBLE_DISCOUNT_PERCENT: f64 = 70.0;
const MAX_PLAUSIBLE_DISCOUNT_AMOUNT: f64 = 500.0;

static COMPANY_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{8}|[A-Z]{2}\d{6})$").expect("valid regex"));
static VAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^GB(?:\d{9}|\d{12})$").expect("valid regex"));
static POSTCODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2}$").expect("valid regex")
});
static WEBSITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)https?://(?:www\.)?([a-z0-9-]+(?:\.[a-z0-9-]+)+)(?:/.*)?$").expect("valid regex")
});
static VOUCHER_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{4,16}(?:-[A-Z0-9]{2,8})?$").expect("valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    pub confidence: f64,
    pub checks_passed: Vec<String>,
    pub issues: Vec<String>,
}

impl VerificationResult {
    fn malformed(kind: &str, err: &serde_json::Error) -> Self {
        warn!("Malformed {kind} verification payload: {err}");
        Self {
            verified: false,
            confidence: MALFORMED_CONFIDENCE,
            checks_passed: Vec::new(),
            issues: vec![format!("Invalid {kind} data: {err}")],
        }
    }
}

fn parse<T: DeserializeOwned>(kind: &str, raw: &str) -> Result<T, VerificationResult> {
    serde_json::from_str(raw).map_err(|e| VerificationResult::malformed(kind, &e))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Business
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessDetails {
    pub name: Option<String>,
    pub registration_number: Option<String>,
    pub vat_number: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

pub fn verify_business(raw: &str) -> VerificationResult {
    let details: BusinessDetails = match parse("business", raw) {
        Ok(d) => d,
        Err(result) => return result,
    };

    let mut confidence: f64 = 0.0;
    let mut passed = Vec::new();
    let mut issues = Vec::new();

    match present(&details.name) {
        Some(name) if name.chars().count() >= 2 => {
            confidence += 0.2;
            passed.push("Business name provided".to_string());
        }
        _ => issues.push("Business name is missing".to_string()),
    }

    match present(&details.registration_number) {
        Some(n) if COMPANY_NUMBER_RE.is_match(&n.to_uppercase().replace(' ', "")) => {
            confidence += 0.25;
            passed.push("Company registration number is well-formed".to_string());
        }
        Some(n) => issues.push(format!("Registration number '{n}' is not a valid company number")),
        None => issues.push("No company registration number".to_string()),
    }

    match present(&details.vat_number) {
        Some(v) if VAT_RE.is_match(&v.to_uppercase().replace(' ', "")) => {
            confidence += 0.15;
            passed.push("VAT number is well-formed".to_string());
        }
        Some(v) => issues.push(format!("VAT number '{v}' is not valid")),
        None => {}
    }

    if present(&details.address).is_some() {
        confidence += 0.1;
        passed.push("Trading address provided".to_string());
    } else {
        issues.push("No trading address".to_string());
    }

    match present(&details.postcode) {
        Some(p) if POSTCODE_RE.is_match(&p.to_uppercase()) => {
            confidence += 0.1;
            passed.push("Postcode is a valid UK format".to_string());
        }
        Some(p) => issues.push(format!("Postcode '{p}' is not a valid UK postcode")),
        None => {}
    }

    let contact_domain = present(&details.email).and_then(email_domain);
    match (present(&details.email), &contact_domain) {
        (Some(email), Some(_)) if is_personal_email(email) => {
            issues.push("Email uses a personal provider rather than a business domain".to_string());
        }
        (Some(_), Some(_)) => {
            confidence += 0.1;
            passed.push("Business email domain".to_string());
        }
        (Some(email), None) => issues.push(format!("Email '{email}' is not valid")),
        (None, _) => issues.push("No contact email".to_string()),
    }

    if let Some(site) = present(&details.website) {
        match WEBSITE_RE.captures(site) {
            Some(caps) => {
                confidence += 0.1;
                passed.push("Website URL is valid".to_string());
                let site_domain = caps[1].to_lowercase();
                let business_domain = present(&details.email)
                    .filter(|e| !is_personal_email(e))
                    .and(contact_domain.as_deref());
                if let Some(domain) = business_domain {
                    if !domain.ends_with(&site_domain) && !site_domain.ends_with(domain) {
                        issues.push("Email domain does not match the website".to_string());
                        confidence -= 0.05;
                    }
                }
            }
            None => issues.push(format!("Website '{site}' is not a valid URL")),
        }
    }

    let confidence = round2(confidence.clamp(0.0, 1.0));
    VerificationResult {
        verified: confidence >= VERIFIED_THRESHOLD,
        confidence,
        checks_passed: passed,
        issues,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Voucher
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoucherDetails {
    pub code: Option<String>,
    pub discount_percent: Option<f64>,
    pub discount_amount: Option<f64>,
    /// `YYYY-MM-DD`
    pub expiry_date: Option<String>,
    pub business_name: Option<String>,
    pub terms: Option<String>,
}

/// Verifies a voucher as of `today`.
pub fn verify_voucher(raw: &str, today: NaiveDate) -> VerificationResult {
    let details: VoucherDetails = match parse("voucher", raw) {
        Ok(d) => d,
        Err(result) => return result,
    };

    let mut confidence: f64 = 0.0;
    let mut passed = Vec::new();
    let mut issues = Vec::new();
    let mut expired = false;

    match present(&details.code) {
        Some(code) if VOUCHER_CODE_RE.is_match(code) => {
            confidence += 0.3;
            passed.push("Voucher code format is valid".to_string());
        }
        Some(code) => issues.push(format!("Voucher code '{code}' has an invalid format")),
        None => issues.push("No voucher code".to_string()),
    }

    match (details.discount_percent, details.discount_amount) {
        (Some(p), _) if p > 0.0 && p <= MAX_PLAUSIBLE_DISCOUNT_PERCENT => {
            confidence += 0.2;
            passed.push(format!("{p:.0}% discount is plausible"));
        }
        (Some(p), _) if p > MAX_PLAUSIBLE_DISCOUNT_PERCENT => {
            issues.push(format!("{p:.0}% discount is suspiciously high"));
        }
        (_, Some(a)) if a > 0.0 && a <= MAX_PLAUSIBLE_DISCOUNT_AMOUNT => {
            confidence += 0.2;
            passed.push(format!("£{a:.2} discount is plausible"));
        }
        (_, Some(a)) if a > MAX_PLAUSIBLE_DISCOUNT_AMOUNT => {
            issues.push(format!("£{a:.2} discount is suspiciously high"));
        }
        _ => issues.push("No valid discount specified".to_string()),
    }

    match present(&details.expiry_date) {
        Some(raw_date) => match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
            Ok(date) if date >= today => {
                confidence += 0.25;
                passed.push(format!("Valid until {date}"));
            }
            Ok(date) => {
                expired = true;
                issues.push(format!("Voucher expired on {date}"));
            }
            Err(_) => issues.push(format!("Expiry date '{raw_date}' is not a valid date")),
        },
        None => issues.push("No expiry date".to_string()),
    }

    if present(&details.business_name).is_some() {
        confidence += 0.15;
        passed.push("Issuing business named".to_string());
    } else {
        issues.push("Issuing business is not named".to_string());
    }

    if present(&details.terms).is_some() {
        confidence += 0.1;
        passed.push("Terms and conditions provided".to_string());
    }

    let confidence = round2(confidence.clamp(0.0, 1.0));
    VerificationResult {
        verified: !expired && confidence >= VERIFIED_THRESHOLD,
        confidence,
        checks_passed: passed,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_malformed_business_json_is_low_confidence() {
        let r = verify_business("{not json");
        assert!(!r.verified);
        assert_eq!(r.confidence, 0.1);
        assert!(r.issues[0].starts_with("Invalid business data"));
    }

    #[test]
    fn test_wrong_shape_business_json_is_low_confidence() {
        let r = verify_business(r#"{"name": 42}"#);
        assert!(!r.verified);
        assert_eq!(r.confidence, 0.1);
    }

    #[test]
    fn test_complete_business_is_verified() {
        let r = verify_business(
            r#"{
                "name": "Northside Lettings Ltd",
                "registrationNumber": "12345678",
                "vatNumber": "GB123456789",
                "address": "1 Park Row, Leeds",
                "postcode": "LS1 5AB",
                "email": "hello@northsidelettings.co.uk",
                "website": "https://www.northsidelettings.co.uk"
            }"#,
        );
        assert!(r.verified, "issues: {:?}", r.issues);
        assert_eq!(r.confidence, 1.0);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn test_business_with_personal_email_and_bad_number() {
        let r = verify_business(
            r#"{"name": "Quick Cash Rentals", "registrationNumber": "12AB", "email": "cash@gmail.com"}"#,
        );
        assert!(!r.verified);
        assert!(r.issues.iter().any(|i| i.contains("personal provider")));
        assert!(r.issues.iter().any(|i| i.contains("not a valid company number")));
    }

    #[test]
    fn test_scottish_company_number_accepted() {
        let r = verify_business(r#"{"registrationNumber": "SC123456"}"#);
        assert!(r.checks_passed.iter().any(|c| c.contains("registration")));
    }

    #[test]
    fn test_malformed_voucher_json_is_low_confidence() {
        let r = verify_voucher("", today());
        assert!(!r.verified);
        assert_eq!(r.confidence, 0.1);
        assert!(r.issues[0].starts_with("Invalid voucher data"));
    }

    #[test]
    fn test_valid_voucher() {
        let r = verify_voucher(
            r#"{"code": "FRESHERS-10", "discountPercent": 10, "expiryDate": "2025-09-30", "businessName": "Campus Coffee", "terms": "One per customer"}"#,
            today(),
        );
        assert!(r.verified, "issues: {:?}", r.issues);
        assert_eq!(r.confidence, 1.0);
    }

    #[test]
    fn test_expired_voucher_never_verified() {
        let r = verify_voucher(
            r#"{"code": "SUMMER24", "discountPercent": 20, "expiryDate": "2024-08-31", "businessName": "Campus Coffee", "terms": "T&Cs apply"}"#,
            today(),
        );
        assert!(!r.verified);
        assert!(r.issues.iter().any(|i| i.contains("expired")));
    }

    #[test]
    fn test_suspicious_discount() {
        let r = verify_voucher(r#"{"code": "FREESTUFF", "discountPercent": 95}"#, today());
        assert!(r.issues.iter().any(|i| i.contains("suspiciously high")));
        assert!(!r.verified);
    }
}
