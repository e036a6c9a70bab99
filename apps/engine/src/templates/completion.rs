//! Free-form completions for the local engine.
//!
//! The prompt is routed to an intent by keyword, the matching generator runs with
//! whatever parameters can be lifted from the prompt, and the reply is cut to the
//! requested token budget.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::Serialize;

use crate::heuristics::keyword::Tokens;
use crate::templates::job::{generate_job_description, JobDescriptionParams};
use crate::templates::marketplace::{generate_marketplace_listing, MarketplaceListingParams};
use crate::templates::pick;
use crate::templates::property::{generate_property_description, PropertyDescriptionParams};

static BEDROOMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*-?\s*(?:bed|bedroom)").expect("valid regex"));
static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:in|near)\s+([A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)?)").expect("valid regex"));
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"£\s*(\d+(?:\.\d{1,2})?)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PropertyDescription,
    JobDescription,
    MarketplaceListing,
    Maintenance,
    Compliance,
    General,
}

const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Maintenance,
        &["repair", "leak", "leaking", "broken", "boiler", "maintenance", "fix", "damp", "mould"],
    ),
    (
        Intent::Compliance,
        &["compliance", "certificate", "epc", "gas", "eicr", "licence", "license", "regulation"],
    ),
    (
        Intent::JobDescription,
        &["job", "role", "vacancy", "hiring", "position", "candidate", "recruit"],
    ),
    (
        Intent::MarketplaceListing,
        &["sell", "selling", "marketplace", "second-hand", "secondhand", "item", "listing"],
    ),
    (
        Intent::PropertyDescription,
        &["property", "flat", "house", "apartment", "bedroom", "studio", "accommodation", "let"],
    ),
];

const MAINTENANCE_REPLIES: &[&str] = &[
    "Thanks for reporting this issue. A maintenance ticket has been logged and our team will \
     contact you to arrange a convenient time for a contractor visit. If there is any risk of \
     water or electrical damage, please isolate the supply where it is safe to do so.",
    "We have received your maintenance request. Urgent issues are usually attended to within \
     24 hours, and routine repairs within 5 working days. You will receive an update once a \
     contractor has been assigned.",
];

const COMPLIANCE_REPLIES: &[&str] = &[
    "Landlords must hold a valid gas safety certificate (renewed annually), an EPC rated E or \
     above, and an electrical installation condition report renewed every five years. Deposits \
     must be protected in a government-approved scheme within 30 days.",
    "To stay compliant, keep certificates up to date, record every inspection, and share copies \
     with tenants at the start of each tenancy. Set reminders well ahead of expiry dates.",
];

const GENERAL_REPLIES: &[&str] = &[
    "Here is a summary based on your request. The property portfolio is performing steadily, \
     with occupancy holding up and maintenance requests being resolved promptly. Let me know \
     if you would like a more detailed breakdown.",
    "Happy to help. Could you share a little more detail about the property, tenancy or \
     listing you have in mind? With that I can tailor the response.",
    "Based on the information provided, the best next step is to review the current tenancy \
     details and confirm any outstanding actions with the tenant.",
];

/// Generated completion with the intent that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub text: String,
    pub intent: Intent,
}

/// Picks the intent with the most keyword hits. Earlier table entries win ties.
pub fn detect_intent(prompt: &str) -> Intent {
    let tokens = Tokens::new(prompt);
    let mut best = (Intent::General, 0usize);
    for (intent, keywords) in INTENT_KEYWORDS {
        let hits = tokens.count_any(keywords);
        if hits > best.1 {
            best = (*intent, hits);
        }
    }
    best.0
}

pub fn generate_completion<R: Rng + ?Sized>(
    prompt: &str,
    max_tokens: Option<u32>,
    rng: &mut R,
) -> Completion {
    let intent = detect_intent(prompt);

    let text = match intent {
        Intent::PropertyDescription => {
            let bedrooms = BEDROOMS_RE
                .captures(prompt)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(2);
            let location = LOCATION_RE.captures(prompt).map(|c| c[1].to_string());
            let property_type = ["studio", "apartment", "flat", "house", "bungalow"]
                .into_iter()
                .find(|k| prompt.to_lowercase().contains(k))
                .unwrap_or("flat");
            let params = PropertyDescriptionParams {
                title: format!("This {property_type}"),
                property_type: property_type.to_string(),
                bedrooms,
                bathrooms: (bedrooms / 2).max(1),
                location,
                ..Default::default()
            };
            generate_property_description(&params, rng)
        }
        Intent::JobDescription => {
            let params = JobDescriptionParams {
                title: "Team Member".to_string(),
                location: LOCATION_RE.captures(prompt).map(|c| c[1].to_string()),
                ..Default::default()
            };
            generate_job_description(&params, rng)
        }
        Intent::MarketplaceListing => {
            let params = MarketplaceListingParams {
                title: "item".to_string(),
                price: PRICE_RE.captures(prompt).and_then(|c| c[1].parse().ok()),
                ..Default::default()
            };
            generate_marketplace_listing(&params, rng)
        }
        Intent::Maintenance => pick(rng, MAINTENANCE_REPLIES).to_string(),
        Intent::Compliance => pick(rng, COMPLIANCE_REPLIES).to_string(),
        Intent::General => pick(rng, GENERAL_REPLIES).to_string(),
    };

    let text = match max_tokens {
        Some(limit) => truncate_to_tokens(&text, limit),
        None => text,
    };

    Completion { text, intent }
}

/// Cuts `text` to roughly `max_tokens * 4` characters, backing off to a word boundary.
pub fn truncate_to_tokens(text: &str, max_tokens: u32) -> String {
    let budget = (max_tokens as usize).saturating_mul(4);
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let cut: String = text.chars().take(budget).collect();
    match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => cut[..idx].trim_end().to_string(),
        _ => cut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_detect_intent() {
        assert_eq!(
            detect_intent("Write a description for a 2 bedroom flat"),
            Intent::PropertyDescription
        );
        assert_eq!(
            detect_intent("The boiler is broken and leaking"),
            Intent::Maintenance
        );
        assert_eq!(
            detect_intent("We are hiring for a new role"),
            Intent::JobDescription
        );
        assert_eq!(detect_intent("hello there"), Intent::General);
    }

    #[test]
    fn test_property_completion_uses_prompt_details() {
        let c = generate_completion(
            "Describe a 3 bedroom house in Leeds",
            None,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(c.intent, Intent::PropertyDescription);
        assert!(c.text.contains("3 bedrooms"));
        assert!(c.text.contains("Leeds"));
    }

    #[test]
    fn test_completion_respects_token_budget() {
        let c = generate_completion("hello", Some(5), &mut StdRng::seed_from_u64(1));
        assert!(c.text.chars().count() <= 20);
        assert!(!c.text.is_empty());
    }

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_to_tokens("short", 100), "short");
    }

    #[test]
    fn test_truncate_backs_off_to_word_boundary() {
        assert_eq!(truncate_to_tokens("alpha beta gamma", 2), "alpha");
    }
}
