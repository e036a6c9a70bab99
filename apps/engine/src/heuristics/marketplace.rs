//! Student marketplace scoring: verification, fraud, pricing, categorisation, valuation.
//!
//! Prices are in GBP. Every monetary output is a two-decimal string so the front end
//! can display it without re-formatting.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::heuristics::keyword::{KeywordGroup, KeywordScorer, ThresholdTable, Tokens};
use crate::heuristics::RiskLevel;

#[derive(Debug, Clone, Copy)]
pub struct PriceBand {
    pub min: f64,
    pub typical: f64,
    pub max: f64,
}

/// Declared category keys with their expected price bands.
pub const CATEGORIES: &[(&str, PriceBand)] = &[
    ("textbooks", PriceBand { min: 10.0, typical: 60.0, max: 200.0 }),
    ("electronics", PriceBand { min: 20.0, typical: 150.0, max: 1500.0 }),
    ("furniture", PriceBand { min: 15.0, typical: 80.0, max: 500.0 }),
    ("kitchen", PriceBand { min: 5.0, typical: 25.0, max: 150.0 }),
    ("clothing", PriceBand { min: 5.0, typical: 20.0, max: 200.0 }),
    ("sports", PriceBand { min: 10.0, typical: 40.0, max: 300.0 }),
    ("bikes", PriceBand { min: 30.0, typical: 120.0, max: 800.0 }),
    ("stationery", PriceBand { min: 1.0, typical: 10.0, max: 50.0 }),
    (FALLBACK_CATEGORY, FALLBACK_BAND),
];

pub const FALLBACK_CATEGORY: &str = "other";

/// Band for items no declared category claims.
pub const FALLBACK_BAND: PriceBand = PriceBand { min: 1.0, typical: 30.0, max: 500.0 };

const CONDITION_MULTIPLIERS: &[(&str, f64)] = &[
    ("new", 1.0),
    ("like_new", 0.85),
    ("good", 0.7),
    ("fair", 0.5),
    ("poor", 0.3),
];

const UNKNOWN_CONDITION_MULTIPLIER: f64 = 0.6;

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "textbooks",
        &[
            "textbook", "textbooks", "book", "books", "edition", "isbn", "novel", "guide",
            "handbook", "reader",
        ],
    ),
    (
        "electronics",
        &[
            "laptop", "phone", "iphone", "tablet", "ipad", "monitor", "headphones", "charger",
            "speaker", "camera", "console", "keyboard", "mouse", "tv", "calculator",
        ],
    ),
    (
        "furniture",
        &[
            "desk", "chair", "table", "sofa", "bed", "mattress", "shelf", "shelves", "wardrobe",
            "drawers", "lamp",
        ],
    ),
    (
        "kitchen",
        &[
            "kettle", "toaster", "microwave", "pan", "pans", "pot", "plates", "cutlery", "blender",
            "mug", "mugs", "fridge",
        ],
    ),
    (
        "clothing",
        &[
            "jacket", "coat", "shirt", "jeans", "dress", "shoes", "trainers", "hoodie", "jumper",
            "boots",
        ],
    ),
    (
        "sports",
        &[
            "gym", "weights", "dumbbells", "racket", "football", "yoga", "mat", "tennis", "boxing",
            "skateboard",
        ],
    ),
    ("bikes", &["bike", "bicycle", "cycle", "helmet", "scooter", "e-bike", "lock"]),
    (
        "stationery",
        &[
            "pen", "pens", "notebook", "notebooks", "folder", "paper", "highlighters", "stapler",
            "ruler",
        ],
    ),
];

const RED_FLAG_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "scam",
        keywords: &[
            "wire transfer", "western union", "moneygram", "gift card", "gift cards", "bitcoin",
            "crypto", "cryptocurrency", "pay first", "deposit first", "payment upfront",
            "shipping only", "no returns no questions", "too good to miss", "act now",
            "limited time", "cash only upfront",
        ],
        weight: 1.0,
    },
    KeywordGroup {
        name: "pressure",
        keywords: &["urgent", "urgent sale", "must go today", "quick sale", "first come"],
        weight: 0.5,
    },
];

static RED_FLAG_SCORER: KeywordScorer = KeywordScorer::new(RED_FLAG_GROUPS);

static EXCESSIVE_PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!?]{3,}").expect("valid regex"));
static CONTACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}",
        r"|(?:\+44\s?7\d{3}|\b07\d{3})\s?\d{3}\s?\d{3}\b",
        r"|whatsapp",
    ))
    .expect("valid regex")
});

const RISK_TABLE: ThresholdTable<RiskLevel> = ThresholdTable {
    rules: &[
        (0.75, RiskLevel::Critical),
        (0.5, RiskLevel::High),
        (0.25, RiskLevel::Medium),
    ],
    fallback: RiskLevel::Low,
};

/// The fields of a marketplace listing the scorers read. Missing fields default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketplaceItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub price: Option<f64>,
    pub images: Vec<String>,
}

impl MarketplaceItem {
    fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

pub fn price_band(category: &str) -> Option<PriceBand> {
    let key = category.trim().to_lowercase();
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, band)| *band)
}

pub fn is_declared_category(category: &str) -> bool {
    price_band(category).is_some()
}

fn normalize_condition(condition: &str) -> String {
    condition
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

fn condition_multiplier(condition: &str) -> Option<f64> {
    let key = normalize_condition(condition);
    CONDITION_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, m)| *m)
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn is_shouting(title: &str) -> bool {
    let letters: Vec<char> = title.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() < 5 {
        return false;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    upper as f64 / letters.len() as f64 > 0.8
}

// ────────────────────────────────────────────────────────────────────────────
// Verification
// ────────────────────────────────────────────────────────────────────────────

const VERIFIED_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceVerification {
    pub verified: bool,
    pub confidence: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

pub fn verify_marketplace_item(item: &MarketplaceItem) -> MarketplaceVerification {
    let mut confidence: f64 = 0.0;
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if item.title.trim().chars().count() >= 5 {
        confidence += 0.2;
    } else {
        issues.push("Title is missing or too short".to_string());
        suggestions.push("Use a descriptive title of at least 5 characters".to_string());
    }

    let description_len = item.description.trim().chars().count();
    if description_len >= 20 {
        confidence += 0.25;
        if description_len >= 100 {
            confidence += 0.05;
        }
    } else {
        issues.push("Description is missing or too short".to_string());
        suggestions.push("Describe the item's condition, age and any defects".to_string());
    }

    match item.price {
        Some(p) if p > 0.0 => confidence += 0.15,
        _ => {
            issues.push("No valid price set".to_string());
            suggestions
                .push("Set a price, or use the pricing assistant for a suggestion".to_string());
        }
    }

    if is_declared_category(&item.category) {
        confidence += 0.1;
    } else if !item.category.trim().is_empty() {
        confidence += 0.05;
        suggestions.push("Choose one of the standard categories".to_string());
    } else {
        issues.push("No category selected".to_string());
    }

    match item.images.len() {
        0 => {
            issues.push("No images provided".to_string());
            suggestions.push("Add at least one clear photo of the item".to_string());
        }
        1 | 2 => {
            confidence += 0.15;
            suggestions.push("Listings with 3 or more photos sell faster".to_string());
        }
        _ => confidence += 0.25,
    }

    let text = item.text();
    if EXCESSIVE_PUNCTUATION_RE.is_match(&text) {
        confidence -= 0.15;
        issues.push("Excessive punctuation".to_string());
    }
    if is_shouting(&item.title) {
        confidence -= 0.1;
        issues.push("Title is written in capitals".to_string());
    }

    let red_flags = RED_FLAG_SCORER.score_text(&text);
    let scam_hits = red_flags.count("scam");
    if scam_hits > 0 {
        confidence -= (scam_hits as f64 * 0.2).min(0.4);
        issues.push(format!(
            "Suspicious payment language: {}",
            red_flags.matched("scam").join(", ")
        ));
    }

    if let (Some(price), Some(band)) = (item.price, price_band(&item.category)) {
        if price > 0.0 && (price < band.min * 0.5 || price > band.max * 1.5) {
            confidence -= 0.2;
            issues.push(format!(
                "Price £{} is outside the usual range for {} (£{}–£{})",
                money(price),
                item.category.trim().to_lowercase(),
                money(band.min),
                money(band.max)
            ));
        }
    }

    if CONTACT_RE.is_match(&item.description) {
        confidence -= 0.1;
        issues.push(
            "Contact details in description; keep communication on the platform".to_string(),
        );
    }

    let confidence = round2(confidence.clamp(0.0, 1.0));
    debug!(confidence, issues = issues.len(), "marketplace item verified");

    MarketplaceVerification {
        verified: confidence > VERIFIED_THRESHOLD,
        confidence,
        issues,
        suggestions,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fraud
// ────────────────────────────────────────────────────────────────────────────

const FRAUD_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceFraudReport {
    pub fraud_detected: bool,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub recommendation: String,
}

pub fn detect_marketplace_fraud(item: &MarketplaceItem) -> MarketplaceFraudReport {
    let text = item.text();
    let flags = RED_FLAG_SCORER.score(&Tokens::new(&text));
    let mut risk: f64 = 0.0;
    let mut reasons = Vec::new();

    let scam_hits = flags.count("scam");
    if scam_hits > 0 {
        risk += (scam_hits as f64 * 0.25).min(0.5);
        reasons.push(format!(
            "Requests unusual payment methods: {}",
            flags.matched("scam").join(", ")
        ));
    }
    if flags.hit("pressure") {
        risk += 0.1;
        reasons.push("Uses pressure tactics".to_string());
    }

    let band = price_band(&item.category).unwrap_or_else(|| {
        let inferred = categorize_marketplace_item(item).suggested_category;
        price_band(&inferred).unwrap_or(FALLBACK_BAND)
    });
    if let Some(price) = item.price {
        if price > 0.0 && price < band.min * 0.5 {
            risk += 0.3;
            reasons.push("Price is far below market value".to_string());
        } else if price > band.max * 1.5 {
            risk += 0.1;
            reasons.push("Price is far above market value".to_string());
        }
    }

    if item.images.is_empty() {
        risk += 0.15;
        reasons.push("No photos of the item".to_string());
    }
    if CONTACT_RE.is_match(&item.description) {
        risk += 0.2;
        reasons.push("Asks buyers to make contact off the platform".to_string());
    }
    if EXCESSIVE_PUNCTUATION_RE.is_match(&text) || is_shouting(&item.title) {
        risk += 0.1;
        reasons.push("Attention-grabbing formatting".to_string());
    }
    if item.description.trim().chars().count() < 20 {
        risk += 0.1;
        reasons.push("Very little detail about the item".to_string());
    }

    let risk_score = round2(risk.clamp(0.0, 1.0));
    let risk_level = RISK_TABLE.classify(risk_score);
    let fraud_detected = risk_score >= FRAUD_THRESHOLD;

    let recommendation = if fraud_detected {
        "Hold this listing for manual review before it is shown to buyers.".to_string()
    } else if risk_level == RiskLevel::Medium {
        "Allow the listing but remind buyers to pay through the platform.".to_string()
    } else {
        "No significant fraud indicators.".to_string()
    };

    MarketplaceFraudReport {
        fraud_detected,
        risk_score,
        risk_level,
        reasons,
        recommendation,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Categorisation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAlternative {
    pub category: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuggestion {
    pub suggested_category: String,
    pub confidence: f64,
    pub alternatives: Vec<CategoryAlternative>,
    pub tags: Vec<String>,
}

pub fn categorize_marketplace_item(item: &MarketplaceItem) -> CategorySuggestion {
    let title = Tokens::new(&item.title);
    let description = Tokens::new(&item.description);
    let declared = item.category.trim().to_lowercase();

    let mut scores: Vec<(&'static str, f64)> = CATEGORY_KEYWORDS
        .iter()
        .map(|(name, words)| {
            let mut score =
                title.count_any(words) as f64 * 2.0 + description.count_any(words) as f64;
            if *name == declared {
                score += 3.0;
            }
            (*name, score)
        })
        .collect();
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = scores.iter().map(|(_, s)| s).sum();
    let (best_name, best_score) = scores[0];

    let mut tags: Vec<String> = Vec::new();
    for (_, words) in CATEGORY_KEYWORDS {
        for w in title.matched(words).into_iter().chain(description.matched(words)) {
            if !tags.iter().any(|t| t == w) {
                tags.push(w.to_string());
            }
        }
    }

    if best_score <= 0.0 {
        return CategorySuggestion {
            suggested_category: FALLBACK_CATEGORY.to_string(),
            confidence: 0.2,
            alternatives: Vec::new(),
            tags,
        };
    }

    let share = best_score / total;
    let strength = (best_score / 6.0).min(1.0);
    let confidence = round2((0.5 * share + 0.5 * strength).clamp(0.0, 1.0));

    let alternatives = scores
        .iter()
        .skip(1)
        .filter(|(_, s)| *s > 0.0)
        .take(3)
        .map(|(name, s)| CategoryAlternative {
            category: name.to_string(),
            confidence: round2((s / total).clamp(0.0, 1.0)),
        })
        .collect();

    CategorySuggestion {
        suggested_category: best_name.to_string(),
        confidence,
        alternatives,
        tags,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pricing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestion {
    pub suggested_price: String,
    pub price_range: PriceRange,
    pub category: String,
    pub condition: String,
    pub market_comparison: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
}

pub fn suggest_marketplace_item_price(item: &MarketplaceItem) -> PriceSuggestion {
    let (category, category_inferred) = if is_declared_category(&item.category) {
        (item.category.trim().to_lowercase(), false)
    } else {
        (categorize_marketplace_item(item).suggested_category, true)
    };
    let band = price_band(&category).unwrap_or(FALLBACK_BAND);

    let (multiplier, condition_known) = match condition_multiplier(&item.condition) {
        Some(m) => (m, true),
        None => (UNKNOWN_CONDITION_MULTIPLIER, false),
    };
    let condition = if condition_known {
        normalize_condition(&item.condition)
    } else {
        "unknown".to_string()
    };

    let suggested = band.typical * multiplier;

    let market_comparison = item.price.filter(|p| *p > 0.0).map(|p| {
        if p > suggested * 1.2 {
            "above market".to_string()
        } else if p < suggested * 0.8 {
            "below market".to_string()
        } else {
            "in line with market".to_string()
        }
    });

    let mut confidence: f64 = 0.85;
    if category_inferred {
        confidence -= 0.2;
    }
    if !condition_known {
        confidence -= 0.15;
    }

    let reasoning = format!(
        "Typical {category} items sell for about £{}; {} condition applies a {:.0}% multiplier.",
        money(band.typical),
        condition.replace('_', " "),
        multiplier * 100.0
    );

    PriceSuggestion {
        suggested_price: money(suggested),
        price_range: PriceRange {
            min: money(suggested * 0.8),
            max: money(suggested * 1.2),
        },
        category,
        condition,
        market_comparison,
        confidence: round2(confidence),
        reasoning,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Valuation
// ────────────────────────────────────────────────────────────────────────────

const VALUE_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "uplift",
        keywords: &[
            "brand new", "sealed", "unopened", "boxed", "original packaging", "receipt", "warranty",
            "latest edition",
        ],
        weight: 0.1,
    },
    KeywordGroup {
        name: "damage",
        keywords: &[
            "damaged", "broken", "scratch", "scratches", "scratched", "missing", "faulty", "stain",
            "stained", "cracked", "worn",
        ],
        weight: -0.15,
    },
    KeywordGroup {
        name: "premium",
        keywords: &[
            "apple", "samsung", "sony", "dell", "bose", "dyson", "north face", "nike", "brompton",
        ],
        weight: 0.15,
    },
];

static VALUE_SCORER: KeywordScorer = KeywordScorer::new(VALUE_GROUPS);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueEstimate {
    pub estimated_value: String,
    pub value_range: PriceRange,
    pub confidence: f64,
    pub factors: Vec<String>,
}

pub fn estimate_marketplace_item_value(item: &MarketplaceItem) -> ValueEstimate {
    let base_suggestion = suggest_marketplace_item_price(item);
    let base: f64 = base_suggestion.suggested_price.parse().unwrap_or(0.0);
    let kw = VALUE_SCORER.score_text(&item.text());

    let uplift = (kw.count("uplift") as f64 * 0.1).min(0.2);
    let damage = (kw.count("damage") as f64 * 0.15).min(0.45);
    let premium = if kw.hit("premium") { 0.15 } else { 0.0 };
    let adjustment = 1.0 + uplift + premium - damage;
    let value = base * adjustment;

    let mut factors = vec![format!(
        "Base value £{} for {} in {} condition",
        money(base),
        base_suggestion.category,
        base_suggestion.condition.replace('_', " ")
    )];
    if uplift > 0.0 {
        factors.push(format!(
            "+{:.0}% for {}",
            uplift * 100.0,
            kw.matched("uplift").join(", ")
        ));
    }
    if premium > 0.0 {
        factors.push(format!("+15% premium brand ({})", kw.matched("premium").join(", ")));
    }
    if damage > 0.0 {
        factors.push(format!(
            "-{:.0}% for wear or damage ({})",
            damage * 100.0,
            kw.matched("damage").join(", ")
        ));
    }

    let mut confidence = base_suggestion.confidence;
    if item.description.trim().chars().count() < 20 {
        confidence -= 0.15;
    }
    if item.images.is_empty() {
        confidence -= 0.1;
    }

    ValueEstimate {
        estimated_value: money(value),
        value_range: PriceRange {
            min: money(value * 0.85),
            max: money(value * 1.15),
        },
        confidence: round2(confidence.clamp(0.0, 1.0)),
        factors,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_item() -> MarketplaceItem {
        MarketplaceItem {
            title: "Organic Chemistry textbook, 5th edition".to_string(),
            description: "Used for one term, a few pencil notes in chapter two but otherwise clean. \
                          Collection from Fallowfield or I can bring it to campus."
                .to_string(),
            category: "textbooks".to_string(),
            condition: "good".to_string(),
            price: Some(40.0),
            images: vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()],
        }
    }

    #[test]
    fn test_suggest_price_textbook_good() {
        let item = MarketplaceItem {
            category: "textbooks".to_string(),
            condition: "good".to_string(),
            ..Default::default()
        };
        let s = suggest_marketplace_item_price(&item);
        assert_eq!(s.suggested_price, "42.00");
        assert_eq!(s.price_range.min, "33.60");
        assert_eq!(s.price_range.max, "50.40");
        assert_eq!(s.category, "textbooks");
    }

    #[test]
    fn test_suggest_price_infers_category_and_handles_unknown_condition() {
        let item = MarketplaceItem {
            title: "Office desk and chair".to_string(),
            condition: "so-so".to_string(),
            ..Default::default()
        };
        let s = suggest_marketplace_item_price(&item);
        assert_eq!(s.category, "furniture");
        assert_eq!(s.condition, "unknown");
        assert_eq!(s.suggested_price, "48.00");
        assert!(s.confidence < 0.85);
    }

    #[test]
    fn test_suggest_price_uses_fallback_band() {
        let item = MarketplaceItem {
            title: "Mystery box".to_string(),
            condition: "new".to_string(),
            ..Default::default()
        };
        let s = suggest_marketplace_item_price(&item);
        assert_eq!(s.category, FALLBACK_CATEGORY);
        assert_eq!(s.suggested_price, "30.00");
        assert_eq!(price_band(FALLBACK_CATEGORY).map(|b| b.typical), Some(30.0));
    }

    #[test]
    fn test_condition_normalisation() {
        assert_eq!(condition_multiplier("Like New"), Some(0.85));
        assert_eq!(condition_multiplier("like-new"), Some(0.85));
        assert_eq!(condition_multiplier("mint"), None);
    }

    #[test]
    fn test_market_comparison() {
        let mut item = good_item();
        item.price = Some(100.0);
        assert_eq!(
            suggest_marketplace_item_price(&item).market_comparison.as_deref(),
            Some("above market")
        );
        item.price = Some(42.0);
        assert_eq!(
            suggest_marketplace_item_price(&item).market_comparison.as_deref(),
            Some("in line with market")
        );
    }

    #[test]
    fn test_verify_complete_listing_is_verified() {
        let v = verify_marketplace_item(&good_item());
        assert!(v.verified, "issues: {:?}", v.issues);
        assert!(v.confidence > 0.7);
        assert!(v.issues.is_empty());
    }

    #[test]
    fn test_verify_empty_item_is_not_verified() {
        let v = verify_marketplace_item(&MarketplaceItem::default());
        assert!(!v.verified);
        assert_eq!(v.confidence, 0.0);
        assert!(!v.issues.is_empty());
    }

    #[test]
    fn test_verify_penalises_red_flags() {
        let mut item = good_item();
        item.title = "CHEAP TEXTBOOK BARGAIN".to_string();
        item.description =
            "Pay by western union or gift card only!!! Amazing deal, no haggling.".to_string();
        let v = verify_marketplace_item(&item);
        assert!(!v.verified);
        assert!(v.issues.iter().any(|i| i.contains("capitals")));
        assert!(v.issues.iter().any(|i| i.contains("punctuation")));
        assert!(v.issues.iter().any(|i| i.contains("western union")));
    }

    #[test]
    fn test_verify_flags_price_outside_band() {
        let mut item = good_item();
        item.price = Some(2.0);
        let v = verify_marketplace_item(&item);
        assert!(v.issues.iter().any(|i| i.contains("outside the usual range")));
    }

    #[test]
    fn test_fraud_clean_listing() {
        let r = detect_marketplace_fraud(&good_item());
        assert!(!r.fraud_detected);
        assert_eq!(r.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_fraud_scam_listing() {
        let item = MarketplaceItem {
            title: "iPhone 15 Pro".to_string(),
            description: "Brand new. Payment upfront by bitcoin only, whatsapp me".to_string(),
            category: "electronics".to_string(),
            condition: "new".to_string(),
            price: Some(5.0),
            images: vec![],
        };
        let r = detect_marketplace_fraud(&item);
        assert!(r.fraud_detected);
        assert_eq!(r.risk_level, RiskLevel::Critical);
        assert_eq!(r.risk_score, 1.0);
    }

    #[test]
    fn test_categorize_from_title() {
        let item = MarketplaceItem {
            title: "Road bike with helmet and lock".to_string(),
            ..Default::default()
        };
        let c = categorize_marketplace_item(&item);
        assert_eq!(c.suggested_category, "bikes");
        assert!(c.confidence > 0.5);
        assert!(c.tags.iter().any(|t| t == "helmet"));
    }

    #[test]
    fn test_categorize_unknown_falls_back_to_other() {
        let c = categorize_marketplace_item(&MarketplaceItem {
            title: "Mystery".to_string(),
            ..Default::default()
        });
        assert_eq!(c.suggested_category, "other");
        assert!((0.0..=1.0).contains(&c.confidence));
    }

    #[test]
    fn test_categorize_always_returns_declared_key() {
        let items = [
            good_item(),
            MarketplaceItem::default(),
            MarketplaceItem {
                title: "kettle toaster laptop desk".to_string(),
                category: "nonsense".to_string(),
                ..Default::default()
            },
        ];
        for item in &items {
            let c = categorize_marketplace_item(item);
            assert!(is_declared_category(&c.suggested_category), "{}", c.suggested_category);
            assert!((0.0..=1.0).contains(&c.confidence));
            for alt in &c.alternatives {
                assert!(is_declared_category(&alt.category));
            }
        }
    }

    #[test]
    fn test_estimate_value_adjusts_for_damage_and_brand() {
        let base = MarketplaceItem {
            title: "Laptop".to_string(),
            description: "Works fine, fully charged and ready to go, includes charger".to_string(),
            category: "electronics".to_string(),
            condition: "good".to_string(),
            price: None,
            images: vec!["x.jpg".into()],
        };
        let plain: f64 = estimate_marketplace_item_value(&base).estimated_value.parse().unwrap();
        assert!((plain - 105.0).abs() < 0.01);

        let mut damaged = base.clone();
        damaged.description = "Cracked screen and damaged hinge, otherwise works".to_string();
        let d: f64 = estimate_marketplace_item_value(&damaged).estimated_value.parse().unwrap();
        assert!(d < plain);

        let mut branded = base.clone();
        branded.title = "Apple laptop".to_string();
        let b: f64 = estimate_marketplace_item_value(&branded).estimated_value.parse().unwrap();
        assert!(b > plain);
    }
}
