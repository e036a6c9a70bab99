//! Marketplace listing copy.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::templates::{format_list, pick, render};

const TEMPLATES: &[&str] = &[
    "For sale: {title}, in {condition} condition. {features_sentence}Ideal for anyone after {category_phrase}. {price_sentence}",
    "{title} up for grabs! Condition: {condition}. {features_sentence}{price_sentence} A great pick if you need {category_phrase}.",
    "Selling my {title} ({condition} condition). {features_sentence}Perfect for {category_phrase}. {price_sentence}",
];

const CLOSERS: &[&str] = &[
    "Collection from campus or nearby can be arranged.",
    "Message me through the marketplace with any questions.",
    "Happy to send more photos on request.",
    "First to collect gets it.",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceListingParams {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
}

fn category_phrase(category: Option<&str>) -> &'static str {
    match category.map(|c| c.trim().to_lowercase()).as_deref() {
        Some("textbooks") => "course reading on a budget",
        Some("electronics") => "reliable tech for studying",
        Some("furniture") => "furnishing a student room",
        Some("kitchen") => "kitting out a shared kitchen",
        Some("clothing") => "a wardrobe refresh",
        Some("sports") => "staying active during term",
        Some("bikes") => "getting around town",
        Some("stationery") => "lecture essentials",
        _ => "a bargain",
    }
}

pub fn generate_marketplace_listing<R: Rng + ?Sized>(
    params: &MarketplaceListingParams,
    rng: &mut R,
) -> String {
    let condition = params
        .condition
        .as_deref()
        .map(|c| c.trim().to_lowercase().replace('_', " "))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "good".to_string());

    let features_sentence = if params.features.is_empty() {
        String::new()
    } else {
        format!("Comes with {}. ", format_list(&params.features, ""))
    };

    let price_sentence = match params.price {
        Some(p) if p > 0.0 => format!("Asking £{p:.2}."),
        Some(_) => "Free to a good home.".to_string(),
        None => "Open to sensible offers.".to_string(),
    };

    let vars = [
        ("title", params.title.trim().to_string()),
        ("condition", condition),
        ("features_sentence", features_sentence),
        (
            "category_phrase",
            category_phrase(params.category.as_deref()).to_string(),
        ),
        ("price_sentence", price_sentence),
    ];

    let body = render(pick(rng, TEMPLATES), &vars);
    format!("{body} {}", pick(rng, CLOSERS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_listing_mentions_price_and_condition() {
        let params = MarketplaceListingParams {
            title: "Desk lamp".to_string(),
            category: Some("furniture".to_string()),
            condition: Some("like_new".to_string()),
            price: Some(12.5),
            features: vec!["a spare bulb".into()],
        };
        let text = generate_marketplace_listing(&params, &mut StdRng::seed_from_u64(7));
        assert!(text.contains("Desk lamp"));
        assert!(text.contains("like new"));
        assert!(text.contains("£12.50"));
        assert!(text.contains("a spare bulb"));
        assert!(text.contains("furnishing a student room"));
    }

    #[test]
    fn test_listing_zero_price_is_free() {
        let params = MarketplaceListingParams {
            title: "Box of hangers".to_string(),
            price: Some(0.0),
            ..Default::default()
        };
        let text = generate_marketplace_listing(&params, &mut StdRng::seed_from_u64(1));
        assert!(text.contains("Free to a good home"));
        assert!(text.contains("a bargain"));
    }
}
