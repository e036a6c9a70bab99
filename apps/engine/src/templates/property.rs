//! Property description copy.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::templates::{format_list, pick, pluralize, render};

const DEFAULT_LOCATION: &str = "the city center";
const DEFAULT_FEATURES: &str = "modern amenities";

const TEMPLATES: &[&str] = &[
    "Welcome to {title}, a {furnished}{property_type} offering {bedrooms} and {bathrooms} in {location}. \
     Thoughtfully laid out and finished to a high standard, this home features {features}. \
     It is ideally suited to {audience}.",
    "{title} is a stylish {furnished}{property_type} located in {location}. With {bedrooms} and \
     {bathrooms}, it provides comfortable living space for {audience}. Highlights include {features}.",
    "Discover {title}: {bedrooms}, {bathrooms}, and a well-proportioned layout in {location}. \
     This {furnished}{property_type} comes with {features}, making it a great choice for {audience}.",
    "Located in {location}, {title} is a {furnished}{property_type} with {bedrooms} and {bathrooms}. \
     Residents will appreciate {features}. Perfect for {audience} looking for a place to call home.",
];

const ADDITIONAL_INFO: &[&str] = &[
    "Local shops, cafés and transport links are all within easy walking distance.",
    "Viewings are highly recommended to appreciate the space on offer.",
    "The property is managed by our dedicated team, with a responsive maintenance service available throughout the tenancy.",
    "Bills can be included on request, and flexible tenancy lengths are available.",
    "An energy-efficient heating system helps keep running costs down throughout the year.",
    "Secure entry and well-lit communal areas provide extra peace of mind.",
];

/// Parameters for a property description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptionParams {
    pub title: String,
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub furnished: Option<bool>,
}

/// Infers who the listing is aimed at.
///
/// A named university always wins; otherwise the property type decides.
pub fn target_audience(property_type: &str, university: Option<&str>) -> String {
    if let Some(uni) = university.map(str::trim).filter(|u| !u.is_empty()) {
        return format!("students at {uni}");
    }

    let kind = property_type.to_lowercase();
    if kind.contains("studio") {
        "young professionals and postgraduate students".to_string()
    } else if kind.contains("hmo") || kind.contains("shared") {
        "groups of sharers and students".to_string()
    } else if kind.contains("flat") || kind.contains("apartment") {
        "young professionals and couples".to_string()
    } else if kind.contains("house") || kind.contains("bungalow") || kind.contains("cottage") {
        "families and sharers".to_string()
    } else {
        "a wide range of tenants".to_string()
    }
}

/// Renders a property description with one additional-info paragraph appended.
pub fn generate_property_description<R: Rng + ?Sized>(
    params: &PropertyDescriptionParams,
    rng: &mut R,
) -> String {
    let location = params
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOCATION);

    let property_type = if params.property_type.trim().is_empty() {
        "property".to_string()
    } else {
        params.property_type.trim().to_lowercase()
    };

    let title = if params.title.trim().is_empty() {
        "this property".to_string()
    } else {
        params.title.trim().to_string()
    };

    let furnished = match params.furnished {
        Some(true) => "fully furnished ",
        Some(false) => "unfurnished ",
        None => "",
    };

    let vars = [
        ("title", title),
        ("property_type", property_type.clone()),
        ("bedrooms", pluralize(params.bedrooms, "bedroom")),
        ("bathrooms", pluralize(params.bathrooms, "bathroom")),
        ("location", location.to_string()),
        ("features", format_list(&params.features, DEFAULT_FEATURES)),
        ("furnished", furnished.to_string()),
        (
            "audience",
            target_audience(&property_type, params.university.as_deref()),
        ),
    ];

    let body = render(pick(rng, TEMPLATES), &vars);
    let extra = pick(rng, ADDITIONAL_INFO);

    format!("{body}\n\n{extra}")
}
