//! Job advert copy for the student jobs board.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::templates::{format_list, pick, render};

const DEFAULT_COMPANY: &str = "our client";
const DEFAULT_LOCATION: &str = "the city center";

const TEMPLATES: &[&str] = &[
    "{company} is looking for a motivated {title} to join the team in {location}. \
     This {job_type} role suits someone with {skills}. {responsibilities}{salary}",
    "Join {company} as a {title}! Based in {location}, this {job_type} position is a great \
     opportunity to put {skills} into practice. {responsibilities}{salary}",
    "We are recruiting a {title} for {company} in {location}. The ideal candidate brings \
     {skills} and is comfortable in a {job_type} setting. {responsibilities}{salary}",
];

const CLOSING_LINES: &[&str] = &[
    "Applications are reviewed on a rolling basis, so apply early.",
    "Flexible hours can be arranged around lectures and exams.",
    "Full training is provided, and there is room to grow with the team.",
    "This is an excellent way to build experience alongside your studies.",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionParams {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

pub fn generate_job_description<R: Rng + ?Sized>(
    params: &JobDescriptionParams,
    rng: &mut R,
) -> String {
    let non_blank = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let responsibilities = if params.responsibilities.is_empty() {
        String::new()
    } else {
        format!(
            "Day to day you will {}. ",
            format_list(&params.responsibilities, "")
        )
    };

    let salary = non_blank(&params.salary)
        .map(|s| format!("The role pays {s}."))
        .unwrap_or_else(|| "Competitive pay is offered.".to_string());

    let vars = [
        ("title", params.title.trim().to_string()),
        (
            "company",
            non_blank(&params.company).unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
        ),
        (
            "location",
            non_blank(&params.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        ),
        (
            "job_type",
            non_blank(&params.job_type)
                .map(|t| t.to_lowercase().replace('_', "-"))
                .unwrap_or_else(|| "part-time".to_string()),
        ),
        (
            "skills",
            format_list(&params.skills, "strong communication skills"),
        ),
        ("responsibilities", responsibilities),
        ("salary", salary),
    ];

    let body = render(pick(rng, TEMPLATES), &vars);
    format!("{body}\n\n{}", pick(rng, CLOSING_LINES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_job_description_fills_fields() {
        let params = JobDescriptionParams {
            title: "Lettings Assistant".to_string(),
            company: Some("Northside Lettings".to_string()),
            location: Some("Manchester".to_string()),
            job_type: Some("PART_TIME".to_string()),
            salary: Some("£11.50 per hour".to_string()),
            skills: vec!["customer service".into(), "Excel".into()],
            responsibilities: vec!["book viewings".into(), "answer enquiries".into()],
        };
        let text = generate_job_description(&params, &mut StdRng::seed_from_u64(2));
        assert!(text.contains("Lettings Assistant"));
        assert!(text.contains("Northside Lettings"));
        assert!(text.contains("Manchester"));
        assert!(text.contains("part-time"));
        assert!(text.contains("customer service and Excel"));
        assert!(text.contains("book viewings and answer enquiries"));
        assert!(text.contains("£11.50 per hour"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_job_description_defaults() {
        let params = JobDescriptionParams {
            title: "Barista".to_string(),
            ..Default::default()
        };
        let text = generate_job_description(&params, &mut StdRng::seed_from_u64(5));
        assert!(text.contains("our client"));
        assert!(text.contains("the city center"));
        assert!(text.contains("strong communication skills"));
        assert!(text.contains("Competitive pay"));
    }
}
