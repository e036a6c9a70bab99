//! Resume skill extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::heuristics::keyword::Tokens;
use crate::templates::format_list;

const TECHNICAL_SKILLS: &[&str] = &[
    "python", "java", "javascript", "typescript", "rust", "c++", "c#", "sql", "html", "css",
    "react", "node.js", "excel", "powerpoint", "word", "tableau", "power bi", "photoshop",
    "figma", "autocad", "matlab", "r", "git", "aws", "azure", "salesforce", "xero", "sage",
    "data analysis", "machine learning", "social media", "seo", "accounting", "bookkeeping",
];

const SOFT_SKILLS: &[&str] = &[
    "communication", "teamwork", "leadership", "problem solving", "problem-solving",
    "time management", "customer service", "negotiation", "organisation", "organization",
    "attention to detail", "adaptability", "creativity", "critical thinking", "presentation",
    "multitasking", "interpersonal",
];

const EDUCATION_LEVELS: &[(EducationLevel, &[&str])] = &[
    (EducationLevel::Doctorate, &["phd", "doctorate", "dphil"]),
    (
        EducationLevel::Masters,
        &["masters", "master's", "msc", "ma", "mba", "mres", "postgraduate"],
    ),
    (
        EducationLevel::Bachelors,
        &["bachelor", "bachelors", "bachelor's", "bsc", "ba", "beng", "llb", "undergraduate", "degree"],
    ),
    (
        EducationLevel::Secondary,
        &["a-level", "a-levels", "a level", "a levels", "gcse", "gcses", "btec", "sixth form"],
    ),
];

static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})\+?\s*(?:years?|yrs?)(?:\s+of)?\s+(?:\w+\s+)?experience")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Secondary,
    Bachelors,
    Masters,
    Doctorate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSkills {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub years_of_experience: Option<u32>,
    pub education_level: Option<EducationLevel>,
    pub summary: String,
}

/// Symbols such as `c++` and `c#` don't survive tokenisation, so they are matched
/// against the raw lower-cased text instead.
fn contains_skill(tokens: &Tokens, skill: &str) -> bool {
    if skill.contains(['+', '#']) {
        let raw = tokens.raw();
        raw.match_indices(skill).any(|(idx, m)| {
            let before_ok = raw[..idx]
                .chars()
                .next_back()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true);
            let after_ok = raw[idx + m.len()..]
                .chars()
                .next()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true);
            before_ok && after_ok
        })
    } else {
        tokens.contains(skill)
    }
}

pub fn extract_resume_skills(text: &str) -> ResumeSkills {
    let tokens = Tokens::new(text);

    let technical_skills: Vec<String> = TECHNICAL_SKILLS
        .iter()
        .filter(|s| contains_skill(&tokens, s))
        .map(|s| s.to_string())
        .collect();

    let mut soft_skills: Vec<String> = Vec::new();
    for skill in SOFT_SKILLS {
        if tokens.contains(skill) {
            // problem-solving / problem solving and organisation / organization are one skill
            let canonical = skill.replace('-', " ").replace("organization", "organisation");
            if !soft_skills.contains(&canonical) {
                soft_skills.push(canonical);
            }
        }
    }

    let years_of_experience = YEARS_RE
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .max();

    let education_level = EDUCATION_LEVELS
        .iter()
        .find(|(_, words)| words.iter().any(|w| tokens.contains(w)))
        .map(|(level, _)| *level);

    let summary = if technical_skills.is_empty() && soft_skills.is_empty() {
        "No recognised skills found.".to_string()
    } else {
        let mut parts = Vec::new();
        if !technical_skills.is_empty() {
            parts.push(format!(
                "technical skills in {}",
                format_list(&technical_skills, "")
            ));
        }
        if !soft_skills.is_empty() {
            parts.push(format!("strengths in {}", format_list(&soft_skills, "")));
        }
        let mut s = format!("Candidate shows {}", parts.join(" and "));
        if let Some(years) = years_of_experience {
            s.push_str(&format!(", with {years} year(s) of experience"));
        }
        s.push('.');
        s
    };

    ResumeSkills {
        technical_skills,
        soft_skills,
        years_of_experience,
        education_level,
        summary,
    }
}
