//! Task complexity, urgency and scale analysis.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::heuristics::keyword::{KeywordGroup, KeywordScorer, Tokens};
use crate::templates::format_list;

// ────────────────────────────────────────────────────────────────────────────
// Complexity
// ────────────────────────────────────────────────────────────────────────────

const COMPLEXITY_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "high",
        keywords: &[
            "complex", "complicated", "enterprise", "distributed", "architecture", "integration",
            "migration", "overhaul", "large-scale", "multi-tenant", "scalable", "critical",
            "sophisticated", "end-to-end",
        ],
        weight: 3.0,
    },
    KeywordGroup {
        name: "medium",
        keywords: &[
            "moderate", "several", "coordinate", "review", "update", "improve", "analyse",
            "analyze", "report", "schedule", "plan", "organise", "organize",
        ],
        weight: 1.5,
    },
    KeywordGroup {
        name: "low",
        keywords: &["simple", "quick", "easy", "basic", "minor", "small", "straightforward", "routine"],
        weight: -1.0,
    },
    KeywordGroup {
        name: "technical",
        keywords: &[
            "microservice", "microservices", "api", "database", "algorithm", "infrastructure",
            "cloud", "kubernetes", "pipeline", "security", "encryption", "machine learning",
            "automation", "backend", "server",
        ],
        weight: 2.0,
    },
    KeywordGroup {
        name: "business",
        keywords: &[
            "budget", "stakeholder", "stakeholders", "revenue", "regulation", "regulatory",
            "contract", "legal", "client", "audit", "forecast",
        ],
        weight: 1.0,
    },
];

static COMPLEXITY_SCORER: KeywordScorer = KeywordScorer::new(COMPLEXITY_GROUPS);

const INTERDEPENDENCY_PHRASES: &[&str] = &[
    "depends on",
    "dependent on",
    "integrates with",
    "integrate with",
    "multiple systems",
    "cross-team",
    "third-party",
    "across departments",
    "in coordination with",
    "relies on",
];

/// Business domains the platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    PropertyManagement,
    StudentServices,
    Marketplace,
}

const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::PropertyManagement,
        &[
            "property", "properties", "tenant", "tenants", "landlord", "lease", "rent", "tenancy",
            "maintenance", "inspection", "deposit", "compliance", "letting", "lettings",
        ],
    ),
    (
        Domain::StudentServices,
        &[
            "student", "students", "university", "campus", "accommodation", "course",
            "graduate", "internship", "semester", "term",
        ],
    ),
    (
        Domain::Marketplace,
        &[
            "marketplace", "listing", "listings", "buyer", "seller", "sale", "voucher", "item",
            "items", "price", "pricing",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComplexity {
    pub level: ComplexityLevel,
    pub score: f64,
    pub domain: Option<Domain>,
    pub learning_curve: String,
    pub estimated_hours: (u32, u32),
    pub key_factors: Vec<String>,
    pub reasoning: String,
}

pub fn analyze_task_complexity(task: &str) -> TaskComplexity {
    let tokens = Tokens::new(task);
    let kw = COMPLEXITY_SCORER.score(&tokens);

    let high = kw.count("high");
    let medium = kw.count("medium");
    let low = kw.count("low");
    let technical = kw.count("technical");
    let business = kw.count("business");
    let interdependency = tokens.count_any(INTERDEPENDENCY_PHRASES);

    let domain_counts: Vec<(Domain, usize)> = DOMAIN_KEYWORDS
        .iter()
        .map(|(d, words)| (*d, tokens.count_any(words)))
        .collect();
    let domain_boost = domain_counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let domain = domain_counts
        .iter()
        .filter(|(_, c)| *c > 0)
        .fold(None::<(Domain, usize)>, |best, &(d, c)| match best {
            Some((_, bc)) if bc >= c => best,
            _ => Some((d, c)),
        })
        .map(|(d, _)| d);

    let score = kw.weighted + interdependency as f64 * 2.0 + domain_boost as f64 * 0.5;

    let level = if high > 2
        || (high > 0 && technical > 2)
        || score > 10.0
        || interdependency > 2
    {
        ComplexityLevel::VeryHigh
    } else if high > 0 || technical > 1 || score > 4.0 || domain_boost > 2 {
        ComplexityLevel::High
    } else if medium > low || business > 0 || domain_boost > 0 {
        ComplexityLevel::Medium
    } else {
        ComplexityLevel::Low
    };

    let (learning_curve, estimated_hours) = match level {
        ComplexityLevel::Low => ("minimal", (1, 4)),
        ComplexityLevel::Medium => ("moderate", (4, 16)),
        ComplexityLevel::High => ("significant", (16, 60)),
        ComplexityLevel::VeryHigh => ("steep", (60, 200)),
    };

    let mut key_factors: Vec<String> = Vec::new();
    for group in ["high", "technical", "business"] {
        key_factors.extend(kw.matched(group).iter().map(|s| s.to_string()));
    }
    key_factors.extend(
        tokens
            .matched(INTERDEPENDENCY_PHRASES)
            .into_iter()
            .map(str::to_string),
    );

    let reasoning = complexity_reasoning(level, &key_factors, domain, interdependency);

    debug!(
        high,
        medium,
        low,
        technical,
        business,
        interdependency,
        domain_boost,
        score,
        "task complexity scored"
    );

    TaskComplexity {
        level,
        score,
        domain,
        learning_curve: learning_curve.to_string(),
        estimated_hours,
        key_factors,
        reasoning,
    }
}

fn complexity_reasoning(
    level: ComplexityLevel,
    factors: &[String],
    domain: Option<Domain>,
    interdependency: usize,
) -> String {
    let level_text = match level {
        ComplexityLevel::Low => "low",
        ComplexityLevel::Medium => "medium",
        ComplexityLevel::High => "high",
        ComplexityLevel::VeryHigh => "very high",
    };
    let mut out = format!("Assessed as {level_text} complexity");
    if factors.is_empty() {
        out.push_str(" with no significant complexity indicators.");
    } else {
        out.push_str(&format!(
            " based on {}.",
            format_list(&factors.iter().take(5).collect::<Vec<_>>(), "")
        ));
    }
    if interdependency > 0 {
        out.push_str(&format!(
            " The task has {interdependency} dependency signal(s) on other work."
        ));
    }
    if let Some(d) = domain {
        let name = match d {
            Domain::PropertyManagement => "property management",
            Domain::StudentServices => "student services",
            Domain::Marketplace => "marketplace",
        };
        out.push_str(&format!(" Primary domain: {name}."));
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Urgency
// ────────────────────────────────────────────────────────────────────────────

const URGENCY_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "immediate",
        keywords: &[
            "immediate", "immediately", "urgent", "urgently", "asap", "emergency", "critical",
            "now", "today", "tonight", "right away",
        ],
        weight: 3.0,
    },
    KeywordGroup {
        name: "scheduled",
        keywords: &[
            "scheduled", "planned", "deadline", "due", "timeline", "milestone", "this week",
            "next week", "by friday", "end of month",
        ],
        weight: 1.5,
    },
    KeywordGroup {
        name: "flexible",
        keywords: &[
            "flexible", "whenever", "eventually", "someday", "no rush", "low priority",
            "when possible", "no deadline",
        ],
        weight: -1.0,
    },
];

static URGENCY_SCORER: KeywordScorer = KeywordScorer::new(URGENCY_GROUPS);

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b\d{1,2}[/\-.]\d{1,2}(?:[/\-.]\d{2,4})?\b
        | \b\d{4}-\d{2}-\d{2}\b
        | \b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|tomorrow)\b
        | \b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\s+\d{1,2}(?:st|nd|rd|th)?\b
        | \b\d{1,2}(?:st|nd|rd|th)?\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\b
        ",
    )
    .expect("valid date regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUrgency {
    pub level: UrgencyLevel,
    pub timeframe: String,
    pub has_date_reference: bool,
    pub indicators: Vec<String>,
    pub reasoning: String,
}

pub fn analyze_task_urgency(constraints: &str) -> TaskUrgency {
    let tokens = Tokens::new(constraints);
    let kw = URGENCY_SCORER.score(&tokens);
    let immediate = kw.count("immediate");
    let scheduled = kw.count("scheduled");
    let flexible = kw.count("flexible");
    let dates: Vec<String> = DATE_RE
        .find_iter(constraints)
        .map(|m| m.as_str().to_string())
        .collect();
    let has_date = !dates.is_empty();

    let level = if immediate >= 2 || (immediate >= 1 && has_date) {
        UrgencyLevel::Critical
    } else if immediate >= 1 || (scheduled >= 1 && has_date) {
        UrgencyLevel::High
    } else if (scheduled >= 1 || has_date) && flexible == 0 {
        UrgencyLevel::Moderate
    } else if scheduled > flexible {
        UrgencyLevel::Moderate
    } else {
        UrgencyLevel::Low
    };

    let timeframe = match level {
        UrgencyLevel::Critical => "within 24 hours",
        UrgencyLevel::High => "within 3 days",
        UrgencyLevel::Moderate => "within 2 weeks",
        UrgencyLevel::Low => "flexible",
    };

    let mut indicators: Vec<String> = Vec::new();
    for group in ["immediate", "scheduled", "flexible"] {
        indicators.extend(kw.matched(group).iter().map(|s| s.to_string()));
    }
    indicators.extend(dates);

    let reasoning = if indicators.is_empty() {
        "No urgency indicators found; treating the task as flexible.".to_string()
    } else {
        format!(
            "Urgency inferred from {} ({immediate} immediate, {scheduled} scheduled, {flexible} flexible signal(s)).",
            format_list(&indicators, "")
        )
    };

    TaskUrgency {
        level,
        timeframe: timeframe.to_string(),
        has_date_reference: has_date,
        indicators,
        reasoning,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scale
// ────────────────────────────────────────────────────────────────────────────

const SCALE_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "organization",
        keywords: &[
            "enterprise", "global", "company-wide", "organisation", "organization",
            "organisation-wide", "organization-wide", "nationwide", "international", "portfolio",
            "all properties", "all offices",
        ],
        weight: 4.0,
    },
    KeywordGroup {
        name: "department",
        keywords: &["department", "departments", "division", "branch", "region", "regional", "office"],
        weight: 3.0,
    },
    KeywordGroup {
        name: "team",
        keywords: &["team", "teams", "group", "squad", "colleagues", "staff", "together"],
        weight: 2.0,
    },
    KeywordGroup {
        name: "individual",
        keywords: &["individual", "personal", "myself", "solo", "single", "alone", "one person"],
        weight: 1.0,
    },
    KeywordGroup {
        name: "resources",
        keywords: &[
            "budget", "resources", "headcount", "hire", "hiring", "funding", "equipment",
            "contractors", "vendors",
        ],
        weight: 1.0,
    },
];

static SCALE_SCORER: KeywordScorer = KeywordScorer::new(SCALE_GROUPS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleSize {
    Individual,
    Team,
    Department,
    Organization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskScale {
    pub size: ScaleSize,
    pub estimated_people: (u32, u32),
    pub resource_requirements: Vec<String>,
    pub reasoning: String,
}

pub fn analyze_task_scale(task: &str, constraints: &str) -> TaskScale {
    let tokens = Tokens::new(&format!("{task} {constraints}"));
    let kw = SCALE_SCORER.score(&tokens);
    let org = kw.count("organization");
    let dept = kw.count("department");
    let team = kw.count("team");
    let resources = kw.count("resources");

    let size = if org > 0 || (dept > 1 && resources > 0) {
        ScaleSize::Organization
    } else if dept > 0 || (team > 1 && resources > 0) {
        ScaleSize::Department
    } else if team > 0 || resources > 1 {
        ScaleSize::Team
    } else {
        ScaleSize::Individual
    };

    let estimated_people = match size {
        ScaleSize::Individual => (1, 1),
        ScaleSize::Team => (2, 8),
        ScaleSize::Department => (8, 30),
        ScaleSize::Organization => (30, 200),
    };

    let mut resource_requirements: Vec<String> = kw
        .matched("resources")
        .iter()
        .map(|r| format!("{r} planning"))
        .collect();
    if size >= ScaleSize::Department {
        resource_requirements.push("cross-team coordination".to_string());
    }
    if size == ScaleSize::Organization {
        resource_requirements.push("executive sponsorship".to_string());
    }

    let size_text = match size {
        ScaleSize::Individual => "an individual",
        ScaleSize::Team => "a team",
        ScaleSize::Department => "a department",
        ScaleSize::Organization => "an organisation",
    };
    let reasoning = format!(
        "Scoped at {size_text} level ({org} organisation, {dept} department, {team} team and {resources} resource signal(s))."
    );

    TaskScale {
        size,
        estimated_people,
        resource_requirements,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_task_is_low() {
        let c = analyze_task_complexity("simple quick task");
        assert_eq!(c.level, ComplexityLevel::Low);
        assert_eq!(c.learning_curve, "minimal");
        assert!(c.domain.is_none());
    }

    #[test]
    fn test_enterprise_architecture_is_very_high() {
        let c = analyze_task_complexity(
            "complex enterprise-scale distributed microservice architecture integration",
        );
        assert_eq!(c.level, ComplexityLevel::VeryHigh);
        assert_eq!(c.learning_curve, "steep");
        assert!(c.key_factors.iter().any(|f| f == "distributed"));
    }

    #[test]
    fn test_single_high_keyword_is_high() {
        let c = analyze_task_complexity("plan the boiler migration");
        assert_eq!(c.level, ComplexityLevel::High);
    }

    #[test]
    fn test_domain_keyword_lifts_to_medium() {
        let c = analyze_task_complexity("chase the tenant for rent");
        assert_eq!(c.level, ComplexityLevel::Medium);
        assert_eq!(c.domain, Some(Domain::PropertyManagement));
    }

    #[test]
    fn test_domain_classification_picks_largest() {
        let c = analyze_task_complexity("help a student at the university find campus accommodation near a property");
        assert_eq!(c.domain, Some(Domain::StudentServices));
    }

    #[test]
    fn test_interdependencies_force_very_high() {
        let c = analyze_task_complexity(
            "this depends on payments, relies on the CRM and integrates with the portal",
        );
        assert_eq!(c.level, ComplexityLevel::VeryHigh);
    }

    #[test]
    fn test_complexity_serializes_snake_case_level() {
        let c = analyze_task_complexity("simple");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["level"], "low");
        assert!(json.get("learningCurve").is_some());
    }

    #[test]
    fn test_urgency_critical_with_date() {
        let u = analyze_task_urgency("urgent: must be fixed by 12/03/2025");
        assert_eq!(u.level, UrgencyLevel::Critical);
        assert!(u.has_date_reference);
        assert_eq!(u.timeframe, "within 24 hours");
    }

    #[test]
    fn test_urgency_two_immediate_words_is_critical() {
        assert_eq!(
            analyze_task_urgency("emergency leak, needs attention immediately").level,
            UrgencyLevel::Critical
        );
    }

    #[test]
    fn test_urgency_high_single_word() {
        assert_eq!(analyze_task_urgency("this is urgent").level, UrgencyLevel::High);
    }

    #[test]
    fn test_urgency_moderate_when_scheduled() {
        assert_eq!(
            analyze_task_urgency("planned for the next inspection cycle").level,
            UrgencyLevel::Moderate
        );
    }

    #[test]
    fn test_urgency_low_when_flexible_or_silent() {
        assert_eq!(analyze_task_urgency("no rush, whenever").level, UrgencyLevel::Low);
        assert_eq!(analyze_task_urgency("").level, UrgencyLevel::Low);
    }

    #[test]
    fn test_urgency_detects_weekday_and_month_dates() {
        assert!(analyze_task_urgency("due on Friday").has_date_reference);
        assert!(analyze_task_urgency("before March 3rd").has_date_reference);
        assert!(!analyze_task_urgency("sometime soon").has_date_reference);
    }

    #[test]
    fn test_scale_levels() {
        assert_eq!(analyze_task_scale("update my notes", "").size, ScaleSize::Individual);
        assert_eq!(analyze_task_scale("brief the team", "").size, ScaleSize::Team);
        assert_eq!(
            analyze_task_scale("roll out to the lettings department", "").size,
            ScaleSize::Department
        );
        assert_eq!(
            analyze_task_scale("apply across the whole portfolio", "budget approved").size,
            ScaleSize::Organization
        );
    }

    #[test]
    fn test_scale_resources_without_team_words() {
        let s = analyze_task_scale("refit", "needs budget and contractors");
        assert_eq!(s.size, ScaleSize::Team);
        assert!(s
            .resource_requirements
            .iter()
            .any(|r| r == "budget planning"));
    }
}
