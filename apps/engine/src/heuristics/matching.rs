//! Student-to-job matching.
//!
//! Algorithm, per job:
//! 1. Start at 50.
//! 2. Required-skill overlap: ≥75% → +25, ≥50% → +15, >0% → +5, none → −15.
//! 3. Any overlap between the job's preferred skills and the student's skills
//!    (including the ones they would like to use) → +10.
//! 4. Location: match (or remote) → +15, mismatch → −5.
//! 5. Salary at or above the student's minimum → +10, below → −10.
//! 6. Job type: match → +15, mismatch → −5.
//! 7. Clamp to 0–100, sort descending, keep the top 10.
//!
//! Signals the student or job leave blank contribute nothing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

const BASE_COMPATIBILITY: i32 = 50;
const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfile {
    pub skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    #[serde(alias = "preferredLocation")]
    pub location: Option<String>,
    pub min_salary: Option<f64>,
    pub preferred_job_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobOpening {
    pub id: String,
    pub title: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub location: Option<String>,
    pub salary: Option<f64>,
    pub job_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub job_id: String,
    pub title: String,
    pub compatibility: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub reasons: Vec<String>,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn normalize_job_type(s: &str) -> String {
    normalize(s).replace([' ', '_'], "-")
}

fn skill_overlap_delta(fraction: f64) -> i32 {
    if fraction >= 0.75 {
        25
    } else if fraction >= 0.5 {
        15
    } else if fraction > 0.0 {
        5
    } else {
        -15
    }
}

pub fn score_job(student: &StudentProfile, job: &JobOpening) -> JobMatch {
    let student_skills: HashSet<String> = student.skills.iter().map(|s| normalize(s)).collect();
    let mut compatibility = BASE_COMPATIBILITY;
    let mut reasons = Vec::new();

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = job
        .required_skills
        .iter()
        .cloned()
        .partition(|s| student_skills.contains(&normalize(s)));

    if !job.required_skills.is_empty() {
        let fraction = matched_skills.len() as f64 / job.required_skills.len() as f64;
        let delta = skill_overlap_delta(fraction);
        compatibility += delta;
        reasons.push(format!(
            "{:.0}% of required skills matched ({delta:+})",
            fraction * 100.0
        ));
    }

    let student_preferred: HashSet<String> =
        student.preferred_skills.iter().map(|s| normalize(s)).collect();
    let preferred_hits = job
        .preferred_skills
        .iter()
        .map(|s| normalize(s))
        .filter(|s| student_skills.contains(s) || student_preferred.contains(s))
        .count();
    if preferred_hits > 0 {
        compatibility += 10;
        reasons.push(format!("{preferred_hits} preferred skill(s) matched (+10)"));
    }

    if let (Some(wanted), Some(actual)) = (
        student.location.as_deref().map(normalize).filter(|s| !s.is_empty()),
        job.location.as_deref().map(normalize).filter(|s| !s.is_empty()),
    ) {
        if actual == wanted || actual.contains(&wanted) || actual == "remote" {
            compatibility += 15;
            reasons.push("Location matches (+15)".to_string());
        } else {
            compatibility -= 5;
            reasons.push(format!("Located in {actual} (-5)"));
        }
    }

    if let (Some(min), Some(salary)) = (student.min_salary, job.salary) {
        if salary >= min {
            compatibility += 10;
            reasons.push("Meets salary expectation (+10)".to_string());
        } else {
            compatibility -= 10;
            reasons.push("Below salary expectation (-10)".to_string());
        }
    }

    if let Some(job_type) = job.job_type.as_deref().map(normalize_job_type) {
        if !student.preferred_job_types.is_empty() {
            if student
                .preferred_job_types
                .iter()
                .any(|t| normalize_job_type(t) == job_type)
            {
                compatibility += 15;
                reasons.push("Preferred job type (+15)".to_string());
            } else {
                compatibility -= 5;
                reasons.push(format!("Job type {job_type} not preferred (-5)"));
            }
        }
    }

    JobMatch {
        job_id: job.id.clone(),
        title: job.title.clone(),
        compatibility: compatibility.clamp(0, 100) as u32,
        matched_skills,
        missing_skills,
        reasons,
    }
}

/// Scores every job for the student and returns the ten best matches.
pub fn match_student_to_jobs(student: &StudentProfile, jobs: &[JobOpening]) -> Vec<JobMatch> {
    let mut matches: Vec<JobMatch> = jobs.iter().map(|job| score_job(student, job)).collect();
    // stable sort keeps input order among equal scores
    matches.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));
    matches.truncate(MAX_RESULTS);
    debug!(
        candidates = jobs.len(),
        returned = matches.len(),
        "matched student to jobs"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> StudentProfile {
        StudentProfile {
            skills: vec!["Excel".into(), "Customer Service".into(), "Python".into()],
            location: Some("Leeds".into()),
            min_salary: Some(11.0),
            preferred_job_types: vec!["part-time".into()],
            ..Default::default()
        }
    }

    fn job(id: &str, required: &[&str]) -> JobOpening {
        JobOpening {
            id: id.to_string(),
            title: format!("Job {id}"),
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_perfect_match_is_clamped_to_100() {
        let j = JobOpening {
            id: "1".into(),
            title: "Data Assistant".into(),
            required_skills: vec!["excel".into(), "python".into()],
            preferred_skills: vec!["customer service".into()],
            location: Some("Leeds".into()),
            salary: Some(12.0),
            job_type: Some("PART_TIME".into()),
        };
        let m = score_job(&student(), &j);
        // 50 + 25 + 10 + 15 + 10 + 15
        assert_eq!(m.compatibility, 100);
        assert_eq!(m.matched_skills.len(), 2);
        assert!(m.missing_skills.is_empty());
    }

    #[test]
    fn test_skill_overlap_deltas() {
        assert_eq!(skill_overlap_delta(1.0), 25);
        assert_eq!(skill_overlap_delta(0.75), 25);
        assert_eq!(skill_overlap_delta(0.5), 15);
        assert_eq!(skill_overlap_delta(0.1), 5);
        assert_eq!(skill_overlap_delta(0.0), -15);
    }

    #[test]
    fn test_no_overlap_and_mismatches() {
        let j = JobOpening {
            id: "2".into(),
            title: "Welder".into(),
            required_skills: vec!["welding".into()],
            location: Some("Cardiff".into()),
            salary: Some(9.0),
            job_type: Some("full-time".into()),
            ..Default::default()
        };
        let m = score_job(&student(), &j);
        // 50 - 15 - 5 - 10 - 5
        assert_eq!(m.compatibility, 15);
        assert_eq!(m.missing_skills, vec!["welding".to_string()]);
    }

    #[test]
    fn test_remote_counts_as_location_match() {
        let mut j = job("3", &[]);
        j.location = Some("Remote".into());
        assert_eq!(score_job(&student(), &j).compatibility, 65);
    }

    #[test]
    fn test_unknown_signals_are_neutral() {
        let m = score_job(&StudentProfile::default(), &job("4", &[]));
        assert_eq!(m.compatibility, 50);
        assert!(m.reasons.is_empty());
    }

    #[test]
    fn test_results_sorted_and_limited_to_ten() {
        let mut jobs: Vec<JobOpening> =
            (0..15).map(|i| job(&i.to_string(), &["welding"])).collect();
        jobs.push(job("best", &["excel"]));
        let matches = match_student_to_jobs(&student(), &jobs);
        assert_eq!(matches.len(), 10);
        assert_eq!(matches[0].job_id, "best");
        assert!(matches
            .windows(2)
            .all(|w| w[0].compatibility >= w[1].compatibility));
    }

    #[test]
    fn test_all_penalties_stack() {
        let j = JobOpening {
            id: "5".into(),
            required_skills: vec!["a".into()],
            location: Some("Paris".into()),
            salary: Some(1.0),
            job_type: Some("contract".into()),
            ..Default::default()
        };
        let profile = StudentProfile {
            location: Some("Leeds".into()),
            min_salary: Some(100.0),
            preferred_job_types: vec!["internship".into()],
            ..Default::default()
        };
        assert_eq!(score_job(&profile, &j).compatibility, 15);
    }

    #[test]
    fn test_student_preferred_skills_count_towards_preferred_overlap() {
        let mut j = job("6", &[]);
        j.preferred_skills = vec!["Photography".into()];
        let profile = StudentProfile {
            preferred_skills: vec!["photography".into()],
            ..Default::default()
        };
        let m = score_job(&profile, &j);
        assert_eq!(m.compatibility, 60);
        assert!(m.reasons[0].contains("preferred skill"));
    }

    #[test]
    fn test_profile_deserializes_location_and_preferred_skills() {
        let p: StudentProfile = serde_json::from_str(
            r#"{"skills":["excel"],"preferredSkills":["sql"],"location":"York","minSalary":10}"#,
        )
        .unwrap();
        assert_eq!(p.location.as_deref(), Some("York"));
        assert_eq!(p.preferred_skills, vec!["sql".to_string()]);

        let legacy: StudentProfile =
            serde_json::from_str(r#"{"preferredLocation":"Hull"}"#).unwrap();
        assert_eq!(legacy.location.as_deref(), Some("Hull"));
    }
}
