//! Template Renderer: fills natural-language templates with request parameters
//! and randomly selected filler. Every generator takes an injected `Rng` so tests
//! can pin the output with a seeded `StdRng`.

pub mod completion;
pub mod job;
pub mod marketplace;
pub mod property;

use std::ops::RangeInclusive;
use std::time::Duration;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::{Captures, Regex};

/// Simulated latency for copy generation, in milliseconds.
pub const COPY_LATENCY_MS: RangeInclusive<u64> = 200..=1200;
/// Simulated latency for analysis endpoints.
pub const ANALYSIS_LATENCY_MS: RangeInclusive<u64> = 300..=1500;
/// Simulated latency for image synthesis.
pub const IMAGE_LATENCY_MS: RangeInclusive<u64> = 1000..=3000;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid regex"));

/// Replaces every `{key}` in `template` with its value in a single pass.
///
/// Substituted values are never re-scanned, so user text containing braces is kept
/// verbatim. Unknown placeholders are left as they are.
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            vars.iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Joins items as natural English: `A`, `A and B`, `A, B, and C`.
/// Returns `fallback` when there is nothing to list.
pub fn format_list<S: AsRef<str>>(items: &[S], fallback: &str) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();

    match items.as_slice() {
        [] => fallback.to_string(),
        [one] => one.to_string(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

/// `1 bedroom`, `2 bedrooms`
pub fn pluralize(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Picks one template. `options` must be non-empty.
pub(crate) fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Sleeps for a random duration inside `range` when enabled.
pub async fn simulate_latency(enabled: bool, range: RangeInclusive<u64>) {
    if !enabled {
        return;
    }
    let millis = rand::thread_rng().gen_range(range);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_list_empty_uses_fallback() {
        let empty: [&str; 0] = [];
        assert_eq!(format_list(&empty, "modern amenities"), "modern amenities");
    }

    #[test]
    fn test_format_list_one_two_three() {
        assert_eq!(format_list(&["garden"], ""), "garden");
        assert_eq!(format_list(&["garden", "parking"], ""), "garden and parking");
        assert_eq!(
            format_list(&["garden", "parking", "Wi-Fi"], ""),
            "garden, parking, and Wi-Fi"
        );
    }

    #[test]
    fn test_format_list_skips_blank_items() {
        assert_eq!(format_list(&["garden", " ", "parking"], ""), "garden and parking");
    }

    #[test]
    fn test_render_replaces_all_occurrences() {
        let out = render(
            "{name} lives in {city}. {name} likes it.",
            &[("name", "Sam".to_string()), ("city", "Leeds".to_string())],
        );
        assert_eq!(out, "Sam lives in Leeds. Sam likes it.");
    }

    #[test]
    fn test_render_does_not_expand_placeholders_inside_values() {
        let out = render(
            "Welcome to {title} in {location}.",
            &[
                ("title", "The {location} Loft".to_string()),
                ("location", "Headingley".to_string()),
            ],
        );
        assert_eq!(out, "Welcome to The {location} Loft in Headingley.");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{unknown}", &[]), "{unknown}");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "bedroom"), "1 bedroom");
        assert_eq!(pluralize(3, "bathroom"), "3 bathrooms");
        assert_eq!(pluralize(0, "bedroom"), "0 bedrooms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_latency_disabled_returns_immediately() {
        let start = tokio::time::Instant::now();
        simulate_latency(false, COPY_LATENCY_MS).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_latency_sleeps_within_range() {
        let start = tokio::time::Instant::now();
        simulate_latency(true, COPY_LATENCY_MS).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed <= Duration::from_millis(1200));
    }
}
