//! Weighted keyword scoring shared by every heuristic scorer.
//!
//! A scorer is data: a set of named keyword groups with weights. Each use site declares
//! its own groups and thresholds and runs them through the same counting code.

use std::collections::BTreeMap;

use serde::Serialize;

/// Lower-cased, tokenised view of a piece of text.
///
/// Words are split on anything that is not alphanumeric or a hyphen; hyphenated words
/// are further split into parts, so `enterprise-scale` counts for `enterprise`.
/// Multi-word keywords (or hyphenated ones) match as whole-word phrases.
#[derive(Debug, Clone)]
pub struct Tokens {
    parts: Vec<String>,
    phrase_text: String,
    raw_lower: String,
}

impl Tokens {
    pub fn new(text: &str) -> Self {
        let raw_lower = text.to_lowercase();
        let parts: Vec<String> = raw_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let phrase_text = format!(" {} ", parts.join(" "));
        Self {
            parts,
            phrase_text,
            raw_lower,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Lower-cased original text, punctuation intact.
    pub fn raw(&self) -> &str {
        &self.raw_lower
    }

    /// Occurrences of one keyword or phrase.
    pub fn count(&self, keyword: &str) -> usize {
        let keyword = keyword.to_lowercase();
        if keyword.contains(|c: char| !c.is_alphanumeric()) {
            let normalized: Vec<&str> = keyword
                .split(|c: char| !c.is_alphanumeric())
                .filter(|p| !p.is_empty())
                .collect();
            if normalized.is_empty() {
                return 0;
            }
            let needle = format!(" {} ", normalized.join(" "));
            count_overlapping(&self.phrase_text, &needle)
        } else {
            self.parts.iter().filter(|p| **p == keyword).count()
        }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.count(keyword) > 0
    }

    /// Total occurrences of all keywords in the list.
    pub fn count_any(&self, keywords: &[&str]) -> usize {
        keywords.iter().map(|k| self.count(k)).sum()
    }

    /// Keywords from the list that occur at least once.
    pub fn matched<'k>(&self, keywords: &[&'k str]) -> Vec<&'k str> {
        keywords.iter().copied().filter(|k| self.contains(k)).collect()
    }
}

/// Counts matches where consecutive needles may share their separating space.
fn count_overlapping(haystack: &str, needle: &str) -> usize {
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        // advance past the match but keep its trailing space available
        start += pos + needle.len() - 1;
    }
    count
}

/// A named list of keywords contributing `weight` per occurrence.
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub weight: f64,
}

/// Per-group counts and the weighted total for one text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordScore {
    pub counts: BTreeMap<&'static str, usize>,
    pub matches: BTreeMap<&'static str, Vec<&'static str>>,
    pub weighted: f64,
}

impl KeywordScore {
    pub fn count(&self, group: &str) -> usize {
        self.counts.get(group).copied().unwrap_or(0)
    }

    pub fn hit(&self, group: &str) -> bool {
        self.count(group) > 0
    }

    pub fn matched(&self, group: &str) -> &[&'static str] {
        self.matches.get(group).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Scores text against a fixed set of keyword groups.
#[derive(Debug, Clone, Copy)]
pub struct KeywordScorer {
    pub groups: &'static [KeywordGroup],
}

impl KeywordScorer {
    pub const fn new(groups: &'static [KeywordGroup]) -> Self {
        Self { groups }
    }

    pub fn score(&self, tokens: &Tokens) -> KeywordScore {
        let mut result = KeywordScore::default();
        for group in self.groups {
            let count = tokens.count_any(group.keywords);
            result.weighted += count as f64 * group.weight;
            result.counts.insert(group.name, count);
            result.matches.insert(group.name, tokens.matched(group.keywords));
        }
        result
    }

    pub fn score_text(&self, text: &str) -> KeywordScore {
        self.score(&Tokens::new(text))
    }
}

/// Maps a score to an ordinal bucket: the first rule whose threshold the score reaches wins.
/// Rules are listed highest threshold first.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable<L: Copy + 'static> {
    pub rules: &'static [(f64, L)],
    pub fallback: L,
}

impl<L: Copy + 'static> ThresholdTable<L> {
    pub fn classify(&self, score: f64) -> L {
        self.rules
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map(|(_, level)| *level)
            .unwrap_or(self.fallback)
    }
}
