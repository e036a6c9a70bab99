//! Fingerprint embeddings.
//!
//! A 384-dimension vector built from hashed text features. Identical texts give identical
//! vectors and texts sharing words or trigrams drift closer together, but there is no
//! trained semantics behind it.

use crate::prng::hash::{hash_string, pseudo_random};

pub const EMBEDDING_DIMENSIONS: usize = 384;

const WHOLE_TEXT_WEIGHT: f64 = 0.5;
const TRIGRAM_WEIGHT: f64 = 0.3;
const WORD_DIM_STRIDE: i64 = 31;
const TRIGRAM_DIM_STRIDE: i64 = 17;

/// Builds the normalised embedding for `text`.
pub fn generate_embeddings(text: &str) -> Vec<f32> {
    let normalized = text.trim().to_lowercase();
    let mut acc = vec![0.0_f64; EMBEDDING_DIMENSIONS];

    let text_hash = hash_string(&normalized) as i64;
    for (i, slot) in acc.iter_mut().enumerate() {
        *slot += centred(pseudo_random(text_hash + i as i64)) * WHOLE_TEXT_WEIGHT;
    }

    let words: Vec<&str> = normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    for (position, word) in words.iter().enumerate() {
        let word_hash = hash_string(word) as i64;
        let weight = 1.0 / (1.0 + position as f64 * 0.1);
        for (i, slot) in acc.iter_mut().enumerate() {
            *slot += centred(pseudo_random(word_hash + i as i64 * WORD_DIM_STRIDE)) * weight;
        }
    }

    let chars: Vec<char> = normalized.chars().collect();
    for window in chars.windows(3) {
        let trigram: String = window.iter().collect();
        let trigram_hash = hash_string(&trigram) as i64;
        for (i, slot) in acc.iter_mut().enumerate() {
            *slot +=
                centred(pseudo_random(trigram_hash + i as i64 * TRIGRAM_DIM_STRIDE)) * TRIGRAM_WEIGHT;
        }
    }

    let squashed: Vec<f64> = acc.into_iter().map(f64::tanh).collect();
    let norm = squashed.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return vec![0.0; EMBEDDING_DIMENSIONS];
    }

    squashed.into_iter().map(|v| (v / norm) as f32).collect()
}

/// Cosine similarity of two equal-length vectors. Returns 0.0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// `[0,1)` → `[-1,1)`
fn centred(v: f64) -> f64 {
    v * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l2(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_embedding_has_384_dimensions() {
        assert_eq!(generate_embeddings("two bedroom flat").len(), 384);
    }

    #[test]
    fn test_embedding_is_unit_length() {
        for text in ["a", "student accommodation near campus", "£1,200 pcm, bills included!"] {
            let norm = l2(&generate_embeddings(text));
            assert!((norm - 1.0).abs() < 1e-4, "norm for {text:?} was {norm}");
        }
    }

    #[test]
    fn test_embedding_is_deterministic() {
        assert_eq!(
            generate_embeddings("Spacious studio in Leeds"),
            generate_embeddings("Spacious studio in Leeds")
        );
    }

    #[test]
    fn test_embedding_ignores_case_and_outer_whitespace() {
        assert_eq!(
            generate_embeddings("  Garden Flat "),
            generate_embeddings("garden flat")
        );
    }

    #[test]
    fn test_self_similarity_is_one() {
        let v = generate_embeddings("lease renewal reminder");
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
