/// LCG multiplier (Numerical Recipes).
const LCG_A: u64 = 1_664_525;
/// LCG increment.
const LCG_C: u64 = 1_013_904_223;
/// LCG modulus, 2^32.
const LCG_M: u64 = 1 << 32;

/// Polynomial rolling hash (`h * 31 + c`) over UTF-16 code units, folded to 32 bits.
///
/// Matches the classic `(h << 5) - h + c` string hash used by the web front end, so ids
/// derived from it stay stable across both sides.
pub fn hash_string(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32)
    })
}

/// Maps an integer seed to a float in `[0, 1)` with one LCG step.
pub fn pseudo_random(seed: i64) -> f64 {
    let state = seed as u32 as u64;
    lcg_step(state) as f64 / LCG_M as f64
}

fn lcg_step(state: u64) -> u64 {
    (LCG_A * state + LCG_C) % LCG_M
}

/// A stream of LCG values seeded from a hash.
///
/// Used wherever several correlated values must come from one seed (SVG geometry,
/// graph edge weights).
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: i32) -> Self {
        Self {
            state: seed as u32 as u64,
        }
    }

    /// Seeds from the hash of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(hash_string(text))
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = lcg_step(self.state);
        self.state as f64 / LCG_M as f64
    }

    /// Next value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Next integer in `[min, max]`.
    pub fn range_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + ((self.next_f64() * span) as u32).min(max - min)
    }

    /// True with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Picks one element; `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.next_f64() * items.len() as f64) as usize;
        items.get(idx.min(items.len() - 1))
    }
}
