//! Scene classification, emotional tone and colour palettes.

use serde::{Deserialize, Serialize};

use crate::heuristics::keyword::{KeywordGroup, KeywordScorer, Tokens};
use crate::prng::SeededRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    Landscape,
    Portrait,
    Architecture,
    Abstract,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalTone {
    Positive,
    Negative,
    Neutral,
}

// Declaration order breaks ties.
const SCENE_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        name: "landscape",
        keywords: &[
            "landscape", "mountain", "mountains", "forest", "river", "lake", "sea", "ocean",
            "beach", "field", "fields", "garden", "park", "sunset", "sunrise", "countryside",
            "valley", "hills", "nature", "meadow", "trees",
        ],
        weight: 1.0,
    },
    KeywordGroup {
        name: "portrait",
        keywords: &[
            "portrait", "person", "people", "face", "man", "woman", "child", "student",
            "students", "family", "smiling", "headshot", "tenant", "agent", "selfie",
        ],
        weight: 1.0,
    },
    KeywordGroup {
        name: "architecture",
        keywords: &[
            "architecture", "building", "buildings", "house", "flat", "apartment", "city",
            "skyline", "tower", "bridge", "street", "interior", "room", "kitchen", "bedroom",
            "property", "office", "hall",
        ],
        weight: 1.0,
    },
    KeywordGroup {
        name: "abstract",
        keywords: &[
            "abstract", "pattern", "geometric", "shapes", "swirl", "texture", "gradient",
            "colorful", "colourful", "fractal", "minimalist",
        ],
        weight: 1.0,
    },
];

static SCENE_SCORER: KeywordScorer = KeywordScorer::new(SCENE_GROUPS);

const POSITIVE_WORDS: &[&str] = &[
    "beautiful", "bright", "happy", "sunny", "cheerful", "vibrant", "peaceful", "calm", "cosy",
    "cozy", "warm", "joyful", "lovely", "spacious", "stunning", "welcoming", "light", "fresh",
    "elegant", "luxurious",
];

const NEGATIVE_WORDS: &[&str] = &[
    "dark", "gloomy", "sad", "stormy", "rainy", "grim", "cold", "broken", "abandoned", "dull",
    "scary", "damp", "derelict", "bleak", "dirty", "angry",
];

pub fn classify_scene(prompt: &str) -> SceneType {
    let score = SCENE_SCORER.score_text(prompt);
    let mut best = SceneType::Default;
    let mut best_count = 0;
    for (group, scene) in [
        ("landscape", SceneType::Landscape),
        ("portrait", SceneType::Portrait),
        ("architecture", SceneType::Architecture),
        ("abstract", SceneType::Abstract),
    ] {
        let count = score.count(group);
        if count > best_count {
            best = scene;
            best_count = count;
        }
    }
    best
}

pub fn get_emotional_tone(text: &str) -> EmotionalTone {
    let tokens = Tokens::new(text);
    let positive = tokens.count_any(POSITIVE_WORDS);
    let negative = tokens.count_any(NEGATIVE_WORDS);
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => EmotionalTone::Positive,
        std::cmp::Ordering::Less => EmotionalTone::Negative,
        std::cmp::Ordering::Equal => EmotionalTone::Neutral,
    }
}

pub(crate) fn hsl(h: f64, s: f64, l: f64) -> String {
    format!("hsl({:.0}, {:.0}%, {:.0}%)", h.rem_euclid(360.0), s, l)
}

/// Four HSL colours for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
}

impl Palette {
    pub fn hue_range(scene: SceneType) -> (f64, f64) {
        match scene {
            SceneType::Landscape => (90.0, 210.0),
            SceneType::Portrait => (15.0, 45.0),
            SceneType::Architecture => (190.0, 240.0),
            SceneType::Abstract => (0.0, 360.0),
            SceneType::Default => (200.0, 280.0),
        }
    }

    /// Saturation and lightness ranges, in percent.
    pub fn tone_ranges(tone: EmotionalTone) -> ((f64, f64), (f64, f64)) {
        match tone {
            EmotionalTone::Positive => ((60.0, 90.0), (55.0, 70.0)),
            EmotionalTone::Negative => ((10.0, 35.0), (20.0, 40.0)),
            EmotionalTone::Neutral => ((35.0, 60.0), (40.0, 55.0)),
        }
    }

    pub fn for_scene(scene: SceneType, tone: EmotionalTone, rng: &mut SeededRng) -> Self {
        let (h_min, h_max) = Self::hue_range(scene);
        let ((s_min, s_max), (l_min, l_max)) = Self::tone_ranges(tone);

        let h1 = rng.range(h_min, h_max);
        let h2 = rng.range(h_min, h_max);
        let s = rng.range(s_min, s_max);
        let l = rng.range(l_min, l_max);

        Self {
            primary: hsl(h1, s, l),
            secondary: hsl(h2, rng.range(s_min, s_max), rng.range(l_min, l_max)),
            accent: hsl(h1 + 180.0, s, (l + 10.0).min(90.0)),
            background: hsl(h1, s * 0.5, (l + 25.0).min(95.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_scene() {
        assert_eq!(classify_scene("sunset over the mountains"), SceneType::Landscape);
        assert_eq!(classify_scene("portrait of a smiling student"), SceneType::Portrait);
        assert_eq!(classify_scene("modern apartment building"), SceneType::Architecture);
        assert_eq!(classify_scene("geometric abstract pattern"), SceneType::Abstract);
        assert_eq!(classify_scene("something else entirely"), SceneType::Default);
        assert_eq!(classify_scene(""), SceneType::Default);
    }

    #[test]
    fn test_scene_tie_goes_to_first_declared() {
        assert_eq!(classify_scene("garden house"), SceneType::Landscape);
    }

    #[test]
    fn test_emotional_tone() {
        assert_eq!(get_emotional_tone("a bright sunny cheerful room"), EmotionalTone::Positive);
        assert_eq!(get_emotional_tone("dark and gloomy basement"), EmotionalTone::Negative);
        assert_eq!(get_emotional_tone("a kitchen"), EmotionalTone::Neutral);
        assert_eq!(get_emotional_tone("bright but damp"), EmotionalTone::Neutral);
    }

    #[test]
    fn test_palette_is_deterministic_and_in_range() {
        let a = Palette::for_scene(SceneType::Portrait, EmotionalTone::Positive, &mut SeededRng::new(7));
        let b = Palette::for_scene(SceneType::Portrait, EmotionalTone::Positive, &mut SeededRng::new(7));
        assert_eq!(a, b);

        let hue: f64 = a
            .primary
            .trim_start_matches("hsl(")
            .split(',')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!((15.0..=45.0).contains(&hue), "hue {hue}");
    }

    #[test]
    fn test_hsl_wraps_hue() {
        assert_eq!(hsl(400.0, 50.0, 50.0), "hsl(40, 50%, 50%)");
    }
}
