//! Image size and city style presets.

use serde::{Deserialize, Serialize};

use super::SynthesisError;

pub const MIN_SIDE: u32 = 256;
pub const MAX_SIDE: u32 = 2048;
pub const DEFAULT_SIDE: u32 = 1024;

/// Output canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIDE,
            height: DEFAULT_SIDE,
        }
    }
}

impl ImageDimensions {
    /// Parses `"WxH"`. `None` or a blank string gives the 1024×1024 default.
    pub fn parse(size: Option<&str>) -> Result<Self, SynthesisError> {
        let raw = match size.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw,
            None => return Ok(Self::default()),
        };

        let invalid = || SynthesisError::InvalidSize(raw.to_string());
        let lower = raw.to_lowercase();
        let (w, h) = lower.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if !(MIN_SIDE..=MAX_SIDE).contains(&width) || !(MIN_SIDE..=MAX_SIDE).contains(&height) {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rendering style for city skylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CityStyle {
    #[default]
    Photorealistic,
    Artistic,
    Vintage,
    Modern,
    Night,
}

impl CityStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "photorealistic" | "photo" | "realistic" => Some(Self::Photorealistic),
            "artistic" | "art" => Some(Self::Artistic),
            "vintage" | "retro" => Some(Self::Vintage),
            "modern" => Some(Self::Modern),
            "night" | "nighttime" => Some(Self::Night),
            _ => None,
        }
    }

    /// Sky gradient stops, top to bottom.
    pub fn sky(&self) -> [&'static str; 3] {
        match self {
            Self::Photorealistic => ["#6FA8DC", "#A9CCE3", "#EAF2F8"],
            Self::Artistic => ["#FF7E5F", "#FEB47B", "#FFD194"],
            Self::Vintage => ["#C8A97E", "#E3CFAF", "#F5EBDC"],
            Self::Modern => ["#4FACFE", "#00C6FB", "#E0F7FA"],
            Self::Night => ["#0B1026", "#1B2A49", "#2E4A7A"],
        }
    }

    /// Hue, saturation range and lightness range for building facades.
    pub fn facade(&self) -> (f64, (f64, f64), (f64, f64)) {
        match self {
            Self::Photorealistic => (210.0, (5.0, 15.0), (30.0, 55.0)),
            Self::Artistic => (15.0, (40.0, 70.0), (35.0, 60.0)),
            Self::Vintage => (35.0, (20.0, 35.0), (30.0, 50.0)),
            Self::Modern => (200.0, (20.0, 45.0), (45.0, 70.0)),
            Self::Night => (230.0, (15.0, 30.0), (8.0, 18.0)),
        }
    }

    /// Colour of a lit window and the fraction of windows that are lit.
    pub fn windows(&self) -> (&'static str, f64) {
        match self {
            Self::Night => ("#FFD966", 0.6),
            Self::Vintage => ("#F6E7C1", 0.3),
            Self::Artistic => ("#FFF3B0", 0.4),
            Self::Modern => ("#B3E5FC", 0.7),
            Self::Photorealistic => ("#D6EAF8", 0.5),
        }
    }

    pub fn caption_font(&self) -> &'static str {
        match self {
            Self::Vintage => "Georgia, serif",
            Self::Artistic => "'Trebuchet MS', sans-serif",
            _ => "Helvetica, Arial, sans-serif",
        }
    }
}

impl std::fmt::Display for CityStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Photorealistic => "photorealistic",
            Self::Artistic => "artistic",
            Self::Vintage => "vintage",
            Self::Modern => "modern",
            Self::Night => "night",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_default() {
        assert_eq!(ImageDimensions::parse(None).unwrap(), ImageDimensions::default());
        assert_eq!(ImageDimensions::parse(Some("  ")).unwrap().width, 1024);
    }

    #[test]
    fn test_dimensions_parse() {
        let d = ImageDimensions::parse(Some("512x768")).unwrap();
        assert_eq!((d.width, d.height), (512, 768));
        assert_eq!(d.to_string(), "512x768");
        assert!(ImageDimensions::parse(Some("256X2048")).is_ok());
    }

    #[test]
    fn test_dimensions_out_of_range_or_garbage() {
        for bad in ["255x512", "512x4096", "big", "512", "ax512", "0x0"] {
            assert!(
                matches!(ImageDimensions::parse(Some(bad)), Err(SynthesisError::InvalidSize(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(CityStyle::parse("Night"), Some(CityStyle::Night));
        assert_eq!(CityStyle::parse("photo"), Some(CityStyle::Photorealistic));
        assert_eq!(CityStyle::parse("cubist"), None);
        assert_eq!(CityStyle::default().to_string(), "photorealistic");
    }
}
