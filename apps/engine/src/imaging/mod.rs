//! Synthetic Image Synthesizer.
//!
//! Builds SVG artwork from a prompt or a city name and returns it as a
//! `data:image/svg+xml;base64,` URL. All geometry comes from a [`SeededRng`] seeded by
//! the input text, so the same request always yields the same image.
//!
//! [`SeededRng`]: crate::prng::SeededRng

mod city;
mod palette;
mod prompt;
mod svg;
mod types;

pub use city::generate_city_image;
pub use prompt::generate_image;
pub use types::{CityStyle, ImageDimensions};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;

pub const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Why a synthesis run could not start.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("invalid size '{0}', expected WxH with each side between 256 and 2048")]
    InvalidSize(String),

    #[error("city name must not be empty")]
    EmptyCityName,
}

/// Every public synthesis entry point wraps its failure in this.
#[derive(Debug, Error)]
#[error("Failed to generate image: {0}")]
pub struct ImageError(#[from] pub SynthesisError);

pub(crate) fn to_data_url(svg: &str) -> String {
    format!("{SVG_DATA_URL_PREFIX}{}", BASE64.encode(svg))
}

/// Strips the data-URL prefix, leaving the raw base64 payload (`b64_json` responses).
pub fn data_url_payload(url: &str) -> &str {
    url.strip_prefix(SVG_DATA_URL_PREFIX).unwrap_or(url)
}

#[cfg(test)]
pub(crate) fn decode_data_url(url: &str) -> String {
    assert!(url.starts_with(SVG_DATA_URL_PREFIX), "not an SVG data URL");
    let bytes = BASE64.decode(data_url_payload(url)).expect("valid base64");
    String::from_utf8(bytes).expect("utf-8 svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_is_wrapped() {
        let err = ImageError::from(SynthesisError::EmptyCityName);
        assert_eq!(
            err.to_string(),
            "Failed to generate image: city name must not be empty"
        );
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = to_data_url("<svg/>");
        assert!(url.starts_with(SVG_DATA_URL_PREFIX));
        assert_eq!(decode_data_url(&url), "<svg/>");
        assert_eq!(data_url_payload("abc"), "abc");
    }
}
