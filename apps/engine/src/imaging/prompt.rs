//! Prompt-driven artwork.

use tracing::debug;

use super::city::{draw_buildings, BuildingLayer};
use super::palette::{classify_scene, get_emotional_tone, Palette, SceneType};
use super::svg::SvgDocument;
use super::{to_data_url, ImageDimensions, ImageError};
use crate::prng::SeededRng;

/// Renders `prompt` as an SVG data URL of the requested `"WxH"` size (default 1024×1024).
pub fn generate_image(prompt: &str, size: Option<&str>) -> Result<String, ImageError> {
    let dims = ImageDimensions::parse(size)?;
    let scene = classify_scene(prompt);
    let tone = get_emotional_tone(prompt);
    let mut rng = SeededRng::from_text(prompt);
    let palette = Palette::for_scene(scene, tone, &mut rng);

    let mut doc = SvgDocument::new(dims.width, dims.height);
    doc.vertical_gradient(
        "bg",
        &[(0, palette.background.as_str()), (100, palette.secondary.as_str())],
    );
    doc.rect(0.0, 0.0, doc.width(), doc.height(), "url(#bg)");

    match scene {
        SceneType::Landscape => draw_landscape(&mut doc, &mut rng, &palette),
        SceneType::Portrait => draw_portrait(&mut doc, &mut rng, &palette),
        SceneType::Architecture => draw_architecture(&mut doc, &mut rng, &palette),
        SceneType::Abstract => draw_abstract(&mut doc, &mut rng, &palette),
        SceneType::Default => draw_default(&mut doc, &mut rng, &palette),
    }

    debug!(?scene, ?tone, size = %dims, "synthesised prompt image");
    Ok(to_data_url(&doc.finish()))
}

fn draw_landscape(doc: &mut SvgDocument, rng: &mut SeededRng, palette: &Palette) {
    let (w, h) = (doc.width(), doc.height());
    let sun_r = rng.range(0.05, 0.1) * w.min(h);
    doc.circle(
        rng.range(0.15, 0.85) * w,
        rng.range(0.1, 0.35) * h,
        sun_r,
        &palette.accent,
        0.9,
    );

    let fills = [&palette.secondary, &palette.primary, &palette.accent];
    for (layer, fill) in fills.iter().enumerate() {
        let base_y = h * (0.55 + 0.1 * layer as f64);
        let peaks = rng.range_int(3, 6);
        let mut points = vec![(0.0, h)];
        for i in 0..=peaks {
            let x = w * i as f64 / peaks as f64;
            points.push((x, base_y - rng.range(0.05, 0.25) * h));
        }
        points.push((w, h));
        doc.polygon(&points, fill, 0.6 + 0.15 * layer as f64);
    }
}

fn draw_portrait(doc: &mut SvgDocument, rng: &mut SeededRng, palette: &Palette) {
    let (w, h) = (doc.width(), doc.height());
    for _ in 0..rng.range_int(6, 12) {
        doc.circle(
            rng.range(0.0, w),
            rng.range(0.0, h),
            rng.range(0.03, 0.09) * w,
            &palette.secondary,
            rng.range(0.2, 0.4),
        );
    }
    let unit = w.min(h);
    doc.ellipse(w / 2.0, h * 0.95, w * 0.32, h * 0.22, &palette.primary);
    doc.rect(w / 2.0 - unit * 0.06, h * 0.55, unit * 0.12, h * 0.2, &palette.accent);
    doc.circle(w / 2.0, h * 0.45, unit * 0.16, &palette.accent, 1.0);
}

fn draw_architecture(doc: &mut SvgDocument, rng: &mut SeededRng, palette: &Palette) {
    let (w, h) = (doc.width(), doc.height());
    let layer = BuildingLayer {
        ground_y: h * 0.88,
        width: (w * 0.06, w * 0.14),
        height: (h * 0.25, h * 0.7),
        gap: (2.0, 10.0),
        opacity: 1.0,
        windows: true,
    };
    let primary = palette.primary.clone();
    draw_buildings(
        doc,
        rng,
        &layer,
        |_: &mut SeededRng| primary.clone(),
        (palette.accent.as_str(), 0.5),
    );
    doc.rect(0.0, h * 0.88, w, h * 0.12, &palette.secondary);
}

fn draw_abstract(doc: &mut SvgDocument, rng: &mut SeededRng, palette: &Palette) {
    let (w, h) = (doc.width(), doc.height());
    let colours = [&palette.primary, &palette.secondary, &palette.accent];
    for _ in 0..rng.range_int(8, 15) {
        let fill = colours[rng.range_int(0, 2) as usize];
        let opacity = rng.range(0.3, 0.8);
        let (x, y) = (rng.range(0.0, w), rng.range(0.0, h));
        let size = rng.range(0.05, 0.25) * w.min(h);
        match rng.range_int(0, 2) {
            0 => doc.circle(x, y, size, fill, opacity),
            1 => doc.rect_with_opacity(x - size / 2.0, y - size / 2.0, size, size, fill, opacity),
            _ => doc.polygon(
                &[(x, y - size), (x + size, y + size), (x - size, y + size)],
                fill,
                opacity,
            ),
        }
    }
}

fn draw_default(doc: &mut SvgDocument, rng: &mut SeededRng, palette: &Palette) {
    let (w, h) = (doc.width(), doc.height());
    for _ in 0..rng.range_int(5, 9) {
        doc.circle(
            rng.range(0.0, w),
            rng.range(0.0, h * 0.7),
            rng.range(0.05, 0.15) * w,
            &palette.primary,
            rng.range(0.15, 0.35),
        );
    }
    let y = h * rng.range(0.6, 0.75);
    let amp = h * rng.range(0.05, 0.12);
    let d = format!(
        "M0,{y:.1} Q{:.1},{:.1} {:.1},{y:.1} T{w:.1},{y:.1} L{w:.1},{h:.1} L0,{h:.1} Z",
        w / 4.0,
        y - amp,
        w / 2.0
    );
    doc.path(&d, &palette.accent, "none", 0.0, 0.7);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::decode_data_url;

    #[test]
    fn test_generates_svg_data_url() {
        let url = generate_image("a sunny beach at sunset", None).unwrap();
        let svg = decode_data_url(&url);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="1024" height="1024""#));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_same_prompt_same_image() {
        let a = generate_image("abstract geometric shapes", Some("512x512")).unwrap();
        let b = generate_image("abstract geometric shapes", Some("512x512")).unwrap();
        assert_eq!(a, b);
        let c = generate_image("abstract geometric swirl", Some("512x512")).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_respects_size() {
        let svg = decode_data_url(&generate_image("a city skyline", Some("800x600")).unwrap());
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
    }

    #[test]
    fn test_invalid_size_is_wrapped_error() {
        let err = generate_image("anything", Some("10x10")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to generate image: invalid size"));
    }

    #[test]
    fn test_every_scene_renders() {
        for prompt in [
            "mountain lake",
            "portrait of a tenant",
            "apartment building",
            "fractal pattern",
            "",
        ] {
            let svg = decode_data_url(&generate_image(prompt, Some("256x256")).unwrap());
            assert!(svg.ends_with("</svg>"), "{prompt}");
        }
    }
}
