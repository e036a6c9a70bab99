//! City skylines.
//!
//! Layers, back to front: sky gradient, sun/moon/clouds, a faded distant skyline, the
//! city's landmark, a foreground skyline with windows, the ground and the caption.

use tracing::debug;

use super::palette::hsl;
use super::svg::SvgDocument;
use super::{to_data_url, CityStyle, ImageError, SynthesisError};
use crate::prng::SeededRng;

const CANVAS_WIDTH: u32 = 1024;
const CANVAS_HEIGHT: u32 = 768;
const GROUND_Y: f64 = 640.0;

const WINDOW_W: f64 = 6.0;
const WINDOW_H: f64 = 10.0;
const WINDOW_PITCH_X: f64 = 14.0;
const WINDOW_PITCH_Y: f64 = 20.0;
const UNLIT_WINDOW: &str = "#1C2833";
const CLOUD: &str = "rgba(255,255,255,0.75)";

/// Parameters for one row of procedurally placed buildings.
pub(super) struct BuildingLayer {
    pub ground_y: f64,
    pub width: (f64, f64),
    pub height: (f64, f64),
    pub gap: (f64, f64),
    pub opacity: f64,
    pub windows: bool,
}

/// Fills the canvas width with buildings standing on `layer.ground_y`.
///
/// `facade` picks each building's fill; `windows` is `(lit colour, lit fraction)`.
pub(super) fn draw_buildings(
    doc: &mut SvgDocument,
    rng: &mut SeededRng,
    layer: &BuildingLayer,
    mut facade: impl FnMut(&mut SeededRng) -> String,
    windows: (&str, f64),
) {
    let (lit_colour, lit_ratio) = windows;
    let mut x = -rng.range(0.0, layer.width.0 / 2.0);

    while x < doc.width() {
        let bw = rng.range(layer.width.0, layer.width.1);
        let bh = rng.range(layer.height.0, layer.height.1);
        let top = layer.ground_y - bh;
        let fill = facade(rng);

        if layer.opacity < 1.0 {
            doc.rect_with_opacity(x, top, bw, bh, &fill, layer.opacity);
        } else {
            doc.rect(x, top, bw, bh, &fill);
        }

        if layer.windows {
            let cols = ((bw - 8.0) / WINDOW_PITCH_X).floor().max(0.0) as u32;
            let rows = ((bh - 12.0) / WINDOW_PITCH_Y).floor().max(0.0) as u32;
            for r in 0..rows {
                for c in 0..cols {
                    let wx = x + 6.0 + c as f64 * WINDOW_PITCH_X;
                    let wy = top + 10.0 + r as f64 * WINDOW_PITCH_Y;
                    if rng.chance(lit_ratio) {
                        doc.rect(wx, wy, WINDOW_W, WINDOW_H, lit_colour);
                    } else {
                        doc.rect_with_opacity(wx, wy, WINDOW_W, WINDOW_H, UNLIT_WINDOW, 0.45);
                    }
                }
            }
        }

        x += bw + rng.range(layer.gap.0, layer.gap.1);
    }
}

/// Renders a skyline for `city` in the given style.
///
/// Unknown styles fall back to photorealistic. London, Manchester, Birmingham, Leeds and
/// Liverpool get their own landmark; every other city gets a generic tower.
pub fn generate_city_image(city: &str, style: &str) -> Result<String, ImageError> {
    let name = city.trim();
    if name.is_empty() {
        return Err(SynthesisError::EmptyCityName.into());
    }
    let style = CityStyle::parse(style).unwrap_or_else(|| {
        debug!(style, "unknown city style, using default");
        CityStyle::default()
    });

    let key = name.to_lowercase();
    let mut rng = SeededRng::from_text(&format!("{key}|{style}"));
    let mut doc = SvgDocument::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let (w, h) = (doc.width(), doc.height());

    let sky = style.sky();
    doc.vertical_gradient("sky", &[(0, sky[0]), (60, sky[1]), (100, sky[2])]);
    doc.rect(0.0, 0.0, w, h, "url(#sky)");
    draw_sky_features(&mut doc, &mut rng, style);

    let (hue, sat, light) = style.facade();
    let distant = BuildingLayer {
        ground_y: GROUND_Y,
        width: (40.0, 90.0),
        height: (120.0, 280.0),
        gap: (0.0, 6.0),
        opacity: 0.45,
        windows: false,
    };
    draw_buildings(
        &mut doc,
        &mut rng,
        &distant,
        |rng: &mut SeededRng| {
            hsl(hue, rng.range(sat.0, sat.1), rng.range(light.0, light.1) + 10.0)
        },
        style.windows(),
    );

    let landmark_x = rng.range(0.35, 0.65) * w;
    draw_landmark(&mut doc, &mut rng, &key, landmark_x, style);

    let foreground = BuildingLayer {
        ground_y: GROUND_Y,
        width: (50.0, 110.0),
        height: (80.0, 220.0),
        gap: (4.0, 18.0),
        opacity: 1.0,
        windows: true,
    };
    draw_buildings(
        &mut doc,
        &mut rng,
        &foreground,
        |rng: &mut SeededRng| hsl(hue, rng.range(sat.0, sat.1), rng.range(light.0, light.1)),
        style.windows(),
    );

    let ground = match style {
        CityStyle::Night => "#0A0F1E",
        CityStyle::Vintage => "#5D4A36",
        _ => "#2C3E50",
    };
    doc.rect(0.0, GROUND_Y, w, h - GROUND_Y, ground);

    match style {
        CityStyle::Artistic => draw_brush_strokes(&mut doc, &mut rng, sky[0]),
        CityStyle::Vintage => doc.rect_with_opacity(0.0, 0.0, w, h, "#704214", 0.18),
        _ => {}
    }

    let caption = name.to_uppercase();
    doc.text(w / 2.0, h - 45.0, 56.0, style.caption_font(), "#FFFFFF", &caption);

    debug!(city = name, %style, "synthesised city skyline");
    Ok(to_data_url(&doc.finish()))
}

fn draw_sky_features(doc: &mut SvgDocument, rng: &mut SeededRng, style: CityStyle) {
    let w = doc.width();
    match style {
        CityStyle::Night => {
            for _ in 0..rng.range_int(40, 80) {
                doc.circle(
                    rng.range(0.0, w),
                    rng.range(0.0, GROUND_Y * 0.6),
                    rng.range(0.6, 1.8),
                    "#FFFFFF",
                    rng.range(0.5, 1.0),
                );
            }
            let (mx, my) = (rng.range(0.1, 0.9) * w, rng.range(80.0, 160.0));
            doc.circle(mx, my, 30.0, "#F7F9F9", 0.95);
            doc.circle(mx + 8.0, my - 6.0, 6.0, "#D5DBDB", 0.8);
        }
        CityStyle::Photorealistic | CityStyle::Modern => {
            for _ in 0..rng.range_int(2, 4) {
                let (cx, cy) = (rng.range(0.0, w), rng.range(60.0, 220.0));
                let rx = rng.range(50.0, 110.0);
                doc.ellipse(cx, cy, rx, rx * 0.35, CLOUD);
                doc.ellipse(cx + rx * 0.4, cy - rx * 0.15, rx * 0.6, rx * 0.3, CLOUD);
            }
        }
        CityStyle::Artistic | CityStyle::Vintage => {
            let (sx, sy) = (rng.range(0.15, 0.85) * w, rng.range(110.0, 220.0));
            doc.radial_gradient("sun-glow", "#FFF5D6", "#FFB347");
            doc.circle(sx, sy, 120.0, "url(#sun-glow)", 0.8);
            doc.circle(sx, sy, 45.0, "#FFE8A3", 1.0);
        }
    }
}

fn draw_brush_strokes(doc: &mut SvgDocument, rng: &mut SeededRng, colour: &str) {
    let w = doc.width();
    for _ in 0..rng.range_int(4, 7) {
        let (x, y) = (rng.range(0.0, w * 0.7), rng.range(40.0, GROUND_Y * 0.5));
        let len = rng.range(120.0, 320.0);
        let bend = rng.range(-40.0, 40.0);
        let d = format!(
            "M{x:.1},{y:.1} Q{:.1},{:.1} {:.1},{y:.1}",
            x + len / 2.0,
            y + bend,
            x + len
        );
        doc.path(&d, "none", colour, rng.range(6.0, 14.0), 0.3);
    }
}

fn draw_landmark(
    doc: &mut SvgDocument,
    rng: &mut SeededRng,
    city: &str,
    cx: f64,
    style: CityStyle,
) {
    let night = style == CityStyle::Night;
    match city {
        "london" => big_ben(doc, cx, night),
        "manchester" => beetham_tower(doc, rng, cx, night),
        "birmingham" => selfridges(doc, rng, cx, night),
        "leeds" => town_hall(doc, cx, night),
        "liverpool" => liver_building(doc, cx, night),
        _ => generic_tower(doc, rng, cx, night),
    }
}

fn stone(night: bool) -> &'static str {
    if night {
        "#4A4231"
    } else {
        "#A89060"
    }
}

fn big_ben(doc: &mut SvgDocument, cx: f64, night: bool) {
    let top = GROUND_Y - 360.0;
    doc.open_group("landmark-big-ben");
    doc.rect(cx - 25.0, top, 50.0, 360.0, stone(night));
    doc.rect(cx - 30.0, top + 25.0, 60.0, 70.0, stone(night));
    doc.circle(cx, top + 60.0, 20.0, "#F4F1DE", 1.0);
    doc.line(cx, top + 60.0, cx, top + 46.0, "#1B2631", 2.5);
    doc.line(cx, top + 60.0, cx + 10.0, top + 60.0, "#1B2631", 2.0);
    doc.polygon(&[(cx - 25.0, top), (cx, top - 80.0), (cx + 25.0, top)], "#5B4B2E", 1.0);
    doc.close_group();
}

fn beetham_tower(doc: &mut SvgDocument, rng: &mut SeededRng, cx: f64, night: bool) {
    let top = GROUND_Y - 430.0;
    let glass = if night { "#34495E" } else { "#AED6F1" };
    doc.open_group("landmark-beetham-tower");
    doc.rect(cx - 28.0, top + 200.0, 56.0, 230.0, "#7F8C8D");
    // upper floors overhang the lower ones
    doc.rect(cx - 35.0, top, 70.0, 200.0, "#85929E");
    let mut y = top + 8.0;
    while y < GROUND_Y - 6.0 {
        let half = if y < top + 200.0 { 31.0 } else { 24.0 };
        let shade = if rng.chance(0.2) { "#D6EAF8" } else { glass };
        doc.rect(cx - half, y, half * 2.0, 5.0, shade);
        y += 12.0;
    }
    doc.line(cx + 30.0, top, cx + 30.0, top - 30.0, "#5D6D7E", 3.0);
    doc.close_group();
}

fn selfridges(doc: &mut SvgDocument, rng: &mut SeededRng, cx: f64, night: bool) {
    let cy = GROUND_Y - 90.0;
    doc.open_group("landmark-selfridges");
    doc.ellipse(cx, cy, 120.0, 90.0, if night { "#1B2631" } else { "#2E4053" });
    for row in 0..8 {
        let y = cy - 75.0 + row as f64 * 20.0;
        let half_width = 110.0 * (1.0 - ((y - cy) / 90.0).powi(2)).max(0.0).sqrt();
        let mut x = cx - half_width + 8.0;
        while x < cx + half_width - 8.0 {
            let dot = if night && rng.chance(0.3) { "#F5B041" } else { "#D0D3D4" };
            doc.circle(x, y, 5.0, dot, 1.0);
            x += 18.0;
        }
    }
    doc.close_group();
}

fn town_hall(doc: &mut SvgDocument, cx: f64, night: bool) {
    let base_top = GROUND_Y - 110.0;
    doc.open_group("landmark-town-hall");
    doc.rect(cx - 100.0, base_top, 200.0, 110.0, stone(night));
    for i in 0..8 {
        doc.rect(cx - 88.0 + i as f64 * 24.0, base_top + 20.0, 8.0, 85.0, "#E5D8B8");
    }
    doc.rect(cx - 105.0, base_top - 10.0, 210.0, 12.0, "#8C7851");
    let tower_top = base_top - 150.0;
    doc.rect(cx - 25.0, tower_top, 50.0, 150.0, stone(night));
    doc.circle(cx, tower_top + 35.0, 15.0, "#F4F1DE", 1.0);
    doc.ellipse(cx, tower_top, 30.0, 22.0, "#6E5C3A");
    doc.polygon(
        &[
            (cx - 6.0, tower_top - 15.0),
            (cx, tower_top - 60.0),
            (cx + 6.0, tower_top - 15.0),
        ],
        "#6E5C3A",
        1.0,
    );
    doc.close_group();
}

fn liver_building(doc: &mut SvgDocument, cx: f64, night: bool) {
    let top = GROUND_Y - 200.0;
    doc.open_group("landmark-liver-building");
    doc.rect(cx - 90.0, top, 180.0, 200.0, stone(night));
    for tower_x in [cx - 80.0, cx + 44.0] {
        doc.rect(tower_x, top - 90.0, 36.0, 90.0, stone(night));
        doc.circle(tower_x + 18.0, top - 60.0, 11.0, "#F4F1DE", 1.0);
        doc.ellipse(tower_x + 18.0, top - 92.0, 20.0, 16.0, "#4D7C6E");
        // liver bird
        let bx = tower_x + 18.0;
        let by = top - 122.0;
        doc.polygon(
            &[
                (bx - 10.0, by + 8.0),
                (bx, by - 8.0),
                (bx + 10.0, by + 8.0),
                (bx, by + 2.0),
            ],
            "#2C3E50",
            1.0,
        );
    }
    doc.close_group();
}

fn generic_tower(doc: &mut SvgDocument, rng: &mut SeededRng, cx: f64, night: bool) {
    let height = rng.range(320.0, 420.0);
    let top = GROUND_Y - height;
    doc.open_group("landmark-tower");
    doc.polygon(
        &[(cx - 32.0, GROUND_Y), (cx - 12.0, top), (cx + 12.0, top), (cx + 32.0, GROUND_Y)],
        if night { "#283747" } else { "#5D6D7E" },
        1.0,
    );
    doc.line(cx, top, cx, top - 60.0, "#34495E", 3.0);
    doc.circle(cx, top - 60.0, 4.0, "#E74C3C", 1.0);
    doc.close_group();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{decode_data_url, SVG_DATA_URL_PREFIX};

    #[test]
    fn test_london_photorealistic() {
        let url = generate_city_image("London", "photorealistic").unwrap();
        assert!(url.starts_with(SVG_DATA_URL_PREFIX));
        let svg = decode_data_url(&url);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("LONDON"));
        assert!(svg.contains("landmark-big-ben"));
    }

    #[test]
    fn test_deterministic_per_city_and_style() {
        let a = generate_city_image("Leeds", "night").unwrap();
        assert_eq!(a, generate_city_image("Leeds", "night").unwrap());
        assert_ne!(a, generate_city_image("Leeds", "vintage").unwrap());
    }

    #[test]
    fn test_named_landmarks() {
        for (city, id) in [
            ("Manchester", "landmark-beetham-tower"),
            ("birmingham", "landmark-selfridges"),
            ("Leeds", "landmark-town-hall"),
            ("  Liverpool ", "landmark-liver-building"),
            ("Sheffield", "landmark-tower"),
        ] {
            let svg = decode_data_url(&generate_city_image(city, "modern").unwrap());
            assert!(svg.contains(id), "{city} should draw {id}");
        }
    }

    #[test]
    fn test_every_style_renders() {
        for style in ["photorealistic", "artistic", "vintage", "modern", "night", "unknown"] {
            let svg = decode_data_url(&generate_city_image("York", style).unwrap());
            assert!(svg.contains("YORK"), "{style}");
        }
    }

    #[test]
    fn test_caption_is_escaped() {
        let svg = decode_data_url(&generate_city_image("Stoke <on> Trent & Co", "modern").unwrap());
        assert!(svg.contains("STOKE &lt;ON&gt; TRENT &amp; CO"));
    }

    #[test]
    fn test_empty_city_is_wrapped_error() {
        let err = generate_city_image("   ", "modern").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate image: city name must not be empty"
        );
    }

    #[test]
    fn test_unknown_style_matches_default() {
        assert_eq!(
            generate_city_image("Bath", "cubist").unwrap(),
            generate_city_image("Bath", "photorealistic").unwrap()
        );
    }
}
