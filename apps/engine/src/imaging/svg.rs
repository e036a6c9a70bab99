//! Minimal SVG document builder.

use std::fmt::Write as _;

/// Escapes text for use inside SVG element content or attribute values.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Accumulates `<defs>` and body elements, then serialises them in one pass.
///
/// Coordinates are written with one decimal place; colours are passed through verbatim.
pub(crate) struct SvgDocument {
    width: u32,
    height: u32,
    defs: String,
    body: String,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            defs: String::new(),
            body: String::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width as f64
    }

    pub fn height(&self) -> f64 {
        self.height as f64
    }

    /// Top-to-bottom gradient. `stops` are `(offset_percent, colour)`.
    pub fn vertical_gradient(&mut self, id: &str, stops: &[(u32, &str)]) {
        let _ = write!(
            self.defs,
            r#"<linearGradient id="{id}" x1="0" y1="0" x2="0" y2="1">"#
        );
        for (offset, colour) in stops {
            let _ = write!(self.defs, r#"<stop offset="{offset}%" stop-color="{colour}"/>"#);
        }
        self.defs.push_str("</linearGradient>");
    }

    pub fn radial_gradient(&mut self, id: &str, inner: &str, outer: &str) {
        let _ = write!(
            self.defs,
            r#"<radialGradient id="{id}"><stop offset="0%" stop-color="{inner}"/><stop offset="100%" stop-color="{outer}" stop-opacity="0"/></radialGradient>"#
        );
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        let _ = write!(
            self.body,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}"/>"#
        );
    }

    pub fn rect_with_opacity(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}" opacity="{opacity:.2}"/>"#
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{fill}" opacity="{opacity:.2}"/>"#
        );
    }

    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, fill: &str) {
        let _ = write!(
            self.body,
            r#"<ellipse cx="{cx:.1}" cy="{cy:.1}" rx="{rx:.1}" ry="{ry:.1}" fill="{fill}"/>"#
        );
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], fill: &str, opacity: f64) {
        let pts: Vec<String> = points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
        let _ = write!(
            self.body,
            r#"<polygon points="{}" fill="{fill}" opacity="{opacity:.2}"/>"#,
            pts.join(" ")
        );
    }

    pub fn path(&mut self, d: &str, fill: &str, stroke: &str, stroke_width: f64, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<path d="{d}" fill="{fill}" stroke="{stroke}" stroke-width="{stroke_width:.1}" opacity="{opacity:.2}"/>"#
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = write!(
            self.body,
            r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{stroke}" stroke-width="{width:.1}"/>"#
        );
    }

    /// Centred text; `content` is escaped.
    pub fn text(&mut self, x: f64, y: f64, size: f64, family: &str, fill: &str, content: &str) {
        let _ = write!(
            self.body,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="{size:.0}" font-family="{family}" fill="{fill}" text-anchor="middle" font-weight="bold" letter-spacing="4">{}</text>"#,
            escape_xml(content)
        );
    }

    pub fn open_group(&mut self, id: &str) {
        let _ = write!(self.body, r#"<g id="{}">"#, escape_xml(id));
    }

    pub fn close_group(&mut self) {
        self.body.push_str("</g>");
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{defs}</defs>{body}</svg>"#,
            w = self.width,
            h = self.height,
            defs = self.defs,
            body = self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"A&B <"x"> 'y'"#), "A&amp;B &lt;&quot;x&quot;&gt; &apos;y&apos;");
    }

    #[test]
    fn test_document_structure() {
        let mut doc = SvgDocument::new(300, 200);
        doc.vertical_gradient("sky", &[(0, "#000"), (100, "#fff")]);
        doc.rect(0.0, 0.0, 300.0, 200.0, "url(#sky)");
        doc.text(150.0, 190.0, 24.0, "sans-serif", "#fff", "Fish & Chips");
        let svg = doc.finish();
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 300 200""#));
        assert!(svg.contains("<defs><linearGradient id=\"sky\""));
        assert!(svg.contains("Fish &amp; Chips"));
    }
}
