use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::domain::{Boundary, VenueType};
use crate::geometry::{Bounds, Scaler};
use crate::layout::Layout;

/// Canvas settings for the SVG preview
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Length of the longer canvas side in pixels
    pub size_px: f64,
    pub margin_px: f64,
    /// Unit symbol used in labels
    pub unit_symbol: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            size_px: 1400.0,
            margin_px: 40.0,
            unit_symbol: "m".to_string(),
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draw the site and its venues, north up.
///
/// Venues are filled with their catalog color and labeled with name and
/// size at their center; labels follow the venue rotation.
pub fn render_svg(
    boundary: &Boundary,
    layout: &Layout,
    catalog: &[VenueType],
    options: &SvgOptions,
) -> String {
    let mut bounds = boundary.bounds().unwrap_or(Bounds {
        min_x: 0.0,
        max_x: 1.0,
        min_y: 0.0,
        max_y: 1.0,
    });
    for placed in &layout.placements {
        bounds.expand(&placed.corners());
    }

    let scaler = Scaler::from_bounds_with_margin(&bounds, options.size_px, options.margin_px);
    let (width, height) = scaler.canvas_size();
    let font_px = (scaler.scale_factor() * 3.0).clamp(8.0, 18.0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.2} {height:.2}">"#
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        out,
        r#"<polygon class="boundary" points="{}" fill="none" stroke="red" stroke-width="3"/>"#,
        points_attr(&scaler.scale_points(&boundary.points))
    );

    for placed in &layout.placements {
        let color = catalog
            .get(placed.venue_type)
            .map(|venue| venue.color.as_str())
            .unwrap_or("#7f7f7f");
        let corners = scaler.scale_points(&placed.corners());
        let _ = writeln!(
            out,
            r#"<polygon class="venue" points="{}" fill="{}" fill-opacity="0.75" stroke="white" stroke-width="2"/>"#,
            points_attr(&corners),
            escape(color)
        );

        let (cx, cy) = placed.center();
        let (px, py) = scaler.scale(cx, cy);
        // SVG rotates clockwise with y down
        let _ = writeln!(
            out,
            r#"<text x="{px:.2}" y="{py:.2}" transform="rotate({:.2} {px:.2} {py:.2})" text-anchor="middle" font-family="sans-serif" font-size="{font_px:.1}" font-weight="bold" fill="white"><tspan x="{px:.2}" dy="-0.2em">{}</tspan><tspan x="{px:.2}" dy="1.2em">{:.0}×{:.0}{}</tspan></text>"#,
            0.0 - placed.angle,
            escape(&placed.name),
            placed.width,
            placed.height,
            escape(&options.unit_symbol)
        );
    }

    let _ = writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="14" fill="black">N ↑</text>"#,
        options.margin_px / 2.0,
        options.margin_px / 2.0 + 7.0
    );
    out.push_str("</svg>\n");

    out
}

pub fn write_svg(
    path: &Path,
    boundary: &Boundary,
    layout: &Layout,
    catalog: &[VenueType],
    options: &SvgOptions,
) -> Result<()> {
    std::fs::write(path, render_svg(boundary, layout, catalog, options))
        .with_context(|| format!("Failed to write SVG file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlacedVenue;
    use tempfile::tempdir;

    fn layout_with(placements: Vec<PlacedVenue>) -> Layout {
        Layout {
            placements,
            carried_over: 0,
            summaries: Vec::new(),
            seed: 0,
        }
    }

    fn venue(name: &str, angle: f64) -> PlacedVenue {
        PlacedVenue {
            venue_type: 0,
            name: name.to_string(),
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 10.0,
            angle,
        }
    }

    #[test]
    fn test_render_contains_every_venue() {
        let catalog = vec![VenueType::new("A", 20.0, 10.0, 2).with_color("#1f77b4")];
        let layout = layout_with(vec![venue("A", 0.0), venue("A", 30.0)]);
        let svg = render_svg(
            &Boundary::rectangle(100.0, 100.0),
            &layout,
            &catalog,
            &SvgOptions::default(),
        );

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="venue""#).count(), 2);
        assert_eq!(svg.matches(r#"class="boundary""#).count(), 1);
        assert!(svg.contains(r##"fill="#1f77b4""##));
        assert!(svg.contains("20×10m"));
        assert!(svg.contains("rotate(-30.00"));
    }

    #[test]
    fn test_north_is_up() {
        let layout = layout_with(Vec::new());
        let options = SvgOptions {
            size_px: 120.0,
            margin_px: 10.0,
            ..Default::default()
        };
        let svg = render_svg(&Boundary::rectangle(100.0, 50.0), &layout, &[], &options);

        // Origin maps to the bottom-left of the drawing: (10, 60)
        assert!(svg.contains(r#"points="10.00,60.00 110.00,60.00 110.00,10.00 10.00,10.00""#));
    }

    #[test]
    fn test_labels_are_escaped() {
        let layout = layout_with(vec![venue("<court & co>", 0.0)]);
        let svg = render_svg(
            &Boundary::rectangle(100.0, 100.0),
            &layout,
            &[],
            &SvgOptions::default(),
        );
        assert!(svg.contains("&lt;court &amp; co&gt;"));
        assert!(svg.contains("#7f7f7f"));
    }

    #[test]
    fn test_write_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.svg");
        let layout = layout_with(vec![venue("A", 0.0)]);

        write_svg(
            &path,
            &Boundary::rectangle(100.0, 100.0),
            &layout,
            &[],
            &SvgOptions::default(),
        )
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"class="venue""#));
    }
}
