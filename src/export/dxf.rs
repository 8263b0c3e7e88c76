use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{Boundary, VenueType};
use crate::geometry::Unit;
use crate::layout::Layout;

pub const BOUNDARY_LAYER: &str = "BOUNDARY";

/// Scaling and labeling options for CAD output
#[derive(Debug, Clone)]
pub struct DxfOptions {
    /// Multiplies every coordinate and the text height
    pub factor: f64,
    /// Label height in site units, before `factor`
    pub text_height: f64,
    /// Unit of the scaled coordinates. R12 has no units header variable,
    /// so it is only recorded in a leading 999 comment.
    pub unit: Unit,
}

impl Default for DxfOptions {
    fn default() -> Self {
        Self {
            factor: 1.0,
            text_height: 4.0,
            unit: Unit::Meters,
        }
    }
}

/// Layer names may not contain `<>/\":;?*|=` and friends
pub fn layer_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "VENUE".to_string()
    } else {
        cleaned
    }
}

fn group(out: &mut String, code: u16, value: impl std::fmt::Display) {
    let _ = write!(out, "{code}\n{value}\n");
}

fn coord(out: &mut String, base: u16, (x, y): (f64, f64), factor: f64) {
    group(out, base, format_args!("{:.6}", x * factor));
    group(out, base + 10, format_args!("{:.6}", y * factor));
    group(out, base + 20, "0.0");
}

fn closed_polyline(out: &mut String, layer: &str, points: &[(f64, f64)], factor: f64) {
    group(out, 0, "POLYLINE");
    group(out, 8, layer);
    group(out, 66, 1);
    coord(out, 10, (0.0, 0.0), 1.0);
    group(out, 70, 1);
    for &p in points {
        group(out, 0, "VERTEX");
        group(out, 8, layer);
        coord(out, 10, p, factor);
    }
    group(out, 0, "SEQEND");
    group(out, 8, layer);
}

fn centered_text(
    out: &mut String,
    layer: &str,
    text: &str,
    at: (f64, f64),
    angle: f64,
    options: &DxfOptions,
) {
    group(out, 0, "TEXT");
    group(out, 8, layer);
    coord(out, 10, at, options.factor);
    group(out, 40, format_args!("{:.6}", options.text_height * options.factor));
    group(out, 1, text);
    group(out, 50, format_args!("{:.6}", angle));
    // Middle-center alignment, anchored at the 11/21 point
    group(out, 72, 1);
    coord(out, 11, at, options.factor);
    group(out, 73, 2);
}

/// Render the boundary and every placed venue as R12 ASCII DXF.
///
/// Each venue becomes a closed polyline on a layer named after its type,
/// with its label centered on the venue and rotated with it.
pub fn render_dxf(
    boundary: &Boundary,
    layout: &Layout,
    catalog: &[VenueType],
    options: &DxfOptions,
) -> String {
    let mut out = String::new();

    group(&mut out, 999, format_args!("units: {}", options.unit.symbol()));
    group(&mut out, 0, "SECTION");
    group(&mut out, 2, "HEADER");
    group(&mut out, 9, "$ACADVER");
    group(&mut out, 1, "AC1009");
    group(&mut out, 0, "ENDSEC");

    group(&mut out, 0, "SECTION");
    group(&mut out, 2, "ENTITIES");

    closed_polyline(&mut out, BOUNDARY_LAYER, &boundary.points, options.factor);

    for placed in &layout.placements {
        let layer = catalog
            .get(placed.venue_type)
            .map(|venue| layer_name(&venue.name))
            .unwrap_or_else(|| layer_name(&placed.name));
        closed_polyline(&mut out, &layer, &placed.corners(), options.factor);
        centered_text(&mut out, &layer, &placed.name, placed.center(), placed.angle, options);
    }

    group(&mut out, 0, "ENDSEC");
    group(&mut out, 0, "EOF");

    out
}

/// Write the layout as a DXF file
pub fn write_dxf(
    path: &Path,
    boundary: &Boundary,
    layout: &Layout,
    catalog: &[VenueType],
    options: &DxfOptions,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create DXF file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writer.write_all(render_dxf(boundary, layout, catalog, options).as_bytes())?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad::parse_dxf_boundary;
    use crate::domain::PlacedVenue;
    use crate::layout::TypeSummary;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> (Boundary, Layout, Vec<VenueType>) {
        let catalog = vec![VenueType::new("basketball", 28.0, 15.0, 1)];
        let layout = Layout {
            placements: vec![PlacedVenue {
                venue_type: 0,
                name: "basketball".to_string(),
                x: 10.0,
                y: 20.0,
                width: 15.0,
                height: 28.0,
                angle: 0.0,
            }],
            carried_over: 0,
            summaries: vec![TypeSummary {
                name: "basketball".to_string(),
                requested: 1,
                placed: 1,
                reason: None,
            }],
            seed: 1,
        };
        (Boundary::rectangle(250.0, 180.0), layout, catalog)
    }

    #[test]
    fn test_render_entities() {
        let (boundary, layout, catalog) = sample();
        let dxf = render_dxf(&boundary, &layout, &catalog, &DxfOptions::default());

        assert_eq!(dxf.matches("\nPOLYLINE\n").count(), 2);
        assert_eq!(dxf.matches("\nVERTEX\n").count(), 8);
        assert_eq!(dxf.matches("\nTEXT\n").count(), 1);
        assert!(dxf.contains("8\nBASKETBALL\n"));
        assert!(dxf.contains("1\nbasketball\n"));
        // Label anchored at the venue center
        assert!(dxf.contains("11\n17.500000\n21\n34.000000\n"));
        assert!(dxf.ends_with("0\nEOF\n"));
    }

    #[test]
    fn test_unit_factor_scales_coordinates() {
        let (boundary, layout, catalog) = sample();
        let options = DxfOptions {
            factor: 1000.0,
            unit: Unit::Millimeters,
            ..Default::default()
        };
        let dxf = render_dxf(&boundary, &layout, &catalog, &options);

        assert!(dxf.contains("10\n250000.000000\n"));
        assert!(dxf.contains("40\n4000.000000\n"));
        assert!(dxf.starts_with("999\nunits: mm\n"));
        assert!(!dxf.contains("$INSUNITS"));
    }

    #[test]
    fn test_rotated_venue_outline_and_label() {
        let (boundary, mut layout, catalog) = sample();
        layout.placements[0].angle = 30.0;
        let placed = layout.placements[0].clone();
        let options = DxfOptions {
            factor: 100.0,
            unit: Unit::Centimeters,
            ..Default::default()
        };
        let dxf = render_dxf(&boundary, &layout, &catalog, &options);

        assert!(dxf.contains("50\n30.000000\n"));

        let mut expected = String::new();
        for (x, y) in placed.corners() {
            expected.push_str(&format!(
                "0\nVERTEX\n8\nBASKETBALL\n10\n{:.6}\n20\n{:.6}\n30\n0.0\n",
                x * 100.0,
                y * 100.0
            ));
        }
        assert!(dxf.contains(&expected));

        // The center does not move under rotation
        let (cx, cy) = placed.center();
        assert!(dxf.contains(&format!("11\n{:.6}\n21\n{:.6}\n", cx * 100.0, cy * 100.0)));
    }

    #[test]
    fn test_boundary_round_trips_through_importer() {
        let (boundary, layout, catalog) = sample();
        let dxf = render_dxf(&boundary, &layout, &catalog, &DxfOptions::default());

        // The site outline is the largest polyline in the file
        assert_eq!(parse_dxf_boundary(&dxf).unwrap(), boundary);
    }

    #[test]
    fn test_write_dxf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.dxf");
        let (boundary, layout, catalog) = sample();

        write_dxf(&path, &boundary, &layout, &catalog, &DxfOptions::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_dxf(&boundary, &layout, &catalog, &DxfOptions::default()));
    }

    #[test]
    fn test_layer_name() {
        assert_eq!(layer_name("badminton"), "BADMINTON");
        assert_eq!(layer_name("5-a-side soccer"), "5-A-SIDE_SOCCER");
        assert_eq!(layer_name(""), "VENUE");
    }
}
