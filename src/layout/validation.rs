//! Post-run audit of a layout
//!
//! Re-checks what the engine promises, independently of how it got there:
//! - No two venues overlap (buffer included, same test as the run)
//! - Every corner, rotated if needed, lies inside the boundary
//! - Forced orientations stayed at 0°
//! - Placed plus missing adds up to what was requested

use super::{Layout, LayoutParams, OverlapTest};
use crate::domain::{Boundary, PlacedVenue, VenueType};
use crate::geometry::{
    oriented_rects_overlap_with_buffer, point_in_polygon, rects_overlap_with_buffer,
};

/// Result of layout validation
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Total number of placements validated
    pub total: usize,
    /// Pairs of venues closer than the buffer
    pub overlapping_pairs: usize,
    /// Venues with at least one corner outside the boundary
    pub outside_boundary: usize,
    /// Forced-orientation venues with a non-zero angle
    pub rotated_forced: usize,
    /// Catalog entries whose summary disagrees with the placements
    pub accounting_mismatches: usize,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.overlapping_pairs == 0
            && self.outside_boundary == 0
            && self.rotated_forced == 0
            && self.accounting_mismatches == 0
    }

    pub fn summary(&self) -> String {
        if self.is_valid() {
            format!("Layout valid: {} venues, no issues", self.total)
        } else {
            format!(
                "Layout issues: {} venues, {} overlapping pairs, {} outside boundary, {} rotated forced, {} accounting mismatches",
                self.total,
                self.overlapping_pairs,
                self.outside_boundary,
                self.rotated_forced,
                self.accounting_mismatches
            )
        }
    }
}

/// `later` was accepted after `earlier` and plays the candidate's role
fn too_close(later: &PlacedVenue, earlier: &PlacedVenue, params: &LayoutParams) -> bool {
    match params.overlap {
        OverlapTest::BoundingBox => {
            rects_overlap_with_buffer(later.bbox(), earlier.bbox(), params.buffer)
        }
        OverlapTest::Oriented => oriented_rects_overlap_with_buffer(
            later.bbox(),
            later.angle,
            earlier.bbox(),
            earlier.angle,
            params.buffer,
        ),
    }
}

/// Validate a layout produced for `catalog` inside `boundary`.
///
/// Orientation and accounting checks only look at venues placed by this run;
/// carried-over venues still take part in the overlap and boundary checks.
pub fn validate_layout(
    layout: &Layout,
    catalog: &[VenueType],
    boundary: &Boundary,
    params: &LayoutParams,
) -> ValidationReport {
    let mut report = ValidationReport {
        total: layout.placements.len(),
        ..Default::default()
    };

    let placements = &layout.placements;
    for i in 0..placements.len() {
        for j in (i + 1)..placements.len() {
            if too_close(&placements[j], &placements[i], params) {
                report.overlapping_pairs += 1;
                report.warnings.push(format!(
                    "{} #{} and {} #{} are closer than {}",
                    placements[i].name, i, placements[j].name, j, params.buffer
                ));
            }
        }
    }

    if params.check_containment {
        for (i, placed) in placements.iter().enumerate() {
            let outside = placed
                .corners()
                .iter()
                .any(|&corner| !point_in_polygon(corner, &boundary.points));
            if outside {
                report.outside_boundary += 1;
                report
                    .warnings
                    .push(format!("{} #{} leaves the site boundary", placed.name, i));
            }
        }
    }

    for placed in layout.new_placements() {
        let forced = catalog
            .get(placed.venue_type)
            .is_some_and(|venue| venue.is_forced());
        if forced && placed.angle != 0.0 {
            report.rotated_forced += 1;
            report.warnings.push(format!(
                "{} has a fixed orientation but is rotated by {:.1}°",
                placed.name, placed.angle
            ));
        }
    }

    for (index, venue) in catalog.iter().enumerate() {
        let placed = layout
            .new_placements()
            .iter()
            .filter(|p| p.venue_type == index)
            .count();
        let consistent = layout.summaries.get(index).is_some_and(|summary| {
            summary.placed == placed && summary.requested == venue.count && placed <= venue.count
        });
        if !consistent {
            report.accounting_mismatches += 1;
            report.warnings.push(format!(
                "{}: summary does not match {} placed of {} requested",
                venue.name, placed, venue.count
            ));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Orientation, PlacedVenue};
    use crate::layout::{TypeSummary, generate_layout};

    fn venue(venue_type: usize, x: f64, y: f64, angle: f64) -> PlacedVenue {
        PlacedVenue {
            venue_type,
            name: "A".to_string(),
            x,
            y,
            width: 10.0,
            height: 10.0,
            angle,
        }
    }

    fn layout_of(placements: Vec<PlacedVenue>, requested: usize) -> Layout {
        Layout {
            summaries: vec![TypeSummary {
                name: "A".to_string(),
                requested,
                placed: placements.len(),
                reason: None,
            }],
            placements,
            carried_over: 0,
            seed: 0,
        }
    }

    #[test]
    fn test_generated_layout_is_valid() {
        let catalog = vec![
            VenueType::new("A", 20.0, 10.0, 6).with_orientation(Orientation::Fixed),
            VenueType::new("B", 8.0, 5.0, 6),
        ];
        let site = Boundary::rectangle(120.0, 80.0);
        let params = LayoutParams::default().with_max_rotation(30.0).with_seed(12);

        let layout = generate_layout(&catalog, &site, &params).unwrap();
        let report = validate_layout(&layout, &catalog, &site, &params);

        assert!(report.is_valid(), "{}", report.summary());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_detects_overlap_and_escape() {
        let catalog = vec![VenueType::new("A", 10.0, 10.0, 3)];
        let site = Boundary::rectangle(100.0, 100.0);
        let params = LayoutParams::default().with_buffer(0.0);

        let layout = layout_of(
            vec![venue(0, 10.0, 10.0, 0.0), venue(0, 15.0, 15.0, 0.0), venue(0, 95.0, 50.0, 0.0)],
            3,
        );
        let report = validate_layout(&layout, &catalog, &site, &params);

        assert_eq!(report.overlapping_pairs, 1);
        assert_eq!(report.outside_boundary, 1);
        assert!(!report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_detects_rotated_forced_venue() {
        let catalog = vec![VenueType::new("A", 10.0, 10.0, 1).with_orientation(Orientation::Fixed)];
        let site = Boundary::rectangle(100.0, 100.0);

        let layout = layout_of(vec![venue(0, 40.0, 40.0, 15.0)], 1);
        let report = validate_layout(&layout, &catalog, &site, &LayoutParams::default());

        assert_eq!(report.rotated_forced, 1);
        assert_eq!(report.overlapping_pairs, 0);
    }

    #[test]
    fn test_detects_accounting_mismatch() {
        let catalog = vec![VenueType::new("A", 10.0, 10.0, 4)];
        let site = Boundary::rectangle(100.0, 100.0);

        let mut layout = layout_of(vec![venue(0, 40.0, 40.0, 0.0)], 4);
        layout.summaries[0].placed = 2;
        let report = validate_layout(&layout, &catalog, &site, &LayoutParams::default());

        assert_eq!(report.accounting_mismatches, 1);
        assert!(report.summary().contains("1 accounting mismatches"));
    }
}
