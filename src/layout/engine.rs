//! Randomized first-fit placement of venues inside a site boundary
//!
//! # Algorithm
//! For every venue type in catalog order, and for every requested instance:
//! 1. Draw a lower-left corner uniformly from the boundary's bounding box
//!    (inset by the buffer when `inset_sampling` is on)
//! 2. Forced orientations use angle 0; free ones draw an angle in
//!    `[0, max_rotation_degrees]` and rotate about the venue's center
//! 3. Reject the candidate if a corner falls outside the boundary, or if it
//!    overlaps an accepted venue (buffer included)
//! 4. Keep the first candidate that survives; after `attempts_per_instance`
//!    misses the instance counts as a shortfall and the run moves on
//!
//! This is a Monte-Carlo heuristic. It can miss placements that exist,
//! especially close to capacity, and it never moves a venue once accepted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::LayoutError;
use crate::domain::{Boundary, PlacedVenue, VenueType};
use crate::geometry::{
    Bounds, oriented_rects_overlap_with_buffer, rect_fully_inside, rects_overlap_with_buffer,
    rotated_rect_inside,
};

pub const DEFAULT_ATTEMPTS: usize = 3000;

/// How candidates are compared against accepted venues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapTest {
    /// Unrotated boxes, even for rotated venues
    #[default]
    BoundingBox,
    /// Separating-axis test on the rotated rectangles. Accepts layouts the
    /// box test would reject.
    Oriented,
}

/// Parameters of one placement run
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Minimum clearance between any two venues
    pub buffer: f64,
    /// Upper bound for free rotations, in degrees. 0 disables rotation.
    pub max_rotation_degrees: f64,
    pub attempts_per_instance: usize,
    /// Fixed seed for reproducible runs; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Keep sampled corners at least `buffer` away from the bounding box edges
    pub inset_sampling: bool,
    /// When false the boundary only provides the sampling box
    pub check_containment: bool,
    pub overlap: OverlapTest,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            buffer: 5.0,
            max_rotation_degrees: 0.0,
            attempts_per_instance: DEFAULT_ATTEMPTS,
            seed: None,
            inset_sampling: true,
            check_containment: true,
            overlap: OverlapTest::BoundingBox,
        }
    }
}

impl LayoutParams {
    pub fn with_buffer(mut self, buffer: f64) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_max_rotation(mut self, degrees: f64) -> Self {
        self.max_rotation_degrees = degrees;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts_per_instance = attempts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_inset_sampling(mut self, inset: bool) -> Self {
        self.inset_sampling = inset;
        self
    }

    pub fn with_containment(mut self, check: bool) -> Self {
        self.check_containment = check;
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapTest) -> Self {
        self.overlap = overlap;
        self
    }
}

/// Why some instances of a venue type were left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortfallReason {
    /// Sampling ran out of attempts for at least one instance
    AttemptsExhausted,
    /// The venue is larger than the sampling box, nothing was sampled
    DoesNotFit,
    /// Zero-area or non-finite site geometry
    Degenerate,
}

/// Outcome for one catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub requested: usize,
    pub placed: usize,
    pub reason: Option<ShortfallReason>,
}

impl TypeSummary {
    pub fn missing(&self) -> usize {
        self.requested - self.placed
    }
}

/// Result of a placement run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Carried-over venues first, then new ones in acceptance order
    pub placements: Vec<PlacedVenue>,
    /// Number of leading placements that were passed in, not placed by this run
    pub carried_over: usize,
    /// One entry per catalog entry, in catalog order
    pub summaries: Vec<TypeSummary>,
    /// Seed the run actually used; replaying it reproduces the layout
    pub seed: u64,
}

impl Layout {
    /// Venues placed by this run
    pub fn new_placements(&self) -> &[PlacedVenue] {
        &self.placements[self.carried_over..]
    }

    pub fn shortfalls(&self) -> impl Iterator<Item = &TypeSummary> {
        self.summaries.iter().filter(|s| s.missing() > 0)
    }

    pub fn total_requested(&self) -> usize {
        self.summaries.iter().map(|s| s.requested).sum()
    }

    pub fn total_placed(&self) -> usize {
        self.summaries.iter().map(|s| s.placed).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.shortfalls().next().is_none()
    }
}

/// Reject configurations no amount of sampling can fix
pub fn validate_inputs(
    catalog: &[VenueType],
    boundary: &Boundary,
    params: &LayoutParams,
) -> Result<(), LayoutError> {
    if params.check_containment && !boundary.is_valid() {
        return Err(LayoutError::DegenerateBoundary(boundary.distinct_len()));
    }

    if !params.buffer.is_finite() || params.buffer < 0.0 {
        return Err(LayoutError::InvalidBuffer(params.buffer));
    }

    if !params.max_rotation_degrees.is_finite() || params.max_rotation_degrees < 0.0 {
        return Err(LayoutError::InvalidRotation(params.max_rotation_degrees));
    }

    if params.attempts_per_instance == 0 {
        return Err(LayoutError::NoAttempts);
    }

    for venue in catalog {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !valid(venue.width) || !valid(venue.height) {
            return Err(LayoutError::InvalidDimensions {
                name: venue.name.clone(),
                width: venue.width,
                height: venue.height,
            });
        }
    }

    Ok(())
}

/// Place every requested venue instance inside `boundary`.
///
/// Returns an error only for invalid configuration. Instances that could not
/// be placed are reported in [`Layout::summaries`].
pub fn generate_layout(
    catalog: &[VenueType],
    boundary: &Boundary,
    params: &LayoutParams,
) -> Result<Layout, LayoutError> {
    extend_layout(&[], catalog, boundary, params)
}

/// Like [`generate_layout`], keeping `existing` venues in place.
///
/// Existing venues take part in overlap checks and lead the output
/// unchanged. Their `venue_type` indices refer to whichever catalog placed
/// them; summaries cover only the new request.
pub fn extend_layout(
    existing: &[PlacedVenue],
    catalog: &[VenueType],
    boundary: &Boundary,
    params: &LayoutParams,
) -> Result<Layout, LayoutError> {
    validate_inputs(catalog, boundary, params)?;

    let seed = params.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let site = Site::new(boundary, params);
    let mut placements = existing.to_vec();

    let summaries = catalog
        .iter()
        .enumerate()
        .map(|(index, venue)| site.place_type(&mut rng, index, venue, &mut placements))
        .collect();

    Ok(Layout {
        placements,
        carried_over: existing.len(),
        summaries,
        seed,
    })
}

/// Boundary-derived state shared by all venue types of a run
struct Site<'a> {
    polygon: &'a [(f64, f64)],
    bounds: Option<Bounds>,
    degenerate: bool,
    params: &'a LayoutParams,
}

impl<'a> Site<'a> {
    fn new(boundary: &'a Boundary, params: &'a LayoutParams) -> Self {
        let bounds = boundary.bounds();
        let finite = bounds.is_some_and(|b| b.is_finite());
        let degenerate = !finite || (params.check_containment && boundary.area() <= 0.0);

        Self {
            polygon: &boundary.points,
            bounds,
            degenerate,
            params,
        }
    }

    fn place_type(
        &self,
        rng: &mut StdRng,
        index: usize,
        venue: &VenueType,
        placements: &mut Vec<PlacedVenue>,
    ) -> TypeSummary {
        let mut summary = TypeSummary {
            name: venue.name.clone(),
            requested: venue.count,
            placed: 0,
            reason: None,
        };

        if venue.count == 0 {
            return summary;
        }

        let (width, height) = venue.placed_dimensions();

        let domain = match self.bounds {
            Some(bounds) if !self.degenerate => self.sampling_domain(&bounds, width, height),
            _ => Err(ShortfallReason::Degenerate),
        };

        let (x_range, y_range) = match domain {
            Ok(ranges) => ranges,
            Err(reason) => {
                tracing::debug!(venue = %venue.name, ?reason, "skipping venue type");
                summary.reason = Some(reason);
                return summary;
            }
        };

        for _ in 0..venue.count {
            let candidate = self.sample_instance(
                rng, index, venue, width, height, x_range, y_range, placements,
            );
            match candidate {
                Some(placed) => {
                    placements.push(placed);
                    summary.placed += 1;
                }
                None => summary.reason = Some(ShortfallReason::AttemptsExhausted),
            }
        }

        tracing::debug!(
            venue = %venue.name,
            requested = summary.requested,
            placed = summary.placed,
            "placed venue type"
        );

        summary
    }

    /// Intervals for the lower-left corner, or why there are none
    fn sampling_domain(
        &self,
        bounds: &Bounds,
        width: f64,
        height: f64,
    ) -> Result<((f64, f64), (f64, f64)), ShortfallReason> {
        let inset = if self.params.inset_sampling {
            self.params.buffer
        } else {
            0.0
        };

        let x_range = (bounds.min_x + inset, bounds.max_x - width - inset);
        let y_range = (bounds.min_y + inset, bounds.max_y - height - inset);

        let finite = [x_range.0, x_range.1, y_range.0, y_range.1]
            .iter()
            .all(|v| v.is_finite());
        // Finite endpoints can still span more than f64 can hold
        let spans_finite =
            (x_range.1 - x_range.0).is_finite() && (y_range.1 - y_range.0).is_finite();
        if !finite || !spans_finite {
            return Err(ShortfallReason::Degenerate);
        }

        if x_range.0 > x_range.1 || y_range.0 > y_range.1 {
            return Err(ShortfallReason::DoesNotFit);
        }

        Ok((x_range, y_range))
    }

    #[allow(clippy::too_many_arguments)]
    fn sample_instance(
        &self,
        rng: &mut StdRng,
        index: usize,
        venue: &VenueType,
        width: f64,
        height: f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
        placements: &[PlacedVenue],
    ) -> Option<PlacedVenue> {
        let max_rotation = self.params.max_rotation_degrees;

        for _ in 0..self.params.attempts_per_instance {
            let x = rng.gen_range(x_range.0..=x_range.1);
            let y = rng.gen_range(y_range.0..=y_range.1);
            let angle = if venue.is_forced() || max_rotation == 0.0 {
                0.0
            } else {
                rng.gen_range(0.0..=max_rotation)
            };

            let candidate = (x, y, width, height);

            if self.params.check_containment && !self.contains(candidate, angle) {
                continue;
            }

            if self.overlaps_any(candidate, angle, placements) {
                continue;
            }

            return Some(PlacedVenue {
                venue_type: index,
                name: venue.name.clone(),
                x,
                y,
                width,
                height,
                angle,
            });
        }

        None
    }

    fn contains(&self, (x, y, w, h): (f64, f64, f64, f64), angle: f64) -> bool {
        if angle == 0.0 {
            rect_fully_inside(x, y, w, h, self.polygon)
        } else {
            rotated_rect_inside(x + w / 2.0, y + h / 2.0, w, h, angle, self.polygon)
        }
    }

    fn overlaps_any(
        &self,
        candidate: (f64, f64, f64, f64),
        angle: f64,
        placements: &[PlacedVenue],
    ) -> bool {
        let buffer = self.params.buffer;
        placements.iter().any(|other| match self.params.overlap {
            OverlapTest::BoundingBox => rects_overlap_with_buffer(candidate, other.bbox(), buffer),
            OverlapTest::Oriented => oriented_rects_overlap_with_buffer(
                candidate,
                angle,
                other.bbox(),
                other.angle,
                buffer,
            ),
        })
    }
}
