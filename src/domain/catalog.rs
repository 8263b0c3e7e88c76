//! Standard court sizes (meters), in the order the engine should place them.
//!
//! Larger and less flexible venues come first; the engine never reorders.

use super::{Orientation, VenueType};

pub const BASKETBALL: (f64, f64) = (28.0, 15.0);
pub const SOCCER: (f64, f64) = (105.0, 68.0);
pub const BADMINTON: (f64, f64) = (13.4, 6.1);

pub const DEFAULT_SITE_WIDTH: f64 = 250.0;
pub const DEFAULT_SITE_HEIGHT: f64 = 180.0;
pub const DEFAULT_BUFFER: f64 = 5.0;

pub const DEFAULT_BASKETBALL_COUNT: usize = 3;
pub const DEFAULT_SOCCER_COUNT: usize = 0;
pub const DEFAULT_BADMINTON_COUNT: usize = 15;

/// Basketball courts run north-south to keep low sun out of players' eyes.
pub fn basketball(count: usize) -> VenueType {
    VenueType::new("basketball", BASKETBALL.0, BASKETBALL.1, count)
        .with_orientation(Orientation::NorthSouth)
        .with_color("#1f77b4")
}

pub fn soccer(count: usize) -> VenueType {
    VenueType::new("soccer", SOCCER.0, SOCCER.1, count)
        .with_orientation(Orientation::Fixed)
        .with_color("#2ca02c")
}

pub fn badminton(count: usize) -> VenueType {
    VenueType::new("badminton", BADMINTON.0, BADMINTON.1, count)
        .with_orientation(Orientation::Fixed)
        .with_color("#d62728")
}

/// Basketball, soccer, badminton; zero-count entries are kept so every
/// type still shows up in the run summary
pub fn standard_catalog(
    basketball_count: usize,
    soccer_count: usize,
    badminton_count: usize,
) -> Vec<VenueType> {
    vec![
        basketball(basketball_count),
        soccer(soccer_count),
        badminton(badminton_count),
    ]
}
