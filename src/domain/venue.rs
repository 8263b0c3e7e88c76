use serde::{Deserialize, Serialize};

use crate::geometry::kernel::rotated_rect_corners;

/// Orientation policy of a venue type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Rotated by a random angle up to the run's maximum
    #[default]
    Free,
    /// Always 0°, nominal width along x
    Fixed,
    /// Always 0°, long axis along y (north-south)
    NorthSouth,
    /// Always 0°, long axis along x (east-west)
    EastWest,
}

impl Orientation {
    pub fn is_forced(self) -> bool {
        self != Orientation::Free
    }

    /// Width and height after applying the policy's axis alignment
    pub fn oriented_dimensions(self, width: f64, height: f64) -> (f64, f64) {
        match self {
            Orientation::Free | Orientation::Fixed => (width, height),
            Orientation::NorthSouth => (width.min(height), width.max(height)),
            Orientation::EastWest => (width.max(height), width.min(height)),
        }
    }
}

/// A catalog entry: nominal size, requested count and orientation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueType {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub count: usize,
    /// Presentation only
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub orientation: Orientation,
}

fn default_color() -> String {
    "#7f7f7f".to_string()
}

impl VenueType {
    pub fn new(name: impl Into<String>, width: f64, height: f64, count: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            count,
            color: default_color(),
            orientation: Orientation::Free,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn is_forced(&self) -> bool {
        self.orientation.is_forced()
    }

    /// Footprint the engine places: nominal size with the axis swap applied
    pub fn placed_dimensions(&self) -> (f64, f64) {
        self.orientation.oriented_dimensions(self.width, self.height)
    }
}

/// One accepted venue instance.
///
/// `(x, y)` is the lower-left corner before rotation; rotation turns the
/// rectangle about its own center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedVenue {
    /// Index of the venue type in the catalog the run was given
    pub venue_type: usize,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, counter-clockwise
    pub angle: f64,
}

impl PlacedVenue {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Unrotated box as `(x, y, w, h)`
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }

    /// Corners with rotation applied
    pub fn corners(&self) -> [(f64, f64); 4] {
        let (cx, cy) = self.center();
        rotated_rect_corners(cx, cy, self.width, self.height, self.angle)
    }
}
