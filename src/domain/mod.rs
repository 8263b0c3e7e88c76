pub mod boundary;
pub mod catalog;
pub mod venue;

pub use boundary::Boundary;
pub use catalog::standard_catalog;
pub use venue::{Orientation, PlacedVenue, VenueType};
