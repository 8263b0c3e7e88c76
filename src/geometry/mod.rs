pub mod kernel;
pub mod scaling;
pub mod simplify;
pub mod units;

pub use kernel::{
    oriented_rects_overlap_with_buffer, point_in_polygon, rect_fully_inside,
    rects_overlap_with_buffer, rotated_rect_corners, rotated_rect_inside,
};
pub use scaling::{Bounds, Scaler};
pub use simplify::simplify_boundary;
pub use units::{Unit, conversion_factor};
