pub mod engine;
pub mod error;
pub mod schemes;
pub mod validation;

pub use engine::{
    DEFAULT_ATTEMPTS, Layout, LayoutParams, OverlapTest, ShortfallReason, TypeSummary,
    extend_layout, generate_layout, validate_inputs,
};
pub use error::LayoutError;
pub use schemes::generate_schemes;
pub use validation::{ValidationReport, validate_layout};
