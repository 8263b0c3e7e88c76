use thiserror::Error;

/// Configuration problems detected before any sampling starts.
///
/// Running out of attempts is not an error; it is reported per venue type in
/// the layout summaries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("site boundary needs at least 3 distinct points, got {0}")]
    DegenerateBoundary(usize),

    #[error("venue type `{name}` has invalid dimensions {width} x {height}")]
    InvalidDimensions {
        name: String,
        width: f64,
        height: f64,
    },

    #[error("buffer must be a finite non-negative distance, got {0}")]
    InvalidBuffer(f64),

    #[error("maximum rotation must be a finite non-negative angle, got {0}")]
    InvalidRotation(f64),

    #[error("attempts per instance must be at least 1")]
    NoAttempts,
}
