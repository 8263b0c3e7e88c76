/// Axis-aligned bounding box in site units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a set of points
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_x = f64::MAX;
        let mut max_x = f64::MIN;
        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;

        for &(x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[(f64, f64)]) {
        for &(x, y) in points {
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }
}

/// Maps site coordinates onto a pixel canvas with y pointing down.
///
/// The larger site dimension fills the canvas minus the margin on both sides,
/// and the drawing is centered along the other axis.
#[derive(Debug, Clone)]
pub struct Scaler {
    /// Pixels per site unit
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Scaler {
    /// Fit `bounds` into a canvas whose longer side is `target_px`
    pub fn from_bounds(bounds: &Bounds, target_px: f64) -> Self {
        Self::from_bounds_with_margin(bounds, target_px, 0.0)
    }

    /// Same as [`Scaler::from_bounds`] with `margin_px` kept free on every side
    pub fn from_bounds_with_margin(bounds: &Bounds, target_px: f64, margin_px: f64) -> Self {
        let width = bounds.width();
        let height = bounds.height();

        let usable = target_px - 2.0 * margin_px;
        let max_dim = width.max(height);

        let scale = if max_dim > 0.0 { usable / max_dim } else { 1.0 };

        let canvas_width = width * scale + 2.0 * margin_px;
        let canvas_height = height * scale + 2.0 * margin_px;

        let offset_x = margin_px - bounds.min_x * scale;
        // y is flipped: max_y lands on the top margin
        let offset_y = margin_px + bounds.max_y * scale;

        Self {
            scale,
            offset_x,
            offset_y,
            canvas_width,
            canvas_height,
        }
    }

    /// Site point to canvas pixels
    pub fn scale(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, self.offset_y - y * self.scale)
    }

    /// Scale a slice of points
    pub fn scale_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points.iter().map(|&(x, y)| self.scale(x, y)).collect()
    }

    /// Pixels per site unit
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }
}
