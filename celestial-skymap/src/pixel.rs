use std::fmt;

/// Two-dimensional pixel position, zero-based.
///
/// For a WCS grid `(x, y)` are column and row, with integer values at pixel
/// centres. HEALPix maps have no second axis: `x` carries the pixel index
/// and `y` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkyPixel {
    x: f64,
    y: f64,
}

impl SkyPixel {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position of a one-dimensional (HEALPix) pixel.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self {
            x: index as f64,
            y: 0.0,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for SkyPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
