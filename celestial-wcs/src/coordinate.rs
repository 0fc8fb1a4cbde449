//! The four coordinate stages of the FITS-WCS pipeline:
//! pixel → intermediate → native spherical → celestial.

use celestial_core::Angle;

/// Continuous pixel position in the FITS convention: the centre of the
/// first pixel is (1.0, 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCoord {
    x: f64,
    y: f64,
}

impl PixelCoord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Centre of the zero-based grid cell (ix, iy).
    #[inline]
    pub fn from_grid(ix: usize, iy: usize) -> Self {
        Self {
            x: ix as f64 + 1.0,
            y: iy as f64 + 1.0,
        }
    }

    /// Zero-based grid cell containing this position.
    ///
    /// A position exactly on the boundary between two cells belongs to the
    /// upper one: cell `i` covers `[i - 0.5, i + 0.5)` in zero-based units.
    /// Returns signed indices so callers can detect positions left of or
    /// below the grid.
    #[inline]
    pub fn grid_cell(&self) -> (i64, i64) {
        (cell_of(self.x - 1.0), cell_of(self.y - 1.0))
    }
}

#[inline]
fn cell_of(p: f64) -> i64 {
    libm::floor(p + 0.5) as i64
}

/// Intermediate world coordinates, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntermediateCoord {
    x: f64,
    y: f64,
}

impl IntermediateCoord {
    #[inline]
    pub fn new(x_deg: f64, y_deg: f64) -> Self {
        Self { x: x_deg, y: y_deg }
    }

    #[inline]
    pub fn x_deg(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y_deg(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn x_rad(&self) -> f64 {
        self.x.to_radians()
    }

    #[inline]
    pub fn y_rad(&self) -> f64 {
        self.y.to_radians()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeCoord {
    phi: Angle,
    theta: Angle,
}

impl NativeCoord {
    #[inline]
    pub fn new(phi: Angle, theta: Angle) -> Self {
        Self { phi, theta }
    }

    #[inline]
    pub fn phi(&self) -> Angle {
        self.phi
    }

    #[inline]
    pub fn theta(&self) -> Angle {
        self.theta
    }
}

/// Longitude/latitude in whichever celestial frame the WCS axes name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialCoord {
    alpha: Angle,
    delta: Angle,
}

impl CelestialCoord {
    #[inline]
    pub fn new(alpha: Angle, delta: Angle) -> Self {
        Self { alpha, delta }
    }

    #[inline]
    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(Angle::from_degrees(lon), Angle::from_degrees(lat))
    }

    #[inline]
    pub fn alpha(&self) -> Angle {
        self.alpha
    }

    #[inline]
    pub fn delta(&self) -> Angle {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_centres_are_one_based() {
        let p = PixelCoord::from_grid(0, 0);
        assert_eq!((p.x(), p.y()), (1.0, 1.0));
        let p = PixelCoord::from_grid(4, 2);
        assert_eq!((p.x(), p.y()), (5.0, 3.0));
    }

    #[test]
    fn test_grid_cell_of_centre() {
        for ix in 0..5 {
            for iy in 0..3 {
                let cell = PixelCoord::from_grid(ix, iy).grid_cell();
                assert_eq!(cell, (ix as i64, iy as i64));
            }
        }
    }

    #[test]
    fn test_grid_cell_boundaries() {
        // Zero-based 0.5 is the edge between cells 0 and 1.
        assert_eq!(PixelCoord::new(1.5, 1.0).grid_cell(), (1, 0));
        assert_eq!(PixelCoord::new(1.49, 1.0).grid_cell(), (0, 0));
        assert_eq!(PixelCoord::new(0.5, 0.5).grid_cell(), (0, 0));
        assert_eq!(PixelCoord::new(0.49, 0.2).grid_cell(), (-1, -1));
    }

    #[test]
    fn test_intermediate_coord_units() {
        let c = IntermediateCoord::new(0.001, -0.002);
        assert_eq!(c.x_deg(), 0.001);
        assert!((c.x_rad() - 0.001_f64.to_radians()).abs() < 1e-15);
        assert!((c.y_rad() - (-0.002_f64).to_radians()).abs() < 1e-15);
    }

    #[test]
    fn test_celestial_from_degrees() {
        let c = CelestialCoord::from_degrees(180.0, 45.0);
        assert_eq!(c.alpha(), Angle::from_degrees(180.0));
        assert_eq!(c.delta(), Angle::from_degrees(45.0));
    }
}
