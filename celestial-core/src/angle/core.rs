//! The [`Angle`] value type.
//!
//! Angles are stored as radians. Sky maps are usually described in degrees
//! (pixel scales, reference values, region radii) while every trigonometric
//! kernel works in radians, so the type keeps one representation and converts
//! at the edges.
//!
//! ```
//! use celestial_core::Angle;
//!
//! let scale = Angle::from_arcminutes(3.7);
//! assert!((scale.degrees() - 3.7 / 60.0).abs() < 1e-15);
//!
//! let lon = Angle::from_degrees(-90.0).normalized();
//! assert!((lon.degrees() - 270.0).abs() < 1e-12);
//! ```

use crate::constants::{HALF_PI, PI};

/// An angle stored in radians.
///
/// `Eq`/`Ord` are not implemented because the payload can be NaN.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Angle {
    rad: f64,
}

impl Angle {
    pub const ZERO: Self = Self { rad: 0.0 };

    pub const PI: Self = Self { rad: PI };

    pub const HALF_PI: Self = Self { rad: HALF_PI };

    #[inline]
    pub const fn from_radians(rad: f64) -> Self {
        Self { rad }
    }

    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        Self {
            rad: deg.to_radians(),
        }
    }

    /// One arcminute is 1/60 degree. Pixel scales are often quoted this way.
    #[inline]
    pub fn from_arcminutes(arcmin: f64) -> Self {
        Self {
            rad: (arcmin / 60.0).to_radians(),
        }
    }

    #[inline]
    pub fn from_arcseconds(arcsec: f64) -> Self {
        Self {
            rad: (arcsec / 3600.0).to_radians(),
        }
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.rad
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.rad.to_degrees()
    }

    #[inline]
    pub fn arcminutes(self) -> f64 {
        self.degrees() * 60.0
    }

    #[inline]
    pub fn arcseconds(self) -> f64 {
        self.degrees() * 3600.0
    }

    #[inline]
    pub fn sin(self) -> f64 {
        libm::sin(self.rad)
    }

    #[inline]
    pub fn cos(self) -> f64 {
        libm::cos(self.rad)
    }

    /// Returns `(sin, cos)`.
    #[inline]
    pub fn sin_cos(self) -> (f64, f64) {
        libm::sincos(self.rad)
    }

    #[inline]
    pub fn tan(self) -> f64 {
        libm::tan(self.rad)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self {
            rad: self.rad.abs(),
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.rad.is_finite()
    }

    /// Wraps into [-180°, +180°).
    ///
    /// ```
    /// use celestial_core::Angle;
    ///
    /// let a = Angle::from_degrees(270.0).wrapped();
    /// assert!((a.degrees() + 90.0).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn wrapped(self) -> Self {
        Self {
            rad: super::normalize::wrap_pm_pi(self.rad),
        }
    }

    /// Wraps into [0°, 360°).
    #[inline]
    pub fn normalized(self) -> Self {
        Self {
            rad: super::normalize::wrap_0_2pi(self.rad),
        }
    }

    /// Validates a longitude-like angle.
    ///
    /// With `normalize` the angle is wrapped into [0, 2π); otherwise it must
    /// already lie in [-π, π].
    ///
    /// # Errors
    ///
    /// [`AstroError`](crate::AstroError) when the angle is not finite or, without
    /// `normalize`, out of range.
    #[inline]
    pub fn validate_longitude(self, normalize: bool) -> Result<Self, crate::AstroError> {
        super::validate::validate_longitude(self, normalize)
    }

    /// Validates a latitude-like angle against [-90°, +90°].
    #[inline]
    pub fn validate_latitude(self) -> Result<Self, crate::AstroError> {
        super::validate::validate_latitude(self)
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}°", p, self.degrees()),
            None => write!(f, "{}°", self.degrees()),
        }
    }
}

/// Shorthand for [`Angle::from_radians`].
#[inline]
pub fn rad(v: f64) -> Angle {
    Angle::from_radians(v)
}

/// Shorthand for [`Angle::from_degrees`].
///
/// ```
/// use celestial_core::angle::deg;
///
/// assert!((deg(45.0).radians() - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
/// ```
#[inline]
pub fn deg(v: f64) -> Angle {
    Angle::from_degrees(v)
}

/// Shorthand for [`Angle::from_arcminutes`].
#[inline]
pub fn arcmin(v: f64) -> Angle {
    Angle::from_arcminutes(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        let a = Angle::from_degrees(1.0);
        assert!((a.arcminutes() - 60.0).abs() < 1e-12);
        assert!((a.arcseconds() - 3600.0).abs() < 1e-9);
        assert!((Angle::from_arcminutes(60.0).degrees() - 1.0).abs() < 1e-15);
        assert!((Angle::from_arcseconds(3600.0).degrees() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_trig() {
        let a = Angle::from_degrees(30.0);
        assert!((a.sin() - 0.5).abs() < 1e-15);
        let (s, c) = a.sin_cos();
        assert!((s - 0.5).abs() < 1e-15);
        assert!((c - 3.0_f64.sqrt() / 2.0).abs() < 1e-15);
        assert!((Angle::from_degrees(45.0).tan() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_wrapping() {
        assert!((Angle::from_degrees(-90.0).normalized().degrees() - 270.0).abs() < 1e-12);
        assert!((Angle::from_degrees(450.0).normalized().degrees() - 90.0).abs() < 1e-12);
        assert!((Angle::from_degrees(-270.0).wrapped().degrees() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{:.2}", Angle::from_degrees(12.5)), "12.50°");
    }

    #[test]
    fn test_shorthands() {
        assert_eq!(rad(PI), Angle::PI);
        assert!((deg(90.0).radians() - HALF_PI).abs() < 1e-15);
        assert!((arcmin(60.0).degrees() - 1.0).abs() < 1e-15);
    }
}
