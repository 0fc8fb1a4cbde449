//! Range reduction for angles in radians.
//!
//! | Quantity | Range | Function |
//! |----------|-------|----------|
//! | Right ascension, Galactic longitude | [0, 2π) | [`wrap_0_2pi`] |
//! | Native longitude, longitude differences | [-π, π) | [`wrap_pm_pi`] |
//! | Declination, Galactic latitude | [-π/2, π/2] | [`clamp_lat`] |
//!
//! Wrapping keeps the direction on the sphere; clamping saturates at the poles.
//! Both wrapping functions go through [`crate::math::fmod`], which keeps the sign
//! of the dividend, and then shift into the target range.

use crate::constants::{HALF_PI, PI, TWOPI};
use crate::math::fmod;

/// Wraps `x` into [-π, π).
///
/// ```
/// use celestial_core::angle::wrap_pm_pi;
/// use std::f64::consts::PI;
///
/// assert!((wrap_pm_pi(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
/// ```
#[inline]
pub fn wrap_pm_pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    if w >= PI {
        w - TWOPI
    } else if w < -PI {
        w + TWOPI
    } else {
        w
    }
}

/// Wraps `x` into [0, 2π).
///
/// ```
/// use celestial_core::angle::wrap_0_2pi;
/// use std::f64::consts::PI;
///
/// assert!((wrap_0_2pi(-0.5 * PI) - 1.5 * PI).abs() < 1e-12);
/// ```
#[inline]
pub fn wrap_0_2pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    let w = if w < 0.0 { w + TWOPI } else { w };
    // -tiny + 2π rounds to 2π
    if w >= TWOPI {
        0.0
    } else {
        w
    }
}

/// Clamps `x` into [-π/2, π/2].
#[inline]
pub fn clamp_lat(x: f64) -> f64 {
    x.clamp(-HALF_PI, HALF_PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_pm_pi() {
        assert_eq!(wrap_pm_pi(1.0), 1.0);
        assert!((wrap_pm_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-15);
        assert!((wrap_pm_pi(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-15);
        assert_eq!(wrap_pm_pi(PI), -PI);
        assert_eq!(wrap_pm_pi(-PI), -PI);
    }

    #[test]
    fn test_wrap_0_2pi() {
        assert_eq!(wrap_0_2pi(1.0), 1.0);
        assert!((wrap_0_2pi(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-15);
        assert!((wrap_0_2pi(3.0 * PI) - PI).abs() < 1e-15);
        assert_eq!(wrap_0_2pi(TWOPI), 0.0);
        assert_eq!(wrap_0_2pi(-1e-300), 0.0);
    }

    #[test]
    fn test_clamp_lat() {
        assert_eq!(clamp_lat(0.5), 0.5);
        assert_eq!(clamp_lat(2.0), HALF_PI);
        assert_eq!(clamp_lat(-2.0), -HALF_PI);
    }
}
