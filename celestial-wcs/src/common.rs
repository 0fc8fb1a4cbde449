use celestial_core::angle::wrap_pm_pi;
use celestial_core::constants::{HALF_PI, RAD_TO_DEG};
use celestial_core::Angle;

use crate::coordinate::{IntermediateCoord, NativeCoord};

#[inline]
pub(crate) fn pole_native_coord() -> NativeCoord {
    NativeCoord::new(Angle::ZERO, Angle::HALF_PI)
}

/// Zenithal (R_θ, φ) to intermediate (x, y) in degrees: x = R sinφ, y = −R cosφ.
#[inline]
pub(crate) fn radial_to_intermediate(r_theta: f64, phi_rad: f64) -> IntermediateCoord {
    let (ps, pc) = libm::sincos(phi_rad);
    IntermediateCoord::new(r_theta * ps * RAD_TO_DEG, -r_theta * pc * RAD_TO_DEG)
}

/// Intermediate (x, y) in radians to (φ, R_θ). `None` at the origin, where φ
/// is undefined and the point is the native pole.
#[inline]
pub(crate) fn intermediate_to_polar(x_rad: f64, y_rad: f64) -> Option<(f64, f64)> {
    let r_theta = libm::hypot(x_rad, y_rad);
    if r_theta == 0.0 {
        None
    } else {
        Some((libm::atan2(x_rad, -y_rad), r_theta))
    }
}

/// Native coordinate from radians, with φ wrapped into [-π, π) and θ clamped.
#[inline]
pub(crate) fn native_coord_from_radians(phi_rad: f64, theta_rad: f64) -> NativeCoord {
    NativeCoord::new(
        Angle::from_radians(wrap_pm_pi(phi_rad)),
        Angle::from_radians(theta_rad.clamp(-HALF_PI, HALF_PI)),
    )
}
