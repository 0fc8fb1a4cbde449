use super::core::Angle;
use crate::constants::{HALF_PI, PI};
use crate::{AstroError, MathErrorKind};

/// Checks that a latitude is finite and within [-90°, +90°].
pub fn validate_latitude(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_latitude",
            MathErrorKind::NotFinite,
            "latitude not finite",
        ));
    }

    if (-HALF_PI..=HALF_PI).contains(&rad) {
        return Ok(angle);
    }

    Err(AstroError::math_error(
        "validate_latitude",
        MathErrorKind::OutOfRange,
        &format!("latitude {:.6}° out of range [-90°, +90°]", angle.degrees()),
    ))
}

/// Checks that a longitude is finite; wraps it into [0, 2π) when `normalize`
/// is set, otherwise requires [-π, π].
pub fn validate_longitude(angle: Angle, normalize: bool) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_longitude",
            MathErrorKind::NotFinite,
            "longitude not finite",
        ));
    }

    if normalize {
        return Ok(Angle::from_radians(super::normalize::wrap_0_2pi(rad)));
    }

    if (-PI..=PI).contains(&rad) {
        return Ok(angle);
    }

    Err(AstroError::math_error(
        "validate_longitude",
        MathErrorKind::OutOfRange,
        &format!("longitude {:.6}° out of range [-180°, +180°]", angle.degrees()),
    ))
}
