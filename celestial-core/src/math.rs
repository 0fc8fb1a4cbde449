//! Spherical-geometry kernels shared by the coordinate and map crates.

use crate::constants::HALF_PI;

#[inline]
pub fn fmod(x: f64, y: f64) -> f64 {
    libm::fmod(x, y)
}

/// `asin` with the argument clamped into [-1, 1] to absorb rounding.
#[inline]
pub fn asin_safe(sin_value: f64) -> f64 {
    libm::asin(sin_value.clamp(-1.0, 1.0))
}

/// `acos` with the argument clamped into [-1, 1] to absorb rounding.
#[inline]
pub fn acos_safe(cos_value: f64) -> f64 {
    libm::acos(cos_value.clamp(-1.0, 1.0))
}

/// Angular separation between two points given by the sines and cosines of
/// their latitudes and the longitude difference. Vincenty's formula stays
/// accurate for both tiny and near-antipodal separations.
#[inline]
pub fn vincenty_angular_separation(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_delta_lon, cos_delta_lon) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (cos_lat2 * sin_delta_lon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta_lon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta_lon;

    libm::atan2(num, den)
}

/// Unit vector for a (longitude, latitude) pair in radians.
#[inline]
pub fn lonlat_to_unit(lon: f64, lat: f64) -> [f64; 3] {
    let (sin_lon, cos_lon) = libm::sincos(lon);
    let (sin_lat, cos_lat) = libm::sincos(lat);
    [cos_lon * cos_lat, sin_lon * cos_lat, sin_lat]
}

/// (longitude, latitude) in radians for a vector; longitude in (-π, π].
///
/// The zero vector and the poles map to longitude 0.
#[inline]
pub fn unit_to_lonlat(v: [f64; 3]) -> (f64, f64) {
    let d2 = v[0] * v[0] + v[1] * v[1];
    if d2 == 0.0 {
        let lat = if v[2] > 0.0 {
            HALF_PI
        } else if v[2] < 0.0 {
            -HALF_PI
        } else {
            0.0
        };
        return (0.0, lat);
    }
    (libm::atan2(v[1], v[0]), libm::atan2(v[2], libm::sqrt(d2)))
}

/// `m · v` for a row-major 3x3 matrix.
#[inline]
pub fn rotate(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// `mᵀ · v` for a row-major 3x3 matrix; the inverse rotation when `m` is orthonormal.
#[inline]
pub fn rotate_transposed(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2],
        m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2],
        m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEG_TO_RAD, PI};

    #[test]
    fn test_vincenty_quarter_circle() {
        let sep = vincenty_angular_separation(0.0, 1.0, 0.0, 1.0, HALF_PI);
        assert!((sep - HALF_PI).abs() < 1e-15);
    }

    #[test]
    fn test_vincenty_tiny_separation() {
        let dlat = 1e-9;
        let (s2, c2) = libm::sincos(dlat);
        let sep = vincenty_angular_separation(0.0, 1.0, s2, c2, 0.0);
        assert!((sep - dlat).abs() < 1e-20);
    }

    #[test]
    fn test_unit_vector_roundtrip() {
        let lon = 123.0 * DEG_TO_RAD;
        let lat = -33.0 * DEG_TO_RAD;
        let (l2, b2) = unit_to_lonlat(lonlat_to_unit(lon, lat));
        assert!((l2 - lon).abs() < 1e-14);
        assert!((b2 - lat).abs() < 1e-14);
    }

    #[test]
    fn test_unit_to_lonlat_poles() {
        assert_eq!(unit_to_lonlat([0.0, 0.0, 1.0]), (0.0, HALF_PI));
        assert_eq!(unit_to_lonlat([0.0, 0.0, -2.0]), (0.0, -HALF_PI));
        assert_eq!(unit_to_lonlat([-1.0, 0.0, 0.0]).0, PI);
    }

    #[test]
    fn test_rotate_transposed_inverts_rotation() {
        let (s, c) = libm::sincos(0.3);
        let m = [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]];
        let v = [0.2, -0.5, 0.84];
        let back = rotate_transposed(&m, rotate(&m, v));
        for i in 0..3 {
            assert!((back[i] - v[i]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_safe_inverse_trig() {
        assert_eq!(asin_safe(1.0 + 1e-12), HALF_PI);
        assert_eq!(acos_safe(-1.0 - 1e-12), PI);
    }
}
