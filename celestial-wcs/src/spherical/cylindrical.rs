//! Cylindrical projections: the reference point sits on the native equator
//! and x is proportional to native longitude.

use celestial_core::constants::{HALF_PI, QUARTER_PI, RAD_TO_DEG};
use celestial_core::Angle;

use crate::common::native_coord_from_radians;
use crate::coordinate::{IntermediateCoord, NativeCoord};
use crate::error::{WcsError, WcsResult};

pub(crate) fn project_car(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    Ok(IntermediateCoord::new(
        native.phi().degrees(),
        native.theta().degrees(),
    ))
}

pub(crate) fn deproject_car(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    if inter.y_deg().abs() > 90.0 {
        return Err(WcsError::out_of_bounds("CAR deprojection: |y| > 90"));
    }
    Ok(NativeCoord::new(
        Angle::from_degrees(inter.x_deg()),
        Angle::from_degrees(inter.y_deg()),
    ))
}

pub(crate) fn project_mer(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    let theta = native.theta().radians();

    if theta.abs() >= HALF_PI - 1e-10 {
        return Err(WcsError::singularity("MER projection undefined at theta = +/-90"));
    }

    let y = libm::log(libm::tan(QUARTER_PI + theta / 2.0)) * RAD_TO_DEG;
    Ok(IntermediateCoord::new(native.phi().degrees(), y))
}

pub(crate) fn deproject_mer(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    let theta = 2.0 * libm::atan(libm::exp(inter.y_rad())) - HALF_PI;
    Ok(NativeCoord::new(
        Angle::from_degrees(inter.x_deg()),
        Angle::from_radians(theta),
    ))
}

/// Lambert cylindrical equal-area, y = sin θ / λ (λ is PV2_1).
pub(crate) fn project_cea(native: NativeCoord, lambda: f64) -> WcsResult<IntermediateCoord> {
    let y = native.theta().sin() / lambda * RAD_TO_DEG;
    Ok(IntermediateCoord::new(native.phi().degrees(), y))
}

pub(crate) fn deproject_cea(inter: IntermediateCoord, lambda: f64) -> WcsResult<NativeCoord> {
    let sin_theta = lambda * inter.y_rad();
    if sin_theta.abs() > 1.0 {
        return Err(WcsError::out_of_bounds("CEA deprojection: |lambda * y| > 1"));
    }
    Ok(native_coord_from_radians(
        inter.x_rad(),
        libm::asin(sin_theta),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Projection;
    use approx::assert_abs_diff_eq;

    fn native(phi_deg: f64, theta_deg: f64) -> NativeCoord {
        NativeCoord::new(Angle::from_degrees(phi_deg), Angle::from_degrees(theta_deg))
    }

    #[test]
    fn test_reference_point_maps_to_origin() {
        for proj in [Projection::Car, Projection::Mer, Projection::cea()] {
            let inter = proj.project(native(0.0, 0.0)).unwrap();
            assert_eq!(inter.x_deg(), 0.0);
            assert_abs_diff_eq!(inter.y_deg(), 0.0, epsilon = 1e-12);
            assert_eq!(proj.native_reference(), (0.0, 0.0));
        }
    }

    #[test]
    fn test_car_is_identity() {
        let inter = Projection::Car.project(native(90.0, 45.0)).unwrap();
        assert_eq!(inter.x_deg(), 90.0);
        assert_eq!(inter.y_deg(), 45.0);
        assert!(Projection::Car
            .deproject(IntermediateCoord::new(0.0, 95.0))
            .is_err());
    }

    #[test]
    fn test_roundtrip_grid() {
        for proj in [Projection::Car, Projection::Mer, Projection::cea(), Projection::Cea { lambda: 0.5 }] {
            for phi in [-150.0, -90.0, 0.0, 45.0, 135.0] {
                for theta in [-80.0, -45.0, 0.0, 45.0, 80.0] {
                    let original = native(phi, theta);
                    let recovered = proj.deproject(proj.project(original).unwrap()).unwrap();
                    assert_abs_diff_eq!(original.phi().degrees(), recovered.phi().degrees(), epsilon = 1e-9);
                    assert_abs_diff_eq!(original.theta().degrees(), recovered.theta().degrees(), epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_mer_known_value() {
        let inter = Projection::Mer.project(native(0.0, 45.0)).unwrap();
        let expected = libm::log(libm::tan(QUARTER_PI + QUARTER_PI / 2.0)) * RAD_TO_DEG;
        assert_abs_diff_eq!(inter.y_deg(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_mer_poles_are_singular() {
        assert!(Projection::Mer.project(native(0.0, 90.0)).is_err());
        assert!(Projection::Mer.project(native(0.0, -90.0)).is_err());
    }

    #[test]
    fn test_cea_known_value_and_bounds() {
        let inter = Projection::cea().project(native(90.0, 30.0)).unwrap();
        assert_eq!(inter.x_deg(), 90.0);
        assert_abs_diff_eq!(inter.y_deg(), 0.5 * RAD_TO_DEG, epsilon = 1e-9);

        let err = Projection::cea()
            .deproject(IntermediateCoord::new(0.0, 60.0))
            .unwrap_err();
        assert!(err.is_outside_projection());
    }
}
