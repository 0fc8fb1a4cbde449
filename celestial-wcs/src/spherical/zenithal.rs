//! Zenithal projections: the native pole sits at the reference point and
//! the image plane is tangent (or parallel) to the sphere there.

use celestial_core::constants::{DEG_TO_RAD, HALF_PI, RAD_TO_DEG};

use crate::common::{
    intermediate_to_polar, native_coord_from_radians, pole_native_coord, radial_to_intermediate,
};
use crate::coordinate::{IntermediateCoord, NativeCoord};
use crate::error::{WcsError, WcsResult};

fn polar_or_pole(inter: IntermediateCoord) -> Option<(f64, f64)> {
    intermediate_to_polar(inter.x_rad(), inter.y_rad())
}

pub(crate) fn project_tan(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    let phi = native.phi().radians();
    let theta = native.theta().radians();

    if theta == HALF_PI {
        return Ok(IntermediateCoord::new(0.0, 0.0));
    }
    if theta <= 0.0 {
        return Err(WcsError::singularity("TAN projection undefined at theta <= 0"));
    }
    let (st, ct) = libm::sincos(theta);
    Ok(radial_to_intermediate(ct / st, phi))
}

pub(crate) fn deproject_tan(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    let Some((phi, r_theta)) = polar_or_pole(inter) else {
        return Ok(pole_native_coord());
    };
    Ok(native_coord_from_radians(phi, libm::atan2(1.0, r_theta)))
}

/// Orthographic projection with the slant parameters ξ, η (PV2_1, PV2_2).
pub(crate) fn project_sin(native: NativeCoord, xi: f64, eta: f64) -> WcsResult<IntermediateCoord> {
    let phi = native.phi().radians();
    let theta = native.theta().radians();

    if theta == HALF_PI {
        return Ok(IntermediateCoord::new(0.0, 0.0));
    }

    let (sp, cp) = libm::sincos(phi);
    // Points beyond the limb fold back onto the visible hemisphere.
    let limb = -libm::atan(xi * sp - eta * cp);
    if theta < limb {
        return Err(WcsError::out_of_bounds("SIN projection: point beyond the limb"));
    }

    let (st, ct) = libm::sincos(theta);
    let x = (ct * sp + xi * (1.0 - st)) * RAD_TO_DEG;
    let y = -(ct * cp - eta * (1.0 - st)) * RAD_TO_DEG;
    Ok(IntermediateCoord::new(x, y))
}

pub(crate) fn deproject_sin(inter: IntermediateCoord, xi: f64, eta: f64) -> WcsResult<NativeCoord> {
    let x = inter.x_rad();
    let y = inter.y_rad();

    if x == 0.0 && y == 0.0 {
        return Ok(pole_native_coord());
    }

    let a = xi * xi + eta * eta + 1.0;
    let b = xi * (x - xi) + eta * (y - eta);
    let c = (x - xi) * (x - xi) + (y - eta) * (y - eta) - 1.0;

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return Err(WcsError::out_of_bounds("Point outside SIN projection boundary"));
    }

    let sin_theta = (-b + libm::sqrt(discriminant)) / a;
    if sin_theta.abs() > 1.0 {
        return Err(WcsError::out_of_bounds("Invalid theta in SIN deprojection"));
    }

    let x_adj = x - xi * (1.0 - sin_theta);
    let y_adj = y - eta * (1.0 - sin_theta);
    // (x_adj, y_adj) has length cos θ.
    let theta = libm::atan2(sin_theta, libm::hypot(x_adj, y_adj));
    Ok(native_coord_from_radians(libm::atan2(x_adj, -y_adj), theta))
}

pub(crate) fn project_arc(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    let r_theta = HALF_PI - native.theta().radians();
    Ok(radial_to_intermediate(r_theta, native.phi().radians()))
}

pub(crate) fn deproject_arc(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    let Some((phi, r_theta)) = polar_or_pole(inter) else {
        return Ok(pole_native_coord());
    };
    if r_theta > HALF_PI * 2.0 {
        return Err(WcsError::out_of_bounds("Point outside ARC projection boundary"));
    }
    Ok(native_coord_from_radians(phi, HALF_PI - r_theta))
}

pub(crate) fn project_stg(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    let phi = native.phi().radians();
    let theta = native.theta().radians();

    if theta == HALF_PI {
        return Ok(IntermediateCoord::new(0.0, 0.0));
    }
    let (st, ct) = libm::sincos(theta);
    if 1.0 + st < 1e-15 {
        return Err(WcsError::singularity("STG projection diverges at theta = -90"));
    }
    Ok(radial_to_intermediate(2.0 * ct / (1.0 + st), phi))
}

pub(crate) fn deproject_stg(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    let Some((phi, r_theta)) = polar_or_pole(inter) else {
        return Ok(pole_native_coord());
    };
    let theta = HALF_PI - 2.0 * libm::atan(r_theta / 2.0);
    Ok(native_coord_from_radians(phi, theta))
}

pub(crate) fn project_zea(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    // sqrt(2(1 - sin θ)) written without the cancellation near θ = 90°.
    let r_theta = 2.0 * libm::sin((HALF_PI - native.theta().radians()) / 2.0);
    Ok(radial_to_intermediate(r_theta, native.phi().radians()))
}

pub(crate) fn deproject_zea(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    let Some((phi, r_theta)) = polar_or_pole(inter) else {
        return Ok(pole_native_coord());
    };

    let rho = r_theta / 2.0;
    if rho > 1.0 {
        return Err(WcsError::out_of_bounds("Point outside ZEA projection boundary"));
    }
    Ok(native_coord_from_radians(phi, HALF_PI - 2.0 * libm::asin(rho)))
}

/// Lowest native latitude visible to an AZP camera at distance μ.
fn azp_horizon(mu: f64) -> f64 {
    if mu.abs() > 1.0 {
        libm::asin(-1.0 / mu)
    } else {
        libm::asin(-mu)
    }
}

/// Zenithal perspective with source distance μ (PV2_1) and slant γ in
/// degrees (PV2_2). μ = 0 reduces to TAN.
pub(crate) fn project_azp(
    native: NativeCoord,
    mu: f64,
    gamma_deg: f64,
) -> WcsResult<IntermediateCoord> {
    let phi = native.phi().radians();
    let theta = native.theta().radians();

    if theta == HALF_PI {
        return Ok(IntermediateCoord::new(0.0, 0.0));
    }
    if theta <= azp_horizon(mu) {
        return Err(WcsError::singularity("AZP projection: point behind the horizon"));
    }

    let (st, ct) = libm::sincos(theta);
    let denom = mu + st;
    if denom.abs() < 1e-10 {
        return Err(WcsError::singularity("AZP projection singularity: mu + sin(theta) = 0"));
    }

    if gamma_deg.abs() < 1e-10 {
        return Ok(radial_to_intermediate((mu + 1.0) * ct / denom, phi));
    }

    let (sg, cg) = libm::sincos(gamma_deg * DEG_TO_RAD);
    let (sp, cp) = libm::sincos(phi);
    let denom_full = denom + ct * cp * sg / cg;
    if denom_full.abs() < 1e-10 {
        return Err(WcsError::singularity("AZP slant projection singularity"));
    }

    let r = (mu + 1.0) * ct / denom_full;
    Ok(IntermediateCoord::new(
        r * sp * RAD_TO_DEG,
        -r * cp / cg * RAD_TO_DEG,
    ))
}

pub(crate) fn deproject_azp(
    inter: IntermediateCoord,
    mu: f64,
    gamma_deg: f64,
) -> WcsResult<NativeCoord> {
    let x = inter.x_rad();
    let y = inter.y_rad();

    if x == 0.0 && y == 0.0 {
        return Ok(pole_native_coord());
    }

    let (phi, rho) = if gamma_deg.abs() < 1e-10 {
        (libm::atan2(x, -y), libm::hypot(x, y) / (mu + 1.0))
    } else {
        let (sg, cg) = libm::sincos(gamma_deg * DEG_TO_RAD);
        let denom = (mu + 1.0) + y * sg;
        if denom.abs() < 1e-15 {
            return Err(WcsError::out_of_bounds("Point outside AZP projection boundary"));
        }
        (
            libm::atan2(x, -y * cg),
            libm::hypot(x, y * cg) / denom,
        )
    };

    let s = rho * mu / libm::sqrt(rho * rho + 1.0);
    if s.abs() > 1.0 {
        return Err(WcsError::out_of_bounds("Point outside AZP projection boundary"));
    }
    let theta = libm::atan2(1.0, rho) - libm::asin(s);
    Ok(native_coord_from_radians(phi, theta))
}
