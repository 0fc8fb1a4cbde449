use celestial_core::angle::{wrap_0_2pi, wrap_pm_pi};
use celestial_core::constants::{HALF_PI, RAD_TO_DEG};
use celestial_core::Angle;

use crate::common::native_coord_from_radians;
use crate::coordinate::{CelestialCoord, IntermediateCoord, NativeCoord};
use crate::error::{WcsError, WcsResult};

mod cylindrical;
mod zenithal;

use cylindrical::{deproject_car, deproject_cea, deproject_mer};
use cylindrical::{project_car, project_cea, project_mer};
use zenithal::{deproject_arc, deproject_azp, deproject_sin, deproject_stg};
use zenithal::{deproject_tan, deproject_zea};
use zenithal::{project_arc, project_azp, project_sin, project_stg, project_tan, project_zea};

/// Rotation between native spherical coordinates (φ, θ) and celestial
/// coordinates (α, δ), parameterised by the celestial position of the
/// native pole (αₚ, δₚ) and the native longitude of the celestial pole φₚ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalRotation {
    alpha_p: f64,
    delta_p: f64,
    phi_p: f64,
    sin_delta_p: f64,
    cos_delta_p: f64,
}

impl SphericalRotation {
    pub fn new(alpha_p: Angle, delta_p: Angle, phi_p: Angle) -> Self {
        let (sin_delta_p, cos_delta_p) = delta_p.sin_cos();
        Self {
            alpha_p: alpha_p.radians(),
            delta_p: delta_p.radians(),
            phi_p: phi_p.radians(),
            sin_delta_p,
            cos_delta_p,
        }
    }

    /// LONPOLE default: 0° when the reference latitude is at or above θ₀,
    /// 180° otherwise.
    pub fn default_lonpole(delta_0: Angle, theta_0: Angle) -> Angle {
        if delta_0.radians() >= theta_0.radians() {
            Angle::ZERO
        } else {
            Angle::PI
        }
    }

    /// Builds the rotation that carries the native reference point
    /// (φ₀ = 0, θ₀) onto the celestial reference point (α₀, δ₀).
    pub fn from_crval(
        alpha_0: Angle,
        delta_0: Angle,
        theta_0: Angle,
        lonpole: Option<Angle>,
        latpole: Option<Angle>,
    ) -> WcsResult<Self> {
        let phi_p = lonpole.unwrap_or_else(|| Self::default_lonpole(delta_0, theta_0));
        let latpole_rad = latpole.map_or(HALF_PI, |a| a.radians());

        let sin_delta_0 = delta_0.sin();
        let (sin_theta_0, cos_theta_0) = theta_0.sin_cos();
        let (sin_phi_p, cos_phi_p) = phi_p.sin_cos();

        // Zenithal case: the native pole is the reference point itself.
        let delta_p = if theta_0.radians() == HALF_PI {
            delta_0.radians()
        } else {
            compute_delta_p(
                sin_delta_0,
                sin_theta_0,
                cos_theta_0,
                sin_phi_p,
                cos_phi_p,
                latpole_rad,
            )?
        };

        // Inverts native_to_celestial at the reference point (0, θ₀).
        let alpha_p = if theta_0.radians() == HALF_PI {
            alpha_0.radians()
        } else {
            let (sin_delta_p, cos_delta_p) = libm::sincos(delta_p);
            let x = cos_theta_0 * sin_phi_p;
            let y = sin_theta_0 * cos_delta_p - cos_theta_0 * sin_delta_p * cos_phi_p;
            alpha_0.radians() - libm::atan2(x, y)
        };

        Ok(Self::new(
            Angle::from_radians(wrap_0_2pi(alpha_p)),
            Angle::from_radians(delta_p),
            phi_p,
        ))
    }

    pub fn native_to_celestial(&self, native: NativeCoord) -> CelestialCoord {
        let (sin_theta, cos_theta) = native.theta().sin_cos();
        let (sin_d_phi, cos_d_phi) = libm::sincos(native.phi().radians() - self.phi_p);

        let sin_delta = sin_theta * self.sin_delta_p + cos_theta * self.cos_delta_p * cos_d_phi;
        let x = -cos_theta * sin_d_phi;
        let y = sin_theta * self.cos_delta_p - cos_theta * self.sin_delta_p * cos_d_phi;
        // (x, y) has length cos δ; atan2 keeps full precision near the poles
        // where asin(sin δ) would not.
        let delta = libm::atan2(sin_delta, libm::hypot(x, y));
        let alpha = self.alpha_p + libm::atan2(x, y);

        CelestialCoord::new(
            Angle::from_radians(wrap_0_2pi(alpha)),
            Angle::from_radians(delta),
        )
    }

    pub fn celestial_to_native(&self, celestial: CelestialCoord) -> NativeCoord {
        let (sin_delta, cos_delta) = celestial.delta().sin_cos();
        let (sin_d_alpha, cos_d_alpha) = libm::sincos(celestial.alpha().radians() - self.alpha_p);

        let sin_theta = sin_delta * self.sin_delta_p + cos_delta * self.cos_delta_p * cos_d_alpha;
        let x = -cos_delta * sin_d_alpha;
        let y = sin_delta * self.cos_delta_p - cos_delta * self.sin_delta_p * cos_d_alpha;
        let theta = libm::atan2(sin_theta, libm::hypot(x, y));
        let phi = self.phi_p + libm::atan2(x, y);

        native_coord_from_radians(wrap_pm_pi(phi), theta)
    }

    #[inline]
    pub fn phi_p_degrees(&self) -> f64 {
        self.phi_p * RAD_TO_DEG
    }

    #[inline]
    pub fn delta_p_degrees(&self) -> f64 {
        self.delta_p * RAD_TO_DEG
    }

    #[inline]
    pub fn alpha_p_degrees(&self) -> f64 {
        self.alpha_p * RAD_TO_DEG
    }
}

fn compute_delta_p(
    sin_delta_0: f64,
    sin_theta_0: f64,
    cos_theta_0: f64,
    sin_phi_p: f64,
    cos_phi_p: f64,
    latpole_rad: f64,
) -> WcsResult<f64> {
    let cos_theta_0_sin_phi_p = cos_theta_0 * sin_phi_p;
    let denom_sq = 1.0 - cos_theta_0_sin_phi_p * cos_theta_0_sin_phi_p;

    if denom_sq.abs() < 1e-15 {
        if sin_delta_0.abs() < 1e-15 {
            return Ok(latpole_rad);
        }
        return Err(WcsError::invalid_parameter(
            "no solution for the native pole latitude with this LONPOLE",
        ));
    }

    let arg = sin_delta_0 / libm::sqrt(denom_sq);
    if arg.abs() > 1.0 + 1e-15 {
        return Err(WcsError::invalid_parameter(
            "native pole latitude out of range for this LONPOLE",
        ));
    }

    let acos_term = libm::acos(arg.clamp(-1.0, 1.0));
    let base = libm::atan2(sin_theta_0, cos_theta_0 * cos_phi_p);

    let candidates = [base + acos_term, base - acos_term];
    const BOUNDARY_TOL: f64 = 1e-14;
    let valid = |v: f64| (-HALF_PI - BOUNDARY_TOL..=HALF_PI + BOUNDARY_TOL).contains(&v);

    match (valid(candidates[0]), valid(candidates[1])) {
        (true, false) => Ok(candidates[0].clamp(-HALF_PI, HALF_PI)),
        (false, true) => Ok(candidates[1].clamp(-HALF_PI, HALF_PI)),
        (true, true) => {
            let pick = if (candidates[0] - latpole_rad).abs() <= (candidates[1] - latpole_rad).abs()
            {
                candidates[0]
            } else {
                candidates[1]
            };
            Ok(pick.clamp(-HALF_PI, HALF_PI))
        }
        (false, false) => Err(WcsError::invalid_parameter(
            "no valid native pole latitude in [-90, 90]",
        )),
    }
}

/// Projection family, as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionFamily {
    Zenithal,
    Cylindrical,
}

/// The supported spherical projections. PV2_m parameters are carried as
/// fields; a parameter that keeps its default value is not written back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Tan,
    Sin { xi: f64, eta: f64 },
    Arc,
    Stg,
    Zea,
    Azp { mu: f64, gamma: f64 },
    Car,
    Mer,
    Cea { lambda: f64 },
}

impl Projection {
    pub fn sin() -> Self {
        Self::Sin { xi: 0.0, eta: 0.0 }
    }

    pub fn azp(mu: f64, gamma: f64) -> Self {
        Self::Azp { mu, gamma }
    }

    pub fn cea() -> Self {
        Self::Cea { lambda: 1.0 }
    }

    /// Projection for a three-letter FITS code with default parameters.
    pub fn from_code(code: &str) -> WcsResult<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "TAN" => Ok(Self::Tan),
            "SIN" => Ok(Self::sin()),
            "ARC" => Ok(Self::Arc),
            "STG" => Ok(Self::Stg),
            "ZEA" => Ok(Self::Zea),
            "AZP" => Ok(Self::azp(0.0, 0.0)),
            "CAR" => Ok(Self::Car),
            "MER" => Ok(Self::Mer),
            "CEA" => Ok(Self::cea()),
            _ => Err(WcsError::unsupported_projection(code)),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Tan => "TAN",
            Self::Sin { .. } => "SIN",
            Self::Arc => "ARC",
            Self::Stg => "STG",
            Self::Zea => "ZEA",
            Self::Azp { .. } => "AZP",
            Self::Car => "CAR",
            Self::Mer => "MER",
            Self::Cea { .. } => "CEA",
        }
    }

    pub fn family(&self) -> ProjectionFamily {
        match self {
            Self::Tan
            | Self::Sin { .. }
            | Self::Arc
            | Self::Stg
            | Self::Zea
            | Self::Azp { .. } => ProjectionFamily::Zenithal,
            Self::Car | Self::Mer | Self::Cea { .. } => ProjectionFamily::Cylindrical,
        }
    }

    /// Sets the latitude-axis parameter PV2_`index`.
    pub fn with_pv(self, index: u32, value: f64) -> WcsResult<Self> {
        if !value.is_finite() {
            return Err(WcsError::invalid_parameter(format!(
                "PV2_{} must be finite",
                index
            )));
        }
        match (self, index) {
            (Self::Sin { eta, .. }, 1) => Ok(Self::Sin { xi: value, eta }),
            (Self::Sin { xi, .. }, 2) => Ok(Self::Sin { xi, eta: value }),
            (Self::Azp { gamma, .. }, 1) => Ok(Self::Azp { mu: value, gamma }),
            (Self::Azp { mu, .. }, 2) => Ok(Self::Azp { mu, gamma: value }),
            (Self::Cea { .. }, 1) => {
                if value <= 0.0 || value > 1.0 {
                    return Err(WcsError::invalid_parameter(format!(
                        "CEA lambda must lie in (0, 1], got {}",
                        value
                    )));
                }
                Ok(Self::Cea { lambda: value })
            }
            (proj, _) => Err(WcsError::invalid_keyword(
                format!("PV2_{}", index),
                format!("not a parameter of {}", proj.code()),
            )),
        }
    }

    /// Parameters that differ from their defaults, as (m, value) for PV2_m.
    pub fn pv_params(&self) -> Vec<(u32, f64)> {
        let pairs: Vec<(u32, f64, f64)> = match *self {
            Self::Sin { xi, eta } => vec![(1, xi, 0.0), (2, eta, 0.0)],
            Self::Azp { mu, gamma } => vec![(1, mu, 0.0), (2, gamma, 0.0)],
            Self::Cea { lambda } => vec![(1, lambda, 1.0)],
            _ => Vec::new(),
        };
        pairs
            .into_iter()
            .filter(|(_, value, default)| value != default)
            .map(|(index, value, _)| (index, value))
            .collect()
    }

    /// Native coordinates (φ₀, θ₀) of the reference point, in degrees.
    pub fn native_reference(&self) -> (f64, f64) {
        match self.family() {
            ProjectionFamily::Zenithal => (0.0, 90.0),
            ProjectionFamily::Cylindrical => (0.0, 0.0),
        }
    }

    pub fn project(&self, native: NativeCoord) -> WcsResult<IntermediateCoord> {
        match *self {
            Self::Tan => project_tan(native),
            Self::Sin { xi, eta } => project_sin(native, xi, eta),
            Self::Arc => project_arc(native),
            Self::Stg => project_stg(native),
            Self::Zea => project_zea(native),
            Self::Azp { mu, gamma } => project_azp(native, mu, gamma),
            Self::Car => project_car(native),
            Self::Mer => project_mer(native),
            Self::Cea { lambda } => project_cea(native, lambda),
        }
    }

    pub fn deproject(&self, inter: IntermediateCoord) -> WcsResult<NativeCoord> {
        match *self {
            Self::Tan => deproject_tan(inter),
            Self::Sin { xi, eta } => deproject_sin(inter, xi, eta),
            Self::Arc => deproject_arc(inter),
            Self::Stg => deproject_stg(inter),
            Self::Zea => deproject_zea(inter),
            Self::Azp { mu, gamma } => deproject_azp(inter, mu, gamma),
            Self::Car => deproject_car(inter),
            Self::Mer => deproject_mer(inter),
            Self::Cea { lambda } => deproject_cea(inter, lambda),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use celestial_core::assert_ulp_lt;

    fn deg(phi: f64, theta: f64) -> NativeCoord {
        NativeCoord::new(Angle::from_degrees(phi), Angle::from_degrees(theta))
    }

    #[test]
    fn test_native_pole_maps_to_reference() {
        let rot = SphericalRotation::new(
            Angle::from_degrees(180.0),
            Angle::from_degrees(45.0),
            Angle::from_degrees(180.0),
        );
        let celestial = rot.native_to_celestial(deg(0.0, 90.0));
        assert_ulp_lt!(celestial.alpha().degrees(), 180.0, 1);
        assert_ulp_lt!(celestial.delta().degrees(), 45.0, 2);
    }

    #[test]
    fn test_rotation_roundtrip() {
        let rot = SphericalRotation::new(
            Angle::from_degrees(100.0),
            Angle::from_degrees(-25.0),
            Angle::from_degrees(180.0),
        );
        let original = CelestialCoord::new(Angle::from_degrees(110.0), Angle::from_degrees(-30.0));
        let recovered = rot.native_to_celestial(rot.celestial_to_native(original));
        assert_abs_diff_eq!(original.alpha().degrees(), recovered.alpha().degrees(), epsilon = 1e-10);
        assert_abs_diff_eq!(original.delta().degrees(), recovered.delta().degrees(), epsilon = 1e-10);
    }

    #[test]
    fn test_from_crval_zenithal() {
        let rot = SphericalRotation::from_crval(
            Angle::from_degrees(83.6331),
            Angle::from_degrees(22.0145),
            Angle::from_degrees(90.0),
            None,
            None,
        )
        .unwrap();
        assert_abs_diff_eq!(rot.phi_p_degrees(), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rot.delta_p_degrees(), 22.0145, epsilon = 1e-12);

        let celestial = rot.native_to_celestial(deg(0.0, 90.0));
        assert_abs_diff_eq!(celestial.alpha().degrees(), 83.6331, epsilon = 1e-10);
        assert_abs_diff_eq!(celestial.delta().degrees(), 22.0145, epsilon = 1e-10);
    }

    #[test]
    fn test_from_crval_cylindrical_reference_point() {
        let rot = SphericalRotation::from_crval(
            Angle::from_degrees(266.4),
            Angle::from_degrees(-28.9),
            Angle::ZERO,
            None,
            None,
        )
        .unwrap();
        let celestial = rot.native_to_celestial(deg(0.0, 0.0));
        assert_abs_diff_eq!(celestial.alpha().degrees(), 266.4, epsilon = 1e-9);
        assert_abs_diff_eq!(celestial.delta().degrees(), -28.9, epsilon = 1e-9);

        let back = rot.celestial_to_native(celestial);
        assert_abs_diff_eq!(back.phi().degrees(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.theta().degrees(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_lonpole() {
        let ninety = Angle::from_degrees(90.0);
        assert_eq!(SphericalRotation::default_lonpole(Angle::from_degrees(45.0), ninety), Angle::PI);
        assert_eq!(SphericalRotation::default_lonpole(Angle::from_degrees(45.0), Angle::ZERO), Angle::ZERO);
    }

    #[test]
    fn test_latpole_selects_solution() {
        for latpole in [90.0, -90.0] {
            let rot = SphericalRotation::from_crval(
                Angle::from_degrees(180.0),
                Angle::from_degrees(45.0),
                Angle::ZERO,
                Some(Angle::ZERO),
                Some(Angle::from_degrees(latpole)),
            )
            .unwrap();
            let native = deg(30.0, 30.0);
            let recovered = rot.celestial_to_native(rot.native_to_celestial(native));
            assert_abs_diff_eq!(native.phi().degrees(), recovered.phi().degrees(), epsilon = 1e-10);
            assert_abs_diff_eq!(native.theta().degrees(), recovered.theta().degrees(), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_from_code() {
        for code in ["TAN", "SIN", "ARC", "STG", "ZEA", "AZP", "CAR", "MER", "CEA"] {
            assert_eq!(Projection::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Projection::from_code("tan").unwrap(), Projection::Tan);
        assert!(matches!(
            Projection::from_code("AIT"),
            Err(WcsError::UnsupportedProjection { .. })
        ));
    }

    #[test]
    fn test_pv_params() {
        let azp = Projection::from_code("AZP").unwrap();
        assert!(azp.pv_params().is_empty());

        let azp = azp.with_pv(1, 1.5).unwrap();
        assert_eq!(azp, Projection::azp(1.5, 0.0));
        assert_eq!(azp.pv_params(), vec![(1, 1.5)]);

        let cea = Projection::cea().with_pv(1, 0.5).unwrap();
        assert_eq!(cea.pv_params(), vec![(1, 0.5)]);
        assert!(Projection::cea().with_pv(1, 2.0).is_err());

        assert!(Projection::Tan.with_pv(1, 1.0).is_err());
        assert!(Projection::sin().with_pv(3, 1.0).is_err());
        assert!(Projection::sin().with_pv(1, f64::NAN).is_err());
    }

    #[test]
    fn test_families() {
        assert_eq!(Projection::Tan.family(), ProjectionFamily::Zenithal);
        assert_eq!(Projection::Tan.native_reference(), (0.0, 90.0));
        assert_eq!(Projection::Mer.family(), ProjectionFamily::Cylindrical);
        assert_eq!(Projection::Car.native_reference(), (0.0, 0.0));
    }
}
