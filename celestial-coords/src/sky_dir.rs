//! Directions on the celestial sphere.
//!
//! A [`SkyDir`] is created in one frame (its *authoritative* frame) and can be
//! read back in either. The pair in the other frame is computed on first use
//! through the Galactic rotation matrix and memoized inside the value, so
//! repeated `l()`/`b()` reads on an equatorial direction (or `ra()`/`dec()`
//! on a Galactic one) pay for the rotation once.
//!
//! ```
//! use celestial_coords::SkyDir;
//!
//! let crab = SkyDir::from_equatorial_degrees(83.6331, 22.0145).unwrap();
//! let l = crab.l().degrees();
//! let b = crab.b().degrees();
//! assert!((l - 184.5575).abs() < 1e-3);
//! assert!((b + 5.7843).abs() < 1e-3);
//! ```

use std::fmt;
use std::sync::OnceLock;

use celestial_core::math::{
    lonlat_to_unit, rotate, rotate_transposed, unit_to_lonlat, vincenty_angular_separation,
};
use celestial_core::{angle::wrap_0_2pi, Angle};

use crate::constants::ICRS_TO_GALACTIC;
use crate::{CoordError, CoordResult, CoordSystem};

/// A point on the celestial sphere.
///
/// Longitudes are kept in [0, 2π) and latitudes in [-π/2, π/2].
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SkyDirRepr", into = "SkyDirRepr")
)]
pub struct SkyDir {
    system: CoordSystem,
    lon: f64,
    lat: f64,
    converted: OnceLock<(f64, f64)>,
}

impl SkyDir {
    /// Creates a direction from ICRS right ascension and declination.
    ///
    /// # Errors
    ///
    /// [`CoordError::InvalidCoordinate`] when either angle is not finite or the
    /// declination lies outside [-90°, +90°]. Right ascension is wrapped.
    pub fn from_equatorial(ra: Angle, dec: Angle) -> CoordResult<Self> {
        Self::from_lon_lat(CoordSystem::Equatorial, ra, dec)
    }

    pub fn from_equatorial_degrees(ra_deg: f64, dec_deg: f64) -> CoordResult<Self> {
        Self::from_equatorial(Angle::from_degrees(ra_deg), Angle::from_degrees(dec_deg))
    }

    /// Creates a direction from Galactic longitude and latitude.
    pub fn from_galactic(l: Angle, b: Angle) -> CoordResult<Self> {
        Self::from_lon_lat(CoordSystem::Galactic, l, b)
    }

    pub fn from_galactic_degrees(l_deg: f64, b_deg: f64) -> CoordResult<Self> {
        Self::from_galactic(Angle::from_degrees(l_deg), Angle::from_degrees(b_deg))
    }

    /// Creates a direction in the given frame.
    pub fn from_lon_lat(system: CoordSystem, lon: Angle, lat: Angle) -> CoordResult<Self> {
        let lat = lat.validate_latitude().map_err(|e| {
            CoordError::invalid_coordinate(format!("{} latitude: {}", system, e))
        })?;
        let lon = lon.validate_longitude(true).map_err(|e| {
            CoordError::invalid_coordinate(format!("{} longitude: {}", system, e))
        })?;
        Ok(Self::from_radians_unchecked(system, lon.radians(), lat.radians()))
    }

    /// Creates a direction from a non-zero Cartesian vector in the given frame.
    pub fn from_unit_vector(system: CoordSystem, v: [f64; 3]) -> CoordResult<Self> {
        let norm2 = v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
        if !(norm2.is_finite() && norm2 > 0.0) {
            return Err(CoordError::invalid_coordinate(
                "direction vector must be finite and non-zero",
            ));
        }
        let (lon, lat) = unit_to_lonlat(v);
        Ok(Self::from_radians_unchecked(system, wrap_0_2pi(lon), lat))
    }

    fn from_radians_unchecked(system: CoordSystem, lon: f64, lat: f64) -> Self {
        Self {
            system,
            lon,
            lat,
            converted: OnceLock::new(),
        }
    }

    /// Frame the direction was created in.
    #[inline]
    pub fn system(&self) -> CoordSystem {
        self.system
    }

    pub fn ra(&self) -> Angle {
        self.lon_lat(CoordSystem::Equatorial).0
    }

    pub fn dec(&self) -> Angle {
        self.lon_lat(CoordSystem::Equatorial).1
    }

    pub fn l(&self) -> Angle {
        self.lon_lat(CoordSystem::Galactic).0
    }

    pub fn b(&self) -> Angle {
        self.lon_lat(CoordSystem::Galactic).1
    }

    /// Longitude and latitude in the requested frame.
    pub fn lon_lat(&self, system: CoordSystem) -> (Angle, Angle) {
        let (lon, lat) = self.lon_lat_radians(system);
        (Angle::from_radians(lon), Angle::from_radians(lat))
    }

    /// Longitude and latitude in degrees in the requested frame.
    pub fn lon_lat_degrees(&self, system: CoordSystem) -> (f64, f64) {
        let (lon, lat) = self.lon_lat(system);
        (lon.degrees(), lat.degrees())
    }

    fn lon_lat_radians(&self, system: CoordSystem) -> (f64, f64) {
        if system == self.system {
            return (self.lon, self.lat);
        }
        *self
            .converted
            .get_or_init(|| convert(self.system, self.lon, self.lat))
    }

    /// Cartesian unit vector in the requested frame.
    pub fn unit_vector(&self, system: CoordSystem) -> [f64; 3] {
        let (lon, lat) = self.lon_lat_radians(system);
        lonlat_to_unit(lon, lat)
    }

    /// Same direction with `system` as the authoritative frame.
    pub fn to_system(&self, system: CoordSystem) -> SkyDir {
        if system == self.system {
            return self.clone();
        }
        let (lon, lat) = self.lon_lat_radians(system);
        let dir = Self::from_radians_unchecked(system, lon, lat);
        let _ = dir.converted.set((self.lon, self.lat));
        dir
    }

    /// Great-circle distance to `other`.
    pub fn angular_distance(&self, other: &SkyDir) -> Angle {
        let (lon1, lat1) = self.lon_lat_radians(self.system);
        let (lon2, lat2) = other.lon_lat_radians(self.system);
        let (sin_lat1, cos_lat1) = libm::sincos(lat1);
        let (sin_lat2, cos_lat2) = libm::sincos(lat2);
        Angle::from_radians(vincenty_angular_separation(
            sin_lat1,
            cos_lat1,
            sin_lat2,
            cos_lat2,
            lon2 - lon1,
        ))
    }

    /// Position angle of `other` measured from north through east, in the
    /// frame of `self`.
    pub fn position_angle(&self, other: &SkyDir) -> Angle {
        let (lon1, lat1) = self.lon_lat_radians(self.system);
        let (lon2, lat2) = other.lon_lat_radians(self.system);
        let (sin_dlon, cos_dlon) = libm::sincos(lon2 - lon1);
        let (sin_lat1, cos_lat1) = libm::sincos(lat1);
        let (sin_lat2, cos_lat2) = libm::sincos(lat2);
        let y = sin_dlon * cos_lat2;
        let x = cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon;
        Angle::from_radians(wrap_0_2pi(libm::atan2(y, x)))
    }
}

fn convert(from: CoordSystem, lon: f64, lat: f64) -> (f64, f64) {
    let v = lonlat_to_unit(lon, lat);
    let rotated = match from {
        CoordSystem::Equatorial => rotate(&ICRS_TO_GALACTIC, v),
        CoordSystem::Galactic => rotate_transposed(&ICRS_TO_GALACTIC, v),
    };
    let (lon, lat) = unit_to_lonlat(rotated);
    (wrap_0_2pi(lon), lat)
}

/// Two directions are equal when they were created in the same frame with
/// identical coordinates. Use [`SkyDir::angular_distance`] for tolerance checks.
impl PartialEq for SkyDir {
    fn eq(&self, other: &Self) -> bool {
        self.system == other.system && self.lon == other.lon && self.lat == other.lat
    }
}

impl fmt::Display for SkyDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lon, lat) = (self.lon.to_degrees(), self.lat.to_degrees());
        match self.system {
            CoordSystem::Equatorial => write!(f, "(RA,Dec)=({:.6},{:.6})", lon, lat),
            CoordSystem::Galactic => write!(f, "(l,b)=({:.6},{:.6})", lon, lat),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SkyDirRepr {
    system: CoordSystem,
    lon_deg: f64,
    lat_deg: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<SkyDirRepr> for SkyDir {
    type Error = CoordError;

    fn try_from(repr: SkyDirRepr) -> Result<Self, Self::Error> {
        Self::from_lon_lat(
            repr.system,
            Angle::from_degrees(repr.lon_deg),
            Angle::from_degrees(repr.lat_deg),
        )
    }
}

#[cfg(feature = "serde")]
impl From<SkyDir> for SkyDirRepr {
    fn from(dir: SkyDir) -> Self {
        Self {
            system: dir.system,
            lon_deg: dir.lon.to_degrees(),
            lat_deg: dir.lat.to_degrees(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use celestial_core::constants::HALF_PI;

    #[test]
    fn test_galactic_center() {
        let gc = SkyDir::from_galactic_degrees(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(gc.ra().degrees(), 266.40499, epsilon = 1e-4);
        assert_abs_diff_eq!(gc.dec().degrees(), -28.93617, epsilon = 1e-4);
    }

    #[test]
    fn test_north_galactic_pole() {
        let ngp = SkyDir::from_equatorial_degrees(192.85948, 27.12825).unwrap();
        assert_abs_diff_eq!(ngp.b().degrees(), 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_equatorial_roundtrip() {
        for &(ra, dec) in &[(1.0, 0.0), (83.6331, 22.0145), (266.4, -28.9), (359.9, -89.0), (10.0, 89.0)] {
            let dir = SkyDir::from_equatorial_degrees(ra, dec).unwrap();
            let back = SkyDir::from_galactic(dir.l(), dir.b()).unwrap();
            assert_abs_diff_eq!(back.ra().radians(), dir.ra().radians(), epsilon = 1e-9);
            assert_abs_diff_eq!(back.dec().radians(), dir.dec().radians(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_galactic_roundtrip() {
        for &(l, b) in &[(1.0, 0.0), (184.5575, -5.7843), (90.0, 45.0), (300.0, -60.0)] {
            let dir = SkyDir::from_galactic_degrees(l, b).unwrap();
            let back = SkyDir::from_equatorial(dir.ra(), dir.dec()).unwrap();
            assert_abs_diff_eq!(back.l().radians(), dir.l().radians(), epsilon = 1e-9);
            assert_abs_diff_eq!(back.b().radians(), dir.b().radians(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_longitude_wrapped() {
        let dir = SkyDir::from_equatorial_degrees(-10.0, 5.0).unwrap();
        assert_abs_diff_eq!(dir.ra().degrees(), 350.0, epsilon = 1e-12);
        let dir = SkyDir::from_galactic_degrees(725.0, 5.0).unwrap();
        assert_abs_diff_eq!(dir.l().degrees(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(matches!(
            SkyDir::from_equatorial_degrees(10.0, 90.5),
            Err(CoordError::InvalidCoordinate { .. })
        ));
        assert!(SkyDir::from_galactic_degrees(f64::NAN, 0.0).is_err());
        assert!(SkyDir::from_equatorial(Angle::ZERO, Angle::from_radians(HALF_PI)).is_ok());
    }

    #[test]
    fn test_memoized_conversion_is_stable() {
        let dir = SkyDir::from_equatorial_degrees(10.0, 20.0).unwrap();
        let first = dir.l();
        let clone = dir.clone();
        assert_eq!(first, dir.l());
        assert_eq!(first, clone.l());
    }

    #[test]
    fn test_angular_distance_across_frames() {
        let a = SkyDir::from_equatorial_degrees(83.6331, 22.0145).unwrap();
        let b = SkyDir::from_equatorial_degrees(84.6331, 22.0145).unwrap();
        let b_gal = b.to_system(CoordSystem::Galactic);
        let d1 = a.angular_distance(&b).degrees();
        let d2 = a.angular_distance(&b_gal).degrees();
        assert_abs_diff_eq!(d1, 1.0 * 22.0145_f64.to_radians().cos(), epsilon = 1e-4);
        assert_abs_diff_eq!(d1, d2, epsilon = 1e-10);
    }

    #[test]
    fn test_to_system_preserves_direction() {
        let a = SkyDir::from_equatorial_degrees(120.0, -40.0).unwrap();
        let g = a.to_system(CoordSystem::Galactic);
        assert_eq!(g.system(), CoordSystem::Galactic);
        assert_eq!(g.ra(), a.ra());
        assert_eq!(g.dec(), a.dec());
    }

    #[test]
    fn test_position_angle_north_and_east() {
        let a = SkyDir::from_equatorial_degrees(10.0, 0.0).unwrap();
        let north = SkyDir::from_equatorial_degrees(10.0, 1.0).unwrap();
        let east = SkyDir::from_equatorial_degrees(11.0, 0.0).unwrap();
        assert_abs_diff_eq!(a.position_angle(&north).degrees(), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(a.position_angle(&east).degrees(), 90.0, epsilon = 1e-10);
    }

    #[test]
    fn test_unit_vector_and_back() {
        let a = SkyDir::from_galactic_degrees(45.0, 30.0).unwrap();
        let v = a.unit_vector(CoordSystem::Equatorial);
        let b = SkyDir::from_unit_vector(CoordSystem::Equatorial, v).unwrap();
        assert!(a.angular_distance(&b).radians() < 1e-12);
        assert!(SkyDir::from_unit_vector(CoordSystem::Galactic, [0.0; 3]).is_err());
    }

    #[test]
    fn test_display() {
        let a = SkyDir::from_galactic_degrees(1.5, -2.25).unwrap();
        assert_eq!(a.to_string(), "(l,b)=(1.500000,-2.250000)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let a = SkyDir::from_galactic_degrees(12.0, -3.0).unwrap();
        let text = serde_json::to_string(&a).unwrap();
        let back: SkyDir = serde_json::from_str(&text).unwrap();
        assert!(a.angular_distance(&back).radians() < 1e-12);
        let bad = r#"{"system":"equatorial","lon_deg":0.0,"lat_deg":120.0}"#;
        assert!(serde_json::from_str::<SkyDir>(bad).is_err());
    }
}
