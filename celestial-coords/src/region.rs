//! Circular sky regions and their DS9 text form.
//!
//! A region line looks like `fk5;circle(83.633100,22.014500,0.200000)` or
//! `galactic;circle(184.557500,-5.784300,0.500000)`. The radius is in degrees
//! unless suffixed with `'` (arcminutes) or `"` (arcseconds).

use std::fmt;
use std::str::FromStr;

use celestial_core::constants::{PI, TWOPI};
use celestial_core::Angle;

use crate::{CoordError, CoordResult, CoordSystem, SkyDir};

#[derive(Debug, Clone, PartialEq)]
pub struct SkyRegionCircle {
    centre: SkyDir,
    radius: Angle,
}

impl SkyRegionCircle {
    /// Creates a circle of `radius_deg` degrees around `centre`.
    ///
    /// # Errors
    ///
    /// [`CoordError::InvalidRegion`] when the radius is negative, not finite or
    /// larger than 180°.
    pub fn new(centre: SkyDir, radius_deg: f64) -> CoordResult<Self> {
        if !radius_deg.is_finite() || !(0.0..=180.0).contains(&radius_deg) {
            return Err(CoordError::invalid_region(format!(
                "radius {} deg outside [0, 180]",
                radius_deg
            )));
        }
        Ok(Self {
            centre,
            radius: Angle::from_degrees(radius_deg),
        })
    }

    #[inline]
    pub fn centre(&self) -> &SkyDir {
        &self.centre
    }

    #[inline]
    pub fn radius(&self) -> Angle {
        self.radius
    }

    /// Solid angle in steradians, 2π(1 − cos r).
    pub fn solid_angle(&self) -> f64 {
        if self.radius.radians() >= PI {
            return 2.0 * TWOPI;
        }
        TWOPI * (1.0 - self.radius.cos())
    }

    pub fn contains(&self, dir: &SkyDir) -> bool {
        self.centre.angular_distance(dir).radians() <= self.radius.radians()
    }

    /// True when `other` lies entirely inside this circle.
    pub fn contains_region(&self, other: &SkyRegionCircle) -> bool {
        let distance = self.centre.angular_distance(&other.centre).radians();
        distance + other.radius.radians() <= self.radius.radians()
    }

    pub fn overlaps(&self, other: &SkyRegionCircle) -> bool {
        let distance = self.centre.angular_distance(&other.centre).radians();
        distance <= self.radius.radians() + other.radius.radians()
    }

    /// DS9 region string in the frame of the centre.
    pub fn to_ds9(&self) -> String {
        let system = self.centre.system();
        let (lon, lat) = self.centre.lon_lat_degrees(system);
        format!(
            "{};circle({:.6},{:.6},{:.6})",
            system.ds9_frame(),
            lon,
            lat,
            self.radius.degrees()
        )
    }

    /// Parses a single DS9 circle region.
    ///
    /// Frames `fk5`, `icrs` and `galactic` are understood; anything after a
    /// `#` is ignored.
    pub fn from_ds9(line: &str) -> CoordResult<Self> {
        let line = line.split('#').next().unwrap_or("").trim();
        let (frame, shape) = line
            .split_once(';')
            .ok_or_else(|| CoordError::parsing_error(format!("missing frame in '{}'", line)))?;

        let system = match frame.trim().to_ascii_lowercase().as_str() {
            "fk5" | "icrs" | "j2000" => CoordSystem::Equatorial,
            "galactic" => CoordSystem::Galactic,
            other => {
                return Err(CoordError::parsing_error(format!(
                    "unsupported region frame '{}'",
                    other
                )))
            }
        };

        let args = shape
            .trim()
            .strip_prefix("circle(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| {
                CoordError::parsing_error(format!("expected circle(lon,lat,radius) in '{}'", shape))
            })?;

        let fields: Vec<&str> = args.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(CoordError::parsing_error(format!(
                "circle needs 3 arguments, got {}",
                fields.len()
            )));
        }

        let lon = parse_number(fields[0])?;
        let lat = parse_number(fields[1])?;
        let radius = parse_radius(fields[2])?;

        let centre = SkyDir::from_lon_lat(system, Angle::from_degrees(lon), Angle::from_degrees(lat))?;
        Self::new(centre, radius)
    }
}

fn parse_number(text: &str) -> CoordResult<f64> {
    text.parse::<f64>()
        .map_err(|_| CoordError::parsing_error(format!("invalid number '{}'", text)))
}

fn parse_radius(text: &str) -> CoordResult<f64> {
    if let Some(v) = text.strip_suffix('"') {
        Ok(parse_number(v)? / 3600.0)
    } else if let Some(v) = text.strip_suffix('\'') {
        Ok(parse_number(v)? / 60.0)
    } else if let Some(v) = text.strip_suffix('d') {
        parse_number(v)
    } else {
        parse_number(text)
    }
}

impl fmt::Display for SkyRegionCircle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ds9())
    }
}

impl FromStr for SkyRegionCircle {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ds9(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn crab() -> SkyDir {
        SkyDir::from_equatorial_degrees(83.6331, 22.0145).unwrap()
    }

    #[test]
    fn test_contains() {
        let region = SkyRegionCircle::new(crab(), 1.0).unwrap();
        assert!(region.contains(&SkyDir::from_equatorial_degrees(83.6331, 22.9).unwrap()));
        assert!(!region.contains(&SkyDir::from_equatorial_degrees(83.6331, 23.1).unwrap()));
    }

    #[test]
    fn test_contains_in_other_frame() {
        let region = SkyRegionCircle::new(crab(), 0.1).unwrap();
        let crab_gal = crab().to_system(CoordSystem::Galactic);
        assert!(region.contains(&crab_gal));
    }

    #[test]
    fn test_region_relations() {
        let big = SkyRegionCircle::new(crab(), 2.0).unwrap();
        let small = SkyRegionCircle::new(
            SkyDir::from_equatorial_degrees(83.6331, 22.5145).unwrap(),
            0.5,
        )
        .unwrap();
        let far = SkyRegionCircle::new(
            SkyDir::from_equatorial_degrees(83.6331, 30.0).unwrap(),
            1.0,
        )
        .unwrap();
        assert!(big.contains_region(&small));
        assert!(!small.contains_region(&big));
        assert!(big.overlaps(&small));
        assert!(!big.overlaps(&far));
    }

    #[test]
    fn test_solid_angle() {
        let hemisphere = SkyRegionCircle::new(crab(), 90.0).unwrap();
        assert_abs_diff_eq!(hemisphere.solid_angle(), TWOPI, epsilon = 1e-12);
        let sky = SkyRegionCircle::new(crab(), 180.0).unwrap();
        assert_abs_diff_eq!(sky.solid_angle(), 2.0 * TWOPI, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_radius() {
        assert!(SkyRegionCircle::new(crab(), -0.1).is_err());
        assert!(SkyRegionCircle::new(crab(), 180.5).is_err());
        assert!(SkyRegionCircle::new(crab(), f64::NAN).is_err());
    }

    #[test]
    fn test_ds9_write_read() {
        let region = SkyRegionCircle::new(crab(), 0.2).unwrap();
        let text = region.to_ds9();
        assert_eq!(text, "fk5;circle(83.633100,22.014500,0.200000)");
        let back: SkyRegionCircle = text.parse().unwrap();
        assert!(back.centre().angular_distance(&crab()).degrees() < 1e-6);
        assert_abs_diff_eq!(back.radius().degrees(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_ds9_galactic_with_units() {
        let region = SkyRegionCircle::from_ds9("galactic; circle(184.5575, -5.7843, 30') # crab").unwrap();
        assert_eq!(region.centre().system(), CoordSystem::Galactic);
        assert_abs_diff_eq!(region.radius().degrees(), 0.5, epsilon = 1e-12);

        let region = SkyRegionCircle::from_ds9("icrs;circle(10,20,36\")").unwrap();
        assert_abs_diff_eq!(region.radius().degrees(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_ds9_errors() {
        assert!(SkyRegionCircle::from_ds9("circle(1,2,3)").is_err());
        assert!(SkyRegionCircle::from_ds9("ecliptic;circle(1,2,3)").is_err());
        assert!(SkyRegionCircle::from_ds9("fk5;box(1,2,3,4)").is_err());
        assert!(SkyRegionCircle::from_ds9("fk5;circle(1,2)").is_err());
        assert!(SkyRegionCircle::from_ds9("fk5;circle(1,x,3)").is_err());
        assert!(SkyRegionCircle::from_ds9("fk5;circle(1,95,3)").is_err());
    }
}
