//! HEALPix equal-area tessellation of the sphere (Górski et al. 2005).
//!
//! Pixels are addressed either in ring order (iso-latitude rings from the
//! north pole) or in nested order (a Z-order curve inside each of the 12
//! base faces). Both orderings go through the face representation
//! `(ix, iy, face)` for index conversion.

use std::fmt;
use std::str::FromStr;

use celestial_coords::{CoordSystem, SkyDir};
use celestial_core::constants::{FOUR_PI_SR, HALF_PI, QUARTER_PI, TWOPI};
use celestial_core::math::asin_safe;
use celestial_core::Angle;

use crate::error::{SkymapError, SkymapResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest tessellation order whose indices fit the 64-bit arithmetic.
pub const MAX_ORDER: u32 = 29;

/// Ring index of each base face's southernmost corner, in units of nside.
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
/// Longitude of each base face's centre, in units of π/4.
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum HealpixOrdering {
    #[default]
    Ring,
    #[cfg_attr(feature = "serde", serde(alias = "NEST"))]
    Nested,
}

impl HealpixOrdering {
    /// Value of the FITS `ORDERING` keyword.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ring => "RING",
            Self::Nested => "NESTED",
        }
    }

    pub fn from_name(name: &str) -> SkymapResult<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "RING" => Ok(Self::Ring),
            "NESTED" | "NEST" => Ok(Self::Nested),
            _ => Err(SkymapError::invalid_parameter(format!(
                "unknown HEALPix ordering '{}'",
                name
            ))),
        }
    }
}

impl fmt::Display for HealpixOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HealpixOrdering {
    type Err = SkymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// A HEALPix tessellation of fixed resolution and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealpixGrid {
    order: u32,
    nside: i64,
    npface: i64,
    ncap: i64,
    npix: i64,
    ordering: HealpixOrdering,
}

impl HealpixGrid {
    /// Grid with `nside = 2^order`.
    pub fn from_order(order: u32, ordering: HealpixOrdering) -> SkymapResult<Self> {
        if order > MAX_ORDER {
            return Err(SkymapError::invalid_parameter(format!(
                "HEALPix order {} above maximum {}",
                order, MAX_ORDER
            )));
        }
        let nside = 1i64 << order;
        let npface = nside * nside;
        Ok(Self {
            order,
            nside,
            npface,
            ncap: 2 * nside * (nside - 1),
            npix: 12 * npface,
            ordering,
        })
    }

    pub fn from_nside(nside: u64, ordering: HealpixOrdering) -> SkymapResult<Self> {
        if nside == 0 || !nside.is_power_of_two() {
            return Err(SkymapError::invalid_parameter(format!(
                "nside {} is not a positive power of two",
                nside
            )));
        }
        Self::from_order(nside.trailing_zeros(), ordering)
    }

    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[inline]
    pub fn nside(&self) -> u64 {
        self.nside as u64
    }

    #[inline]
    pub fn npix(&self) -> u64 {
        self.npix as u64
    }

    #[inline]
    pub fn ordering(&self) -> HealpixOrdering {
        self.ordering
    }

    /// Solid angle of every pixel, steradians.
    #[inline]
    pub fn pixel_solid_angle(&self) -> f64 {
        FOUR_PI_SR / self.npix as f64
    }

    /// Centre of `pixel`, in `system`.
    pub fn pix2dir(&self, pixel: u64, system: CoordSystem) -> SkymapResult<SkyDir> {
        let pix = self.check_pixel(pixel)?;
        let (z, phi) = match self.ordering {
            HealpixOrdering::Ring => self.ring_centre(pix),
            HealpixOrdering::Nested => self.nested_centre(pix),
        };
        let lat = Angle::from_radians(asin_safe(z));
        Ok(SkyDir::from_lon_lat(system, Angle::from_radians(phi), lat)?)
    }

    /// Pixel containing `dir`, which may be given in any frame.
    pub fn dir2pix(&self, dir: &SkyDir, system: CoordSystem) -> u64 {
        let (lon, lat) = dir.lon_lat(system);
        let z = lat.sin();
        let tt = (lon.radians() / HALF_PI).rem_euclid(4.0);
        let pix = match self.ordering {
            HealpixOrdering::Ring => self.ring_index(z, tt),
            HealpixOrdering::Nested => self.nested_index(z, tt),
        };
        pix as u64
    }

    pub fn ring_to_nested(&self, pixel: u64) -> SkymapResult<u64> {
        let pix = self.check_pixel(pixel)?;
        let (ix, iy, face) = self.ring_to_xyf(pix);
        Ok(self.xyf_to_nested(ix, iy, face) as u64)
    }

    pub fn nested_to_ring(&self, pixel: u64) -> SkymapResult<u64> {
        let pix = self.check_pixel(pixel)?;
        let (ix, iy, face) = self.nested_to_xyf(pix);
        Ok(self.xyf_to_ring(ix, iy, face) as u64)
    }

    fn check_pixel(&self, pixel: u64) -> SkymapResult<i64> {
        if pixel >= self.npix as u64 {
            return Err(SkymapError::PixelOutOfRange {
                pixel: pixel as usize,
                npix: self.npix as usize,
            });
        }
        Ok(pixel as i64)
    }

    fn ring_index(&self, z: f64, tt: f64) -> i64 {
        let nside = self.nside;
        let nl4 = 4 * nside;
        let za = z.abs();

        if za <= 2.0 / 3.0 {
            let temp1 = nside as f64 * (0.5 + tt);
            let temp2 = nside as f64 * z * 0.75;
            let jp = (temp1 - temp2) as i64;
            let jm = (temp1 + temp2) as i64;

            let ir = nside + 1 + jp - jm;
            let kshift = 1 - (ir & 1);
            let t1 = jp + jm - nside + kshift + 1 + 2 * nl4;
            let ip = (t1 >> 1) % nl4;

            self.ncap + (ir - 1) * nl4 + ip
        } else {
            let tp = tt - libm::floor(tt);
            let tmp = nside as f64 * libm::sqrt(3.0 * (1.0 - za));
            let jp = (tp * tmp) as i64;
            let jm = ((1.0 - tp) * tmp) as i64;

            let ir = jp + jm + 1;
            let ip = ((tt * ir as f64) as i64).min(4 * ir - 1);

            if z > 0.0 {
                2 * ir * (ir - 1) + ip
            } else {
                self.npix - 2 * ir * (ir + 1) + ip
            }
        }
    }

    fn nested_index(&self, z: f64, tt: f64) -> i64 {
        let nside = self.nside;
        let za = z.abs();

        if za <= 2.0 / 3.0 {
            let temp1 = nside as f64 * (0.5 + tt);
            let temp2 = nside as f64 * z * 0.75;
            let jp = (temp1 - temp2) as i64;
            let jm = (temp1 + temp2) as i64;

            let ifp = jp >> self.order;
            let ifm = jm >> self.order;
            let face = if ifp == ifm {
                ifp | 4
            } else if ifp < ifm {
                ifp
            } else {
                ifm + 8
            };
            let ix = jm & (nside - 1);
            let iy = nside - (jp & (nside - 1)) - 1;
            self.xyf_to_nested(ix, iy, face)
        } else {
            let ntt = (tt as i64).min(3);
            let tp = tt - ntt as f64;
            let tmp = nside as f64 * libm::sqrt(3.0 * (1.0 - za));
            let jp = ((tp * tmp) as i64).min(nside - 1);
            let jm = (((1.0 - tp) * tmp) as i64).min(nside - 1);

            if z >= 0.0 {
                self.xyf_to_nested(nside - jm - 1, nside - jp - 1, ntt)
            } else {
                self.xyf_to_nested(jp, jm, ntt + 8)
            }
        }
    }

    /// (z, φ) of a ring-ordered pixel centre.
    fn ring_centre(&self, pix: i64) -> (f64, f64) {
        let nside = self.nside;
        let fact2 = 4.0 / self.npix as f64;

        if pix < self.ncap {
            let iring = (1 + isqrt(1 + 2 * pix)) >> 1;
            let iphi = pix + 1 - 2 * iring * (iring - 1);
            let z = 1.0 - (iring * iring) as f64 * fact2;
            let phi = (iphi as f64 - 0.5) * HALF_PI / iring as f64;
            (z, phi)
        } else if pix < self.npix - self.ncap {
            let nl4 = 4 * nside;
            let ip = pix - self.ncap;
            let tmp = ip / nl4;
            let iring = tmp + nside;
            let iphi = ip - nl4 * tmp + 1;
            let fodd = if (iring + nside) & 1 == 1 { 1.0 } else { 0.5 };
            let z = (2 * nside - iring) as f64 * 2.0 / (3.0 * nside as f64);
            let phi = (iphi as f64 - fodd) * HALF_PI / nside as f64;
            (z, phi)
        } else {
            let ip = self.npix - pix;
            let iring = (1 + isqrt(2 * ip - 1)) >> 1;
            let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
            let z = (iring * iring) as f64 * fact2 - 1.0;
            let phi = (iphi as f64 - 0.5) * HALF_PI / iring as f64;
            (z, phi)
        }
    }

    /// (z, φ) of a nested-ordered pixel centre.
    fn nested_centre(&self, pix: i64) -> (f64, f64) {
        let nside = self.nside;
        let (ix, iy, face) = self.nested_to_xyf(pix);
        let jr = JRLL[face as usize] * nside - ix - iy - 1;
        let fact2 = 4.0 / self.npix as f64;

        let (nr, z) = if jr < nside {
            (jr, 1.0 - (jr * jr) as f64 * fact2)
        } else if jr > 3 * nside {
            let nr = 4 * nside - jr;
            (nr, (nr * nr) as f64 * fact2 - 1.0)
        } else {
            (nside, (2 * nside - jr) as f64 * 2.0 / (3.0 * nside as f64))
        };

        let mut tmp = JPLL[face as usize] * nr + ix - iy;
        if tmp < 0 {
            tmp += 8 * nr;
        }
        let phi = (QUARTER_PI * tmp as f64 / nr as f64).rem_euclid(TWOPI);
        (z, phi)
    }

    fn nested_to_xyf(&self, pix: i64) -> (i64, i64, i64) {
        let face = pix >> (2 * self.order);
        let within = pix & (self.npface - 1);
        let mut ix = 0;
        let mut iy = 0;
        for bit in 0..self.order {
            ix |= ((within >> (2 * bit)) & 1) << bit;
            iy |= ((within >> (2 * bit + 1)) & 1) << bit;
        }
        (ix, iy, face)
    }

    fn xyf_to_nested(&self, ix: i64, iy: i64, face: i64) -> i64 {
        let mut within = 0;
        for bit in 0..self.order {
            within |= ((ix >> bit) & 1) << (2 * bit);
            within |= ((iy >> bit) & 1) << (2 * bit + 1);
        }
        (face << (2 * self.order)) + within
    }

    fn ring_to_xyf(&self, pix: i64) -> (i64, i64, i64) {
        let nside = self.nside;
        let nl2 = 2 * nside;

        let (iring, iphi, kshift, nr, face) = if pix < self.ncap {
            let iring = (1 + isqrt(1 + 2 * pix)) >> 1;
            let iphi = pix + 1 - 2 * iring * (iring - 1);
            (iring, iphi, 0, iring, (iphi - 1) / iring)
        } else if pix < self.npix - self.ncap {
            let ip = pix - self.ncap;
            let tmp = ip / (4 * nside);
            let iring = tmp + nside;
            let iphi = ip - tmp * 4 * nside + 1;
            let kshift = (iring + nside) & 1;
            let ire = tmp + 1;
            let irm = nl2 + 1 - tmp;
            let ifm = (iphi - (ire >> 1) + nside - 1) >> self.order;
            let ifp = (iphi - (irm >> 1) + nside - 1) >> self.order;
            let face = if ifp == ifm {
                ifp | 4
            } else if ifp < ifm {
                ifp
            } else {
                ifm + 8
            };
            (iring, iphi, kshift, nside, face)
        } else {
            let ip = self.npix - pix;
            let nr = (1 + isqrt(2 * ip - 1)) >> 1;
            let iphi = 4 * nr + 1 - (ip - 2 * nr * (nr - 1));
            (2 * nl2 - nr, iphi, 0, nr, (iphi - 1) / nr + 8)
        };

        let irt = iring - (2 + (face >> 2)) * nside + 1;
        let mut ipt = 2 * iphi - JPLL[face as usize] * nr - kshift - 1;
        if ipt >= nl2 {
            ipt -= 8 * nside;
        }
        ((ipt - irt) >> 1, (-ipt - irt) >> 1, face)
    }

    fn xyf_to_ring(&self, ix: i64, iy: i64, face: i64) -> i64 {
        let nside = self.nside;
        let nl4 = 4 * nside;
        let jr = JRLL[face as usize] * nside - ix - iy - 1;

        let (nr, n_before, kshift) = if jr < nside {
            (jr, 2 * jr * (jr - 1), 0)
        } else if jr > 3 * nside {
            let nr = nl4 - jr;
            (nr, self.npix - 2 * (nr + 1) * nr, 0)
        } else {
            (nside, self.ncap + (jr - nside) * nl4, (jr - nside) & 1)
        };

        let mut jp = (JPLL[face as usize] * nr + ix - iy + 1 + kshift) / 2;
        if jp > nl4 {
            jp -= nl4;
        } else if jp < 1 {
            jp += nl4;
        }
        n_before + jp - 1
    }
}

impl fmt::Display for HealpixGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HEALPix nside={} order={} {} ({} pixels)",
            self.nside, self.order, self.ordering, self.npix
        )
    }
}

fn isqrt(v: i64) -> i64 {
    let mut root = libm::sqrt(v as f64) as i64;
    while root * root > v {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= v {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ORDERINGS: [HealpixOrdering; 2] = [HealpixOrdering::Ring, HealpixOrdering::Nested];

    #[test]
    fn npix_follows_nside() {
        for order in 0..=10 {
            let grid = HealpixGrid::from_order(order, HealpixOrdering::Ring).unwrap();
            let nside = 1u64 << order;
            assert_eq!(grid.nside(), nside);
            assert_eq!(grid.npix(), 12 * nside * nside);
        }
        let grid = HealpixGrid::from_nside(2, HealpixOrdering::Ring).unwrap();
        assert_eq!(grid.npix(), 48);
        assert_eq!(grid.order(), 1);
    }

    #[test]
    fn invalid_nside() {
        assert!(HealpixGrid::from_nside(0, HealpixOrdering::Ring).is_err());
        assert!(HealpixGrid::from_nside(3, HealpixOrdering::Ring).is_err());
        assert!(HealpixGrid::from_nside(1 << 30, HealpixOrdering::Ring).is_err());
        assert!(HealpixGrid::from_order(30, HealpixOrdering::Nested).is_err());
        assert!(HealpixGrid::from_order(29, HealpixOrdering::Nested).is_ok());
    }

    #[test]
    fn centre_round_trip_all_pixels() {
        for ordering in ORDERINGS {
            for nside in [1u64, 2, 4, 8, 16] {
                let grid = HealpixGrid::from_nside(nside, ordering).unwrap();
                for system in [CoordSystem::Equatorial, CoordSystem::Galactic] {
                    for pixel in 0..grid.npix() {
                        let dir = grid.pix2dir(pixel, system).unwrap();
                        assert_eq!(grid.dir2pix(&dir, system), pixel, "{} pixel {}", grid, pixel);
                    }
                }
            }
        }
    }

    #[test]
    fn base_pixel_centres() {
        let grid = HealpixGrid::from_nside(1, HealpixOrdering::Ring).unwrap();
        let (lon, lat) = grid
            .pix2dir(0, CoordSystem::Equatorial)
            .unwrap()
            .lon_lat_degrees(CoordSystem::Equatorial);
        assert_abs_diff_eq!(lon, 45.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lat, asin_safe(2.0 / 3.0).to_degrees(), epsilon = 1e-12);

        let (lon, lat) = grid
            .pix2dir(4, CoordSystem::Equatorial)
            .unwrap()
            .lon_lat_degrees(CoordSystem::Equatorial);
        assert_abs_diff_eq!(lon, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lat, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn ring_and_nested_agree_at_nside_one() {
        let grid = HealpixGrid::from_nside(1, HealpixOrdering::Ring).unwrap();
        for pixel in 0..12 {
            assert_eq!(grid.ring_to_nested(pixel).unwrap(), pixel);
            assert_eq!(grid.nested_to_ring(pixel).unwrap(), pixel);
        }
    }

    #[test]
    fn ring_nested_conversion_is_a_bijection() {
        for nside in [2u64, 4, 32] {
            let ring = HealpixGrid::from_nside(nside, HealpixOrdering::Ring).unwrap();
            let nested = HealpixGrid::from_nside(nside, HealpixOrdering::Nested).unwrap();
            let mut seen = vec![false; ring.npix() as usize];
            for pixel in 0..ring.npix() {
                let nest = ring.ring_to_nested(pixel).unwrap();
                assert!(!seen[nest as usize]);
                seen[nest as usize] = true;
                assert_eq!(ring.nested_to_ring(nest).unwrap(), pixel);

                let dir = ring.pix2dir(pixel, CoordSystem::Equatorial).unwrap();
                assert_eq!(nested.dir2pix(&dir, CoordSystem::Equatorial), nest);
            }
        }
    }

    #[test]
    fn poles_and_seams() {
        for ordering in ORDERINGS {
            let grid = HealpixGrid::from_nside(4, ordering).unwrap();
            for (lon, lat) in [(0.0, 90.0), (0.0, -90.0), (359.999_999, 0.0), (180.0, 41.81)] {
                let dir = SkyDir::from_equatorial_degrees(lon, lat).unwrap();
                assert!(grid.dir2pix(&dir, CoordSystem::Equatorial) < grid.npix());
            }
        }
    }

    #[test]
    fn pixel_out_of_range() {
        let grid = HealpixGrid::from_nside(2, HealpixOrdering::Nested).unwrap();
        assert!(matches!(
            grid.pix2dir(48, CoordSystem::Galactic),
            Err(SkymapError::PixelOutOfRange { pixel: 48, npix: 48 })
        ));
        assert!(grid.ring_to_nested(48).is_err());
    }

    #[test]
    fn solid_angle_sums_to_sphere() {
        let grid = HealpixGrid::from_nside(8, HealpixOrdering::Ring).unwrap();
        assert_abs_diff_eq!(
            grid.pixel_solid_angle() * grid.npix() as f64,
            FOUR_PI_SR,
            epsilon = 1e-12
        );
    }

    #[test]
    fn ordering_names() {
        assert_eq!(HealpixOrdering::from_name("ring").unwrap(), HealpixOrdering::Ring);
        assert_eq!(HealpixOrdering::from_name("NEST").unwrap(), HealpixOrdering::Nested);
        assert_eq!("NESTED".parse::<HealpixOrdering>().unwrap(), HealpixOrdering::Nested);
        assert!(HealpixOrdering::from_name("SPIRAL").is_err());
        assert_eq!(HealpixOrdering::Nested.to_string(), "NESTED");
    }
}
