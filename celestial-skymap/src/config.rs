//! Declarative sky map definitions.
//!
//! With the `serde` feature a [`SkymapConfig`] reads from JSON such as
//!
//! ```json
//! { "system": "galactic", "nmaps": 2,
//!   "geometry": { "kind": "healpix", "nside": 2, "ordering": "RING" } }
//! ```

use std::collections::BTreeMap;

use celestial_coords::CoordSystem;
use celestial_wcs::{registry, WcsBuilder};

use crate::error::{SkymapError, SkymapResult};
use crate::healpix::HealpixOrdering;
use crate::projection::SkyProjection;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkymapConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub system: CoordSystem,
    #[cfg_attr(feature = "serde", serde(default = "default_nmaps"))]
    pub nmaps: usize,
    pub geometry: MapGeometry,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum MapGeometry {
    Healpix {
        nside: u64,
        #[cfg_attr(feature = "serde", serde(default))]
        ordering: HealpixOrdering,
    },
    Wcs {
        /// Three-letter projection code, e.g. `TAN`.
        projection: String,
        /// Reference direction, degrees.
        crval: [f64; 2],
        /// Signed pixel increments, degrees per pixel.
        cdelt: [f64; 2],
        /// One-based reference pixel; the grid centre when absent.
        #[cfg_attr(feature = "serde", serde(default))]
        crpix: Option<[f64; 2]>,
        nx: usize,
        ny: usize,
        /// PV2_m projection parameters, keyed by m.
        #[cfg_attr(
            feature = "serde",
            serde(default, deserialize_with = "pv_index::deserialize")
        )]
        pv: BTreeMap<u32, f64>,
    },
}

#[cfg(feature = "serde")]
fn default_nmaps() -> usize {
    1
}

/// JSON object keys are strings, and the tagged `MapGeometry` buffers them
/// as such, so PV indices are parsed here.
#[cfg(feature = "serde")]
mod pv_index {
    use std::collections::BTreeMap;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<u32, f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        BTreeMap::<String, f64>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, value)| {
                key.trim()
                    .parse::<u32>()
                    .map(|index| (index, value))
                    .map_err(|_| D::Error::custom(format!("PV index '{}' is not an integer", key)))
            })
            .collect()
    }
}

impl SkymapConfig {
    pub fn healpix(system: CoordSystem, nside: u64, ordering: HealpixOrdering) -> Self {
        Self {
            system,
            nmaps: 1,
            geometry: MapGeometry::Healpix { nside, ordering },
        }
    }

    pub fn wcs(
        system: CoordSystem,
        projection: impl Into<String>,
        crval: [f64; 2],
        cdelt: [f64; 2],
        nx: usize,
        ny: usize,
    ) -> Self {
        Self {
            system,
            nmaps: 1,
            geometry: MapGeometry::Wcs {
                projection: projection.into(),
                crval,
                cdelt,
                crpix: None,
                nx,
                ny,
                pv: BTreeMap::new(),
            },
        }
    }

    pub fn with_nmaps(mut self, nmaps: usize) -> Self {
        self.nmaps = nmaps;
        self
    }

    /// Overrides the reference pixel. No effect on HEALPix geometry.
    pub fn with_crpix(mut self, x: f64, y: f64) -> Self {
        if let MapGeometry::Wcs { crpix, .. } = &mut self.geometry {
            *crpix = Some([x, y]);
        }
        self
    }

    /// Sets PV2_`index`. No effect on HEALPix geometry.
    pub fn with_pv(mut self, index: u32, value: f64) -> Self {
        if let MapGeometry::Wcs { pv, .. } = &mut self.geometry {
            pv.insert(index, value);
        }
        self
    }

    /// Validates the geometry and builds its projection.
    pub fn projection(&self) -> SkymapResult<SkyProjection> {
        match &self.geometry {
            MapGeometry::Healpix { nside, ordering } => {
                SkyProjection::healpix(self.system, *nside, *ordering)
            }
            MapGeometry::Wcs {
                projection,
                crval,
                cdelt,
                crpix,
                nx,
                ny,
                pv,
            } => {
                let code = projection.trim().to_ascii_uppercase();
                if registry::lookup(&code).is_none() {
                    return Err(SkymapError::invalid_parameter(format!(
                        "unknown projection '{}'",
                        projection
                    )));
                }
                if *nx == 0 || *ny == 0 {
                    return Err(SkymapError::invalid_parameter(format!(
                        "grid dimensions must be positive, got {} x {}",
                        nx, ny
                    )));
                }
                if cdelt.iter().any(|d| !d.is_finite() || *d == 0.0) {
                    return Err(SkymapError::invalid_parameter(format!(
                        "pixel scale ({}, {}) must be finite and non-zero",
                        cdelt[0], cdelt[1]
                    )));
                }
                let [x0, y0] =
                    crpix.unwrap_or([(*nx as f64 + 1.0) / 2.0, (*ny as f64 + 1.0) / 2.0]);

                let mut builder = WcsBuilder::new()
                    .proj_code(code)
                    .system(self.system)
                    .crval(crval[0], crval[1])
                    .crpix(x0, y0)
                    .cdelt(cdelt[0], cdelt[1]);
                for (&index, &value) in pv {
                    builder = builder.pv(index, value);
                }
                let wcs = builder
                    .build()
                    .map_err(|e| SkymapError::invalid_parameter(e.to_string()))?;
                SkyProjection::wcs(wcs, *nx, *ny)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healpix_geometry() {
        let config = SkymapConfig::healpix(CoordSystem::Galactic, 2, HealpixOrdering::Nested)
            .with_nmaps(3)
            .with_crpix(1.0, 1.0);
        assert_eq!(config.nmaps, 3);
        let projection = config.projection().unwrap();
        assert_eq!(projection.npix(), 48);
        assert_eq!(projection.system(), CoordSystem::Galactic);
    }

    #[test]
    fn wcs_geometry_defaults_to_grid_centre() {
        let config = SkymapConfig::wcs(
            CoordSystem::Equatorial,
            "tan",
            [83.6331, 22.0145],
            [-0.1, 0.1],
            4,
            6,
        );
        let projection = config.projection().unwrap();
        let wcs = projection.wcs_grid().unwrap().wcs();
        assert_eq!(wcs.crpix(), [2.5, 3.5]);
        assert_eq!(projection.code(), "TAN");
    }

    #[test]
    fn wcs_geometry_with_parameters() {
        let config = SkymapConfig::wcs(CoordSystem::Galactic, "CEA", [0.0, 0.0], [-1.0, 1.0], 10, 10)
            .with_pv(1, 0.5);
        let projection = config.projection().unwrap();
        let wcs = projection.wcs_grid().unwrap().wcs();
        assert_eq!(wcs.projection().pv_params(), vec![(1, 0.5)]);
    }

    #[test]
    fn rejects_bad_geometry() {
        let base = |code: &str, cdelt: [f64; 2], nx: usize| {
            SkymapConfig::wcs(CoordSystem::Equatorial, code, [0.0, 0.0], cdelt, nx, 5).projection()
        };
        assert!(matches!(base("XYZ", [-0.1, 0.1], 5), Err(SkymapError::InvalidParameter { .. })));
        assert!(matches!(base("TAN", [0.0, 0.1], 5), Err(SkymapError::InvalidParameter { .. })));
        assert!(matches!(base("TAN", [-0.1, 0.1], 0), Err(SkymapError::InvalidParameter { .. })));
        assert!(matches!(
            SkymapConfig::wcs(CoordSystem::Equatorial, "TAN", [0.0, 95.0], [-0.1, 0.1], 5, 5)
                .projection(),
            Err(SkymapError::InvalidParameter { .. })
        ));
        assert!(matches!(
            SkymapConfig::wcs(CoordSystem::Equatorial, "TAN", [0.0, 0.0], [-0.1, 0.1], 5, 5)
                .with_pv(1, 2.0)
                .projection(),
            Err(SkymapError::InvalidParameter { .. })
        ));
        assert!(SkymapConfig::healpix(CoordSystem::Equatorial, 5, HealpixOrdering::Ring)
            .projection()
            .is_err());
    }
}
