//! Multi-plane sky maps over HEALPix and WCS pixelizations.
//!
//! A [`Skymap`] pairs a [`SkyProjection`] with one or more planes of `f64`
//! values. Pixels convert to and from [`SkyDir`] directions in either frame,
//! and maps round-trip losslessly through FITS files.
//!
//! ```no_run
//! use celestial_skymap::{CoordSystem, HealpixOrdering, SkyDir, Skymap};
//!
//! let mut map = Skymap::healpix(CoordSystem::Galactic, 64, HealpixOrdering::Ring, 1)?;
//! let crab = SkyDir::from_equatorial_degrees(83.6331, 22.0145)?;
//! let pixel = map.dir2pix(&crab)?;
//! map[pixel] += 1.0;
//! map.save("counts.fits", true)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod healpix;
pub mod persist;
pub mod pixel;
pub mod projection;
pub mod skymap;

pub use celestial_coords::{CoordSystem, SkyDir};
pub use config::{MapGeometry, SkymapConfig};
pub use error::{SkymapError, SkymapResult};
pub use healpix::{HealpixGrid, HealpixOrdering};
pub use pixel::SkyPixel;
pub use projection::{SkyProjection, WcsGrid};
pub use skymap::Skymap;
