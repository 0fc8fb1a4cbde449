//! FITS World Coordinate System transforms for two-axis celestial images.
//!
//! A [`Wcs`] chains a [`LinearTransform`] (CRPIX, CD/CDELT), a zenithal or
//! cylindrical [`Projection`] and a [`SphericalRotation`] (CRVAL, LONPOLE,
//! LATPOLE). Build one with [`WcsBuilder`], either directly or from header
//! keywords through [`KeywordProvider`].

pub mod builder;
mod common;
pub mod coordinate;
pub mod error;
pub mod header;
pub mod linear;
pub mod registry;
pub mod spherical;

pub use builder::{Wcs, WcsBuilder, WcsKeyword, WcsKeywordValue};
pub use coordinate::{CelestialCoord, IntermediateCoord, NativeCoord, PixelCoord};
pub use error::{WcsError, WcsResult};
pub use header::{KeywordMap, KeywordProvider};
pub use linear::LinearTransform;
pub use registry::ProjectionInfo;
pub use spherical::{Projection, ProjectionFamily, SphericalRotation};
