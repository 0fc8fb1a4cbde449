//! Numeric building blocks for the celestial sky-map crates.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | [`Angle`] type, range reduction, validation |
//! | [`math`] | Vincenty separation, unit vectors, 3x3 rotations |
//! | [`constants`] | π multiples and unit conversions |
//! | [`errors`] | [`AstroError`] and [`AstroResult`] |
//!
//! All angles are radians internally; [`Angle`] converts to degrees and
//! arcminutes for display and for FITS keywords.

pub mod angle;
pub mod constants;
pub mod errors;
pub mod math;

pub use angle::Angle;
pub use errors::{AstroError, AstroResult, MathErrorKind};

pub mod test_helpers;
