//! Sky directions and regions for the celestial sky-map crates.
//!
//! [`SkyDir`] holds a direction in the equatorial (ICRS) or Galactic frame and
//! converts losslessly between them; [`CoordSystem`] names the frame and its
//! FITS spellings; [`SkyRegionCircle`] is a cone on the sky with DS9 text I/O.

pub(crate) mod constants;
pub mod errors;
pub mod region;
pub mod sky_dir;
pub mod system;

pub use celestial_core::Angle;
pub use errors::{CoordError, CoordResult};
pub use region::SkyRegionCircle;
pub use sky_dir::SkyDir;
pub use system::CoordSystem;
