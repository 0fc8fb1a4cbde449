use std::fmt;
use std::str::FromStr;

use crate::{CoordError, CoordResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Celestial reference frame of a sky map or direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoordSystem {
    /// ICRS right ascension and declination.
    #[default]
    Equatorial,
    /// IAU 1958 Galactic longitude and latitude.
    Galactic,
}

impl CoordSystem {
    /// Parses a frame name.
    ///
    /// Accepts the short codes `CEL`/`EQU`/`GAL`, the FITS `COORDSYS` letters
    /// `C`/`G`, and the long names, case-insensitively.
    pub fn from_name(name: &str) -> CoordResult<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "CEL" | "EQU" | "C" | "EQUATORIAL" | "CELESTIAL" | "ICRS" | "FK5" => {
                Ok(Self::Equatorial)
            }
            "GAL" | "G" | "GALACTIC" => Ok(Self::Galactic),
            _ => Err(CoordError::unknown_system(name)),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Equatorial => "CEL",
            Self::Galactic => "GAL",
        }
    }

    /// Single-letter value of the HEALPix `COORDSYS` keyword.
    pub fn coordsys_letter(&self) -> &'static str {
        match self {
            Self::Equatorial => "C",
            Self::Galactic => "G",
        }
    }

    /// Longitude and latitude prefixes of the FITS `CTYPEn` keywords.
    pub fn ctype_prefixes(&self) -> (&'static str, &'static str) {
        match self {
            Self::Equatorial => ("RA", "DEC"),
            Self::Galactic => ("GLON", "GLAT"),
        }
    }

    pub fn from_ctype_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "RA" | "DEC" => Some(Self::Equatorial),
            "GLON" | "GLAT" => Some(Self::Galactic),
            _ => None,
        }
    }

    /// Frame keyword used in DS9 region strings.
    pub fn ds9_frame(&self) -> &'static str {
        match self {
            Self::Equatorial => "fk5",
            Self::Galactic => "galactic",
        }
    }
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CoordSystem {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
