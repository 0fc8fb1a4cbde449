use std::path::PathBuf;

use celestial_coords::CoordError;
use celestial_images::FitsError;
use celestial_wcs::WcsError;
use thiserror::Error;

pub type SkymapResult<T> = Result<T, SkymapError>;

#[derive(Debug, Error)]
pub enum SkymapError {
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Pixel {pixel} out of range (npix = {npix})")]
    PixelOutOfRange { pixel: usize, npix: usize },

    #[error("Plane {plane} out of range (nmaps = {nmaps})")]
    PlaneOutOfRange { plane: usize, nmaps: usize },

    #[error("Direction outside the map field: {message}")]
    OutsideField { message: String },

    #[error("File {} already exists", path.display())]
    FileExists { path: PathBuf },

    #[error("Invalid sky map file: {message}")]
    Format { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FITS error: {0}")]
    Fits(#[from] FitsError),

    #[error("Coordinate error: {0}")]
    Coord(#[from] CoordError),

    #[error("WCS error: {0}")]
    Wcs(WcsError),
}

impl SkymapError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn outside_field(message: impl Into<String>) -> Self {
        Self::OutsideField {
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

/// Projection failures for points the grid cannot represent become
/// [`SkymapError::OutsideField`]; anything else is a WCS fault.
impl From<WcsError> for SkymapError {
    fn from(error: WcsError) -> Self {
        if error.is_outside_projection() {
            Self::outside_field(error.to_string())
        } else {
            Self::Wcs(error)
        }
    }
}
