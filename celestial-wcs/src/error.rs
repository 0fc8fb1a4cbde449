use thiserror::Error;

pub type WcsResult<T> = Result<T, WcsError>;

#[derive(Debug, Error)]
pub enum WcsError {
    #[error("WCS keyword {keyword} is required but absent")]
    MissingKeyword { keyword: String },

    #[error("Bad value for {keyword}: {message}")]
    InvalidKeyword { keyword: String, message: String },

    #[error("Projection '{code}' is not implemented")]
    UnsupportedProjection { code: String },

    #[error("Point at a projection singularity: {message}")]
    Singularity { message: String },

    #[error("Point outside the projection domain: {message}")]
    OutOfBounds { message: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Linear transformation is singular (det = {determinant})")]
    NonInvertibleMatrix { determinant: f64 },

    #[error("Frame conversion failed: {source}")]
    CoordinateError {
        #[from]
        source: celestial_coords::CoordError,
    },
}

impl WcsError {
    pub fn missing_keyword(keyword: impl Into<String>) -> Self {
        Self::MissingKeyword {
            keyword: keyword.into(),
        }
    }

    pub fn invalid_keyword(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKeyword {
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_projection(code: impl Into<String>) -> Self {
        Self::UnsupportedProjection { code: code.into() }
    }

    pub fn singularity(message: impl Into<String>) -> Self {
        Self::Singularity {
            message: message.into(),
        }
    }

    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        Self::OutOfBounds {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn non_invertible_matrix(determinant: f64) -> Self {
        Self::NonInvertibleMatrix { determinant }
    }

    /// True for failures caused by the point lying outside the region a
    /// projection can represent, as opposed to a malformed WCS.
    pub fn is_outside_projection(&self) -> bool {
        matches!(self, Self::Singularity { .. } | Self::OutOfBounds { .. })
    }
}
