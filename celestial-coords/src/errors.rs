use celestial_core::AstroError;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type CoordResult<T> = Result<T, CoordError>;

#[derive(Debug, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoordError {
    #[error("Not a valid sky direction: {message}")]
    InvalidCoordinate { message: String },

    #[error("No coordinate frame named '{name}'")]
    UnknownSystem { name: String },

    #[error("Bad region: {message}")]
    InvalidRegion { message: String },

    #[error("Cannot parse region: {message}")]
    ParsingError { message: String },

    #[error("{message}")]
    CoreError { message: String },
}

impl CoordError {
    pub fn invalid_coordinate(message: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            message: message.into(),
        }
    }

    pub fn unknown_system(name: impl Into<String>) -> Self {
        Self::UnknownSystem { name: name.into() }
    }

    pub fn invalid_region(message: impl Into<String>) -> Self {
        Self::InvalidRegion {
            message: message.into(),
        }
    }

    pub fn parsing_error(message: impl Into<String>) -> Self {
        Self::ParsingError {
            message: message.into(),
        }
    }

    pub fn from_core(error: AstroError) -> Self {
        Self::CoreError {
            message: error.to_string(),
        }
    }
}

impl From<AstroError> for CoordError {
    fn from(error: AstroError) -> Self {
        Self::from_core(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestial_core::MathErrorKind;

    #[test]
    fn unknown_frame_is_quoted() {
        assert_eq!(
            CoordError::unknown_system("ECL").to_string(),
            "No coordinate frame named 'ECL'"
        );
        assert!(CoordError::parsing_error("missing ')'")
            .to_string()
            .ends_with("missing ')'"));
    }

    #[test]
    fn core_errors_keep_their_text() {
        let core = AstroError::math_error("validate_latitude", MathErrorKind::OutOfRange, "b=91");
        let err: CoordError = core.into();
        assert!(matches!(err, CoordError::CoreError { .. }));
        assert!(err.to_string().contains("b=91"));
    }
}
