//! Error type for the numeric layer.
//!
//! [`AstroError`] covers the two ways a low-level computation can fail here:
//! a numerical problem with an input or result ([`MathError`](AstroError::MathError),
//! classified by [`MathErrorKind`]) and an algorithm that cannot produce an
//! answer for otherwise valid input ([`CalculationError`](AstroError::CalculationError)).
//!
//! ```
//! use celestial_core::{AstroError, MathErrorKind};
//!
//! fn pixel_area(npix: u64) -> Result<f64, AstroError> {
//!     if npix == 0 {
//!         return Err(AstroError::math_error(
//!             "pixel_area",
//!             MathErrorKind::DivisionByZero,
//!             "pixel count is zero",
//!         ));
//!     }
//!     Ok(4.0 * std::f64::consts::PI / npix as f64)
//! }
//!
//! assert!(pixel_area(0).is_err());
//! ```

use thiserror::Error;

/// Classification of numerical failures.
#[derive(Debug, Clone, PartialEq)]
pub enum MathErrorKind {
    /// Division by zero or a near-zero value.
    DivisionByZero,
    /// Input is invalid for the operation.
    InvalidInput,
    /// Value is NaN or infinite.
    NotFinite,
    /// Value lies outside the valid domain (e.g. latitude beyond ±90°).
    OutOfRange,
}

#[derive(Error, Debug)]
pub enum AstroError {
    #[error("Math error in {operation} ({kind:?}): {message}")]
    MathError {
        operation: String,
        kind: MathErrorKind,
        message: String,
    },

    #[error("Calculation error in {context}: {message}")]
    CalculationError { context: String, message: String },
}

pub type AstroResult<T> = Result<T, AstroError>;

impl AstroError {
    pub fn math_error(operation: &str, kind: MathErrorKind, reason: &str) -> Self {
        Self::MathError {
            operation: operation.to_string(),
            kind,
            message: reason.to_string(),
        }
    }

    pub fn calculation_error(context: &str, reason: &str) -> Self {
        Self::CalculationError {
            context: context.to_string(),
            message: reason.to_string(),
        }
    }

    /// Returns the [`MathErrorKind`] for math errors.
    pub fn math_kind(&self) -> Option<&MathErrorKind> {
        match self {
            Self::MathError { kind, .. } => Some(kind),
            Self::CalculationError { .. } => None,
        }
    }
}
