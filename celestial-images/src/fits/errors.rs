#[derive(Debug, thiserror::Error)]
pub enum FitsError {
    #[error("Malformed FITS file: {0}")]
    InvalidFormat(String),

    #[error("Header has no {keyword} card")]
    KeywordNotFound { keyword: String },

    #[error("BITPIX = {0} is not a FITS sample type")]
    InvalidBitPix(i64),

    #[error("Unreadable header card: {0}")]
    HeaderParse(String),

    #[error("Card {keyword} has unusable value {value}")]
    InvalidKeywordValue { keyword: String, value: String },

    #[error("File ends in the middle of an HDU")]
    UnexpectedEof,

    #[error("FITS I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FitsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn io_error_conversion() {
        let fits_error: FitsError = Error::new(ErrorKind::NotFound, "missing.fits").into();
        assert!(matches!(fits_error, FitsError::Io(_)));
        assert!(fits_error.to_string().contains("missing.fits"));
    }

    #[test]
    fn keyword_errors_name_the_keyword() {
        let error = FitsError::KeywordNotFound {
            keyword: "NAXIS1".to_string(),
        };
        assert_eq!(error.to_string(), "Header has no NAXIS1 card");

        let error = FitsError::InvalidKeywordValue {
            keyword: "BITPIX".to_string(),
            value: "'X'".to_string(),
        };
        assert!(error.to_string().ends_with("BITPIX has unusable value 'X'"));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FitsError>();
    }
}
