//! Keyword access used when rebuilding a WCS from a FITS header.

use std::collections::HashMap;

use crate::error::{WcsError, WcsResult};

/// Read access to header keywords by name. Implemented by the FITS header
/// adapter in the skymap crate and by [`KeywordMap`] for in-memory use.
pub trait KeywordProvider {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_float(&self, key: &str) -> Option<f64>;
    fn get_int(&self, key: &str) -> Option<i64>;

    fn require_float(&self, key: &str) -> WcsResult<f64> {
        self.get_float(key)
            .ok_or_else(|| WcsError::missing_keyword(key))
    }

    fn require_string(&self, key: &str) -> WcsResult<String> {
        self.get_string(key)
            .ok_or_else(|| WcsError::missing_keyword(key))
    }

    fn require_int(&self, key: &str) -> WcsResult<i64> {
        self.get_int(key)
            .ok_or_else(|| WcsError::missing_keyword(key))
    }
}

/// Keyword store with case-insensitive names.
#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    strings: HashMap<String, String>,
    floats: HashMap<String, f64>,
    ints: HashMap<String, i64>,
}

impl KeywordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.strings.insert(key.to_ascii_uppercase(), value.into());
        self
    }

    pub fn set_float(&mut self, key: &str, value: f64) -> &mut Self {
        self.floats.insert(key.to_ascii_uppercase(), value);
        self
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> &mut Self {
        self.ints.insert(key.to_ascii_uppercase(), value);
        self
    }
}

impl KeywordProvider for KeywordMap {
    fn get_string(&self, key: &str) -> Option<String> {
        self.strings.get(&key.to_ascii_uppercase()).cloned()
    }

    /// Integers are accepted where a float is expected, as FITS writers
    /// often emit `CRPIX1 = 3` without a decimal point.
    fn get_float(&self, key: &str) -> Option<f64> {
        let key = key.to_ascii_uppercase();
        self.floats
            .get(&key)
            .copied()
            .or_else(|| self.ints.get(&key).map(|&v| v as f64))
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.ints.get(&key.to_ascii_uppercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut map = KeywordMap::new();
        map.set_string("ctype1", "RA---TAN");
        assert_eq!(map.get_string("CTYPE1"), Some("RA---TAN".to_string()));
        assert_eq!(map.get_string("CTYPE2"), None);
    }

    #[test]
    fn test_int_promotes_to_float() {
        let mut map = KeywordMap::new();
        map.set_int("CRPIX1", 3);
        assert_eq!(map.get_float("CRPIX1"), Some(3.0));
        assert_eq!(map.get_int("CRPIX1"), Some(3));
    }

    #[test]
    fn test_require_missing_names_keyword() {
        let map = KeywordMap::new();
        let err = map.require_float("CRVAL1").unwrap_err();
        assert!(err.to_string().contains("CRVAL1"));
        assert!(map.require_string("CTYPE1").is_err());
        assert!(map.require_int("NAXIS").is_err());
    }

    #[test]
    fn test_chained_setters() {
        let mut map = KeywordMap::new();
        map.set_string("CTYPE1", "GLON-CAR")
            .set_float("CDELT1", -0.5)
            .set_int("NAXIS", 3);
        assert_eq!(map.require_string("CTYPE1").unwrap(), "GLON-CAR");
        assert_eq!(map.require_float("CDELT1").unwrap(), -0.5);
        assert_eq!(map.require_int("NAXIS").unwrap(), 3);
    }
}
