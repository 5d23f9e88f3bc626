//! All error types for the resbundle crate.
//!
//! Resolution and lookup surface only the two `NotFound` variants; the
//! `Parse` and `Io` variants belong to the public `.properties` parser API
//! and never escape bundle resolution itself.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot find bundle `{base_name}` for locale `{locale_id}`")]
    BundleNotFound {
        base_name: String,
        locale_id: String,
    },

    #[error("cannot find key `{key}` in bundle `{base_name}`")]
    KeyNotFound { base_name: String, key: String },

    #[error("properties parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a resolution error for a (base name, locale) pair that
    /// produced no data at any level of the fallback chain.
    pub fn bundle_not_found(base_name: impl Into<String>, locale_id: impl Into<String>) -> Self {
        Error::BundleNotFound {
            base_name: base_name.into(),
            locale_id: locale_id.into(),
        }
    }

    /// Creates a lookup error for a key absent from every level of a
    /// handle's chain.
    pub fn key_not_found(base_name: impl Into<String>, key: impl Into<String>) -> Self {
        Error::KeyNotFound {
            base_name: base_name.into(),
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_bundle_not_found_display() {
        let error = Error::bundle_not_found("msgs", "xx_YY");
        assert_eq!(
            error.to_string(),
            "cannot find bundle `msgs` for locale `xx_YY`"
        );
    }

    #[test]
    fn test_key_not_found_display() {
        let error = Error::key_not_found("msgs", "greeting");
        assert_eq!(
            error.to_string(),
            "cannot find key `greeting` in bundle `msgs`"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let error = Error::Parse("invalid unicode escape `\\uZZZZ`".to_string());
        assert!(error.to_string().contains("properties parse error"));
    }

    #[test]
    fn test_io_error_display() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::bundle_not_found("msgs", "xx");
        let debug = format!("{:?}", error);
        assert!(debug.contains("BundleNotFound"));
        assert!(debug.contains("msgs"));
    }
}
