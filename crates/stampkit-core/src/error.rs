//! Error handling for StampKit
//!
//! A single error enum covers the document, font, export and I/O layers.
//! Interactive no-ops (undo with no history, deleting a guide) never
//! surface here; only genuinely failed operations do.

use thiserror::Error;

use crate::units::Axis;

/// Main error type for StampKit operations
#[derive(Error, Debug)]
pub enum Error {
    /// A document dimension is outside the accepted range
    #[error("Invalid {axis} {value}mm: must be between {min}mm and {max}mm")]
    InvalidSize {
        /// The offending axis.
        axis: Axis,
        /// The rejected value in millimetres.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// Font could not be resolved or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// PDF assembly failed
    #[error("Export error: {0}")]
    Export(String),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create an export error from a string message
    pub fn export(msg: impl Into<String>) -> Self {
        Error::Export(msg.into())
    }

    /// Check if this is a document size validation error
    pub fn is_invalid_size(&self) -> bool {
        matches!(self, Error::InvalidSize { .. })
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }
}

/// Result type alias for StampKit operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_size_display() {
        let err = Error::InvalidSize {
            axis: Axis::Width,
            value: 120.0,
            min: 10.0,
            max: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid width 120mm: must be between 10mm and 100mm"
        );
        assert!(err.is_invalid_size());
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_other_helpers() {
        assert_eq!(Error::other("boom").to_string(), "boom");
        assert!(Error::export("no page").is_export_error());
    }
}
