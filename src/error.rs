//! Error types for the label pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing or presenting a label
#[derive(Error, Debug)]
pub enum Error {
    /// The region is detached or has no area; nothing was mutated
    #[error("Invalid region: {0}")]
    InvalidRegionError(String),

    /// Measuring or rasterizing the region failed (presentation already restored)
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// The platform refused to open a print surface
    #[error("Print surface unavailable: {0}")]
    PrintSurfaceError(String),

    /// Invalid configuration or unreadable configuration store
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Spooling or file access failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Re-tag an error raised once the region has passed validation.
    ///
    /// Past that point the presentation may already have been touched, so
    /// even a region that vanished mid-capture reports a `CaptureError`.
    pub(crate) fn into_capture(self) -> Self {
        match self {
            Error::CaptureError(_) => self,
            other => Error::CaptureError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_capture_wraps_foreign_errors() {
        let e = Error::Other("canvas tainted".into()).into_capture();
        assert!(matches!(e, Error::CaptureError(ref m) if m == "canvas tainted"));

        let e = Error::CaptureError("boom".into()).into_capture();
        assert_eq!(e.to_string(), "Capture failed: boom");
    }

    #[test]
    fn into_capture_retags_region_lost_after_mutation() {
        let e = Error::InvalidRegionError("element #label not found".into()).into_capture();
        assert!(matches!(e, Error::CaptureError(ref m) if m.contains("element #label not found")));
    }
}
