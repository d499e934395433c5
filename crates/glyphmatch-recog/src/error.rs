//! Error types for glyphmatch-recog

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during recognition operations
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphmatch_core::Error),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] glyphmatch_transform::TransformError),

    /// Image decoding error
    #[cfg(feature = "io")]
    #[error("image I/O error: {0}")]
    Image(#[from] glyphmatch_io::IoError),

    /// Template source could not be opened
    #[error("cannot open template source {}: {source}", path.display())]
    TemplateOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading or writing templates
    #[error("template I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Byte buffer of the wrong size offered as a fingerprint
    #[error("fingerprint must be {expected} bytes, got {actual}")]
    FingerprintLength { expected: usize, actual: usize },

    /// Template cannot be represented in the requested format
    #[error("template not serializable: {0}")]
    Unserializable(String),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
