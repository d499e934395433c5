//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// The fixture font has no bitmap for this character
    #[error("no fixture bitmap for glyph {0:?}")]
    UnknownGlyph(char),

    /// Requested fixture geometry does not fit
    #[error("glyph does not fit: {message}")]
    Geometry { message: String },

    /// Failed to write an artefact
    #[error("failed to write '{path}': {message}")]
    ArtefactWrite { path: String, message: String },

    /// Image construction failed
    #[error("image error: {0}")]
    Core(#[from] glyphmatch_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
