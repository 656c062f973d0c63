//! Error types module
//!
//! Every failure inside the media pipeline is expressed as a `ProcessingError`.
//! The orchestrator is the error boundary: it converts these into failed
//! `ProcessingResult`s, so none of them ever reach the caller as a raised error.

use std::fmt::Display;
use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like bad input
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Failed to decode asset: {0}")]
    DecodeFailure(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhaustion(String),

    #[error("Failed to encode output: {0}")]
    EncodeFailure(String),

    #[error("Invalid processing options: {0}")]
    InvalidOptions(String),

    #[error("Document rendering failed: {0}")]
    DocumentRender(String),

    #[error("Empty asset")]
    EmptyAsset,

    #[error("Asset too large: {size} bytes (max: {max} bytes)")]
    AssetTooLarge { size: usize, max: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ProcessingError {
    fn from(err: io::Error) -> Self {
        ProcessingError::Internal(format!("IO error: {}", err))
    }
}

impl ProcessingError {
    /// Machine-readable error code (e.g., "DECODE_FAILURE")
    pub fn error_code(&self) -> &'static str {
        match self {
            ProcessingError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            ProcessingError::DecodeFailure(_) => "DECODE_FAILURE",
            ProcessingError::ResourceExhaustion(_) => "RESOURCE_EXHAUSTION",
            ProcessingError::EncodeFailure(_) => "ENCODE_FAILURE",
            ProcessingError::InvalidOptions(_) => "INVALID_OPTIONS",
            ProcessingError::DocumentRender(_) => "DOCUMENT_RENDER_FAILURE",
            ProcessingError::EmptyAsset => "EMPTY_ASSET",
            ProcessingError::AssetTooLarge { .. } => "ASSET_TOO_LARGE",
            ProcessingError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            ProcessingError::UnsupportedType(_)
            | ProcessingError::DecodeFailure(_)
            | ProcessingError::InvalidOptions(_)
            | ProcessingError::EmptyAsset
            | ProcessingError::AssetTooLarge { .. } => LogLevel::Debug,
            ProcessingError::ResourceExhaustion(_) | ProcessingError::DocumentRender(_) => {
                LogLevel::Warn
            }
            ProcessingError::EncodeFailure(_) | ProcessingError::Internal(_) => LogLevel::Error,
        }
    }
}

/// Extension trait for tagging foreign errors with a pipeline error kind
pub trait ProcessingResultExt<T> {
    /// Map the error into the given `ProcessingError` variant, keeping its message
    fn or_kind(self, kind: fn(String) -> ProcessingError) -> Result<T, ProcessingError>;
}

impl<T, E: Display> ProcessingResultExt<T> for Result<T, E> {
    fn or_kind(self, kind: fn(String) -> ProcessingError) -> Result<T, ProcessingError> {
        self.map_err(|e| kind(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ProcessingError::UnsupportedType("text/plain".into()).error_code(),
            "UNSUPPORTED_TYPE"
        );
        assert_eq!(
            ProcessingError::DecodeFailure("bad".into()).error_code(),
            "DECODE_FAILURE"
        );
        assert_eq!(
            ProcessingError::AssetTooLarge { size: 10, max: 5 }.error_code(),
            "ASSET_TOO_LARGE"
        );
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(ProcessingError::EmptyAsset.log_level(), LogLevel::Debug);
        assert_eq!(
            ProcessingError::ResourceExhaustion("alloc".into()).log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            ProcessingError::EncodeFailure("webp".into()).log_level(),
            LogLevel::Error
        );
        assert_eq!(
            ProcessingError::InvalidOptions("x".into()).log_level(),
            LogLevel::Debug
        );
    }

    #[test]
    fn test_display_messages() {
        let err = ProcessingError::AssetTooLarge { size: 100, max: 50 };
        assert_eq!(
            err.to_string(),
            "Asset too large: 100 bytes (max: 50 bytes)"
        );
        let err = ProcessingError::DecodeFailure("truncated stream".into());
        assert!(err.to_string().contains("truncated stream"));
    }

    #[test]
    fn test_or_kind() {
        let result: Result<(), &str> = Err("encoder exploded");
        let err = result.or_kind(ProcessingError::EncodeFailure).unwrap_err();
        assert!(matches!(err, ProcessingError::EncodeFailure(ref m) if m == "encoder exploded"));
    }

    #[test]
    fn test_from_io_error() {
        let err: ProcessingError = io::Error::new(io::ErrorKind::Other, "disk gone").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.to_string().contains("disk gone"));
    }
}
