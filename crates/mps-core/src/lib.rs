//! MPS Core Library
//!
//! This crate provides the domain models, error types, configuration and constants
//! shared by the media normalization pipeline and its front ends.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{InpaintStrategy, PipelineConfig};
pub use error::{LogLevel, ProcessingError, ProcessingResultExt};
pub use models::{
    Asset, AssetOptions, DocumentOptions, EncodeFormat, EncodedOutput, FileCategory,
    ImageOptions, OutputFormatSelection, ProcessingResult,
};
