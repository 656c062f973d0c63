//! Core traits for media processing
//!
//! This module defines the interface shared by the image and document processors.

use async_trait::async_trait;
use mps_core::ProcessingError;

/// Media processor trait - reads descriptive metadata without running the pipeline
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    type Metadata: Send + Sync;

    /// Extract metadata from media data
    async fn extract_metadata(&self, data: &[u8]) -> Result<Self::Metadata, ProcessingError>;
}
