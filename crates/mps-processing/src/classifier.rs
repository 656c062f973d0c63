use mps_core::constants::{DOCUMENT_CONTENT_TYPES, IMAGE_CONTENT_TYPES};
use mps_core::{Asset, FileCategory, ProcessingError};
use std::path::Path;

/// Classify a declared MIME type by exact membership in the supported sets.
///
/// The declared string is compared as-is: no case folding, no parameter
/// stripping. Anything not recognised is `Unknown`.
pub fn classify(content_type: &str) -> FileCategory {
    if IMAGE_CONTENT_TYPES.contains(&content_type) {
        FileCategory::Image
    } else if DOCUMENT_CONTENT_TYPES.contains(&content_type) {
        FileCategory::Document
    } else {
        FileCategory::Unknown
    }
}

pub fn classify_asset(asset: &Asset) -> FileCategory {
    classify(&asset.content_type)
}

/// Map a file extension to the content type the pipeline expects for it.
///
/// Used by front ends that only have a path to go on.
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => {
            tracing::debug!(extension = %extension, "Unknown extension, no content type");
            None
        }
    }
}

/// Size checks applied before any decoding happens
#[derive(Debug, Clone, Copy)]
pub struct AssetValidator {
    max_input_bytes: usize,
}

impl AssetValidator {
    pub fn new(max_input_bytes: usize) -> Self {
        Self { max_input_bytes }
    }

    /// Validate asset size
    pub fn validate_size(&self, size: usize) -> Result<(), ProcessingError> {
        if size == 0 {
            return Err(ProcessingError::EmptyAsset);
        }

        if size > self.max_input_bytes {
            return Err(ProcessingError::AssetTooLarge {
                size,
                max: self.max_input_bytes,
            });
        }

        Ok(())
    }

    /// Validate an asset and return its category; unknown types are rejected
    pub fn validate(&self, asset: &Asset) -> Result<FileCategory, ProcessingError> {
        self.validate_size(asset.len())?;

        match classify_asset(asset) {
            FileCategory::Unknown => Err(ProcessingError::UnsupportedType(
                asset.content_type.clone(),
            )),
            category => Ok(category),
        }
    }
}
