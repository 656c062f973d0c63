//! Pipeline-wide constants.

/// Maximum width applied when blog optimization is requested.
pub const BLOG_MAX_WIDTH: u32 = 1200;

/// Quality factor used by every lossy encoder (0-100).
pub const ENCODE_QUALITY: f32 = 90.0;

/// Filename stem used for merged document output.
pub const MERGED_OUTPUT_STEM: &str = "merged_optimized";

/// MIME types accepted as raster images.
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// MIME types accepted as multi-page documents.
pub const DOCUMENT_CONTENT_TYPES: &[&str] = &["application/pdf"];
