//! MPS Media Processing Library
//!
//! This crate normalizes uploaded images and PDF documents into web-ready
//! WebP/JPEG outputs: classification, watermark removal, resizing, encoding and
//! the pipeline that ties them together.

pub mod metadata;
pub mod pipeline;
pub mod traits;

pub mod classifier;
pub mod compression;
pub mod document;
pub mod image;

// Re-export commonly used types
pub use classifier::{classify, classify_asset, content_type_for_path, AssetValidator};
pub use compression::ImageCompressor;
pub use document::{compose_vertical, DocumentProcessor, PageRasterizer};
pub use crate::image::{ImageProcessor, ImageResize, WatermarkFootprint, WatermarkInpainter, WatermarkRegion};
pub use metadata::{AssetMetadata, DocumentMetadata, ImageMetadata};
pub use pipeline::MediaPipeline;
pub use traits::MediaProcessor;

#[cfg(feature = "pdfium")]
pub use document::PdfiumRasterizer;
