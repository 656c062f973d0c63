//! Image processing module
//!
//! This module provides the raster stages of the pipeline:
//! - Decoding under allocation limits and metadata extraction (processor)
//! - Width-bounded resizing (resize)
//! - Watermark region estimation and inpainting (watermark)

pub mod processor;
pub mod resize;
pub mod watermark;

pub use processor::ImageProcessor;
pub use resize::ImageResize;
pub use watermark::{WatermarkFootprint, WatermarkInpainter, WatermarkRegion};
