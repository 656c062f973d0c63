//! Document processing module

pub mod merge;
pub mod processor;
pub mod rasterizer;

pub use merge::compose_vertical;
pub use processor::DocumentProcessor;
pub use rasterizer::PageRasterizer;
#[cfg(feature = "pdfium")]
pub use rasterizer::PdfiumRasterizer;
