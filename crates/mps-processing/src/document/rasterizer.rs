//! Page rasterization
//!
//! The pipeline only needs two things from a document engine: how many pages
//! there are, and a pixel surface for a given page. Engines plug in through
//! [`PageRasterizer`]; the pdfium-backed one is behind the `pdfium` feature.

use image::RgbaImage;
use mps_core::ProcessingError;

use super::processor::DocumentProcessor;

/// Renders document pages to RGBA surfaces. Page numbers are 1-based.
pub trait PageRasterizer: Send + Sync {
    /// Page count read from the document itself
    fn page_count(&self, data: &[u8]) -> Result<u32, ProcessingError> {
        DocumentProcessor::page_count(data)
    }

    fn render_page(&self, data: &[u8], page: u32) -> Result<RgbaImage, ProcessingError>;

    /// Render several pages in the order given.
    ///
    /// Engines that pay a per-document setup cost should override this.
    fn render_pages(&self, data: &[u8], pages: &[u32]) -> Result<Vec<RgbaImage>, ProcessingError> {
        pages
            .iter()
            .map(|&page| self.render_page(data, page))
            .collect()
    }
}

#[cfg(feature = "pdfium")]
pub use self::pdfium::PdfiumRasterizer;

#[cfg(feature = "pdfium")]
mod pdfium {
    use super::PageRasterizer;
    use image::RgbaImage;
    use mps_core::ProcessingError;
    use pdfium_render::prelude::*;
    use std::path::PathBuf;

    /// Rasterizer backed by a pdfium shared library bound at runtime
    #[derive(Debug, Clone)]
    pub struct PdfiumRasterizer {
        library_dir: Option<PathBuf>,
        render_width: u32,
    }

    impl PdfiumRasterizer {
        pub fn new(render_width: u32) -> Self {
            Self {
                library_dir: None,
                render_width,
            }
        }

        /// Look for the pdfium library in `dir` before falling back to the system one
        pub fn with_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
            self.library_dir = Some(dir.into());
            self
        }

        fn bind(&self) -> Result<Pdfium, ProcessingError> {
            let dir = self
                .library_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("./"));

            let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| {
                    ProcessingError::DocumentRender(format!("failed to bind pdfium: {:?}", e))
                })?;

            Ok(Pdfium::new(bindings))
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        fn page_count(&self, data: &[u8]) -> Result<u32, ProcessingError> {
            let pdfium = self.bind()?;
            let document = pdfium
                .load_pdf_from_byte_slice(data, None)
                .map_err(|e| ProcessingError::DecodeFailure(format!("pdf: {:?}", e)))?;
            Ok(document.pages().len() as u32)
        }

        fn render_page(&self, data: &[u8], page: u32) -> Result<RgbaImage, ProcessingError> {
            let mut pages = self.render_pages(data, &[page])?;
            pages
                .pop()
                .ok_or_else(|| ProcessingError::DocumentRender(format!("page {} not rendered", page)))
        }

        fn render_pages(&self, data: &[u8], pages: &[u32]) -> Result<Vec<RgbaImage>, ProcessingError> {
            let pdfium = self.bind()?;
            let document = pdfium
                .load_pdf_from_byte_slice(data, None)
                .map_err(|e| ProcessingError::DecodeFailure(format!("pdf: {:?}", e)))?;

            let render_config = PdfRenderConfig::new().set_target_width(self.render_width as i32);
            let total = document.pages().len() as u32;

            pages
                .iter()
                .map(|&page| {
                    if page == 0 || page > total {
                        return Err(ProcessingError::DocumentRender(format!(
                            "page {} out of range (1..={})",
                            page, total
                        )));
                    }

                    let pdf_page = document.pages().get((page - 1) as u16).map_err(|e| {
                        ProcessingError::DocumentRender(format!("page {}: {:?}", page, e))
                    })?;
                    let bitmap = pdf_page.render_with_config(&render_config).map_err(|e| {
                        ProcessingError::DocumentRender(format!("page {}: {:?}", page, e))
                    })?;

                    let image = bitmap.as_image().into_rgba8();
                    tracing::debug!(
                        page = page,
                        width = image.width(),
                        height = image.height(),
                        "Rendered page"
                    );
                    Ok(image)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::processor::tests::build_pdf;
    use image::Rgba;

    struct SolidRasterizer;

    impl PageRasterizer for SolidRasterizer {
        fn render_page(&self, _data: &[u8], page: u32) -> Result<RgbaImage, ProcessingError> {
            Ok(RgbaImage::from_pixel(page * 10, 5, Rgba([page as u8, 0, 0, 255])))
        }
    }

    #[test]
    fn test_default_page_count_reads_document() {
        let data = build_pdf(3, None);
        assert_eq!(SolidRasterizer.page_count(&data).unwrap(), 3);
    }

    #[test]
    fn test_default_render_pages_keeps_order() {
        let pages = SolidRasterizer.render_pages(b"", &[3, 1, 2]).unwrap();
        let widths: Vec<u32> = pages.iter().map(|p| p.width()).collect();
        assert_eq!(widths, vec![30, 10, 20]);
    }
}
