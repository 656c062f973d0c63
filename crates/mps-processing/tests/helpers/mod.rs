//! Shared helpers for pipeline integration tests.

#![allow(dead_code)]

pub mod fixtures;

use image::RgbaImage;
use mps_core::ProcessingError;
use mps_processing::PageRasterizer;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rasterizer that renders page `n` as a solid surface `base_width + n` pixels wide,
/// so tests can tell pages apart by their dimensions.
pub struct MockRasterizer {
    pub base_width: u32,
    pub height: u32,
    pub fail_on_page: Option<u32>,
    pub rendered: AtomicUsize,
}

impl MockRasterizer {
    pub fn new(base_width: u32, height: u32) -> Self {
        Self {
            base_width,
            height,
            fail_on_page: None,
            rendered: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub fn page_width(&self, page: u32) -> u32 {
        self.base_width + page
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.load(Ordering::SeqCst)
    }
}

impl PageRasterizer for MockRasterizer {
    fn render_page(&self, _data: &[u8], page: u32) -> Result<RgbaImage, ProcessingError> {
        if self.fail_on_page == Some(page) {
            return Err(ProcessingError::DocumentRender(format!(
                "page {} is corrupt",
                page
            )));
        }

        self.rendered.fetch_add(1, Ordering::SeqCst);
        Ok(fixtures::solid_surface(
            self.page_width(page),
            self.height,
            [(page as u8).wrapping_mul(40), 100, 200, 255],
        ))
    }
}
