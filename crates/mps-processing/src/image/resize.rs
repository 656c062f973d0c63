use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Target dimensions for fitting `orig_width` into `max_width`.
    ///
    /// Images already at or below the bound keep their size. Height follows the
    /// aspect ratio and never drops below 1.
    pub fn fit_width_dimensions(orig_width: u32, orig_height: u32, max_width: u32) -> (u32, u32) {
        if orig_width <= max_width || orig_width == 0 {
            return (orig_width, orig_height);
        }

        let height = (orig_height as f64 * max_width as f64 / orig_width as f64).round() as u32;
        (max_width, height.max(1))
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions
    pub fn resize_image(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        let (orig_width, orig_height) = img.dimensions();
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        imageops::resize(img, width, height, filter)
    }

    /// Downscale so the width is at most `max_width`, preserving aspect ratio.
    ///
    /// Never upscales; applying it twice is the same as applying it once.
    pub fn fit_width(img: RgbaImage, max_width: u32) -> RgbaImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_width_dimensions(orig_width, orig_height, max_width);

        if (width, height) == (orig_width, orig_height) {
            return img;
        }

        tracing::debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = width,
            to_height = height,
            "Resizing image"
        );
        Self::resize_image(&img, width, height)
    }
}
