//! Image processor - decoding and metadata extraction

use crate::metadata::ImageMetadata;
use crate::traits::MediaProcessor;
use async_trait::async_trait;
use image::error::ImageError;
use image::{ImageFormat, ImageReader, Limits, RgbaImage};
use mps_core::ProcessingError;
use std::io::Cursor;

/// Decodes raster images under a fixed allocation budget
#[derive(Debug, Clone, Copy)]
pub struct ImageProcessor {
    max_alloc_bytes: u64,
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new(1024 * 1024 * 1024)
    }
}

impl ImageProcessor {
    pub fn new(max_alloc_bytes: u64) -> Self {
        Self { max_alloc_bytes }
    }

    /// Format implied by a declared content type, if it is one we decode
    pub fn format_for_content_type(content_type: &str) -> Option<ImageFormat> {
        match content_type {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_alloc = Some(self.max_alloc_bytes);
        limits
    }

    fn reader<'a>(
        &self,
        data: &'a [u8],
        format: Option<ImageFormat>,
    ) -> Result<ImageReader<Cursor<&'a [u8]>>, ProcessingError> {
        let mut reader = ImageReader::new(Cursor::new(data));
        match format {
            Some(format) => reader.set_format(format),
            None => {
                reader = reader
                    .with_guessed_format()
                    .map_err(|e| ProcessingError::DecodeFailure(e.to_string()))?;
            }
        }
        reader.limits(self.limits());
        Ok(reader)
    }

    /// Decode `data` as the declared content type into an RGBA surface.
    ///
    /// A declared type outside the image set falls back to content sniffing.
    pub fn decode(&self, data: &[u8], content_type: &str) -> Result<RgbaImage, ProcessingError> {
        let format = Self::format_for_content_type(content_type);
        let reader = self.reader(data, format)?;
        let img = reader.decode().map_err(map_image_error)?;

        let rgba = img.into_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(ProcessingError::DecodeFailure(
                "decoded image has no pixels".to_string(),
            ));
        }
        Ok(rgba)
    }
}

/// Allocation limit hits are resource problems; everything else is a bad input
fn map_image_error(err: ImageError) -> ProcessingError {
    match err {
        ImageError::Limits(e) => ProcessingError::ResourceExhaustion(e.to_string()),
        other => ProcessingError::DecodeFailure(other.to_string()),
    }
}

#[async_trait]
impl MediaProcessor for ImageProcessor {
    type Metadata = ImageMetadata;

    async fn extract_metadata(&self, data: &[u8]) -> Result<Self::Metadata, ProcessingError> {
        let reader = self.reader(data, None)?;
        let format = reader
            .format()
            .map(|f| format!("{:?}", f))
            .unwrap_or_else(|| "unknown".to_string());
        let (width, height) = reader.into_dimensions().map_err(map_image_error)?;

        Ok(ImageMetadata {
            width,
            height,
            format,
            size_bytes: Some(data.len() as u64),
        })
    }
}
