use bytes::Bytes;
use image::{RgbImage, RgbaImage};
use mps_core::constants::ENCODE_QUALITY;
use mps_core::{EncodeFormat, ProcessingError, ProcessingResultExt};

/// Largest width or height libwebp accepts
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Encodes pixel surfaces into the pipeline's output formats
#[derive(Debug, Clone, Copy)]
pub struct ImageCompressor {
    quality: f32,
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self {
            quality: ENCODE_QUALITY,
        }
    }
}

impl ImageCompressor {
    pub fn new(quality: f32) -> Self {
        Self {
            quality: quality.clamp(0.0, 100.0),
        }
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Encode one surface. The input is never modified.
    pub fn encode(&self, img: &RgbaImage, format: EncodeFormat) -> Result<Bytes, ProcessingError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(ProcessingError::EncodeFailure(format!(
                "cannot encode empty {}x{} surface",
                width, height
            )));
        }

        let data = match format {
            EncodeFormat::WebP => self.compress_webp(img)?,
            EncodeFormat::Jpeg => self.compress_jpeg(img)?,
        };

        tracing::debug!(
            format = format.extension(),
            width = width,
            height = height,
            size_bytes = data.len(),
            "Encoded output"
        );
        Ok(data)
    }

    /// Encode the same surface into every requested format, preserving order.
    ///
    /// Two formats are encoded in parallel; the results are independent of each other.
    pub fn encode_all(
        &self,
        img: &RgbaImage,
        formats: &[EncodeFormat],
    ) -> Result<Vec<(EncodeFormat, Bytes)>, ProcessingError> {
        match formats {
            [first, second] => {
                let (a, b) = rayon::join(|| self.encode(img, *first), || self.encode(img, *second));
                Ok(vec![(*first, a?), (*second, b?)])
            }
            _ => formats
                .iter()
                .map(|format| Ok((*format, self.encode(img, *format)?)))
                .collect(),
        }
    }

    fn compress_webp(&self, img: &RgbaImage) -> Result<Bytes, ProcessingError> {
        let (width, height) = img.dimensions();
        if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
            return Err(ProcessingError::EncodeFailure(format!(
                "webp: {}x{} exceeds the {}px WebP limit",
                width, height, WEBP_MAX_DIMENSION
            )));
        }

        let encoder = webp::Encoder::from_rgba(img, width, height);
        let webp_data = encoder
            .encode_simple(false, self.quality)
            .map_err(|e| ProcessingError::EncodeFailure(format!("webp: {:?}", e)))?;

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    /// Compress to JPEG using mozjpeg. Transparency is flattened onto white first.
    fn compress_jpeg(&self, img: &RgbaImage) -> Result<Bytes, ProcessingError> {
        let rgb_img = flatten_onto_white(img);
        let (width, height) = rgb_img.dimensions();
        let quality = self.quality;

        // libjpeg errors surface as panics inside mozjpeg
        let encoded = std::panic::catch_unwind(|| -> std::io::Result<Vec<u8>> {
            let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
            comp.set_size(width as usize, height as usize);
            comp.set_quality(quality);
            comp.set_progressive_mode();
            comp.set_optimize_coding(true);

            let mut comp = comp.start_compress(Vec::new())?;
            comp.write_scanlines(rgb_img.as_raw())?;
            comp.finish()
        })
        .map_err(|_| ProcessingError::EncodeFailure("jpeg: encoder aborted".to_string()))?;

        let jpeg_data = encoded.or_kind(ProcessingError::EncodeFailure)?;
        Ok(Bytes::from(jpeg_data))
    }
}

/// Composite an RGBA surface over an opaque white background
pub fn flatten_onto_white(img: &RgbaImage) -> RgbImage {
    let (width, height) = img.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let p = img.get_pixel(x, y);
        let alpha = p[3] as u32;
        let mix = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([mix(p[0]), mix(p[1]), mix(p[2])])
    })
}
