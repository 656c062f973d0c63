use image::{imageops, Rgba, RgbaImage};
use mps_core::ProcessingError;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Stack pages top to bottom on a white canvas.
///
/// The canvas is as wide as the widest page and as tall as all pages together;
/// narrower pages are left-aligned.
pub fn compose_vertical(pages: &[RgbaImage]) -> Result<RgbaImage, ProcessingError> {
    if pages.is_empty() {
        return Err(ProcessingError::InvalidOptions(
            "no pages to merge".to_string(),
        ));
    }

    let width = pages.iter().map(|p| p.width()).max().unwrap_or(0);
    let height = pages
        .iter()
        .try_fold(0u32, |acc, p| acc.checked_add(p.height()))
        .ok_or_else(|| ProcessingError::ResourceExhaustion("merged height overflows".to_string()))?;

    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
    let mut y = 0i64;
    for page in pages {
        imageops::replace(&mut canvas, page, 0, y);
        y += page.height() as i64;
    }

    tracing::debug!(pages = pages.len(), width = width, height = height, "Merged pages");
    Ok(canvas)
}
