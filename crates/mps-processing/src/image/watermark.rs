//! Fixed-position watermark removal.
//!
//! The watermark sits at a known offset from the bottom-right corner of images
//! produced by the upstream generator, so the region is derived from the image
//! dimensions alone. Removal repaints that rectangle from neighbouring colours.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use mps_core::{InpaintStrategy, ProcessingError};

/// Images at least this wide carry the compact, further-inset watermark
const LARGE_IMAGE_MIN_WIDTH: u32 = 1000;
const FOOTPRINT_WIDTH: u32 = 150;
/// Thickness of the bands sampled above and left of the region
const SAMPLE_BAND: u32 = 5;
const MAX_FEATHER: u32 = 10;
const FALLBACK_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Size and placement of the watermark relative to the bottom-right corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkFootprint {
    pub width: u32,
    pub height: u32,
    pub inset_right: u32,
    pub inset_bottom: u32,
}

impl WatermarkFootprint {
    pub fn for_width(image_width: u32) -> Self {
        if image_width >= LARGE_IMAGE_MIN_WIDTH {
            Self {
                width: FOOTPRINT_WIDTH,
                height: 35,
                inset_right: 9,
                inset_bottom: 8,
            }
        } else {
            Self {
                width: FOOTPRINT_WIDTH,
                height: 40,
                inset_right: 1,
                inset_bottom: 1,
            }
        }
    }
}

/// Watermark rectangle, always inside the image it was estimated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl WatermarkRegion {
    /// Estimate the watermark rectangle for an image of the given size.
    ///
    /// A negative origin is pulled to 0 and the footprint then spans from there,
    /// cut at the image edge. Images smaller than the footprint are therefore
    /// covered completely; only a zero-sized image yields an empty region.
    pub fn estimate(image_width: u32, image_height: u32) -> Self {
        let fp = WatermarkFootprint::for_width(image_width);

        let x = image_width as i64 - fp.width as i64 - fp.inset_right as i64;
        let y = image_height as i64 - fp.height as i64 - fp.inset_bottom as i64;
        let x = x.max(0) as u32;
        let y = y.max(0) as u32;

        Self {
            x,
            y,
            width: fp.width.min(image_width - x),
            height: fp.height.min(image_height - y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    fn fits(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Repaints a watermark region with colour sampled from its surroundings
#[derive(Debug, Clone, Copy, Default)]
pub struct WatermarkInpainter {
    strategy: InpaintStrategy,
}

impl WatermarkInpainter {
    pub fn new(strategy: InpaintStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> InpaintStrategy {
        self.strategy
    }

    /// Estimate the region for `img` and repaint it.
    ///
    /// Returns the region that was targeted; an empty region leaves the image untouched.
    pub fn remove(&self, img: &mut RgbaImage) -> Result<WatermarkRegion, ProcessingError> {
        let region = WatermarkRegion::estimate(img.width(), img.height());
        self.apply(img, region)?;
        Ok(region)
    }

    /// Repaint `region`. Pixels are only touched once the region is known to be valid.
    pub fn apply(&self, img: &mut RgbaImage, region: WatermarkRegion) -> Result<(), ProcessingError> {
        if region.is_empty() {
            tracing::debug!("Watermark region is empty, skipping removal");
            return Ok(());
        }

        let (width, height) = img.dimensions();
        if !region.fits(width, height) {
            return Err(ProcessingError::Internal(format!(
                "Watermark region {:?} exceeds {}x{} surface",
                region, width, height
            )));
        }

        let fill = Self::sample_fill_color(img, region);
        tracing::debug!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            color = ?fill.0,
            strategy = ?self.strategy,
            "Removing watermark"
        );

        match self.strategy {
            InpaintStrategy::Flat => Self::flat_fill(img, region, fill),
            InpaintStrategy::Feathered => {
                let neighbours = EdgeNeighbours::capture(img, region);
                Self::flat_fill(img, region, fill);
                Self::feather_edges(img, region, fill, &neighbours);
            }
        }

        Ok(())
    }

    /// Average RGB of the band directly above and the band directly left of the region.
    /// Alpha is ignored; white when neither band fits inside the image.
    pub fn sample_fill_color(img: &RgbaImage, region: WatermarkRegion) -> Rgba<u8> {
        let mut sum = [0u64; 3];
        let mut count = 0u64;

        let mut accumulate = |x0: u32, y0: u32, w: u32, h: u32| {
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    let p = img.get_pixel(x, y);
                    sum[0] += p[0] as u64;
                    sum[1] += p[1] as u64;
                    sum[2] += p[2] as u64;
                    count += 1;
                }
            }
        };

        if region.y >= SAMPLE_BAND {
            accumulate(region.x, region.y - SAMPLE_BAND, region.width, SAMPLE_BAND);
        }
        if region.x >= SAMPLE_BAND {
            accumulate(region.x - SAMPLE_BAND, region.y, SAMPLE_BAND, region.height);
        }

        if count == 0 {
            return FALLBACK_COLOR;
        }

        let avg = |s: u64| ((s as f64) / (count as f64)).round() as u8;
        Rgba([avg(sum[0]), avg(sum[1]), avg(sum[2]), 255])
    }

    fn flat_fill(img: &mut RgbaImage, region: WatermarkRegion, color: Rgba<u8>) {
        let rect = Rect::at(region.x as i32, region.y as i32).of_size(region.width, region.height);
        draw_filled_rect_mut(img, rect, color);
    }

    /// Blend the outermost rows/columns of the patch toward the pixel just outside
    /// each edge, easing with smoothstep so the interior stays flat.
    fn feather_edges(
        img: &mut RgbaImage,
        region: WatermarkRegion,
        fill: Rgba<u8>,
        neighbours: &EdgeNeighbours,
    ) {
        let feather = MAX_FEATHER.min(region.width / 4).min(region.height / 4);
        if feather == 0 {
            return;
        }

        for d in 0..feather {
            // Weight of the fill colour at distance d from the edge
            let t = (d + 1) as f32 / feather as f32;
            let alpha = t * t * (3.0 - 2.0 * t);

            for (i, y) in (region.y..region.bottom()).enumerate() {
                if let Some(left) = neighbours.left.as_ref() {
                    img.put_pixel(region.x + d, y, blend(left[i], fill, alpha));
                }
                if let Some(right) = neighbours.right.as_ref() {
                    img.put_pixel(region.right() - 1 - d, y, blend(right[i], fill, alpha));
                }
            }
            for (i, x) in (region.x..region.right()).enumerate() {
                if let Some(top) = neighbours.top.as_ref() {
                    img.put_pixel(x, region.y + d, blend(top[i], fill, alpha));
                }
                if let Some(bottom) = neighbours.bottom.as_ref() {
                    img.put_pixel(x, region.bottom() - 1 - d, blend(bottom[i], fill, alpha));
                }
            }
        }
    }
}

/// Pixels immediately outside each edge of a region, captured before filling
struct EdgeNeighbours {
    left: Option<Vec<Rgba<u8>>>,
    right: Option<Vec<Rgba<u8>>>,
    top: Option<Vec<Rgba<u8>>>,
    bottom: Option<Vec<Rgba<u8>>>,
}

impl EdgeNeighbours {
    fn capture(img: &RgbaImage, region: WatermarkRegion) -> Self {
        let (width, height) = img.dimensions();
        let column = |x: u32| {
            (region.y..region.bottom())
                .map(|y| *img.get_pixel(x, y))
                .collect::<Vec<_>>()
        };
        let row = |y: u32| {
            (region.x..region.right())
                .map(|x| *img.get_pixel(x, y))
                .collect::<Vec<_>>()
        };

        Self {
            left: (region.x > 0).then(|| column(region.x - 1)),
            right: (region.right() < width).then(|| column(region.right())),
            top: (region.y > 0).then(|| row(region.y - 1)),
            bottom: (region.bottom() < height).then(|| row(region.bottom())),
        }
    }
}

fn blend(outside: Rgba<u8>, fill: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let mix = |o: u8, f: u8| (o as f32 * (1.0 - alpha) + f as f32 * alpha).round() as u8;
    Rgba([
        mix(outside[0], fill[0]),
        mix(outside[1], fill[1]),
        mix(outside[2], fill[2]),
        255,
    ])
}
