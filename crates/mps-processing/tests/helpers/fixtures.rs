//! Test fixtures: encoded images, watermarked images and small PDFs.

use image::{ImageFormat, Rgba, RgbaImage};
use lopdf::{dictionary, Document, Object};
use mps_processing::WatermarkRegion;
use std::io::Cursor;

pub const BACKGROUND: [u8; 4] = [40, 80, 120, 255];
pub const WATERMARK: [u8; 4] = [250, 250, 250, 255];

pub fn solid_surface(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

pub fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .write_to(&mut Cursor::new(&mut buffer), format)
            .unwrap(),
        _ => img.write_to(&mut Cursor::new(&mut buffer), format).unwrap(),
    }
    buffer
}

/// Horizontal red ramp over a vertical green ramp, so every region differs
pub fn gradient_surface(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            255,
        ])
    })
}

/// Mean RGB over every pixel
pub fn mean_color(img: &RgbaImage) -> [f64; 3] {
    let mut sums = [0f64; 3];
    for pixel in img.pixels() {
        for (sum, channel) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += f64::from(*channel);
        }
    }
    let count = f64::from(img.width()) * f64::from(img.height());
    sums.map(|sum| sum / count)
}

/// Solid background with a bright block painted where the generator puts its watermark
pub fn watermarked_surface(width: u32, height: u32) -> RgbaImage {
    let mut img = solid_surface(width, height, BACKGROUND);
    let region = WatermarkRegion::estimate(width, height);
    for y in region.y..region.bottom() {
        for x in region.x..region.right() {
            img.put_pixel(x, y, Rgba(WATERMARK));
        }
    }
    img
}

pub fn watermarked_png(width: u32, height: u32) -> Vec<u8> {
    encode(&watermarked_surface(width, height), ImageFormat::Png)
}

/// Minimal PDF with `pages` blank A4 pages
pub fn create_test_pdf(pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Whether two colours are within `tolerance` on every RGB channel
pub fn close_to(actual: &Rgba<u8>, expected: [u8; 4], tolerance: u8) -> bool {
    (0..3).all(|i| actual[i].abs_diff(expected[i]) <= tolerance)
}
