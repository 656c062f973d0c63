use anyhow::Context;
use mps_core::{Asset, PipelineConfig, ProcessingResult};
use mps_processing::{content_type_for_path, MediaPipeline, PageRasterizer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read a file into an asset, deriving its content type from the extension.
///
/// Unknown extensions get `application/octet-stream`, which the pipeline rejects.
pub fn read_asset(path: &Path) -> anyhow::Result<Asset> {
    let data = std::fs::read(path).with_context(|| format!("Read {}", path.display()))?;
    let content_type = content_type_for_path(path).unwrap_or("application/octet-stream");

    let mut asset = Asset::new(data, content_type);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        asset = asset.with_filename(name);
    }
    Ok(asset)
}

/// Write every output of a successful result into `dir`, returning the paths written.
pub fn write_outputs(result: &ProcessingResult, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if result.outputs.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(dir).with_context(|| format!("Create {}", dir.display()))?;

    result
        .outputs
        .iter()
        .map(|output| {
            let path = dir.join(&output.filename);
            std::fs::write(&path, &output.data)
                .with_context(|| format!("Write {}", path.display()))?;
            tracing::debug!(path = %path.display(), size_bytes = output.size_bytes(), "Wrote output");
            Ok(path)
        })
        .collect()
}

/// Result JSON for the terminal: everything except the inline `data:` payloads,
/// whose bytes already live in the written files
pub fn result_summary(result: &ProcessingResult) -> anyhow::Result<serde_json::Value> {
    let mut value = serde_json::to_value(result).context("Serialize result")?;
    if let Some(fields) = value.as_object_mut() {
        fields.remove("processedImageUrl");
        fields.remove("processedImages");
    }
    Ok(value)
}

/// Pipeline wired with whatever page rasterizer this build supports
pub fn build_pipeline(config: PipelineConfig) -> MediaPipeline {
    #[cfg(feature = "pdfium")]
    let rasterizer: Option<Arc<dyn PageRasterizer>> = Some(Arc::new(
        mps_processing::PdfiumRasterizer::new(config.document_render_width),
    ));
    #[cfg(not(feature = "pdfium"))]
    let rasterizer: Option<Arc<dyn PageRasterizer>> = None;

    let pipeline = MediaPipeline::new(config);
    match rasterizer {
        Some(rasterizer) => pipeline.with_rasterizer(rasterizer),
        None => {
            tracing::debug!("Built without pdfium, document pages cannot be rendered");
            pipeline
        }
    }
}

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so stdout stays clean for the result JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use mps_core::{ImageOptions, OutputFormatSelection};
    use std::io::Cursor;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let img = RgbaImage::from_pixel(40, 20, Rgba([1, 2, 3, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        let path = dir.join(name);
        std::fs::write(&path, buffer).unwrap();
        path
    }

    #[test]
    fn read_asset_sets_type_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "banner.PNG");

        let asset = read_asset(&path).unwrap();
        assert_eq!(asset.content_type, "image/png");
        assert_eq!(asset.file_stem(), Some("banner"));
    }

    #[test]
    fn read_asset_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let asset = read_asset(&path).unwrap();
        assert_eq!(asset.content_type, "application/octet-stream");
    }

    #[test]
    fn read_asset_missing_file() {
        assert!(read_asset(Path::new("/definitely/not/here.png")).is_err());
    }

    #[test]
    fn write_outputs_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "hero.png");
        let asset = read_asset(&path).unwrap();

        let result = build_pipeline(PipelineConfig::default())
            .process_image(&asset, &ImageOptions::default());
        assert!(result.success);

        let out_dir = dir.path().join("out");
        let written = write_outputs(&result, &out_dir).unwrap();
        assert_eq!(written, vec![out_dir.join("hero.webp")]);
        assert!(std::fs::metadata(&written[0]).unwrap().len() > 0);
    }

    #[test]
    fn result_summary_drops_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let asset = read_asset(&write_png(dir.path(), "hero.png")).unwrap();
        let options = ImageOptions {
            output_format: OutputFormatSelection::Both,
            ..ImageOptions::default()
        };

        let result = build_pipeline(PipelineConfig::default()).process_image(&asset, &options);
        assert!(result.processed_image_url.is_some());

        let summary = result_summary(&result).unwrap();
        let printed = serde_json::to_string_pretty(&summary).unwrap();
        assert!(!printed.contains("data:"));
        assert!(summary.get("processedImageUrl").is_none());
        assert!(summary.get("processedImages").is_none());
        assert_eq!(summary["outputFiles"], serde_json::json!(["hero.webp", "hero.jpg"]));
        assert_eq!(summary["success"], true);
    }

    #[test]
    fn result_summary_keeps_error() {
        let summary = result_summary(&ProcessingResult::failure("bad input")).unwrap();
        assert_eq!(summary["error"], "bad input");
        assert_eq!(summary["success"], false);
    }

    #[tokio::test]
    async fn inspect_reads_file_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let asset = read_asset(&write_png(dir.path(), "hero.png")).unwrap();

        let metadata = build_pipeline(PipelineConfig::default())
            .inspect(&asset)
            .await
            .unwrap();
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["category"], "image");
        assert_eq!((json["width"].as_u64(), json["height"].as_u64()), (Some(40), Some(20)));
    }

    #[test]
    fn write_outputs_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProcessingResult::failure("bad input");
        let written = write_outputs(&result, &dir.path().join("never")).unwrap();
        assert!(written.is_empty());
        assert!(!dir.path().join("never").exists());
    }
}
