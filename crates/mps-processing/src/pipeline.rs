//! Media normalization pipeline
//!
//! `MediaPipeline` is the only entry point front ends need: it classifies an
//! asset, runs it through decode, watermark removal, resize and encode, and
//! always answers with a `ProcessingResult`. Errors never escape it.

use crate::classifier::AssetValidator;
use crate::compression::ImageCompressor;
use crate::document::{compose_vertical, DocumentProcessor, PageRasterizer};
use crate::image::{ImageProcessor, ImageResize, WatermarkInpainter};
use crate::metadata::AssetMetadata;
use crate::traits::MediaProcessor;
use image::RgbaImage;
use mps_core::constants::{BLOG_MAX_WIDTH, MERGED_OUTPUT_STEM};
use mps_core::{
    Asset, AssetOptions, DocumentOptions, EncodedOutput, FileCategory, ImageOptions, LogLevel,
    PipelineConfig, ProcessingError, ProcessingResult,
};
use std::sync::Arc;

/// Stateless per call; holds only configuration and the page rasterizer
#[derive(Clone)]
pub struct MediaPipeline {
    config: Arc<PipelineConfig>,
    validator: AssetValidator,
    decoder: ImageProcessor,
    inpainter: WatermarkInpainter,
    compressor: ImageCompressor,
    rasterizer: Option<Arc<dyn PageRasterizer>>,
}

impl Default for MediaPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl std::fmt::Debug for MediaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPipeline")
            .field("config", &self.config)
            .field("has_rasterizer", &self.rasterizer.is_some())
            .finish()
    }
}

impl MediaPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            validator: AssetValidator::new(config.max_input_bytes),
            decoder: ImageProcessor::new(config.max_decode_alloc_bytes),
            inpainter: WatermarkInpainter::new(config.inpaint_strategy),
            compressor: ImageCompressor::default(),
            rasterizer: None,
            config: Arc::new(config),
        }
    }

    /// Attach the engine used to render document pages
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Classify the asset and dispatch to the matching path
    pub fn process(&self, asset: &Asset, options: &AssetOptions) -> ProcessingResult {
        let outcome = self.validator.validate(asset).and_then(|category| {
            match (category, options) {
                (FileCategory::Image, AssetOptions::Image(opts)) => self.run_image(asset, opts),
                (FileCategory::Image, AssetOptions::Document(opts)) => {
                    self.run_image(asset, &opts.image)
                }
                (FileCategory::Document, AssetOptions::Document(opts)) => {
                    self.run_document(asset, opts)
                }
                (FileCategory::Document, AssetOptions::Image(opts)) => {
                    let opts = DocumentOptions {
                        image: *opts,
                        ..DocumentOptions::default()
                    };
                    self.run_document(asset, &opts)
                }
                (FileCategory::Unknown, _) => {
                    Err(ProcessingError::UnsupportedType(asset.content_type.clone()))
                }
            }
        });

        Self::finish(asset, outcome)
    }

    pub fn process_image(&self, asset: &Asset, options: &ImageOptions) -> ProcessingResult {
        let outcome = self
            .expect_category(asset, FileCategory::Image)
            .and_then(|_| self.run_image(asset, options));
        Self::finish(asset, outcome)
    }

    pub fn process_document(&self, asset: &Asset, options: &DocumentOptions) -> ProcessingResult {
        let outcome = self
            .expect_category(asset, FileCategory::Document)
            .and_then(|_| self.run_document(asset, options));
        Self::finish(asset, outcome)
    }

    /// Run `process_image` on the blocking thread pool
    pub async fn process_image_async(&self, asset: Asset, options: ImageOptions) -> ProcessingResult {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.process_image(&asset, &options))
            .await
            .unwrap_or_else(Self::join_failure)
    }

    /// Run `process_document` on the blocking thread pool
    pub async fn process_document_async(
        &self,
        asset: Asset,
        options: DocumentOptions,
    ) -> ProcessingResult {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.process_document(&asset, &options))
            .await
            .unwrap_or_else(Self::join_failure)
    }

    /// Run `process` on the blocking thread pool
    pub async fn process_async(&self, asset: Asset, options: AssetOptions) -> ProcessingResult {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.process(&asset, &options))
            .await
            .unwrap_or_else(Self::join_failure)
    }

    /// Describe an asset (dimensions, page count, ...) without rendering or encoding it
    pub async fn inspect(&self, asset: &Asset) -> Result<AssetMetadata, ProcessingError> {
        match self.validator.validate(asset)? {
            FileCategory::Image => {
                let metadata = self.decoder.extract_metadata(&asset.data).await?;
                Ok(AssetMetadata::Image(metadata))
            }
            FileCategory::Document => {
                let metadata = DocumentProcessor.extract_metadata(&asset.data).await?;
                Ok(AssetMetadata::Document(metadata))
            }
            FileCategory::Unknown => Err(ProcessingError::UnsupportedType(
                asset.content_type.clone(),
            )),
        }
    }

    fn join_failure(err: tokio::task::JoinError) -> ProcessingResult {
        tracing::error!(error = %err, "Processing task failed to complete");
        ProcessingResult::failure(format!("Processing task failed: {}", err))
    }

    fn expect_category(&self, asset: &Asset, expected: FileCategory) -> Result<(), ProcessingError> {
        let category = self.validator.validate(asset)?;
        if category != expected {
            return Err(ProcessingError::UnsupportedType(format!(
                "{} is not a supported {}",
                asset.content_type, expected
            )));
        }
        Ok(())
    }

    /// Error boundary: log at the error's level and convert to a failed result
    fn finish(asset: &Asset, outcome: Result<Vec<EncodedOutput>, ProcessingError>) -> ProcessingResult {
        match outcome {
            Ok(outputs) => {
                tracing::info!(
                    content_type = %asset.content_type,
                    outputs = outputs.len(),
                    "Asset processed"
                );
                ProcessingResult::success(outputs)
            }
            Err(err) => {
                let code = err.error_code();
                match err.log_level() {
                    LogLevel::Debug => {
                        tracing::debug!(error = %err, code = code, content_type = %asset.content_type, "Asset rejected")
                    }
                    LogLevel::Warn => {
                        tracing::warn!(error = %err, code = code, content_type = %asset.content_type, "Asset processing failed")
                    }
                    LogLevel::Error => {
                        tracing::error!(error = %err, code = code, content_type = %asset.content_type, "Asset processing failed")
                    }
                }
                ProcessingResult::failure(err.to_string())
            }
        }
    }

    fn output_stem<'a>(&'a self, asset: &'a Asset) -> &'a str {
        asset
            .file_stem()
            .unwrap_or(self.config.default_output_stem.as_str())
    }

    fn run_image(
        &self,
        asset: &Asset,
        options: &ImageOptions,
    ) -> Result<Vec<EncodedOutput>, ProcessingError> {
        let surface = self.decoder.decode(&asset.data, &asset.content_type)?;
        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            remove_watermark = options.remove_watermark,
            optimize_for_blog = options.optimize_for_blog,
            "Decoded image"
        );

        let surface = self.normalize(surface, options)?;
        self.encode(&surface, options, self.output_stem(asset), None)
    }

    fn run_document(
        &self,
        asset: &Asset,
        options: &DocumentOptions,
    ) -> Result<Vec<EncodedOutput>, ProcessingError> {
        if options.selected_pages.is_empty() {
            tracing::debug!("No pages selected, nothing to render");
            return Ok(Vec::new());
        }

        let rasterizer = self.rasterizer.as_ref().ok_or_else(|| {
            ProcessingError::DocumentRender("no page rasterizer configured".to_string())
        })?;

        let page_count = rasterizer.page_count(&asset.data)?;
        let order = options.resolve_page_order(page_count)?;
        tracing::debug!(page_count = page_count, pages = ?order, merge = options.merge_pages, "Rendering document");

        let rendered = rasterizer.render_pages(&asset.data, &order)?;
        if rendered.len() != order.len() {
            return Err(ProcessingError::DocumentRender(format!(
                "expected {} rendered pages, got {}",
                order.len(),
                rendered.len()
            )));
        }

        let mut surfaces = Vec::with_capacity(order.len());
        for (page, surface) in order.iter().zip(rendered) {
            if surface.width() == 0 || surface.height() == 0 {
                return Err(ProcessingError::DocumentRender(format!(
                    "page {} rendered empty",
                    page
                )));
            }
            surfaces.push((*page, self.normalize(surface, &options.image)?));
        }

        if options.merge_pages {
            let pages: Vec<RgbaImage> = surfaces.into_iter().map(|(_, s)| s).collect();
            let merged = compose_vertical(&pages)?;
            return self.encode(&merged, &options.image, MERGED_OUTPUT_STEM, None);
        }

        let mut outputs = Vec::with_capacity(surfaces.len() * options.image.output_format.formats().len());
        for (page, surface) in &surfaces {
            let stem = format!("page_{}", page);
            outputs.extend(self.encode(surface, &options.image, &stem, Some(*page))?);
        }
        Ok(outputs)
    }

    /// Watermark removal then blog resize, each only when requested
    fn normalize(&self, mut surface: RgbaImage, options: &ImageOptions) -> Result<RgbaImage, ProcessingError> {
        if options.remove_watermark {
            self.inpainter.remove(&mut surface)?;
        }

        if options.optimize_for_blog {
            surface = ImageResize::fit_width(surface, BLOG_MAX_WIDTH);
        }

        Ok(surface)
    }

    fn encode(
        &self,
        surface: &RgbaImage,
        options: &ImageOptions,
        stem: &str,
        page: Option<u32>,
    ) -> Result<Vec<EncodedOutput>, ProcessingError> {
        let formats = options.output_format.formats();
        let encoded = self.compressor.encode_all(surface, formats)?;

        Ok(encoded
            .into_iter()
            .map(|(format, data)| EncodedOutput {
                filename: format!("{}.{}", stem, format.extension()),
                format,
                width: surface.width(),
                height: surface.height(),
                page,
                data,
            })
            .collect())
    }
}
