use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Lossy encoding produced by the format encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodeFormat {
    #[serde(rename = "webp")]
    WebP,
    #[serde(rename = "jpg")]
    Jpeg,
}

impl EncodeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EncodeFormat::WebP => "webp",
            EncodeFormat::Jpeg => "jpg",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            EncodeFormat::WebP => "image/webp",
            EncodeFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Requested output encodings; `Both` fans out to WebP then JPEG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatSelection {
    #[default]
    Webp,
    Jpg,
    Both,
}

impl OutputFormatSelection {
    /// Encoder targets in output order
    pub fn formats(self) -> &'static [EncodeFormat] {
        match self {
            OutputFormatSelection::Webp => &[EncodeFormat::WebP],
            OutputFormatSelection::Jpg => &[EncodeFormat::Jpeg],
            OutputFormatSelection::Both => &[EncodeFormat::WebP, EncodeFormat::Jpeg],
        }
    }
}

impl FromStr for OutputFormatSelection {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webp" => Ok(OutputFormatSelection::Webp),
            "jpg" | "jpeg" => Ok(OutputFormatSelection::Jpg),
            "both" | "all" => Ok(OutputFormatSelection::Both),
            other => Err(ProcessingError::InvalidOptions(format!(
                "Invalid output format: {}",
                other
            ))),
        }
    }
}

/// Options for a single raster image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub remove_watermark: bool,
    pub optimize_for_blog: bool,
    pub output_format: OutputFormatSelection,
}

/// Options for a multi-page document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOptions {
    #[serde(flatten)]
    pub image: ImageOptions,
    #[serde(default)]
    pub merge_pages: bool,
    #[serde(default)]
    pub selected_pages: Vec<u32>,
    #[serde(default)]
    pub page_order: Vec<u32>,
}

impl DocumentOptions {
    /// Validate the page selection against the document and return the pages to
    /// process, in output order.
    ///
    /// An empty `page_order` means "process in selection order".
    pub fn resolve_page_order(&self, page_count: u32) -> Result<Vec<u32>, ProcessingError> {
        let mut selected = HashSet::with_capacity(self.selected_pages.len());
        for &page in &self.selected_pages {
            if page == 0 || page > page_count {
                return Err(ProcessingError::InvalidOptions(format!(
                    "Page {} is outside the document (1..={})",
                    page, page_count
                )));
            }
            if !selected.insert(page) {
                return Err(ProcessingError::InvalidOptions(format!(
                    "Page {} is selected more than once",
                    page
                )));
            }
        }

        if self.page_order.is_empty() {
            return Ok(self.selected_pages.clone());
        }

        if self.page_order.len() != self.selected_pages.len() {
            return Err(ProcessingError::InvalidOptions(format!(
                "Page order lists {} pages but {} are selected",
                self.page_order.len(),
                self.selected_pages.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.page_order.len());
        for &page in &self.page_order {
            if !selected.contains(&page) {
                return Err(ProcessingError::InvalidOptions(format!(
                    "Page {} is ordered but not selected",
                    page
                )));
            }
            if !seen.insert(page) {
                return Err(ProcessingError::InvalidOptions(format!(
                    "Page {} appears more than once in the page order",
                    page
                )));
            }
        }

        Ok(self.page_order.clone())
    }
}

/// Per-category options, one variant per asset category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum AssetOptions {
    Image(ImageOptions),
    Document(DocumentOptions),
}
