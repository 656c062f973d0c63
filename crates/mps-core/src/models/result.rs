use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;

use super::options::EncodeFormat;

/// One encoded output file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedOutput {
    pub filename: String,
    pub format: EncodeFormat,
    pub width: u32,
    pub height: u32,
    /// Source page for document outputs; `None` for single images and merged output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip)]
    pub data: Bytes,
}

impl EncodedOutput {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Transportable `data:` URL for previews and downloads
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.data))
    }
}

/// Outcome of a single pipeline invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub success: bool,
    pub outputs: Vec<EncodedOutput>,
    pub output_files: Vec<String>,
    /// Preview output (the first encoded output)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_image_url: Option<String>,
    /// Every output as a data URL, present when there is more than one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ProcessingResult {
    pub fn success(outputs: Vec<EncodedOutput>) -> Self {
        let output_files = outputs.iter().map(|o| o.filename.clone()).collect();
        let urls: Vec<String> = outputs.iter().map(EncodedOutput::to_data_url).collect();
        let processed_image_url = urls.first().cloned();
        let processed_images = if urls.len() > 1 { Some(urls) } else { None };

        Self {
            success: true,
            outputs,
            output_files,
            processed_image_url,
            processed_images,
            error: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            outputs: Vec::new(),
            output_files: Vec::new(),
            processed_image_url: None,
            processed_images: None,
            error: Some(message.into()),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// The output exposed for preview, if any
    pub fn preview(&self) -> Option<&EncodedOutput> {
        self.outputs.first()
    }
}
