use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category an asset falls into, derived from its declared content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Document,
    Unknown,
}

impl FileCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Document => "document",
            FileCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw encoded image or document bytes plus the declared MIME type
#[derive(Debug, Clone)]
pub struct Asset {
    pub data: Bytes,
    pub content_type: String,
    pub filename: Option<String>,
}

impl Asset {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Filename without directory or extension, if the asset carries a usable one
    pub fn file_stem(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        let asset = Asset::new(vec![1u8], "image/png").with_filename("shots/cover.final.png");
        assert_eq!(asset.file_stem(), Some("cover.final"));

        let asset = Asset::new(vec![1u8], "image/png");
        assert_eq!(asset.file_stem(), None);
    }

    #[test]
    fn test_file_category_serialization() {
        let json = serde_json::to_string(&FileCategory::Document).unwrap();
        assert_eq!(json, "\"document\"");
        assert_eq!(FileCategory::Unknown.to_string(), "unknown");
    }
}
