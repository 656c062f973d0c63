//! Media metadata types

use serde::{Deserialize, Serialize};

/// Image metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: Option<u64>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub page_count: Option<u32>,
    pub format: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub size_bytes: Option<u64>,
}

/// Metadata of either kind of supported asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum AssetMetadata {
    Image(ImageMetadata),
    Document(DocumentMetadata),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_metadata_serialization() {
        let metadata = ImageMetadata {
            width: 1920,
            height: 1080,
            format: "Png".to_string(),
            size_bytes: Some(1024000),
        };

        let json = serde_json::to_string(&metadata).unwrap();
        let deserialized: ImageMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(metadata, deserialized);
    }

    #[test]
    fn test_document_metadata_serialization() {
        let metadata = DocumentMetadata {
            page_count: Some(12),
            format: "pdf".to_string(),
            title: Some("Quarterly Review".to_string()),
            author: None,
            size_bytes: Some(2048),
        };

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"page_count\":12"));
        let deserialized: DocumentMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(metadata, deserialized);
    }

    #[test]
    fn test_asset_metadata_tagged_by_category() {
        let metadata = AssetMetadata::Image(ImageMetadata {
            width: 4,
            height: 2,
            format: "WebP".to_string(),
            size_bytes: None,
        });

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["category"], "image");
        assert_eq!(json["width"], 4);
    }
}
