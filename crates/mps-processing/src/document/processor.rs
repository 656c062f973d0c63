//! Document processor - structure parsing and metadata extraction

use crate::metadata::DocumentMetadata;
use crate::traits::MediaProcessor;
use async_trait::async_trait;
use lopdf::{Document, Object};
use mps_core::ProcessingError;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the PDF object structure without rendering anything
    pub fn load(data: &[u8]) -> Result<Document, ProcessingError> {
        if !data.starts_with(PDF_MAGIC) {
            return Err(ProcessingError::DecodeFailure(
                "missing %PDF header".to_string(),
            ));
        }

        Document::load_mem(data).map_err(|e| ProcessingError::DecodeFailure(format!("pdf: {}", e)))
    }

    /// Number of pages in the document's page tree
    pub fn page_count(data: &[u8]) -> Result<u32, ProcessingError> {
        let document = Self::load(data)?;
        Ok(document.get_pages().len() as u32)
    }

    /// Read a text entry (Title, Author, ...) from the trailer's Info dictionary
    fn info_entry(document: &Document, key: &[u8]) -> Option<String> {
        let info = match document.trailer.get(b"Info").ok()? {
            Object::Reference(id) => document.get_dictionary(*id).ok()?,
            Object::Dictionary(dict) => dict,
            _ => return None,
        };

        match info.get(key).ok()? {
            Object::String(bytes, _) => {
                let value = String::from_utf8_lossy(bytes).trim().to_string();
                Some(value).filter(|v| !v.is_empty())
            }
            _ => None,
        }
    }
}

#[async_trait]
impl MediaProcessor for DocumentProcessor {
    type Metadata = DocumentMetadata;

    async fn extract_metadata(&self, data: &[u8]) -> Result<Self::Metadata, ProcessingError> {
        let document = Self::load(data)?;

        Ok(DocumentMetadata {
            page_count: Some(document.get_pages().len() as u32),
            format: "pdf".to_string(),
            title: Self::info_entry(&document, b"Title"),
            author: Self::info_entry(&document, b"Author"),
            size_bytes: Some(data.len() as u64),
        })
    }
}
