//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::text::split_lines;
use super::{PdfProcessor, Result};
use crate::error::DocumentError;

/// PDF text extractor.
///
/// lopdf validates the document and handles empty-password encryption;
/// pdf-extract produces the plain reading-order text.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    normalize: bool,
}

impl PdfExtractor {
    /// Create a new PDF extractor with NFKD normalization enabled.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            normalize: true,
        }
    }

    /// Enable or disable Unicode normalization of extracted text.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| DocumentError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DocumentError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| DocumentError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(DocumentError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(DocumentError::Parse("No document loaded".to_string()));
        }

        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| DocumentError::TextExtraction(e.to_string()))
    }

    fn extract_lines(&self) -> Result<Vec<String>> {
        let text = self.extract_text()?;
        let lines = split_lines(&text, self.normalize);

        debug!(
            "Extracted {} lines ({} chars) from {} pages",
            lines.len(),
            text.len(),
            self.page_count()
        );

        Ok(lines)
    }
}
