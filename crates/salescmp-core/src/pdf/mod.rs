//! PDF processing module.

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;
mod text;

pub use extractor::PdfExtractor;
pub use text::split_lines;

use crate::error::DocumentError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Trait for PDF text sources.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract plain text from the entire PDF, pages in document order.
    fn extract_text(&self) -> Result<String>;

    /// Extract the document as a sequence of normalized text lines.
    fn extract_lines(&self) -> Result<Vec<String>>;
}

