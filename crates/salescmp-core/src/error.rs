//! Error types for the salescmp-core library.

use thiserror::Error;

/// Main error type for the salescmp library.
#[derive(Error, Debug)]
pub enum SalesError {
    /// Document loading or text extraction error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Report rendering error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading the source PDF.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the PDF bytes.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and the empty password does not open it.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to rendering a comparison report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to encode a page content stream.
    #[error("failed to encode page content: {0}")]
    Encode(String),

    /// Failed to serialize the report document.
    #[error("failed to write report: {0}")]
    Write(String),
}

/// Result type for the salescmp library.
pub type Result<T> = std::result::Result<T, SalesError>;
