//! Core library for monthly product sales statements.
//!
//! This crate provides:
//! - PDF text extraction into normalized lines
//! - A line-scanning state machine producing per-month product records
//! - Month-over-month and year-over-year comparison of those records
//! - Comparison report rendering (PDF and plain text)

pub mod comparison;
pub mod error;
pub mod models;
pub mod parser;
pub mod pdf;
pub mod report;

pub use comparison::{
    Comparison, ComparisonBuilder, ComparisonRow, ComparisonTotals, Period, ReportPeriods, TotalFigures,
};
pub use error::{Result, SalesError};
pub use models::config::SalesConfig;
pub use models::record::{Month, ProductRecord};
pub use parser::{ExtractionResult, RecordParser, StatementParser};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use report::{PdfReport, ReportRenderer, TextReport};

/// Extract product records from the bytes of a statement PDF.
pub fn extract_records(data: &[u8], config: &SalesConfig) -> Result<ExtractionResult> {
    let mut extractor = PdfExtractor::new().with_normalization(config.pdf.normalize_unicode);
    extractor.load(data)?;
    let lines = extractor.extract_lines()?;

    Ok(StatementParser::from_config(&config.parser).parse(&lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;
    use crate::pdf::fixtures::statement_pdf;

    fn block(label: &str, base: u64) -> Vec<String> {
        let q = |b: u64| (1..=12).map(|m| (b + m).to_string()).collect::<Vec<_>>().join(" ");
        let v = |b: u64| (1..=12).map(|m| format!("{}.5", b + m)).collect::<Vec<_>>().join(" ");
        vec![
            label.to_string(),
            "2024 Q".to_string(),
            q(base),
            "V".to_string(),
            v(base),
            "2025 Q".to_string(),
            q(base + 100),
            "V".to_string(),
            v(base + 100),
        ]
    }

    #[test]
    fn test_extract_records_across_pages() {
        let data = statement_pdf(&[block("Basmati Rice 1KG", 0), block("Sugar 2X5KG", 1000)]);

        let result = extract_records(&data, &SalesConfig::default()).unwrap();

        assert_eq!(result.records.len(), 48);
        assert_eq!(result.products, 2);
        assert_eq!(result.records[0].batch, "Basmati Rice 1KG 1KG");
        assert_eq!(result.records[0].quantity, 1);
        assert_eq!(result.records[24].weight_group, "5KG");
        assert_eq!(result.records[24].quantity, 1001);
        assert_eq!(result.records[47].quantity, 1112);
    }

    #[test]
    fn test_extract_records_rejects_invalid_bytes() {
        let err = extract_records(b"%PDF-garbage", &SalesConfig::default()).unwrap_err();
        assert!(matches!(err, SalesError::Document(DocumentError::Parse(_))));
    }
}
