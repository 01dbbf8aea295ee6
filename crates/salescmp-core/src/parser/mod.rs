//! Sales record extraction from statement text lines.

mod scanner;
pub mod rules;

pub use scanner::{Layout, MONTHS_PER_SECTION, RECORDS_PER_BLOCK, ScanState, Scanner, Section};

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::models::config::ParserConfig;
use crate::models::record::ProductRecord;

/// Result of record extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted records, 24 per product block.
    pub records: Vec<ProductRecord>,
    /// Number of product blocks found.
    pub products: usize,
    /// Under-populated sections that were zero-filled.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Whether no product block was found.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trait for sales record parsing.
pub trait RecordParser {
    /// Parse records from a line sequence.
    fn parse<S: AsRef<str>>(&self, lines: &[S]) -> ExtractionResult;
}

/// Parser for two-year monthly product sales statements.
pub struct StatementParser {
    layout: Layout,
}

impl StatementParser {
    /// Create a parser for the default 2024/2025 layout.
    pub fn new() -> Self {
        Self::from_config(&ParserConfig::default())
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            layout: Layout {
                prior_year: config.prior_year,
                current_year: config.current_year,
                prior_quantity_marker: config.quantity_marker(config.prior_year),
                current_quantity_marker: config.quantity_marker(config.current_year),
                value_marker: config.value_marker.clone(),
            },
        }
    }

    /// Set the two statement years.
    pub fn with_years(mut self, prior_year: i32, current_year: i32) -> Self {
        let config = ParserConfig {
            prior_year,
            current_year,
            value_marker: self.layout.value_marker.clone(),
        };
        self.layout.prior_year = prior_year;
        self.layout.current_year = current_year;
        self.layout.prior_quantity_marker = config.quantity_marker(prior_year);
        self.layout.current_quantity_marker = config.quantity_marker(current_year);
        self
    }

    /// Set the value section marker.
    pub fn with_value_marker(mut self, marker: impl Into<String>) -> Self {
        self.layout.value_marker = marker.into();
        self
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser for StatementParser {
    fn parse<S: AsRef<str>>(&self, lines: &[S]) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing sales records from {} lines", lines.len());

        let (records, warnings) = Scanner::new(lines, &self.layout).run();
        let products = records.len() / RECORDS_PER_BLOCK;

        for warning in &warnings {
            warn!("{}", warning);
        }
        if records.is_empty() {
            warn!("No product lines found");
        }

        debug!("Extracted {} records for {} products", records.len(), products);

        ExtractionResult {
            records,
            products,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
