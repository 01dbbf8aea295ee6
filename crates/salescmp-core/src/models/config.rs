//! Configuration structures for the extraction and reporting pipeline.

use serde::{Deserialize, Serialize};

use crate::error::SalesError;

/// Main configuration for the salescmp pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    /// Record parser configuration.
    pub parser: ParserConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Report configuration.
    pub report: ReportConfig,
}

/// Record parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Year of the first quantity/value section in each block.
    pub prior_year: i32,

    /// Year of the second quantity/value section in each block.
    pub current_year: i32,

    /// Prefix of the line that opens a value section.
    pub value_marker: String,
}

impl ParserConfig {
    /// Prefix of the line that opens the quantity section for `year`.
    pub fn quantity_marker(&self, year: i32) -> String {
        format!("{} Q", year)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            prior_year: 2024,
            current_year: 2025,
            value_marker: "V".to_string(),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Apply NFKD normalization to extracted page text.
    pub normalize_unicode: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
        }
    }
}

/// Comparison report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Whole word that marks a batch as Basmati (case-insensitive).
    pub basmati_keyword: String,

    /// Print the lowest of the three value figures in red.
    pub highlight_minimum: bool,

    /// Table font size in points.
    pub font_size: f32,

    /// Report title.
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            basmati_keyword: "BASMATI".to_string(),
            highlight_minimum: true,
            font_size: 8.0,
            title: "Dynamic Quantity & Value Comparison".to_string(),
        }
    }
}

impl SalesConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values the parser and renderer cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |msg: String| Err(SalesError::Config(msg));

        if self.parser.prior_year >= self.parser.current_year {
            return invalid(format!(
                "parser.prior_year ({}) must be before parser.current_year ({})",
                self.parser.prior_year, self.parser.current_year
            ));
        }
        if self.parser.value_marker.trim().is_empty() {
            return invalid("parser.value_marker must not be empty".to_string());
        }
        if self.report.basmati_keyword.trim().is_empty() {
            return invalid("report.basmati_keyword must not be empty".to_string());
        }
        if !(4.0..=24.0).contains(&self.report.font_size) {
            return invalid(format!(
                "report.font_size must be between 4 and 24, got {}",
                self.report.font_size
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SalesConfig =
            serde_json::from_str(r#"{"parser": {"current_year": 2026}}"#).unwrap();

        assert_eq!(config.parser.current_year, 2026);
        assert_eq!(config.parser.prior_year, 2024);
        assert_eq!(config.parser.value_marker, "V");
        assert!(config.pdf.normalize_unicode);
        assert_eq!(config.report.basmati_keyword, "BASMATI");
    }

    #[test]
    fn test_validate() {
        assert!(SalesConfig::default().validate().is_ok());

        let mut config = SalesConfig::default();
        config.parser.prior_year = 2025;
        assert!(matches!(config.validate(), Err(SalesError::Config(_))));

        let mut config = SalesConfig::default();
        config.parser.value_marker = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = SalesConfig::default();
        config.report.font_size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quantity_marker() {
        let parser = ParserConfig::default();
        assert_eq!(parser.quantity_marker(2024), "2024 Q");
    }
}
