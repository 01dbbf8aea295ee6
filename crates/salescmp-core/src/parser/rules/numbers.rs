//! Monthly quantity and value figures.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use super::FieldExtractor;
use super::patterns::{DECIMAL, INTEGER};

/// Extracts every digit run as a quantity.
pub struct QuantityExtractor;

impl QuantityExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for QuantityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for QuantityExtractor {
    type Output = u64;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INTEGER
            .find_iter(text)
            .map(|m| {
                // a digit run only fails to parse by overflowing; keep its slot
                m.as_str().parse::<u64>().unwrap_or_else(|e| {
                    trace!("Saturating quantity {:?}: {}", m.as_str(), e);
                    u64::MAX
                })
            })
            .collect()
    }
}

/// Extracts every `digits.digits` run as a sales value.
///
/// Integers without a decimal point are not values; a line such as
/// "Total 12" contributes nothing to a value section.
pub struct ValueExtractor;

impl ValueExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ValueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ValueExtractor {
    type Output = Decimal;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DECIMAL
            .find_iter(text)
            .map(|m| {
                Decimal::from_str(m.as_str()).unwrap_or_else(|e| {
                    trace!("Saturating value {:?}: {}", m.as_str(), e);
                    Decimal::MAX
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_from_line() {
        let extractor = QuantityExtractor::new();
        assert_eq!(extractor.extract_all("10 20  30\t40"), vec![10, 20, 30, 40]);
        assert_eq!(extractor.extract_all("Jan 7 Feb 9"), vec![7, 9]);
    }

    #[test]
    fn test_quantities_split_decimals() {
        let extractor = QuantityExtractor::new();
        assert_eq!(extractor.extract_all("1.5"), vec![1, 5]);
    }

    #[test]
    fn test_quantities_empty_line() {
        let extractor = QuantityExtractor::new();
        assert!(extractor.extract_all("   ").is_empty());
        assert!(extractor.extract_all("no figures").is_empty());
    }

    #[test]
    fn test_values_require_decimal_point() {
        let extractor = ValueExtractor::new();
        let values = extractor.extract_all("1.0 2 3.25 x 4.");
        assert_eq!(values, vec![Decimal::new(10, 1), Decimal::new(325, 2)]);
    }

    #[test]
    fn test_values_keep_precision() {
        let extractor = ValueExtractor::new();
        let values = extractor.extract_all("12.10");
        assert_eq!(values[0].to_string(), "12.10");
    }

    #[test]
    fn test_oversized_quantity_keeps_its_slot() {
        let extractor = QuantityExtractor::new();
        assert_eq!(
            extractor.extract_all("999999999999999999999 20 30"),
            vec![u64::MAX, 20, 30]
        );
    }

    #[test]
    fn test_oversized_value_keeps_its_slot() {
        let extractor = ValueExtractor::new();
        let values = extractor.extract_all("99999999999999999999999999999999.5 2.5");
        assert_eq!(values, vec![Decimal::MAX, Decimal::new(25, 1)]);
    }

    #[test]
    fn test_only_ascii_digits_are_figures() {
        // Arabic-Indic twelve, not folded by NFKD
        let extractor = QuantityExtractor::new();
        assert_eq!(extractor.extract_all("\u{661}\u{662} 30"), vec![30]);
    }
}
