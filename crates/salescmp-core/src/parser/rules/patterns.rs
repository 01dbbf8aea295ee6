//! Common regex patterns for sales statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Product label detection: optional pack count, size, unit as a whole word
    pub static ref WEIGHT_TOKEN: Regex = Regex::new(
        r"(?i)\b(?:\d+X)?\d+(?:\.\d+)?(?:KG|G|GR)\b"
    ).unwrap();

    // Multi-unit label, e.g. "2X5KG" (unit optional, upper case only)
    pub static ref MULTI_UNIT: Regex = Regex::new(
        r"(\d+)[Xx](\d+(?:\.\d+)?)(KG|G|GR)?"
    ).unwrap();

    // Single-unit label, e.g. "1KG" (upper case only)
    pub static ref SINGLE_UNIT: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)(KG|G|GR)"
    ).unwrap();

    // Monthly quantity figures
    pub static ref INTEGER: Regex = Regex::new(
        r"[0-9]+"
    ).unwrap();

    // Monthly value figures
    pub static ref DECIMAL: Regex = Regex::new(
        r"[0-9]+\.[0-9]+"
    ).unwrap();
}

/// Build a case-insensitive whole-word matcher for `keyword`.
pub fn whole_word(keyword: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))
        .unwrap_or_else(|_| Regex::new(r"$^").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_token_matches_labels() {
        assert!(WEIGHT_TOKEN.is_match("Basmati Rice 1KG"));
        assert!(WEIGHT_TOKEN.is_match("Sugar 2X5KG"));
        assert!(WEIGHT_TOKEN.is_match("Tea 500g"));
        assert!(WEIGHT_TOKEN.is_match("Spice 250GR pouch"));
        assert!(WEIGHT_TOKEN.is_match("Flour 2.5kg"));
    }

    #[test]
    fn test_weight_token_requires_word_boundary() {
        assert!(!WEIGHT_TOKEN.is_match("2024 Q"));
        assert!(!WEIGHT_TOKEN.is_match("10 20 30 40"));
        assert!(!WEIGHT_TOKEN.is_match("Product 5KGS"));
        assert!(!WEIGHT_TOKEN.is_match("SKU5KG"));
    }

    #[test]
    fn test_whole_word() {
        let re = whole_word("BASMATI");
        assert!(re.is_match("Royal basmati Rice 5KG"));
        assert!(!re.is_match("BASMATIRICE 5KG"));
    }
}
