//! Rule-based field extractors for product sales statements.

pub mod label;
pub mod numbers;
pub mod patterns;

pub use label::ProductLabel;
pub use numbers::{QuantityExtractor, ValueExtractor};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract all occurrences of the field, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
