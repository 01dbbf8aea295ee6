//! Product label normalization.

use serde::{Deserialize, Serialize};

use super::patterns::{MULTI_UNIT, SINGLE_UNIT};

/// Size used when a label carries no upper-case size token.
const UNSPECIFIED_SIZE: &str = "UNSPEC";

/// Unit used when a label names no unit.
const DEFAULT_UNIT: &str = "KG";

/// A detected product label with its derived grouping keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLabel {
    /// Trimmed label line.
    pub product: String,
    /// Label followed by its weight token.
    pub batch: String,
    /// Weight token, e.g. "5KG".
    pub weight_group: String,
}

impl ProductLabel {
    /// Derive batch and weight group from a label line.
    ///
    /// Multi-unit labels ("2X5KG") take the per-unit size and default the
    /// unit to KG. Single-unit labels take the first size token. Labels with
    /// neither fall into the "UNSPECKG" group. Units are matched in upper
    /// case only.
    pub fn from_name(name: &str) -> Self {
        let (size, unit) = if let Some(caps) = MULTI_UNIT.captures(name) {
            let unit = caps
                .get(3)
                .map(|m| m.as_str().to_uppercase())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string());
            (caps[2].to_string(), unit)
        } else if let Some(caps) = SINGLE_UNIT.captures(name) {
            (caps[1].to_string(), caps[2].to_uppercase())
        } else {
            (UNSPECIFIED_SIZE.to_string(), DEFAULT_UNIT.to_string())
        };

        let weight_group = format!("{}{}", size, unit);

        Self {
            product: name.to_string(),
            batch: format!("{} {}", name, weight_group),
            weight_group,
        }
    }
}
