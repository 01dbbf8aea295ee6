//! Comparison report rendering.

mod pdf;
mod text;

pub use pdf::PdfReport;
pub use text::TextReport;

use rust_decimal::Decimal;

use crate::comparison::{Comparison, ComparisonRow, ComparisonTotals, Period, ReportPeriods};
use crate::error::ReportError;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Trait for report renderers.
pub trait ReportRenderer {
    /// Render the comparison as a document.
    fn render(&self, comparison: &Comparison) -> Result<Vec<u8>>;
}

/// Number of columns in a comparison table.
pub(crate) const COLUMN_COUNT: usize = 9;

/// Section titles in report order; Basmati comes last.
pub(crate) const SECTIONS: [(bool, &str); 2] = [
    (false, "Non-Basmati Product Comparison"),
    (true, "Basmati Product Comparison"),
];

/// Table header: batch, three quantities, DLY, DCY, three values.
pub(crate) fn header_cells(periods: &ReportPeriods) -> [String; COLUMN_COUNT] {
    let q = |p| format!("Q {}", periods.label(p));
    let v = |p| format!("V {}", periods.label(p));
    [
        "Batch".to_string(),
        q(Period::LastYear),
        q(Period::BeforeLast),
        q(Period::LastMonth),
        "DLY".to_string(),
        "DCY".to_string(),
        v(Period::LastYear),
        v(Period::BeforeLast),
        v(Period::LastMonth),
    ]
}

pub(crate) fn row_cells(row: &ComparisonRow) -> [String; COLUMN_COUNT] {
    figure_cells(
        row.batch.clone(),
        |p| (u128::from(row.figures(p).quantity), row.figures(p).value),
        row.dly,
        row.dcy,
    )
}

pub(crate) fn total_cells(totals: &ComparisonTotals) -> [String; COLUMN_COUNT] {
    figure_cells(
        "TOTAL".to_string(),
        |p| (totals.figures(p).quantity, totals.figures(p).value),
        totals.dly,
        totals.dcy,
    )
}

fn figure_cells(
    label: String,
    figures: impl Fn(Period) -> (u128, Decimal),
    dly: i128,
    dcy: i128,
) -> [String; COLUMN_COUNT] {
    let [ly, bl, lm] = Period::ALL.map(&figures);
    [
        label,
        ly.0.to_string(),
        bl.0.to_string(),
        lm.0.to_string(),
        dly.to_string(),
        dcy.to_string(),
        format_value(ly.1),
        format_value(bl.1),
        format_value(lm.1),
    ]
}

/// Format a value with two decimals.
pub fn format_value(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Value column index for a period.
pub(crate) fn value_column(period: Period) -> usize {
    match period {
        Period::LastYear => 6,
        Period::BeforeLast => 7,
        Period::LastMonth => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Decimal::from_str("12.1").unwrap()), "12.10");
        assert_eq!(format_value(Decimal::from_str("3.456").unwrap()), "3.46");
        assert_eq!(format_value(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_total_cells() {
        let totals = ComparisonTotals {
            dly: -3,
            dcy: 4,
            ..Default::default()
        };
        let cells = total_cells(&totals);
        assert_eq!(cells[0], "TOTAL");
        assert_eq!(cells[4], "-3");
        assert_eq!(cells[5], "4");
        assert_eq!(cells[8], "0.00");
    }

    #[test]
    fn test_total_cells_beyond_u64() {
        let mut totals = ComparisonTotals {
            dly: i128::from(u64::MAX) * 2,
            ..Default::default()
        };
        totals.last_month.quantity = u128::from(u64::MAX) + 1;
        let cells = total_cells(&totals);
        assert_eq!(cells[3], "18446744073709551616");
        assert_eq!(cells[4], "36893488147419103230");
    }
}
