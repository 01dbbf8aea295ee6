//! Plain-text comparison report for terminals.

use std::fmt::Write;

use super::{
    COLUMN_COUNT, ReportRenderer, Result, SECTIONS, format_value, header_cells, row_cells, total_cells,
    value_column,
};
use crate::comparison::{Comparison, ComparisonTotals, Period};

/// Renders a comparison as aligned text tables.
pub struct TextReport {
    /// Mark the lowest value figure of each row with '*'.
    mark_minimum: bool,
}

impl TextReport {
    pub fn new() -> Self {
        Self { mark_minimum: true }
    }

    pub fn with_minimum_marks(mut self, mark: bool) -> Self {
        self.mark_minimum = mark;
        self
    }

    /// Render to a string.
    pub fn render_string(&self, comparison: &Comparison) -> String {
        let mut out = String::new();
        let periods = &comparison.periods;
        let header = header_cells(periods);

        let _ = writeln!(
            out,
            "Comparison for {} vs Previous Periods",
            periods.label(Period::LastMonth)
        );

        for (basmati, title) in SECTIONS {
            let rows = comparison.rows_where(basmati);
            if basmati && rows.is_empty() {
                continue;
            }

            let _ = writeln!(out, "\n{}", title);
            let _ = writeln!(out, "{}", "=".repeat(title.len()));

            for (group, group_rows) in Comparison::group_by_weight(&rows) {
                let mut table: Vec<[String; COLUMN_COUNT]> = vec![header.clone()];
                for row in &group_rows {
                    let mut cells = row_cells(row);
                    if self.mark_minimum {
                        for period in Period::ALL {
                            if row.min_value.is_set(period) {
                                cells[value_column(period)].push('*');
                            }
                        }
                    }
                    table.push(cells);
                }
                table.push(total_cells(&ComparisonTotals::of(group_rows.iter().copied())));

                let _ = writeln!(out, "\nWeight Group: {}", group);
                write_table(&mut out, &table);
            }
        }

        let totals = comparison.grand_total();
        let _ = writeln!(
            out,
            "\nTotal Summary for {}",
            periods.label(Period::LastMonth)
        );
        let _ = writeln!(out, "  Total Quantity Sold: {}", totals.last_month.quantity);
        let _ = writeln!(out, "  Total Value:         {}", format_value(totals.last_month.value));

        out
    }
}

impl Default for TextReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TextReport {
    fn render(&self, comparison: &Comparison) -> Result<Vec<u8>> {
        Ok(self.render_string(comparison).into_bytes())
    }
}

fn write_table(out: &mut String, table: &[[String; COLUMN_COUNT]]) {
    let mut widths = [0usize; COLUMN_COUNT];
    for row in table {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for (i, row) in table.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(col, (cell, width))| {
                if col == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            let _ = writeln!(out, "{}", rule.join("-+-"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::ComparisonBuilder;
    use crate::parser::{RecordParser, StatementParser};
    use chrono::NaiveDate;

    fn comparison() -> Comparison {
        let lines = vec![
            "Basmati Rice 1KG",
            "2024 Q",
            "10 20 30 40 50 60 70 80 90 100 110 120",
            "V",
            "1.0 2.0 3.0 4.0 5.0 6.0 7.0 8.0 9.0 10.0 11.0 12.0",
            "2025 Q",
            "11 21 31 41 51 61 71 81 91 101 111 121",
            "V",
            "1.1 2.1 3.1 4.1 5.1 6.1 7.1 8.1 9.1 10.1 11.1 12.1",
        ];
        let records = StatementParser::new().parse(&lines).records;
        ComparisonBuilder::new().build(&records, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
    }

    #[test]
    fn test_text_report_sections() {
        let text = TextReport::new().render_string(&comparison());

        assert!(text.starts_with("Comparison for June 2025 vs Previous Periods"));
        assert!(text.contains("Non-Basmati Product Comparison"));
        assert!(text.contains("Basmati Product Comparison"));
        assert!(text.contains("Weight Group: 1KG"));
        assert!(text.contains("Q June 2024"));
        assert!(text.contains("V May 2025"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("Total Quantity Sold: 61"));
        assert!(text.contains("Total Value:         6.10"));
    }

    #[test]
    fn test_minimum_marked() {
        let text = TextReport::new().render_string(&comparison());
        // May 2025 (5.10) is the lowest of 6.00, 5.10, 6.10
        assert!(text.contains("5.10*"));
        assert!(!text.contains("6.10*"));

        let plain = TextReport::new().with_minimum_marks(false).render_string(&comparison());
        assert!(!plain.contains('*'));
    }

    #[test]
    fn test_empty_comparison_reports_zero_totals() {
        let empty = ComparisonBuilder::new().build(&[], NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let bytes = TextReport::new().render(&empty).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Non-Basmati Product Comparison"));
        assert!(!text.contains("Weight Group"));
        assert!(text.contains("Total Quantity Sold: 0"));
    }
}
