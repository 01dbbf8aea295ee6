//! Month-over-month and year-over-year comparison of extracted records.

mod periods;

pub use periods::{Period, ReportPeriods};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::config::SalesConfig;
use crate::models::record::ProductRecord;
use crate::parser::rules::whole_word;

/// Quantity and value for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFigures {
    pub quantity: u64,
    pub value: Decimal,
}

impl PeriodFigures {
    fn of(record: Option<&ProductRecord>) -> Self {
        record
            .map(|r| Self {
                quantity: r.quantity,
                value: r.value,
            })
            .unwrap_or_default()
    }
}

/// Which of the three value figures equal the row minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinValueFlags {
    pub last_year: bool,
    pub before_last: bool,
    pub last_month: bool,
}

impl MinValueFlags {
    /// Flag every value equal to the minimum; ties flag all tied slots.
    pub fn from_values(last_year: Decimal, before_last: Decimal, last_month: Decimal) -> Self {
        let min = last_year.min(before_last).min(last_month);
        Self {
            last_year: last_year == min,
            before_last: before_last == min,
            last_month: last_month == min,
        }
    }

    /// Flag for a period.
    pub fn is_set(&self, period: Period) -> bool {
        match period {
            Period::LastYear => self.last_year,
            Period::BeforeLast => self.before_last,
            Period::LastMonth => self.last_month,
        }
    }
}

/// One batch compared across the three report periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub weight_group: String,
    pub batch: String,
    pub product: String,
    /// Same month of the prior year.
    pub last_year: PeriodFigures,
    /// Month before last, current year.
    pub before_last: PeriodFigures,
    /// Last month, current year.
    pub last_month: PeriodFigures,
    /// Last month minus the same month of the prior year.
    pub dly: i128,
    /// Last month minus the month before.
    pub dcy: i128,
    pub min_value: MinValueFlags,
    pub is_basmati: bool,
}

impl ComparisonRow {
    /// Figures for a period.
    pub fn figures(&self, period: Period) -> PeriodFigures {
        match period {
            Period::LastYear => self.last_year,
            Period::BeforeLast => self.before_last,
            Period::LastMonth => self.last_month,
        }
    }
}

/// Summed quantity and value for one period.
///
/// Quantities are widened so sums of `u64` figures cannot overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalFigures {
    pub quantity: u128,
    pub value: Decimal,
}

/// Column sums over a set of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTotals {
    pub last_year: TotalFigures,
    pub before_last: TotalFigures,
    pub last_month: TotalFigures,
    pub dly: i128,
    pub dcy: i128,
}

impl ComparisonTotals {
    /// Sum every numeric column; values are rounded to two decimals.
    ///
    /// Sums saturate at the type bounds instead of overflowing.
    pub fn of<'a>(rows: impl IntoIterator<Item = &'a ComparisonRow>) -> Self {
        let mut totals = Self::default();
        for row in rows {
            for (sum, figures) in [
                (&mut totals.last_year, row.last_year),
                (&mut totals.before_last, row.before_last),
                (&mut totals.last_month, row.last_month),
            ] {
                sum.quantity = sum.quantity.saturating_add(u128::from(figures.quantity));
                sum.value = sum.value.saturating_add(figures.value);
            }
            totals.dly = totals.dly.saturating_add(row.dly);
            totals.dcy = totals.dcy.saturating_add(row.dcy);
        }
        totals.last_year.value = totals.last_year.value.round_dp(2);
        totals.before_last.value = totals.before_last.value.round_dp(2);
        totals.last_month.value = totals.last_month.value.round_dp(2);
        totals
    }

    /// Figures for a period.
    pub fn figures(&self, period: Period) -> TotalFigures {
        match period {
            Period::LastYear => self.last_year,
            Period::BeforeLast => self.before_last,
            Period::LastMonth => self.last_month,
        }
    }
}

/// Comparison table for one reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub periods: ReportPeriods,
    /// Rows sorted by weight group, then batch.
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    /// Whether there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one product family.
    pub fn rows_where(&self, basmati: bool) -> Vec<&ComparisonRow> {
        self.rows.iter().filter(|r| r.is_basmati == basmati).collect()
    }

    /// Group rows by weight group, groups in sorted order.
    pub fn group_by_weight<'a>(rows: &[&'a ComparisonRow]) -> BTreeMap<&'a str, Vec<&'a ComparisonRow>> {
        let mut groups: BTreeMap<&str, Vec<&ComparisonRow>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.weight_group.as_str()).or_default().push(row);
        }
        groups
    }

    /// Totals over every row.
    pub fn grand_total(&self) -> ComparisonTotals {
        ComparisonTotals::of(&self.rows)
    }

    /// Suggested file name for the rendered PDF report.
    pub fn report_file_name(&self) -> String {
        format!("{}_comparison_report.pdf", self.periods.last_month)
    }
}

/// Builds comparisons from extracted records.
pub struct ComparisonBuilder {
    prior_year: i32,
    current_year: i32,
    basmati: Regex,
}

impl ComparisonBuilder {
    /// Create a builder with default years and Basmati keyword.
    pub fn new() -> Self {
        Self::from_config(&SalesConfig::default())
    }

    /// Create a builder from configuration.
    pub fn from_config(config: &SalesConfig) -> Self {
        Self {
            prior_year: config.parser.prior_year,
            current_year: config.parser.current_year,
            basmati: whole_word(&config.report.basmati_keyword),
        }
    }

    /// Report periods for a reference date.
    pub fn periods(&self, reference_date: NaiveDate) -> ReportPeriods {
        ReportPeriods::from_reference_date(reference_date, self.prior_year, self.current_year)
    }

    /// Compare last month against the month before and the same month a year earlier.
    ///
    /// Rows come from the current year's last-month records. Records of the
    /// other two periods are joined on (batch, weight group); missing matches
    /// count as zero and multiple matches yield one row per combination.
    pub fn build(&self, records: &[ProductRecord], reference_date: NaiveDate) -> Comparison {
        let periods = self.periods(reference_date);
        info!(
            "Comparing {} {} against {} {} and {} {}",
            periods.last_month,
            periods.current_year,
            periods.before_last,
            periods.current_year,
            periods.prior_year_month,
            periods.prior_year
        );

        let in_period = |period: Period| {
            let (year, month) = periods.year_month(period);
            records
                .iter()
                .filter(move |r| r.is_period(year, month))
                .collect::<Vec<_>>()
        };

        let base = in_period(Period::LastMonth);
        let before_last = in_period(Period::BeforeLast);
        let last_year = in_period(Period::LastYear);

        let mut rows = Vec::with_capacity(base.len());
        for record in base {
            for bl in matches(&before_last, record) {
                for ly in matches(&last_year, record) {
                    rows.push(self.row(record, bl, ly));
                }
            }
        }

        rows.sort_by(|a, b| {
            a.weight_group
                .cmp(&b.weight_group)
                .then_with(|| a.batch.cmp(&b.batch))
        });

        debug!("Built {} comparison rows", rows.len());

        Comparison { periods, rows }
    }

    fn row(
        &self,
        record: &ProductRecord,
        before_last: Option<&ProductRecord>,
        last_year: Option<&ProductRecord>,
    ) -> ComparisonRow {
        let last_month = PeriodFigures::of(Some(record));
        let before_last = PeriodFigures::of(before_last);
        let last_year = PeriodFigures::of(last_year);

        ComparisonRow {
            weight_group: record.weight_group.clone(),
            batch: record.batch.clone(),
            product: record.product.clone(),
            dly: i128::from(last_month.quantity) - i128::from(last_year.quantity),
            dcy: i128::from(last_month.quantity) - i128::from(before_last.quantity),
            min_value: MinValueFlags::from_values(last_year.value, before_last.value, last_month.value),
            is_basmati: self.basmati.is_match(&record.batch),
            last_year,
            before_last,
            last_month,
        }
    }
}

impl Default for ComparisonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Records sharing the join key of `record`, or a single `None` when there are none.
fn matches<'a>(candidates: &[&'a ProductRecord], record: &ProductRecord) -> Vec<Option<&'a ProductRecord>> {
    let found: Vec<Option<&ProductRecord>> = candidates
        .iter()
        .filter(|c| c.key() == record.key())
        .map(|c| Some(*c))
        .collect();
    if found.is_empty() { vec![None] } else { found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Month;
    use crate::parser::{RecordParser, StatementParser};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn block(label: &str, q24: u64, q25: u64) -> Vec<String> {
        let q = |base: u64| (1..=12).map(|m| (base + m).to_string()).collect::<Vec<_>>().join(" ");
        let v = |base: u64| (1..=12).map(|m| format!("{}.5", base + m)).collect::<Vec<_>>().join(" ");
        vec![
            label.to_string(),
            "2024 Q".to_string(),
            q(q24),
            "V".to_string(),
            v(q24),
            "2025 Q".to_string(),
            q(q25),
            "V".to_string(),
            v(q25),
        ]
    }

    fn july() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
    }

    #[test]
    fn test_build_comparison() {
        let mut lines = block("Royal Basmati 5KG", 100, 200);
        lines.extend(block("Sugar 1KG", 10, 0));
        let records = StatementParser::new().parse(&lines).records;

        let comparison = ComparisonBuilder::new().build(&records, july());

        assert_eq!(comparison.periods.last_month, Month::June);
        assert_eq!(comparison.periods.before_last, Month::May);
        assert_eq!(comparison.rows.len(), 2);

        // sorted by weight group: "1KG" before "5KG"
        let sugar = &comparison.rows[0];
        assert_eq!(sugar.weight_group, "1KG");
        assert!(!sugar.is_basmati);
        assert_eq!(sugar.last_month.quantity, 6);
        assert_eq!(sugar.before_last.quantity, 5);
        assert_eq!(sugar.last_year.quantity, 16);
        assert_eq!(sugar.dly, -10);
        assert_eq!(sugar.dcy, 1);

        let basmati = &comparison.rows[1];
        assert!(basmati.is_basmati);
        assert_eq!(basmati.last_month.value, dec("206.5"));
        assert_eq!(basmati.dly, 100);
        assert_eq!(
            basmati.min_value,
            MinValueFlags { last_year: true, before_last: false, last_month: false }
        );
    }

    #[test]
    fn test_unmatched_join_is_zero_filled() {
        let records = StatementParser::new().parse(&block("Tea 250G", 1, 1)).records;
        let current_only: Vec<ProductRecord> = records
            .into_iter()
            .filter(|r| r.year == 2025 && r.month == Month::June)
            .collect();

        let comparison = ComparisonBuilder::new().build(&current_only, july());

        assert_eq!(comparison.rows.len(), 1);
        let row = &comparison.rows[0];
        assert_eq!(row.before_last, PeriodFigures::default());
        assert_eq!(row.last_year, PeriodFigures::default());
        assert_eq!(row.dly, 7);
        assert_eq!(row.dcy, 7);
        assert_eq!(
            row.min_value,
            MinValueFlags { last_year: true, before_last: true, last_month: false }
        );
    }

    #[test]
    fn test_duplicate_batches_multiply() {
        let mut lines = block("Rice 1KG", 1, 1);
        lines.extend(block("Rice 1KG", 2, 2));
        let records = StatementParser::new().parse(&lines).records;

        let comparison = ComparisonBuilder::new().build(&records, july());

        // 2 base rows x 2 before-last matches x 2 last-year matches
        assert_eq!(comparison.rows.len(), 8);
    }

    #[test]
    fn test_min_value_ties_flag_all() {
        let flags = MinValueFlags::from_values(dec("1.0"), dec("1.00"), dec("2.0"));
        assert!(flags.last_year && flags.before_last && !flags.last_month);

        let flags = MinValueFlags::from_values(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        assert!(flags.last_year && flags.before_last && flags.last_month);
    }

    #[test]
    fn test_totals_and_file_name() {
        let mut lines = block("Rice 1KG", 0, 0);
        lines.extend(block("Basmati Rice 1KG", 0, 10));
        let records = StatementParser::new().parse(&lines).records;
        let comparison = ComparisonBuilder::new().build(&records, july());

        let totals = comparison.grand_total();
        assert_eq!(totals.last_month.quantity, 6 + 16);
        assert_eq!(totals.last_month.value, dec("23.00"));
        assert_eq!(comparison.report_file_name(), "June_comparison_report.pdf");

        let groups = Comparison::group_by_weight(&comparison.rows_where(true));
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["1KG"]);
    }

    #[test]
    fn test_extreme_quantities_do_not_overflow() {
        let mut lines = block("Rice 1KG", 0, 0);
        lines.extend(block("Tea 1KG 1KG", 0, 0));
        let mut records = StatementParser::new().parse(&lines).records;
        for record in records.iter_mut() {
            if record.month == Month::June {
                record.quantity = if record.year == 2025 { u64::MAX } else { 1 };
            }
        }

        let comparison = ComparisonBuilder::new().build(&records, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());

        assert_eq!(comparison.rows.len(), 2);
        for row in &comparison.rows {
            assert_eq!(row.dly, i128::from(u64::MAX) - 1);
            assert_eq!(row.dcy, i128::from(u64::MAX) - 5);
        }

        let totals = comparison.grand_total();
        assert_eq!(totals.last_month.quantity, 2 * u128::from(u64::MAX));
        assert_eq!(totals.last_year.quantity, 2);
        assert_eq!(totals.dly, 2 * (i128::from(u64::MAX) - 1));
    }

    #[test]
    fn test_value_totals_saturate() {
        let mut records = StatementParser::new().parse(&block("Rice 1KG", 0, 0)).records;
        records.extend(records.clone());
        for record in records.iter_mut() {
            record.value = Decimal::MAX;
        }

        let totals = ComparisonBuilder::new().build(&records, july()).grand_total();
        assert_eq!(totals.last_month.value, Decimal::MAX.round_dp(2));
    }

    #[test]
    fn test_no_records_no_rows() {
        let comparison = ComparisonBuilder::new().build(&[], july());
        assert!(comparison.is_empty());
        assert_eq!(comparison.grand_total(), ComparisonTotals::default());
    }
}
