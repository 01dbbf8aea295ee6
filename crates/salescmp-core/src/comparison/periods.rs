//! Report periods derived from a reference date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::record::Month;

/// One of the three compared periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Same month as `LastMonth`, prior year.
    LastYear,
    /// The month before `LastMonth`, current year.
    BeforeLast,
    /// The month before the reference date's month, current year.
    LastMonth,
}

impl Period {
    /// Periods in report column order.
    pub const ALL: [Period; 3] = [Period::LastYear, Period::BeforeLast, Period::LastMonth];
}

/// The months and years a comparison reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriods {
    pub reference_date: NaiveDate,
    pub last_month: Month,
    pub before_last: Month,
    pub prior_year_month: Month,
    pub current_year: i32,
    pub prior_year: i32,
}

impl ReportPeriods {
    /// Derive the report months from `reference_date`.
    ///
    /// Statements cover exactly two years, so the years are those of the
    /// statement layout, not of the reference date: a January reference date
    /// still reports December of `current_year`.
    pub fn from_reference_date(reference_date: NaiveDate, prior_year: i32, current_year: i32) -> Self {
        let current = Month::from_number(reference_date.month()).unwrap_or(Month::January);
        let last_month = current.previous();

        Self {
            reference_date,
            last_month,
            before_last: last_month.previous(),
            prior_year_month: last_month,
            current_year,
            prior_year,
        }
    }

    /// Year and month of a period.
    pub fn year_month(&self, period: Period) -> (i32, Month) {
        match period {
            Period::LastYear => (self.prior_year, self.prior_year_month),
            Period::BeforeLast => (self.current_year, self.before_last),
            Period::LastMonth => (self.current_year, self.last_month),
        }
    }

    /// Column label such as "June 2025".
    pub fn label(&self, period: Period) -> String {
        let (year, month) = self.year_month(period);
        format!("{} {}", month, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods(year: i32, month: u32) -> ReportPeriods {
        let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        ReportPeriods::from_reference_date(date, 2024, 2025)
    }

    #[test]
    fn test_mid_year() {
        let p = periods(2025, 7);
        assert_eq!(p.last_month, Month::June);
        assert_eq!(p.before_last, Month::May);
        assert_eq!(p.prior_year_month, Month::June);
        assert_eq!(p.label(Period::LastYear), "June 2024");
        assert_eq!(p.label(Period::LastMonth), "June 2025");
    }

    #[test]
    fn test_year_wrap() {
        let p = periods(2026, 1);
        assert_eq!(p.last_month, Month::December);
        assert_eq!(p.before_last, Month::November);
        assert_eq!(p.year_month(Period::LastMonth), (2025, Month::December));

        let p = periods(2025, 2);
        assert_eq!(p.last_month, Month::January);
        assert_eq!(p.before_last, Month::December);
    }
}
