//! Sales record models recovered from product sales statements.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Calendar month, serialized by its English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month number (1-12).
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Month for a number in 1..=12.
    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize).copied())
    }

    /// English month name.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// The month before this one, wrapping January to December.
    pub fn previous(self) -> Self {
        match self {
            Month::January => Month::December,
            other => Self::ALL[other as usize - 1],
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One month of sales for one product label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Label line as it appeared in the document.
    pub product: String,

    /// Normalized label including the weight token, used as a join key.
    pub batch: String,

    /// Size and unit token, e.g. "5KG".
    pub weight_group: String,

    /// Calendar month.
    pub month: Month,

    /// Month number (1-12).
    pub month_num: u32,

    /// Statement year.
    pub year: i32,

    /// Units sold, zero when missing from the statement.
    pub quantity: u64,

    /// Sales value, zero when missing from the statement.
    pub value: Decimal,
}

impl ProductRecord {
    /// Whether this record belongs to the given year and month.
    pub fn is_period(&self, year: i32, month: Month) -> bool {
        self.year == year && self.month == month
    }

    /// Join key shared by records of the same product across periods.
    pub fn key(&self) -> (&str, &str) {
        (&self.batch, &self.weight_group)
    }
}
