//! Forward-only state machine that recovers product blocks from text lines.
//!
//! A block is a product label line followed, in order, by a "<prior> Q"
//! header, its quantity figures, a value header, its value figures, a
//! "<current> Q" header, its quantity figures, a value header and its value
//! figures. Anything between these markers is skipped, so the scanner
//! tolerates line wrapping and stray text from the PDF text dump.
//!
//! The value header is the first line starting with the value marker after a
//! quantity section. A stray line with that prefix is taken as the header and
//! shifts the rest of the block.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::rules::{FieldExtractor, ProductLabel, QuantityExtractor, ValueExtractor, WEIGHT_TOKEN};
use crate::models::record::{Month, ProductRecord};

/// Number of monthly figures in each section.
pub const MONTHS_PER_SECTION: usize = 12;

/// Records emitted per product block (12 months for two years).
pub const RECORDS_PER_BLOCK: usize = MONTHS_PER_SECTION * 2;

/// One numeric section of a product block, in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PriorQuantity,
    PriorValue,
    CurrentQuantity,
    CurrentValue,
}

impl Section {
    /// The section following this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Section::PriorQuantity => Some(Section::PriorValue),
            Section::PriorValue => Some(Section::CurrentQuantity),
            Section::CurrentQuantity => Some(Section::CurrentValue),
            Section::CurrentValue => None,
        }
    }

    fn is_quantity(self) -> bool {
        matches!(self, Section::PriorQuantity | Section::CurrentQuantity)
    }
}

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for a product label line.
    SeekProduct,
    /// Skipping lines until the header of a section.
    SeekHeader(Section),
    /// Accumulating figures for a section.
    Collect(Section),
    /// All sections read; records for the block are due.
    Emit,
    /// Input exhausted.
    Done,
}

/// Section markers and years of one statement layout.
#[derive(Debug, Clone)]
pub struct Layout {
    pub prior_year: i32,
    pub current_year: i32,
    pub prior_quantity_marker: String,
    pub current_quantity_marker: String,
    pub value_marker: String,
}

impl Layout {
    fn marker(&self, section: Section) -> &str {
        match section {
            Section::PriorQuantity => &self.prior_quantity_marker,
            Section::CurrentQuantity => &self.current_quantity_marker,
            Section::PriorValue | Section::CurrentValue => &self.value_marker,
        }
    }
}

/// Figures accumulated for the product currently being read.
#[derive(Debug, Clone, Default)]
struct Block {
    label: String,
    prior_quantities: Vec<u64>,
    prior_values: Vec<Decimal>,
    current_quantities: Vec<u64>,
    current_values: Vec<Decimal>,
}

impl Block {
    fn new(label: String) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    fn collected(&self, section: Section) -> usize {
        match section {
            Section::PriorQuantity => self.prior_quantities.len(),
            Section::PriorValue => self.prior_values.len(),
            Section::CurrentQuantity => self.current_quantities.len(),
            Section::CurrentValue => self.current_values.len(),
        }
    }

    fn push_line(&mut self, section: Section, line: &str) {
        match section {
            Section::PriorQuantity => self
                .prior_quantities
                .extend(QuantityExtractor.extract_all(line)),
            Section::CurrentQuantity => self
                .current_quantities
                .extend(QuantityExtractor.extract_all(line)),
            Section::PriorValue => self.prior_values.extend(ValueExtractor.extract_all(line)),
            Section::CurrentValue => self.current_values.extend(ValueExtractor.extract_all(line)),
        }
    }
}

/// Cursor-based scanner over a line sequence.
pub struct Scanner<'a, S: AsRef<str>> {
    lines: &'a [S],
    layout: &'a Layout,
    cursor: usize,
    state: ScanState,
    block: Option<Block>,
    records: Vec<ProductRecord>,
    warnings: Vec<String>,
}

impl<'a, S: AsRef<str>> Scanner<'a, S> {
    pub fn new(lines: &'a [S], layout: &'a Layout) -> Self {
        Self {
            lines,
            layout,
            cursor: 0,
            state: ScanState::SeekProduct,
            block: None,
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Run to completion, returning the records and any under-population warnings.
    pub fn run(mut self) -> (Vec<ProductRecord>, Vec<String>) {
        while self.step() != ScanState::Done {}
        (self.records, self.warnings)
    }

    fn line(&self) -> Option<&'a str> {
        self.lines.get(self.cursor).map(AsRef::as_ref)
    }

    /// Perform one transition and return the new state.
    pub fn step(&mut self) -> ScanState {
        self.state = self.transition();
        self.state
    }

    fn transition(&mut self) -> ScanState {
        match self.state {
            ScanState::SeekProduct => {
                let Some(line) = self.line() else {
                    return ScanState::Done;
                };
                let line = line.trim();
                self.cursor += 1;
                if WEIGHT_TOKEN.is_match(line) {
                    trace!("Product line at {}: {}", self.cursor - 1, line);
                    self.block = Some(Block::new(line.to_string()));
                    ScanState::SeekHeader(Section::PriorQuantity)
                } else {
                    ScanState::SeekProduct
                }
            }
            ScanState::SeekHeader(section) => {
                let Some(line) = self.line() else {
                    return ScanState::Collect(section);
                };
                self.cursor += 1;
                if line.trim().starts_with(self.layout.marker(section)) {
                    ScanState::Collect(section)
                } else {
                    ScanState::SeekHeader(section)
                }
            }
            ScanState::Collect(section) => {
                let full = self
                    .block
                    .as_ref()
                    .is_none_or(|b| b.collected(section) >= MONTHS_PER_SECTION);
                match self.line() {
                    Some(line) if !full => {
                        if let Some(block) = self.block.as_mut() {
                            block.push_line(section, line);
                        }
                        self.cursor += 1;
                        ScanState::Collect(section)
                    }
                    _ => match section.next() {
                        Some(next) => ScanState::SeekHeader(next),
                        None => ScanState::Emit,
                    },
                }
            }
            ScanState::Emit => {
                if let Some(block) = self.block.take() {
                    self.emit(block);
                }
                ScanState::SeekProduct
            }
            ScanState::Done => ScanState::Done,
        }
    }

    fn emit(&mut self, block: Block) {
        for section in [
            Section::PriorQuantity,
            Section::PriorValue,
            Section::CurrentQuantity,
            Section::CurrentValue,
        ] {
            let found = block.collected(section);
            if found < MONTHS_PER_SECTION {
                let year = match section {
                    Section::PriorQuantity | Section::PriorValue => self.layout.prior_year,
                    Section::CurrentQuantity | Section::CurrentValue => self.layout.current_year,
                };
                let kind = if section.is_quantity() { "quantities" } else { "values" };
                self.warnings.push(format!(
                    "{}: found {} of {} {} {}, remaining months set to zero",
                    block.label, found, MONTHS_PER_SECTION, year, kind
                ));
            }
        }

        let label = ProductLabel::from_name(&block.label);
        debug!(
            "Emitting block for {} (batch {}, group {}) at line {}",
            label.product,
            label.batch,
            label.weight_group,
            self.cursor()
        );

        for (idx, month) in Month::ALL.into_iter().enumerate() {
            self.records.push(record(
                &label,
                month,
                self.layout.prior_year,
                block.prior_quantities.get(idx).copied().unwrap_or(0),
                block.prior_values.get(idx).copied().unwrap_or(Decimal::ZERO),
            ));
            self.records.push(record(
                &label,
                month,
                self.layout.current_year,
                block.current_quantities.get(idx).copied().unwrap_or(0),
                block.current_values.get(idx).copied().unwrap_or(Decimal::ZERO),
            ));
        }
    }
}

fn record(label: &ProductLabel, month: Month, year: i32, quantity: u64, value: Decimal) -> ProductRecord {
    ProductRecord {
        product: label.product.clone(),
        batch: label.batch.clone(),
        weight_group: label.weight_group.clone(),
        month,
        month_num: month.number(),
        year,
        quantity,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout {
            prior_year: 2024,
            current_year: 2025,
            prior_quantity_marker: "2024 Q".to_string(),
            current_quantity_marker: "2025 Q".to_string(),
            value_marker: "V".to_string(),
        }
    }

    #[test]
    fn test_section_order() {
        assert_eq!(Section::PriorQuantity.next(), Some(Section::PriorValue));
        assert_eq!(Section::PriorValue.next(), Some(Section::CurrentQuantity));
        assert_eq!(Section::CurrentQuantity.next(), Some(Section::CurrentValue));
        assert_eq!(Section::CurrentValue.next(), None);
    }

    #[test]
    fn test_transitions_through_block() {
        let layout = layout();
        let lines = ["header", "Rice 1KG", "noise", "2024 Q", "1 2 3 4 5 6 7 8 9 10 11 12"];
        let mut scanner = Scanner::new(&lines, &layout);

        assert_eq!(scanner.step(), ScanState::SeekProduct);
        assert_eq!(scanner.step(), ScanState::SeekHeader(Section::PriorQuantity));

        // noise is discarded, header consumed
        assert_eq!(scanner.step(), ScanState::SeekHeader(Section::PriorQuantity));
        assert_eq!(scanner.step(), ScanState::Collect(Section::PriorQuantity));
        assert_eq!(scanner.cursor(), 4);

        assert_eq!(scanner.step(), ScanState::Collect(Section::PriorQuantity));
        assert_eq!(scanner.cursor(), 5);
        assert_eq!(scanner.step(), ScanState::SeekHeader(Section::PriorValue));
    }

    #[test]
    fn test_empty_input_is_done() {
        let layout = layout();
        let lines: [&str; 0] = [];
        let mut scanner = Scanner::new(&lines, &layout);
        assert_eq!(scanner.step(), ScanState::Done);
    }

    #[test]
    fn test_truncated_block_still_emits() {
        let layout = layout();
        let lines = ["Rice 1KG", "2024 Q", "1 2 3"];
        let (records, warnings) = Scanner::new(&lines, &layout).run();

        assert_eq!(records.len(), RECORDS_PER_BLOCK);
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("found 3 of 12 2024 quantities"));
    }
}
