//! Landscape A4 PDF comparison report built with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use super::{
    COLUMN_COUNT, ReportRenderer, Result, SECTIONS, format_value, header_cells, row_cells, total_cells,
    value_column,
};
use crate::comparison::{Comparison, ComparisonTotals, Period};
use crate::error::ReportError;
use crate::models::config::ReportConfig;

/// Points per millimetre.
const MM: f32 = 72.0 / 25.4;

/// A4 landscape.
const PAGE_WIDTH: f32 = 841.89;
const PAGE_HEIGHT: f32 = 595.28;
const MARGIN: f32 = 10.0 * MM;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

type Rgb = (f32, f32, f32);

const BLACK: Rgb = (0.0, 0.0, 0.0);
const RED: Rgb = (1.0, 0.0, 0.0);
const GREY: Rgb = (0.5, 0.5, 0.5);
const LIGHT_GREY: Rgb = (0.827, 0.827, 0.827);
const WHITE_SMOKE: Rgb = (0.96, 0.96, 0.96);

/// Renders a comparison as a landscape PDF.
pub struct PdfReport {
    title: String,
    font_size: f32,
    highlight_minimum: bool,
}

impl PdfReport {
    pub fn new() -> Self {
        Self::from_config(&ReportConfig::default())
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            font_size: config.font_size,
            highlight_minimum: config.highlight_minimum,
        }
    }
}

impl Default for PdfReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for PdfReport {
    fn render(&self, comparison: &Comparison) -> Result<Vec<u8>> {
        let periods = &comparison.periods;
        let header = header_cells(periods);
        let mut widths = [20.0 * MM; COLUMN_COUNT];
        widths[0] = 65.0 * MM;

        let mut canvas = Canvas::new();

        for (basmati, title) in SECTIONS {
            let rows = comparison.rows_where(basmati);
            if basmati && rows.is_empty() {
                continue;
            }

            canvas.heading(title, 14.0);
            canvas.space(6.0);

            for (group, group_rows) in Comparison::group_by_weight(&rows) {
                canvas.heading(&format!("Weight Group: {}", group), 11.0);

                let mut table = Table::new(&widths, self.font_size);
                table.header = Some(header.clone());
                for row in &group_rows {
                    let mut red = [false; COLUMN_COUNT];
                    if self.highlight_minimum {
                        for period in Period::ALL {
                            red[value_column(period)] = row.min_value.is_set(period);
                        }
                    }
                    table.rows.push(TableRow {
                        cells: row_cells(row),
                        red,
                        shaded: false,
                    });
                }
                table.rows.push(TableRow {
                    cells: total_cells(&ComparisonTotals::of(group_rows.iter().copied())),
                    red: [false; COLUMN_COUNT],
                    shaded: true,
                });

                canvas.table(&table);
                canvas.space(18.0);
            }
        }

        let totals = comparison.grand_total();
        canvas.heading(
            &format!("Total Summary for {}", periods.label(Period::LastMonth)),
            14.0,
        );
        canvas.space(6.0);
        canvas.summary(
            &[
                ("Total Quantity Sold", totals.last_month.quantity.to_string()),
                ("Total Value", format_value(totals.last_month.value)),
            ],
            &[80.0 * MM, 30.0 * MM],
            10.0,
        );

        let pages = canvas.finish();
        debug!("Rendering report with {} pages", pages.len());
        write_document(pages, &self.title)
    }
}

struct TableRow {
    cells: [String; COLUMN_COUNT],
    red: [bool; COLUMN_COUNT],
    shaded: bool,
}

struct Table<'a> {
    widths: &'a [f32; COLUMN_COUNT],
    font_size: f32,
    header: Option<[String; COLUMN_COUNT]>,
    rows: Vec<TableRow>,
}

impl<'a> Table<'a> {
    fn new(widths: &'a [f32; COLUMN_COUNT], font_size: f32) -> Self {
        Self {
            widths,
            font_size,
            header: None,
            rows: Vec::new(),
        }
    }

    fn row_height(&self) -> f32 {
        self.font_size + 6.0
    }
}

/// Accumulates page content streams with a top-down cursor.
struct Canvas {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl Canvas {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure(&mut self, height: f32) {
        if self.y - height < MARGIN && !self.ops.is_empty() {
            self.new_page();
        }
    }

    fn space(&mut self, height: f32) {
        self.y -= height;
    }

    fn heading(&mut self, text: &str, size: f32) {
        // keep a heading together with at least one table row
        self.ensure(size * 1.2 + 30.0);
        self.y -= size * 1.2;
        self.text(MARGIN, self.y, text, BOLD, size, BLACK);
        self.y -= 4.0;
    }

    fn table(&mut self, table: &Table<'_>) {
        let height = table.row_height();
        let draw_header = |canvas: &mut Canvas| {
            if let Some(header) = &table.header {
                canvas.row(table.widths, header, &[false; COLUMN_COUNT], Some(GREY), WHITE_SMOKE, BOLD, table.font_size, height);
            }
        };

        self.ensure(height * 2.0);
        draw_header(self);
        for row in &table.rows {
            if self.y - height < MARGIN {
                self.new_page();
                draw_header(self);
            }
            let fill = row.shaded.then_some(LIGHT_GREY);
            self.row(table.widths, &row.cells, &row.red, fill, BLACK, REGULAR, table.font_size, height);
        }
    }

    fn summary(&mut self, rows: &[(&str, String)], widths: &[f32; 2], size: f32) {
        let height = size + 12.0;
        self.ensure(height * rows.len() as f32);
        for (i, (label, value)) in rows.iter().enumerate() {
            let fill = (i == 0).then_some(LIGHT_GREY);
            let font = if i == 0 { BOLD } else { REGULAR };
            let cells = [label.to_string(), value.clone()];
            self.row(widths, &cells, &[false; 2], fill, BLACK, font, size, height);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn row<const N: usize>(
        &mut self,
        widths: &[f32; N],
        cells: &[String; N],
        red: &[bool; N],
        fill: Option<Rgb>,
        color: Rgb,
        font: &str,
        size: f32,
        height: f32,
    ) {
        let top = self.y;
        let bottom = top - height;
        let mut x = MARGIN;

        for col in 0..N {
            let width = widths[col];

            if let Some(fill) = fill {
                self.ops.push(fill_color(fill));
                self.ops.push(Operation::new("re", reals(&[x, bottom, width, height])));
                self.ops.push(Operation::new("f", vec![]));
            }

            self.ops.push(Operation::new("w", reals(&[0.25])));
            self.ops.push(Operation::new("RG", reals(&[0.0, 0.0, 0.0])));
            self.ops.push(Operation::new("re", reals(&[x, bottom, width, height])));
            self.ops.push(Operation::new("S", vec![]));

            let text = fit(&cells[col], width - 4.0, size);
            let text_x = if col == 0 {
                x + 2.0
            } else {
                x + width - 2.0 - text_width(&text, size)
            };
            let text_color = if red[col] { RED } else { color };
            self.text(text_x, bottom + (height - size) / 2.0 + 1.0, &text, font, size, text_color);

            x += width;
        }

        self.y = bottom;
    }

    fn text(&mut self, x: f32, y: f32, text: &str, font: &str, size: f32, color: Rgb) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(fill_color(color));
        self.ops.push(Operation::new("Tf", vec![font.into(), Object::Real(size)]));
        self.ops.push(Operation::new("Td", reals(&[x, y])));
        self.ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| Object::Real(*v)).collect()
}

fn fill_color((r, g, b): Rgb) -> Operation {
    Operation::new("rg", reals(&[r, g, b]))
}

/// Approximate Helvetica advance width in points.
fn text_width(text: &str, size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            '0'..='9' => 0.556,
            '.' | ',' | ' ' | 'i' | 'l' | 'j' | 'I' => 0.278,
            '-' => 0.333,
            'm' | 'M' | 'W' => 0.833,
            'A'..='Z' => 0.667,
            _ => 0.5,
        })
        .sum();
    em * size
}

/// Truncate `text` with "..." so it fits within `width`.
fn fit(text: &str, width: f32, size: f32) -> String {
    if text_width(text, size) <= width {
        return text.to_string();
    }
    let mut out: String = text.to_string();
    while !out.is_empty() && text_width(&out, size) + text_width("...", size) > width {
        out.pop();
    }
    out.push_str("...");
    out
}

/// Encode text for a standard font with WinAnsiEncoding.
///
/// Combining marks left by NFKD are dropped and characters outside Latin-1
/// become '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| !('\u{300}'..='\u{36f}').contains(c))
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn write_document(pages: Vec<Vec<Operation>>, title: &str) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| ReportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => reals(&[0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT]),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(title)),
        "Producer" => Object::string_literal("salescmp"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ReportError::Write(e.to_string()))?;
    Ok(buffer)
}
