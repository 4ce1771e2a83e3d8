//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use gridsheet::config::SheetConfig;
use gridsheet::display::Viewport;
use gridsheet::document::{CellValue, Column, DataType, TableContent};
use gridsheet::render::Typeface;
use gridsheet::selection::Keystroke;
use gridsheet::sheet::Sheet;

pub const VIEWPORT: Viewport = Viewport::new(800, 600);

/// Sheet with default config and block glyphs, sized to [`VIEWPORT`]
pub fn test_sheet() -> Sheet {
    test_sheet_with(&SheetConfig::default())
}

pub fn test_sheet_with(config: &SheetConfig) -> Sheet {
    let mut sheet = Sheet::with_typeface(config, Typeface::Fallback, config.font_size);
    sheet.set_viewport(VIEWPORT.width, VIEWPORT.height);
    sheet
}

/// `columns` x `rows` integer table; headers `c1..cN`, value at
/// (c, r) is `r * 10 + c` (both 1-based).
pub fn numbers_table(columns: usize, rows: usize) -> TableContent {
    TableContent::new(
        (1..=columns)
            .map(|c| {
                let values = (1..=rows).map(|r| CellValue::Int((r * 10 + c) as i64)).collect();
                Column::new(format!("c{}", c), DataType::Int64, values)
            })
            .collect(),
    )
}

/// Sheet with a `columns` x `rows` numbers table (with header) at A1
pub fn sheet_with_table(columns: usize, rows: usize) -> Sheet {
    let mut sheet = test_sheet();
    sheet.add_table(numbers_table(columns, rows), true, 1, 1, "");
    sheet
}

pub fn key(text: &str) -> Keystroke {
    text.parse::<Keystroke>().unwrap()
}

/// Active cell as `(column, row)`
pub fn active(sheet: &Sheet) -> (usize, usize) {
    let cell = sheet.selection.current_active_cell;
    (cell.column, cell.row)
}

/// Cursor cell as `(column, row)`
pub fn cursor(sheet: &Sheet) -> (usize, usize) {
    let cell = sheet.selection.current_cursor_cell;
    (cell.column, cell.row)
}
