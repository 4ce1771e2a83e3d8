//! Spreadsheet-style cell names
//!
//! Columns use bijective base-26 letters (`A` = 1 … `Z` = 26, `AA` = 27) and
//! rows use 1-based decimal numbers. A part with only letters names a whole
//! column (`"H"` → row 0), a part with only digits names a whole row
//! (`"5"` → column 0).

use std::fmt;

/// Highest addressable row
pub const MAX_ROW: usize = 1_000_000_000;

/// Highest addressable column (`"BDWGN"`)
pub const MAX_COLUMN: usize = 1_000_000;

/// Why a cell name could not be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellNameErrorKind {
    /// Text does not match `[A-Za-z]*\d*(:[A-Za-z]*\d*)?`
    Malformed,
    /// No cell exists to the left of column `A`
    BeyondLeftEdge,
    /// No cell exists above row 1
    BeyondTopEdge,
}

/// Error returned for cell names that cannot be resolved to a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellNameError {
    pub input: String,
    pub kind: CellNameErrorKind,
}

impl CellNameError {
    fn new(input: &str, kind: CellNameErrorKind) -> Self {
        Self {
            input: input.to_string(),
            kind,
        }
    }
}

impl fmt::Display for CellNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CellNameErrorKind::Malformed => write!(f, "unparseable cell name: {:?}", self.input),
            CellNameErrorKind::BeyondLeftEdge => {
                write!(f, "no cell to the left of {}", self.input)
            }
            CellNameErrorKind::BeyondTopEdge => write!(f, "no cell above {}", self.input),
        }
    }
}

impl std::error::Error for CellNameError {}

/// A parsed `(column, row)` pair of positions, start first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub column_1: usize,
    pub row_1: usize,
    pub column_2: usize,
    pub row_2: usize,
}

impl CellRange {
    pub fn single(column: usize, row: usize) -> Self {
        Self {
            column_1: column,
            row_1: row,
            column_2: column,
            row_2: row,
        }
    }
}

/// Format a 1-based column index as letters. Column 0 formats as `"A"`.
pub fn column_name(column: usize) -> String {
    if column == 0 {
        return "A".to_string();
    }
    let mut letters = Vec::new();
    let mut n = column;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Format a position as a cell name. Row 0 names the whole column.
pub fn cell_name(column: usize, row: usize) -> String {
    if row == 0 {
        return column_name(column);
    }
    format!("{}{}", column_name(column), row)
}

fn letters_to_column(letters: &str) -> Option<usize> {
    letters.bytes().try_fold(0usize, |acc, b| {
        let digit = (b.to_ascii_uppercase() - b'A' + 1) as usize;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Parse one side of a name (`"AA12"`, `"H"`, `"5"`) into `(column, row)`.
pub fn parse_cell_position(name: &str) -> Result<(usize, usize), CellNameError> {
    let malformed = || CellNameError::new(name, CellNameErrorKind::Malformed);

    let split = name
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(name.len());
    let (letters, digits) = name.split_at(split);

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let column = || {
        letters_to_column(letters)
            .filter(|&c| c <= MAX_COLUMN)
            .ok_or_else(malformed)
    };
    let row = || {
        digits
            .parse::<usize>()
            .ok()
            .filter(|&r| r <= MAX_ROW)
            .ok_or_else(malformed)
    };

    match (letters.is_empty(), digits.is_empty()) {
        (true, true) => Err(malformed()),
        (false, true) => Ok((column()?, 0)),
        (true, false) => Ok((0, row()?)),
        (false, false) => Ok((column()?, row()?)),
    }
}

/// Parse a single cell or a range (`"A1"`, `"A1:B10"`, `"5:10"`, `"H:H"`).
///
/// A single cell yields a degenerate range where both corners are equal.
/// An empty right-hand side (`"A1:"`) is treated as a single cell.
pub fn parse_cell_range(name: &str) -> Result<CellRange, CellNameError> {
    let malformed = || CellNameError::new(name, CellNameErrorKind::Malformed);

    let mut parts = name.splitn(2, ':');
    let start = parts.next().unwrap_or_default();
    let end = parts.next().unwrap_or_default();

    let (column_1, row_1) = parse_cell_position(start).map_err(|_| malformed())?;
    if end.is_empty() {
        return Ok(CellRange::single(column_1, row_1));
    }
    let (column_2, row_2) = parse_cell_position(end).map_err(|_| malformed())?;

    Ok(CellRange {
        column_1,
        row_1,
        column_2,
        row_2,
    })
}

fn parse_full_cell(name: &str) -> Result<(usize, usize), CellNameError> {
    match parse_cell_position(name) {
        Ok((column, row)) if column > 0 && row > 0 => Ok((column, row)),
        _ => Err(CellNameError::new(name, CellNameErrorKind::Malformed)),
    }
}

/// Name of the cell one column to the right (`"Z1"` → `"AA1"`).
pub fn right_cell_name(name: &str) -> Result<String, CellNameError> {
    let (column, row) = parse_full_cell(name)?;
    Ok(cell_name(column + 1, row))
}

/// Name of the cell one column to the left (`"AA1"` → `"Z1"`).
pub fn left_cell_name(name: &str) -> Result<String, CellNameError> {
    let (column, row) = parse_full_cell(name)?;
    if column == 1 {
        return Err(CellNameError::new(name, CellNameErrorKind::BeyondLeftEdge));
    }
    Ok(cell_name(column - 1, row))
}

/// Name of the cell one row above.
pub fn above_cell_name(name: &str) -> Result<String, CellNameError> {
    let (column, row) = parse_full_cell(name)?;
    if row == 1 {
        return Err(CellNameError::new(name, CellNameErrorKind::BeyondTopEdge));
    }
    Ok(cell_name(column, row - 1))
}

/// Name of the cell one row below.
pub fn below_cell_name(name: &str) -> Result<String, CellNameError> {
    let (column, row) = parse_full_cell(name)?;
    Ok(cell_name(column, row + 1))
}
