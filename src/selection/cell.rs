//! Selection rectangle descriptor

use serde::{Deserialize, Serialize};

/// Which part of the grid a range covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// The whole sheet (locator corner)
    Corner,
    /// Whole columns (top locator)
    Top,
    /// Whole rows (left locator)
    Left,
    #[default]
    Content,
}

/// Pixel geometry plus visual grid position of a selected rectangle.
///
/// A width, height or span of `-1` means "extends to the viewport edge"
/// and is resolved when drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetCell {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub column: usize,
    pub row: usize,
    pub column_span: i64,
    pub row_span: i64,
    pub right_to_left: bool,
    pub bottom_to_top: bool,
    pub ctype: CellType,
}

impl SheetCell {
    /// Whether the visual position lies inside this rectangle.
    pub fn contains(&self, column: usize, row: usize) -> bool {
        let within = |start: usize, span: i64, index: usize| {
            span < 0 || (start <= index && (index - start) < span as usize)
        };
        within(self.column, self.column_span, column) && within(self.row, self.row_span, row)
    }

    /// Nothing selected yet
    pub fn is_empty(&self) -> bool {
        self.column_span == 0 || self.row_span == 0
    }

    /// More than one cell selected
    pub fn is_range(&self) -> bool {
        self.column_span != 1 || self.row_span != 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_with_sentinels() {
        let top = SheetCell {
            column: 3,
            row: 0,
            column_span: 2,
            row_span: -1,
            ctype: CellType::Top,
            ..Default::default()
        };
        assert!(top.contains(3, 1000));
        assert!(top.contains(4, 1));
        assert!(!top.contains(5, 1));
        assert!(!top.contains(2, 1));
    }

    #[test]
    fn test_is_range() {
        let single = SheetCell {
            column: 1,
            row: 1,
            column_span: 1,
            row_span: 1,
            ..Default::default()
        };
        assert!(!single.is_range());
        assert!(!single.is_empty());
        assert!(SheetCell::default().is_empty());
        assert!(SheetCell {
            row_span: 2,
            ..single
        }
        .is_range());
    }
}
