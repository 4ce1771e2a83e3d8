//! Axis-aligned rectangles in logical grid coordinates

use serde::{Deserialize, Serialize};

/// Rectangle of cells starting at `(column, row)` (1-based).
///
/// `right` and `bottom` are exclusive, so a box with a zero span on either
/// axis covers no cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub column: usize,
    pub row: usize,
    pub column_span: usize,
    pub row_span: usize,
}

impl BoundingBox {
    pub fn new(column: usize, row: usize, column_span: usize, row_span: usize) -> Self {
        Self {
            column,
            row,
            column_span,
            row_span,
        }
    }

    /// Box covering a single cell.
    pub fn cell(column: usize, row: usize) -> Self {
        Self::new(column, row, 1, 1)
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.column + self.column_span
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.row + self.row_span
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.column_span == 0 || self.row_span == 0
    }

    pub fn contains(&self, column: usize, row: usize) -> bool {
        !self.is_empty()
            && self.column <= column
            && column < self.right()
            && self.row <= row
            && row < self.bottom()
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.right() <= other.column
            || other.right() <= self.column
            || self.bottom() <= other.row
            || other.bottom() <= self.row)
    }

    /// Grow to cover `other`. An empty box takes `other`'s extent.
    pub fn expand(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
            return;
        }
        let column = self.column.min(other.column);
        let row = self.row.min(other.row);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        *self = BoundingBox::new(column, row, right - column, bottom - row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_edges() {
        let bbox = BoundingBox::new(2, 3, 4, 5);
        assert_eq!(bbox.right(), 6);
        assert_eq!(bbox.bottom(), 8);
    }

    #[test]
    fn test_contains_is_half_open() {
        let bbox = BoundingBox::new(2, 3, 2, 2);
        assert!(bbox.contains(2, 3));
        assert!(bbox.contains(3, 4));
        assert!(!bbox.contains(4, 3));
        assert!(!bbox.contains(2, 5));
        assert!(!bbox.contains(1, 3));
    }

    #[test]
    fn test_zero_span_contains_nothing() {
        let bbox = BoundingBox::new(1, 1, 0, 4);
        assert!(!bbox.contains(1, 1));
        assert!(!bbox.intersects(&BoundingBox::new(1, 1, 5, 5)));
    }

    #[test]
    fn test_intersection_symmetry() {
        let boxes = [
            BoundingBox::new(1, 1, 3, 3),
            BoundingBox::new(3, 3, 2, 2),
            BoundingBox::new(4, 1, 2, 2),
            BoundingBox::new(1, 4, 1, 1),
            BoundingBox::new(2, 2, 0, 0),
            BoundingBox::new(10, 10, 1, 1),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_adjacent_boxes_do_not_intersect() {
        let a = BoundingBox::new(1, 1, 3, 3);
        assert!(!a.intersects(&BoundingBox::new(4, 1, 2, 2)));
        assert!(!a.intersects(&BoundingBox::new(1, 4, 2, 2)));
        assert!(a.intersects(&BoundingBox::new(3, 3, 2, 2)));
    }

    #[test]
    fn test_expand() {
        let mut bbox = BoundingBox::default();
        bbox.expand(&BoundingBox::new(3, 3, 2, 2));
        assert_eq!(bbox, BoundingBox::new(3, 3, 2, 2));
        bbox.expand(&BoundingBox::cell(1, 7));
        assert_eq!(bbox, BoundingBox::new(1, 3, 4, 5));
        bbox.expand(&BoundingBox::new(9, 9, 0, 0));
        assert_eq!(bbox, BoundingBox::new(1, 3, 4, 5));
    }
}
