//! Tables: named rectangular blocks of typed columns

use super::bbox::BoundingBox;
use super::value::{CellValue, DataType};
use std::sync::atomic::{AtomicU64, Ordering};

/// Column name shown while a table is still materializing
pub const LOADING_COLUMN: &str = "#LOADING!";
/// Column name shown when materialization failed
pub const ERROR_COLUMN: &str = "#ERROR!";

/// Stable identity of a table, independent of its position in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u64);

impl TableId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        TableId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DataType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DataType, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Build a column whose type is derived from its values.
    pub fn from_values(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let dtype = common_type(&values);
        Self::new(name, dtype, values)
    }

    /// Build a column from raw text, inferring one type for all cells.
    ///
    /// Mixed integer/float columns widen to float; any other mix falls
    /// back to text so no cell loses its original spelling.
    pub fn from_text(name: impl Into<String>, cells: &[String]) -> Self {
        let inferred: Vec<CellValue> = cells.iter().map(|c| CellValue::infer(c)).collect();
        match common_type(&inferred) {
            DataType::Text => Column::new(
                name,
                DataType::Text,
                cells
                    .iter()
                    .map(|c| {
                        if c.is_empty() {
                            CellValue::Null
                        } else {
                            CellValue::Text(c.clone())
                        }
                    })
                    .collect(),
            ),
            DataType::Float64 => Column::new(
                name,
                DataType::Float64,
                inferred
                    .into_iter()
                    .map(|v| match v {
                        CellValue::Int(i) => CellValue::Float(i as f64),
                        other => other,
                    })
                    .collect(),
            ),
            dtype => Column::new(name, dtype, inferred),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn common_type(values: &[CellValue]) -> DataType {
    let mut common = DataType::Null;
    for value in values {
        let dtype = value.data_type();
        common = match (common, dtype) {
            (_, DataType::Null) => common,
            (DataType::Null, _) => dtype,
            (a, b) if a == b => a,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                DataType::Float64
            }
            _ => return DataType::Text,
        };
    }
    common
}

/// Materialized column data of a table.
///
/// All columns have the same length; shorter columns are padded with nulls
/// on construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableContent {
    columns: Vec<Column>,
}

impl TableContent {
    pub fn new(mut columns: Vec<Column>) -> Self {
        let height = columns.iter().map(Column::len).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(height, CellValue::Null);
        }
        Self { columns }
    }

    /// Content with a header row and rows of raw text, types inferred.
    pub fn from_text_rows(header: &[String], rows: &[Vec<String>]) -> Self {
        let width = header
            .len()
            .max(rows.iter().map(Vec::len).max().unwrap_or(0));
        let mut names: Vec<String> = Vec::with_capacity(width);
        let columns = (0..width)
            .map(|c| {
                let requested = header.get(c).cloned().unwrap_or_default();
                let name = super::naming::unique_name("column", &names, &requested, "", "_");
                names.push(name.clone());
                let cells: Vec<String> = rows
                    .iter()
                    .map(|row| row.get(c).cloned().unwrap_or_default())
                    .collect();
                Column::from_text(name, &cells)
            })
            .collect();
        Self::new(columns)
    }

    /// A zero-row table with a single marker column.
    pub fn marker(name: &str) -> Self {
        Self::new(vec![Column::new(name, DataType::Null, Vec::new())])
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&CellValue> {
        self.columns.get(column)?.values.get(row)
    }

    pub fn set(&mut self, column: usize, row: usize, value: CellValue) -> bool {
        let Some(slot) = self
            .columns
            .get_mut(column)
            .and_then(|c| c.values.get_mut(row))
        else {
            return false;
        };
        *slot = value;
        true
    }

    pub fn rename_column(&mut self, column: usize, name: String) -> bool {
        match self.columns.get_mut(column) {
            Some(c) => {
                c.name = name;
                true
            }
            None => false,
        }
    }

    /// Upgrade an all-null column to the type of its first real value.
    pub fn set_column_type(&mut self, column: usize, dtype: DataType) {
        if let Some(c) = self.columns.get_mut(column) {
            c.dtype = dtype;
        }
    }

    /// Insert a column at `index`, padding or truncating it to the table height.
    pub fn insert_column(&mut self, index: usize, mut column: Column) {
        let height = self.height();
        if !self.columns.is_empty() {
            column.values.resize(height, CellValue::Null);
        }
        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
    }

    pub fn replace_column(&mut self, index: usize, mut column: Column) -> bool {
        let height = self.height();
        let Some(slot) = self.columns.get_mut(index) else {
            return false;
        };
        column.values.resize(height, CellValue::Null);
        *slot = column;
        true
    }

    pub fn remove_column(&mut self, index: usize) -> Option<Column> {
        (index < self.columns.len()).then(|| self.columns.remove(index))
    }

    /// Row indices of the first `head` and last `tail` rows, without repeats.
    pub fn sample_rows(&self, head: usize, tail: usize) -> Vec<usize> {
        let height = self.height();
        let mut rows: Vec<usize> = (0..height.min(head)).collect();
        let tail_start = height.saturating_sub(tail).max(rows.len());
        rows.extend(tail_start..height);
        rows
    }
}

/// Result of reading one table position
#[derive(Debug, Clone, PartialEq)]
pub enum TableCell<'a> {
    Header(&'a Column),
    Data(&'a Column, &'a CellValue),
    /// Inside the box but past the content (placeholder rows)
    Missing,
}

/// A positioned, named table
#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub content: TableContent,
    pub with_header: bool,
    /// Content is still loading or failed to load
    pub placeholder: bool,
    pub error_message: Option<String>,
    pub bbox: BoundingBox,
}

impl Table {
    pub fn new(
        name: String,
        content: TableContent,
        with_header: bool,
        column: usize,
        row: usize,
    ) -> Self {
        let bbox = Self::bbox_for(&content, with_header, column, row);
        Self {
            id: TableId::next(),
            name,
            content,
            with_header,
            placeholder: false,
            error_message: None,
            bbox,
        }
    }

    /// Box occupied by `content` placed at `(column, row)`.
    pub fn bbox_for(content: &TableContent, with_header: bool, column: usize, row: usize) -> BoundingBox {
        BoundingBox::new(
            column,
            row,
            content.width(),
            content.height() + usize::from(with_header),
        )
    }

    /// Recompute the box after the content changed. Returns whether the
    /// size differs from before.
    pub fn refit(&mut self) -> bool {
        let bbox = Self::bbox_for(&self.content, self.with_header, self.bbox.column, self.bbox.row);
        let changed = bbox != self.bbox;
        self.bbox = bbox;
        changed
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        !self.placeholder
    }

    /// Table-relative column index of a logical column.
    pub fn column_index(&self, column: usize) -> Option<usize> {
        (self.bbox.column <= column && column < self.bbox.right()).then(|| column - self.bbox.column)
    }

    /// Content row index of a logical row, `None` for the header row.
    pub fn row_index(&self, row: usize) -> Option<usize> {
        let first = self.bbox.row + usize::from(self.with_header);
        (first <= row && row < self.bbox.bottom()).then(|| row - first)
    }

    pub fn is_header_row(&self, row: usize) -> bool {
        self.with_header && row == self.bbox.row
    }

    pub fn cell(&self, column: usize, row: usize) -> TableCell<'_> {
        let Some(c) = self.column_index(column) else {
            return TableCell::Missing;
        };
        let Some(col) = self.content.column(c) else {
            return TableCell::Missing;
        };
        if self.is_header_row(row) {
            return TableCell::Header(col);
        }
        match self.row_index(row).and_then(|r| col.values.get(r)) {
            Some(value) => TableCell::Data(col, value),
            None => TableCell::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_type_inference() {
        assert_eq!(Column::from_text("a", &strings(&["1", "2", ""])).dtype, DataType::Int64);
        assert_eq!(Column::from_text("a", &strings(&["1", "2.5"])).dtype, DataType::Float64);
        let mixed = Column::from_text("a", &strings(&["1", "x"]));
        assert_eq!(mixed.dtype, DataType::Text);
        assert_eq!(mixed.values[0], CellValue::text("1"));
        assert_eq!(Column::from_text("a", &strings(&["", ""])).dtype, DataType::Null);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let content = TableContent::from_text_rows(
            &strings(&["a", "b"]),
            &[strings(&["1", "2", "3"]), strings(&["4"])],
        );
        assert_eq!(content.width(), 3);
        assert_eq!(content.height(), 2);
        assert_eq!(content.column_names(), strings(&["a", "b", "column_1"]));
        assert_eq!(content.get(1, 1), Some(&CellValue::Null));
    }

    #[test]
    fn test_bbox_counts_header_row() {
        let content = TableContent::from_text_rows(&strings(&["a"]), &[strings(&["1"]), strings(&["2"])]);
        let table = Table::new("T".into(), content.clone(), true, 3, 4);
        assert_eq!(table.bbox, BoundingBox::new(3, 4, 1, 3));
        let table = Table::new("T".into(), content, false, 3, 4);
        assert_eq!(table.bbox, BoundingBox::new(3, 4, 1, 2));
    }

    #[test]
    fn test_cell_lookup() {
        let content = TableContent::from_text_rows(&strings(&["a", "b"]), &[strings(&["1", "x"])]);
        let table = Table::new("T".into(), content, true, 2, 2);
        assert!(matches!(table.cell(3, 2), TableCell::Header(c) if c.name == "b"));
        assert!(matches!(table.cell(2, 3), TableCell::Data(_, CellValue::Int(1))));
        assert_eq!(table.cell(4, 3), TableCell::Missing);
    }

    #[test]
    fn test_sample_rows() {
        let column = Column::new("a", DataType::Int64, (0..10).map(CellValue::Int).collect());
        let content = TableContent::new(vec![column]);
        assert_eq!(content.sample_rows(3, 2), vec![0, 1, 2, 8, 9]);
        assert_eq!(content.sample_rows(50, 50), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(TableId::next(), TableId::next());
    }
}
