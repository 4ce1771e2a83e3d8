//! Tabular document model
//!
//! A [`Document`] holds positioned [`Table`]s plus a sparse map of loose
//! cells, and keeps one bounding box covering all of them. Tables are kept
//! in insertion order; lookups by position scan from the newest table so
//! the most recently added table wins where two overlap.
//!
//! Every mutation bumps [`Document::revision`], which renderers compare
//! against to drop cached pixels.

pub mod bbox;
pub mod import;
pub mod loader;
pub mod naming;
pub mod table;
pub mod value;

pub use bbox::BoundingBox;
pub use import::{Delimiter, ImportError};
pub use loader::{Loaded, Loader, TableSource};
pub use table::{Column, Table, TableCell, TableContent, TableId, ERROR_COLUMN, LOADING_COLUMN};
pub use value::{CellValue, DataType, Opaque, Temporal};

use crate::display::Display;
use naming::unique_name;
use std::collections::HashMap;
use std::time::Duration;

/// Outcome of a document edit, reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOperation {
    CreateTable,
    UpdateTable,
    UpdateTableHeader,
    UpdateTableContent,
    UpdateTableCell,
    UpdateTableRange,
    UpdateTableColumns,
    UpdateTableRows,
    DeleteTable,
    DeleteTableColumns,
    DeleteTableRows,
    InsertSparse,
    UpdateSparse,
    DeleteSparse,
    DoNothing,
}

impl SheetOperation {
    pub fn changed(self) -> bool {
        self != SheetOperation::DoNothing
    }
}

/// Input accepted by [`Document::create_table`]
#[derive(Debug)]
pub enum TableInput {
    /// Already materialized columns
    Content(TableContent),
    /// Tab-separated text with a header line
    Text(String),
    /// Content produced later, possibly on a worker thread
    Deferred(TableSource),
}

impl From<TableContent> for TableInput {
    fn from(content: TableContent) -> Self {
        TableInput::Content(content)
    }
}

impl From<TableSource> for TableInput {
    fn from(source: TableSource) -> Self {
        TableInput::Deferred(source)
    }
}

impl From<&str> for TableInput {
    fn from(text: &str) -> Self {
        TableInput::Text(text.to_string())
    }
}

impl From<String> for TableInput {
    fn from(text: String) -> Self {
        TableInput::Text(text)
    }
}

/// Value and type tag at one position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellRead {
    pub value: CellValue,
    /// `None` for empty positions and header cells
    pub dtype: Option<DataType>,
}

impl CellRead {
    /// Type tag as shown to the user; empty when there is none.
    pub fn dtype_name(&self) -> &'static str {
        self.dtype.map(DataType::name).unwrap_or("")
    }
}

/// Where a table's filter button sits on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterAnchor {
    pub table: TableId,
    /// Visual column of the header cell
    pub column: usize,
    /// Logical header row
    pub row: usize,
    pub x: i64,
    pub y: i64,
}

/// Width of a header filter button in pixels
pub const FILTER_BUTTON_WIDTH: i64 = 18;

#[derive(Debug, Default)]
pub struct Document {
    tables: Vec<Table>,
    /// Loose cells keyed by `(row, column)`
    sparse: HashMap<(usize, usize), CellValue>,
    bbox: BoundingBox,
    loader: Loader,
    revision: u64,
    /// Run deferred sources inline instead of on a worker thread
    pub prefer_sync: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from positioned tables and sparse values.
    /// Positions are `(column, row)`, 1-based.
    pub fn with_content(
        tables: Vec<((usize, usize), TableContent)>,
        sparse: Vec<((usize, usize), CellValue)>,
    ) -> Self {
        let mut document = Self::new();
        for ((column, row), content) in tables {
            document.create_table(content, true, column, row, "");
        }
        for ((column, row), value) in sparse {
            if !value.is_null() {
                document.sparse.insert((row, column), value);
            }
        }
        document.recompute_bounding_box();
        document
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    pub fn sparse_value(&self, column: usize, row: usize) -> Option<&CellValue> {
        self.sparse.get(&(row, column))
    }

    /// Sparse entries as `((column, row), value)`, in no particular order.
    pub fn sparse_cells(&self) -> impl Iterator<Item = ((usize, usize), &CellValue)> {
        self.sparse
            .iter()
            .map(|(&(row, column), value)| ((column, row), value))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_data(&self) -> bool {
        !self.tables.is_empty() || !self.sparse.is_empty()
    }

    /// Loads still running in the background
    pub fn pending_loads(&self) -> usize {
        self.loader.pending()
    }

    /// Signal a structural change that is not a content edit.
    pub fn cleanup(&mut self) {
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Value and type tag at a logical position.
    pub fn read(&self, column: usize, row: usize) -> CellRead {
        let Some(table) = self.table_by_position(column, row) else {
            return match self.sparse.get(&(row, column)) {
                Some(value) => CellRead {
                    value: value.clone(),
                    dtype: Some(value.data_type()),
                },
                None => CellRead::default(),
            };
        };

        match table.cell(column, row) {
            TableCell::Header(col) => CellRead {
                value: CellValue::Text(col.name.clone()),
                dtype: None,
            },
            TableCell::Data(col, value) => CellRead {
                value: value.clone(),
                dtype: Some(col.dtype),
            },
            TableCell::Missing => CellRead::default(),
        }
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().rev().find(|t| t.name == name)
    }

    pub fn table_index_by_name(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }

    pub fn table_index_by_id(&self, id: TableId) -> Option<usize> {
        self.tables.iter().position(|t| t.id == id)
    }

    pub fn table_index_by_position(&self, column: usize, row: usize) -> Option<usize> {
        self.tables.iter().rposition(|t| t.bbox.contains(column, row))
    }

    pub fn table_by_position(&self, column: usize, row: usize) -> Option<&Table> {
        self.table_index_by_position(column, row)
            .map(|index| &self.tables[index])
    }

    /// Table at a position together with the name of the column there.
    pub fn table_column_by_position(&self, column: usize, row: usize) -> Option<(&Table, &str)> {
        let table = self.table_by_position(column, row)?;
        let index = table.column_index(column)?;
        let name = table.content.column(index)?.name.as_str();
        Some((table, name))
    }

    /// All tables overlapping `target`, oldest first.
    pub fn intersecting_tables(&self, target: &BoundingBox) -> Vec<&Table> {
        self.tables
            .iter()
            .filter(|t| t.bbox.intersects(target))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Table lifecycle
    // -----------------------------------------------------------------------

    /// Add a table at `(column, row)` and return its index.
    ///
    /// Text input is parsed as TSV and always has a header. Deferred input
    /// inserts a placeholder right away; the real content replaces it when
    /// [`Document::poll_loaded`] picks up the result.
    pub fn create_table(
        &mut self,
        input: impl Into<TableInput>,
        with_header: bool,
        column: usize,
        row: usize,
        name: &str,
    ) -> usize {
        let column = column.max(1);
        let row = row.max(1);
        let mut with_header = with_header;
        let mut deferred = None;
        let mut failure = None;

        let content = match input.into() {
            TableInput::Content(content) => content,
            TableInput::Text(text) => {
                with_header = true;
                import::parse_tsv(&text).unwrap_or_else(|e| {
                    tracing::warn!("pasted text is not valid TSV: {}", e);
                    TableContent::from_text_rows(&[], &fallback_rows(&text))
                })
            }
            TableInput::Deferred(source) if self.prefer_sync => match source.run() {
                Ok(content) => content,
                Err(e) => {
                    failure = Some(e);
                    TableContent::marker(ERROR_COLUMN)
                }
            },
            TableInput::Deferred(source) => {
                deferred = Some(source);
                TableContent::marker(LOADING_COLUMN)
            }
        };

        let names: Vec<String> = self.tables.iter().map(|t| t.name.clone()).collect();
        let name = unique_name("Table", &names, name, "", "");

        let mut table = Table::new(name, content, with_header, column, row);
        table.placeholder = deferred.is_some() || failure.is_some();
        if let Some(message) = failure {
            tracing::warn!("table {} failed to load: {}", table.name, message);
            table.error_message = Some(message);
        }

        let bbox = table.bbox;
        let id = table.id;
        tracing::debug!("create table {} at {:?}", table.name, bbox);
        self.tables.push(table);
        self.expand_bounding_box(&bbox);
        self.touch();

        if let Some(source) = deferred {
            self.loader.spawn(id, source);
        }
        self.tables.len() - 1
    }

    /// Swap in new content for a table, keeping its name and position.
    ///
    /// The table gets a fresh identity, so a load still running for the old
    /// one is discarded when it arrives.
    pub fn replace_table(&mut self, content: TableContent, index: usize) -> SheetOperation {
        let Some(old) = self.tables.get(index) else {
            return SheetOperation::DoNothing;
        };
        let resized =
            content.width() != old.content.width() || content.height() != old.content.height();

        let replacement = Table::new(
            old.name.clone(),
            content,
            old.with_header,
            old.bbox.column,
            old.bbox.row,
        );
        self.tables[index] = replacement;

        if resized {
            self.recompute_bounding_box();
        }
        self.touch();
        SheetOperation::UpdateTable
    }

    pub fn delete_table(&mut self, index: usize) -> SheetOperation {
        if index >= self.tables.len() {
            return SheetOperation::DoNothing;
        }
        let table = self.tables.remove(index);
        tracing::debug!("delete table {}", table.name);
        self.recompute_bounding_box();
        self.touch();
        SheetOperation::DeleteTable
    }

    /// Replace the column named `column_name`, or insert `column` right
    /// after it when the names differ.
    pub fn update_table_column(
        &mut self,
        column: Column,
        index: usize,
        column_name: &str,
    ) -> SheetOperation {
        let Some(table) = self.tables.get_mut(index) else {
            return SheetOperation::DoNothing;
        };
        let names = table.content.column_names();
        let Some(position) = names.iter().position(|n| n == column_name) else {
            return SheetOperation::DoNothing;
        };
        if column.len() != table.content.height() {
            return SheetOperation::DoNothing;
        }

        let inserting = column.name != column_name;
        if inserting {
            if names.contains(&column.name) {
                return SheetOperation::DoNothing;
            }
            table.content.insert_column(position + 1, column);
            table.refit();
            let bbox = table.bbox;
            self.expand_bounding_box(&bbox);
        } else {
            table.content.replace_column(position, column);
        }
        self.touch();

        if inserting {
            SheetOperation::UpdateTableColumns
        } else {
            SheetOperation::UpdateTableContent
        }
    }

    pub fn delete_table_column(&mut self, index: usize, column_name: &str) -> SheetOperation {
        let Some(table) = self.tables.get_mut(index) else {
            return SheetOperation::DoNothing;
        };
        let Some(position) = table
            .content
            .columns()
            .iter()
            .position(|c| c.name == column_name)
        else {
            return SheetOperation::DoNothing;
        };
        table.content.remove_column(position);
        table.refit();
        self.recompute_bounding_box();
        self.touch();
        SheetOperation::DeleteTableColumns
    }

    /// Insert `count` empty rows before content row `at`.
    pub fn insert_table_rows(&mut self, index: usize, at: usize, count: usize) -> SheetOperation {
        let Some(table) = self.tables.get_mut(index) else {
            return SheetOperation::DoNothing;
        };
        if count == 0 || at > table.content.height() || table.placeholder {
            return SheetOperation::DoNothing;
        }
        let columns = table
            .content
            .columns()
            .iter()
            .map(|c| {
                let mut values = c.values.clone();
                values.splice(at..at, std::iter::repeat(CellValue::Null).take(count));
                Column::new(c.name.clone(), c.dtype, values)
            })
            .collect();
        table.content = TableContent::new(columns);
        table.refit();
        let bbox = table.bbox;
        self.expand_bounding_box(&bbox);
        self.touch();
        SheetOperation::UpdateTableRows
    }

    /// Remove content rows `start..end` (clamped to the table).
    pub fn delete_table_rows(&mut self, index: usize, start: usize, end: usize) -> SheetOperation {
        let Some(table) = self.tables.get_mut(index) else {
            return SheetOperation::DoNothing;
        };
        let end = end.min(table.content.height());
        if start >= end {
            return SheetOperation::DoNothing;
        }
        let columns = table
            .content
            .columns()
            .iter()
            .map(|c| {
                let mut values = c.values.clone();
                values.drain(start..end);
                Column::new(c.name.clone(), c.dtype, values)
            })
            .collect();
        table.content = TableContent::new(columns);
        table.refit();
        self.recompute_bounding_box();
        self.touch();
        SheetOperation::DeleteTableRows
    }

    // -----------------------------------------------------------------------
    // Cell edits
    // -----------------------------------------------------------------------

    /// Write user-typed text at a logical position, routing to the table
    /// under it or to the sparse map.
    pub fn update_data(&mut self, text: &str, column: usize, row: usize) -> SheetOperation {
        match self.table_index_by_position(column, row) {
            Some(index) => self.update_table_data(text, index, column, row),
            None => self.create_or_update_sparse(text, column, row),
        }
    }

    /// Write a block of text starting at `(column, row)`, one cell at a time.
    pub fn update_range(&mut self, rows: &[Vec<String>], column: usize, row: usize) -> SheetOperation {
        let mut changed = false;
        for (dy, cells) in rows.iter().enumerate() {
            for (dx, text) in cells.iter().enumerate() {
                changed |= self.update_data(text, column + dx, row + dy).changed();
            }
        }
        if changed {
            SheetOperation::UpdateTableRange
        } else {
            SheetOperation::DoNothing
        }
    }

    /// Write into a table cell, renaming the column when the position is
    /// the header row.
    pub fn update_table_data(
        &mut self,
        text: &str,
        index: usize,
        column: usize,
        row: usize,
    ) -> SheetOperation {
        let Some(table) = self.tables.get_mut(index) else {
            return SheetOperation::DoNothing;
        };
        let Some(c) = table.column_index(column) else {
            return SheetOperation::DoNothing;
        };
        let Some(target) = table.content.column(c) else {
            return SheetOperation::DoNothing;
        };

        if table.is_header_row(row) {
            let old_name = target.name.clone();
            if old_name == text {
                return SheetOperation::DoNothing;
            }
            let names = table.content.column_names();
            let new_name = unique_name("column", &names, text, &old_name, "_");
            table.content.rename_column(c, new_name);
            self.touch();
            return SheetOperation::UpdateTableHeader;
        }

        let dtype = target.dtype;
        if dtype.is_structured() {
            return SheetOperation::DoNothing;
        }
        let Some(r) = table.row_index(row) else {
            return SheetOperation::DoNothing;
        };
        let Some(value) = dtype.cast(text) else {
            tracing::debug!("cannot cast {:?} to {}", text, dtype);
            return SheetOperation::DoNothing;
        };

        if dtype == DataType::Null && !value.is_null() {
            table.content.set_column_type(c, value.data_type());
        }
        if !table.content.set(c, r, value) {
            return SheetOperation::DoNothing;
        }
        self.touch();
        SheetOperation::UpdateTableContent
    }

    /// Store a typed value directly into a table cell, bypassing casting.
    /// The value must match the column type (or be null).
    pub fn update_table_cell(
        &mut self,
        value: CellValue,
        index: usize,
        column: usize,
        row: usize,
    ) -> SheetOperation {
        let Some(table) = self.tables.get_mut(index) else {
            return SheetOperation::DoNothing;
        };
        let (Some(c), Some(r)) = (table.column_index(column), table.row_index(row)) else {
            return SheetOperation::DoNothing;
        };
        let Some(dtype) = table.content.column(c).map(|col| col.dtype) else {
            return SheetOperation::DoNothing;
        };
        if !value.is_null() && dtype != DataType::Null && value.data_type() != dtype {
            return SheetOperation::DoNothing;
        }
        if dtype == DataType::Null && !value.is_null() {
            table.content.set_column_type(c, value.data_type());
        }
        if !table.content.set(c, r, value) {
            return SheetOperation::DoNothing;
        }
        self.touch();
        SheetOperation::UpdateTableCell
    }

    /// Upsert a loose cell. Empty text deletes it.
    pub fn create_or_update_sparse(&mut self, text: &str, column: usize, row: usize) -> SheetOperation {
        let key = (row, column);
        let exists = self.sparse.contains_key(&key);

        if !text.is_empty() {
            self.sparse.insert(key, CellValue::infer(text));
            self.expand_bounding_box(&BoundingBox::cell(column, row));
            self.touch();
            return if exists {
                SheetOperation::UpdateSparse
            } else {
                SheetOperation::InsertSparse
            };
        }

        if exists {
            self.sparse.remove(&key);
            self.recompute_bounding_box();
            self.touch();
            return SheetOperation::DeleteSparse;
        }
        SheetOperation::DoNothing
    }

    pub fn delete_sparse(&mut self, column: usize, row: usize) -> SheetOperation {
        self.create_or_update_sparse("", column, row)
    }

    // -----------------------------------------------------------------------
    // Materialization
    // -----------------------------------------------------------------------

    /// Apply finished background loads. Returns the ids of the tables that
    /// were replaced.
    pub fn poll_loaded(&mut self) -> Vec<TableId> {
        let done = self.loader.poll();
        self.apply_loaded(done)
    }

    /// Like [`Document::poll_loaded`], but waits up to `timeout` for the
    /// first result when loads are pending.
    pub fn wait_loaded(&mut self, timeout: Duration) -> Vec<TableId> {
        let done = self.loader.wait(timeout);
        self.apply_loaded(done)
    }

    fn apply_loaded(&mut self, done: Vec<Loaded>) -> Vec<TableId> {
        let mut replaced = Vec::new();
        for Loaded { table, result } in done {
            let Some(index) = self.table_index_by_id(table) else {
                tracing::debug!("discarding load for removed table {:?}", table);
                continue;
            };
            match result {
                Ok(content) => {
                    self.replace_table(content, index);
                }
                Err(message) => {
                    self.replace_table(TableContent::marker(ERROR_COLUMN), index);
                    let failed = &mut self.tables[index];
                    tracing::warn!("table {} failed to load: {}", failed.name, message);
                    failed.placeholder = true;
                    failed.error_message = Some(message);
                }
            }
            replaced.push(self.tables[index].id);
        }
        replaced
    }

    // -----------------------------------------------------------------------
    // Bounding box
    // -----------------------------------------------------------------------

    fn expand_bounding_box(&mut self, other: &BoundingBox) {
        if self.bbox.is_empty() {
            self.recompute_bounding_box();
            return;
        }
        self.bbox.expand(other);
    }

    /// Rebuild the document box from every table and sparse cell.
    pub fn recompute_bounding_box(&mut self) {
        let mut bbox = BoundingBox::default();
        for table in &self.tables {
            bbox.expand(&table.bbox);
        }
        for &(row, column) in self.sparse.keys() {
            bbox.expand(&BoundingBox::cell(column, row));
        }
        tracing::trace!("document bounding box {:?} -> {:?}", self.bbox, bbox);
        self.bbox = bbox;
    }

    // -----------------------------------------------------------------------
    // Overlays
    // -----------------------------------------------------------------------

    /// Canvas positions of the header filter buttons of every table with
    /// rows. Hidden columns get no button.
    pub fn table_filter_anchors(&self, display: &Display) -> Vec<FilterAnchor> {
        let mut anchors = Vec::new();
        for table in &self.tables {
            if table.content.height() == 0 {
                continue;
            }
            let Some(visual_row) = display.row_from_lrow(table.bbox.row) else {
                continue;
            };
            let y = display.cell_y_from_row(visual_row);
            for offset in 0..table.content.width() {
                let Some(column) = display.column_from_lcolumn(table.bbox.column + offset) else {
                    continue;
                };
                let x = display.cell_x_from_column(column) + display.cell_width_from_column(column)
                    - FILTER_BUTTON_WIDTH;
                anchors.push(FilterAnchor {
                    table: table.id,
                    column,
                    row: table.bbox.row,
                    x,
                    y,
                });
            }
        }
        anchors
    }
}

fn fallback_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_content(rows: usize) -> TableContent {
        TableContent::new(vec![
            Column::new("id", DataType::Int64, (0..rows as i64).map(CellValue::Int).collect()),
            Column::new(
                "name",
                DataType::Text,
                (0..rows).map(|r| CellValue::Text(format!("n{r}"))).collect(),
            ),
        ])
    }

    #[test]
    fn test_read_header_and_data() {
        let mut doc = Document::new();
        doc.create_table(sample_content(3), true, 2, 2, "");
        let header = doc.read(3, 2);
        assert_eq!(header.value, CellValue::text("name"));
        assert_eq!(header.dtype_name(), "");

        let data = doc.read(2, 3);
        assert_eq!(data.value, CellValue::Int(0));
        assert_eq!(data.dtype, Some(DataType::Int64));

        assert_eq!(doc.read(9, 9), CellRead::default());
    }

    #[test]
    fn test_table_names_are_disambiguated() {
        let mut doc = Document::new();
        doc.create_table(sample_content(1), true, 1, 1, "");
        doc.create_table(sample_content(1), true, 5, 1, "");
        doc.create_table(sample_content(1), true, 9, 1, "Table1");
        let names: Vec<&str> = doc.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Table1", "Table2", "Table11"]);
    }

    #[test]
    fn test_last_table_wins_on_overlap() {
        let mut doc = Document::new();
        doc.create_table(sample_content(3), true, 1, 1, "first");
        doc.create_table(sample_content(3), true, 2, 1, "second");
        assert_eq!(doc.table_by_position(2, 2).map(|t| t.name.as_str()), Some("second"));
        let overlap = doc.intersecting_tables(&BoundingBox::new(2, 1, 1, 1));
        assert_eq!(overlap.len(), 2);
    }

    #[test]
    fn test_text_input_parses_tsv() {
        let mut doc = Document::new();
        let index = doc.create_table("a\tb\n1\tx\n", false, 1, 1, "");
        let table = &doc.tables()[index];
        assert!(table.with_header);
        assert_eq!(table.bbox, BoundingBox::new(1, 1, 2, 2));
    }

    #[test]
    fn test_header_rename() {
        let mut doc = Document::new();
        doc.create_table(sample_content(2), true, 1, 1, "");
        assert_eq!(doc.update_data("name", 1, 1), SheetOperation::UpdateTableHeader);
        assert_eq!(doc.read(1, 1).value, CellValue::text("name_1"));
        assert_eq!(doc.update_data("name_1", 1, 1), SheetOperation::DoNothing);
    }

    #[test]
    fn test_table_cell_casting() {
        let mut doc = Document::new();
        doc.create_table(sample_content(2), true, 1, 1, "");
        assert_eq!(doc.update_data("42", 1, 2), SheetOperation::UpdateTableContent);
        assert_eq!(doc.read(1, 2).value, CellValue::Int(42));
        assert_eq!(doc.update_data("forty", 1, 2), SheetOperation::DoNothing);
        assert_eq!(doc.read(1, 2).value, CellValue::Int(42));
        assert_eq!(doc.update_data("", 1, 2), SheetOperation::UpdateTableContent);
        assert_eq!(doc.read(1, 2).value, CellValue::Null);
    }

    #[test]
    fn test_structured_columns_reject_edits() {
        let mut doc = Document::new();
        let content = TableContent::new(vec![Column::new(
            "items",
            DataType::List,
            vec![CellValue::Opaque(Opaque::List(vec![]))],
        )]);
        doc.create_table(content, true, 1, 1, "");
        assert_eq!(doc.update_data("x", 1, 2), SheetOperation::DoNothing);
    }

    #[test]
    fn test_sparse_lifecycle() {
        let mut doc = Document::new();
        assert_eq!(doc.update_data("3", 4, 5), SheetOperation::InsertSparse);
        assert_eq!(doc.read(4, 5).value, CellValue::Int(3));
        assert_eq!(doc.update_data("x", 4, 5), SheetOperation::UpdateSparse);
        assert_eq!(doc.bounding_box(), BoundingBox::cell(4, 5));
        assert_eq!(doc.update_data("", 4, 5), SheetOperation::DeleteSparse);
        assert_eq!(doc.update_data("", 4, 5), SheetOperation::DoNothing);
        assert!(doc.bounding_box().is_empty());
    }

    #[test]
    fn test_bounding_box_grows_and_shrinks() {
        let mut doc = Document::new();
        doc.create_table(sample_content(3), true, 2, 2, "");
        doc.update_data("far", 10, 20);
        assert_eq!(doc.bounding_box(), BoundingBox::new(2, 2, 9, 19));

        doc.update_data("", 10, 20);
        assert_eq!(doc.bounding_box(), BoundingBox::new(2, 2, 2, 4));

        doc.delete_table(0);
        assert!(doc.bounding_box().is_empty());
    }

    #[test]
    fn test_column_insert_and_delete() {
        let mut doc = Document::new();
        doc.create_table(sample_content(2), true, 1, 1, "");
        let extra = Column::new("flag", DataType::Boolean, vec![true.into(), false.into()]);
        assert_eq!(
            doc.update_table_column(extra, 0, "id"),
            SheetOperation::UpdateTableColumns
        );
        assert_eq!(doc.tables()[0].content.column_names(), vec!["id", "flag", "name"]);
        assert_eq!(doc.bounding_box().column_span, 3);

        assert_eq!(doc.delete_table_column(0, "name"), SheetOperation::DeleteTableColumns);
        assert_eq!(doc.bounding_box().column_span, 2);
        assert_eq!(doc.delete_table_column(0, "missing"), SheetOperation::DoNothing);
    }

    #[test]
    fn test_row_insert_and_delete() {
        let mut doc = Document::new();
        doc.create_table(sample_content(3), true, 1, 1, "");
        assert_eq!(doc.insert_table_rows(0, 1, 2), SheetOperation::UpdateTableRows);
        assert_eq!(doc.tables()[0].content.height(), 5);
        assert_eq!(doc.read(1, 3).value, CellValue::Null);
        assert_eq!(doc.delete_table_rows(0, 0, 4), SheetOperation::DeleteTableRows);
        assert_eq!(doc.tables()[0].content.height(), 1);
        assert_eq!(doc.bounding_box().row_span, 2);
    }

    #[test]
    fn test_sync_failure_produces_error_table() {
        let mut doc = Document::new();
        doc.prefer_sync = true;
        let index = doc.create_table(
            TableSource::new("broken", || Err("no such file".to_string())),
            true,
            1,
            1,
            "",
        );
        let table = &doc.tables()[index];
        assert!(table.placeholder);
        assert_eq!(table.error_message.as_deref(), Some("no such file"));
        assert_eq!(table.content.column_names(), vec![ERROR_COLUMN]);
    }

    #[test]
    fn test_revision_moves_on_edits() {
        let mut doc = Document::new();
        let before = doc.revision();
        doc.update_data("1", 1, 1);
        assert!(doc.revision() > before);
        let before = doc.revision();
        doc.update_data("", 9, 9);
        assert_eq!(doc.revision(), before);
    }
}
