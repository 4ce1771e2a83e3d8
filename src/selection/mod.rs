//! Selection state machine
//!
//! Three rectangles describe the selection: the active range, the active
//! cell (anchor) and the cursor cell (far corner). Every transition funnels
//! into [`Selection::select_by_position`], which replaces all three at once
//! and keeps the previous values around for change detection.
//!
//! Positions handled here are visual; the document is read at the logical
//! position of the active cell.

mod cell;
mod keys;

pub use cell::{CellType, SheetCell};
pub use keys::{Key, Keystroke, Modifiers};

use crate::display::{names, CellNameError, Display, ScrollAxis, Viewport};
use crate::document::{CellValue, DataType, Document};

/// What a selection transition may look at and scroll
pub struct GridContext<'a> {
    pub display: &'a mut Display,
    pub document: &'a Document,
    pub viewport: Viewport,
}

impl<'a> GridContext<'a> {
    pub fn new(display: &'a mut Display, document: &'a Document, viewport: Viewport) -> Self {
        Self {
            display,
            document,
            viewport,
        }
    }
}

/// Flags for [`Selection::select_by_position`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    /// Keep `(col_1, row_1)` as the anchor instead of the top-left corner
    pub keep_order: bool,
    /// Scroll to the cursor cell rather than the active cell
    pub follow_cursor: bool,
    pub auto_scroll: bool,
    pub scroll_axis: ScrollAxis,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            keep_order: false,
            follow_cursor: true,
            auto_scroll: true,
            scroll_axis: ScrollAxis::Both,
        }
    }
}

/// Visual edges of the table under the active cell
#[derive(Debug, Clone, Copy)]
struct TableEdges {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
}

/// Result of a key press before clamping
enum Target {
    /// Move the anchor; the range collapses to one cell
    Move(i64, i64),
    /// Keep the anchor and move the cursor
    Extend(i64, i64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub current_active_range: SheetCell,
    pub previous_active_range: SheetCell,
    pub current_active_cell: SheetCell,
    pub previous_active_cell: SheetCell,
    pub current_cursor_cell: SheetCell,
    pub previous_cursor_cell: SheetCell,

    pub current_cell_name: String,
    pub previous_cell_name: String,
    pub current_cell_data: CellValue,
    pub previous_cell_data: CellValue,
    pub current_cell_dtype: Option<DataType>,
    pub previous_cell_dtype: Option<DataType>,
}

/// Expand the shorthand forms accepted by the name box.
///
/// `":"` selects `A1`; a name with a dangling `:` on either side becomes a
/// one-cell range of the non-empty side.
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name == ":" {
        return "A1".to_string();
    }
    if let Some(rest) = name.strip_prefix(':') {
        return format!("{rest}:{rest}");
    }
    if let Some(rest) = name.strip_suffix(':') {
        return format!("{rest}:{rest}");
    }
    name.to_string()
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last transition changed the active range or anchor.
    pub fn changed(&self) -> bool {
        self.current_active_range != self.previous_active_range
            || self.current_active_cell != self.previous_active_cell
            || self.current_cursor_cell != self.previous_cursor_cell
    }

    /// Select the cells named by `name` (`"B3"`, `"A1:C9"`, `"5:10"`, `"H:H"`).
    ///
    /// An unparseable name leaves the selection untouched.
    pub fn select_by_name(&mut self, name: &str, ctx: &mut GridContext<'_>) -> Result<(), CellNameError> {
        let normalized = normalize_name(name);
        let range = names::parse_cell_range(&normalized)?;

        let display = &*ctx.display;
        let col_1 = display.nearest_column_from_lcolumn(range.column_1, true);
        let row_1 = display.nearest_row_from_lrow(range.row_1, true);
        let col_2 = display.nearest_column_from_lcolumn(range.column_2, true);
        let row_2 = display.nearest_row_from_lrow(range.row_2, true);

        self.select_by_position(
            col_1,
            row_1,
            col_2,
            row_2,
            SelectOptions {
                follow_cursor: false,
                ..Default::default()
            },
            ctx,
        );
        Ok(())
    }

    /// Select the cell under a canvas point. With `extend` the anchor stays
    /// and only the cursor moves.
    pub fn select_by_point(&mut self, x: i64, y: i64, extend: bool, ctx: &mut GridContext<'_>) {
        let column = ctx.display.column_from_point(x);
        let row = ctx.display.row_from_point(y);

        let (col_1, row_1) = if extend {
            (self.current_active_cell.column, self.current_active_cell.row)
        } else {
            (column, row)
        };

        self.select_by_position(
            col_1,
            row_1,
            column,
            row,
            SelectOptions {
                keep_order: true,
                auto_scroll: false,
                ..Default::default()
            },
            ctx,
        );
    }

    /// Drag the cursor to a canvas point. Returns false when the cursor
    /// did not move.
    ///
    /// Dragging from content never enters the locator bands; dragging a
    /// whole-row or whole-column selection stays in its band.
    pub fn select_by_motion(&mut self, x: i64, y: i64, auto_scroll: bool, ctx: &mut GridContext<'_>) -> bool {
        let range = self.current_active_range;
        if range.column == 0 && range.row == 0 {
            return false;
        }

        let cursor_column = self.current_cursor_cell.column;
        let cursor_row = self.current_cursor_cell.row;

        let mut col_1 = self.current_active_cell.column;
        let mut row_1 = self.current_active_cell.row;
        let mut col_2 = ctx.display.column_from_point(x);
        let mut row_2 = ctx.display.row_from_point(y);

        match range.ctype {
            CellType::Top => {
                row_1 = 0;
                row_2 = 0;
                if col_2 == 0 {
                    col_2 = cursor_column.saturating_sub(1).max(1);
                }
            }
            CellType::Left => {
                col_1 = 0;
                col_2 = 0;
                if row_2 == 0 {
                    row_2 = cursor_row.saturating_sub(1).max(1);
                }
            }
            CellType::Content | CellType::Corner => {
                if col_2 == 0 {
                    col_2 = cursor_column.saturating_sub(1).max(1);
                }
                if row_2 == 0 {
                    row_2 = cursor_row.saturating_sub(1).max(1);
                }
            }
        }

        if col_2 == cursor_column && row_2 == cursor_row {
            return false;
        }
        if col_2 == cursor_column && row_2 == 0 && cursor_row == 1 {
            return false;
        }
        if col_2 == 0 && cursor_column == 1 && row_2 == cursor_row {
            return false;
        }

        self.select_by_position(
            col_1,
            row_1,
            col_2,
            row_2,
            SelectOptions {
                keep_order: true,
                auto_scroll,
                ..Default::default()
            },
            ctx,
        );
        true
    }

    fn table_edges(&self, ctx: &GridContext<'_>) -> Option<TableEdges> {
        let display = &*ctx.display;
        let lcolumn = display.lcolumn_from_column(self.current_active_cell.column);
        let lrow = display.lrow_from_row(self.current_active_cell.row);
        let bbox = ctx.document.table_by_position(lcolumn, lrow)?.bbox;
        Some(TableEdges {
            left: display.nearest_column_from_lcolumn(bbox.column, true) as i64,
            right: display.nearest_column_from_lcolumn(bbox.right() - 1, false) as i64,
            top: display.nearest_row_from_lrow(bbox.row, true) as i64,
            bottom: display.nearest_row_from_lrow(bbox.bottom() - 1, false) as i64,
        })
    }

    /// Keyboard navigation.
    ///
    /// Shift extends the range from the anchor, Ctrl jumps to the edge of
    /// the table under the anchor (or to the sheet edge outside tables), and
    /// both together extend to that edge. Tab and Shift+Tab wrap between
    /// rows at the table's column boundaries.
    pub fn select_by_keypress(&mut self, stroke: Keystroke, ctx: &mut GridContext<'_>) {
        let (ac, ar) = (
            self.current_active_cell.column as i64,
            self.current_active_cell.row as i64,
        );
        let (cc, cr) = (
            self.current_cursor_cell.column as i64,
            self.current_cursor_cell.row as i64,
        );
        let edges = self.table_edges(ctx);
        let page = ctx.display.metrics.page_increment.max(1);
        let shift = stroke.mods.shift();
        let ctrl = stroke.mods.ctrl();

        let target = match stroke.key {
            Key::Tab if shift => match edges {
                Some(e) if ac - 1 < e.left && ar > 1 => Target::Move(e.right, ar - 1),
                _ => Target::Move(ac - 1, ar),
            },
            Key::Tab => match edges {
                Some(e) if ac + 1 > e.right => Target::Move(e.left, ar + 1),
                _ => Target::Move(ac + 1, ar),
            },
            Key::Enter if shift => Target::Move(ac, ar - 1),
            Key::Enter => Target::Move(ac, ar + 1),

            Key::Left => match (shift, ctrl, edges) {
                (true, true, Some(e)) if e.left < ac => Target::Extend(e.left, cr),
                (true, true, _) => Target::Extend(1, cr),
                (false, true, Some(e)) if e.left < ac => Target::Move(e.left, ar),
                (false, true, _) => Target::Move(1, ar),
                (true, false, _) => Target::Extend(cc - 1, cr),
                (false, false, _) => Target::Move(ac - 1, ar),
            },
            Key::Right => match (shift, ctrl, edges) {
                (true, true, Some(e)) if ac < e.right => Target::Extend(e.right, cr),
                (true, true, _) => Target::Extend(cc + 1, cr),
                (false, true, Some(e)) if ac < e.right => Target::Move(e.right, ar),
                (false, true, _) => Target::Move(ac + 1, ar),
                (true, false, _) => Target::Extend(cc + 1, cr),
                (false, false, _) => Target::Move(ac + 1, ar),
            },
            Key::Up => match (shift, ctrl, edges) {
                (true, true, Some(e)) if e.top < ar => Target::Extend(cc, e.top),
                (true, true, _) => Target::Extend(cc, 1),
                (false, true, Some(e)) if e.top < ar => Target::Move(ac, e.top),
                (false, true, _) => Target::Move(ac, 1),
                (true, false, _) => Target::Extend(cc, cr - 1),
                (false, false, _) => Target::Move(ac, ar - 1),
            },
            Key::Down => match (shift, ctrl, edges) {
                (true, true, Some(e)) if ar < e.bottom => Target::Extend(cc, e.bottom),
                (true, true, _) => Target::Extend(cc, cr + 1),
                (false, true, Some(e)) if ar < e.bottom => Target::Move(ac, e.bottom),
                (false, true, _) => Target::Move(ac, ar + 1),
                (true, false, _) => Target::Extend(cc, cr + 1),
                (false, false, _) => Target::Move(ac, ar + 1),
            },
            Key::PageUp if shift => Target::Extend(cc, cr - page),
            Key::PageUp => Target::Move(ac, ar - page),
            Key::PageDown if shift => Target::Extend(cc, cr + page),
            Key::PageDown => Target::Move(ac, ar + page),
        };

        let col = |v: i64| v.clamp(1, names::MAX_COLUMN as i64) as usize;
        let row = |v: i64| v.clamp(1, names::MAX_ROW as i64) as usize;
        let (col_1, row_1, col_2, row_2) = match target {
            Target::Move(c, r) => (col(c), row(r), col(c), row(r)),
            Target::Extend(c, r) => (col(ac), row(ar), col(c), row(r)),
        };

        tracing::trace!(target: "selection", key = %stroke, "keypress");
        self.select_by_position(
            col_1,
            row_1,
            col_2,
            row_2,
            SelectOptions {
                keep_order: true,
                ..Default::default()
            },
            ctx,
        );
    }

    /// Replace the selection with the range spanning two visual positions.
    ///
    /// A `0` column or row selects through the locator band: both zero is
    /// the whole sheet, a zero row selects whole columns and a zero column
    /// selects whole rows.
    pub fn select_by_position(
        &mut self,
        col_1: usize,
        row_1: usize,
        col_2: usize,
        row_2: usize,
        options: SelectOptions,
        ctx: &mut GridContext<'_>,
    ) {
        let (mut col_1, mut row_1, mut col_2, mut row_2) = (col_1, row_1, col_2, row_2);

        // "A:1" or "1:A" means the whole sheet
        if (col_1 == 0 && row_2 == 0) || (row_1 == 0 && col_2 == 0) {
            (col_1, row_1, col_2, row_2) = (0, 0, 0, 0);
        }

        let mut start_column = col_1.min(col_2);
        let mut start_row = row_1.min(row_2);
        let mut end_column = col_1.max(col_2);
        let mut end_row = row_1.max(row_2);

        let display = &*ctx.display;
        let x = display.cell_x_from_column(start_column);
        let y = display.cell_y_from_row(start_row);
        let width = display.cell_x_from_column(end_column) + display.cell_width_from_column(end_column) - x;
        let height = display.cell_y_from_row(end_row) + display.cell_height_from_row(end_row) - y;
        let column_span = (end_column - start_column + 1) as i64;
        let row_span = (end_row - start_row + 1) as i64;

        let base = SheetCell {
            x,
            y,
            right_to_left: col_2 < col_1,
            bottom_to_top: row_2 < row_1,
            ..Default::default()
        };
        let range = match (start_column, start_row) {
            (0, 0) => SheetCell {
                width: -1,
                height: -1,
                column: 0,
                row: 0,
                column_span: -1,
                row_span: -1,
                ctype: CellType::Corner,
                ..base
            },
            (_, 0) => SheetCell {
                width,
                height: -1,
                column: start_column,
                row: 0,
                column_span,
                row_span: -1,
                ctype: CellType::Top,
                ..base
            },
            (0, _) => SheetCell {
                width: -1,
                height,
                column: 0,
                row: start_row,
                column_span: -1,
                row_span,
                ctype: CellType::Left,
                ..base
            },
            _ => SheetCell {
                width,
                height,
                column: start_column,
                row: start_row,
                column_span,
                row_span,
                ctype: CellType::Content,
                ..base
            },
        };

        if range.ctype != CellType::Content {
            col_1 = col_1.max(1);
            row_1 = row_1.max(1);
            col_2 = col_2.max(1);
            row_2 = row_2.max(1);
            start_column = start_column.max(1);
            start_row = start_row.max(1);
            end_column = end_column.max(1);
            end_row = end_row.max(1);
        }
        if !options.keep_order {
            (col_1, row_1, col_2, row_2) = (start_column, start_row, end_column, end_row);
        }

        let single = |column: usize, row: usize| SheetCell {
            x: display.cell_x_from_column(column),
            y: display.cell_y_from_row(row),
            width: display.cell_width_from_column(column),
            height: display.cell_height_from_row(row),
            column,
            row,
            column_span: 1,
            row_span: 1,
            ..Default::default()
        };
        let active = single(col_1, row_1);
        let cursor = single(col_2, row_2);

        self.previous_active_range = self.current_active_range;
        self.previous_active_cell = self.current_active_cell;
        self.previous_cursor_cell = self.current_cursor_cell;
        self.current_active_range = range;
        self.current_active_cell = active;
        self.current_cursor_cell = cursor;

        if options.auto_scroll {
            let target = if options.follow_cursor { cursor } else { active };
            let viewport = ctx.viewport;
            let content_height = ctx.display.content_height(viewport);
            let content_width = ctx.display.content_width(viewport);
            let scrolled = ctx.display.scroll_to_position(
                target.column,
                target.row,
                content_height,
                content_width,
                options.scroll_axis,
            );
            if scrolled {
                self.update_by_scroll(ctx.display);
            }
        }

        let display = &*ctx.display;
        let lcolumn = display.lcolumn_from_column(col_1);
        let lrow = display.lrow_from_row(row_1);
        let read = ctx.document.read(lcolumn, lrow);

        self.previous_cell_name = std::mem::replace(&mut self.current_cell_name, names::cell_name(lcolumn, lrow));
        self.previous_cell_data = std::mem::replace(&mut self.current_cell_data, read.value);
        self.previous_cell_dtype = std::mem::replace(&mut self.current_cell_dtype, read.dtype);

        tracing::debug!(
            target: "selection",
            ctype = ?self.current_active_range.ctype,
            "select {} ({}x{})",
            self.current_cell_name,
            self.current_active_range.column_span,
            self.current_active_range.row_span
        );
    }

    /// Refresh pixel positions after the scroll offsets changed.
    pub fn update_by_scroll(&mut self, display: &Display) {
        for cell in [
            &mut self.current_active_range,
            &mut self.current_active_cell,
            &mut self.current_cursor_cell,
        ] {
            cell.x = display.cell_x_from_column(cell.column);
            cell.y = display.cell_y_from_row(cell.row);
        }
    }

    /// Name of the selected range as typed into a name box
    /// (`"B2"`, `"B2:D5"`, `"C:D"`, `"3:4"`).
    pub fn range_name(&self, display: &Display) -> String {
        let range = &self.current_active_range;
        let last = |start: usize, span: i64| start + span.max(1) as usize - 1;
        match range.ctype {
            CellType::Corner => String::new(),
            CellType::Top => {
                let first = names::column_name(display.lcolumn_from_column(range.column));
                let last = names::column_name(display.lcolumn_from_column(last(range.column, range.column_span)));
                format!("{first}:{last}")
            }
            CellType::Left => {
                let first = display.lrow_from_row(range.row);
                let last = display.lrow_from_row(last(range.row, range.row_span));
                format!("{first}:{last}")
            }
            CellType::Content if !range.is_range() => self.current_cell_name.clone(),
            CellType::Content => {
                let start = names::cell_name(
                    display.lcolumn_from_column(range.column),
                    display.lrow_from_row(range.row),
                );
                let end = names::cell_name(
                    display.lcolumn_from_column(last(range.column, range.column_span)),
                    display.lrow_from_row(last(range.row, range.row_span)),
                );
                format!("{start}:{end}")
            }
        }
    }
}
