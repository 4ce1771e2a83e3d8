//! Grid coordinate engine
//!
//! Converts between logical indices (hidden items included), visual indices
//! (hidden items removed) and pixel coordinates on the canvas. Pixel
//! coordinates returned here are canvas-relative: they include the locator
//! bands and the host-reported scroll offsets.
//!
//! ```text
//!  0,0 ┌────────┬──────────┬──────────┐
//!      │ corner │ A        │ B        │  ← top locator (row 0)
//!      ├────────┼──────────┼──────────┤
//!      │ 1      │ A1       │ B1       │
//!      │ 2      │ A2       │ B2       │
//!      └────────┴──────────┴──────────┘
//!        ↑ left locator (column 0)
//! ```

mod axis;
pub mod names;

pub use axis::Axis;
pub use names::{CellNameError, CellNameErrorKind, CellRange};

use serde::{Deserialize, Serialize};

/// Fixed sizes and increments of the grid, in pixels unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub default_cell_width: i64,
    pub default_cell_height: i64,
    pub cell_padding: i64,
    pub font_size: f32,
    pub left_locator_width: i64,
    pub top_locator_height: i64,
    /// Rows moved per wheel notch
    pub scroll_increment: i64,
    /// Rows moved per page
    pub page_increment: i64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            default_cell_width: 65,
            default_cell_height: 20,
            cell_padding: 6,
            font_size: 12.0,
            left_locator_width: 45,
            top_locator_height: 20,
            scroll_increment: 3,
            page_increment: 20,
        }
    }
}

/// Viewport edges a cell may be close to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Which scroll offsets `scroll_to_position` may change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    #[default]
    Both,
    Vertical,
    Horizontal,
}

impl ScrollAxis {
    fn vertical(self) -> bool {
        matches!(self, ScrollAxis::Both | ScrollAxis::Vertical)
    }

    fn horizontal(self) -> bool {
        matches!(self, ScrollAxis::Both | ScrollAxis::Horizontal)
    }
}

/// Canvas size reported by the host, locator bands included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i64,
    pub height: i64,
}

impl Viewport {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

/// Geometry state of one sheet: both axes, locator bands and scroll.
#[derive(Debug, Clone)]
pub struct Display {
    pub metrics: GridMetrics,
    pub columns: Axis,
    pub rows: Axis,
    pub left_locator_width: i64,
    pub top_locator_height: i64,
    /// Host-reported horizontal scroll offset
    pub scroll_x: i64,
    /// Host-reported vertical scroll offset
    pub scroll_y: i64,
}

impl Default for Display {
    fn default() -> Self {
        Self::new(GridMetrics::default())
    }
}

impl Display {
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            metrics,
            columns: Axis::new(metrics.default_cell_width),
            rows: Axis::new(metrics.default_cell_height),
            left_locator_width: metrics.left_locator_width,
            top_locator_height: metrics.top_locator_height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    /// Forget all hidden items and custom sizes.
    pub fn reset(&mut self) {
        self.columns.reset();
        self.rows.reset();
    }

    /// Record the scroll offsets reported by the host.
    pub fn set_scroll(&mut self, x: i64, y: i64) {
        self.scroll_x = x.max(0);
        self.scroll_y = y.max(0);
    }

    // -----------------------------------------------------------------------
    // Logical ⇄ visual
    // -----------------------------------------------------------------------

    #[inline]
    pub fn lcolumn_from_column(&self, column: usize) -> usize {
        self.columns.logical_from_visual(column)
    }

    #[inline]
    pub fn lrow_from_row(&self, row: usize) -> usize {
        self.rows.logical_from_visual(row)
    }

    #[inline]
    pub fn column_from_lcolumn(&self, lcolumn: usize) -> Option<usize> {
        self.columns.visual_from_logical(lcolumn)
    }

    #[inline]
    pub fn row_from_lrow(&self, lrow: usize) -> Option<usize> {
        self.rows.visual_from_logical(lrow)
    }

    /// Visual column of a logical column, moving to the nearest visible
    /// column when it is hidden.
    pub fn nearest_column_from_lcolumn(&self, lcolumn: usize, forward: bool) -> usize {
        self.columns.nearest_visual(lcolumn, forward)
    }

    pub fn nearest_row_from_lrow(&self, lrow: usize, forward: bool) -> usize {
        self.rows.nearest_visual(lrow, forward)
    }

    // -----------------------------------------------------------------------
    // Pixel → visual
    // -----------------------------------------------------------------------

    /// Visual column under a canvas x coordinate; 0 inside the locator band.
    pub fn column_from_point(&self, x: i64) -> usize {
        if x < self.left_locator_width {
            return 0;
        }
        self.columns
            .index_from_pixel(x - self.left_locator_width + self.scroll_x)
    }

    /// Visual row under a canvas y coordinate; 0 inside the locator band.
    pub fn row_from_point(&self, y: i64) -> usize {
        if y < self.top_locator_height {
            return 0;
        }
        self.rows
            .index_from_pixel(y - self.top_locator_height + self.scroll_y)
    }

    /// First visual column shown after the scroll offset.
    pub fn starting_column(&self) -> usize {
        self.columns.index_from_pixel(self.scroll_x)
    }

    /// First visual row shown after the scroll offset.
    pub fn starting_row(&self) -> usize {
        self.rows.index_from_pixel(self.scroll_y)
    }

    /// Last visual column intersecting a canvas of the given width.
    pub fn ending_column(&self, canvas_width: i64) -> usize {
        let extent = canvas_width - self.left_locator_width;
        self.columns.visible_span(self.scroll_x, extent).1
    }

    /// Last visual row intersecting a canvas of the given height.
    pub fn ending_row(&self, canvas_height: i64) -> usize {
        let extent = canvas_height - self.top_locator_height;
        self.rows.visible_span(self.scroll_y, extent).1
    }

    // -----------------------------------------------------------------------
    // Visual → pixel
    // -----------------------------------------------------------------------

    /// Canvas x of a visual column's left edge.
    pub fn cell_x_from_column(&self, column: usize) -> i64 {
        if column == 0 {
            return 0;
        }
        let offset = self.columns.pixel_from_index(column);
        (self.left_locator_width - self.scroll_x).saturating_add(offset)
    }

    /// Canvas y of a visual row's top edge.
    pub fn cell_y_from_row(&self, row: usize) -> i64 {
        if row == 0 {
            return 0;
        }
        let offset = self.rows.pixel_from_index(row);
        (self.top_locator_height - self.scroll_y).saturating_add(offset)
    }

    pub fn cell_width_from_column(&self, column: usize) -> i64 {
        match self.lcolumn_from_column(column) {
            0 => self.left_locator_width,
            lcolumn => self.columns.size_of_logical(lcolumn),
        }
    }

    pub fn cell_height_from_row(&self, row: usize) -> i64 {
        match self.lrow_from_row(row) {
            0 => self.top_locator_height,
            lrow => self.rows.size_of_logical(lrow),
        }
    }

    /// Left edge of the column under a canvas x coordinate.
    pub fn cell_x_from_point(&self, x: i64) -> i64 {
        self.cell_x_from_column(self.column_from_point(x))
    }

    /// Top edge of the row under a canvas y coordinate.
    pub fn cell_y_from_point(&self, y: i64) -> i64 {
        self.cell_y_from_row(self.row_from_point(y))
    }

    pub fn cell_width_from_point(&self, x: i64) -> i64 {
        self.cell_width_from_column(self.column_from_point(x))
    }

    pub fn cell_height_from_point(&self, y: i64) -> i64 {
        self.cell_height_from_row(self.row_from_point(y))
    }

    // -----------------------------------------------------------------------
    // Hidden items
    // -----------------------------------------------------------------------

    pub fn hidden_columns_between(&self, column_1: usize, column_2: usize) -> usize {
        self.columns.hidden_count_between(column_1, column_2)
    }

    pub fn hidden_rows_between(&self, row_1: usize, row_2: usize) -> usize {
        self.rows.hidden_count_between(row_1, row_2)
    }

    /// Whether the cell at a logical position is visible on both axes.
    pub fn check_cell_visibility(&self, lcolumn: usize, lrow: usize) -> bool {
        self.columns.is_visible(lcolumn) && self.rows.is_visible(lrow)
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    pub fn column_name(&self, lcolumn: usize) -> String {
        names::column_name(lcolumn)
    }

    pub fn cell_name(&self, lcolumn: usize, lrow: usize) -> String {
        names::cell_name(lcolumn, lrow)
    }

    /// Parse a name into a logical range.
    pub fn cell_range_from_name(&self, name: &str) -> Result<CellRange, CellNameError> {
        names::parse_cell_range(name)
    }

    // -----------------------------------------------------------------------
    // Scrolling helpers
    // -----------------------------------------------------------------------

    /// Width of the canvas area right of the left locator.
    pub fn content_width(&self, viewport: Viewport) -> i64 {
        (viewport.width - self.left_locator_width).max(0)
    }

    /// Height of the canvas area below the top locator.
    pub fn content_height(&self, viewport: Viewport) -> i64 {
        (viewport.height - self.top_locator_height).max(0)
    }

    /// Offsets of a cell relative to the scrolled content origin:
    /// `(top, bottom, left, right)`.
    fn content_offsets(&self, column: usize, row: usize) -> (i64, i64, i64, i64) {
        let x_origin = self.left_locator_width - self.scroll_x;
        let y_origin = self.top_locator_height - self.scroll_y;
        let top = self.cell_y_from_row(row) - y_origin;
        let left = self.cell_x_from_column(column) - x_origin;
        (
            top,
            top + self.cell_height_from_row(row),
            left,
            left + self.cell_width_from_column(column),
        )
    }

    /// Edges of the viewport the cell sits within one default cell of.
    pub fn check_cell_position_near_edges(
        &self,
        column: usize,
        row: usize,
        viewport_height: i64,
        viewport_width: i64,
    ) -> Vec<Edge> {
        let cell_width = self.cell_width_from_column(column);
        let cell_height = self.cell_height_from_row(row);
        let default_width = self.metrics.default_cell_width;
        let default_height = self.metrics.default_cell_height;
        let (top, _, left, _) = self.content_offsets(column, row);

        let top_limit = top - (viewport_height - viewport_height % default_height) + cell_height;
        let left_limit = left - (viewport_width - viewport_width % default_width) + cell_width;

        let mut edges = Vec::new();
        if (self.scroll_y - top_limit).abs() <= default_height {
            edges.push(Edge::Bottom);
        }
        if (self.scroll_y - top).abs() <= default_height {
            edges.push(Edge::Top);
        }
        if (self.scroll_x - left_limit).abs() <= default_width {
            edges.push(Edge::Right);
        }
        if (self.scroll_x - left).abs() <= default_width {
            edges.push(Edge::Left);
        }
        edges
    }

    /// Scroll the least amount needed to bring a visual cell fully into
    /// view. Returns false without touching the scroll when it already is.
    ///
    /// Cells below/right of the viewport end up flush with the far edge,
    /// cells above/left end up flush with the near edge.
    pub fn scroll_to_position(
        &mut self,
        column: usize,
        row: usize,
        viewport_height: i64,
        viewport_width: i64,
        axis: ScrollAxis,
    ) -> bool {
        let (top, bottom, left, right) = self.content_offsets(column, row);
        let cell_width = right - left;
        let cell_height = bottom - top;

        let vertically_visible =
            self.scroll_y <= top && bottom <= self.scroll_y + viewport_height;
        let horizontally_visible =
            self.scroll_x <= left && right <= self.scroll_x + viewport_width;
        if vertically_visible && horizontally_visible {
            return false;
        }

        let (old_x, old_y) = (self.scroll_x, self.scroll_y);

        if axis.vertical() && bottom > self.scroll_y + viewport_height {
            self.scroll_y = top - viewport_height + cell_height;
        }
        if axis.vertical() && top < self.scroll_y {
            self.scroll_y = top;
        }
        if axis.horizontal() && right > self.scroll_x + viewport_width {
            self.scroll_x = left - viewport_width + cell_width;
        }
        if axis.horizontal() && left < self.scroll_x {
            self.scroll_x = left;
        }

        self.scroll_y = self.scroll_y.max(0);
        self.scroll_x = self.scroll_x.max(0);

        tracing::trace!(
            column,
            row,
            "scroll ({}, {}) -> ({}, {})",
            old_x,
            old_y,
            self.scroll_x,
            self.scroll_y
        );
        true
    }

    /// Widen the left locator so the largest visible row number fits.
    ///
    /// `measure` returns the pixel width of a label. Returns true when the
    /// locator width changed, which invalidates cached content pixels.
    pub fn fit_left_locator(&mut self, canvas_height: i64, measure: impl Fn(&str) -> f32) -> bool {
        let last_row = self.ending_row(canvas_height);
        let largest = self.lrow_from_row(last_row).max(self.lrow_from_row(self.starting_row()));
        let text_width = measure(&largest.to_string());
        let width = (text_width + (self.metrics.cell_padding * 2) as f32 + 0.5) as i64;
        let width = width.max(self.metrics.left_locator_width);

        if width == self.left_locator_width {
            return false;
        }
        tracing::debug!("left locator width {} -> {}", self.left_locator_width, width);
        self.left_locator_width = width;
        true
    }
}
