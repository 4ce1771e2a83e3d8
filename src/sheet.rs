//! Sheet composition root
//!
//! A [`Sheet`] owns one complete grid: display geometry, document, selection
//! and renderer. Hosts report viewport size and scroll offsets, forward
//! input, and ask for frames; the sheet keeps the four parts consistent.

use std::time::Duration;

use crate::config::SheetConfig;
use crate::display::{CellNameError, Display, Viewport};
use crate::document::{CellRead, Document, FilterAnchor, SheetOperation, TableId, TableInput};
use crate::render::{format, Renderer, Surface, Typeface};
use crate::selection::{GridContext, Keystroke, SelectOptions, Selection};
use crate::theme::{Scheme, Theme};
use crate::tracing::SelectionSnapshot;

/// Rows sampled from each end of a table when fitting column widths
const AUTOFIT_SAMPLE_ROWS: usize = 50;

pub struct Sheet {
    pub display: Display,
    pub document: Document,
    pub selection: Selection,
    renderer: Renderer,
    viewport: Viewport,
    autofit_max_width: i64,
    refresh_pending: bool,
}

impl Sheet {
    pub fn new(config: &SheetConfig) -> Self {
        let metrics = config.metrics();
        let typeface = Typeface::load(config.font_path.as_deref());
        Self::with_typeface(config, typeface, metrics.font_size)
    }

    /// Build a sheet with an explicit typeface (tests, embedded fonts).
    pub fn with_typeface(config: &SheetConfig, typeface: Typeface, font_size: f32) -> Self {
        let metrics = config.metrics();
        Self {
            display: Display::new(metrics),
            document: Document::new(),
            selection: Selection::new(),
            renderer: Renderer::new(
                typeface,
                font_size,
                metrics.cell_padding,
                Theme::for_scheme(config.theme),
            ),
            viewport: Viewport::default(),
            autofit_max_width: config.autofit_max_width.max(metrics.default_cell_width),
            refresh_pending: false,
        }
    }

    // -----------------------------------------------------------------------
    // Host-reported layout
    // -----------------------------------------------------------------------

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: i64, height: i64) {
        let viewport = Viewport::new(width.max(0), height.max(0));
        if viewport != self.viewport {
            tracing::debug!("viewport {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
        }
    }

    /// Record scroll offsets in pixels and move the selection geometry along.
    pub fn set_scroll(&mut self, x: i64, y: i64) {
        self.display.set_scroll(x, y);
        self.selection.update_by_scroll(&self.display);
    }

    /// Scroll by wheel notches; each notch moves `scroll_increment` rows
    /// (or columns) of default size.
    pub fn scroll_by(&mut self, notches_x: i64, notches_y: i64) {
        let metrics = self.display.metrics;
        let dx = notches_x * metrics.scroll_increment * metrics.default_cell_width;
        let dy = notches_y * metrics.scroll_increment * metrics.default_cell_height;
        self.set_scroll(self.display.scroll_x + dx, self.display.scroll_y + dy);
    }

    pub fn set_scheme(&mut self, scheme: Scheme) {
        self.renderer.set_theme(Theme::for_scheme(scheme));
        self.request_refresh();
    }

    // -----------------------------------------------------------------------
    // Selection input
    // -----------------------------------------------------------------------

    /// Run a selection transition, logging what changed.
    fn navigate<R>(&mut self, label: &str, apply: impl FnOnce(&mut Selection, &mut GridContext<'_>) -> R) -> R {
        let before = SelectionSnapshot::from_selection(&self.selection);
        let result = {
            let mut ctx = GridContext::new(&mut self.display, &self.document, self.viewport);
            apply(&mut self.selection, &mut ctx)
        };
        let after = SelectionSnapshot::from_selection(&self.selection);
        if let Some(diff) = before.diff(&after) {
            tracing::debug!(target: "selection", input = label, "state changed: {}", diff);
        }
        result
    }

    pub fn select_name(&mut self, name: &str) -> Result<(), CellNameError> {
        self.navigate("name", |selection, ctx| selection.select_by_name(name, ctx))
    }

    pub fn click(&mut self, x: i64, y: i64, extend: bool) {
        self.navigate("click", |selection, ctx| selection.select_by_point(x, y, extend, ctx));
    }

    pub fn drag(&mut self, x: i64, y: i64) -> bool {
        self.navigate("drag", |selection, ctx| selection.select_by_motion(x, y, true, ctx))
    }

    pub fn key(&mut self, stroke: Keystroke) {
        self.navigate("key", |selection, ctx| selection.select_by_keypress(stroke, ctx));
    }

    pub fn select_position(&mut self, column_1: usize, row_1: usize, column_2: usize, row_2: usize) {
        self.navigate("position", |selection, ctx| {
            selection.select_by_position(column_1, row_1, column_2, row_2, SelectOptions::default(), ctx)
        });
    }

    /// Value and type tag under the active cell, for a formula bar.
    pub fn active_cell(&self) -> CellRead {
        let cell = &self.selection.current_active_cell;
        self.document.read(
            self.display.lcolumn_from_column(cell.column),
            self.display.lrow_from_row(cell.row),
        )
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Place a table at a logical position and fit its columns.
    pub fn add_table(
        &mut self,
        input: impl Into<TableInput>,
        with_header: bool,
        column: usize,
        row: usize,
        name: &str,
    ) -> usize {
        let index = self.document.create_table(input, with_header, column, row, name);
        self.autofit_columns();
        self.request_refresh();
        index
    }

    /// Write text into the active cell.
    pub fn edit_active(&mut self, text: &str) -> SheetOperation {
        let cell = self.selection.current_active_cell;
        let column = self.display.lcolumn_from_column(cell.column.max(1));
        let row = self.display.lrow_from_row(cell.row.max(1));
        let operation = self.document.update_data(text, column, row);
        tracing::debug!("edit {}: {:?}", self.selection.current_cell_name, operation);
        if operation.changed() {
            self.reselect();
            self.request_refresh();
        }
        operation
    }

    /// Re-run the current selection so the cached cell value is current.
    fn reselect(&mut self) {
        if self.selection.current_active_range.is_empty() {
            return;
        }
        let active = self.selection.current_active_cell;
        let cursor = self.selection.current_cursor_cell;
        self.navigate("refresh", |selection, ctx| {
            selection.select_by_position(
                active.column,
                active.row,
                cursor.column,
                cursor.row,
                SelectOptions {
                    keep_order: true,
                    auto_scroll: false,
                    ..Default::default()
                },
                ctx,
            )
        });
    }

    // -----------------------------------------------------------------------
    // Background loads
    // -----------------------------------------------------------------------

    /// Apply finished table loads; returns the tables that were replaced.
    pub fn poll(&mut self) -> Vec<TableId> {
        let replaced = self.document.poll_loaded();
        self.after_loads(&replaced);
        replaced
    }

    /// Like [`Sheet::poll`] but waits up to `timeout` for pending loads.
    pub fn wait_loaded(&mut self, timeout: Duration) -> Vec<TableId> {
        let replaced = self.document.wait_loaded(timeout);
        self.after_loads(&replaced);
        replaced
    }

    fn after_loads(&mut self, replaced: &[TableId]) {
        if replaced.is_empty() {
            return;
        }
        tracing::debug!("{} table(s) materialized", replaced.len());
        self.autofit_columns();
        self.reselect();
        self.request_refresh();
    }

    // -----------------------------------------------------------------------
    // Refresh batching
    // -----------------------------------------------------------------------

    /// Ask for a repaint; repeated requests before the host picks it up
    /// collapse into one.
    pub fn request_refresh(&mut self) {
        self.refresh_pending = true;
    }

    /// Whether a repaint was requested since the last call.
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_pending)
    }

    // -----------------------------------------------------------------------
    // Layout helpers
    // -----------------------------------------------------------------------

    /// Size every table column to its widest sampled value.
    ///
    /// Only the first and last rows of each table are measured. Widths never
    /// shrink below the default cell width nor grow past the configured
    /// maximum.
    pub fn autofit_columns(&mut self) {
        let padding = self.display.metrics.cell_padding * 2;
        let min = self.display.metrics.default_cell_width;
        let max = self.autofit_max_width;

        for table in self.document.tables() {
            if !table.is_loaded() {
                continue;
            }
            let rows = table.content.sample_rows(AUTOFIT_SAMPLE_ROWS, AUTOFIT_SAMPLE_ROWS);
            for (offset, column) in table.content.columns().iter().enumerate() {
                let mut widest = if table.with_header {
                    self.renderer.measure(&column.name)
                } else {
                    0.0
                };
                for &row in &rows {
                    let Some(value) = column.values.get(row) else {
                        continue;
                    };
                    if let Some(shown) = format::cell_text(value, max) {
                        widest = widest.max(self.renderer.measure(&shown.text));
                    }
                }
                let width = (widest.ceil() as i64 + padding).clamp(min, max);
                self.display.columns.set_size(table.bbox.column + offset, width);
            }
        }
    }

    /// Filter button positions for the current scroll.
    pub fn filter_anchors(&self) -> Vec<FilterAnchor> {
        self.document.table_filter_anchors(&self.display)
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn render(&mut self) -> &Surface {
        let height = self.viewport.height;
        let renderer = &self.renderer;
        self.display.fit_left_locator(height, |label| renderer.measure(label));
        self.renderer
            .render(&self.display, &self.document, &self.selection, self.viewport)
    }
}
