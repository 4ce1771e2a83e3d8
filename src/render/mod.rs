//! Grid renderer
//!
//! Paints one frame in six passes, each clipped to the region it owns:
//!
//! 1. header backgrounds (locator bands)
//! 2. selection backgrounds
//! 3. header text (column names, row numbers)
//! 4. cell text, through the scroll-diff [`ContentCache`]
//! 5. cell borders
//! 6. selection borders
//!
//! Only the cell text pass is cached; the other passes are cheap fills and
//! a bounded number of short labels.

pub mod cache;
pub mod format;
pub mod frame;
pub mod text;

pub use cache::{CacheKind, CachePlan, ContentCache};
pub use format::{Align, CellText};
pub use frame::{Frame, Rect, Surface};
pub use text::{GlyphCache, TextPainter, Typeface};

use crate::display::{names, Axis, Display, Viewport};
use crate::document::Document;
use crate::selection::{CellType, Selection, SheetCell};
use crate::theme::Theme;

/// Thickness of selection borders and header highlights
const SELECTION_BORDER: i64 = 2;
/// Offset of the double hairline marking hidden rows/columns
const HIDDEN_MARK_OFFSET: i64 = 2;

/// Canvas regions of one frame
#[derive(Debug, Clone, Copy)]
struct Regions {
    canvas: Rect,
    top: Rect,
    left: Rect,
    content: Rect,
}

impl Regions {
    fn new(display: &Display, viewport: Viewport) -> Self {
        let (w, h) = (viewport.width.max(0), viewport.height.max(0));
        let (l, t) = (display.left_locator_width, display.top_locator_height);
        Self {
            canvas: Rect::new(0, 0, w, h),
            top: Rect::new(l, 0, (w - l).max(0), t),
            left: Rect::new(0, t, l, (h - t).max(0)),
            content: Rect::new(l, t, (w - l).max(0), (h - t).max(0)),
        }
    }
}

/// State the cached cell layer was painted against
#[derive(Debug, Clone, PartialEq)]
struct Painted {
    theme: Theme,
    revision: u64,
    columns: Axis,
    rows: Axis,
    left: i64,
    top: i64,
}

pub struct Renderer {
    typeface: Typeface,
    glyphs: GlyphCache,
    font_size: f32,
    padding: i64,
    theme: Theme,
    cache: ContentCache,
    canvas: Surface,
    painted: Option<Painted>,
    last_cache: CacheKind,
}

impl Renderer {
    pub fn new(typeface: Typeface, font_size: f32, padding: i64, theme: Theme) -> Self {
        Self {
            typeface,
            glyphs: GlyphCache::new(),
            font_size,
            padding,
            theme,
            cache: ContentCache::new(),
            canvas: Surface::new(0, 0, 0),
            painted: None,
            last_cache: CacheKind::Full,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Switch colors; cached cell text is repainted on the next frame.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            tracing::debug!(target: "render", "theme -> {}", theme.scheme.name());
            self.theme = theme;
        }
    }

    /// Drop the cached cell layer.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
        self.painted = None;
    }

    /// How the cell layer was updated by the last [`Renderer::render`].
    pub fn last_cache_kind(&self) -> CacheKind {
        self.last_cache
    }

    pub fn canvas(&self) -> &Surface {
        &self.canvas
    }

    /// Width of `text` in pixels at the grid font size.
    pub fn measure(&self, text: &str) -> f32 {
        self.typeface.measure(text, self.font_size)
    }

    fn line_height(&self) -> i64 {
        self.typeface.line_height(self.font_size).ceil() as i64
    }

    /// Paint a full frame and return it.
    pub fn render(
        &mut self,
        display: &Display,
        document: &Document,
        selection: &Selection,
        viewport: Viewport,
    ) -> &Surface {
        let regions = Regions::new(display, viewport);
        let (width, height) = (regions.canvas.width as usize, regions.canvas.height as usize);
        if self.canvas.width() != width || self.canvas.height() != height {
            tracing::debug!(target: "render", width, height, "canvas resized");
        }
        self.check_painted(display, document);

        let mut canvas = std::mem::replace(&mut self.canvas, Surface::new(0, 0, 0));
        if canvas.width() != width || canvas.height() != height {
            canvas = Surface::new(width, height, 0);
        }
        {
            let mut frame = canvas.frame();
            frame.clear(self.theme.background.to_argb_u32());

            self.draw_header_backgrounds(&mut frame, &regions);
            self.draw_selection_backgrounds(&mut frame, &regions, display, selection);
            self.draw_header_text(&mut frame, &regions, display);
            self.draw_cell_text(&mut frame, &regions, display, document);
            self.draw_cell_borders(&mut frame, &regions, display);
            self.draw_selection_borders(&mut frame, &regions, display, selection);
        }
        self.canvas = canvas;
        &self.canvas
    }

    /// Invalidate the cell layer when anything it depends on changed.
    fn check_painted(&mut self, display: &Display, document: &Document) {
        let unchanged = self.painted.as_ref().is_some_and(|p| {
            p.theme == self.theme
                && p.revision == document.revision()
                && p.left == display.left_locator_width
                && p.top == display.top_locator_height
                && p.columns == display.columns
                && p.rows == display.rows
        });
        if unchanged {
            return;
        }
        self.cache.invalidate();
        self.painted = Some(Painted {
            theme: self.theme,
            revision: document.revision(),
            columns: display.columns.clone(),
            rows: display.rows.clone(),
            left: display.left_locator_width,
            top: display.top_locator_height,
        });
    }

    // -----------------------------------------------------------------------
    // Passes
    // -----------------------------------------------------------------------

    fn draw_header_backgrounds(&self, frame: &mut Frame, regions: &Regions) {
        let color = self.theme.header_background.to_argb_u32();
        let canvas = regions.canvas;
        frame.fill_rect(Rect::new(0, 0, canvas.width, regions.top.height), color);
        frame.fill_rect(regions.left, color);
    }

    fn draw_selection_backgrounds(
        &self,
        frame: &mut Frame,
        regions: &Regions,
        display: &Display,
        selection: &Selection,
    ) {
        let range = &selection.current_active_range;
        if range.is_empty() {
            return;
        }
        let area = selection_area(range, display, regions);
        let fill = self.theme.selection_fill().to_argb_u32();

        // Header segments of the selected columns and rows
        let columns = Rect::new(area.x, 0, area.width, regions.top.height).intersect(&regions.top);
        let rows = Rect::new(0, area.y, regions.left.width, area.height).intersect(&regions.left);

        match range.ctype {
            CellType::Corner => {
                let corner = Rect::new(0, 0, regions.left.width, regions.top.height);
                frame.fill_rect_blended(corner, fill);
                frame.fill_rect_blended(regions.top, fill);
                frame.fill_rect_blended(regions.left, fill);
            }
            CellType::Top => {
                frame.fill_rect_blended(columns, fill);
                frame.fill_rect_blended(regions.left, fill);
            }
            CellType::Left => {
                frame.fill_rect_blended(regions.top, fill);
                frame.fill_rect_blended(rows, fill);
            }
            CellType::Content => {
                frame.fill_rect_blended(columns, fill);
                frame.fill_rect_blended(rows, fill);
                if !range.is_range() {
                    return;
                }
            }
        }
        frame.fill_rect_blended(area.intersect(&regions.content), fill);

        // The anchor stays unhighlighted inside a range
        let active = cell_rect(&selection.current_active_cell, display).intersect(&regions.content);
        frame.fill_rect(active, self.theme.active_fill.to_argb_u32());
    }

    fn draw_header_text(&mut self, frame: &mut Frame, regions: &Regions, display: &Display) {
        let color = self.theme.header_text.to_argb_u32();
        let line_height = self.line_height();
        let padding = self.padding;
        let mut painter = TextPainter::new(&self.typeface, &mut self.glyphs, self.font_size);

        if !regions.top.is_empty() {
            let last = display.ending_column(regions.canvas.width);
            for column in display.starting_column()..=last {
                let rect = Rect::new(
                    display.cell_x_from_column(column),
                    0,
                    display.cell_width_from_column(column),
                    regions.top.height,
                );
                let label = names::column_name(display.lcolumn_from_column(column));
                frame.set_clip(rect.intersect(&regions.top));
                let text = CellText {
                    text: label,
                    align: Align::Center,
                    is_error: false,
                };
                draw_in_cell(&mut painter, frame, rect, &text, padding, line_height, color);
            }
        }

        if !regions.left.is_empty() {
            let last = display.ending_row(regions.canvas.height);
            for row in display.starting_row()..=last {
                let rect = Rect::new(
                    0,
                    display.cell_y_from_row(row),
                    regions.left.width,
                    display.cell_height_from_row(row),
                );
                let label = display.lrow_from_row(row).to_string();
                frame.set_clip(rect.intersect(&regions.left));
                let text = CellText {
                    text: label,
                    align: Align::Right,
                    is_error: false,
                };
                draw_in_cell(&mut painter, frame, rect, &text, padding, line_height, color);
            }
        }
        frame.clear_clip();
    }

    fn draw_cell_text(&mut self, frame: &mut Frame, regions: &Regions, display: &Display, document: &Document) {
        let content = regions.content;
        let plan = self.cache.prepare(
            content.width as usize,
            content.height as usize,
            display.scroll_x,
            display.scroll_y,
        );
        self.last_cache = plan.kind;
        for dirty in &plan.dirty {
            self.paint_cells(display, document, *dirty);
        }

        frame.set_clip(content);
        frame.draw_layer(self.cache.layer(), content.x, content.y);
        frame.clear_clip();
    }

    /// Clear and redraw every cell overlapping a layer-local rectangle.
    fn paint_cells(&mut self, display: &Display, document: &Document, dirty: Rect) {
        if dirty.is_empty() {
            return;
        }
        let (l, t) = (display.left_locator_width, display.top_locator_height);
        let first_column = display.column_from_point(dirty.x + l).max(1);
        let last_column = display.column_from_point(dirty.right() - 1 + l).max(first_column);
        let first_row = display.row_from_point(dirty.y + t).max(1);
        let last_row = display.row_from_point(dirty.bottom() - 1 + t).max(first_row);

        let line_height = self.line_height();
        let padding = self.padding;
        let text_color = self.theme.text.to_argb_u32();
        let error_color = self.theme.error_text.to_argb_u32();

        let mut frame = self.cache.layer_mut().frame();
        let mut painter = TextPainter::new(&self.typeface, &mut self.glyphs, self.font_size);

        for row in first_row..=last_row {
            let lrow = display.lrow_from_row(row);
            let y = display.cell_y_from_row(row) - t;
            let h = display.cell_height_from_row(row);
            for column in first_column..=last_column {
                let cell = Rect::new(
                    display.cell_x_from_column(column) - l,
                    y,
                    display.cell_width_from_column(column),
                    h,
                );
                frame.clear_clip();
                frame.fill_rect(cell, 0);

                let read = document.read(display.lcolumn_from_column(column), lrow);
                let shown = match (&read.dtype, &read.value) {
                    // Header cells report no type
                    (None, value) if !value.is_null() => format::header_text(&value.to_string(), cell.width),
                    (_, value) => format::cell_text(value, cell.width),
                };
                let Some(shown) = shown else {
                    continue;
                };
                let color = if shown.is_error { error_color } else { text_color };
                frame.set_clip(cell);
                draw_in_cell(&mut painter, &mut frame, cell, &shown, padding, line_height, color);
            }
        }
        frame.clear_clip();
    }

    fn draw_cell_borders(&self, frame: &mut Frame, regions: &Regions, display: &Display) {
        let grid = self.theme.grid_line.to_argb_u32();
        let canvas = regions.canvas;
        let (l, t) = (regions.left.width, regions.top.height);

        if !regions.content.is_empty() {
            frame.set_clip(Rect::new(l, 0, canvas.width - l, canvas.height));
            for column in display.starting_column()..=display.ending_column(canvas.width) {
                let x = display.cell_x_from_column(column) + display.cell_width_from_column(column) - 1;
                frame.vline(x, 0, canvas.height, 1, grid);
                if display.hidden_columns_between(column, column + 1) > 0 {
                    frame.vline(x - HIDDEN_MARK_OFFSET, 0, t, 1, grid);
                    frame.vline(x + HIDDEN_MARK_OFFSET, 0, t, 1, grid);
                }
            }

            frame.set_clip(Rect::new(0, t, canvas.width, canvas.height - t));
            for row in display.starting_row()..=display.ending_row(canvas.height) {
                let y = display.cell_y_from_row(row) + display.cell_height_from_row(row) - 1;
                frame.hline(0, y, canvas.width, 1, grid);
                if display.hidden_rows_between(row, row + 1) > 0 {
                    frame.hline(0, y - HIDDEN_MARK_OFFSET, l, 1, grid);
                    frame.hline(0, y + HIDDEN_MARK_OFFSET, l, 1, grid);
                }
            }
        }

        frame.clear_clip();
        frame.vline(l - 1, 0, canvas.height, 1, grid);
        frame.hline(0, t - 1, canvas.width, 1, grid);
    }

    fn draw_selection_borders(
        &self,
        frame: &mut Frame,
        regions: &Regions,
        display: &Display,
        selection: &Selection,
    ) {
        let accent = self.theme.accent.to_argb_u32();
        let range = &selection.current_active_range;
        if range.is_empty() {
            return;
        }
        let area = selection_area(range, display, regions);
        let (top, left) = (regions.top, regions.left);
        let under_columns = (area.x, top.height - SELECTION_BORDER, area.width);
        let beside_rows = (left.width - SELECTION_BORDER, area.y, area.height);

        match range.ctype {
            // Whole sheet: both header bands are underlined end to end
            CellType::Corner => {
                frame.set_clip(top);
                frame.hline(top.x, under_columns.1, top.width, SELECTION_BORDER, accent);
                frame.set_clip(left);
                frame.vline(beside_rows.0, left.y, left.height, SELECTION_BORDER, accent);
            }
            // Whole columns: the outline runs off the top and bottom of the
            // content area
            CellType::Top => {
                frame.set_clip(regions.content);
                frame.stroke_rect(area, SELECTION_BORDER, accent);
                frame.set_clip(top);
                frame.hline(under_columns.0, under_columns.1, under_columns.2, SELECTION_BORDER, accent);
                frame.set_clip(left);
                frame.vline(beside_rows.0, left.y, left.height, SELECTION_BORDER, accent);
            }
            // Whole rows: the outline runs off the left and right
            CellType::Left => {
                frame.set_clip(regions.content);
                frame.stroke_rect(area, SELECTION_BORDER, accent);
                frame.set_clip(top);
                frame.hline(top.x, under_columns.1, top.width, SELECTION_BORDER, accent);
                frame.set_clip(left);
                frame.vline(beside_rows.0, beside_rows.1, beside_rows.2, SELECTION_BORDER, accent);
            }
            CellType::Content => {
                frame.set_clip(regions.content);
                frame.stroke_rect(area, SELECTION_BORDER, accent);
                frame.set_clip(top);
                frame.hline(under_columns.0, under_columns.1, under_columns.2, SELECTION_BORDER, accent);
                frame.set_clip(left);
                frame.vline(beside_rows.0, beside_rows.1, beside_rows.2, SELECTION_BORDER, accent);
            }
        }
        frame.clear_clip();
    }
}

/// Canvas rectangle of one selection cell, recomputed from the display so
/// scrolling needs no selection update.
fn cell_rect(cell: &SheetCell, display: &Display) -> Rect {
    Rect::new(
        display.cell_x_from_column(cell.column),
        display.cell_y_from_row(cell.row),
        display.cell_width_from_column(cell.column),
        display.cell_height_from_row(cell.row),
    )
}

/// Canvas rectangle of the active range.
///
/// Unbounded extents (whole rows or columns) reach slightly past the
/// content area so their outer borders fall outside the clip.
fn selection_area(range: &SheetCell, display: &Display, regions: &Regions) -> Rect {
    let content = regions.content;
    let reach = SELECTION_BORDER;
    let across = (content.x - reach, content.width + 2 * reach);
    let down = (content.y - reach, content.height + 2 * reach);

    let columns = || {
        let last = range.column + range.column_span.max(1) as usize - 1;
        let x = display.cell_x_from_column(range.column);
        (x, display.cell_x_from_column(last) + display.cell_width_from_column(last) - x)
    };
    let rows = || {
        let last = range.row + range.row_span.max(1) as usize - 1;
        let y = display.cell_y_from_row(range.row);
        (y, display.cell_y_from_row(last) + display.cell_height_from_row(last) - y)
    };

    let ((x, width), (y, height)) = match range.ctype {
        CellType::Corner => (across, down),
        CellType::Top => (columns(), down),
        CellType::Left => (across, rows()),
        CellType::Content => (columns(), rows()),
    };
    Rect::new(x, y, width, height)
}

fn draw_in_cell(
    painter: &mut TextPainter,
    frame: &mut Frame,
    cell: Rect,
    text: &CellText,
    padding: i64,
    line_height: i64,
    color: u32,
) {
    let text_width = painter.measure_width(&text.text).ceil() as i64;
    let x = match text.align {
        Align::Left => cell.x + padding,
        Align::Right => cell.right() - padding - text_width,
        Align::Center => cell.x + (cell.width - text_width) / 2,
    };
    let y = cell.y + (cell.height - line_height) / 2;
    painter.draw(frame, x, y, &text.text, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CellValue, Column, DataType, TableContent};
    use crate::selection::{GridContext, SelectOptions};

    const VIEWPORT: Viewport = Viewport::new(400, 300);

    fn renderer() -> Renderer {
        Renderer::new(Typeface::Fallback, 12.0, 6, Theme::dark())
    }

    fn document() -> Document {
        let mut document = Document::new();
        let values = (0..40).map(|i| CellValue::Int(i * 7)).collect();
        document.create_table(
            TableContent::new(vec![Column::new("value", DataType::Int64, values)]),
            true,
            1,
            1,
            "",
        );
        document
    }

    #[test]
    fn test_cache_reused_without_changes() {
        let mut renderer = renderer();
        let display = Display::default();
        let document = document();
        let selection = Selection::new();

        renderer.render(&display, &document, &selection, VIEWPORT);
        assert_eq!(renderer.last_cache_kind(), CacheKind::Full);
        renderer.render(&display, &document, &selection, VIEWPORT);
        assert_eq!(renderer.last_cache_kind(), CacheKind::Reuse);
    }

    #[test]
    fn test_theme_change_invalidates() {
        let mut renderer = renderer();
        let display = Display::default();
        let document = document();
        let selection = Selection::new();

        renderer.render(&display, &document, &selection, VIEWPORT);
        let dark = renderer.canvas().pixel(200, 200);
        renderer.set_theme(Theme::light());
        renderer.render(&display, &document, &selection, VIEWPORT);
        assert_eq!(renderer.last_cache_kind(), CacheKind::Full);
        assert_ne!(renderer.canvas().pixel(200, 200), dark);
    }

    #[test]
    fn test_small_scroll_blits() {
        let mut renderer = renderer();
        let mut display = Display::default();
        let document = document();
        let selection = Selection::new();

        renderer.render(&display, &document, &selection, VIEWPORT);
        display.set_scroll(0, 20);
        renderer.render(&display, &document, &selection, VIEWPORT);
        assert_eq!(renderer.last_cache_kind(), CacheKind::Blit);
    }

    #[test]
    fn test_selection_fill_in_headers() {
        let mut renderer = renderer();
        let mut display = Display::default();
        let document = document();
        let mut selection = Selection::new();
        {
            let mut ctx = GridContext::new(&mut display, &document, VIEWPORT);
            selection.select_by_position(2, 2, 3, 3, SelectOptions::default(), &mut ctx);
        }
        renderer.render(&display, &document, &selection, VIEWPORT);
        let canvas = renderer.canvas();
        let plain = canvas.pixel((display.cell_x_from_column(5) + 3) as usize, 3);
        let selected = canvas.pixel((display.cell_x_from_column(2) + 3) as usize, 3);
        assert_ne!(plain, selected);
    }

    fn render_selecting(col_1: usize, row_1: usize, col_2: usize, row_2: usize) -> Surface {
        let mut renderer = renderer();
        let mut display = Display::default();
        let document = document();
        let mut selection = Selection::new();
        {
            let mut ctx = GridContext::new(&mut display, &document, VIEWPORT);
            let options = SelectOptions::default();
            selection.select_by_position(col_1, row_1, col_2, row_2, options, &mut ctx);
        }
        renderer.render(&display, &document, &selection, VIEWPORT).clone()
    }

    #[test]
    fn test_selection_passes_per_range_kind() {
        // Single cell away from every sampled pixel
        let baseline = render_selecting(5, 10, 5, 10);

        // Whole column C: its content and the whole row band light up
        let column = render_selecting(3, 0, 3, 0);
        assert_ne!(column.pixel(185, 150), baseline.pixel(185, 150));
        assert_eq!(column.pixel(315, 150), baseline.pixel(315, 150));
        assert_ne!(column.pixel(5, 150), baseline.pixel(5, 150));

        // Whole row 5: its content and the whole column band light up
        let row = render_selecting(0, 5, 0, 5);
        assert_ne!(row.pixel(300, 110), baseline.pixel(300, 110));
        assert_eq!(row.pixel(300, 170), baseline.pixel(300, 170));
        assert_ne!(row.pixel(380, 5), baseline.pixel(380, 5));

        // Whole sheet: the corner square too
        let corner = render_selecting(0, 0, 0, 0);
        assert_ne!(corner.pixel(5, 5), baseline.pixel(5, 5));
        assert_ne!(corner.pixel(300, 170), baseline.pixel(300, 170));
        assert_eq!(column.pixel(5, 5), baseline.pixel(5, 5));
    }

    #[test]
    fn test_selection_area_resolves_sentinels() {
        let display = Display::default();
        let regions = Regions::new(&display, VIEWPORT);
        let whole_rows = SheetCell {
            column: 0,
            row: 2,
            column_span: -1,
            row_span: 1,
            ctype: CellType::Left,
            ..Default::default()
        };
        let area = selection_area(&whole_rows, &display, &regions);
        assert!(area.x < regions.content.x);
        assert!(area.right() > regions.content.right());
        assert_eq!(area.y, display.cell_y_from_row(2));
        assert_eq!(area.height, 20);
    }
}
