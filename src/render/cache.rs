//! Scroll-diff cache for the cell text layer
//!
//! The layer is a transparent surface covering the content area (the canvas
//! minus the locator bands), painted for one scroll position. When the
//! scroll position moves by less than the content extent on both axes the
//! old pixels are shifted into a fresh layer and only the exposed strips are
//! handed back for redraw. Bigger jumps and invalidations redraw everything.
//!
//! ```text
//!   scrolled by (dx, dy) = (+2 cols, +1 row)
//!   ┌──────────────┬───┐
//!   │  shifted     │ E │   E = exposed, redrawn
//!   │  old pixels  │   │
//!   ├──────────────┤   │
//!   │      E       │   │
//!   └──────────────┴───┘
//! ```

use super::frame::{Rect, Surface};

/// How the layer was brought up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// Same scroll and size, nothing to draw
    Reuse,
    /// Old pixels shifted, exposed strips need drawing
    Blit,
    /// Layer cleared, everything needs drawing
    Full,
}

/// Work the renderer must do on the layer this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePlan {
    pub kind: CacheKind,
    /// Layer-local rectangles whose cells must be cleared and redrawn
    pub dirty: Vec<Rect>,
}

#[derive(Debug)]
pub struct ContentCache {
    layer: Surface,
    scroll_x: i64,
    scroll_y: i64,
    valid: bool,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache {
    pub fn new() -> Self {
        Self {
            layer: Surface::transparent(0, 0),
            scroll_x: 0,
            scroll_y: 0,
            valid: false,
        }
    }

    /// Drop the cached pixels; the next frame redraws in full.
    pub fn invalidate(&mut self) {
        if self.valid {
            tracing::trace!(target: "render", "content cache invalidated");
        }
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn layer(&self) -> &Surface {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut Surface {
        &mut self.layer
    }

    /// Scroll position the layer currently represents.
    pub fn anchor(&self) -> (i64, i64) {
        (self.scroll_x, self.scroll_y)
    }

    /// Bring the layer to `width`x`height` at the given scroll position and
    /// report what still has to be drawn.
    ///
    /// A size change keeps the pixels that are still valid: the layer is
    /// anchored at its top-left corner, so growing only exposes the new
    /// right and bottom strips.
    pub fn prepare(&mut self, width: usize, height: usize, scroll_x: i64, scroll_y: i64) -> CachePlan {
        let full = Rect::new(0, 0, width as i64, height as i64);
        let resized = self.layer.width() != width || self.layer.height() != height;
        let dx = scroll_x - self.scroll_x;
        let dy = scroll_y - self.scroll_y;

        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;

        if self.valid && !resized && dx == 0 && dy == 0 {
            return CachePlan {
                kind: CacheKind::Reuse,
                dirty: Vec::new(),
            };
        }

        let within_reach = dx.abs() < width as i64 && dy.abs() < height as i64;
        if !self.valid || !within_reach {
            tracing::trace!(target: "render", dx, dy, "content cache full redraw");
            self.layer = Surface::transparent(width, height);
            self.valid = true;
            return CachePlan {
                kind: CacheKind::Full,
                dirty: if full.is_empty() { Vec::new() } else { vec![full] },
            };
        }

        // Old layer pixels, in new layer coordinates
        let copied = Rect::new(
            -dx,
            -dy,
            self.layer.width() as i64,
            self.layer.height() as i64,
        )
        .intersect(&full);

        let mut layer = Surface::transparent(width, height);
        layer.copy_shifted(&self.layer, dx, dy);
        self.layer = layer;

        let dirty = exposed_strips(full, copied);
        tracing::trace!(target: "render", dx, dy, strips = dirty.len(), "content cache blit");
        CachePlan {
            kind: CacheKind::Blit,
            dirty,
        }
    }
}

/// Parts of `area` not covered by `kept`.
fn exposed_strips(area: Rect, kept: Rect) -> Vec<Rect> {
    if kept.is_empty() {
        return if area.is_empty() { Vec::new() } else { vec![area] };
    }
    let strips = [
        // left and right, full height
        Rect::new(area.x, area.y, kept.x - area.x, area.height),
        Rect::new(kept.right(), area.y, area.right() - kept.right(), area.height),
        // top and bottom, between the side strips
        Rect::new(kept.x, area.y, kept.width, kept.y - area.y),
        Rect::new(kept.x, kept.bottom(), kept.width, area.bottom() - kept.bottom()),
    ];
    strips.into_iter().filter(|r| !r.is_empty()).collect()
}
