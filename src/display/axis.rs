//! Per-axis geometry bookkeeping
//!
//! An [`Axis`] tracks one dimension of the grid (rows or columns). It keeps
//! four parallel sequences that are always re-derived together:
//!
//! - visibility flags, one per tracked logical item (empty = all visible)
//! - visible indices, the 0-based logical positions whose flag is `true`
//! - sizes, the pixel extent of each tracked logical item
//! - cumulative sizes, prefix sums over the *visible* tracked items
//!
//! Index 0 is the locator band and is never translated. Items past the
//! tracked region use the uniform default size, so the grid extends
//! without bound while only the populated region stores geometry.

/// Geometry of a single grid axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    default_size: i64,
    flags: Vec<bool>,
    visible: Vec<usize>,
    sizes: Vec<i64>,
    cumulative: Vec<i64>,
}

impl Axis {
    /// Create an axis where every item uses `default_size` pixels.
    pub fn new(default_size: i64) -> Self {
        Self {
            default_size: default_size.max(1),
            flags: Vec::new(),
            visible: Vec::new(),
            sizes: Vec::new(),
            cumulative: Vec::new(),
        }
    }

    /// Drop all visibility and size information.
    pub fn reset(&mut self) {
        self.flags.clear();
        self.visible.clear();
        self.sizes.clear();
        self.cumulative.clear();
    }

    #[inline]
    pub fn default_size(&self) -> i64 {
        self.default_size
    }

    #[inline]
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    #[inline]
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    #[inline]
    pub fn sizes(&self) -> &[i64] {
        &self.sizes
    }

    #[inline]
    pub fn cumulative(&self) -> &[i64] {
        &self.cumulative
    }

    /// Number of logical items with explicit size information.
    #[inline]
    pub fn tracked_len(&self) -> usize {
        self.sizes.len()
    }

    /// Replace the visibility flags. Sizes are extended with the default
    /// size so that every flagged item has a tracked size.
    pub fn set_visibility(&mut self, flags: Vec<bool>) {
        self.flags = flags;
        self.pad_sizes(self.flags.len());
        self.rebuild();
    }

    /// Hide a single logical item (1-based). Returns false for the locator.
    pub fn hide(&mut self, logical: usize) -> bool {
        if logical == 0 {
            return false;
        }
        if self.flags.len() < logical {
            self.flags.resize(logical, true);
        }
        self.flags[logical - 1] = false;
        self.pad_sizes(self.flags.len());
        self.rebuild();
        true
    }

    /// Make every item visible again.
    pub fn show_all(&mut self) {
        self.flags.clear();
        self.rebuild();
    }

    /// Set the size of one logical item (1-based).
    pub fn set_size(&mut self, logical: usize, size: i64) {
        if logical == 0 {
            return;
        }
        self.pad_sizes(logical);
        self.sizes[logical - 1] = size.max(0);
        self.rebuild();
    }

    /// Replace all tracked sizes at once.
    pub fn set_sizes(&mut self, sizes: Vec<i64>) {
        self.sizes = sizes.into_iter().map(|s| s.max(0)).collect();
        self.pad_sizes(self.flags.len());
        self.rebuild();
    }

    /// Make sure at least `len` items carry explicit sizes.
    pub fn ensure_tracked(&mut self, len: usize) {
        if self.sizes.len() < len {
            self.pad_sizes(len);
            self.rebuild();
        }
    }

    fn pad_sizes(&mut self, len: usize) {
        if self.sizes.len() < len {
            self.sizes.resize(len, self.default_size);
        }
    }

    fn rebuild(&mut self) {
        self.visible = self
            .flags
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(index, _)| index)
            .collect();

        self.cumulative.clear();
        let mut running = 0;
        for (index, size) in self.sizes.iter().enumerate() {
            if self.is_visible(index + 1) {
                running += size;
                self.cumulative.push(running);
            }
        }
    }

    #[inline]
    fn all_visible(&self) -> bool {
        self.flags.is_empty() || self.flags.len() == self.visible.len()
    }

    /// Whether a logical item (1-based) is visible. The locator always is.
    pub fn is_visible(&self, logical: usize) -> bool {
        if logical == 0 || logical > self.flags.len() {
            return true;
        }
        self.flags[logical - 1]
    }

    /// Total number of hidden items.
    pub fn hidden_total(&self) -> usize {
        self.flags.len() - self.visible.len()
    }

    /// Translate a visual index to its logical index.
    pub fn logical_from_visual(&self, visual: usize) -> usize {
        if visual == 0 || self.all_visible() {
            return visual;
        }
        if self.visible.is_empty() {
            return self.flags.len() + visual;
        }
        if visual <= self.visible.len() {
            return self.visible[visual - 1] + 1;
        }
        self.flags.len() + (visual - self.visible.len())
    }

    /// Translate a logical index to its visual index, `None` when hidden.
    pub fn visual_from_logical(&self, logical: usize) -> Option<usize> {
        if logical == 0 || self.all_visible() {
            return Some(logical);
        }
        if logical <= self.flags.len() {
            if !self.flags[logical - 1] {
                return None;
            }
            return Some(self.visible.partition_point(|&v| v < logical - 1) + 1);
        }
        Some(logical - self.hidden_total())
    }

    /// Visual index of a logical item, or of the closest visible item in
    /// the given direction when it is hidden. Searching backwards past the
    /// first item falls back to searching forwards.
    pub fn nearest_visual(&self, logical: usize, forward: bool) -> usize {
        if let Some(visual) = self.visual_from_logical(logical) {
            return visual;
        }
        if !forward {
            if let Some(visual) = (1..logical).rev().find_map(|l| self.visual_from_logical(l)) {
                return visual;
            }
        }
        // Items past the flagged region are always visible
        (logical + 1..)
            .find_map(|l| self.visual_from_logical(l))
            .unwrap_or(logical)
    }

    /// Size in pixels of a logical item (1-based).
    pub fn size_of_logical(&self, logical: usize) -> i64 {
        match logical {
            0 => 0,
            _ => self
                .sizes
                .get(logical - 1)
                .copied()
                .unwrap_or(self.default_size),
        }
    }

    /// Size in pixels of a visual item (1-based).
    pub fn size_of(&self, visual: usize) -> i64 {
        self.size_of_logical(self.logical_from_visual(visual))
    }

    /// Visual index of the item covering a content-relative pixel offset.
    ///
    /// Cells are half-open: a cell spans `[start, start + size)`.
    pub fn index_from_pixel(&self, offset: i64) -> usize {
        let offset = offset.max(0);
        let Some(&last) = self.cumulative.last() else {
            return (offset / self.default_size) as usize + 1;
        };
        if offset < last {
            return self.cumulative.partition_point(|&edge| edge <= offset) + 1;
        }
        self.cumulative.len() + ((offset - last) / self.default_size) as usize + 1
    }

    /// Content-relative pixel offset where a visual item starts.
    pub fn pixel_from_index(&self, visual: usize) -> i64 {
        if visual <= 1 {
            return 0;
        }
        let tracked = self.cumulative.len();
        if tracked == 0 {
            return count_to_i64(visual - 1).saturating_mul(self.default_size);
        }
        if visual - 1 <= tracked {
            return self.cumulative[visual - 2];
        }
        let untracked = count_to_i64(visual - 1 - tracked).saturating_mul(self.default_size);
        self.cumulative[tracked - 1].saturating_add(untracked)
    }

    /// First and last visual items intersecting `[offset, offset + length)`.
    pub fn visible_span(&self, offset: i64, length: i64) -> (usize, usize) {
        let first = self.index_from_pixel(offset);
        let last = self.index_from_pixel(offset + length.max(1) - 1);
        (first, last.max(first))
    }

    /// Number of hidden logical items between two visual indices.
    pub fn hidden_count_between(&self, visual_a: usize, visual_b: usize) -> usize {
        let (low, high) = if visual_a <= visual_b {
            (visual_a, visual_b)
        } else {
            (visual_b, visual_a)
        };
        let logical_gap = self.logical_from_visual(high) - self.logical_from_visual(low);
        logical_gap - (high - low)
    }

    /// Total pixel extent of the tracked visible items.
    pub fn tracked_extent(&self) -> i64 {
        self.cumulative.last().copied().unwrap_or(0)
    }
}

fn count_to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_with_hidden(hidden: &[usize], len: usize) -> Axis {
        let mut axis = Axis::new(20);
        let flags = (1..=len).map(|l| !hidden.contains(&l)).collect();
        axis.set_visibility(flags);
        axis
    }

    #[test]
    fn test_pixel_offsets_saturate_instead_of_overflowing() {
        let mut axis = Axis::new(20);
        assert_eq!(axis.pixel_from_index(usize::MAX), i64::MAX);
        axis.set_sizes(vec![30, 30]);
        assert_eq!(axis.pixel_from_index(usize::MAX), i64::MAX);
        assert_eq!(axis.pixel_from_index(4), 80);
    }

    #[test]
    fn test_identity_when_nothing_hidden() {
        let axis = Axis::new(20);
        for v in 0..50 {
            assert_eq!(axis.logical_from_visual(v), v);
            assert_eq!(axis.visual_from_logical(v), Some(v));
        }
    }

    #[test]
    fn test_visible_indices_match_flags() {
        let axis = axis_with_hidden(&[2, 4], 6);
        assert_eq!(axis.visible_indices(), &[0, 2, 4, 5]);
        assert_eq!(axis.hidden_total(), 2);
    }

    #[test]
    fn test_logical_visual_with_hidden() {
        let axis = axis_with_hidden(&[2, 4], 6);
        assert_eq!(axis.logical_from_visual(1), 1);
        assert_eq!(axis.logical_from_visual(2), 3);
        assert_eq!(axis.logical_from_visual(3), 5);
        assert_eq!(axis.logical_from_visual(4), 6);
        // Beyond the flagged region
        assert_eq!(axis.logical_from_visual(5), 7);

        assert_eq!(axis.visual_from_logical(2), None);
        assert_eq!(axis.visual_from_logical(3), Some(2));
        assert_eq!(axis.visual_from_logical(7), Some(5));
    }

    #[test]
    fn test_invertible_on_visible_items() {
        let axis = axis_with_hidden(&[1, 3, 8, 9], 12);
        for v in 1..40 {
            let logical = axis.logical_from_visual(v);
            assert_eq!(axis.visual_from_logical(logical), Some(v), "visual {v}");
        }
    }

    #[test]
    fn test_all_hidden_region() {
        let axis = axis_with_hidden(&[1, 2, 3], 3);
        assert_eq!(axis.logical_from_visual(1), 4);
        assert_eq!(axis.visual_from_logical(2), None);
        assert_eq!(axis.visual_from_logical(5), Some(2));
    }

    #[test]
    fn test_pixel_math_default_sizes() {
        let axis = Axis::new(20);
        assert_eq!(axis.index_from_pixel(0), 1);
        assert_eq!(axis.index_from_pixel(19), 1);
        assert_eq!(axis.index_from_pixel(20), 2);
        assert_eq!(axis.pixel_from_index(1), 0);
        assert_eq!(axis.pixel_from_index(3), 40);
    }

    #[test]
    fn test_pixel_math_tracked_then_extrapolated() {
        let mut axis = Axis::new(20);
        axis.set_sizes(vec![10, 30, 50]);
        assert_eq!(axis.cumulative(), &[10, 40, 90]);

        assert_eq!(axis.index_from_pixel(9), 1);
        assert_eq!(axis.index_from_pixel(10), 2);
        assert_eq!(axis.index_from_pixel(89), 3);
        assert_eq!(axis.index_from_pixel(90), 4);
        assert_eq!(axis.index_from_pixel(110), 5);

        assert_eq!(axis.pixel_from_index(2), 10);
        assert_eq!(axis.pixel_from_index(4), 90);
        assert_eq!(axis.pixel_from_index(5), 110);

        for v in 1..20 {
            let start = axis.pixel_from_index(v);
            assert_eq!(axis.index_from_pixel(start), v);
            assert_eq!(axis.pixel_from_index(v + 1) - start, axis.size_of(v));
        }
    }

    #[test]
    fn test_cumulative_skips_hidden_items() {
        let mut axis = Axis::new(20);
        axis.set_sizes(vec![10, 30, 50]);
        axis.hide(2);
        assert_eq!(axis.cumulative(), &[10, 60]);
        assert_eq!(axis.size_of(2), 50);
        assert_eq!(axis.pixel_from_index(3), 60);
    }

    #[test]
    fn test_hidden_count_between() {
        let axis = axis_with_hidden(&[2, 3, 6], 8);
        assert_eq!(axis.hidden_count_between(1, 2), 2);
        assert_eq!(axis.hidden_count_between(2, 1), 2);
        assert_eq!(axis.hidden_count_between(2, 3), 0);
        assert_eq!(axis.hidden_count_between(3, 4), 1);
    }

    #[test]
    fn test_visible_span() {
        let axis = Axis::new(20);
        assert_eq!(axis.visible_span(0, 100), (1, 5));
        assert_eq!(axis.visible_span(30, 100), (2, 7));
    }

    #[test]
    fn test_nearest_visual() {
        let axis = axis_with_hidden(&[2, 3], 5);
        assert_eq!(axis.nearest_visual(3, true), 2);
        assert_eq!(axis.nearest_visual(3, false), 1);
        assert_eq!(axis.nearest_visual(4, false), 2);
        let axis = axis_with_hidden(&[1], 3);
        assert_eq!(axis.nearest_visual(1, false), 1);
    }

    #[test]
    fn test_show_all_restores_identity() {
        let mut axis = axis_with_hidden(&[2], 4);
        axis.show_all();
        assert_eq!(axis.logical_from_visual(2), 2);
        assert_eq!(axis.cumulative().len(), 4);
    }
}
