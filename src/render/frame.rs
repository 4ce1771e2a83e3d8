//! Pixel surfaces and drawing primitives
//!
//! `Surface` owns an ARGB (0xAARRGGBB) buffer; `Frame` borrows one and
//! draws into it with an optional clip rectangle. All coordinates are
//! signed so that geometry scrolled past the top-left edge clips instead
//! of wrapping.

/// Axis-aligned pixel rectangle (inclusive start, exclusive end)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn right(&self) -> i64 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlapping area, empty when the rectangles are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersect(other).is_empty()
    }

    pub fn translate(&self, dx: i64, dy: i64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Blend a foreground color onto an opaque background.
///
/// Returns the blended color with full opacity (alpha = 0xFF).
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let bg_r = ((bg >> 16) & 0xFF) as f32;
    let bg_g = ((bg >> 8) & 0xFF) as f32;
    let bg_b = (bg & 0xFF) as f32;

    let fg_r = ((fg >> 16) & 0xFF) as f32;
    let fg_g = ((fg >> 8) & 0xFF) as f32;
    let fg_b = (fg & 0xFF) as f32;

    let final_r = (bg_r * (1.0 - alpha) + fg_r * alpha) as u32;
    let final_g = (bg_g * (1.0 - alpha) + fg_g * alpha) as u32;
    let final_b = (bg_b * (1.0 - alpha) + fg_b * alpha) as u32;

    0xFF000000 | (final_r << 16) | (final_g << 8) | final_b
}

/// Porter-Duff "over" for a possibly transparent destination.
///
/// `coverage` scales the source alpha. Used on the cell text layer, which
/// starts fully transparent and is composited onto the frame later.
#[inline]
pub fn composite_over(dst: u32, src: u32, coverage: f32) -> u32 {
    let src_a = ((src >> 24) & 0xFF) as f32 / 255.0 * coverage;
    if src_a <= 0.0 {
        return dst;
    }
    let dst_a = ((dst >> 24) & 0xFF) as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return 0;
    }

    let channel = |shift: u32| {
        let s = ((src >> shift) & 0xFF) as f32;
        let d = ((dst >> shift) & 0xFF) as f32;
        ((s * src_a + d * dst_a * (1.0 - src_a)) / out_a).round() as u32
    };

    let a = (out_a * 255.0).round() as u32;
    (a << 24) | (channel(16) << 16) | (channel(8) << 8) | channel(0)
}

/// Owned pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Surface filled with `color`
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Self {
            pixels: vec![color; width * height],
            width,
            height,
        }
    }

    /// Fully transparent surface
    pub fn transparent(width: usize, height: usize) -> Self {
        Self::new(width, height, 0)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    pub fn frame(&mut self) -> Frame<'_> {
        Frame::new(&mut self.pixels, self.width, self.height)
    }

    /// Copy `source` so that its pixel `(x, y)` lands at `(x - dx, y - dy)`.
    /// Pixels with no source counterpart are left untouched.
    pub fn copy_shifted(&mut self, source: &Surface, dx: i64, dy: i64) {
        for y in 0..self.height {
            let sy = y as i64 + dy;
            if sy < 0 || sy >= source.height as i64 {
                continue;
            }
            let sy = sy as usize;
            let x0 = (-dx).max(0) as usize;
            let x1 = (source.width as i64 - dx).clamp(0, self.width as i64) as usize;
            if x0 >= x1 {
                continue;
            }
            let sx0 = (x0 as i64 + dx) as usize;
            let dst_row = y * self.width;
            let src_row = sy * source.width;
            self.pixels[dst_row + x0..dst_row + x1]
                .copy_from_slice(&source.pixels[src_row + sx0..src_row + sx0 + (x1 - x0)]);
        }
    }

    /// Convert to RGBA bytes for image encoders.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &pixel in &self.pixels {
            bytes.push(((pixel >> 16) & 0xFF) as u8);
            bytes.push(((pixel >> 8) & 0xFF) as u8);
            bytes.push((pixel & 0xFF) as u8);
            bytes.push(((pixel >> 24) & 0xFF) as u8);
        }
        bytes
    }
}

/// Clipping rectangle in pixel coordinates (inclusive start, exclusive end).
#[derive(Clone, Copy, Debug)]
struct ClipRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// A frame buffer wrapper providing safe drawing primitives.
///
/// Out-of-bounds operations are clipped.
pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    clip: Option<ClipRect>,
}

impl<'a> Frame<'a> {
    /// If the buffer is smaller than width*height, the height is adjusted
    /// to match the actual buffer size.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let expected_size = width * height;
        let actual_size = buffer.len();

        let (width, height) = if actual_size < expected_size && width > 0 {
            (width, actual_size / width)
        } else {
            (width, height)
        };

        Self {
            buffer,
            width,
            height,
            clip: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Constrain subsequent drawing to `rect`.
    pub fn set_clip(&mut self, rect: Rect) {
        let (x0, x1) = self.span(rect.x, rect.right(), 0, self.width);
        let (y0, y1) = self.span(rect.y, rect.bottom(), 0, self.height);
        self.clip = Some(ClipRect { x0, y0, x1, y1 });
    }

    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    #[inline]
    fn bounds(&self) -> ClipRect {
        self.clip.unwrap_or(ClipRect {
            x0: 0,
            y0: 0,
            x1: self.width,
            y1: self.height,
        })
    }

    #[inline]
    fn span(&self, start: i64, end: i64, min: usize, max: usize) -> (usize, usize) {
        let s = start.clamp(min as i64, max as i64) as usize;
        let e = end.clamp(min as i64, max as i64) as usize;
        (s, e.max(s))
    }

    /// Rectangle clipped to the frame and the clip rect, as index ranges.
    fn clipped(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let b = self.bounds();
        let (x0, x1) = self.span(rect.x, rect.right(), b.x0, b.x1);
        let (y0, y1) = self.span(rect.y, rect.bottom(), b.y0, b.y1);
        (x0, y0, x1, y1)
    }

    /// Clear the entire buffer with a solid color
    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill a rectangle with a solid color (no alpha blending)
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let (x0, y0, x1, y1) = self.clipped(rect);
        for y in y0..y1 {
            let row_start = y * self.width;
            self.buffer[row_start + x0..row_start + x1].fill(color);
        }
    }

    /// Fill a rectangle with alpha blending (color is ARGB format)
    pub fn fill_rect_blended(&mut self, rect: Rect, color: u32) {
        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        if alpha >= 1.0 {
            return self.fill_rect(rect, color | 0xFF000000);
        }

        let (x0, y0, x1, y1) = self.clipped(rect);
        for y in y0..y1 {
            let row_start = y * self.width;
            for x in x0..x1 {
                let idx = row_start + x;
                self.buffer[idx] = blend_colors(self.buffer[idx], color, alpha);
            }
        }
    }

    /// Horizontal line of `thickness` pixels starting at `(x, y)`.
    pub fn hline(&mut self, x: i64, y: i64, length: i64, thickness: i64, color: u32) {
        self.fill_rect_blended(Rect::new(x, y, length, thickness), color);
    }

    /// Vertical line of `thickness` pixels starting at `(x, y)`.
    pub fn vline(&mut self, x: i64, y: i64, length: i64, thickness: i64, color: u32) {
        self.fill_rect_blended(Rect::new(x, y, thickness, length), color);
    }

    /// Outline of `rect` drawn inside its bounds.
    pub fn stroke_rect(&mut self, rect: Rect, thickness: i64, color: u32) {
        self.hline(rect.x, rect.y, rect.width, thickness, color);
        self.hline(rect.x, rect.bottom() - thickness, rect.width, thickness, color);
        self.vline(rect.x, rect.y + thickness, rect.height - 2 * thickness, thickness, color);
        self.vline(rect.right() - thickness, rect.y + thickness, rect.height - 2 * thickness, thickness, color);
    }

    /// Get a single pixel (returns 0 if out of bounds)
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64) -> u32 {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buffer[y as usize * self.width + x as usize]
        } else {
            0
        }
    }

    /// Draw `color` at `coverage` over a possibly transparent pixel.
    #[inline]
    pub fn composite_pixel(&mut self, x: i64, y: i64, color: u32, coverage: f32) {
        if let Some(idx) = self.index(x, y) {
            self.buffer[idx] = composite_over(self.buffer[idx], color, coverage);
        }
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let b = self.bounds();
        if x < b.x0 as i64 || y < b.y0 as i64 || x >= b.x1 as i64 || y >= b.y1 as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Composite a transparent layer with its top-left corner at `(x, y)`.
    pub fn draw_layer(&mut self, layer: &Surface, x: i64, y: i64) {
        let (x0, y0, x1, y1) = self.clipped(Rect::new(x, y, layer.width as i64, layer.height as i64));
        for py in y0..y1 {
            let ly = (py as i64 - y) as usize;
            for px in x0..x1 {
                let lx = (px as i64 - x) as usize;
                let src = layer.pixels[ly * layer.width + lx];
                let alpha = (src >> 24) & 0xFF;
                if alpha == 0 {
                    continue;
                }
                let idx = py * self.width + px;
                self.buffer[idx] = blend_colors(self.buffer[idx], src, alpha as f32 / 255.0);
            }
        }
    }
}
