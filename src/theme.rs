//! Color schemes for the grid
//!
//! Two built-in schemes mirror the host's dark and light modes. Switching
//! scheme invalidates the render cache since cached cell text is colored.

use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to ARGB u32 for the framebuffer
    pub const fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Return a new color with the specified alpha value
    pub const fn with_alpha(&self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// Which built-in scheme is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Dark,
    Light,
}

impl Scheme {
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Dark => "dark",
            Scheme::Light => "light",
        }
    }
}

/// Resolved colors used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub scheme: Scheme,
    /// Content area background
    pub background: Color,
    /// Locator bands
    pub header_background: Color,
    pub header_text: Color,
    pub grid_line: Color,
    pub text: Color,
    /// Fill of the active cell inside a range
    pub active_fill: Color,
    /// Selection accent; fills use it at 20% alpha
    pub accent: Color,
    /// Marker for values that cannot be shown
    pub error_text: Color,
}

/// 20% of 255
const SELECTION_FILL_ALPHA: u8 = 51;

impl Theme {
    pub const fn dark() -> Self {
        Self {
            scheme: Scheme::Dark,
            background: Color::rgb(0x21, 0x21, 0x26),
            header_background: Color::rgb(0x2B, 0x2B, 0x31),
            header_text: Color::rgb(0xBF, 0xBF, 0xC4),
            grid_line: Color::rgb(0x40, 0x40, 0x40),
            text: Color::rgb(0xFF, 0xFF, 0xFF),
            active_fill: Color::rgb(0x21, 0x21, 0x26),
            accent: Color::rgb(0x35, 0x84, 0xE4),
            error_text: Color::rgb(0xF6, 0x61, 0x51),
        }
    }

    pub const fn light() -> Self {
        Self {
            scheme: Scheme::Light,
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            header_background: Color::rgb(0xFF, 0xFF, 0xFF),
            header_text: Color::rgb(0x40, 0x40, 0x40),
            grid_line: Color::rgb(0xBF, 0xBF, 0xBF),
            text: Color::rgb(0x00, 0x00, 0x00),
            active_fill: Color::rgb(0xFA, 0xFA, 0xFA),
            accent: Color::rgb(0x1C, 0x71, 0xD8),
            error_text: Color::rgb(0xC0, 0x1C, 0x28),
        }
    }

    pub const fn for_scheme(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Dark => Self::dark(),
            Scheme::Light => Self::light(),
        }
    }

    /// Translucent accent for range and header fills
    pub const fn selection_fill(&self) -> Color {
        self.accent.with_alpha(SELECTION_FILL_ALPHA)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_argb() {
        let color = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(color.to_argb_u32(), 0x78123456);
        assert_eq!(color.with_alpha(0xFF).to_argb_u32(), 0xFF123456);
    }

    #[test]
    fn test_schemes_differ() {
        assert_eq!(Theme::for_scheme(Scheme::Light).scheme, Scheme::Light);
        assert_ne!(Theme::dark().background, Theme::light().background);
        assert_eq!(Theme::dark().selection_fill().a, 51);
    }

    #[test]
    fn test_scheme_serde_names() {
        let scheme: Scheme = serde_yaml::from_str("light").unwrap();
        assert_eq!(scheme, Scheme::Light);
        assert_eq!(Scheme::Dark.name(), "dark");
    }
}
