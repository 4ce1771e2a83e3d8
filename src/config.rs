//! Sheet configuration persistence
//!
//! Stores user preferences in `~/.config/gridsheet/config.yaml`. Every field
//! has a default, so partial files are fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::display::GridMetrics;
use crate::theme::Scheme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub theme: Scheme,
    /// TTF/OTF used for cell text; block glyphs when unset
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub default_cell_width: i64,
    pub default_cell_height: i64,
    pub cell_padding: i64,
    pub left_locator_width: i64,
    pub top_locator_height: i64,
    /// Rows per wheel notch
    pub scroll_increment: i64,
    /// Rows per PageUp/PageDown
    pub page_increment: i64,
    /// Upper bound for auto-fitted column widths
    pub autofit_max_width: i64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        let metrics = GridMetrics::default();
        Self {
            theme: Scheme::default(),
            font_path: None,
            font_size: metrics.font_size,
            default_cell_width: metrics.default_cell_width,
            default_cell_height: metrics.default_cell_height,
            cell_padding: metrics.cell_padding,
            left_locator_width: metrics.left_locator_width,
            top_locator_height: metrics.top_locator_height,
            scroll_increment: metrics.scroll_increment,
            page_increment: metrics.page_increment,
            autofit_max_width: 160,
        }
    }
}

impl SheetConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Geometry subset handed to the display
    pub fn metrics(&self) -> GridMetrics {
        GridMetrics {
            default_cell_width: self.default_cell_width.max(1),
            default_cell_height: self.default_cell_height.max(1),
            cell_padding: self.cell_padding.max(0),
            font_size: if self.font_size > 0.0 { self.font_size } else { GridMetrics::default().font_size },
            left_locator_width: self.left_locator_width.max(0),
            top_locator_height: self.top_locator_height.max(0),
            scroll_increment: self.scroll_increment.max(1),
            page_increment: self.page_increment.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: SheetConfig = serde_yaml::from_str("theme: light\nfont_size: 14\n").unwrap();
        assert_eq!(config.theme, Scheme::Light);
        assert_eq!(config.font_size, 14.0);
        assert_eq!(config.default_cell_width, 65);
        assert_eq!(config.autofit_max_width, 160);
    }

    #[test]
    fn test_metrics_are_sanitized() {
        let config = SheetConfig {
            default_cell_width: 0,
            font_size: -1.0,
            ..Default::default()
        };
        let metrics = config.metrics();
        assert_eq!(metrics.default_cell_width, 1);
        assert_eq!(metrics.font_size, 12.0);
    }
}
