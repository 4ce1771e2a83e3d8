//! gridsheet - spreadsheet grid core
//!
//! This crate provides the geometry, data model, selection state machine and
//! software renderer behind a spreadsheet canvas. Hosts own a [`Sheet`],
//! report viewport size and scroll, forward input, and blit the frames it
//! renders.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod display;
pub mod document;
pub mod render;
pub mod scenario;
pub mod selection;
pub mod sheet;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::SheetConfig;
pub use display::Display;
pub use document::Document;
pub use selection::Selection;
pub use sheet::Sheet;
pub use theme::Theme;
