//! Debug tracing infrastructure
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=selection=debug,render=trace` - scoped filtering
//! - `RUST_LOG=gridsheet::document=debug` - module-level filtering
//!
//! Logs are also written to `~/.config/gridsheet/logs/gridsheet.log` with
//! daily rotation, at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::selection::{Selection, SheetCell};

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding hosts) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight copy of the selection cells for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub range: SheetCell,
    pub active: SheetCell,
    pub cursor: SheetCell,
    pub name: String,
}

impl SelectionSnapshot {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            range: selection.current_active_range,
            active: selection.current_active_cell,
            cursor: selection.current_cursor_cell,
            name: selection.current_cell_name.clone(),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if (self.active.column, self.active.row) != (other.active.column, other.active.row) {
            changes.push(format!(
                "active: {} ({},{}) → {} ({},{})",
                self.name,
                self.active.column,
                self.active.row,
                other.name,
                other.active.column,
                other.active.row
            ));
        }
        if (self.cursor.column, self.cursor.row) != (other.cursor.column, other.cursor.row) {
            changes.push(format!(
                "cursor: ({},{}) → ({},{})",
                self.cursor.column, self.cursor.row, other.cursor.column, other.cursor.row
            ));
        }
        let span = |c: &SheetCell| (c.column, c.row, c.column_span, c.row_span, c.ctype);
        if span(&self.range) != span(&other.range) {
            changes.push(format!(
                "range: {:?} {}x{} → {:?} {}x{}",
                self.range.ctype,
                self.range.column_span,
                self.range.row_span,
                other.range.ctype,
                other.range.column_span,
                other.range.row_span
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
