//! Scripted sheet sessions
//!
//! A scenario is a YAML file that places tables and replays input against a
//! [`Sheet`], for headless rendering and reproducible bug reports:
//!
//! ```yaml
//! width: 800
//! height: 600
//! theme: light
//! tables:
//!   - path: data/sales.csv
//!     column: 2
//!     row: 2
//! steps:
//!   - select: B3
//!   - key: shift+down
//!   - scroll: { y: 2 }
//!   - edit: "42"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::document::TableSource;
use crate::selection::Keystroke;
use crate::sheet::Sheet;
use crate::theme::Scheme;

/// Error type for scenario parsing and replay
#[derive(Debug, Clone)]
pub struct ScenarioError {
    pub message: String,
    /// Zero-based index of the failing step
    pub step: Option<usize>,
}

impl ScenarioError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            step: None,
        }
    }

    fn at(step: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            step: Some(step),
        }
    }
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.step {
            Some(step) => write!(f, "scenario error at step {}: {}", step + 1, self.message),
            None => write!(f, "scenario error: {}", self.message),
        }
    }
}

impl std::error::Error for ScenarioError {}

// ---------------------------------------------------------------------------
// YAML schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub theme: Option<Scheme>,
    pub tables: Vec<ScenarioTable>,
    /// Steps are written as one-key maps (`- key: down`)
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

/// A table placed before the steps run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioTable {
    /// Delimited file; relative paths resolve against the scenario file
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Inline tab-separated content with a header line
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_position")]
    pub column: usize,
    #[serde(default = "default_position")]
    pub row: usize,
    #[serde(default = "default_header")]
    pub header: bool,
    #[serde(default)]
    pub name: String,
}

fn default_position() -> usize {
    1
}

fn default_header() -> bool {
    true
}

/// One scripted input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Name-box input such as `B2` or `A1:C10`
    Select(String),
    Click {
        x: i64,
        y: i64,
        #[serde(default)]
        extend: bool,
    },
    Drag {
        x: i64,
        y: i64,
    },
    /// Keystroke such as `shift+ctrl+down`
    Key(String),
    /// Wheel notches
    Scroll {
        #[serde(default)]
        x: i64,
        #[serde(default)]
        y: i64,
    },
    /// Text written into the active cell
    Edit(String),
    Resize {
        width: i64,
        height: i64,
    },
    Theme(Scheme),
    /// Milliseconds to wait for background loads
    Wait(u64),
}

// ---------------------------------------------------------------------------
// Loading and replay
// ---------------------------------------------------------------------------

impl Scenario {
    pub fn from_yaml(content: &str) -> Result<Self, ScenarioError> {
        serde_yaml::from_str(content).map_err(|e| ScenarioError::new(e.to_string()))
    }

    /// Read a scenario file. Relative table paths are rebased on its
    /// directory.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScenarioError::new(format!("{}: {}", path.display(), e)))?;
        let mut scenario = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            for table in &mut scenario.tables {
                if let Some(table_path) = table.path.as_mut() {
                    if table_path.is_relative() {
                        *table_path = base.join(&*table_path);
                    }
                }
            }
        }
        Ok(scenario)
    }

    /// Place the tables, apply size and theme, then replay every step.
    ///
    /// File tables load in the background; replay waits up to `load_timeout`
    /// for them before the first step.
    pub fn apply(&self, sheet: &mut Sheet, load_timeout: Duration) -> Result<(), ScenarioError> {
        if self.width.is_some() || self.height.is_some() {
            let current = sheet.viewport();
            sheet.set_viewport(
                self.width.unwrap_or(current.width),
                self.height.unwrap_or(current.height),
            );
        }
        if let Some(scheme) = self.theme {
            sheet.set_scheme(scheme);
        }

        let mut deferred = 0;
        for table in &self.tables {
            match (&table.path, &table.text) {
                (Some(path), _) => {
                    sheet.add_table(
                        TableSource::file(path.clone()),
                        table.header,
                        table.column,
                        table.row,
                        &table.name,
                    );
                    deferred += 1;
                }
                (None, Some(text)) => {
                    sheet.add_table(text.as_str(), table.header, table.column, table.row, &table.name);
                }
                (None, None) => {
                    return Err(ScenarioError::new("table needs a path or text"));
                }
            }
        }
        if deferred > 0 {
            let loaded = sheet.wait_loaded(load_timeout);
            tracing::debug!("{} of {} scenario table(s) loaded", loaded.len(), deferred);
        }

        for (index, step) in self.steps.iter().enumerate() {
            tracing::trace!("scenario step {}: {:?}", index + 1, step);
            Self::run_step(sheet, index, step)?;
        }
        Ok(())
    }

    fn run_step(sheet: &mut Sheet, index: usize, step: &Step) -> Result<(), ScenarioError> {
        match step {
            Step::Select(name) => sheet
                .select_name(name)
                .map_err(|e| ScenarioError::at(index, e.to_string()))?,
            Step::Click { x, y, extend } => sheet.click(*x, *y, *extend),
            Step::Drag { x, y } => {
                sheet.drag(*x, *y);
            }
            Step::Key(text) => {
                let stroke: Keystroke = text.parse().map_err(|e: String| ScenarioError::at(index, e))?;
                sheet.key(stroke);
            }
            Step::Scroll { x, y } => sheet.scroll_by(*x, *y),
            Step::Edit(text) => {
                sheet.edit_active(text);
            }
            Step::Resize { width, height } => sheet.set_viewport(*width, *height),
            Step::Theme(scheme) => sheet.set_scheme(*scheme),
            Step::Wait(ms) => {
                sheet.wait_loaded(Duration::from_millis(*ms));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_yaml(
            r#"
width: 320
tables:
  - text: "a\tb\n1\t2"
steps:
  - select: B2
  - click: { x: 100, y: 50 }
  - key: shift+down
  - scroll: { y: 2 }
  - theme: light
  - wait: 10
"#,
        )
        .unwrap();

        assert_eq!(scenario.width, Some(320));
        assert_eq!(scenario.height, None);
        assert_eq!(scenario.tables[0].column, 1);
        assert!(scenario.tables[0].header);
        assert_eq!(
            scenario.steps,
            vec![
                Step::Select("B2".to_string()),
                Step::Click {
                    x: 100,
                    y: 50,
                    extend: false
                },
                Step::Key("shift+down".to_string()),
                Step::Scroll { x: 0, y: 2 },
                Step::Theme(Scheme::Light),
                Step::Wait(10),
            ]
        );
    }

    #[test]
    fn test_parse_documented_example() {
        let scenario = Scenario::from_yaml(
            r#"
width: 800
height: 600
theme: light
tables:
  - path: data/sales.csv
    column: 2
    row: 2
steps:
  - select: B3
  - key: shift+down
  - scroll: { y: 2 }
  - edit: "42"
  - click: { x: 10, y: 10, extend: true }
  - resize: { width: 400, height: 300 }
"#,
        )
        .unwrap();

        assert_eq!(scenario.theme, Some(Scheme::Light));
        assert_eq!(scenario.steps.len(), 6);
        assert_eq!(scenario.steps[3], Step::Edit("42".to_string()));
        assert_eq!(
            scenario.steps[4],
            Step::Click {
                x: 10,
                y: 10,
                extend: true
            }
        );
        assert_eq!(
            scenario.steps[5],
            Step::Resize {
                width: 400,
                height: 300
            }
        );
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        assert!(Scenario::from_yaml("steps:\n  - jump: 3\n").is_err());
    }

    #[test]
    fn test_error_reports_step_number() {
        let err = ScenarioError::at(2, "unknown key");
        assert_eq!(err.to_string(), "scenario error at step 3: unknown key");
    }
}
