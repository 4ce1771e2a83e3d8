//! Command-line argument parsing for the headless sheet
//!
//! Supports:
//! - Loading CSV/TSV/PSV files as tables, stacked vertically
//! - Replaying a YAML scenario
//! - Printing the active cell as JSON
//! - Writing the rendered viewport as PNG
//! - Saving the effective configuration

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SheetConfig;
use crate::theme::Scheme;

pub const DEFAULT_WIDTH: i64 = 1024;
pub const DEFAULT_HEIGHT: i64 = 768;

/// Render spreadsheet grids headlessly
#[derive(Parser, Debug)]
#[command(name = "gridsheet", version, about = "Render spreadsheet grids headlessly")]
pub struct CliArgs {
    /// Delimited files to load as tables
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// YAML scenario to replay after loading
    #[arg(short = 's', long, value_name = "FILE")]
    pub scenario: Option<PathBuf>,

    /// Config file (defaults to the user config)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<i64>,

    /// Viewport height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<i64>,

    /// Color scheme: dark or light
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// TTF/OTF font for cell text
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Write the rendered viewport to this PNG
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the active cell as JSON
    #[arg(long)]
    pub json: bool,

    /// Seconds to wait for file tables to load
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Write the effective config (with --theme/--font applied) back to
    /// the config file
    #[arg(long)]
    pub save_config: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub files: Vec<PathBuf>,
    pub scenario: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    /// Explicit viewport size; `None` keeps the scenario's or the default
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub scheme: Option<Scheme>,
    pub font: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub print_json: bool,
    pub load_timeout: Duration,
    pub save_config: bool,
}

fn parse_scheme(name: &str) -> Result<Scheme, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "dark" => Ok(Scheme::Dark),
        "light" => Ok(Scheme::Light),
        other => Err(format!("Unknown theme '{}' (expected dark or light)", other)),
    }
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if let Some(dir) = self.files.iter().find(|p| p.is_dir()) {
            return Err(format!("Cannot load a directory as a table: {}", dir.display()));
        }
        for (flag, value) in [("--width", self.width), ("--height", self.height)] {
            if value.is_some_and(|v| v <= 0) {
                return Err(format!("{} must be positive", flag));
            }
        }
        let scheme = self.theme.as_deref().map(parse_scheme).transpose()?;

        Ok(RunConfig {
            files: self.files,
            scenario: self.scenario,
            config_path: self.config,
            width: self.width,
            height: self.height,
            scheme,
            font: self.font,
            output: self.output,
            print_json: self.json,
            load_timeout: Duration::from_secs(self.timeout),
            save_config: self.save_config,
        })
    }
}

impl RunConfig {
    /// Fold command-line overrides into a loaded config
    pub fn apply_to(&self, config: &mut SheetConfig) {
        if let Some(scheme) = self.scheme {
            config.theme = scheme;
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
    }

    /// Persist `config` to `--config` if given, else to the user config
    /// file. Returns where it was written.
    pub fn save(&self, config: &SheetConfig) -> Result<PathBuf, String> {
        match &self.config_path {
            Some(path) => config.save_to(path).map(|_| path.clone()),
            None => {
                config.save()?;
                crate::config_paths::config_file()
                    .ok_or_else(|| "No config directory available".to_string())
            }
        }
    }

    /// Viewport used before any scenario override
    pub fn viewport_size(&self) -> (i64, i64) {
        (
            self.width.unwrap_or(DEFAULT_WIDTH),
            self.height.unwrap_or(DEFAULT_HEIGHT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            files: vec![],
            scenario: None,
            config: None,
            width: None,
            height: None,
            theme: None,
            font: None,
            output: None,
            json: false,
            timeout: 10,
            save_config: false,
        }
    }

    #[test]
    fn test_defaults() {
        let config = args().into_config().unwrap();
        assert!(config.files.is_empty());
        assert_eq!(config.viewport_size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(config.load_timeout, Duration::from_secs(10));
        assert!(!config.print_json);
    }

    #[test]
    fn test_theme_parsing() {
        let config = CliArgs {
            theme: Some("Light".to_string()),
            ..args()
        }
        .into_config()
        .unwrap();
        assert_eq!(config.scheme, Some(Scheme::Light));

        let err = CliArgs {
            theme: Some("solarized".to_string()),
            ..args()
        }
        .into_config()
        .unwrap_err();
        assert!(err.contains("solarized"));
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let err = CliArgs {
            width: Some(0),
            ..args()
        }
        .into_config()
        .unwrap_err();
        assert!(err.contains("--width"));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = std::env::temp_dir();
        let err = CliArgs {
            files: vec![dir],
            ..args()
        }
        .into_config()
        .unwrap_err();
        assert!(err.contains("directory"));
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let config = CliArgs {
            theme: Some("light".to_string()),
            font: Some(PathBuf::from("mono.ttf")),
            ..args()
        }
        .into_config()
        .unwrap();
        let mut sheet_config = SheetConfig::default();
        config.apply_to(&mut sheet_config);
        assert_eq!(sheet_config.theme, Scheme::Light);
        assert_eq!(sheet_config.font_path, Some(PathBuf::from("mono.ttf")));
    }

    #[test]
    fn test_save_writes_to_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.yaml");
        let run = CliArgs {
            config: Some(path.clone()),
            theme: Some("light".to_string()),
            save_config: true,
            ..args()
        }
        .into_config()
        .unwrap();
        assert!(run.save_config);

        let mut config = SheetConfig::default();
        run.apply_to(&mut config);
        assert_eq!(run.save(&config).unwrap(), path);
        assert_eq!(SheetConfig::load_from(&path).theme, Scheme::Light);
    }

    #[test]
    fn test_parse_from_argv() {
        let args = CliArgs::parse_from(["gridsheet", "a.csv", "--json", "-o", "out.png", "--width", "320"]);
        assert_eq!(args.files, vec![PathBuf::from("a.csv")]);
        assert!(args.json);
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
        assert_eq!(args.width, Some(320));
    }
}
