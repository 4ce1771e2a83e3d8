//! gridsheet - headless spreadsheet grid renderer
//!
//! Usage:
//!   gridsheet data.csv --json
//!   gridsheet data.csv --scenario demo.yaml -o frame.png
//!   gridsheet --theme light --save-config

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use gridsheet::cli::CliArgs;
use gridsheet::config::SheetConfig;
use gridsheet::document::import;
use gridsheet::render::Surface;
use gridsheet::scenario::Scenario;
use gridsheet::sheet::Sheet;

/// Empty rows left between stacked tables
const TABLE_GAP: usize = 1;

fn main() -> Result<()> {
    gridsheet::tracing::init();

    let run = CliArgs::parse().into_config().map_err(anyhow::Error::msg)?;

    let mut config = match &run.config_path {
        Some(path) => SheetConfig::load_from(path),
        None => SheetConfig::load(),
    };
    run.apply_to(&mut config);
    if run.save_config {
        let path = run.save(&config).map_err(anyhow::Error::msg)?;
        eprintln!("saved config to {}", path.display());
    }

    let mut sheet = Sheet::new(&config);
    let (width, height) = run.viewport_size();
    sheet.set_viewport(width, height);

    let mut row = 1;
    for path in &run.files {
        let content =
            import::read_file(path).with_context(|| format!("loading {}", path.display()))?;
        let rows = content.height();
        sheet.add_table(content, true, 1, row, "");
        tracing::info!("loaded {} ({} rows) at row {}", path.display(), rows, row);
        row += rows + 1 + TABLE_GAP;
    }
    sheet.select_name("A1")?;

    if let Some(path) = &run.scenario {
        let scenario =
            Scenario::load(path).with_context(|| format!("reading scenario {}", path.display()))?;
        scenario
            .apply(&mut sheet, run.load_timeout)
            .with_context(|| format!("replaying scenario {}", path.display()))?;
        // Explicit flags win over the scenario's size
        if run.width.is_some() || run.height.is_some() {
            let viewport = sheet.viewport();
            sheet.set_viewport(
                run.width.unwrap_or(viewport.width),
                run.height.unwrap_or(viewport.height),
            );
        }
    }
    sheet.poll();

    if run.print_json {
        let read = sheet.active_cell();
        let report = serde_json::json!({
            "cell": sheet.selection.current_cell_name,
            "range": sheet.selection.range_name(&sheet.display),
            "value": read.value.to_string(),
            "dtype": read.dtype_name(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(output) = &run.output {
        let surface = sheet.render();
        save_png(surface, output)?;
        eprintln!("saved {}", output.display());
    }

    Ok(())
}

fn save_png(surface: &Surface, path: &Path) -> Result<()> {
    let img = image::RgbaImage::from_raw(
        surface.width() as u32,
        surface.height() as u32,
        surface.to_rgba8(),
    )
    .context("failed to create image buffer")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    img.save(path)
        .with_context(|| format!("saving PNG to {}", path.display()))?;
    Ok(())
}
