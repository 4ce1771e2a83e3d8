//! Benchmarks for frame rendering: cold frames against cached scrolls
//!
//! Run with: cargo bench rendering

use gridsheet::config::SheetConfig;
use gridsheet::document::{CellValue, Column, DataType, TableContent};
use gridsheet::render::frame::{composite_over, Surface};
use gridsheet::render::Typeface;
use gridsheet::sheet::Sheet;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn make_sheet(width: i64) -> Sheet {
    let config = SheetConfig::default();
    let mut sheet = Sheet::with_typeface(&config, Typeface::Fallback, config.font_size);
    sheet.set_viewport(width, width * 9 / 16);

    let columns = (1..=30)
        .map(|c| {
            let values = (0..5_000)
                .map(|r| match c % 3 {
                    0 => CellValue::Text(format!("item {}", r)),
                    1 => CellValue::Int(r * c),
                    _ => CellValue::Float(r as f64 / c as f64),
                })
                .collect();
            let dtype = match c % 3 {
                0 => DataType::Text,
                1 => DataType::Int64,
                _ => DataType::Float64,
            };
            Column::new(format!("col{}", c), dtype, values)
        })
        .collect();
    sheet.add_table(TableContent::new(columns), true, 1, 1, "");
    sheet.select_name("C3:F12").ok();
    sheet
}

// ============================================================================
// Whole frames
// ============================================================================

#[divan::bench(args = [800, 1280, 1920])]
fn cold_frame(bencher: divan::Bencher, width: i64) {
    bencher
        .with_inputs(|| make_sheet(width))
        .bench_local_refs(|sheet| {
            divan::black_box(sheet.render());
        });
}

#[divan::bench(args = [800, 1280, 1920])]
fn scroll_one_row(bencher: divan::Bencher, width: i64) {
    bencher
        .with_inputs(|| {
            let mut sheet = make_sheet(width);
            sheet.render();
            sheet
        })
        .bench_local_refs(|sheet| {
            sheet.scroll_by(0, 1);
            divan::black_box(sheet.render());
        });
}

#[divan::bench(args = [800, 1280, 1920])]
fn unchanged_frame(bencher: divan::Bencher, width: i64) {
    let mut sheet = make_sheet(width);
    sheet.render();
    bencher.bench_local(|| {
        divan::black_box(sheet.render());
    });
}

// ============================================================================
// Pixel primitives
// ============================================================================

#[divan::bench(args = [800, 1920])]
fn clear_surface(width: usize) {
    let height = width * 9 / 16;
    let mut surface = Surface::new(width, height, 0);
    surface.frame().clear(0xFF212126);
    divan::black_box(&surface);
}

#[divan::bench]
fn composite_glyph_coverage() {
    let mut dst = 0xFF212126_u32;
    for coverage in 0..=255u32 {
        dst = composite_over(dst, 0xFFFFFFFF, coverage as f32 / 255.0);
    }
    divan::black_box(dst);
}
