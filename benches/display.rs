//! Benchmarks for display geometry lookups
//!
//! Run with: cargo bench display

use gridsheet::display::{names, Display};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// Display with `tracked` custom-sized rows, every 7th one hidden
fn display_with_rows(tracked: usize) -> Display {
    let mut display = Display::default();
    display
        .rows
        .set_sizes((0..tracked).map(|i| 18 + (i % 5) as i64).collect());
    display
        .rows
        .set_visibility((0..tracked).map(|i| i % 7 != 0).collect());
    display
}

// ============================================================================
// Pixel → index
// ============================================================================

#[divan::bench(args = [0, 1_000, 100_000, 1_000_000])]
fn row_from_point(bencher: divan::Bencher, tracked: usize) {
    let mut display = display_with_rows(tracked);
    display.set_scroll(0, 20 * tracked as i64 / 2);
    bencher.bench_local(|| {
        for y in (0..1080).step_by(20) {
            divan::black_box(display.row_from_point(divan::black_box(y)));
        }
    });
}

// ============================================================================
// Visual ⇄ logical
// ============================================================================

#[divan::bench(args = [1_000, 100_000, 1_000_000])]
fn logical_round_trip(bencher: divan::Bencher, tracked: usize) {
    let display = display_with_rows(tracked);
    bencher.bench_local(|| {
        for row in (1..tracked).step_by((tracked / 64).max(1)) {
            let lrow = display.lrow_from_row(row);
            divan::black_box(display.row_from_lrow(lrow));
        }
    });
}

#[divan::bench(args = [1_000, 100_000])]
fn rebuild_after_hide(bencher: divan::Bencher, tracked: usize) {
    bencher
        .with_inputs(|| display_with_rows(tracked))
        .bench_local_values(|mut display| {
            display.rows.hide(tracked / 2);
            display
        });
}

// ============================================================================
// Names
// ============================================================================

#[divan::bench]
fn parse_range_names() {
    for name in ["A1", "B2:D40", "AA100:ZZ9999", "H:H", "5:10"] {
        divan::black_box(names::parse_cell_range(divan::black_box(name)).ok());
    }
}
