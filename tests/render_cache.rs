//! Scroll-diff cache tests
//!
//! Every frame produced through the cache must equal, pixel for pixel, a
//! frame rendered from scratch at the same scroll position and size.

mod common;

use common::{numbers_table, test_sheet};
use gridsheet::render::CacheKind;
use gridsheet::sheet::Sheet;
use gridsheet::theme::Scheme;

/// Sheet with a wide table plus loose cells of mixed types
fn populated_sheet() -> Sheet {
    let mut sheet = test_sheet();
    sheet.add_table(numbers_table(8, 60), true, 2, 2, "");
    sheet.select_name("B3").unwrap();
    sheet.edit_active("1234567");
    sheet.select_name("L5").unwrap();
    sheet.edit_active("a long piece of loose text that spills past its cell");
    sheet.select_name("M9").unwrap();
    sheet.edit_active("2024-01-31");
    sheet.select_name("C4:E8").unwrap();
    sheet
}

/// Render `sheet` and a fresh copy at the same state; assert equality.
fn assert_matches_cold_render(sheet: &mut Sheet) {
    let (x, y) = (sheet.display.scroll_x, sheet.display.scroll_y);
    let viewport = sheet.viewport();
    let warm = sheet.render().clone();

    let mut cold = populated_sheet();
    cold.set_viewport(viewport.width, viewport.height);
    cold.set_scroll(x, y);
    // Same selection as the warm sheet after its scroll
    cold.selection = sheet.selection.clone();
    cold.render();
    assert_eq!(cold.renderer().last_cache_kind(), CacheKind::Full);
    let cold_frame = cold.renderer().canvas();

    assert_eq!((warm.width(), warm.height()), (cold_frame.width(), cold_frame.height()));
    let mismatches = warm
        .pixels()
        .iter()
        .zip(cold_frame.pixels())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(mismatches, 0, "{} pixels differ at scroll ({}, {})", mismatches, x, y);
}

#[test]
fn test_unchanged_frame_reuses_layer() {
    let mut sheet = populated_sheet();
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Full);
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Reuse);
}

#[test]
fn test_one_row_scroll_matches_cold_render() {
    let mut sheet = populated_sheet();
    sheet.render();
    sheet.set_scroll(0, 20);
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Blit);
    assert_matches_cold_render(&mut sheet);
}

#[test]
fn test_diagonal_partial_scroll_matches_cold_render() {
    let mut sheet = populated_sheet();
    sheet.render();
    for (x, y) in [(30, 7), (95, 33), (40, 12), (0, 0)] {
        sheet.set_scroll(x, y);
        sheet.render();
        assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Blit);
        assert_matches_cold_render(&mut sheet);
    }
}

#[test]
fn test_large_jump_redraws_everything() {
    let mut sheet = populated_sheet();
    sheet.render();
    sheet.set_scroll(0, 5_000);
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Full);
    assert_matches_cold_render(&mut sheet);
}

#[test]
fn test_resize_matches_cold_render() {
    let mut sheet = populated_sheet();
    sheet.render();

    sheet.set_viewport(900, 650);
    sheet.render();
    assert_matches_cold_render(&mut sheet);

    sheet.set_viewport(500, 300);
    sheet.render();
    assert_matches_cold_render(&mut sheet);
}

#[test]
fn test_edit_and_theme_invalidate_layer() {
    let mut sheet = populated_sheet();
    sheet.render();

    sheet.select_name("D6").unwrap();
    sheet.edit_active("7");
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Full);

    sheet.set_scheme(Scheme::Light);
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Full);
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Reuse);
}

#[test]
fn test_selection_changes_do_not_touch_layer() {
    let mut sheet = populated_sheet();
    sheet.render();
    sheet.select_name("F10").unwrap();
    sheet.render();
    assert_eq!(sheet.renderer().last_cache_kind(), CacheKind::Reuse);
    assert_matches_cold_render(&mut sheet);
}
