//! Scenario replay tests

mod common;

use std::time::Duration;

use common::{active, test_sheet};
use gridsheet::document::CellValue;
use gridsheet::scenario::Scenario;
use gridsheet::theme::Scheme;

#[test]
fn test_replay_from_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scores.csv"), "player,score\nann,10\nbob,7\n").unwrap();
    let scenario_path = dir.path().join("session.yaml");
    std::fs::write(
        &scenario_path,
        r#"
name: scores
width: 640
height: 400
theme: light
tables:
  - path: scores.csv
    column: 2
    row: 2
steps:
  - select: C3
  - key: down
  - edit: "12"
  - key: shift+up
"#,
    )
    .unwrap();

    let scenario = Scenario::load(&scenario_path).unwrap();
    assert!(scenario.tables[0].path.as_ref().unwrap().is_absolute());

    let mut sheet = test_sheet();
    scenario.apply(&mut sheet, Duration::from_secs(10)).unwrap();

    assert_eq!((sheet.viewport().width, sheet.viewport().height), (640, 400));
    assert_eq!(sheet.renderer().theme().scheme, Scheme::Light);
    assert_eq!(sheet.document.read(3, 4).value, CellValue::Int(12));
    assert_eq!(active(&sheet), (3, 4));
    assert_eq!(sheet.selection.range_name(&sheet.display), "C3:C4");
}

#[test]
fn test_inline_tables_and_pointer_steps() {
    let scenario = Scenario::from_yaml(
        r#"
tables:
  - text: "a\tb\tc\n1\t2\t3"
steps:
  - click: { x: 60, y: 30 }
  - drag: { x: 200, y: 50 }
  - scroll: { y: 1 }
  - resize: { width: 300, height: 200 }
"#,
    )
    .unwrap();

    let mut sheet = test_sheet();
    scenario.apply(&mut sheet, Duration::from_secs(1)).unwrap();

    assert_eq!(sheet.document.tables().len(), 1);
    assert_eq!(sheet.selection.range_name(&sheet.display), "A1:C2");
    assert_eq!(sheet.display.scroll_y, 3 * 20);
    assert_eq!(sheet.viewport().width, 300);
}

#[test]
fn test_bad_step_reports_index() {
    let scenario = Scenario::from_yaml("steps:\n  - select: A1\n  - key: hyper+q\n").unwrap();
    let mut sheet = test_sheet();
    let err = scenario.apply(&mut sheet, Duration::from_secs(1)).unwrap_err();
    assert_eq!(err.step, Some(1));
    // Steps before the failure still ran
    assert_eq!(sheet.selection.current_cell_name, "A1");
}

#[test]
fn test_table_without_source_is_rejected() {
    let scenario = Scenario::from_yaml("tables:\n  - column: 3\n").unwrap();
    let mut sheet = test_sheet();
    assert!(scenario.apply(&mut sheet, Duration::from_secs(1)).is_err());
}
