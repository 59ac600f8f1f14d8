use std::fs;

use paywatch_engine::{ensure_parent_dir, write_atomically};
use tempfile::TempDir;

#[test]
fn creates_missing_report_dir() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("reports").join("run.html");
    assert!(!report.parent().unwrap().exists());
    ensure_parent_dir(&report).unwrap();
    assert!(report.parent().unwrap().is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.html");

    write_atomically(&report, "first").unwrap();
    assert_eq!(fs::read_to_string(&report).unwrap(), "first");

    write_atomically(&report, "second").unwrap();
    assert_eq!(fs::read_to_string(&report).unwrap(), "second");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn parent_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_atomically(&blocker.join("report.html"), "data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
