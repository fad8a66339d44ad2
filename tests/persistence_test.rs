#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: import the fixture and register a high spender
    let output1 = Command::new(cargo_bin!("spending-engine"))
        .arg("--records")
        .arg(common::FIXTURE)
        .arg("--db-path")
        .arg(&db_path)
        .args(["register", "--user-id", "5", "--total-spending", "250.00"])
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());

    // 2. Second run on the same DB without re-importing
    let output2 = Command::new(cargo_bin!("spending-engine"))
        .arg("--db-path")
        .arg(&db_path)
        .arg("high-spenders")
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains(r#""user_id": 5"#));
    assert!(stdout2.contains(r#""bonus_points": 2"#));

    // 3. Imported users survived too, and registering one of them conflicts
    let output3 = Command::new(cargo_bin!("spending-engine"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["register", "--user-id", "90", "--total-spending", "1.00"])
        .output()
        .expect("Failed to execute command");
    assert!(!output3.status.success());
    assert!(String::from_utf8_lossy(&output3.stdout).contains(r#""kind": "Conflict""#));
}
