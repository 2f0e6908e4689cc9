#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn sl() -> Command {
    cargo_bin_cmd!("scalelog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_scalelog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB without touching the user's config file
pub fn init_db(db_path: &str) {
    sl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Initialize DB and log a small dataset useful for many tests
pub fn init_db_with_data(db_path: &str) {
    init_db(db_path);

    for (weight, category, source) in [
        ("12.5", "Produce", "Safeway"),
        ("4", "Dry", "Safeway"),
        ("7.25", "Produce", "Wegmans"),
    ] {
        sl().args([
            "--db", db_path, "log", "--weight", weight, "--type", category, "--source", source,
        ])
        .assert()
        .success();
    }
}
