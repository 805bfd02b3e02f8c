mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn vtdb_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("vtdb");
    path
}

fn setup_test_env(embedded: bool) -> (TempDir, PathBuf) {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(common::fixture(embedded))
}

fn run_vtdb(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = vtdb_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run vtdb binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_names_lists_catalog() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, stderr, success) = run_vtdb(&config_path, &["names"]);
    assert!(success, "names failed: stdout={}, stderr={}", stdout, stderr);
    assert_eq!(stdout.lines().count(), 6);
    assert!(stdout.contains("Minato Aqua"));
}

#[test]
fn test_search_tolerates_typos() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, stderr, success) = run_vtdb(&config_path, &["search", "Suisay"]);
    assert!(success, "search failed: stderr={}", stderr);
    assert!(
        stdout.lines().next().unwrap_or_default().contains("Hoshimachi Suisei"),
        "Expected Suisei first, got: {}",
        stdout
    );
}

#[test]
fn test_search_json_carries_positions() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, _, success) = run_vtdb(&config_path, &["search", "Minato Aqua", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let first = &parsed.as_array().unwrap()[0];
    assert_eq!(first["name"], "Minato Aqua");
    assert_eq!(first["position"], 0);
    assert_eq!(first["image"]["kind"], "link");
}

#[test]
fn test_search_empty_query() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, _, success) = run_vtdb(&config_path, &["search", ""]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_show_paginates_details() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, stderr, success) = run_vtdb(
        &config_path,
        &["show", "Minato Aqua", "--ascending", "--per-page", "3"],
    );
    assert!(success, "show failed: stderr={}", stderr);
    let affiliation = stdout.find("Affiliation: Hololive").unwrap();
    let height = stdout.find("Height: 148 cm").unwrap();
    assert!(affiliation < height);
    assert!(stdout.contains("1-3 of 3"));
    assert!(stdout.contains("official_channel: https://youtube.com/@MinatoAqua"));
}

#[test]
fn test_show_rejects_unknown_page_size() {
    let (_tmp, config_path) = setup_test_env(false);

    let (_, stderr, success) = run_vtdb(&config_path, &["show", "Minato Aqua", "--per-page", "7"]);
    assert!(!success);
    assert!(stderr.contains("per-page"));
}

#[test]
fn test_show_json_in_embedded_mode() {
    let (_tmp, config_path) = setup_test_env(true);

    let (stdout, _, success) = run_vtdb(&config_path, &["show", "Hoshimachi Suisei", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
    assert_eq!(parsed["name"], "Hoshimachi Suisei");
}

#[test]
fn test_bookmarks_round_trip() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, _, success) = run_vtdb(&config_path, &["bookmark", "add", "Minato Aqua"]);
    assert!(success);
    assert!(stdout.contains("Bookmarked"));

    run_vtdb(&config_path, &["bookmark", "add", "Hoshimachi Suisei"]);
    let (stdout, _, _) = run_vtdb(&config_path, &["bookmark", "add", "Minato Aqua"]);
    assert!(stdout.contains("already bookmarked"));

    let (stdout, _, success) = run_vtdb(&config_path, &["bookmark", "list"]);
    assert!(success);
    let aqua = stdout.find("Minato Aqua").unwrap();
    let suisei = stdout.find("Hoshimachi Suisei").unwrap();
    assert!(aqua < suisei, "bookmark order lost: {}", stdout);

    run_vtdb(&config_path, &["bookmark", "remove", "Minato Aqua"]);
    let (stdout, _, _) = run_vtdb(&config_path, &["bookmark", "list"]);
    assert!(!stdout.contains("Minato Aqua"));
    assert!(stdout.contains("Hoshimachi Suisei"));
}

#[test]
fn test_discover_shows_sections() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, stderr, success) = run_vtdb(&config_path, &["discover", "--json"]);
    assert!(success, "discover failed: stderr={}", stderr);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sections = parsed.as_array().unwrap();

    // Gawr Gura has no image link; hololive is the only agency and an odd
    // single card is dropped.
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["title"], "VTubers");
    assert_eq!(sections[0]["cards"].as_array().unwrap().len(), 2);
}

#[test]
fn test_spotlight_unreachable_is_not_fatal() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, stderr, success) = run_vtdb(&config_path, &["spotlight"]);
    assert!(success, "spotlight failed: stderr={}", stderr);
    assert!(stdout.contains("No spotlight available."));

    let (stdout, _, success) = run_vtdb(&config_path, &["spotlight", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.is_null());
}

#[test]
fn test_show_far_past_the_end() {
    let (_tmp, config_path) = setup_test_env(false);

    let (stdout, stderr, success) = run_vtdb(
        &config_path,
        &["show", "Minato Aqua", "--page", &usize::MAX.to_string()],
    );
    assert!(success, "show failed: stderr={}", stderr);
    assert!(stdout.contains("is past the end"));
}

#[test]
fn test_missing_catalog_is_not_fatal() {
    let (tmp, config_path) = setup_test_env(false);
    fs::remove_file(tmp.path().join("wiki-data.db")).unwrap();

    let (stdout, _, success) = run_vtdb(&config_path, &["search", "Aqua"]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_vtdb(&tmp.path().join("nope.toml"), &["names"]);
    assert!(!success);
    assert!(stderr.contains("config"));
}
