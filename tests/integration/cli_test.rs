//! Integration tests for the conv2md binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixtures_dir, temp_fixture};

const SIMPLE_MARKDOWN: &str = "**User:**\nHello\n\n**Assistant:**\nHi there\\!";

/// Run conv2md with an isolated config and capture output.
fn run_conv2md(args: &[&str]) -> (String, String, i32) {
    let config_dir = TempDir::new().expect("Failed to create temp dir");
    run_with_config(args, &config_dir.path().join("config.toml"))
}

fn run_with_config(args: &[&str], config: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_conv2md"))
        .args(args)
        .env("CONV2MD_CONFIG", config)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute conv2md");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).display().to_string()
}

// ============================================================================
// Convert to stdout
// ============================================================================

#[test]
fn convert_without_frontmatter_prints_markdown_only() {
    let (stdout, _stderr, exit_code) =
        run_conv2md(&["convert", "-i", &fixture("simple.json"), "--no-frontmatter"]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout, format!("{}\n", SIMPLE_MARKDOWN));
}

#[test]
fn convert_adds_source_and_title_frontmatter() {
    let (stdout, _stderr, exit_code) = run_conv2md(&["convert", "-i", &fixture("simple.json")]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with("---\n"));
    assert!(stdout.contains("\nsource: "));
    assert!(stdout.contains("\ntitle: simple\n"));
    assert!(stdout.ends_with(&format!("---\n\n{}\n", SIMPLE_MARKDOWN)));
}

#[test]
fn convert_prefers_title_from_file_then_flag() {
    let (stdout, _, _) = run_conv2md(&["convert", "-i", &fixture("mixed.json")]);
    assert!(stdout.contains("\ntitle: Debugging session\n"));

    let (stdout, _, _) = run_conv2md(&[
        "convert",
        "-i",
        &fixture("mixed.json"),
        "--title",
        "Renamed",
    ]);
    assert!(stdout.contains("\ntitle: Renamed\n"));
}

#[test]
fn convert_meta_pairs_land_in_frontmatter() {
    let (stdout, _stderr, exit_code) = run_conv2md(&[
        "convert",
        "-i",
        &fixture("simple.json"),
        "-m",
        "author=me",
        "--meta",
        "draft=true",
    ]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("\nauthor: me\n"));
    assert!(stdout.contains("\ndraft: true\n"));
}

#[test]
fn convert_meta_values_keep_their_spelling() {
    let (stdout, _stderr, exit_code) = run_conv2md(&[
        "convert",
        "-i",
        &fixture("simple.json"),
        "-m",
        "version=1.10",
        "-m",
        "id=007",
    ]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("\nversion: 1.10\n"));
    assert!(stdout.contains("\nid: 007\n"));
}

#[test]
fn config_can_disable_frontmatter() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[output]\nfrontmatter = false\n").unwrap();

    let (stdout, _stderr, exit_code) =
        run_with_config(&["convert", "-i", &fixture("simple.json")], &config);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout, format!("{}\n", SIMPLE_MARKDOWN));
}

#[test]
fn verbose_logs_go_to_stderr_only() {
    let (stdout, stderr, exit_code) = run_conv2md(&[
        "convert",
        "-i",
        &fixture("simple.json"),
        "--no-frontmatter",
        "-vv",
    ]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout, format!("{}\n", SIMPLE_MARKDOWN));
    assert!(stderr.contains("Starting JSON conversation parsing"));
    assert!(stderr.contains("Starting Markdown generation"));
}

#[test]
fn metrics_flag_prints_json_to_stderr() {
    let (stdout, stderr, exit_code) = run_conv2md(&[
        "convert",
        "-i",
        &fixture("simple.json"),
        "--no-frontmatter",
        "--metrics",
    ]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout, format!("{}\n", SIMPLE_MARKDOWN));
    assert!(stderr.contains("\"status\": \"success\""));
    assert!(stderr.contains("\"message_count\": 2"));
}

// ============================================================================
// Convert to files
// ============================================================================

#[test]
fn convert_into_directory_uses_input_stem() {
    let (_input_dir, input) = temp_fixture("simple.json");
    let out_dir = TempDir::new().unwrap();

    let (stdout, stderr, exit_code) = run_conv2md(&[
        "convert",
        "-i",
        input.to_str().unwrap(),
        "-o",
        out_dir.path().to_str().unwrap(),
        "--no-frontmatter",
    ]);

    assert_eq!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Converted 2 messages"));
    let written = fs::read_to_string(out_dir.path().join("simple.md")).unwrap();
    assert_eq!(written, SIMPLE_MARKDOWN);
}

#[test]
fn convert_to_explicit_md_file_creates_parents() {
    let out_dir = TempDir::new().unwrap();
    let target = out_dir.path().join("nested").join("chat.md");

    assert_cmd::Command::new(env!("CARGO_BIN_EXE_conv2md"))
        .args(["convert", "-i", &fixture("mixed.json"), "-o"])
        .arg(&target)
        .env("CONV2MD_CONFIG", out_dir.path().join("config.toml"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("chat.md"));

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("```rust\n"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_input_file_fails() {
    let (_stdout, stderr, exit_code) = run_conv2md(&["convert", "-i", "nonexistent.json"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("File not found"));
    assert!(stderr.contains("nonexistent.json"));
}

#[test]
fn malformed_json_fails_with_context() {
    let (stdout, stderr, exit_code) = run_conv2md(&["convert", "-i", &fixture("malformed.json")]);

    assert_eq!(exit_code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Failed to parse"));
    assert!(stderr.contains("Invalid JSON"));
}

#[test]
fn empty_message_list_fails() {
    let (_stdout, stderr, exit_code) =
        run_conv2md(&["convert", "-i", &fixture("empty_messages.json")]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("cannot be empty"));
}

#[test]
fn invalid_timestamp_fails_with_message_index() {
    let (stdout, stderr, exit_code) =
        run_conv2md(&["convert", "-i", &fixture("bad_timestamp.json")]);

    assert_eq!(exit_code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Message 1"));
}

#[test]
fn url_input_is_not_implemented() {
    let (_stdout, stderr, exit_code) =
        run_conv2md(&["convert", "-i", "https://example.com/chat"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("not implemented"));
}

#[test]
fn web_command_is_not_implemented() {
    assert_cmd::Command::new(env!("CARGO_BIN_EXE_conv2md"))
        .args(["web", "https://example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Website conversion is not implemented"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let (_stdout, _stderr, exit_code) = run_conv2md(&[]);
    assert_eq!(exit_code, 2);
}

#[test]
fn convert_without_input_is_usage_error() {
    let (_stdout, stderr, exit_code) = run_conv2md(&["convert"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("--input"));
}

// ============================================================================
// Other commands
// ============================================================================

#[test]
fn version_includes_package_version() {
    let (stdout, _stderr, exit_code) = run_conv2md(&["--version"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with(&format!("conv2md {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn config_path_honours_env_override() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");

    let (stdout, _stderr, exit_code) = run_with_config(&["config", "path"], &config);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim(), config.display().to_string());
}

#[test]
fn config_show_prints_defaults() {
    let (stdout, _stderr, exit_code) = run_conv2md(&["config", "show"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[output]"));
    assert!(stdout.contains("filename_template = \"{stem}\""));
    assert!(stdout.contains("[logging]"));
}

#[test]
fn completions_generate_script() {
    let (stdout, _stderr, exit_code) = run_conv2md(&["completions", "bash"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("conv2md"));
}

#[test]
fn errors_report_their_kind() {
    let (_stdout, stderr, _) = run_conv2md(&["convert", "-i", &fixture("malformed.json")]);
    assert!(stderr.contains("error (malformed_input):"));

    let (_stdout, stderr, _) = run_conv2md(&["convert", "-i", &fixture("bad_timestamp.json")]);
    assert!(stderr.contains("error (invalid_content):"));
}
