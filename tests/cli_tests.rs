//! Integration tests for the mnemo CLI
//!
//! These tests run the mnemo binary and verify archive layout, search
//! ranking, rules merging, and the documented exit codes.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use tempfile::tempdir;

/// Get a Command for mnemo
fn mnemo() -> Command {
    cargo_bin_cmd!("mnemo")
}

// ============================================================================
// Help and Version tests
// ============================================================================

#[test]
fn test_help_flag() {
    mnemo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: mnemo"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_version_flag() {
    mnemo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mnemo"));
}

#[test]
fn test_subcommand_help() {
    mnemo()
        .args(["add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add an entry to the archive"));
}

#[test]
fn test_no_command_shows_banner() {
    let dir = tempdir().unwrap();
    mnemo()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mnemo"))
        .stdout(predicate::str::contains("Run `mnemo --help`"));
}

// ============================================================================
// Exit code tests
// ============================================================================

#[test]
fn test_unknown_format_exit_code_2() {
    mnemo()
        .args(["--format", "invalid", "projects"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_command_exit_code_2() {
    mnemo().arg("nonexistent").assert().code(2);
}

#[test]
fn test_unknown_argument_json_usage_error() {
    mnemo()
        .args(["--format", "json", "projects", "--bogus-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_unknown_command_json_usage_error() {
    mnemo()
        .args(["--format", "json", "nonexistent"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_unknown_project_exit_code_3() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["sections", "--project", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("project not found: ghost"));
}

// ============================================================================
// Init command tests
// ============================================================================

#[test]
fn test_init_creates_archive() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized mnemo archive"));

    // Verify structure was created
    assert!(dir.path().join(".mnemo").exists());
    assert!(dir.path().join(".mnemo/archives").exists());
    assert!(dir.path().join(".mnemo/custom_rules").exists());
    assert!(dir.path().join(".mnemo/config.json").exists());
}

#[test]
fn test_init_seeds_default_projects() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(dir.path().join(".mnemo/archives/frontend").is_dir());
    assert!(dir.path().join(".mnemo/archives/backend").is_dir());
    assert!(dir.path().join(".mnemo/archives/shared").is_dir());
}

#[test]
fn test_init_idempotent() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
}

#[test]
fn test_init_keeps_existing_config() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let config_path = dir.path().join(".mnemo/config.json");
    std::fs::write(&config_path, "{\"max_file_lines\": 42}\n").unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let config = std::fs::read_to_string(&config_path).unwrap();
    assert!(config.contains("42"));
}

#[test]
fn test_init_json_format() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""))
        .stdout(predicate::str::contains("\"root\""));
}

#[test]
fn test_init_writes_default_config() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let config = std::fs::read_to_string(dir.path().join(".mnemo/config.json")).unwrap();
    assert!(config.contains("\"max_file_lines\": 500"));
    assert!(config.contains("\"default_projects\""));
}

// ============================================================================
// Add command tests
// ============================================================================

#[test]
fn test_add_creates_section_file() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "--project",
            "frontend",
            "--section",
            "errors",
            "--title",
            "CORS fix",
            "--content",
            "Set Access-Control-Allow-Origin on the API gateway.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'CORS fix' to"));

    let file = dir
        .path()
        .join(".mnemo/archives/frontend/errors/errors_0.md");
    assert!(file.exists());

    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.contains("# Frontend Project - Errors Archives"));
    assert!(content.contains("## CORS fix"));
    assert!(content.contains("*Added on: "));
    assert!(content.contains("Set Access-Control-Allow-Origin on the API gateway."));
    assert!(content.contains("---"));
}

#[test]
fn test_add_without_init_creates_archive() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add", "-p", "backend", "-s", "fixes", "-t", "Retry", "-c", "Use backoff.",
        ])
        .assert()
        .success();

    assert!(dir
        .path()
        .join(".mnemo/archives/backend/fixes/fixes_0.md")
        .exists());
}

#[test]
fn test_add_appends_to_existing_file() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "First", "-c", "one"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "Second", "-c", "two"])
        .assert()
        .success();

    let file = dir.path().join(".mnemo/archives/backend/errors/errors_0.md");
    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.contains("## First"));
    assert!(content.contains("## Second"));

    // No rollover yet
    assert!(!dir
        .path()
        .join(".mnemo/archives/backend/errors/errors_1.md")
        .exists());
}

#[test]
fn test_add_from_file() {
    let dir = tempdir().unwrap();

    let notes = dir.path().join("notes.md");
    std::fs::write(&notes, "Connection pool needs 30s timeout.").unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "setup", "-t", "Pool timeout"])
        .arg("--file")
        .arg(&notes)
        .assert()
        .success();

    let content =
        std::fs::read_to_string(dir.path().join(".mnemo/archives/backend/setup/setup_0.md"))
            .unwrap();
    assert!(content.contains("Connection pool needs 30s timeout."));
}

#[test]
fn test_add_from_stdin() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "shared", "-s", "setup", "-t", "Env vars"])
        .write_stdin("export DATABASE_URL=postgres://localhost\n")
        .assert()
        .success();

    let content =
        std::fs::read_to_string(dir.path().join(".mnemo/archives/shared/setup/setup_0.md"))
            .unwrap();
    assert!(content.contains("export DATABASE_URL=postgres://localhost"));
}

#[test]
fn test_add_normalizes_project_and_section() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add", "-p", "Front End", "-s", "Error Handling", "-t", "T", "-c", "c",
        ])
        .assert()
        .success();

    assert!(dir
        .path()
        .join(".mnemo/archives/front-end/error-handling/error-handling_0.md")
        .exists());
}

#[test]
fn test_add_rejects_empty_title() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "  ", "-c", "c"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("title must not be empty"));
}

#[test]
fn test_add_rejects_path_traversal_project() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "../evil", "-s", "errors", "-t", "T", "-c", "c"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid project"));
}

#[test]
fn test_add_json_format() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "--format", "json", "add", "-p", "backend", "-s", "errors", "-t", "T", "-c", "c",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""))
        .stdout(predicate::str::contains("\"sequence\": 0"))
        .stdout(predicate::str::contains("\"created_file\": true"));
}

#[test]
fn test_add_duplicate_title_rolls_over() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "Same", "-c", "first"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "Same", "-c", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("errors_1.md"));

    assert!(dir
        .path()
        .join(".mnemo/archives/backend/errors/errors_1.md")
        .exists());
}

#[test]
fn test_add_rolls_over_at_line_cap() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // One entry block is 8 lines plus the 2-line file header
    std::fs::write(
        dir.path().join(".mnemo/config.json"),
        "{\"max_file_lines\": 12}\n",
    )
    .unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "First", "-c", "one"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "Second", "-c", "two"])
        .assert()
        .success();

    let section_dir = dir.path().join(".mnemo/archives/backend/errors");
    assert!(section_dir.join("errors_0.md").exists());
    assert!(section_dir.join("errors_1.md").exists());

    // Each file carries its own header
    let second = std::fs::read_to_string(section_dir.join("errors_1.md")).unwrap();
    assert!(second.contains("# Backend Project - Errors Archives"));
    assert!(second.contains("## Second"));
}

// ============================================================================
// Search command tests
// ============================================================================

#[test]
fn test_search_finds_added_entry() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "-p",
            "backend",
            "-s",
            "errors",
            "-t",
            "DB Timeout",
            "-c",
            "connection pool exhausted under load",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["search", "connection", "pool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backend/errors"))
        .stdout(predicate::str::contains("DB Timeout"));
}

#[test]
fn test_search_no_results() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["search", "xyzzyplugh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found for 'xyzzyplugh'"));
}

#[test]
fn test_search_requires_query() {
    mnemo().arg("search").assert().code(2);
}

#[test]
fn test_search_json_format() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "-p",
            "backend",
            "-s",
            "errors",
            "-t",
            "Postgres down",
            "-c",
            "postgres refused connections",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "search", "postgres"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"query\": \"postgres\""))
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"match_quality\": 100"));
}

#[test]
fn test_search_text_banner() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "-p",
            "backend",
            "-s",
            "errors",
            "-t",
            "Postgres down",
            "-c",
            "postgres refused connections",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "text", "search", "postgres"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ARCHIVES SEARCH RESULTS FOR: 'postgres'",
        ))
        .stdout(predicate::str::contains(
            "Found 1 relevant entries in the archives:",
        ))
        .stdout(predicate::str::contains("RESULT 1: Postgres down"))
        .stdout(predicate::str::contains("CONTENT PREVIEW:"));
}

#[test]
fn test_search_text_banner_empty() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "text", "search", "missingthing"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No archives found for query: 'missingthing'",
        ));
}

#[test]
fn test_search_project_filter() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "-p",
            "backend",
            "-s",
            "errors",
            "-t",
            "Backend timeout",
            "-c",
            "timeout in worker",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "-p",
            "frontend",
            "-s",
            "errors",
            "-t",
            "Frontend timeout",
            "-c",
            "timeout in fetch",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["search", "timeout", "--project", "backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend timeout"))
        .stdout(predicate::str::contains("Frontend timeout").not());
}

#[test]
fn test_search_unknown_project_filter_exit_code_3() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["search", "timeout", "--project", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("project not found: ghost"));
}

#[test]
fn test_search_limit() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add", "-p", "backend", "-s", "errors", "-t", "First timeout", "-c", "timeout one",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add", "-p", "backend", "-s", "errors", "-t", "Second timeout", "-c", "timeout two",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "search", "timeout", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"));
}

#[test]
fn test_search_phrase_match_ranks_first() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "-p",
            "backend",
            "-s",
            "errors",
            "-t",
            "Scattered words",
            "-c",
            "pool of connection handles",
        ])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args([
            "add",
            "-p",
            "backend",
            "-s",
            "errors",
            "-t",
            "Exact phrase",
            "-c",
            "connection pool exhausted",
        ])
        .assert()
        .success();

    let output = mnemo()
        .current_dir(dir.path())
        .args(["search", "connection", "pool"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let exact = stdout.find("Exact phrase").expect("phrase entry missing");
    let scattered = stdout.find("Scattered words").expect("token entry missing");
    assert!(
        exact < scattered,
        "phrase match should rank first:\n{}",
        stdout
    );
}

// ============================================================================
// Rule command tests
// ============================================================================

#[test]
fn test_rule_add_creates_file() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "rule",
            "add",
            "--name",
            "style",
            "--content",
            "Use tabs for indentation.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule 'style' written to"));

    let file = dir.path().join(".mnemo/custom_rules/style.md");
    assert!(file.exists());
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "Use tabs for indentation."
    );
}

#[test]
fn test_rule_add_replaces_existing() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "old"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "new"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join(".mnemo/custom_rules/style.md")).unwrap(),
        "new"
    );
}

#[test]
fn test_rule_add_normalizes_name() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "Code Style", "-c", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule 'code-style'"));

    assert!(dir.path().join(".mnemo/custom_rules/code-style.md").exists());
}

#[test]
fn test_rule_add_rejects_invalid_name() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "../evil", "-c", "x"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid rule name"));
}

#[test]
fn test_rule_add_from_file() {
    let dir = tempdir().unwrap();

    let source = dir.path().join("rule.md");
    std::fs::write(&source, "Prefer composition over inheritance.").unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "design"])
        .arg("--file")
        .arg(&source)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join(".mnemo/custom_rules/design.md")).unwrap(),
        "Prefer composition over inheritance."
    );
}

#[test]
fn test_rule_list_sorted() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "s"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "api", "-c", "a"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api\nstyle"));
}

#[test]
fn test_rule_list_empty() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No custom rules"));
}

#[test]
fn test_rule_list_json_map() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use tabs."])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "rule", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"style\": \"Use tabs.\""));
}

// ============================================================================
// Generate command tests
// ============================================================================

#[test]
fn test_generate_stdout_merges_rules() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use tabs for indentation."])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Instructions"))
        .stdout(predicate::str::contains("# Mnemo Custom Rules"))
        .stdout(predicate::str::contains("## style"))
        .stdout(predicate::str::contains("Use tabs for indentation."));
}

#[test]
fn test_generate_without_rules_keeps_base_clean() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Instructions"))
        .stdout(predicate::str::contains("Mnemo Custom Rules").not());
}

#[test]
fn test_generate_writes_output_file() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use tabs."])
        .assert()
        .success();

    let output = dir.path().join(".cursorrules");
    mnemo()
        .current_dir(dir.path())
        .args(["generate", "--output", ".cursorrules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote "));

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("# Instructions"));
    assert!(content.contains("# Mnemo Custom Rules"));
    assert!(content.contains("Use tabs."));
}

#[test]
fn test_generate_is_idempotent() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use tabs."])
        .assert()
        .success();

    let output = dir.path().join(".cursorrules");
    mnemo()
        .current_dir(dir.path())
        .args(["generate", "-o", ".cursorrules"])
        .assert()
        .success();
    let first = std::fs::read_to_string(&output).unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["generate", "-o", ".cursorrules"])
        .assert()
        .success();
    let second = std::fs::read_to_string(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_generate_preserves_manual_edits() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use tabs."])
        .assert()
        .success();

    let output = dir.path().join(".cursorrules");
    mnemo()
        .current_dir(dir.path())
        .args(["generate", "-o", ".cursorrules"])
        .assert()
        .success();

    // Hand-written section outside the managed block
    let mut content = std::fs::read_to_string(&output).unwrap();
    content.push_str("\n# Team Conventions\n\nAlways run make before pushing.\n");
    std::fs::write(&output, &content).unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use spaces."])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["generate", "-o", ".cursorrules"])
        .assert()
        .success();

    let regenerated = std::fs::read_to_string(&output).unwrap();
    assert!(regenerated.contains("# Team Conventions"));
    assert!(regenerated.contains("Always run make before pushing."));
    assert!(regenerated.contains("Use spaces."));
    assert!(!regenerated.contains("Use tabs."));
}

#[test]
fn test_generate_with_custom_base() {
    let dir = tempdir().unwrap();

    let base = dir.path().join("base.md");
    std::fs::write(&base, "# My Base\n\nProject ground rules.\n").unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use tabs."])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["generate", "--base", "base.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# My Base"))
        .stdout(predicate::str::contains("# Mnemo Custom Rules"))
        .stdout(predicate::str::contains("Use tabs."));
}

#[test]
fn test_generate_integration_rule_first() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "zeta", "-c", "last"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "integration", "-c", "first"])
        .assert()
        .success();

    let output = mnemo()
        .current_dir(dir.path())
        .arg("generate")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let integration = stdout.find("## integration").expect("integration missing");
    let zeta = stdout.find("## zeta").expect("zeta missing");
    assert!(integration < zeta, "integration rule should come first");
}

#[test]
fn test_generate_json_format() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["rule", "add", "-n", "style", "-c", "Use tabs."])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""))
        .stdout(predicate::str::contains("\"document\""));
}

// ============================================================================
// Projects and sections tests
// ============================================================================

#[test]
fn test_projects_lists_defaults() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("backend"))
        .stdout(predicate::str::contains("frontend"))
        .stdout(predicate::str::contains("shared"));
}

#[test]
fn test_projects_json_format() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "projects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 3"))
        .stdout(predicate::str::contains("\"projects\""));
}

#[test]
fn test_sections_lists_created_sections() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "T", "-c", "c"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "setup", "-t", "T", "-c", "c"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["sections", "--project", "backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("errors"))
        .stdout(predicate::str::contains("setup"));
}

#[test]
fn test_sections_json_format() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "T", "-c", "c"])
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "sections", "-p", "backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"project\": \"backend\""))
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"sections\""));
}

// ============================================================================
// Global flag tests
// ============================================================================

#[test]
fn test_root_flag_targets_other_directory() {
    let archive_dir = tempdir().unwrap();
    let work_dir = tempdir().unwrap();

    mnemo()
        .current_dir(work_dir.path())
        .arg("--root")
        .arg(archive_dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(work_dir.path())
        .arg("--root")
        .arg(archive_dir.path())
        .args([
            "add", "-p", "backend", "-s", "errors", "-t", "Remote", "-c", "stored remotely",
        ])
        .assert()
        .success();

    assert!(archive_dir
        .path()
        .join(".mnemo/archives/backend/errors/errors_0.md")
        .exists());
    assert!(!work_dir.path().join(".mnemo").exists());
}

#[test]
fn test_root_env_variable() {
    let archive_dir = tempdir().unwrap();
    let work_dir = tempdir().unwrap();

    mnemo()
        .current_dir(work_dir.path())
        .env("MNEMO_ROOT", archive_dir.path())
        .args(["add", "-p", "backend", "-s", "errors", "-t", "Via env", "-c", "c"])
        .assert()
        .success();

    assert!(archive_dir
        .path()
        .join(".mnemo/archives/backend/errors/errors_0.md")
        .exists());
}

#[test]
fn test_quiet_suppresses_output() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args([
            "--quiet", "add", "-p", "backend", "-s", "errors", "-t", "T", "-c", "c",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_quiet_keeps_json_output() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .args(["--quiet", "--format", "json", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""));
}

#[test]
fn test_error_json_envelope_on_stderr() {
    let dir = tempdir().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mnemo()
        .current_dir(dir.path())
        .args(["--format", "json", "sections", "-p", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"not_found\""))
        .stderr(predicate::str::contains("\"code\":3"));
}
