//! Binary-level tests
//!
//! Each test lays out a small monorepo in a temp dir (archgate.toml plus
//! packages/*) and runs the built binary against it.

use std::path::Path;
use std::process::Command;

fn archgate_bin() -> &'static str {
    env!("CARGO_BIN_EXE_archgate")
}

const CONFIG: &str = r#"
namespace = "@app"

[modules.core]
layer = 0

[modules.auth]
layer = 1

[modules.editor]
layer = 3

[modules.export]
layer = 3
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Compliant repo: auth -> core, editor -> auth, export -> core
fn setup_clean_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "archgate.toml", CONFIG);
    write(root, "packages/core/index.ts", "export const id = (x: string) => x;\n");
    write(
        root,
        "packages/auth/index.ts",
        "import { id } from \"@app/core\";\nexport const login = id;\n",
    );
    write(
        root,
        "packages/editor/src/index.tsx",
        "import { login } from \"@app/auth\";\nimport React from \"react\";\n",
    );
    write(
        root,
        "packages/export/index.js",
        "const core = require(\"@app/core\");\nmodule.exports = core;\n",
    );
    dir
}

fn run(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(archgate_bin())
        .args(args)
        .arg(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run archgate");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn run_json(dir: &Path, extra: &[&str]) -> (i32, serde_json::Value) {
    let mut args = vec!["check", "--format", "json"];
    args.extend_from_slice(extra);
    let (code, stdout, stderr) = run(dir, &args);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}\nstderr: {stderr}"));
    (code, json)
}

// ============================================================================
// Gate
// ============================================================================

#[test]
fn test_clean_repo_passes() {
    let dir = setup_clean_repo();
    let (code, json) = run_json(dir.path(), &[]);
    assert_eq!(code, 0);
    assert_eq!(json["score"]["overall"], 100.0);
    assert_eq!(json["summary"]["totalModules"], 4);
    assert_eq!(json["summary"]["totalViolations"], 0);
}

#[test]
fn test_critical_violation_fails_gate() {
    let dir = setup_clean_repo();
    write(
        dir.path(),
        "packages/core/index.ts",
        "import { login } from \"@app/auth\";\nexport const id = login;\n",
    );

    let (code, json) = run_json(dir.path(), &[]);
    assert_eq!(code, 1);
    assert!(json["summary"]["critical"].as_u64().unwrap() >= 2);
    assert!(json["score"]["overall"].as_f64().unwrap() < 100.0);

    let modules = json["modules"].as_array().unwrap();
    let core = modules.iter().find(|m| m["name"] == "core").unwrap();
    assert!(core["score"].as_f64().unwrap() < 100.0);
    let kinds: Vec<&str> = core["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"forbidden"));
    assert!(kinds.contains(&"layer"));
    // core -> auth -> core
    assert!(kinds.contains(&"circular"));
}

#[test]
fn test_fail_on_none_disables_gate() {
    let dir = setup_clean_repo();
    write(dir.path(), "packages/core/index.ts", "import \"@app/auth\";\n");
    let (code, _) = run_json(dir.path(), &["--fail-on", "none"]);
    assert_eq!(code, 0);
}

#[test]
fn test_major_violation_gated_by_threshold() {
    let dir = setup_clean_repo();
    write(
        dir.path(),
        "packages/editor/src/index.tsx",
        "export * from \"@app/export\";\n",
    );

    let (code, json) = run_json(dir.path(), &[]);
    assert_eq!(code, 0, "major violations pass the default critical gate");
    assert_eq!(json["summary"]["major"], 2);
    assert_eq!(json["score"]["severities"]["major"], 60.0);

    let (code, _) = run_json(dir.path(), &["--fail-on", "major"]);
    assert_eq!(code, 1);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run(dir.path(), &["check"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("archgate.toml"), "stderr: {stderr}");
}

#[test]
fn test_missing_module_root_is_a_warning() {
    let dir = setup_clean_repo();
    let mut config = CONFIG.to_string();
    config.push_str("\n[modules.ghost]\nlayer = 2\n");
    write(dir.path(), "archgate.toml", &config);

    let (code, json) = run_json(dir.path(), &[]);
    assert_eq!(code, 0);
    let warnings = json["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w["module"] == "ghost" && w["kind"] == "missing-root"));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_output_file_markdown() {
    let dir = setup_clean_repo();
    let out = dir.path().join("report.md");
    let (code, stdout, _) = run(
        dir.path(),
        &["check", "--format", "md", "--output", out.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    assert!(stdout.is_empty());

    let md = std::fs::read_to_string(&out).unwrap();
    assert!(md.contains("## Executive Summary"));
    assert!(md.contains("```mermaid"));
}

#[test]
fn test_no_graph_flag() {
    let dir = setup_clean_repo();
    let (_, json) = run_json(dir.path(), &["--no-graph"]);
    assert!(json.get("graph").is_none());
}

#[test]
fn test_text_is_default_format() {
    let dir = setup_clean_repo();
    let (code, stdout, _) = run(dir.path(), &[]);
    assert_eq!(code, 0);
    assert!(stdout.contains("archgate compliance"));
    assert!(stdout.contains("Score: 100.00/100"));
}

#[test]
fn test_config_defaults_apply() {
    let dir = setup_clean_repo();
    let mut config = CONFIG.to_string();
    config.push_str("\n[defaults]\nformat = \"dot\"\n");
    write(dir.path(), "archgate.toml", &config);

    let (_, stdout, _) = run(dir.path(), &["check"]);
    assert!(stdout.starts_with("digraph {"), "stdout: {stdout}");
}

#[test]
fn test_test_files_are_excluded() {
    let dir = setup_clean_repo();
    write(dir.path(), "packages/core/index.test.ts", "import \"@app/editor\";\n");
    write(dir.path(), "packages/core/__tests__/setup.ts", "import \"@app/editor\";\n");
    let (code, json) = run_json(dir.path(), &[]);
    assert_eq!(code, 0);
    assert_eq!(json["summary"]["totalViolations"], 0);
}

// ============================================================================
// Other commands
// ============================================================================

#[test]
fn test_rules_command() {
    let output = Command::new(archgate_bin())
        .args(["rules", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rules: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = rules.as_array().unwrap();
    assert_eq!(rules.len(), 10);
    assert_eq!(rules[0]["id"], "R1");
    assert_eq!(rules[7]["name"], "no-circular");
}

#[test]
fn test_init_then_check() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    assert!(dir.path().join("archgate.toml").exists());

    // Example modules have no roots yet: warnings only
    let (code, json) = run_json(dir.path(), &[]);
    assert_eq!(code, 0);
    assert_eq!(json["summary"]["totalModules"], 5);
    assert_eq!(json["summary"]["totalFiles"], 0);
}
