//! End-to-end tests for `kol parse`, `kol tokens` and `kol fmt`.
//!
//! These tests invoke the compiled binary against files in a temp dir.

use std::path::PathBuf;
use std::process::{Command, Output};

fn kol_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kol"))
}

fn write_source(dir: &tempfile::TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, src).expect("write source");
    path
}

fn run(args: &[&str]) -> Output {
    kol_bin().args(args).output().expect("run binary")
}

#[test]
fn cli_parse_prints_sexpr() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "ok.kol", "let x = 1 + 2 * 3;\n");

    let output = run(&["parse", file.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "kol parse should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        "(source_file\n  (let x (+ (int 1) (* (int 2) (int 3)))))"
    );
}

#[test]
fn cli_parse_json() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "ok.kol", "fun f() { }");

    let output = run(&["parse", file.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(v["definitions"][0]["Function"]["name"]["text"], "f");
}

#[test]
fn cli_parse_reports_diagnostics() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(
        &dir,
        "bad.kol",
        "struct Point { x int, y: int }\nfun broken(a int) { }\n",
    );

    let output = run(&["parse", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(
        lines,
        vec![
            "1:18: expected `:`, found `int`",
            "2:14: expected `:`, found `int`",
        ]
    );
}

#[test]
fn cli_max_depth_flag() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "deep.kol", "let v = ----------x;");

    let ok = run(&["parse", file.to_str().unwrap()]);
    assert!(ok.status.success());

    let limited = run(&["--max-depth", "4", "parse", file.to_str().unwrap()]);
    assert_eq!(limited.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&limited.stderr);
    assert!(
        stderr.contains("nesting depth limit of 4 exceeded"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn cli_tokens() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "t.kol", "let /* c */ x");

    let output = run(&["tokens", file.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "1:1 KwLet \"let\"\n1:13 Ident(\"x\") \"x\"\n1:14 Eof \"\"\n"
    );

    let output = run(&["tokens", "--all", file.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1:5 Comment \"/* c */\""), "stdout: {}", stdout);
}

#[test]
fn cli_fmt_canonicalizes() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "messy.kol", "fun  f(a:int)int{return a*2}");

    let output = run(&["fmt", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "fun f(a: int) int {\n    return a * 2;\n}\n"
    );
}

#[test]
fn cli_missing_file_fails() {
    let output = run(&["parse", "/nonexistent/never.kol"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {}", stderr);
}

#[test]
fn cli_default_depth_comes_from_parse_limits() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let limit = kol_parse::ParseLimits::default().max_depth;
    let file = write_source(
        &dir,
        "deep.kol",
        &format!("let v = {}x;", "-".repeat(limit + 10)),
    );

    let output = run(&["parse", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&format!("nesting depth limit of {} exceeded", limit)),
        "stderr: {}",
        stderr
    );
}

#[test]
fn cli_tokens_json() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "t.kol", "let x");

    let output = run(&["tokens", "--json", file.to_str().unwrap()]);
    assert!(output.status.success());
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(v[0]["kind"], "KwLet");
    assert_eq!(v[1]["kind"]["Ident"], "x");
    assert_eq!(v[1]["span"]["start"], 4);
}
