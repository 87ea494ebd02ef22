//! Behavioral specs for report output.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

/// > Text mode starts with the scan root and ignored names
#[test]
fn text_output_starts_with_banner() {
    let project = Project::empty();
    project.file("notes.txt", "hello\n");

    let result = project.run().env("PATH", project.path()).passes();
    let stdout = result.stdout();
    assert!(stdout.starts_with("Checking "), "{stdout}");
    assert!(stdout.contains("Ignoring: "));
    assert!(stdout.contains("node_modules"));
    assert!(stdout.contains("style_check"));
}

/// > -o json prints only a JSON document
#[test]
fn json_output_is_valid() {
    let project = Project::empty();
    project.file("notes.txt", "hello\n");

    let result = project
        .run()
        .env("PATH", project.path())
        .args(["-o", "json"])
        .passes();

    let json = result.json();
    assert_eq!(json["passed"], true);
    assert_eq!(json["mode"], "check");
    assert_eq!(json["scan"]["files_unclaimed"], 1);
    assert_eq!(json["families"].as_array().unwrap().len(), 4);
    assert!(json.get("duration_ms").is_some());
    assert!(json.get("timestamp").is_some());
}

/// > --json FILE writes the report alongside console output
#[test]
fn json_report_file_is_written() {
    let project = Project::empty();
    project.file("notes.txt", "hello\n");
    let report = project.path().join("out/report.json");

    project
        .run()
        .env("PATH", project.path())
        .args(["--json"])
        .args([&report])
        .passes()
        .stdout_has("no applicable files");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["passed"], true);
}

/// > Failing families appear in the JSON report with their output
#[cfg(unix)]
#[test]
fn json_output_includes_failing_output() {
    let project = Project::empty();
    project.file("b.py", "def f():\n    x = 1\n");
    let bin = project.fake_tool("python3", FAKE_PYTHON);

    let result = project
        .run()
        .path_only(&bin)
        .args(["-o", "json"])
        .exits(1);

    let json = result.json();
    let pyflakes = &json["families"][0];
    assert_eq!(pyflakes["family"], "pyflakes");
    assert_eq!(pyflakes["status"], "findings");
    assert_eq!(pyflakes["exit_code"], 1);
    assert!(pyflakes["output"].as_str().unwrap().contains("b.py:2:5"));
}

/// > NO_COLOR disables ANSI escapes
#[test]
fn no_color_env_disables_color() {
    let project = Project::empty();
    project.file("notes.txt", "hello\n");

    let mut cmd = stylecheck_cmd();
    cmd.args(["check", "--root"])
        .arg(project.path())
        .arg("--tool-dir")
        .arg(project.tool_dir())
        .env("NO_COLOR", "1")
        .env("PATH", project.path());

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains("\x1b["),
        "output should not contain ANSI codes"
    );
}

/// > --verbose prints scan statistics to stderr
#[test]
fn verbose_reports_scan_statistics() {
    let project = Project::empty();
    project.file("notes.txt", "hello\n");

    project
        .run()
        .env("PATH", project.path())
        .args(["--verbose"])
        .passes()
        .stderr_has("[verbose]")
        .stderr_has("unclaimed");
}

/// > STYLECHECK_LOG enables tracing on stderr
#[test]
fn log_env_enables_debug() {
    let project = Project::empty();

    project
        .run()
        .env("PATH", project.path())
        .env("STYLECHECK_LOG", "debug")
        .passes()
        .stderr_has("phase:");
}
