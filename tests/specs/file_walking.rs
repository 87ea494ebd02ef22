//! Behavioral specs for file discovery.
//!
//! Uses the hidden `--list-files` flag, which prints each claimed file and
//! its family, one per line, without running any linter.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

fn list_files(project: &Project) -> String {
    project
        .run()
        .env("PATH", project.path())
        .args(["--list-files"])
        .passes()
        .stdout()
}

/// > Files are routed to families by extension, case-insensitively
#[test]
fn files_are_bucketed_by_extension() {
    let project = Project::empty();
    project.file("src/app.py", "");
    project.file("web/App.JSX", "");
    project.file("web/site.scss", "");
    project.file("web/index.htm", "");
    project.file("README.md", "");

    let stdout = list_files(&project);

    assert!(stdout.contains("src/app.py\tpyflakes"));
    assert!(stdout.contains("web/App.JSX\teslint"));
    assert!(stdout.contains("web/site.scss\tstylelint"));
    assert!(stdout.contains("web/index.htm\thtmlhint"));
    assert!(!stdout.contains("README.md"));
}

/// > node_modules is pruned no matter how deep or how large
#[test]
fn node_modules_is_pruned() {
    let project = Project::empty();
    project.file("src/app.js", "");
    for i in 0..200 {
        project.file(&format!("node_modules/pkg{i}/index.js"), "");
    }
    project.file("packages/ui/node_modules/dep/index.js", "");

    let stdout = list_files(&project);

    assert_eq!(stdout.lines().count(), 1, "{stdout}");
    assert!(stdout.contains("src/app.js"));
}

/// > The tool directory and hidden directories are never scanned
#[test]
fn tool_and_hidden_directories_are_skipped() {
    let project = Project::empty();
    project.file("style_check/eslint.config.cjs", "module.exports = [];\n");
    project.file(".cache/tmp.py", "");
    project.file("app.py", "");

    let stdout = list_files(&project);

    assert_eq!(stdout.trim(), "app.py\tpyflakes");
}

/// > --exclude adds names to the default list
#[test]
fn cli_exclude_extends_defaults() {
    let project = Project::empty();
    project.file("generated/api.js", "");
    project.file("src/app.js", "");

    let stdout = project
        .run()
        .env("PATH", project.path())
        .args(["--list-files", "--exclude", "generated"])
        .passes()
        .stdout();

    assert_eq!(stdout.trim(), "src/app.js\teslint");
}

/// > Config globs exclude matching paths
#[test]
fn config_globs_exclude_paths() {
    let project = Project::empty();
    project.config("[exclude]\nglobs = [\"docs/**/*.js\"]\n");
    project.file("docs/examples/demo.js", "");
    project.file("src/app.js", "");

    let stdout = list_files(&project);

    assert_eq!(stdout.trim(), "src/app.js\teslint");
}

/// > Symlink loops do not hang the walk
#[cfg(unix)]
#[test]
fn symlink_loops_terminate() {
    let project = Project::empty();
    project.file("src/app.py", "");
    std::os::unix::fs::symlink(project.path().join("src"), project.path().join("src/loop"))
        .unwrap();

    let stdout = list_files(&project);

    assert!(stdout.contains("src/app.py"));
}
