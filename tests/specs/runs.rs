//! Behavioral specs for end-to-end runs.
//!
//! Linters are replaced by shell scripts on a restricted PATH, so these
//! specs exercise discovery, bootstrap, dispatch, and exit codes without
//! network access or real tooling.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

// =============================================================================
// No applicable files
// =============================================================================

/// > A tree with no claimed files prints `no applicable files` and exits 0
#[test]
fn no_applicable_files_passes() {
    let project = Project::empty();
    project.file("README.md", "# readme\n");
    project.file("data/config.json", "{}\n");

    project
        .run()
        .env("PATH", project.path())
        .passes()
        .stdout_has("no applicable files");
}

/// > Files only inside excluded directories do not count
#[test]
fn excluded_only_tree_has_no_applicable_files() {
    let project = Project::empty();
    project.file("node_modules/lib/index.js", "broken(\n");
    project.file(".venv/lib/site.py", "x = 1\n");

    project
        .run()
        .env("PATH", project.path())
        .passes()
        .stdout_has("no applicable files");
}

/// > Empty root exits 0
#[test]
fn empty_root_passes() {
    let project = Project::empty();
    project.run().env("PATH", project.path()).passes();
}

// =============================================================================
// Findings and tool failures
// =============================================================================

/// > Findings exit 1 and print the linter's raw output
#[cfg(unix)]
#[test]
fn python_findings_exit_one() {
    let project = Project::empty();
    project.file("a.py", "import os\nprint(os.name)\n");
    project.file("b.py", "def f():\n    x = 1\n");
    let bin = project.fake_tool("python3", FAKE_PYTHON);

    project
        .run()
        .path_only(&bin)
        .exits(1)
        .stdout_has("pyflakes: FAIL")
        .stdout_has("b.py:2:5: local variable 'x' is assigned to but never used")
        .stdout_lacks("a.py:");
}

/// > A clean tree exits 0 with a PASS line
#[cfg(unix)]
#[test]
fn clean_python_passes() {
    let project = Project::empty();
    project.file("a.py", "import os\nprint(os.name)\n");
    let bin = project.fake_tool("python3", FAKE_PYTHON);

    project
        .run()
        .path_only(&bin)
        .passes()
        .stdout_has("pyflakes: PASS (1 file, 1 run");
}

/// > A linter that cannot run is a tool failure (exit 3)
#[cfg(unix)]
#[test]
fn crashing_linter_exits_three() {
    let project = Project::empty();
    project.file("a.py", "print(1)\n");
    let bin = project.fake_tool("python3", CRASHING_PYTHON);

    project
        .run()
        .path_only(&bin)
        .exits(3)
        .stdout_has("pyflakes: ERROR");
}

/// > Missing npm degrades Node families only; Python still runs
#[cfg(unix)]
#[test]
fn missing_npm_is_a_tool_failure_for_node_only() {
    let project = Project::empty();
    project.file("app.py", "print(1)\n");
    project.file("index.html", "<html></html>\n");
    let bin = project.fake_tool("python3", FAKE_PYTHON);

    project
        .run()
        .path_only(&bin)
        .exits(3)
        .stdout_has("pyflakes: PASS")
        .stdout_has("htmlhint: SKIP")
        .stdout_has("WARN node:");
}

/// > --no-install reports missing tooling without running installers
#[cfg(unix)]
#[test]
fn no_install_skips_installers() {
    let project = Project::empty();
    project.file("a.css", "a { color: red; }\n");
    let bin = project.fake_tool("npm", "echo npm-was-called >&2\nexit 0\n");

    let result = project.run().path_only(&bin).args(["--no-install"]).exits(3);
    assert!(!result.stderr().contains("npm-was-called"));
    assert!(!project.tool_dir().join("package.json").exists());
}

/// > Disabled families never fail the run
#[cfg(unix)]
#[test]
fn skipped_family_does_not_fail() {
    let project = Project::empty();
    project.file("a.py", "print(1)\n");
    project.file("index.html", "<p>\n");
    let bin = project.fake_tool("python3", FAKE_PYTHON);

    project
        .run()
        .path_only(&bin)
        .args(["--skip", "htmlhint"])
        .passes()
        .stdout_lacks("htmlhint");
}

/// > Fix mode skips families without a fix command
#[cfg(unix)]
#[test]
fn fix_mode_skips_htmlhint() {
    let project = Project::empty();
    project.file("index.html", "<p>\n");
    let bin = project.fake_tool("python3", FAKE_PYTHON);

    project
        .fix()
        .path_only(&bin)
        .passes()
        .stdout_has("htmlhint: skip");
}
