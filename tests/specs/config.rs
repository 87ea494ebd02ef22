//! Behavioral specs for `stylecheck.toml` handling.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

/// > Unknown keys are warnings (forward compatibility)
#[test]
fn unknown_config_key_warns() {
    let project = Project::empty();
    project.config("unknown_key = true\n");

    project
        .run()
        .env("PATH", project.path())
        .passes()
        .stderr_has("unrecognized field `unknown_key`");
}

/// > Unknown nested keys are warnings
#[test]
fn unknown_nested_config_key_warns() {
    let project = Project::empty();
    project.config("[dispatch]\nworkers = 3\n");

    project
        .run()
        .env("PATH", project.path())
        .passes()
        .stderr_has("dispatch.workers");
}

/// > Valid config produces no warnings
#[test]
fn valid_config_no_warnings() {
    let project = Project::empty();
    project.config("[dispatch]\njobs = 2\ntimeout = \"30s\"\n");

    project
        .run()
        .env("PATH", project.path())
        .passes()
        .stderr_lacks("warning");
}

/// > Unsupported version is a configuration error (exit 2)
#[test]
fn unsupported_version_fails() {
    let project = Project::empty();
    project.config("version = 2\n");

    project
        .run()
        .env("PATH", project.path())
        .exits(2)
        .stderr_has("version");
}

/// > Malformed TOML is a configuration error
#[test]
fn malformed_config_fails() {
    let project = Project::empty();
    project.config("version = 1\n[exclude\n");

    project.run().env("PATH", project.path()).exits(2);
}

/// > -C points at an explicit config file
#[test]
fn explicit_config_flag_is_used() {
    let project = Project::empty();
    let config = project.path().join("custom.toml");
    std::fs::write(&config, "version = 1\nmystery = 1\n").unwrap();

    project
        .run()
        .env("PATH", project.path())
        .args(["-C"])
        .args([&config])
        .passes()
        .stderr_has("mystery");
}

/// > A missing explicit config is an error
#[test]
fn missing_explicit_config_fails() {
    let project = Project::empty();

    project
        .run()
        .env("PATH", project.path())
        .env("STYLECHECK_CONFIG", project.path().join("absent.toml"))
        .exits(2);
}

/// > Config can disable a family
#[test]
fn config_disables_family() {
    let project = Project::empty();
    project.config("[families.htmlhint]\nenabled = false\n");
    project.file("index.html", "<p>\n");

    project
        .run()
        .env("PATH", project.path())
        .passes()
        .stdout_lacks("htmlhint");
}
