// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Linter family registry.
//!
//! Each family pairs one external linter with the file extensions it claims,
//! the command templates used to invoke it, and how to tell whether its
//! tooling is installed. The table is fixed at compile time; extension
//! lookups resolve against it once per discovered file.
//!
//! Command templates are argument vectors. Two tokens are expanded when a
//! command is rendered:
//! - `{python}` → the resolved Python interpreter
//! - `{files}` → the batch of file paths (one argument per file)

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Identifier of a built-in linter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyId {
    Pyflakes,
    Eslint,
    Stylelint,
    Htmlhint,
}

impl FamilyId {
    /// All families in registry order.
    pub const ALL: [FamilyId; 4] = [
        FamilyId::Pyflakes,
        FamilyId::Eslint,
        FamilyId::Stylelint,
        FamilyId::Htmlhint,
    ];

    /// Family name as used on the command line and in config.
    pub fn name(self) -> &'static str {
        self.family().name
    }

    /// Look up a family by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name.trim()))
            .map(|f| f.id)
    }

    /// Registry entry for this family.
    pub fn family(self) -> &'static LinterFamily {
        match self {
            FamilyId::Pyflakes => &REGISTRY[0],
            FamilyId::Eslint => &REGISTRY[1],
            FamilyId::Stylelint => &REGISTRY[2],
            FamilyId::Htmlhint => &REGISTRY[3],
        }
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Tooling ecosystem a family's dependency is installed through.
///
/// Families sharing an ecosystem share one install command per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Installed with `pip` into the active interpreter.
    Python,
    /// Installed with `npm install` into the tool directory.
    Node,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ecosystem::Python => "python",
            Ecosystem::Node => "node",
        };
        f.pad(name)
    }
}

/// Working directory a command runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkDir {
    /// The scanned project root.
    ProjectRoot,
    /// The orchestrator's own directory (holds linter configs and node_modules).
    ToolDir,
}

/// Argument-vector template for one invocation mode.
#[derive(Debug, Clone, Copy)]
pub struct CommandTemplate {
    /// Program followed by its arguments, with `{python}` / `{files}` tokens.
    pub argv: &'static [&'static str],
    pub cwd: WorkDir,
}

/// How to decide whether a family's tooling is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// `{python} -c "import <module>"` exits 0.
    PythonModule(&'static str),
    /// `<tool_dir>/node_modules/<package>/package.json` exists.
    NodePackage(&'static str),
}

/// Which mode a run invokes linters in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Report findings without touching files.
    #[default]
    Check,
    /// Run each family's autofix command.
    Fix,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Check => f.write_str("check"),
            Mode::Fix => f.write_str("fix"),
        }
    }
}

/// One external linting tool.
#[derive(Debug)]
pub struct LinterFamily {
    pub id: FamilyId,
    pub name: &'static str,
    pub description: &'static str,
    /// Lower-case extensions without the leading dot.
    pub extensions: &'static [&'static str],
    pub check: CommandTemplate,
    pub fix: Option<CommandTemplate>,
    pub probe: Probe,
    pub ecosystem: Ecosystem,
    /// Package installed for this family (pip or npm name).
    pub package: &'static str,
    /// Whether the tool accepts several files per invocation.
    pub batch: bool,
    /// Exit codes meaning the tool itself failed (not findings).
    pub fault_codes: &'static [i32],
}

impl LinterFamily {
    /// Template for the given mode, if the family supports it.
    pub fn template(&self, mode: Mode) -> Option<&CommandTemplate> {
        match mode {
            Mode::Check => Some(&self.check),
            Mode::Fix => self.fix.as_ref(),
        }
    }

    /// Whether this family claims the (lower-case, dotless) extension.
    pub fn claims(&self, ext: &str) -> bool {
        self.extensions.contains(&ext)
    }
}

/// Shell exit codes for "not executable" and "command not found".
const SHELL_FAULTS: &[i32] = &[126, 127];

/// eslint exits 2 on configuration errors or crashes.
const ESLINT_FAULTS: &[i32] = &[2, 126, 127];

/// stylelint exits 2 for problems, 1 on fatal errors, 64 on bad usage, 78 on bad config.
const STYLELINT_FAULTS: &[i32] = &[1, 64, 78, 126, 127];

/// The built-in linter families.
pub static REGISTRY: [LinterFamily; 4] = [
    LinterFamily {
        id: FamilyId::Pyflakes,
        name: "pyflakes",
        description: "Python (pyflakes)",
        extensions: &["py"],
        check: CommandTemplate {
            argv: &["{python}", "-m", "pyflakes", "{files}"],
            cwd: WorkDir::ProjectRoot,
        },
        fix: None,
        probe: Probe::PythonModule("pyflakes"),
        ecosystem: Ecosystem::Python,
        package: "pyflakes",
        batch: true,
        fault_codes: SHELL_FAULTS,
    },
    LinterFamily {
        id: FamilyId::Eslint,
        name: "eslint",
        description: "JavaScript/TypeScript (eslint)",
        extensions: &["js", "cjs", "mjs", "jsx", "ts", "tsx"],
        check: CommandTemplate {
            argv: &["npx", "eslint", "{files}", "--config", "eslint.config.cjs"],
            cwd: WorkDir::ToolDir,
        },
        fix: Some(CommandTemplate {
            argv: &[
                "npx",
                "eslint",
                "--fix",
                "{files}",
                "--config",
                "eslint.config.cjs",
            ],
            cwd: WorkDir::ToolDir,
        }),
        probe: Probe::NodePackage("eslint"),
        ecosystem: Ecosystem::Node,
        package: "eslint",
        batch: true,
        fault_codes: ESLINT_FAULTS,
    },
    LinterFamily {
        id: FamilyId::Stylelint,
        name: "stylelint",
        description: "CSS/SCSS/Sass (stylelint)",
        extensions: &["css", "scss", "sass"],
        check: CommandTemplate {
            argv: &[
                "npx",
                "stylelint",
                "{files}",
                "--config",
                "stylelint.config.cjs",
            ],
            cwd: WorkDir::ToolDir,
        },
        fix: Some(CommandTemplate {
            argv: &[
                "npx",
                "stylelint",
                "--fix",
                "{files}",
                "--config",
                "stylelint.config.cjs",
            ],
            cwd: WorkDir::ToolDir,
        }),
        probe: Probe::NodePackage("stylelint"),
        ecosystem: Ecosystem::Node,
        package: "stylelint",
        batch: true,
        fault_codes: STYLELINT_FAULTS,
    },
    LinterFamily {
        id: FamilyId::Htmlhint,
        name: "htmlhint",
        description: "HTML (htmlhint)",
        extensions: &["html", "htm"],
        check: CommandTemplate {
            argv: &["npx", "htmlhint", "{files}", "-c", ".htmlhintrc"],
            cwd: WorkDir::ToolDir,
        },
        fix: None,
        probe: Probe::NodePackage("htmlhint"),
        ecosystem: Ecosystem::Node,
        package: "htmlhint",
        batch: true,
        fault_codes: SHELL_FAULTS,
    },
];

/// Resolve the family claiming an extension (case-insensitive, dot optional).
pub fn family_for_extension(ext: &str) -> Option<FamilyId> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    REGISTRY.iter().find(|f| f.claims(&ext)).map(|f| f.id)
}

/// Resolve the family for a file path by its extension.
pub fn family_for_path(path: &Path) -> Option<FamilyId> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(family_for_extension)
}

/// Families installed through an ecosystem.
pub fn families_in(ecosystem: Ecosystem) -> impl Iterator<Item = FamilyId> {
    REGISTRY
        .iter()
        .filter(move |f| f.ecosystem == ecosystem)
        .map(|f| f.id)
}

#[cfg(test)]
#[path = "family_tests.rs"]
mod tests;
