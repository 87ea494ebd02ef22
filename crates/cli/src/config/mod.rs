// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles stylecheck.toml parsing with version validation and unknown key warnings.

pub mod duration;
mod parse;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::family::FamilyId;
use parse::{
    parse_dispatch_config, parse_exclude_config, parse_families_config, parse_install_config,
    warn_unknown_key,
};

/// Supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Config file name looked up in the tool directory and project tree.
pub const CONFIG_FILE_NAME: &str = "stylecheck.toml";

/// Known top-level keys in the config.
const KNOWN_KEYS: &[&str] = &["version", "exclude", "dispatch", "install", "families"];

/// Config with flexible parsing that captures unknown keys.
#[derive(Deserialize)]
struct FlexibleConfig {
    version: Option<i64>,

    #[serde(default)]
    exclude: Option<toml::Value>,

    #[serde(default)]
    dispatch: Option<toml::Value>,

    #[serde(default)]
    install: Option<toml::Value>,

    #[serde(default)]
    families: Option<toml::Value>,

    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Full configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Extra exclusion rules.
    pub exclude: ExcludeConfig,

    /// Linter dispatch settings.
    pub dispatch: DispatchConfig,

    /// Dependency installation settings.
    pub install: InstallConfig,

    /// Per-family overrides.
    pub families: BTreeMap<FamilyId, FamilyConfig>,

    /// Unrecognized keys (dotted paths), reported as warnings.
    pub unknown_keys: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            exclude: ExcludeConfig::default(),
            dispatch: DispatchConfig::default(),
            install: InstallConfig::default(),
            families: BTreeMap::new(),
            unknown_keys: Vec::new(),
        }
    }
}

impl Config {
    /// Whether a family is enabled (default: yes).
    pub fn family_enabled(&self, id: FamilyId) -> bool {
        self.families.get(&id).is_none_or(|f| f.enabled)
    }
}

/// `[exclude]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeConfig {
    /// Names added to the default excluded names.
    pub names: Vec<String>,
    /// Globs matched against the relative path.
    pub globs: Vec<String>,
    /// Skip entries whose name starts with a dot.
    pub hidden: bool,
    /// Also honour .gitignore files.
    pub gitignore: bool,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            globs: Vec::new(),
            hidden: true,
            gitignore: false,
        }
    }
}

/// `[dispatch]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Families run concurrently (None = min(8, cores)).
    pub jobs: Option<usize>,
    /// Per-invocation timeout (None = unlimited).
    pub timeout: Option<Duration>,
}

/// `[install]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub enabled: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// `[families.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyConfig {
    pub enabled: bool,
}

/// Load config, printing a warning for each unknown key.
pub fn load_with_warnings(path: &Path) -> Result<Config> {
    let config = load(path)?;
    for key in &config.unknown_keys {
        warn_unknown_key(path, key);
    }
    Ok(config)
}

/// Load and validate config from a file path.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(&content, path)
}

/// Parse config from string content. Unknown keys are collected, not rejected.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let config_error = |message: String| Error::Config {
        message,
        path: Some(path.to_path_buf()),
    };

    let flexible: FlexibleConfig =
        toml::from_str(content).map_err(|e| config_error(e.to_string()))?;

    let version = flexible
        .version
        .ok_or_else(|| config_error("missing required field: version".to_string()))?;

    if version != SUPPORTED_VERSION {
        return Err(config_error(format!(
            "unsupported config version {} (supported: {})",
            version, SUPPORTED_VERSION
        )));
    }

    let mut unknown_keys: Vec<String> = flexible
        .unknown
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .cloned()
        .collect();

    let exclude = parse_exclude_config(flexible.exclude.as_ref(), &mut unknown_keys);
    let dispatch = parse_dispatch_config(flexible.dispatch.as_ref(), path, &mut unknown_keys)?;
    let install = parse_install_config(flexible.install.as_ref(), &mut unknown_keys);
    let families = parse_families_config(flexible.families.as_ref(), &mut unknown_keys);

    Ok(Config {
        version,
        exclude,
        dispatch,
        install,
        families,
        unknown_keys,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
