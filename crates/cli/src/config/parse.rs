// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parse helper functions for configuration sections.
//!
//! Each section parser is lenient about shape (wrong types fall back to
//! defaults) and records unknown keys for a warning.

use std::collections::BTreeMap;
use std::path::Path;

use super::duration::parse_duration;
use super::{DispatchConfig, ExcludeConfig, FamilyConfig, InstallConfig};
use crate::error::{Error, Result};
use crate::family::FamilyId;

/// Parse a TOML array of strings into a Vec<String>.
pub(super) fn parse_string_array(value: Option<&toml::Value>) -> Option<Vec<String>> {
    value?.as_array().map(|arr| {
        arr.iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()
    })
}

/// Parse a TOML boolean with a default.
fn parse_bool_or(value: Option<&toml::Value>, default: bool) -> bool {
    value.and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Record keys of `table` not in `known`, prefixed with the section name.
fn collect_unknown(table: &toml::Table, section: &str, known: &[&str], unknown: &mut Vec<String>) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            unknown.push(format!("{section}.{key}"));
        }
    }
}

/// Print a warning about an unrecognized config key.
pub(super) fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "stylecheck: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

const KNOWN_EXCLUDE_KEYS: &[&str] = &["names", "globs", "hidden", "gitignore"];
const KNOWN_DISPATCH_KEYS: &[&str] = &["jobs", "timeout"];
const KNOWN_INSTALL_KEYS: &[&str] = &["enabled"];
const KNOWN_FAMILY_KEYS: &[&str] = &["enabled"];

/// Parse `[exclude]`.
pub(super) fn parse_exclude_config(
    value: Option<&toml::Value>,
    unknown: &mut Vec<String>,
) -> ExcludeConfig {
    let Some(toml::Value::Table(t)) = value else {
        return ExcludeConfig::default();
    };
    collect_unknown(t, "exclude", KNOWN_EXCLUDE_KEYS, unknown);

    let defaults = ExcludeConfig::default();
    ExcludeConfig {
        names: parse_string_array(t.get("names")).unwrap_or_default(),
        globs: parse_string_array(t.get("globs")).unwrap_or_default(),
        hidden: parse_bool_or(t.get("hidden"), defaults.hidden),
        gitignore: parse_bool_or(t.get("gitignore"), defaults.gitignore),
    }
}

/// Parse `[dispatch]`. An unparseable timeout or a zero job count is an error.
pub(super) fn parse_dispatch_config(
    value: Option<&toml::Value>,
    path: &Path,
    unknown: &mut Vec<String>,
) -> Result<DispatchConfig> {
    let Some(toml::Value::Table(t)) = value else {
        return Ok(DispatchConfig::default());
    };
    collect_unknown(t, "dispatch", KNOWN_DISPATCH_KEYS, unknown);

    let config_error = |message: String| Error::Config {
        message,
        path: Some(path.to_path_buf()),
    };

    let jobs = match t.get("jobs").and_then(|v| v.as_integer()) {
        None => None,
        Some(n) if n >= 1 => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        Some(n) => {
            return Err(config_error(format!(
                "dispatch.jobs must be at least 1, got {n}"
            )));
        }
    };

    let timeout = match t.get("timeout").and_then(|v| v.as_str()) {
        None => None,
        Some(s) => Some(
            parse_duration(s).map_err(|e| config_error(format!("dispatch.timeout: {e}")))?,
        ),
    };

    Ok(DispatchConfig { jobs, timeout })
}

/// Parse `[install]`.
pub(super) fn parse_install_config(
    value: Option<&toml::Value>,
    unknown: &mut Vec<String>,
) -> InstallConfig {
    let Some(toml::Value::Table(t)) = value else {
        return InstallConfig::default();
    };
    collect_unknown(t, "install", KNOWN_INSTALL_KEYS, unknown);

    InstallConfig {
        enabled: parse_bool_or(t.get("enabled"), true),
    }
}

/// Parse `[families.<name>]` tables. Unknown family names are reported as unknown keys.
pub(super) fn parse_families_config(
    value: Option<&toml::Value>,
    unknown: &mut Vec<String>,
) -> BTreeMap<FamilyId, FamilyConfig> {
    let mut families = BTreeMap::new();
    let Some(toml::Value::Table(t)) = value else {
        return families;
    };

    for (name, entry) in t {
        let Some(id) = FamilyId::from_name(name) else {
            unknown.push(format!("families.{name}"));
            continue;
        };
        let Some(table) = entry.as_table() else {
            continue;
        };
        collect_unknown(table, &format!("families.{name}"), KNOWN_FAMILY_KEYS, unknown);
        families.insert(
            id,
            FamilyConfig {
                enabled: parse_bool_or(table.get("enabled"), true),
            },
        );
    }
    families
}
