// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles jgrep.toml parsing with version validation and unknown key
//! warnings, and merges the file with command-line settings.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::cli::{Cli, Mode};
use crate::error::{Error, Result};
use crate::jit::{BackendKind, OptLevel};

/// Supported config file version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Known top-level keys.
const KNOWN_KEYS: &[&str] = &["version", "jit"];

/// Known keys of the `[jit]` table.
const KNOWN_JIT_KEYS: &[&str] = &["mode", "backend", "opt_level"];

/// Config with flexible parsing that captures unknown keys.
#[derive(Deserialize)]
struct FlexibleConfig {
    version: Option<i64>,

    #[serde(default)]
    jit: Option<toml::Value>,

    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Full configuration.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Compilation settings.
    #[serde(default)]
    pub jit: JitConfig,
}

/// The `[jit]` table. Unset fields fall back to the built-in defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JitConfig {
    pub mode: Option<Mode>,
    pub backend: Option<BackendKind>,
    pub opt_level: Option<OptLevel>,
}

/// Load config with warnings for unknown keys.
pub fn load_with_warnings(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("cannot read {}: {e}", path.display()),
        path: Some(path.to_path_buf()),
    })?;

    parse_with_warnings(&content, path)
}

/// Parse config, warning on unknown keys.
pub fn parse_with_warnings(content: &str, path: &Path) -> Result<Config> {
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

    for key in flexible.unknown.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn_unknown_key(path, key);
        }
    }

    let jit = match flexible.jit {
        None => JitConfig::default(),
        Some(toml::Value::Table(table)) => {
            for key in table.keys() {
                if !KNOWN_JIT_KEYS.contains(&key.as_str()) {
                    warn_unknown_key(path, &format!("jit.{}", key));
                }
            }
            toml::Value::Table(table)
                .try_into()
                .map_err(|e: toml::de::Error| config_error(format!("jit: {}", e.message())))?
        }
        Some(_) => return Err(config_error("jit: expected a table".to_string())),
    };

    Ok(Config { version, jit })
}

/// Warn about an unrecognized config key.
fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "jgrep: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

/// Effective settings after merging every source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub mode: Mode,
    pub backend: BackendKind,
    pub opt_level: OptLevel,
}

/// Merge command line (and environment) over the config file over defaults.
pub fn resolve(cli: &Cli, config: &Config) -> Settings {
    Settings {
        mode: cli.mode.or(config.jit.mode).unwrap_or_default(),
        backend: cli.backend.or(config.jit.backend).unwrap_or_default(),
        opt_level: cli.opt_level.or(config.jit.opt_level).unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
