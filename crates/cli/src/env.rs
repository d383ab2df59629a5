// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variables read by jgrep.

/// Variable names.
pub mod names {
    /// `tracing` filter directive; logging is off when unset.
    pub const JGREP_LOG: &str = "JGREP_LOG";
    /// Default for `--mode`.
    pub const JGREP_MODE: &str = "JGREP_MODE";
    /// Default for `--backend`.
    pub const JGREP_BACKEND: &str = "JGREP_BACKEND";
    /// Default for `--opt-level`.
    pub const JGREP_OPT_LEVEL: &str = "JGREP_OPT_LEVEL";
    /// Default for `--config`.
    pub const JGREP_CONFIG: &str = "JGREP_CONFIG";
}

/// Filter directive used when `JGREP_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "off";

/// The `JGREP_LOG` directive, if set and non-empty.
pub fn log_filter() -> Option<String> {
    std::env::var(names::JGREP_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
