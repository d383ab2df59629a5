// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::jit::{BackendKind, OptLevel};

/// Print lines of FILE matching PATTERN, compiling the pattern to native
/// code while scanning.
///
/// PATTERN supports literal bytes, `.` (any byte), `*` (zero or more of the
/// preceding atom), `^` (start of line) and `$` (end of line).
#[derive(Parser)]
#[command(name = "jgrep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Pattern to search for
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// File to search
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// When to compile the pattern [default: concurrent]
    #[arg(long, value_enum, env = "JGREP_MODE")]
    pub mode: Option<Mode>,

    /// Compilation backend [default: cranelift]
    #[arg(long, value_enum, env = "JGREP_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Code generator optimization level [default: speed]
    #[arg(long, value_enum, env = "JGREP_OPT_LEVEL")]
    pub opt_level: Option<OptLevel>,

    /// Use specific config file
    #[arg(short = 'C', long = "config", env = "JGREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the generated block graph to stderr before scanning
    #[arg(long)]
    pub dump_ir: bool,
}

/// When compilation happens relative to scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Scan immediately and switch to compiled code once ready
    #[default]
    Concurrent,
    /// Compile before scanning
    Jit,
    /// Never compile
    Interp,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
