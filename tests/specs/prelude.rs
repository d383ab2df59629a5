//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running jgrep against a temporary input file.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::PredicateBooleanExt;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Returns a Command configured to run the jgrep binary with a clean
/// environment.
pub fn jgrep_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jgrep"));
    for name in [
        "JGREP_LOG",
        "JGREP_MODE",
        "JGREP_BACKEND",
        "JGREP_OPT_LEVEL",
        "JGREP_CONFIG",
    ] {
        cmd.env_remove(name);
    }
    cmd
}

/// A temporary directory holding the input file (and optionally a config).
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `name` and return its path.
    pub fn file(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Run `jgrep <args..> <pattern> <input>` on an input file holding `input`.
pub fn grep(pattern: &str, input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let ws = Workspace::new();
    let path = ws.file("input.txt", input);
    jgrep_cmd().args(args).arg(pattern).arg(&path).assert()
}
