// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Grep command implementation.

use std::io::{self, Write};
use std::sync::Arc;

use jgrep::cli::{Cli, Mode};
use jgrep::codegen::generate;
use jgrep::config::{self, Config, Settings};
use jgrep::error::{Error, ExitCode};
use jgrep::hotswap::{ActiveMatcher, compile_and_publish, spawn_compiler};
use jgrep::jit;
use jgrep::pattern::Pattern;
use jgrep::reader::FileReader;
use jgrep::scan::{ScanError, scan};

/// Run the grep command.
pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => config::load_with_warnings(path)?,
        None => Config::default(),
    };
    let settings = config::resolve(cli, &config);
    tracing::debug!(?settings, "resolved settings");

    let pattern = Pattern::new(cli.pattern.as_bytes());
    if cli.dump_ir {
        dump_ir(&pattern)?;
    }

    let input = FileReader::new().open(&cli.file)?;
    let active = Arc::new(ActiveMatcher::new(pattern));
    start_compilation(&active, settings);

    let stdout = io::stdout().lock();
    match scan(&active, input, io::BufWriter::new(stdout)) {
        Ok(_) => Ok(ExitCode::Success),
        Err(ScanError::Write(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("output closed");
            Ok(ExitCode::Success)
        }
        Err(ScanError::Write(e)) => Err(Error::Output(e).into()),
        Err(ScanError::Read(source)) => Err(Error::Io {
            path: cli.file.clone(),
            source,
        }
        .into()),
    }
}

/// Compile according to `settings.mode`. Never fails; on any problem the
/// baseline matcher stays active.
fn start_compilation(active: &Arc<ActiveMatcher>, settings: Settings) {
    let backend = jit::backend(settings.backend, settings.opt_level);
    match settings.mode {
        Mode::Interp => {}
        Mode::Jit => {
            if let Err(e) = compile_and_publish(active, backend.as_ref()) {
                tracing::warn!(backend = backend.name(), "compilation failed: {e}");
            }
        }
        Mode::Concurrent => {
            if let Err(e) = spawn_compiler(Arc::clone(active), backend) {
                tracing::warn!("cannot start compiler thread: {e}");
                eprintln!("jgrep: warning: cannot start compiler thread: {e}");
            }
        }
    }
}

/// Print the block graph for `pattern` to stderr.
fn dump_ir(pattern: &Pattern) -> anyhow::Result<()> {
    let program = generate(pattern);
    let mut stderr = io::stderr().lock();
    write!(stderr, "{program}")?;
    stderr.flush()?;
    Ok(())
}
