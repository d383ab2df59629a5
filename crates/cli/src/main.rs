// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! jgrep CLI entry point.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use jgrep::cli::Cli;
use jgrep::env::{self, DEFAULT_LOG_FILTER};
use jgrep::error::ExitCode;

mod cmd_grep;

fn init_logging() {
    let filter = env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("jgrep: {}", e);
            match e.downcast_ref::<jgrep::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    cmd_grep::run(&cli)
}
