// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line-processing loop.

use std::io::{self, BufRead, Write};

use crate::hotswap::ActiveMatcher;

/// Counters for one scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Lines read.
    pub lines: u64,
    /// Lines written to the output.
    pub matched: u64,
    /// Lines evaluated by the compiled matcher instead of the baseline.
    pub compiled: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Write every line of `input` the active matcher accepts to `output`.
///
/// Lines are split on `\n`. The terminator is not part of the text handed to
/// the matcher but is written back out unchanged. A final line without a
/// terminator is still matched.
pub fn scan<R: BufRead, W: Write>(
    active: &ActiveMatcher,
    mut input: R,
    mut output: W,
) -> Result<ScanStats, ScanError> {
    let mut stats = ScanStats::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).map_err(ScanError::Read)? == 0 {
            break;
        }
        stats.lines += 1;

        let content = line.strip_suffix(b"\n").unwrap_or(&line);
        let matcher = active.current();
        if matcher.is_compiled() {
            stats.compiled += 1;
        }
        if matcher.is_match(content) {
            stats.matched += 1;
            output.write_all(&line).map_err(ScanError::Write)?;
        }
    }

    output.flush().map_err(ScanError::Write)?;
    tracing::debug!(
        lines = stats.lines,
        matched = stats.matched,
        compiled = stats.compiled,
        "scan complete"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
