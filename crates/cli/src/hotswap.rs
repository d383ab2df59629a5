// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-publish slot for the active matcher.
//!
//! The slot starts out with the baseline matcher. A compiled matcher can be
//! published exactly once; afterwards every lookup returns it. Readers never
//! block: [`ActiveMatcher::current`] is a single acquire load.

use std::io;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::codegen::generate;
use crate::codegen::ir::ENTRY_SYMBOL;
use crate::jit::{Backend, CompileError};
use crate::pattern::{LineMatcher, Pattern};

/// Name of the background compilation thread.
pub const COMPILER_THREAD: &str = "jgrep-jit";

/// The matcher used for each line, upgraded in place once compilation
/// finishes.
pub struct ActiveMatcher {
    baseline: Pattern,
    compiled: OnceLock<Box<dyn LineMatcher>>,
}

/// What a single lookup observed.
#[derive(Clone, Copy)]
pub enum Active<'a> {
    Baseline(&'a Pattern),
    Compiled(&'a dyn LineMatcher),
}

impl Active<'_> {
    pub fn is_match(self, line: &[u8]) -> bool {
        match self {
            Active::Baseline(pattern) => pattern.is_match(line),
            Active::Compiled(matcher) => matcher.is_match(line),
        }
    }

    pub fn is_compiled(self) -> bool {
        matches!(self, Active::Compiled(_))
    }
}

impl ActiveMatcher {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            baseline: pattern,
            compiled: OnceLock::new(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.baseline
    }

    /// Load the matcher to use for the next line.
    pub fn current(&self) -> Active<'_> {
        match self.compiled.get() {
            Some(matcher) => Active::Compiled(matcher.as_ref()),
            None => Active::Baseline(&self.baseline),
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Make `matcher` the active matcher.
    ///
    /// Returns the matcher back if one was already published.
    pub fn publish(&self, matcher: Box<dyn LineMatcher>) -> Result<(), Box<dyn LineMatcher>> {
        self.compiled.set(matcher)
    }
}

/// Generate, compile and resolve the pattern, then publish the result.
///
/// On any error the slot is left untouched.
pub fn compile_and_publish(
    active: &ActiveMatcher,
    backend: &dyn Backend,
) -> Result<(), CompileError> {
    let start = Instant::now();
    let program = generate(active.pattern());
    let artifact = backend.compile(&program)?;
    let matcher = artifact.resolve(ENTRY_SYMBOL)?;
    let elapsed = start.elapsed();

    if active.publish(matcher).is_err() {
        tracing::debug!(backend = backend.name(), "compiled matcher already published");
        return Ok(());
    }
    tracing::info!(
        backend = backend.name(),
        elapsed_us = elapsed.as_micros() as u64,
        "published compiled matcher"
    );
    Ok(())
}

/// Compile on a detached background thread.
///
/// Compilation failures are logged and leave the baseline in place. Only a
/// failure to start the thread is returned.
pub fn spawn_compiler(
    active: Arc<ActiveMatcher>,
    backend: Box<dyn Backend>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(COMPILER_THREAD.to_string())
        .spawn(move || {
            if let Err(e) = compile_and_publish(&active, backend.as_ref()) {
                tracing::warn!(backend = backend.name(), "compilation failed: {e}");
            }
        })
}

#[cfg(test)]
#[path = "hotswap_tests.rs"]
mod tests;
