//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::Receiver;

use proptest::prelude::*;
use tempfile::TempDir;

use crate::codegen::ir::Program;
use crate::jit::{Artifact, Backend, CompileError};

/// Creates a temp directory holding `input.txt` with `content`.
pub fn temp_input(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.txt");
    fs::write(&path, content).unwrap();
    (dir, path)
}

/// Patterns over a small alphabet that exercises every dialect rule.
pub fn dialect_pattern() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop::sample::select(vec![b'a', b'b', b'.', b'*', b'$', b'^']),
        0..8,
    )
}

/// Texts over an alphabet overlapping the pattern alphabet.
pub fn dialect_text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop::sample::select(vec![b'a', b'b', b'*', b'$', b'^', 0]),
        0..12,
    )
}

/// Wraps a backend and holds `compile` until the paired sender fires or is
/// dropped.
pub struct GatedBackend<B> {
    inner: B,
    gate: Mutex<Receiver<()>>,
}

impl<B> GatedBackend<B> {
    pub fn new(inner: B, gate: Receiver<()>) -> Self {
        Self {
            inner,
            gate: Mutex::new(gate),
        }
    }
}

impl<B: Backend> Backend for GatedBackend<B> {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn compile(&self, program: &Program) -> Result<Box<dyn Artifact>, CompileError> {
        let _ = self.gate.lock().unwrap().recv();
        self.inner.compile(program)
    }
}
