// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compilation service: turns a block graph into a callable matcher.
//!
//! Backends are swappable:
//! - [`cranelift::CraneliftBackend`]: native code through Cranelift
//! - [`graph::GraphBackend`]: executes the block graph directly
//! - [`Unavailable`]: always fails, leaving the baseline matcher in place

pub mod cranelift;
pub mod graph;

use serde::Deserialize;

use crate::codegen::ir::{GraphError, Program};
use crate::pattern::LineMatcher;

/// Something that compiles a [`Program`].
pub trait Backend: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Compile every function of `program`.
    fn compile(&self, program: &Program) -> Result<Box<dyn Artifact>, CompileError>;
}

/// The output of a successful [`Backend::compile`].
pub trait Artifact {
    /// Look up an exported function and turn it into a matcher.
    fn resolve(self: Box<Self>, symbol: &str) -> Result<Box<dyn LineMatcher>, CompileError>;
}

/// Error at the compilation boundary. Never fatal.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("invalid block graph: {0}")]
    InvalidGraph(#[from] GraphError),

    #[error("code generation failed: {0}")]
    Codegen(String),

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),
}

/// Which backend to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Native code via Cranelift
    #[default]
    Cranelift,
    /// Execute the block graph without native code
    Graph,
    /// No backend; always use the baseline matcher
    None,
}

/// Cranelift optimization level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptLevel {
    None,
    #[default]
    Speed,
    SpeedAndSize,
}

impl OptLevel {
    /// Value of Cranelift's `opt_level` setting.
    pub fn as_setting(self) -> &'static str {
        match self {
            OptLevel::None => "none",
            OptLevel::Speed => "speed",
            OptLevel::SpeedAndSize => "speed_and_size",
        }
    }
}

/// Build the backend selected by `kind`.
pub fn backend(kind: BackendKind, opt_level: OptLevel) -> Box<dyn Backend> {
    match kind {
        BackendKind::Cranelift => Box::new(cranelift::CraneliftBackend::new(opt_level)),
        BackendKind::Graph => Box::new(graph::GraphBackend),
        BackendKind::None => Box::new(Unavailable),
    }
}

/// A backend that never compiles.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl Backend for Unavailable {
    fn name(&self) -> &'static str {
        "none"
    }

    fn compile(&self, _program: &Program) -> Result<Box<dyn Artifact>, CompileError> {
        Err(CompileError::Unavailable(
            "no compilation backend configured".to_string(),
        ))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
