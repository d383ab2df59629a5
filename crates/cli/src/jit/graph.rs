// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interpreter-only backend.
//!
//! Runs the block graph as data. Useful on hosts Cranelift does not support
//! and for checking the generator independently of native code.

use super::{Artifact, Backend, CompileError};
use crate::codegen::ir::{BlockId, Cond, FuncId, Op, Program, Terminator};
use crate::pattern::LineMatcher;

#[derive(Debug, Default, Clone, Copy)]
pub struct GraphBackend;

impl Backend for GraphBackend {
    fn name(&self) -> &'static str {
        "graph"
    }

    fn compile(&self, program: &Program) -> Result<Box<dyn Artifact>, CompileError> {
        program.verify()?;
        Ok(Box::new(GraphArtifact {
            program: program.clone(),
        }))
    }
}

struct GraphArtifact {
    program: Program,
}

impl Artifact for GraphArtifact {
    fn resolve(self: Box<Self>, symbol: &str) -> Result<Box<dyn LineMatcher>, CompileError> {
        let entry = self
            .program
            .find(symbol)
            .filter(|id| {
                self.program
                    .function(*id)
                    .is_some_and(|function| function.is_exported())
            })
            .ok_or_else(|| CompileError::SymbolNotFound(symbol.to_string()))?;
        Ok(Box::new(GraphMatcher {
            program: self.program,
            entry,
        }))
    }
}

/// A verified program plus the function to start from.
pub struct GraphMatcher {
    program: Program,
    entry: FuncId,
}

impl LineMatcher for GraphMatcher {
    fn is_match(&self, line: &[u8]) -> bool {
        run(&self.program, self.entry, line, 0)
    }
}

/// Execute function `id` with the position at `pos`.
fn run(program: &Program, id: FuncId, text: &[u8], mut pos: usize) -> bool {
    let Some(function) = program.function(id) else {
        return false;
    };
    let mut locals = vec![0u8; function.local_count() as usize];
    let mut current = BlockId(0);

    let eval = |cond: Cond, pos: usize, locals: &[u8]| match cond {
        Cond::AtEnd => pos == text.len(),
        Cond::Eq(local, byte) => locals[local.0 as usize] == byte,
        Cond::Call(callee) => run(program, callee, text, pos),
    };

    loop {
        let Some(block) = function.block(current) else {
            return false;
        };
        for op in &block.ops {
            match *op {
                Op::Load(local) => {
                    locals[local.0 as usize] = text.get(pos).copied().unwrap_or_default();
                }
                Op::Advance => pos += 1,
            }
        }
        match block.terminator {
            Some(Terminator::Jump(target)) => current = target,
            Some(Terminator::Branch {
                cond,
                then_block,
                else_block,
            }) => {
                current = if eval(cond, pos, &locals) {
                    then_block
                } else {
                    else_block
                };
            }
            Some(Terminator::Return(value)) => return value,
            Some(Terminator::ReturnCond(cond)) => return eval(cond, pos, &locals),
            None => return false,
        }
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
