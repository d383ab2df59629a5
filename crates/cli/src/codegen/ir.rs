// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Block graph handed from the generator to a backend.
//!
//! Every function has the same shape: it receives the current text position
//! and the end-of-text bound, and returns whether the match succeeded. The
//! position is the only mutable state besides byte-sized locals.

use std::fmt;

/// Name of the exported entry function.
pub const ENTRY_SYMBOL: &str = "match";

/// Index of a function in its [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncId(pub u32);

/// Index of a block in its [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// A byte-sized local variable of a [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Local(pub u32);

/// Straight-line operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `local = *text`. Only valid when the position is not at the end.
    Load(Local),
    /// `text += 1`.
    Advance,
}

/// Condition evaluated by a branch or returned directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    /// `text == end`.
    AtEnd,
    /// `local == byte`.
    Eq(Local, u8),
    /// `callee(text, end) != 0`.
    Call(FuncId),
}

/// The single instruction that ends a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    Jump(BlockId),
    Branch {
        cond: Cond,
        then_block: BlockId,
        else_block: BlockId,
    },
    Return(bool),
    ReturnCond(Cond),
}

impl Terminator {
    /// Blocks this terminator can transfer control to.
    pub fn successors(&self) -> impl Iterator<Item = BlockId> {
        let (a, b) = match *self {
            Terminator::Jump(target) => (Some(target), None),
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => (Some(then_block), Some(else_block)),
            Terminator::Return(_) | Terminator::ReturnCond(_) => (None, None),
        };
        a.into_iter().chain(b)
    }

    fn cond(&self) -> Option<Cond> {
        match *self {
            Terminator::Branch { cond, .. } | Terminator::ReturnCond(cond) => Some(cond),
            Terminator::Jump(_) | Terminator::Return(_) => None,
        }
    }
}

/// A basic block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub ops: Vec<Op>,
    /// `None` only while the block is under construction.
    pub terminator: Option<Terminator>,
}

/// A single-entry unit of blocks. Block 0 is the entry block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub(crate) name: String,
    pub(crate) exported: bool,
    pub(crate) blocks: Vec<Block>,
    pub(crate) locals: u32,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the function is visible to [`crate::jit::Artifact::resolve`].
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0 as usize)
    }

    /// Number of locals; valid locals are `Local(0)..Local(n)`.
    pub fn local_count(&self) -> u32 {
        self.locals
    }
}

/// The function table produced by one generation session.
///
/// Functions appear in completion order, so a function only calls functions
/// with a lower index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub(crate) functions: Vec<Function>,
    pub(crate) entry: FuncId,
}

impl Program {
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn function(&self, id: FuncId) -> Option<&Function> {
        self.functions.get(id.0 as usize)
    }

    /// The exported entry function.
    pub fn entry(&self) -> FuncId {
        self.entry
    }

    pub fn find(&self, name: &str) -> Option<FuncId> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(|i| FuncId(i as u32))
    }

    pub fn block_count(&self) -> usize {
        self.functions.iter().map(|f| f.blocks.len()).sum()
    }

    /// Check the structural invariants every backend relies on.
    pub fn verify(&self) -> Result<(), GraphError> {
        if self.function(self.entry).is_none() {
            return Err(GraphError::MissingEntry);
        }
        for (index, function) in self.functions.iter().enumerate() {
            verify_function(index as u32, function)?;
        }
        Ok(())
    }
}

/// A violated block graph invariant.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("program has no entry function")]
    MissingEntry,

    #[error("{function}: function has no blocks")]
    Empty { function: String },

    #[error("{function}: block{block} has no terminator")]
    UnterminatedBlock { function: String, block: u32 },

    #[error("{function}: branch to missing block{block}")]
    MissingBlock { function: String, block: u32 },

    #[error("{function}: the entry block is a branch target")]
    EntryTargeted { function: String },

    #[error("{function}: block{block} is unreachable")]
    UnreachableBlock { function: String, block: u32 },

    #[error("{function}: call to function {callee} which is not generated before it")]
    ForwardCall { function: String, callee: u32 },

    #[error("{function}: use of undeclared tmp{local}")]
    UnknownLocal { function: String, local: u32 },

    #[error("{function}: more than one `return {value}` block")]
    DuplicateReturn { function: String, value: bool },
}

fn verify_function(index: u32, function: &Function) -> Result<(), GraphError> {
    let name = || function.name.clone();
    if function.blocks.is_empty() {
        return Err(GraphError::Empty { function: name() });
    }

    let check_local = |local: Local| {
        if local.0 < function.locals {
            Ok(())
        } else {
            Err(GraphError::UnknownLocal {
                function: name(),
                local: local.0,
            })
        }
    };

    let mut returns = [0usize; 2];
    for (block_index, block) in function.blocks.iter().enumerate() {
        let terminator = block.terminator.ok_or_else(|| GraphError::UnterminatedBlock {
            function: name(),
            block: block_index as u32,
        })?;
        for op in &block.ops {
            if let Op::Load(local) = *op {
                check_local(local)?;
            }
        }
        for target in terminator.successors() {
            if target.0 == 0 {
                return Err(GraphError::EntryTargeted { function: name() });
            }
            if target.0 as usize >= function.blocks.len() {
                return Err(GraphError::MissingBlock {
                    function: name(),
                    block: target.0,
                });
            }
        }
        match terminator.cond() {
            Some(Cond::Call(callee)) if callee.0 >= index => {
                return Err(GraphError::ForwardCall {
                    function: name(),
                    callee: callee.0,
                });
            }
            Some(Cond::Eq(local, _)) => check_local(local)?,
            _ => {}
        }
        if let Terminator::Return(value) = terminator {
            if block.ops.is_empty() {
                returns[value as usize] += 1;
                if returns[value as usize] > 1 {
                    return Err(GraphError::DuplicateReturn {
                        function: name(),
                        value,
                    });
                }
            }
        }
    }

    let mut reached = vec![false; function.blocks.len()];
    let mut pending = vec![0usize];
    reached[0] = true;
    while let Some(current) = pending.pop() {
        let successors = function.blocks[current]
            .terminator
            .iter()
            .flat_map(|t| t.successors());
        for next in successors {
            let next = next.0 as usize;
            if !reached[next] {
                reached[next] = true;
                pending.push(next);
            }
        }
    }
    match reached.iter().position(|r| !r) {
        Some(block) => Err(GraphError::UnreachableBlock {
            function: name(),
            block: block as u32,
        }),
        None => Ok(()),
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Cond::AtEnd => write!(f, "text == end"),
            Cond::Eq(local, byte) => write!(f, "tmp{} == {:?}", local.0, char::from(byte)),
            Cond::Call(callee) => write!(f, "call fn{}(text, end)", callee.0),
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Terminator::Jump(target) => write!(f, "jump block{}", target.0),
            Terminator::Branch {
                cond,
                then_block,
                else_block,
            } => write!(
                f,
                "branch {cond}, block{}, block{}",
                then_block.0, else_block.0
            ),
            Terminator::Return(value) => write!(f, "return {value}"),
            Terminator::ReturnCond(cond) => write!(f, "return {cond}"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, function) in self.functions.iter().enumerate() {
            let linkage = if function.exported { "export " } else { "" };
            writeln!(f, "{linkage}fn{index} {}(text, end) -> bool {{", function.name)?;
            for (block_index, block) in function.blocks.iter().enumerate() {
                writeln!(f, "block{block_index}:")?;
                for op in &block.ops {
                    match op {
                        Op::Load(local) => writeln!(f, "    tmp{} = *text", local.0)?,
                        Op::Advance => writeln!(f, "    text += 1")?,
                    }
                }
                match &block.terminator {
                    Some(terminator) => writeln!(f, "    {terminator}")?,
                    None => writeln!(f, "    <unterminated>")?,
                }
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ir_tests.rs"]
mod tests;
