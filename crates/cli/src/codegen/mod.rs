// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lowers a pattern to a block graph.
//!
//! The shape follows the baseline matcher step for step. Each recursive call
//! of `match_here` on the rest of the pattern becomes a jump to a fresh block
//! in the same function. Each `*` becomes a loop around a call to an
//! auxiliary function that matches the remainder of the pattern.

pub mod ir;

use crate::pattern::{Atom, Pattern, Step};
use ir::{Block, BlockId, Cond, ENTRY_SYMBOL, FuncId, Function, Local, Op, Program, Terminator};

/// Generate the block graph for `pattern`.
///
/// Generation is deterministic: the same pattern always yields an identical
/// [`Program`].
pub fn generate(pattern: &Pattern) -> Program {
    let mut builder = ProgramBuilder::default();
    let matchhere = builder.matchhere(pattern.body());
    let entry = builder.entry(matchhere, pattern.is_anchored());
    let program = builder.finish(entry);
    tracing::debug!(
        functions = program.functions().len(),
        blocks = program.block_count(),
        anchored = pattern.is_anchored(),
        "generated block graph"
    );
    program
}

/// Owns the function table and the name counter of one generation session.
#[derive(Default)]
struct ProgramBuilder {
    functions: Vec<Function>,
    next_name: u32,
}

impl ProgramBuilder {
    fn fresh_name(&mut self) -> String {
        let name = format!("matchhere_{}", self.next_name);
        self.next_name += 1;
        name
    }

    fn push(&mut self, function: Function) -> FuncId {
        self.functions.push(function);
        FuncId(self.functions.len() as u32 - 1)
    }

    /// Generate a function matching `suffix` at the current position.
    fn matchhere(&mut self, mut suffix: &[u8]) -> FuncId {
        let mut f = FunctionBuilder::new(self.fresh_name(), false);
        loop {
            match Step::next(suffix) {
                Step::Accept => {
                    let accept = f.return_true();
                    f.terminate(Terminator::Jump(accept));
                    break;
                }
                Step::Star { atom, rest } => {
                    let remainder = self.matchhere(rest);
                    self.star_loop(&mut f, atom, remainder);
                    break;
                }
                Step::EndAnchor => {
                    f.terminate(Terminator::ReturnCond(Cond::AtEnd));
                    break;
                }
                Step::One { atom, rest } => {
                    let next = f.create_block();
                    f.guard_atom(atom, next);
                    f.switch_to(next);
                    f.push(Op::Advance);
                    suffix = rest;
                }
            }
        }
        self.push(f.finish())
    }

    /// Close `f` with the loop for `atom*` followed by `remainder`.
    fn star_loop(&mut self, f: &mut FunctionBuilder, atom: Atom, remainder: FuncId) {
        let body = f.create_block();
        let check = f.create_block();
        f.terminate(Terminator::Jump(body));

        f.switch_to(body);
        let accept = f.return_true();
        f.terminate(Terminator::Branch {
            cond: Cond::Call(remainder),
            then_block: accept,
            else_block: check,
        });

        f.switch_to(check);
        let reject = f.return_false();
        let step = f.create_block();
        f.terminate(Terminator::Branch {
            cond: Cond::AtEnd,
            then_block: reject,
            else_block: step,
        });

        f.switch_to(step);
        match atom {
            Atom::Any => {
                f.push(Op::Advance);
                f.terminate(Terminator::Jump(body));
            }
            Atom::Byte(c) => {
                let tmp = f.new_local();
                f.push(Op::Load(tmp));
                f.push(Op::Advance);
                f.terminate(Terminator::Branch {
                    cond: Cond::Eq(tmp, c),
                    then_block: body,
                    else_block: reject,
                });
            }
        }
    }

    /// Generate the exported `match` function around `matchhere`.
    fn entry(&mut self, matchhere: FuncId, anchored: bool) -> FuncId {
        let mut f = FunctionBuilder::new(ENTRY_SYMBOL.to_string(), true);
        if anchored {
            f.terminate(Terminator::ReturnCond(Cond::Call(matchhere)));
            return self.push(f.finish());
        }

        let body = f.create_block();
        let check = f.create_block();
        let step = f.create_block();
        f.terminate(Terminator::Jump(body));

        f.switch_to(body);
        let accept = f.return_true();
        f.terminate(Terminator::Branch {
            cond: Cond::Call(matchhere),
            then_block: accept,
            else_block: check,
        });

        f.switch_to(check);
        let reject = f.return_false();
        f.terminate(Terminator::Branch {
            cond: Cond::AtEnd,
            then_block: reject,
            else_block: step,
        });

        f.switch_to(step);
        f.push(Op::Advance);
        f.terminate(Terminator::Jump(body));
        self.push(f.finish())
    }

    fn finish(self, entry: FuncId) -> Program {
        Program {
            functions: self.functions,
            entry,
        }
    }
}

/// Cursor over the blocks of the function being generated.
struct FunctionBuilder {
    name: String,
    exported: bool,
    blocks: Vec<Block>,
    locals: u32,
    current: BlockId,
    return_true: Option<BlockId>,
    return_false: Option<BlockId>,
}

impl FunctionBuilder {
    fn new(name: String, exported: bool) -> Self {
        Self {
            name,
            exported,
            blocks: vec![Block::default()],
            locals: 0,
            current: BlockId(0),
            return_true: None,
            return_false: None,
        }
    }

    fn create_block(&mut self) -> BlockId {
        self.blocks.push(Block::default());
        BlockId(self.blocks.len() as u32 - 1)
    }

    fn switch_to(&mut self, block: BlockId) {
        self.current = block;
    }

    fn new_local(&mut self) -> Local {
        self.locals += 1;
        Local(self.locals - 1)
    }

    fn current_block(&mut self) -> &mut Block {
        &mut self.blocks[self.current.0 as usize]
    }

    fn push(&mut self, op: Op) {
        self.current_block().ops.push(op);
    }

    fn terminate(&mut self, terminator: Terminator) {
        let block = self.current_block();
        debug_assert!(block.terminator.is_none(), "block terminated twice");
        block.terminator = Some(terminator);
    }

    /// The shared `return true` block, created on first use.
    fn return_true(&mut self) -> BlockId {
        self.shared_return(true)
    }

    /// The shared `return false` block, created on first use.
    fn return_false(&mut self) -> BlockId {
        self.shared_return(false)
    }

    fn shared_return(&mut self, value: bool) -> BlockId {
        let slot = if value {
            self.return_true
        } else {
            self.return_false
        };
        if let Some(block) = slot {
            return block;
        }
        let block = self.create_block();
        self.blocks[block.0 as usize].terminator = Some(Terminator::Return(value));
        if value {
            self.return_true = Some(block);
        } else {
            self.return_false = Some(block);
        }
        block
    }

    /// End the current block with a test of one `atom`: fail at end of text
    /// or on a mismatch, otherwise continue at `next` (without advancing).
    fn guard_atom(&mut self, atom: Atom, next: BlockId) {
        let reject = self.return_false();
        match atom {
            Atom::Any => self.terminate(Terminator::Branch {
                cond: Cond::AtEnd,
                then_block: reject,
                else_block: next,
            }),
            Atom::Byte(c) => {
                let test = self.create_block();
                self.terminate(Terminator::Branch {
                    cond: Cond::AtEnd,
                    then_block: reject,
                    else_block: test,
                });
                self.switch_to(test);
                let tmp = self.new_local();
                self.push(Op::Load(tmp));
                self.terminate(Terminator::Branch {
                    cond: Cond::Eq(tmp, c),
                    then_block: next,
                    else_block: reject,
                });
            }
        }
    }

    fn finish(self) -> Function {
        Function {
            name: self.name,
            exported: self.exported,
            blocks: self.blocks,
            locals: self.locals,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
