// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Native backend using Cranelift.
//!
//! Every block graph function becomes a native function with the signature
//! `fn(text: *const u8, end: *const u8) -> u8`. The text position lives in a
//! frontend variable so that loops get their SSA form from
//! `cranelift-frontend`.

use std::collections::HashMap;

use cranelift_codegen::Context;
use cranelift_codegen::ir::condcodes::IntCC;
use cranelift_codegen::ir::{self as clif, AbiParam, InstBuilder, MemFlags, UserFuncName, types};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext, Variable};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{Linkage, Module};

use super::{Artifact, Backend, CompileError, OptLevel};
use crate::codegen::ir::{Cond, FuncId, Function, Op, Program, Terminator};
use crate::pattern::LineMatcher;

/// Calling convention of every generated function.
pub type NativeMatchFn = unsafe extern "C" fn(*const u8, *const u8) -> u8;

/// Compiles block graphs to host machine code.
#[derive(Debug, Clone, Copy)]
pub struct CraneliftBackend {
    opt_level: OptLevel,
}

impl CraneliftBackend {
    pub fn new(opt_level: OptLevel) -> Self {
        Self { opt_level }
    }

    fn module(&self) -> Result<JITModule, CompileError> {
        let mut flag_builder = settings::builder();
        flag_builder
            .set("use_colocated_libcalls", "false")
            .map_err(|e| CompileError::Unavailable(format!("failed to set flag: {e}")))?;
        flag_builder
            .set("is_pic", "false")
            .map_err(|e| CompileError::Unavailable(format!("failed to set flag: {e}")))?;
        flag_builder
            .set("opt_level", self.opt_level.as_setting())
            .map_err(|e| CompileError::Unavailable(format!("failed to set flag: {e}")))?;

        let isa_builder = cranelift_native::builder()
            .map_err(|e| CompileError::Unavailable(format!("host not supported: {e}")))?;
        let isa = isa_builder
            .finish(settings::Flags::new(flag_builder))
            .map_err(|e| CompileError::Unavailable(format!("failed to create ISA: {e}")))?;

        let builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
        Ok(JITModule::new(builder))
    }
}

impl Default for CraneliftBackend {
    fn default() -> Self {
        Self::new(OptLevel::default())
    }
}

impl Backend for CraneliftBackend {
    fn name(&self) -> &'static str {
        "cranelift"
    }

    fn compile(&self, program: &Program) -> Result<Box<dyn Artifact>, CompileError> {
        program.verify()?;
        let mut module = self.module()?;

        let pointer_type = module.target_config().pointer_type();
        let mut sig = module.make_signature();
        sig.params.push(AbiParam::new(pointer_type)); // text
        sig.params.push(AbiParam::new(pointer_type)); // end
        sig.returns.push(AbiParam::new(types::I8));

        let mut ids = Vec::with_capacity(program.functions().len());
        let mut symbols = HashMap::new();
        for function in program.functions() {
            let linkage = if function.is_exported() {
                Linkage::Export
            } else {
                Linkage::Local
            };
            let id = module
                .declare_function(function.name(), linkage, &sig)
                .map_err(codegen_error)?;
            if function.is_exported() {
                symbols.insert(function.name().to_string(), id);
            }
            ids.push(id);
        }

        let mut ctx = module.make_context();
        let mut builder_context = FunctionBuilderContext::new();
        for (function, &id) in program.functions().iter().zip(&ids) {
            ctx.func.signature = sig.clone();
            ctx.func.name = UserFuncName::user(0, id.as_u32());
            lower(
                &mut module,
                &ids,
                function,
                &mut ctx,
                &mut builder_context,
                pointer_type,
            );
            module
                .define_function(id, &mut ctx)
                .map_err(codegen_error)?;
            module.clear_context(&mut ctx);
        }
        module.finalize_definitions().map_err(codegen_error)?;

        Ok(Box::new(CraneliftArtifact { module, symbols }))
    }
}

fn codegen_error(e: impl std::fmt::Display) -> CompileError {
    CompileError::Codegen(e.to_string())
}

/// Translate one block graph function into `ctx.func`.
fn lower(
    module: &mut JITModule,
    ids: &[cranelift_module::FuncId],
    function: &Function,
    ctx: &mut Context,
    builder_context: &mut FunctionBuilderContext,
    pointer_type: clif::Type,
) {
    let mut builder = FunctionBuilder::new(&mut ctx.func, builder_context);
    let blocks: Vec<clif::Block> = function
        .blocks()
        .iter()
        .map(|_| builder.create_block())
        .collect();

    let entry = blocks[0];
    builder.append_block_params_for_function_params(entry);
    builder.switch_to_block(entry);
    let text = builder.declare_var(pointer_type);
    let params = builder.block_params(entry).to_vec();
    builder.def_var(text, params[0]);
    let end = params[1];
    let locals: Vec<Variable> = (0..function.local_count())
        .map(|_| builder.declare_var(types::I8))
        .collect();

    let mut lowering = Lowering {
        module,
        ids,
        callees: HashMap::new(),
        text,
        end,
        locals,
    };

    for (index, block) in function.blocks().iter().enumerate() {
        if index > 0 {
            builder.switch_to_block(blocks[index]);
        }
        for op in &block.ops {
            match *op {
                Op::Load(local) => {
                    let pos = builder.use_var(text);
                    let byte = builder.ins().load(types::I8, MemFlags::trusted(), pos, 0);
                    builder.def_var(lowering.locals[local.0 as usize], byte);
                }
                Op::Advance => {
                    let pos = builder.use_var(text);
                    let next = builder.ins().iadd_imm(pos, 1);
                    builder.def_var(text, next);
                }
            }
        }
        match block.terminator {
            Some(Terminator::Jump(target)) => {
                builder.ins().jump(blocks[target.0 as usize], &[]);
            }
            Some(Terminator::Branch {
                cond,
                then_block,
                else_block,
            }) => {
                let value = lowering.cond(&mut builder, cond);
                builder.ins().brif(
                    value,
                    blocks[then_block.0 as usize],
                    &[],
                    blocks[else_block.0 as usize],
                    &[],
                );
            }
            Some(Terminator::Return(value)) => {
                let value = builder.ins().iconst(types::I8, i64::from(value));
                builder.ins().return_(&[value]);
            }
            Some(Terminator::ReturnCond(cond)) => {
                let value = lowering.cond(&mut builder, cond);
                builder.ins().return_(&[value]);
            }
            // Rejected by `Program::verify`.
            None => {
                let value = builder.ins().iconst(types::I8, 0);
                builder.ins().return_(&[value]);
            }
        }
    }

    builder.seal_all_blocks();
    builder.finalize();
}

/// Per-function state needed to lower conditions.
struct Lowering<'a> {
    module: &'a mut JITModule,
    ids: &'a [cranelift_module::FuncId],
    callees: HashMap<FuncId, clif::FuncRef>,
    text: Variable,
    end: clif::Value,
    locals: Vec<Variable>,
}

impl Lowering<'_> {
    /// Emit `cond` as an `i8` that is 1 when it holds.
    fn cond(&mut self, builder: &mut FunctionBuilder<'_>, cond: Cond) -> clif::Value {
        match cond {
            Cond::AtEnd => {
                let pos = builder.use_var(self.text);
                builder.ins().icmp(IntCC::Equal, pos, self.end)
            }
            Cond::Eq(local, byte) => {
                let value = builder.use_var(self.locals[local.0 as usize]);
                let expected = builder.ins().iconst(types::I8, i64::from(byte));
                builder.ins().icmp(IntCC::Equal, value, expected)
            }
            Cond::Call(callee) => {
                let func_ref = match self.callees.get(&callee) {
                    Some(func_ref) => *func_ref,
                    None => {
                        let func_ref = self
                            .module
                            .declare_func_in_func(self.ids[callee.0 as usize], builder.func);
                        self.callees.insert(callee, func_ref);
                        func_ref
                    }
                };
                let pos = builder.use_var(self.text);
                let call = builder.ins().call(func_ref, &[pos, self.end]);
                let result = builder.inst_results(call)[0];
                builder.ins().icmp_imm(IntCC::NotEqual, result, 0)
            }
        }
    }
}

/// A finalized module and its exported symbols.
struct CraneliftArtifact {
    module: JITModule,
    symbols: HashMap<String, cranelift_module::FuncId>,
}

impl Artifact for CraneliftArtifact {
    #[allow(unsafe_code)]
    fn resolve(self: Box<Self>, symbol: &str) -> Result<Box<dyn LineMatcher>, CompileError> {
        let artifact = *self;
        let id = artifact
            .symbols
            .get(symbol)
            .copied()
            .ok_or_else(|| CompileError::SymbolNotFound(symbol.to_string()))?;
        let code = artifact.module.get_finalized_function(id);
        // SAFETY: `code` points at a finalized function declared with the
        // `NativeMatchFn` signature.
        let func = unsafe { std::mem::transmute::<*const u8, NativeMatchFn>(code) };
        // The code memory is owned by the module. Published matchers are never
        // retracted, so it has to live until the process exits.
        std::mem::forget(artifact.module);
        Ok(Box::new(NativeMatcher { func }))
    }
}

/// A resolved native entry point.
#[derive(Debug, Clone, Copy)]
pub struct NativeMatcher {
    func: NativeMatchFn,
}

impl LineMatcher for NativeMatcher {
    #[allow(unsafe_code)]
    fn is_match(&self, line: &[u8]) -> bool {
        let range = line.as_ptr_range();
        // SAFETY: generated code reads only in `[range.start, range.end)` and
        // its memory is never freed.
        unsafe { (self.func)(range.start, range.end) != 0 }
    }
}

#[cfg(test)]
#[path = "cranelift_tests.rs"]
mod tests;
