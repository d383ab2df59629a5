// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

fn block(ops: Vec<Op>, terminator: Terminator) -> Block {
    Block {
        ops,
        terminator: Some(terminator),
    }
}

fn function(name: &str, blocks: Vec<Block>, locals: u32) -> Function {
    Function {
        name: name.to_string(),
        exported: false,
        blocks,
        locals,
    }
}

fn program(functions: Vec<Function>) -> Program {
    let entry = FuncId(functions.len().saturating_sub(1) as u32);
    Program { functions, entry }
}

fn single(blocks: Vec<Block>, locals: u32) -> Program {
    program(vec![function("f", blocks, locals)])
}

#[test]
fn accepts_minimal_function() {
    let p = single(vec![block(vec![], Terminator::ReturnCond(Cond::AtEnd))], 0);
    assert_eq!(p.verify(), Ok(()));
}

#[test]
fn missing_entry() {
    let p = Program {
        functions: vec![],
        entry: FuncId(0),
    };
    assert_eq!(p.verify(), Err(GraphError::MissingEntry));
}

#[test]
fn empty_function() {
    let p = single(vec![], 0);
    assert_eq!(
        p.verify(),
        Err(GraphError::Empty {
            function: "f".into()
        })
    );
}

#[test]
fn unterminated_block() {
    let p = single(
        vec![
            block(vec![], Terminator::Jump(BlockId(1))),
            Block::default(),
        ],
        0,
    );
    assert_eq!(
        p.verify(),
        Err(GraphError::UnterminatedBlock {
            function: "f".into(),
            block: 1
        })
    );
}

#[test]
fn branch_to_missing_block() {
    let p = single(vec![block(vec![], Terminator::Jump(BlockId(3)))], 0);
    assert_eq!(
        p.verify(),
        Err(GraphError::MissingBlock {
            function: "f".into(),
            block: 3
        })
    );
}

#[test]
fn entry_block_cannot_be_targeted() {
    let p = single(
        vec![
            block(vec![], Terminator::Jump(BlockId(1))),
            block(vec![Op::Advance], Terminator::Jump(BlockId(0))),
        ],
        0,
    );
    assert_eq!(
        p.verify(),
        Err(GraphError::EntryTargeted {
            function: "f".into()
        })
    );
}

#[test]
fn unreachable_block() {
    let p = single(
        vec![
            block(vec![], Terminator::Return(true)),
            block(vec![], Terminator::Return(false)),
        ],
        0,
    );
    assert_eq!(
        p.verify(),
        Err(GraphError::UnreachableBlock {
            function: "f".into(),
            block: 1
        })
    );
}

#[test]
fn calls_must_go_backwards() {
    let p = program(vec![
        function(
            "a",
            vec![block(vec![], Terminator::ReturnCond(Cond::Call(FuncId(1))))],
            0,
        ),
        function("b", vec![block(vec![], Terminator::Return(true))], 0),
    ]);
    assert_eq!(
        p.verify(),
        Err(GraphError::ForwardCall {
            function: "a".into(),
            callee: 1
        })
    );
}

#[test]
fn recursive_call_is_a_forward_call() {
    let p = single(
        vec![block(vec![], Terminator::ReturnCond(Cond::Call(FuncId(0))))],
        0,
    );
    assert!(matches!(p.verify(), Err(GraphError::ForwardCall { .. })));
}

#[test]
fn undeclared_local_in_load() {
    let p = single(
        vec![block(vec![Op::Load(Local(0))], Terminator::Return(true))],
        0,
    );
    assert_eq!(
        p.verify(),
        Err(GraphError::UnknownLocal {
            function: "f".into(),
            local: 0
        })
    );
}

#[test]
fn undeclared_local_in_condition() {
    let p = single(
        vec![block(
            vec![Op::Load(Local(0))],
            Terminator::ReturnCond(Cond::Eq(Local(1), b'x')),
        )],
        1,
    );
    assert_eq!(
        p.verify(),
        Err(GraphError::UnknownLocal {
            function: "f".into(),
            local: 1
        })
    );
}

#[test]
fn duplicate_plain_return() {
    let p = single(
        vec![
            block(
                vec![],
                Terminator::Branch {
                    cond: Cond::AtEnd,
                    then_block: BlockId(1),
                    else_block: BlockId(2),
                },
            ),
            block(vec![], Terminator::Return(false)),
            block(vec![], Terminator::Return(false)),
        ],
        0,
    );
    assert_eq!(
        p.verify(),
        Err(GraphError::DuplicateReturn {
            function: "f".into(),
            value: false
        })
    );
}

#[test]
fn return_after_work_is_not_a_duplicate() {
    let p = single(
        vec![
            block(
                vec![],
                Terminator::Branch {
                    cond: Cond::AtEnd,
                    then_block: BlockId(1),
                    else_block: BlockId(2),
                },
            ),
            block(vec![], Terminator::Return(true)),
            block(vec![Op::Advance], Terminator::Return(true)),
        ],
        0,
    );
    assert_eq!(p.verify(), Ok(()));
}

#[test]
fn successors_of_each_terminator() {
    let branch = Terminator::Branch {
        cond: Cond::AtEnd,
        then_block: BlockId(1),
        else_block: BlockId(2),
    };
    assert_eq!(
        branch.successors().collect::<Vec<_>>(),
        vec![BlockId(1), BlockId(2)]
    );
    assert_eq!(
        Terminator::Jump(BlockId(4)).successors().collect::<Vec<_>>(),
        vec![BlockId(4)]
    );
    assert_eq!(Terminator::Return(true).successors().count(), 0);
    assert_eq!(Terminator::ReturnCond(Cond::AtEnd).successors().count(), 0);
}

#[test]
fn display_renders_blocks() {
    let mut p = single(
        vec![
            block(vec![Op::Load(Local(0)), Op::Advance], Terminator::Jump(BlockId(1))),
            block(vec![], Terminator::ReturnCond(Cond::Eq(Local(0), b'q'))),
        ],
        1,
    );
    p.functions[0].exported = true;
    let text = p.to_string();
    assert_eq!(
        text,
        "export fn0 f(text, end) -> bool {\n\
         block0:\n    tmp0 = *text\n    text += 1\n    jump block1\n\
         block1:\n    return tmp0 == 'q'\n\
         }\n"
    );
}

#[test]
fn errors_name_the_function() {
    let err = GraphError::UnreachableBlock {
        function: "matchhere_3".into(),
        block: 7,
    };
    assert_eq!(err.to_string(), "matchhere_3: block7 is unreachable");
}
