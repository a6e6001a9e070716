use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::bytecode::{Op, Program};
use crate::ir::{BinOp, Cfg, Instr, Translation};

pub const FAILED_BANNER: &str = "BYTECODE GENERATION FAILED DUE TO IR ERRORS";

/// Program emitted in place of real code when translation failed.
pub fn failed_program() -> Program {
    Program::from_ops(vec![Op::Comment(FAILED_BANNER.to_string()), Op::Stop])
}

/// Lower a translation, refusing to trust a CFG whose translation failed.
pub fn lower_translation(translation: &Translation) -> Program {
    match &translation.error {
        Some(_) => {
            warn!("skipping bytecode generation due to errors in IR phase");
            failed_program()
        }
        None => lower(&translation.cfg),
    }
}

/// Lower every block reachable from the entry, breadth first.
///
/// Unreachable blocks are dropped. The output depends only on `cfg`.
pub fn lower(cfg: &Cfg) -> Program {
    let Some(entry) = cfg.entry() else {
        return Program::from_ops(vec![Op::Stop]);
    };

    let mut ops = Vec::new();
    let mut visited = vec![false; cfg.len()];
    let mut queue = VecDeque::from([entry]);

    while let Some(id) = queue.pop_front() {
        if std::mem::replace(&mut visited[id.index()], true) {
            continue;
        }

        let block = cfg.block(id);
        ops.push(Op::Label(id));
        for instr in &block.instrs {
            lower_instr(instr, &mut ops);
        }

        // Layout is breadth first, so the fall-through block is not
        // necessarily next: make the edge explicit.
        if let Some(next) = cfg.fall_through(id) {
            ops.push(Op::Goto(next));
        }

        for &succ in &block.succs {
            if !visited[succ.index()] {
                queue.push_back(succ);
            }
        }
    }

    let terminated = ops
        .iter()
        .rev()
        .find(|op| !matches!(op, Op::Comment(_)))
        .is_some_and(Op::ends_flow);
    if !terminated {
        ops.push(Op::Stop);
    }

    debug!(
        blocks = visited.iter().filter(|v| **v).count(),
        ops = ops.len(),
        "lowered CFG"
    );
    Program::from_ops(ops)
}

/// Fixed bytecode template for one instruction.
fn lower_instr(instr: &Instr, ops: &mut Vec<Op>) {
    match instr {
        Instr::Const { dest, value } => {
            ops.push(Op::Const(*value));
            ops.push(Op::Store(dest.slot_name()));
        }
        Instr::Not { dest, src } => {
            ops.push(Op::Load(src.slot_name()));
            ops.push(Op::Not);
            ops.push(Op::Store(dest.slot_name()));
        }
        Instr::Binary {
            dest,
            op,
            left,
            right,
        } => {
            ops.push(Op::Load(left.slot_name()));
            ops.push(Op::Load(right.slot_name()));
            ops.push(binary_op(*op));
            ops.push(Op::Store(dest.slot_name()));
        }
        Instr::Copy { dest, src } => {
            ops.push(Op::Load(src.slot_name()));
            ops.push(Op::Store(dest.slot_name()));
        }
        Instr::Print(value) => {
            ops.push(Op::Load(value.slot_name()));
            ops.push(Op::Print);
        }
        Instr::BranchIfFalse { cond, target } => {
            ops.push(Op::Load(cond.slot_name()));
            ops.push(Op::IfFalse(*target));
        }
        Instr::Jump(target) => ops.push(Op::Goto(*target)),
        Instr::Return(value) => {
            ops.push(Op::Load(value.slot_name()));
            ops.push(Op::Return);
        }
        Instr::Halt => ops.push(Op::Stop),
        Instr::Call {
            dest,
            receiver,
            method,
            args,
        } => {
            let args: Vec<String> = args.iter().map(|a| a.slot_name()).collect();
            ops.push(Op::Comment(format!(
                "Call: {} = {}.{}({})",
                dest,
                receiver,
                method,
                args.join(", ")
            )));
            ops.push(Op::Const(0));
            ops.push(Op::Store(dest.slot_name()));
        }
        Instr::New { dest, class } => {
            ops.push(Op::Comment(format!("New: {} = new {}", dest, class)));
            ops.push(Op::Const(0));
            ops.push(Op::Store(dest.slot_name()));
        }
        Instr::Marker(text) => ops.push(Op::Comment(text.clone())),
    }
}

fn binary_op(op: BinOp) -> Op {
    match op {
        BinOp::Add => Op::Add,
        BinOp::Sub => Op::Sub,
        BinOp::Mul => Op::Mul,
        BinOp::Lt => Op::Lt,
        BinOp::Gt => Op::Gt,
        BinOp::Eq => Op::Eq,
        BinOp::And => Op::And,
        BinOp::Or => Op::Or,
    }
}
