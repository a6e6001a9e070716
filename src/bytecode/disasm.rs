use std::collections::HashSet;
use std::fmt::Write as _;

use crate::bytecode::{Op, Program};
use crate::ir::BlockId;

/// Print disassembly of a bytecode program
pub fn print_bc(program: &Program) {
    print!("{}", disassemble_to_string(program));
}

/// Return disassembly as a String
pub fn disassemble_to_string(program: &Program) -> String {
    let mut out = String::new();
    let jump_targets = collect_jump_targets(&program.ops);

    let _ = writeln!(out, "=== BYTECODE PROGRAM ===");
    let _ = writeln!(out, " {} instructions", program.len());
    let _ = writeln!(out, "════════════════════════════════════════");

    for (ip, op) in program.ops.iter().enumerate() {
        match op {
            Op::Label(id) => {
                if jump_targets.contains(id) {
                    let _ = writeln!(out, "      ┌──────────────────────────────────");
                    let _ = writeln!(out, "{:04} ► {}:", ip, id);
                } else {
                    let _ = writeln!(out, "{:04}   {}:", ip, id);
                }
            }
            _ => {
                let _ = writeln!(out, "{:04}     {}", ip, format_op(op));
            }
        }
    }

    out
}

fn collect_jump_targets(ops: &[Op]) -> HashSet<BlockId> {
    ops.iter().filter_map(Op::jump_target).collect()
}

fn format_op(op: &Op) -> String {
    match op {
        Op::Label(id) => format!("{}:", id),
        Op::Comment(text) => format!("; {}", text),

        Op::Const(v) => format!("ICONST      {}", v),
        Op::Load(name) => format!("ILOAD       {}", name),
        Op::Store(name) => format!("ISTORE      {}", name),

        Op::Add => "IADD        ; ( a b -- a+b )".to_string(),
        Op::Sub => "ISUB        ; ( a b -- a-b )".to_string(),
        Op::Mul => "IMUL        ; ( a b -- a*b )".to_string(),
        Op::Div => "IDIV        ; ( a b -- a/b )".to_string(),

        Op::And => "IAND        ; ( a b -- a&&b )".to_string(),
        Op::Or => "IOR         ; ( a b -- a||b )".to_string(),
        Op::Not => "INOT        ; ( a -- !a )".to_string(),

        Op::Eq => "IEQ         ; ( a b -- a==b )".to_string(),
        Op::Gt => "IGT         ; ( a b -- a>b )".to_string(),
        Op::Lt => "ILT         ; ( a b -- a<b )".to_string(),

        Op::Print => "PRINT       ; ( value -- )".to_string(),

        Op::IfFalse(target) => format!("IFFALSE     → {}", target),
        Op::Goto(target) => format!("GOTO        → {}", target),
        Op::Return => "IRETURN     ; ( value -- )".to_string(),
        Op::Stop => "STOP".to_string(),
    }
}
