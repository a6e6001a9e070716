use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::BlockId;

// =============================================================================
// OP - Stack machine instructions
// =============================================================================

/// One bytecode operation. Values on the operand stack are `i64`; booleans
/// are 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// Jump target marker. Has no effect when executed.
    Label(BlockId),

    /// Inert annotation, written as a `//` line.
    Comment(String),

    // literals & locals
    Const(i64),
    Load(String),
    Store(String),

    // arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // logic
    And,
    Or,
    Not,

    // comparison
    Eq,
    Gt,
    Lt,

    // I/O
    Print,

    // control flow
    /// Pop a value and jump to the label when it is 0.
    IfFalse(BlockId),
    Goto(BlockId),
    /// Pop the return value and end execution.
    Return,
    Stop,
}

impl Op {
    /// Fixed stack effect as `(pops, pushes)`.
    pub fn effect(&self) -> (usize, usize) {
        use Op::*;
        match self {
            Label(_) | Comment(_) => (0, 0),

            Const(_) | Load(_) => (0, 1),
            Store(_) => (1, 0),

            Add | Sub | Mul | Div => (2, 1),
            And | Or => (2, 1),
            Not => (1, 1),
            Eq | Gt | Lt => (2, 1),

            Print => (1, 0),

            IfFalse(_) => (1, 0),
            Goto(_) => (0, 0),
            Return => (1, 0),
            Stop => (0, 0),
        }
    }

    /// True when control never continues to the next op.
    pub fn ends_flow(&self) -> bool {
        matches!(self, Op::Goto(_) | Op::Return | Op::Stop)
    }

    /// Label this op may transfer control to.
    pub fn jump_target(&self) -> Option<BlockId> {
        match self {
            Op::IfFalse(target) | Op::Goto(target) => Some(*target),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Label(_) => "label",
            Op::Comment(_) => "//",
            Op::Const(_) => "iconst",
            Op::Load(_) => "iload",
            Op::Store(_) => "istore",
            Op::Add => "iadd",
            Op::Sub => "isub",
            Op::Mul => "imul",
            Op::Div => "idiv",
            Op::And => "iand",
            Op::Or => "ior",
            Op::Not => "inot",
            Op::Eq => "ieq",
            Op::Gt => "igt",
            Op::Lt => "ilt",
            Op::Print => "print",
            Op::IfFalse(_) => "iffalse",
            Op::Goto(_) => "goto",
            Op::Return => "ireturn",
            Op::Stop => "stop",
        }
    }
}

/// Text form, one line of a `.class` file.
impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Label(id) => write!(f, "label {}:", id),
            Op::Comment(text) => write!(f, "// {}", text),
            Op::Const(v) => write!(f, "iconst {}", v),
            Op::Load(name) => write!(f, "iload {}", name),
            Op::Store(name) => write!(f, "istore {}", name),
            Op::IfFalse(target) => write!(f, "iffalse goto {}", target),
            Op::Goto(target) => write!(f, "goto {}", target),
            other => write!(f, "{}", other.mnemonic()),
        }
    }
}
