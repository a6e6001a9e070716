use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::block::BlockId;
use crate::lang::BinaryKind;

/// Identifier of a compiler-synthesized temporary, unique per translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TempId(pub u32);

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_t{}", self.0)
    }
}

/// A named storage slot: a source variable (or `this`) or a temporary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Var(String),
    Temp(TempId),
}

impl Operand {
    /// Name of the slot in the bytecode local store.
    pub fn slot_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(name) => write!(f, "{}", name),
            Operand::Temp(t) => write!(f, "{}", t),
        }
    }
}

impl From<TempId> for Operand {
    fn from(t: TempId) -> Self {
        Operand::Temp(t)
    }
}

/// Binary operators of the three-address code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Lt,
    Gt,
    Eq,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Eq => "==",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

impl From<BinaryKind> for BinOp {
    fn from(kind: BinaryKind) -> Self {
        match kind {
            BinaryKind::Add => BinOp::Add,
            BinaryKind::Sub => BinOp::Sub,
            BinaryKind::Mul => BinOp::Mul,
            BinaryKind::Lt => BinOp::Lt,
            BinaryKind::Gt => BinOp::Gt,
            BinaryKind::Eq => BinOp::Eq,
            BinaryKind::And => BinOp::And,
            BinaryKind::Or => BinOp::Or,
        }
    }
}

// =============================================================================
// INSTR - Three-address code
// =============================================================================

/// One three-address instruction. Immutable once appended to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instr {
    /// `dest = value` for integer and boolean literals (booleans as 0/1).
    Const { dest: Operand, value: i64 },

    /// `dest = !src`
    Not { dest: Operand, src: Operand },

    /// `dest = left op right`
    Binary {
        dest: Operand,
        op: BinOp,
        left: Operand,
        right: Operand,
    },

    /// `dest = src`
    Copy { dest: Operand, src: Operand },

    Print(Operand),

    /// Branch to `target` when `cond` is false; otherwise fall through to the
    /// block's first successor.
    BranchIfFalse { cond: Operand, target: BlockId },

    Jump(BlockId),

    Return(Operand),

    Halt,

    /// Call site record. Has no executable semantics; the result is always 0.
    Call {
        dest: Operand,
        receiver: Operand,
        method: String,
        args: Vec<Operand>,
    },

    /// Object creation record. Has no allocation semantics; the result is 0.
    New { dest: Operand, class: String },

    /// Inert annotation, e.g. method boundaries.
    Marker(String),
}

impl Instr {
    /// True for instructions that end a block's straight-line code.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instr::Jump(_) | Instr::Return(_) | Instr::Halt | Instr::BranchIfFalse { .. }
        )
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Const { dest, value } => write!(f, "{} = {};", dest, value),
            Instr::Not { dest, src } => write!(f, "{} = !{};", dest, src),
            Instr::Binary {
                dest,
                op,
                left,
                right,
            } => write!(f, "{} = {} {} {};", dest, left, op.symbol(), right),
            Instr::Copy { dest, src } => write!(f, "{} = {};", dest, src),
            Instr::Print(value) => write!(f, "print {};", value),
            Instr::BranchIfFalse { cond, target } => {
                write!(f, "iffalse {} goto {};", cond, target)
            }
            Instr::Jump(target) => write!(f, "goto {};", target),
            Instr::Return(value) => write!(f, "ireturn {};", value),
            Instr::Halt => write!(f, "stop;"),
            Instr::Call {
                dest,
                receiver,
                method,
                args,
            } => {
                let args: Vec<String> = args.iter().map(Operand::to_string).collect();
                write!(
                    f,
                    "{} = call {}.{}({});",
                    dest,
                    receiver,
                    method,
                    args.join(", ")
                )
            }
            Instr::New { dest, class } => write!(f, "{} = new {};", dest, class),
            Instr::Marker(text) => write!(f, "// {}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp(n: u32) -> Operand {
        Operand::Temp(TempId(n))
    }

    fn var(name: &str) -> Operand {
        Operand::Var(name.to_string())
    }

    #[test]
    fn test_display_binary() {
        let instr = Instr::Binary {
            dest: temp(2),
            op: BinOp::Eq,
            left: var("x"),
            right: temp(1),
        };
        assert_eq!(instr.to_string(), "_t2 = x == _t1;");
    }

    #[test]
    fn test_display_call() {
        let instr = Instr::Call {
            dest: temp(3),
            receiver: var("this"),
            method: "sum".to_string(),
            args: vec![temp(1), var("n")],
        };
        assert_eq!(instr.to_string(), "_t3 = call this.sum(_t1, n);");
    }

    #[test]
    fn test_display_control() {
        let branch = Instr::BranchIfFalse {
            cond: temp(0),
            target: BlockId(4),
        };
        assert_eq!(branch.to_string(), "iffalse _t0 goto block_4;");
        assert_eq!(Instr::Jump(BlockId(2)).to_string(), "goto block_2;");
        assert_eq!(Instr::Halt.to_string(), "stop;");
    }

    #[test]
    fn test_terminators() {
        assert!(Instr::Halt.is_terminator());
        assert!(Instr::Return(var("x")).is_terminator());
        assert!(Instr::Jump(BlockId(0)).is_terminator());
        assert!(!Instr::Print(var("x")).is_terminator());
        assert!(!Instr::Marker("Method End: f".to_string()).is_terminator());
    }
}
