use thiserror::Error;

use crate::bytecode::StackCheckError;
use crate::ir::BlockId;

/// Fatal condition that aborts execution.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime error: stack underflow at ip={ip} ({op})")]
    StackUnderflow { ip: usize, op: String },

    #[error("runtime error: division by zero at ip={ip}")]
    DivisionByZero { ip: usize },

    #[error("runtime error: jump to undefined label {label}")]
    UndefinedLabel { label: BlockId },

    #[error("runtime error: label {label} defined twice")]
    DuplicateLabel { label: BlockId },

    #[error("runtime error: execution step limit exceeded ({0})")]
    StepLimit(usize),

    #[error("runtime error: stack size limit exceeded ({0})")]
    StackLimit(usize),

    #[error("runtime error: {0}")]
    StackCheck(#[from] StackCheckError),

    #[error("runtime error: cannot write output: {0}")]
    Output(#[from] std::io::Error),
}
