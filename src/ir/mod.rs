//! Three-address code organised into a control-flow graph.

pub mod block;
pub mod builder;
pub mod compile_error;
pub mod dot;
pub mod instr;

pub use block::{BasicBlock, BlockId, Cfg};
pub use builder::{Builder, Translation};
pub use compile_error::CompileError;
pub use instr::{BinOp, Instr, Operand, TempId};
