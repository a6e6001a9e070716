//! Stack machine that executes lowered bytecode.

pub mod runtime_error;
pub mod vm;

pub use runtime_error::RuntimeError;
pub use vm::{Execution, Vm, VmConfig};
