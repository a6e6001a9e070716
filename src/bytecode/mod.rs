pub mod disasm;
pub mod lower;
pub mod op;
pub mod program;
pub mod stack_check_error;

pub use lower::{failed_program, lower, lower_translation};
pub use op::Op;
pub use program::{ParseError, Program};
pub use stack_check_error::{StackCheckError, check_ops};
