//! Back end for a small object-oriented teaching language: three-address code
//! in a control-flow graph, lowered to stack bytecode and run on a small VM.

pub mod bytecode;
pub mod ir;
pub mod lang;
pub mod logging;
pub mod pipeline;
pub mod runtime;
