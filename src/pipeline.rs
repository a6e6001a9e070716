//! Tree in, output out: translation, lowering and execution chained together.

use thiserror::Error;
use tracing::info;

use crate::bytecode::{Program, lower_translation};
use crate::ir::{Builder, CompileError, Translation};
use crate::lang::Node;
use crate::runtime::{Execution, RuntimeError, Vm};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Both artifacts of a compile. `program` is the failure stub when
/// `translation` carries an error.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub translation: Translation,
    pub program: Program,
}

impl Compiled {
    pub fn error(&self) -> Option<&CompileError> {
        self.translation.error.as_ref()
    }
}

pub fn compile(root: &Node) -> Compiled {
    let mut builder = Builder::new();
    builder.start(Some(root));
    let translation = builder.finish();
    let program = lower_translation(&translation);

    info!(
        blocks = translation.cfg.len(),
        ops = program.len(),
        ok = translation.is_ok(),
        "compiled"
    );
    Compiled {
        translation,
        program,
    }
}

/// Compile and run a tree with a default VM. Translation errors are not run.
pub fn run_source_program(root: &Node) -> Result<Execution, PipelineError> {
    let compiled = compile(root);
    if let Some(e) = compiled.translation.error {
        return Err(e.into());
    }
    Ok(Vm::new().run(&compiled.program)?)
}
