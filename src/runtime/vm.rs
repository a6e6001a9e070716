use std::collections::HashMap;
use std::io::{self, Write};

use tracing::debug;

use crate::bytecode::{Op, Program, check_ops};
use crate::ir::BlockId;
use crate::runtime::runtime_error::RuntimeError;

#[derive(Debug, Clone)]
pub struct VmConfig {
    pub max_steps: Option<usize>,
    pub max_stack_size: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_steps: None,
            max_stack_size: 10_000,
        }
    }
}

/// What one run observably did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Execution {
    /// Every printed value, in order.
    pub output: Vec<i64>,
    /// Value popped by `ireturn`, if execution ended that way.
    pub returned: Option<i64>,
    pub steps: usize,
}

pub struct Vm {
    stack: Vec<i64>,
    /// Reading a name that was never stored yields 0.
    locals: HashMap<String, i64>,
    // Safety limits
    config: VmConfig,
    steps: usize,
    ip: usize,
    current: &'static str,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            stack: Vec::new(),
            locals: HashMap::new(),
            config,
            steps: 0,
            ip: 0,
            current: "",
        }
    }

    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    pub fn local(&self, name: &str) -> i64 {
        self.locals.get(name).copied().unwrap_or(0)
    }

    pub fn reset_execution_state(&mut self) {
        self.stack.clear();
        self.locals.clear();
        self.steps = 0;
        self.ip = 0;
    }

    /// Run `program`, collecting printed values.
    pub fn run(&mut self, program: &Program) -> Result<Execution, RuntimeError> {
        self.run_to(program, &mut io::sink())
    }

    /// Run `program`, also writing each printed value as a line to `out`.
    pub fn run_to<W: Write>(
        &mut self,
        program: &Program,
        out: &mut W,
    ) -> Result<Execution, RuntimeError> {
        self.reset_execution_state();

        let labels = resolve_labels(&program.ops)?;
        check_ops(&program.ops)?;

        let execution = self.exec_ops(&program.ops, &labels, out)?;
        debug!(
            steps = execution.steps,
            printed = execution.output.len(),
            "execution finished"
        );
        Ok(execution)
    }

    // Execution

    fn check_limits(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;

        if let Some(max) = self.config.max_steps {
            if self.steps > max {
                return Err(RuntimeError::StepLimit(max));
            }
        }

        if self.stack.len() > self.config.max_stack_size {
            return Err(RuntimeError::StackLimit(self.config.max_stack_size));
        }

        Ok(())
    }

    fn exec_ops<W: Write>(
        &mut self,
        ops: &[Op],
        labels: &HashMap<BlockId, usize>,
        out: &mut W,
    ) -> Result<Execution, RuntimeError> {
        let mut execution = Execution::default();

        while self.ip < ops.len() {
            self.check_limits()?;
            let mut next = self.ip + 1;
            let op = &ops[self.ip];
            self.current = op.mnemonic();

            match op {
                Op::Label(_) | Op::Comment(_) => {}

                // Literals & locals
                Op::Const(v) => self.push(*v),
                Op::Load(name) => self.push(self.local(name)),
                Op::Store(name) => {
                    let v = self.pop()?;
                    self.locals.insert(name.clone(), v);
                }

                // Arithmetic
                Op::Add => self.binary(|a, b| a.wrapping_add(b))?,
                Op::Sub => self.binary(|a, b| a.wrapping_sub(b))?,
                Op::Mul => self.binary(|a, b| a.wrapping_mul(b))?,
                Op::Div => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    if b == 0 {
                        return Err(RuntimeError::DivisionByZero { ip: self.ip });
                    }
                    self.push(a.wrapping_div(b));
                }

                // Logic
                Op::And => self.binary(|a, b| i64::from(a != 0 && b != 0))?,
                Op::Or => self.binary(|a, b| i64::from(a != 0 || b != 0))?,
                Op::Not => {
                    let a = self.pop()?;
                    self.push(i64::from(a == 0));
                }

                // Comparison
                Op::Eq => self.binary(|a, b| i64::from(a == b))?,
                Op::Gt => self.binary(|a, b| i64::from(a > b))?,
                Op::Lt => self.binary(|a, b| i64::from(a < b))?,

                // I/O
                Op::Print => {
                    let v = self.pop()?;
                    writeln!(out, "{}", v)?;
                    execution.output.push(v);
                }

                // Control flow
                Op::IfFalse(target) => {
                    if self.pop()? == 0 {
                        next = labels[target];
                    }
                }
                Op::Goto(target) => next = labels[target],
                Op::Return => {
                    execution.returned = Some(self.pop()?);
                    break;
                }
                Op::Stop => break,
            }

            self.ip = next;
        }

        execution.steps = self.steps;
        Ok(execution)
    }

    // Stack operations

    fn push(&mut self, value: i64) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Result<i64, RuntimeError> {
        self.stack.pop().ok_or_else(|| RuntimeError::StackUnderflow {
            ip: self.ip,
            op: self.current.to_string(),
        })
    }

    fn binary(&mut self, f: impl FnOnce(i64, i64) -> i64) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(f(a, b));
        Ok(())
    }
}

/// Map every label to its position and make sure every jump lands on one.
fn resolve_labels(ops: &[Op]) -> Result<HashMap<BlockId, usize>, RuntimeError> {
    let mut labels = HashMap::new();
    for (ip, op) in ops.iter().enumerate() {
        if let Op::Label(id) = op {
            if labels.insert(*id, ip).is_some() {
                return Err(RuntimeError::DuplicateLabel { label: *id });
            }
        }
    }

    for op in ops {
        if let Some(target) = op.jump_target() {
            if !labels.contains_key(&target) {
                return Err(RuntimeError::UndefinedLabel { label: target });
            }
        }
    }

    Ok(labels)
}
