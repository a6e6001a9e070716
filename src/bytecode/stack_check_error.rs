use std::collections::HashMap;

use thiserror::Error;

use crate::bytecode::Op;
use crate::ir::BlockId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stack-check error: {message}")]
pub struct StackCheckError {
    pub message: String,
}

impl StackCheckError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check stack effects with a given initial stack height.
///
/// Heights are followed along fall-through and jump edges, so a value may be
/// carried across a `goto`. Every position must be entered with the same
/// height on every path. Code no path reaches is not checked.
pub fn check_ops_with_initial(ops: &[Op], initial_height: usize) -> Result<(), StackCheckError> {
    let labels: HashMap<BlockId, usize> = ops
        .iter()
        .enumerate()
        .filter_map(|(ip, op)| match op {
            Op::Label(id) => Some((*id, ip)),
            _ => None,
        })
        .collect();

    let mut heights: Vec<Option<usize>> = vec![None; ops.len()];
    let mut pending = vec![(0, initial_height)];

    while let Some((ip, h)) = pending.pop() {
        let Some(op) = ops.get(ip) else {
            continue;
        };
        match heights[ip] {
            Some(seen) if seen == h => continue,
            Some(seen) => {
                return Err(StackCheckError::new(format!(
                    "inconsistent stack height at ip={}: {} on one path, {} on another",
                    ip, seen, h
                )));
            }
            None => heights[ip] = Some(h),
        }

        let (pops, pushes) = op.effect();
        if h < pops {
            return Err(StackCheckError::new(format!(
                "stack underflow at ip={}, op={}, needed {} items",
                ip, op, pops
            )));
        }
        let after = h - pops + pushes;

        if let Some(target) = op.jump_target() {
            let Some(&pos) = labels.get(&target) else {
                return Err(StackCheckError::new(format!(
                    "jump to undefined label {} at ip={}",
                    target, ip
                )));
            };
            pending.push((pos, after));
        }
        if !op.ends_flow() {
            pending.push((ip + 1, after));
        }
    }

    Ok(())
}

/// Check stack effects starting from empty stack.
pub fn check_ops(ops: &[Op]) -> Result<(), StackCheckError> {
    check_ops_with_initial(ops, 0)
}
