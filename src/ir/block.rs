use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::instr::{Instr, Operand};

/// Stable index of a block inside its [`Cfg`]. Assigned at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block_{}", self.0)
    }
}

/// A straight-line run of instructions with control transfer only at its end.
///
/// For a block ending in a conditional branch, `succs[0]` is the fall-through
/// edge and `succs[1]` the branch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    pub id: BlockId,
    pub instrs: Vec<Instr>,
    pub succs: Vec<BlockId>,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            instrs: Vec::new(),
            succs: Vec::new(),
        }
    }

    pub fn push(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    pub fn add_succ(&mut self, succ: BlockId) {
        debug_assert!(self.succs.len() < 2, "{} already has two successors", self.id);
        self.succs.push(succ);
    }

    /// Last real instruction, if it transfers control. Markers are skipped.
    pub fn terminator(&self) -> Option<&Instr> {
        self.instrs
            .iter()
            .rev()
            .find(|i| !matches!(i, Instr::Marker(_)))
            .filter(|i| i.is_terminator())
    }

    pub fn is_open(&self) -> bool {
        self.terminator().is_none()
    }
}

/// Arena of basic blocks. The entry is the first block created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cfg {
    blocks: Vec<BasicBlock>,
}

impl Cfg {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn create_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock::new(id));
        id
    }

    pub fn entry(&self) -> Option<BlockId> {
        self.blocks.first().map(|b| b.id)
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.index()]
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append `instr` to `from` and record the edge it realises.
    pub fn link(&mut self, from: BlockId, instr: Instr, to: BlockId) {
        let block = self.block_mut(from);
        block.push(instr);
        block.add_succ(to);
    }

    /// Append `iffalse cond goto on_false` to `from`, falling through to `on_true`.
    pub fn branch(&mut self, from: BlockId, cond: Operand, on_true: BlockId, on_false: BlockId) {
        let block = self.block_mut(from);
        block.push(Instr::BranchIfFalse {
            cond,
            target: on_false,
        });
        block.add_succ(on_true);
        block.add_succ(on_false);
    }

    /// The block a conditional branch in `id` falls through to.
    pub fn fall_through(&self, id: BlockId) -> Option<BlockId> {
        match self.block(id).terminator() {
            Some(Instr::BranchIfFalse { .. }) => self.block(id).succs.first().copied(),
            _ => None,
        }
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{}:", block.id)?;
            for instr in &block.instrs {
                writeln!(f, "    {}", instr)?;
            }
        }
        Ok(())
    }
}
