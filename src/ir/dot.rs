//! Graphviz rendering of a CFG. Diagnostic output only.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use tracing::{info, warn};

use crate::ir::block::{BasicBlock, BlockId, Cfg};
use crate::ir::instr::Instr;

/// Render `cfg` as a `digraph CFG { ... }` document.
pub fn render_dot(cfg: &Cfg) -> String {
    let mut out = String::new();

    out.push_str("digraph CFG {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=box, fontname=\"Courier New\", fontsize=10];\n");
    out.push_str("  edge [fontname=\"Helvetica\", fontsize=9];\n");

    for block in cfg.blocks() {
        let _ = writeln!(out, "  {} [label=\"{}\"];", block.id, block_label(block));
    }

    let mut drawn: BTreeSet<(BlockId, BlockId)> = BTreeSet::new();
    for block in cfg.blocks() {
        for (succ, attrs) in edges(block) {
            if drawn.insert((block.id, succ)) {
                let _ = writeln!(out, "  {} -> {} [{}];", block.id, succ, attrs);
            }
        }
    }

    out.push_str("}\n");
    out
}

/// Write the rendering to `path`. Failures are logged and otherwise ignored.
pub fn write_dot(cfg: &Cfg, path: &Path) {
    match std::fs::write(path, render_dot(cfg)) {
        Ok(()) => info!("CFG written to {}", path.display()),
        Err(e) => warn!("failed to write CFG to {}: {}", path.display(), e),
    }
}

fn block_label(block: &BasicBlock) -> String {
    let mut label = format!("[Block {}]\\n", block.id.0);
    for instr in &block.instrs {
        let _ = write!(label, "{:<30}\\l", escape(&instr.to_string()));
    }
    label
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '<' | '>' | '{' | '}') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Label each recorded successor from the shape of the block's last instruction.
fn edges(block: &BasicBlock) -> Vec<(BlockId, &'static str)> {
    let (false_target, goto_target) = match block.terminator() {
        Some(Instr::BranchIfFalse { target, .. }) => (Some(*target), None),
        Some(Instr::Jump(target)) => (None, Some(*target)),
        _ => (None, None),
    };

    let mut true_taken = false;
    let mut out = Vec::with_capacity(block.succs.len());
    for &succ in &block.succs {
        let attrs = if Some(succ) == false_target {
            "label=\"false\""
        } else if Some(succ) == goto_target {
            "label=\"goto\""
        } else if false_target.is_some() && !true_taken {
            true_taken = true;
            "label=\"true\""
        } else {
            "style=dashed, label=\"?\""
        };
        out.push((succ, attrs));
    }
    out
}
