use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bytecode::Op;
use crate::ir::BlockId;

/// A compiled bytecode unit: one flat instruction stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    pub fn from_ops(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Text form, one op per line.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Read the text form. Blank lines and `//` comments are dropped.
    pub fn parse(source: &str) -> Result<Program, ParseError> {
        let mut ops = Vec::new();
        for (i, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            ops.push(parse_line(line, i + 1)?);
        }
        Ok(Program { ops })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            writeln!(f, "{}", op)?;
        }
        Ok(())
    }
}

impl FromStr for Program {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::parse(s)
    }
}

/// A malformed line in a bytecode file. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

fn parse_line(line: &str, lineno: usize) -> Result<Op, ParseError> {
    let line = line.strip_suffix(';').unwrap_or(line).trim_end();
    let mut words = line.split_whitespace();
    let Some(mnemonic) = words.next() else {
        return Err(ParseError::new(lineno, "empty instruction"));
    };
    let operands: Vec<&str> = words.collect();

    let op = match (mnemonic, operands.as_slice()) {
        ("label", [name]) => {
            let name = name
                .strip_suffix(':')
                .ok_or_else(|| ParseError::new(lineno, "label must end with ':'"))?;
            Op::Label(parse_block(name, lineno)?)
        }
        ("iconst", [value]) => Op::Const(
            value
                .parse()
                .map_err(|_| ParseError::new(lineno, format!("invalid integer '{}'", value)))?,
        ),
        ("iload", [name]) => Op::Load(name.to_string()),
        ("istore", [name]) => Op::Store(name.to_string()),
        ("iadd", []) => Op::Add,
        ("isub", []) => Op::Sub,
        ("imul", []) => Op::Mul,
        ("idiv", []) => Op::Div,
        ("iand", []) => Op::And,
        ("ior", []) => Op::Or,
        ("inot", []) => Op::Not,
        ("ieq", []) => Op::Eq,
        ("igt", []) => Op::Gt,
        ("ilt", []) => Op::Lt,
        ("print", []) => Op::Print,
        ("iffalse", ["goto", target]) => Op::IfFalse(parse_block(target, lineno)?),
        ("goto", [target]) => Op::Goto(parse_block(target, lineno)?),
        ("ireturn", []) => Op::Return,
        ("stop", []) => Op::Stop,
        (
            "label" | "iconst" | "iload" | "istore" | "iadd" | "isub" | "imul" | "idiv" | "iand"
            | "ior" | "inot" | "ieq" | "igt" | "ilt" | "print" | "iffalse" | "goto" | "ireturn"
            | "stop",
            _,
        ) => {
            return Err(ParseError::new(
                lineno,
                format!("wrong operands for '{}': '{}'", mnemonic, line),
            ));
        }
        _ => {
            return Err(ParseError::new(
                lineno,
                format!("unknown opcode '{}'", mnemonic),
            ));
        }
    };
    Ok(op)
}

fn parse_block(text: &str, lineno: usize) -> Result<BlockId, ParseError> {
    text.strip_prefix("block_")
        .and_then(|n| n.parse().ok())
        .map(BlockId)
        .ok_or_else(|| ParseError::new(lineno, format!("invalid label '{}'", text)))
}
