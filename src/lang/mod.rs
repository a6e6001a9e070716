//! # Syntax tree interface
//!
//! The front end (lexer, parser, symbol table, semantic analysis) lives
//! upstream. It hands the back end a fully validated tree of [`Node`]s, either
//! in memory or dumped as JSON with the shape
//! `{ "type": ..., "value": ..., "lineno": ..., "children": [...] }`.

pub mod node;

#[cfg(test)]
pub(crate) mod sample;

pub use node::{BinaryKind, Node, NodeKind};
