use thiserror::Error;

use crate::lang::Node;

/// First fault met while translating a tree into three-address code.
///
/// Translation is fail-fast: the builder keeps the first error and ignores
/// everything after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("compile error: no syntax tree to translate")]
    MissingRoot,

    #[error(
        "compile error: '{node_type}' node (line {line}) has no child {index}\n  hint: the tree does not have the shape the back end expects"
    )]
    MissingChild {
        node_type: String,
        index: usize,
        line: u32,
    },

    #[error(
        "compile error: cannot translate '{node_type}' expression (line {line})\n  hint: this node type is not an expression the back end knows"
    )]
    UnhandledExpression { node_type: String, line: u32 },

    #[error("compile error: invalid literal '{text}' (line {line})")]
    InvalidLiteral { text: String, line: u32 },

    #[error(
        "compile error: '{node_type}' (line {line}) does not produce a value\n  hint: this construct is parsed but has no back-end support"
    )]
    NoValue { node_type: String, line: u32 },

    #[error(
        "compile error: cannot assign to '{node_type}' (line {line})\n  hint: only plain identifiers can be assigned"
    )]
    InvalidAssignTarget { node_type: String, line: u32 },

    #[error(
        "compile error: method '{method}' (line {line}) has no return expression\n  hint: every method must end with `return <expr>;`"
    )]
    MissingReturn { method: String, line: u32 },

    #[error("compile error: expected identifier for method name, found '{node_type}' (line {line})")]
    InvalidMethodName { node_type: String, line: u32 },

    #[error("compile error: expected identifier for class name, found '{node_type}' (line {line})")]
    InvalidClassName { node_type: String, line: u32 },
}

impl CompileError {
    pub fn missing_child(node: &Node, index: usize) -> Self {
        CompileError::MissingChild {
            node_type: node.tag().to_string(),
            index,
            line: node.lineno,
        }
    }

    pub fn unhandled(node: &Node) -> Self {
        CompileError::UnhandledExpression {
            node_type: node.tag().to_string(),
            line: node.lineno,
        }
    }

    pub fn invalid_literal(node: &Node) -> Self {
        CompileError::InvalidLiteral {
            text: node.text().to_string(),
            line: node.lineno,
        }
    }

    pub fn no_value(node: &Node) -> Self {
        CompileError::NoValue {
            node_type: node.tag().to_string(),
            line: node.lineno,
        }
    }

    pub fn invalid_assign_target(node: &Node) -> Self {
        CompileError::InvalidAssignTarget {
            node_type: node.tag().to_string(),
            line: node.lineno,
        }
    }

    pub fn missing_return(method: &str, line: u32) -> Self {
        CompileError::MissingReturn {
            method: method.to_string(),
            line,
        }
    }

    pub fn invalid_method_name(node: &Node) -> Self {
        CompileError::InvalidMethodName {
            node_type: node.tag().to_string(),
            line: node.lineno,
        }
    }

    pub fn invalid_class_name(node: &Node) -> Self {
        CompileError::InvalidClassName {
            node_type: node.tag().to_string(),
            line: node.lineno,
        }
    }
}
