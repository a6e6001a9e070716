use serde::{Deserialize, Serialize};

/// A node of the validated syntax tree handed over by the front end.
///
/// The tree is read-only input: the parser and semantic analysis have already
/// accepted it, so the back end only inspects `node_type`, `value` and the
/// ordered `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Raw type tag as produced by the parser, e.g. `"addExpression"`.
    #[serde(rename = "type")]
    pub node_type: String,

    /// Literal text or identifier name, when the node carries one.
    #[serde(default)]
    pub value: Option<String>,

    /// Source line the node was parsed from.
    #[serde(default)]
    pub lineno: u32,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(node_type: impl Into<String>, value: Option<String>, lineno: u32) -> Self {
        Self {
            node_type: node_type.into(),
            value,
            lineno,
            children: Vec::new(),
        }
    }

    /// A childless node carrying a value (identifier, literal).
    pub fn leaf(node_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(node_type, Some(value.into()), 0)
    }

    /// A value-less node with the given children.
    pub fn with_children(node_type: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            node_type: node_type.into(),
            value: None,
            lineno: 0,
            children,
        }
    }

    pub fn at_line(mut self, lineno: u32) -> Self {
        self.lineno = lineno;
        self
    }

    /// Type tag without the trailing `:` some grammar actions append.
    pub fn tag(&self) -> &str {
        self.node_type.strip_suffix(':').unwrap_or(&self.node_type)
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_tag(self.tag())
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// Text carried by the node, falling back to the cleaned tag.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or_else(|| self.tag())
    }
}

/// Binary operators the back end gives semantics to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryKind {
    Add,
    Sub,
    Mul,
    Lt,
    Gt,
    Eq,
    And,
    Or,
}

/// Closed classification of the parser's type tags.
///
/// Tags are matched once here; everything downstream works on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    // ───────────────────────────── Values ─────────────────────────────
    IntLiteral,
    True,
    False,
    Identifier,
    This,

    // ─────────────────────────── Expressions ──────────────────────────
    Not,
    Binary(BinaryKind),
    MethodCall,
    NewObject,
    /// Parsed but without back-end support: `new int[n]`, `a.length`, ...
    UnsupportedExpression,

    // ────────────────────────── Argument lists ────────────────────────
    ArgumentList,
    Argument,
    NonEmptyArgumentList,
    NoArguments,

    // ──────────────────────────── Statements ──────────────────────────
    Assign,
    Print,
    If,
    While,
    MethodDeclaration,
    ArrayAssign,

    /// Blocks, declarations, type annotations and empty productions.
    Structural,

    Other(String),
}

impl NodeKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "intLiteral" => NodeKind::IntLiteral,
            "true" => NodeKind::True,
            "false" => NodeKind::False,
            "Identifier" => NodeKind::Identifier,
            "This" => NodeKind::This,

            "notExpression" => NodeKind::Not,
            "addExpression" => NodeKind::Binary(BinaryKind::Add),
            "subExpression" => NodeKind::Binary(BinaryKind::Sub),
            "multExpression" => NodeKind::Binary(BinaryKind::Mul),
            "lessThan" => NodeKind::Binary(BinaryKind::Lt),
            "greaterThan" => NodeKind::Binary(BinaryKind::Gt),
            "isEqualExpression" => NodeKind::Binary(BinaryKind::Eq),
            "andExpression" => NodeKind::Binary(BinaryKind::And),
            "orExpression" => NodeKind::Binary(BinaryKind::Or),
            "methodCall" => NodeKind::MethodCall,
            "newID" => NodeKind::NewObject,
            "AllocateIdentifier" | "lengthMethod" | "newInt" => NodeKind::UnsupportedExpression,

            "argumentList" => NodeKind::ArgumentList,
            "argument" => NodeKind::Argument,
            "non_empty_argument_list" => NodeKind::NonEmptyArgumentList,
            "noArguments" => NodeKind::NoArguments,

            "assign" => NodeKind::Assign,
            "printMethod" => NodeKind::Print,
            "if" => NodeKind::If,
            "while" => NodeKind::While,
            "methodDeclaration" => NodeKind::MethodDeclaration,
            "array" => NodeKind::ArrayAssign,

            "block" | "statements" | "goal" | "mainClass" | "classDeclarations"
            | "classDeclaration" | "methodDeclarations" | "varDeclarations" | "varDeclaration"
            | "ParameterList" | "Parameters" | "Parameter" | "argument_list" | "elseHandler"
            | "elseBranch" | "Type" | "ArrayType" | "boolean" | "IntType" | "floatType"
            | "charType" | "varOrStatements" | "chooseParam" => NodeKind::Structural,

            t if t.contains("empty") => NodeKind::Structural,

            other => NodeKind::Other(other.to_string()),
        }
    }
}
