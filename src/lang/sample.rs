//! Small constructors for hand-built trees in tests.

use super::Node;

pub fn int(n: i64) -> Node {
    Node::leaf("intLiteral", n.to_string())
}

pub fn boolean(b: bool) -> Node {
    let tag = if b { "true" } else { "false" };
    Node::leaf(tag, tag)
}

pub fn ident(name: &str) -> Node {
    Node::leaf("Identifier", name)
}

pub fn this() -> Node {
    Node::with_children("This", vec![])
}

pub fn not(operand: Node) -> Node {
    Node::with_children("notExpression", vec![operand])
}

pub fn bin(tag: &str, left: Node, right: Node) -> Node {
    Node::with_children(tag, vec![left, right])
}

pub fn add(left: Node, right: Node) -> Node {
    bin("addExpression", left, right)
}

pub fn lt(left: Node, right: Node) -> Node {
    bin("lessThan", left, right)
}

pub fn gt(left: Node, right: Node) -> Node {
    bin("greaterThan", left, right)
}

pub fn assign(name: &str, value: Node) -> Node {
    Node::with_children("assign", vec![ident(name), value])
}

pub fn print(value: Node) -> Node {
    Node::with_children("printMethod", vec![value])
}

pub fn block(stmts: Vec<Node>) -> Node {
    Node::with_children("statements", stmts)
}

pub fn if_then(cond: Node, then: Node) -> Node {
    Node::with_children("if", vec![cond, then])
}

pub fn if_else(cond: Node, then: Node, otherwise: Node) -> Node {
    Node::with_children(
        "if",
        vec![cond, then, Node::with_children("elseBranch", vec![otherwise])],
    )
}

pub fn while_loop(cond: Node, body: Node) -> Node {
    Node::with_children("while", vec![cond, body])
}

/// `receiver.method(args...)` with arguments nested the way the parser nests them.
pub fn call(receiver: Node, method: &str, args: Vec<Node>) -> Node {
    let mut list = Node::with_children("noArguments", vec![]);
    for (i, arg) in args.into_iter().enumerate() {
        list = if i == 0 {
            Node::with_children("argument", vec![arg])
        } else {
            Node::with_children("argumentList", vec![list, arg])
        };
    }
    Node::with_children("methodCall", vec![receiver, ident(method), list])
}

pub fn new_object(class: &str) -> Node {
    Node::with_children("newID", vec![ident(class)])
}

/// `public int name() { body; return ret; }`; `ret = None` drops the return.
pub fn method(name: &str, body: Vec<Node>, ret: Option<Node>) -> Node {
    let mut children = vec![
        Node::with_children("IntType", vec![]),
        ident(name),
        Node::with_children("emptyParameters", vec![]),
        Node::with_children("varOrStatements", body),
    ];
    children.extend(ret);
    Node::with_children("methodDeclaration", children)
}

pub fn program(stmts: Vec<Node>) -> Node {
    Node::with_children(
        "goal",
        vec![Node::with_children("mainClass", vec![ident("Main"), block(stmts)])],
    )
}

pub fn class(name: &str, methods: Vec<Node>) -> Node {
    Node::with_children(
        "classDeclaration",
        vec![
            ident(name),
            Node::with_children("emptyVarDeclarations", vec![]),
            Node::with_children("methodDeclarations", methods),
        ],
    )
}

/// `program` followed by class declarations.
pub fn program_with_classes(stmts: Vec<Node>, classes: Vec<Node>) -> Node {
    let mut root = program(stmts);
    root.children
        .push(Node::with_children("classDeclarations", classes));
    root
}
