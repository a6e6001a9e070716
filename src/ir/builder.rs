use tracing::{debug, error, trace, warn};

use crate::ir::block::{BlockId, Cfg};
use crate::ir::compile_error::CompileError;
use crate::ir::instr::{Instr, Operand, TempId};
use crate::lang::{Node, NodeKind};

/// Result of one translation. The CFG is kept even on failure so it can still
/// be rendered for diagnostics; it must not be lowered in that case.
#[derive(Debug, Clone)]
pub struct Translation {
    pub cfg: Cfg,
    pub error: Option<CompileError>,
}

impl Translation {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Walks a validated tree and emits three-address code into basic blocks.
///
/// All counters live here, so independent builders never share state.
pub struct Builder {
    cfg: Cfg,
    current: Option<BlockId>,
    next_temp: u32,
    /// First fault. Once set, the builder does no further work.
    error: Option<CompileError>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            cfg: Cfg::new(),
            current: None,
            next_temp: 0,
            error: None,
        }
    }

    /// Translate a whole tree in one go.
    pub fn build(root: Option<&Node>) -> Result<Cfg, CompileError> {
        let mut builder = Builder::new();
        builder.start(root);
        let translation = builder.finish();
        match translation.error {
            Some(e) => Err(e),
            None => Ok(translation.cfg),
        }
    }

    /// Translate `root` into the CFG. An open final block gets an implicit `halt`.
    pub fn start(&mut self, root: Option<&Node>) {
        if self.error.is_some() {
            return;
        }

        let Some(root) = root else {
            self.fail(CompileError::MissingRoot);
            return;
        };

        self.current_block();

        match self.gen_stmt(root) {
            Ok(()) => {
                let at = self.current_block();
                if self.cfg.block(at).is_open() {
                    self.emit(Instr::Halt);
                }
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn finish(self) -> Translation {
        Translation {
            cfg: self.cfg,
            error: self.error,
        }
    }

    pub fn error(&self) -> Option<&CompileError> {
        self.error.as_ref()
    }

    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    fn fail(&mut self, e: CompileError) {
        error!("{}", e);
        error!("IR generation failed");
        self.error = Some(e);
    }

    // =========================================================================
    // Blocks and temporaries
    // =========================================================================

    fn current_block(&mut self) -> BlockId {
        match self.current {
            Some(id) => id,
            None => {
                let id = self.cfg.entry().unwrap_or_else(|| self.create_block());
                self.current = Some(id);
                id
            }
        }
    }

    fn create_block(&mut self) -> BlockId {
        let id = self.cfg.create_block();
        debug!(block = %id, "created block");
        id
    }

    fn new_temp(&mut self) -> Operand {
        let t = TempId(self.next_temp);
        self.next_temp += 1;
        t.into()
    }

    fn emit(&mut self, instr: Instr) {
        if self.error.is_some() {
            return;
        }
        let at = self.current_block();
        trace!(block = %at, instr = %instr, "emit");
        self.cfg.block_mut(at).push(instr);
    }

    /// Close the active block with `goto target` unless it already terminated.
    fn close_with_jump(&mut self, target: BlockId) {
        let at = self.current_block();
        if self.cfg.block(at).is_open() {
            self.cfg.link(at, Instr::Jump(target), target);
        }
    }

    fn required(node: &Node, index: usize) -> Result<&Node, CompileError> {
        node.child(index)
            .ok_or_else(|| CompileError::missing_child(node, index))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Translate an expression and return the slot holding its value.
    fn gen_exp(&mut self, node: &Node) -> Result<Operand, CompileError> {
        match node.kind() {
            NodeKind::IntLiteral => {
                let value = node
                    .text()
                    .parse::<i64>()
                    .map_err(|_| CompileError::invalid_literal(node))?;
                Ok(self.gen_const(value))
            }
            NodeKind::True => Ok(self.gen_const(1)),
            NodeKind::False => Ok(self.gen_const(0)),

            NodeKind::Identifier => Ok(Operand::Var(node.text().to_string())),
            NodeKind::This => Ok(Operand::Var("this".to_string())),

            NodeKind::Not => {
                let src = self.gen_exp(Self::required(node, 0)?)?;
                let dest = self.new_temp();
                self.emit(Instr::Not {
                    dest: dest.clone(),
                    src,
                });
                Ok(dest)
            }

            NodeKind::Binary(kind) => {
                // Left operand, side effects included, strictly before the right.
                let left = self.gen_exp(Self::required(node, 0)?)?;
                let right = self.gen_exp(Self::required(node, 1)?)?;
                let dest = self.new_temp();
                self.emit(Instr::Binary {
                    dest: dest.clone(),
                    op: kind.into(),
                    left,
                    right,
                });
                Ok(dest)
            }

            NodeKind::MethodCall => self.gen_call(node),

            NodeKind::NewObject => {
                let class = Self::required(node, 0)?;
                if class.kind() != NodeKind::Identifier {
                    return Err(CompileError::invalid_class_name(class));
                }
                let dest = self.new_temp();
                self.emit(Instr::New {
                    dest: dest.clone(),
                    class: class.text().to_string(),
                });
                Ok(dest)
            }

            NodeKind::UnsupportedExpression => {
                warn!(
                    line = node.lineno,
                    "IR generation for '{}' is not implemented",
                    node.tag()
                );
                Err(CompileError::no_value(node))
            }

            _ => Err(CompileError::unhandled(node)),
        }
    }

    fn gen_const(&mut self, value: i64) -> Operand {
        let dest = self.new_temp();
        self.emit(Instr::Const {
            dest: dest.clone(),
            value,
        });
        dest
    }

    fn gen_call(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let receiver_node = Self::required(node, 0)?;
        let method_node = Self::required(node, 1)?;
        if method_node.kind() != NodeKind::Identifier {
            return Err(CompileError::invalid_method_name(method_node));
        }

        let receiver = self.gen_exp(receiver_node)?;

        let mut args = Vec::new();
        if let Some(list) = node.child(2) {
            self.gen_args(list, &mut args)?;
        }

        let dest = self.new_temp();
        self.emit(Instr::Call {
            dest: dest.clone(),
            receiver,
            method: method_node.text().to_string(),
            args,
        });
        Ok(dest)
    }

    /// Flatten the parser's left-nested argument lists, left to right.
    fn gen_args(&mut self, node: &Node, args: &mut Vec<Operand>) -> Result<(), CompileError> {
        match node.kind() {
            NodeKind::ArgumentList => {
                if let Some(rest) = node.child(0) {
                    self.gen_args(rest, args)?;
                }
                args.push(self.gen_exp(Self::required(node, 1)?)?);
            }
            NodeKind::Argument => {
                args.push(self.gen_exp(Self::required(node, 0)?)?);
            }
            NodeKind::NonEmptyArgumentList => {
                if let Some(rest) = node.child(0) {
                    self.gen_args(rest, args)?;
                }
                if let Some(last) = node.child(1) {
                    args.push(self.gen_exp(last)?);
                }
            }
            NodeKind::NoArguments => {}
            _ => warn!(
                line = node.lineno,
                "unexpected node type in argument list: '{}'",
                node.tag()
            ),
        }
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn gen_stmt(&mut self, node: &Node) -> Result<(), CompileError> {
        match node.kind() {
            NodeKind::Assign => {
                let target = Self::required(node, 0)?;
                if target.kind() != NodeKind::Identifier {
                    return Err(CompileError::invalid_assign_target(target));
                }
                let src = self.gen_exp(Self::required(node, 1)?)?;
                self.emit(Instr::Copy {
                    dest: Operand::Var(target.text().to_string()),
                    src,
                });
            }

            NodeKind::Print => {
                let value = self.gen_exp(Self::required(node, 0)?)?;
                self.emit(Instr::Print(value));
            }

            NodeKind::If => self.gen_if(node)?,
            NodeKind::While => self.gen_while(node)?,
            NodeKind::MethodDeclaration => self.gen_method(node)?,

            NodeKind::Structural => {
                for child in &node.children {
                    self.gen_stmt(child)?;
                }
            }

            NodeKind::ArrayAssign => {
                warn!(
                    line = node.lineno,
                    "IR generation for array assignment is not implemented"
                );
            }

            // Declared names and similar leaves carry no code.
            NodeKind::Identifier | NodeKind::This | NodeKind::IntLiteral => {}

            _ => {
                warn!(
                    line = node.lineno,
                    "unhandled statement type: '{}'",
                    node.tag()
                );
                for child in &node.children {
                    self.gen_stmt(child)?;
                }
            }
        }
        Ok(())
    }

    fn gen_if(&mut self, node: &Node) -> Result<(), CompileError> {
        let cond = self.gen_exp(Self::required(node, 0)?)?;
        let then_stmt = Self::required(node, 1)?;
        let else_stmt = else_branch(node);

        let before = self.current_block();
        let then_b = self.create_block();
        let else_b = else_stmt.map(|_| self.create_block());
        let join_b = self.create_block();

        self.cfg.branch(before, cond, then_b, else_b.unwrap_or(join_b));

        self.current = Some(then_b);
        self.gen_stmt(then_stmt)?;
        self.close_with_jump(join_b);

        if let (Some(else_b), Some(else_stmt)) = (else_b, else_stmt) {
            self.current = Some(else_b);
            self.gen_stmt(else_stmt)?;
            self.close_with_jump(join_b);
        }

        self.current = Some(join_b);
        Ok(())
    }

    fn gen_while(&mut self, node: &Node) -> Result<(), CompileError> {
        let cond_b = self.create_block();
        let body_b = self.create_block();
        let exit_b = self.create_block();

        self.close_with_jump(cond_b);
        self.current = Some(cond_b);

        let cond = match Self::required(node, 0).and_then(|c| self.gen_exp(c)) {
            Ok(cond) => cond,
            Err(e) => {
                // Keep the graph well formed: the loop degrades to a jump past it.
                let at = self.current_block();
                self.cfg.link(at, Instr::Jump(exit_b), exit_b);
                self.current = Some(exit_b);
                return Err(e);
            }
        };

        let at = self.current_block();
        self.cfg.branch(at, cond, body_b, exit_b);

        self.current = Some(body_b);
        self.gen_stmt(Self::required(node, 1)?)?;
        self.close_with_jump(cond_b);

        self.current = Some(exit_b);
        Ok(())
    }

    fn gen_method(&mut self, node: &Node) -> Result<(), CompileError> {
        let name = node
            .child(1)
            .filter(|n| n.kind() == NodeKind::Identifier)
            .map(|n| n.text().to_string());

        self.enter_method_block();

        if let Some(name) = &name {
            self.emit(Instr::Marker(format!("Method Start: {}", name)));
        }

        if let Some(params) = node.child(2) {
            self.gen_stmt(params)?;
        }
        if let Some(body) = node.child(3) {
            self.gen_stmt(body)?;
        }

        let name = name.unwrap_or_default();
        let ret = match node.child(4) {
            Some(ret) if ret.kind() != NodeKind::Structural => ret,
            _ => return Err(CompileError::missing_return(&name, node.lineno)),
        };

        let value = self.gen_exp(ret)?;
        self.emit(Instr::Return(value));
        self.emit(Instr::Marker(format!("Method End: {}", name)));
        Ok(())
    }

    /// A method body starts its own block. Only a still untouched entry block
    /// is reused; any other open block is ended with `halt` first.
    fn enter_method_block(&mut self) {
        let at = self.current_block();
        let block = self.cfg.block(at);
        if self.cfg.len() == 1 && block.instrs.is_empty() {
            return;
        }
        if block.is_open() {
            self.emit(Instr::Halt);
        }
        let fresh = self.create_block();
        self.current = Some(fresh);
    }
}

/// Statement of an `if`'s else arm, when it has one.
fn else_branch(node: &Node) -> Option<&Node> {
    let mut handler = node.child(2)?;
    if handler.tag() == "elseHandler" {
        handler = handler.child(0)?;
    }
    if handler.tag() != "elseBranch" {
        return None;
    }
    handler.child(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::instr::BinOp;
    use crate::lang::sample::*;
    use std::collections::HashSet;

    fn t(n: u32) -> Operand {
        Operand::Temp(TempId(n))
    }

    fn v(name: &str) -> Operand {
        Operand::Var(name.to_string())
    }

    fn build(root: Node) -> Cfg {
        Builder::build(Some(&root)).expect("translation should succeed")
    }

    fn build_err(root: Node) -> Translation {
        let mut builder = Builder::new();
        builder.start(Some(&root));
        let translation = builder.finish();
        assert!(translation.error.is_some(), "expected a translation error");
        translation
    }

    /// Successor edges agree with the last instruction of each block.
    fn assert_well_formed(cfg: &Cfg) {
        for block in cfg.blocks() {
            assert!(block.succs.len() <= 2, "{} has too many successors", block.id);
            match (block.terminator(), block.succs.as_slice()) {
                (Some(Instr::BranchIfFalse { target, .. }), [_, on_false]) => {
                    assert_eq!(target, on_false, "{} false edge", block.id);
                }
                (Some(Instr::Jump(target)), [to]) => {
                    assert_eq!(target, to, "{} goto edge", block.id);
                }
                (Some(Instr::Return(_) | Instr::Halt), []) => {}
                (term, succs) => {
                    panic!("{}: terminator {:?} with succs {:?}", block.id, term, succs)
                }
            }
        }
    }

    #[test]
    fn test_assign_literal() {
        let cfg = build(program(vec![assign("x", int(2))]));

        assert_eq!(cfg.len(), 1);
        assert_eq!(
            cfg.block(BlockId(0)).instrs,
            vec![
                Instr::Const {
                    dest: t(0),
                    value: 2
                },
                Instr::Copy {
                    dest: v("x"),
                    src: t(0)
                },
                Instr::Halt,
            ]
        );
    }

    #[test]
    fn test_booleans_are_zero_and_one() {
        let cfg = build(program(vec![
            assign("a", boolean(true)),
            assign("b", boolean(false)),
        ]));
        let instrs = &cfg.block(BlockId(0)).instrs;

        assert_eq!(
            instrs[0],
            Instr::Const {
                dest: t(0),
                value: 1
            }
        );
        assert_eq!(
            instrs[2],
            Instr::Const {
                dest: t(1),
                value: 0
            }
        );
    }

    #[test]
    fn test_identifier_emits_nothing() {
        let cfg = build(program(vec![print(ident("x"))]));
        assert_eq!(
            cfg.block(BlockId(0)).instrs,
            vec![Instr::Print(v("x")), Instr::Halt]
        );
    }

    #[test]
    fn test_binary_and_not() {
        let cfg = build(program(vec![assign(
            "c",
            not(lt(ident("a"), add(ident("b"), int(1)))),
        )]));

        assert_eq!(
            cfg.block(BlockId(0)).instrs,
            vec![
                Instr::Const {
                    dest: t(0),
                    value: 1
                },
                Instr::Binary {
                    dest: t(1),
                    op: BinOp::Add,
                    left: v("b"),
                    right: t(0)
                },
                Instr::Binary {
                    dest: t(2),
                    op: BinOp::Lt,
                    left: v("a"),
                    right: t(1)
                },
                Instr::Not {
                    dest: t(3),
                    src: t(2)
                },
                Instr::Copy {
                    dest: v("c"),
                    src: t(3)
                },
                Instr::Halt,
            ]
        );
    }

    #[test]
    fn test_call_left_operand_first() {
        // x = this.a() + this.b()
        let cfg = build(program(vec![assign(
            "x",
            add(call(this(), "a", vec![]), call(this(), "b", vec![])),
        )]));

        let methods: Vec<&str> = cfg
            .block(BlockId(0))
            .instrs
            .iter()
            .filter_map(|i| match i {
                Instr::Call { method, .. } => Some(method.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(methods, vec!["a", "b"]);
    }

    #[test]
    fn test_call_arguments_in_order() {
        let cfg = build(program(vec![assign(
            "r",
            call(ident("obj"), "f", vec![int(1), ident("y"), int(3)]),
        )]));

        let call_instr = cfg
            .block(BlockId(0))
            .instrs
            .iter()
            .find(|i| matches!(i, Instr::Call { .. }))
            .cloned()
            .unwrap();
        assert_eq!(
            call_instr,
            Instr::Call {
                dest: t(2),
                receiver: v("obj"),
                method: "f".to_string(),
                args: vec![t(0), v("y"), t(1)],
            }
        );
    }

    #[test]
    fn test_new_object() {
        let cfg = build(program(vec![assign("o", new_object("Fac"))]));
        assert_eq!(
            cfg.block(BlockId(0)).instrs[0],
            Instr::New {
                dest: t(0),
                class: "Fac".to_string()
            }
        );
    }

    #[test]
    fn test_if_without_else() {
        let cfg = build(program(vec![if_then(ident("c"), print(int(1)))]));

        // 0: entry, 1: then, 2: join
        assert_eq!(cfg.len(), 3);
        assert_eq!(cfg.block(BlockId(0)).succs, vec![BlockId(1), BlockId(2)]);
        assert_eq!(
            cfg.block(BlockId(0)).terminator(),
            Some(&Instr::BranchIfFalse {
                cond: v("c"),
                target: BlockId(2)
            })
        );
        assert_eq!(
            cfg.block(BlockId(1)).terminator(),
            Some(&Instr::Jump(BlockId(2)))
        );
        assert_eq!(cfg.block(BlockId(2)).instrs, vec![Instr::Halt]);
        assert_well_formed(&cfg);
    }

    #[test]
    fn test_if_with_else() {
        let cfg = build(program(vec![if_else(
            gt(ident("x"), int(3)),
            print(int(1)),
            print(int(0)),
        )]));

        // 0: entry, 1: then, 2: else, 3: join
        assert_eq!(cfg.len(), 4);
        assert_eq!(cfg.block(BlockId(0)).succs, vec![BlockId(1), BlockId(2)]);
        assert_eq!(cfg.block(BlockId(1)).succs, vec![BlockId(3)]);
        assert_eq!(cfg.block(BlockId(2)).succs, vec![BlockId(3)]);
        assert_eq!(cfg.block(BlockId(3)).instrs, vec![Instr::Halt]);
        assert_well_formed(&cfg);
    }

    #[test]
    fn test_else_handler_wrapping() {
        let node = Node::with_children(
            "if",
            vec![
                ident("c"),
                print(int(1)),
                Node::with_children(
                    "elseHandler",
                    vec![Node::with_children("elseBranch", vec![print(int(2))])],
                ),
            ],
        );
        let cfg = build(program(vec![node]));
        assert_eq!(cfg.len(), 4);
        assert_well_formed(&cfg);
    }

    #[test]
    fn test_while_structure() {
        let cfg = build(program(vec![
            assign("x", int(0)),
            while_loop(
                lt(ident("x"), int(3)),
                block(vec![assign("x", add(ident("x"), int(1)))]),
            ),
        ]));

        // 0: entry, 1: cond, 2: body, 3: exit
        assert_eq!(cfg.len(), 4);
        assert_eq!(
            cfg.block(BlockId(0)).terminator(),
            Some(&Instr::Jump(BlockId(1)))
        );
        assert_eq!(cfg.block(BlockId(1)).succs, vec![BlockId(2), BlockId(3)]);
        assert_eq!(
            cfg.block(BlockId(2)).terminator(),
            Some(&Instr::Jump(BlockId(1)))
        );
        assert_eq!(cfg.block(BlockId(3)).instrs, vec![Instr::Halt]);
        assert_well_formed(&cfg);
    }

    #[test]
    fn test_nested_control_flow_is_well_formed() {
        let cfg = build(program(vec![while_loop(
            lt(ident("i"), int(10)),
            block(vec![
                if_else(
                    gt(ident("i"), int(5)),
                    while_loop(ident("k"), print(ident("k"))),
                    print(ident("i")),
                ),
                assign("i", add(ident("i"), int(1))),
            ]),
        )]));
        assert_well_formed(&cfg);
    }

    #[test]
    fn test_temporaries_unique_across_blocks() {
        let cfg = build(program(vec![
            assign("a", int(1)),
            if_else(ident("a"), assign("b", int(2)), assign("b", int(3))),
            while_loop(lt(ident("b"), int(9)), assign("b", add(ident("b"), int(1)))),
        ]));

        let mut seen = HashSet::new();
        for block in cfg.blocks() {
            for instr in &block.instrs {
                let dest = match instr {
                    Instr::Const { dest, .. }
                    | Instr::Not { dest, .. }
                    | Instr::Binary { dest, .. }
                    | Instr::Call { dest, .. }
                    | Instr::New { dest, .. } => dest,
                    _ => continue,
                };
                assert!(seen.insert(dest.clone()), "{} assigned twice", dest);
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_method_declaration() {
        let cfg = build(Node::with_children(
            "methodDeclarations",
            vec![method("get", vec![assign("r", int(4))], Some(ident("r")))],
        ));

        assert_eq!(
            cfg.block(BlockId(0)).instrs,
            vec![
                Instr::Marker("Method Start: get".to_string()),
                Instr::Const {
                    dest: t(0),
                    value: 4
                },
                Instr::Copy {
                    dest: v("r"),
                    src: t(0)
                },
                Instr::Return(v("r")),
                Instr::Marker("Method End: get".to_string()),
            ]
        );
    }

    fn two_method_class() -> Node {
        // main { print 1 }
        // class A { f() { return 1 } g() { print 5; while (i < 3) i = i + 1; return i } }
        program_with_classes(
            vec![print(int(1))],
            vec![class(
                "A",
                vec![
                    method("f", vec![], Some(int(1))),
                    method(
                        "g",
                        vec![
                            print(int(5)),
                            while_loop(
                                lt(ident("i"), int(3)),
                                assign("i", add(ident("i"), int(1))),
                            ),
                        ],
                        Some(ident("i")),
                    ),
                ],
            )],
        )
    }

    #[test]
    fn test_methods_start_in_their_own_block() {
        let cfg = build(two_method_class());
        assert_well_formed(&cfg);

        for block in cfg.blocks() {
            let real: Vec<&Instr> = block
                .instrs
                .iter()
                .filter(|i| !matches!(i, Instr::Marker(_)))
                .collect();
            if let Some(pos) = real.iter().position(|i| i.is_terminator()) {
                assert_eq!(
                    pos,
                    real.len() - 1,
                    "{} has instructions after its terminator",
                    block.id
                );
            }
        }

        // main ends before the first method
        let main = cfg.block(BlockId(0));
        assert_eq!(main.instrs.last(), Some(&Instr::Halt));
        assert!(
            !main
                .instrs
                .iter()
                .any(|i| matches!(i, Instr::Marker(_)))
        );

        assert_eq!(
            cfg.block(BlockId(1)).instrs.first(),
            Some(&Instr::Marker("Method Start: f".to_string()))
        );
        assert_eq!(
            cfg.block(BlockId(2)).instrs.first(),
            Some(&Instr::Marker("Method Start: g".to_string()))
        );
    }

    #[test]
    fn test_method_without_return_is_rejected() {
        let translation = build_err(method("get", vec![print(int(1))], None));
        assert!(matches!(
            translation.error,
            Some(CompileError::MissingReturn { ref method, .. }) if method == "get"
        ));
    }

    #[test]
    fn test_missing_root() {
        let mut builder = Builder::new();
        builder.start(None);
        let translation = builder.finish();

        assert_eq!(translation.error, Some(CompileError::MissingRoot));
        assert!(translation.cfg.is_empty());
    }

    #[test]
    fn test_error_is_sticky() {
        let translation = build_err(program(vec![
            print(int(1)),
            print(Node::with_children("mysteryExpression", vec![])),
            print(int(2)),
        ]));

        assert!(matches!(
            translation.error,
            Some(CompileError::UnhandledExpression { .. })
        ));
        // Nothing after the fault, not even the implicit halt.
        assert_eq!(
            translation.cfg.block(BlockId(0)).instrs,
            vec![
                Instr::Const {
                    dest: t(0),
                    value: 1
                },
                Instr::Print(t(0)),
            ]
        );
    }

    #[test]
    fn test_builder_ignores_start_after_failure() {
        let mut builder = Builder::new();
        builder.start(None);
        builder.start(Some(&program(vec![print(int(1))])));

        assert_eq!(builder.error(), Some(&CompileError::MissingRoot));
        assert!(builder.cfg().is_empty());
    }

    #[test]
    fn test_while_condition_failure_degrades_to_jump() {
        let translation = build_err(program(vec![while_loop(
            Node::with_children("lengthMethod", vec![ident("arr")]),
            print(int(1)),
        )]));

        assert!(matches!(
            translation.error,
            Some(CompileError::NoValue { .. })
        ));
        let cond = translation.cfg.block(BlockId(1));
        assert_eq!(cond.instrs, vec![Instr::Jump(BlockId(3))]);
        assert_eq!(cond.succs, vec![BlockId(3)]);
    }

    #[test]
    fn test_assign_to_non_identifier() {
        let node = Node::with_children("assign", vec![int(1), int(2)]);
        let translation = build_err(node);
        assert!(matches!(
            translation.error,
            Some(CompileError::InvalidAssignTarget { .. })
        ));
    }

    #[test]
    fn test_missing_child() {
        let translation = build_err(Node::with_children("printMethod", vec![]));
        assert!(matches!(
            translation.error,
            Some(CompileError::MissingChild { index: 0, .. })
        ));
    }

    #[test]
    fn test_array_assignment_only_warns() {
        let cfg = build(program(vec![
            Node::with_children("array", vec![ident("a"), int(0), int(1)]),
            print(int(7)),
        ]));
        assert_eq!(cfg.block(BlockId(0)).instrs.len(), 3);
    }

    #[test]
    fn test_unknown_statement_is_traversed() {
        let cfg = build(Node::with_children(
            "somethingNew",
            vec![print(int(5))],
        ));
        assert_eq!(cfg.block(BlockId(0)).instrs.len(), 3);
    }
}
