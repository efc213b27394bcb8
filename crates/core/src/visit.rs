//! Tree traversal.
//!
//! Two protocols, both defined outside the node types so new consumers do
//! not touch `ast.rs`:
//!
//! - [`Listener`] gets `enter_*`/`exit_*` callbacks from [`walk`], a
//!   depth-first walk over children in source order.
//! - [`Visitor`] computes a value per node; [`Accept::accept`] dispatches a
//!   node to the matching `visit_*` method and the visitor decides how (and
//!   whether) to descend.

use crate::ast::{
    Actor, ArgMap, Artifact, Assignable, ExecInputs, ExecStmt, Expr, FunctionDecl,
    IdentityTarget, Literal, MapItem, MapValue, NodeKind, Program, Reference, Stmt, StmtBlock,
    UtilityActor,
};

// ── Listener ──────────────────────────────────────────────────────────────────

/// Enter/exit callbacks. Every method defaults to doing nothing.
#[allow(unused_variables)]
pub trait Listener {
    fn enter_program(&mut self, program: &Program) {}
    fn exit_program(&mut self, program: &Program) {}
    fn enter_function(&mut self, function: &FunctionDecl) {}
    fn exit_function(&mut self, function: &FunctionDecl) {}
    fn enter_block(&mut self, block: &StmtBlock) {}
    fn exit_block(&mut self, block: &StmtBlock) {}
    fn enter_stmt(&mut self, stmt: &Stmt) {}
    fn exit_stmt(&mut self, stmt: &Stmt) {}
    fn enter_actor(&mut self, actor: &Actor) {}
    fn exit_actor(&mut self, actor: &Actor) {}
    fn enter_utility(&mut self, utility: &UtilityActor) {}
    fn exit_utility(&mut self, utility: &UtilityActor) {}
    fn enter_expr(&mut self, expr: &Expr) {}
    fn exit_expr(&mut self, expr: &Expr) {}
    fn enter_arg_map(&mut self, map: &ArgMap) {}
    fn exit_arg_map(&mut self, map: &ArgMap) {}
    fn enter_map_item(&mut self, item: &MapItem) {}
    fn exit_map_item(&mut self, item: &MapItem) {}
    fn enter_artifact(&mut self, artifact: &Artifact) {}
    fn exit_artifact(&mut self, artifact: &Artifact) {}
    fn enter_literal(&mut self, literal: &Literal) {}
    fn exit_literal(&mut self, literal: &Literal) {}
}

/// Walk a whole program: functions in declaration order, then the body.
pub fn walk<L: Listener + ?Sized>(program: &Program, listener: &mut L) {
    listener.enter_program(program);
    for function in &program.functions {
        listener.enter_function(function);
        walk_block(&function.body, listener);
        listener.exit_function(function);
    }
    walk_block(&program.body, listener);
    listener.exit_program(program);
}

pub fn walk_block<L: Listener + ?Sized>(block: &StmtBlock, listener: &mut L) {
    listener.enter_block(block);
    for stmt in &block.statements {
        walk_stmt(stmt, listener);
    }
    listener.exit_block(block);
}

pub fn walk_stmt<L: Listener + ?Sized>(stmt: &Stmt, listener: &mut L) {
    listener.enter_stmt(stmt);
    match stmt {
        Stmt::Assignment(assignment) => match &assignment.value {
            Assignable::Expression(expr) => walk_expr(expr, listener),
            Assignable::Artifact(artifact) => walk_artifact(artifact, listener),
            Assignable::ArgMap(map) => walk_arg_map(map, listener),
            Assignable::Actor(actor) => walk_actor(actor, listener),
            Assignable::Literal(literal) => walk_literal(literal, listener),
        },
        Stmt::Execution(ExecStmt::Print { actor, .. }) => walk_actor(actor, listener),
        Stmt::Execution(ExecStmt::Execute { actor, inputs, .. }) => {
            walk_actor(actor, listener);
            if let ExecInputs::Map(map) = inputs {
                walk_arg_map(map, listener);
            }
        }
        Stmt::Return(_) => {}
    }
    listener.exit_stmt(stmt);
}

pub fn walk_actor<L: Listener + ?Sized>(actor: &Actor, listener: &mut L) {
    listener.enter_actor(actor);
    match actor {
        Actor::Atomic { source, .. } => walk_reference(source, listener),
        Actor::Utility(utility) => walk_utility(utility, listener),
        Actor::Sequence { first, second, .. } | Actor::Parallel { first, second, .. } => {
            walk_actor(first, listener);
            walk_actor(second, listener);
        }
        Actor::IfThenElse {
            condition,
            then_actor,
            else_actor,
            ..
        } => {
            walk_expr(condition, listener);
            walk_actor(then_actor, listener);
            walk_actor(else_actor, listener);
        }
        Actor::Iterative { body, .. } => walk_actor(body, listener),
        Actor::Parenthesized { inner, .. } => walk_actor(inner, listener),
        Actor::FunctionCall { .. } | Actor::Alias(_) => {}
    }
    listener.exit_actor(actor);
}

fn walk_utility<L: Listener + ?Sized>(utility: &UtilityActor, listener: &mut L) {
    listener.enter_utility(utility);
    match utility {
        UtilityActor::Joiner { merge, .. } => walk_arg_map(merge, listener),
        UtilityActor::Copy { map, .. } | UtilityActor::Rename { map, .. } => {
            walk_arg_map(map, listener)
        }
        UtilityActor::Identity { target, .. } => match target {
            IdentityTarget::Actor(actor) => walk_actor(actor, listener),
            IdentityTarget::Map(map) => walk_arg_map(map, listener),
        },
        UtilityActor::TestSpecToSpec { .. } | UtilityActor::SpecToTestSpec { .. } => {}
    }
    listener.exit_utility(utility);
}

pub fn walk_expr<L: Listener + ?Sized>(expr: &Expr, listener: &mut L) {
    listener.enter_expr(expr);
    match expr {
        Expr::Not { operand, .. } => walk_expr(operand, listener),
        Expr::Parenthesized { inner, .. } => walk_expr(inner, listener),
        Expr::Binary { left, right, .. } => {
            walk_expr(left, listener);
            walk_expr(right, listener);
        }
        Expr::InstanceOf { .. } | Expr::ElementOf { .. } | Expr::Alias(_) => {}
    }
    listener.exit_expr(expr);
}

fn walk_arg_map<L: Listener + ?Sized>(map: &ArgMap, listener: &mut L) {
    listener.enter_arg_map(map);
    for item in &map.items {
        listener.enter_map_item(item);
        if let Some(MapValue::Artifact(artifact)) = &item.value {
            walk_artifact(artifact, listener);
        }
        listener.exit_map_item(item);
    }
    listener.exit_arg_map(map);
}

fn walk_artifact<L: Listener + ?Sized>(artifact: &Artifact, listener: &mut L) {
    listener.enter_artifact(artifact);
    if let Artifact::Literal { source, .. } = artifact {
        walk_reference(source, listener);
    }
    listener.exit_artifact(artifact);
}

// A string source is a Literal node; a name source is a plain identifier.
fn walk_reference<L: Listener + ?Sized>(reference: &Reference, listener: &mut L) {
    if let Reference::Literal(literal) = reference {
        walk_literal(literal, listener);
    }
}

fn walk_literal<L: Listener + ?Sized>(literal: &Literal, listener: &mut L) {
    listener.enter_literal(literal);
    listener.exit_literal(literal);
}

// ── Visitor ───────────────────────────────────────────────────────────────────

/// Bottom-up computation over the tree. Implementations recurse by calling
/// `accept` on the children they care about.
pub trait Visitor {
    type Output;

    fn visit_program(&mut self, program: &Program) -> Self::Output;
    fn visit_function(&mut self, function: &FunctionDecl) -> Self::Output;
    fn visit_block(&mut self, block: &StmtBlock) -> Self::Output;
    fn visit_stmt(&mut self, stmt: &Stmt) -> Self::Output;
    fn visit_actor(&mut self, actor: &Actor) -> Self::Output;
    fn visit_utility(&mut self, utility: &UtilityActor) -> Self::Output;
    fn visit_expr(&mut self, expr: &Expr) -> Self::Output;
    fn visit_arg_map(&mut self, map: &ArgMap) -> Self::Output;
    fn visit_artifact(&mut self, artifact: &Artifact) -> Self::Output;
}

pub trait Accept {
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
}

macro_rules! accept_via {
    ($($node:ty => $method:ident),+ $(,)?) => {
        $(
            impl Accept for $node {
                fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }
            }
        )+
    };
}

accept_via! {
    Program => visit_program,
    FunctionDecl => visit_function,
    StmtBlock => visit_block,
    Stmt => visit_stmt,
    Actor => visit_actor,
    UtilityActor => visit_utility,
    Expr => visit_expr,
    ArgMap => visit_arg_map,
    Artifact => visit_artifact,
}

// ── Node-kind walk ────────────────────────────────────────────────────────────

#[derive(Default)]
struct KindCollector {
    kinds: Vec<NodeKind>,
}

impl Listener for KindCollector {
    fn enter_program(&mut self, _: &Program) {
        self.kinds.push(NodeKind::Program);
    }
    fn enter_function(&mut self, _: &FunctionDecl) {
        self.kinds.push(NodeKind::FunctionDeclaration);
    }
    fn enter_block(&mut self, _: &StmtBlock) {
        self.kinds.push(NodeKind::StatementBlock);
    }
    fn enter_stmt(&mut self, stmt: &Stmt) {
        self.kinds.push(stmt.kind());
    }
    fn enter_actor(&mut self, actor: &Actor) {
        self.kinds.push(actor.kind());
    }
    fn enter_utility(&mut self, utility: &UtilityActor) {
        self.kinds.push(utility.kind());
    }
    fn enter_expr(&mut self, expr: &Expr) {
        self.kinds.push(expr.kind());
    }
    fn enter_arg_map(&mut self, _: &ArgMap) {
        self.kinds.push(NodeKind::ArgumentMap);
    }
    fn enter_map_item(&mut self, _: &MapItem) {
        self.kinds.push(NodeKind::MapItem);
    }
    fn enter_artifact(&mut self, artifact: &Artifact) {
        self.kinds.push(artifact.kind());
    }
    fn enter_literal(&mut self, _: &Literal) {
        self.kinds.push(NodeKind::Literal);
    }
}

/// Node kinds in pre-order. Two parses of the same text give equal vectors.
pub fn preorder_kinds(program: &Program) -> Vec<NodeKind> {
    let mut collector = KindCollector::default();
    walk(program, &mut collector);
    collector.kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[derive(Default)]
    struct Balance {
        depth: i32,
        max_depth: i32,
        events: Vec<String>,
    }

    impl Listener for Balance {
        fn enter_actor(&mut self, actor: &Actor) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            self.events.push(format!("+{}", actor.kind()));
        }
        fn exit_actor(&mut self, actor: &Actor) {
            self.depth -= 1;
            self.events.push(format!("-{}", actor.kind()));
        }
    }

    #[test]
    fn enter_and_exit_are_paired_in_source_order() {
        let program = parse_source("x = SEQUENCE(a, PARALLEL(b, c));").unwrap();
        let mut balance = Balance::default();
        walk(&program, &mut balance);
        assert_eq!(balance.depth, 0);
        assert_eq!(balance.max_depth, 3);
        assert_eq!(
            balance.events,
            vec![
                "+Sequence",
                "+ActorAlias",
                "-ActorAlias",
                "+Parallel",
                "+ActorAlias",
                "-ActorAlias",
                "+ActorAlias",
                "-ActorAlias",
                "-Parallel",
                "-Sequence",
            ]
        );
    }

    #[test]
    fn preorder_covers_every_node() {
        let program = parse_source(
            "fun f(p) { return p; }\n\
             v = ITE(NOT ok, Copy({'a': ArtifactFactory.create(CProgram, \"x.c\")}), f(v));",
        )
        .unwrap();
        assert_eq!(
            preorder_kinds(&program),
            vec![
                NodeKind::Program,
                NodeKind::FunctionDeclaration,
                NodeKind::StatementBlock,
                NodeKind::ReturnStatement,
                NodeKind::StatementBlock,
                NodeKind::AssignmentStatement,
                NodeKind::IfThenElse,
                NodeKind::Not,
                NodeKind::ExpressionAlias,
                NodeKind::Utility,
                NodeKind::Copy,
                NodeKind::ArgumentMap,
                NodeKind::MapItem,
                NodeKind::ArtifactLiteral,
                NodeKind::Literal,
                NodeKind::FunctionCall,
            ]
        );
    }

    struct CountActors;

    impl Visitor for CountActors {
        type Output = usize;

        fn visit_program(&mut self, program: &Program) -> usize {
            program.functions.iter().map(|f| f.accept(self)).sum::<usize>()
                + program.body.accept(self)
        }
        fn visit_function(&mut self, function: &FunctionDecl) -> usize {
            function.body.accept(self)
        }
        fn visit_block(&mut self, block: &StmtBlock) -> usize {
            block.statements.iter().map(|s| s.accept(self)).sum()
        }
        fn visit_stmt(&mut self, stmt: &Stmt) -> usize {
            match stmt {
                Stmt::Assignment(a) => match &a.value {
                    Assignable::Actor(actor) => actor.accept(self),
                    _ => 0,
                },
                Stmt::Execution(ExecStmt::Print { actor, .. })
                | Stmt::Execution(ExecStmt::Execute { actor, .. }) => actor.accept(self),
                Stmt::Return(_) => 0,
            }
        }
        fn visit_actor(&mut self, actor: &Actor) -> usize {
            1 + match actor {
                Actor::Sequence { first, second, .. } | Actor::Parallel { first, second, .. } => {
                    first.accept(self) + second.accept(self)
                }
                Actor::IfThenElse {
                    then_actor,
                    else_actor,
                    ..
                } => then_actor.accept(self) + else_actor.accept(self),
                Actor::Iterative { body, .. } => body.accept(self),
                Actor::Parenthesized { inner, .. } => inner.accept(self),
                Actor::Utility(u) => u.accept(self),
                _ => 0,
            }
        }
        fn visit_utility(&mut self, utility: &UtilityActor) -> usize {
            match utility {
                UtilityActor::Identity {
                    target: IdentityTarget::Actor(actor),
                    ..
                } => actor.accept(self),
                _ => 0,
            }
        }
        fn visit_expr(&mut self, _: &Expr) -> usize {
            0
        }
        fn visit_arg_map(&mut self, _: &ArgMap) -> usize {
            0
        }
        fn visit_artifact(&mut self, _: &Artifact) -> usize {
            0
        }
    }

    #[test]
    fn accept_computes_bottom_up() {
        let program =
            parse_source("fun g() { print(Identity(a)); } x = REPEAT('i', (SEQUENCE(a, b)));")
                .unwrap();
        // Identity, its alias, REPEAT, the parenthesis, SEQUENCE and its two aliases
        assert_eq!(program.accept(&mut CountActors), 7);
    }
}
