//! Parse tree produced by the parser.
//!
//! One sum type per polymorphic grammar rule, one variant per alternative.
//! Children are owned (`Box`/`Vec`), so a `Program` is a single rooted tree.
//! Nodes keep the position of the token that selected their alternative.

use std::fmt;

use serde::Serialize;

use crate::lexer::{unquote, Position};

// ──────────────────────────────────────────────
// Leaves
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeName {
    pub name: String,
    pub pos: Position,
}

/// A `STRING` token, kept as written (quotes included for quoted strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub raw: String,
    pub pos: Position,
}

impl Literal {
    pub fn value(&self) -> String {
        unquote(&self.raw)
    }
}

/// The `(ID | STRING)` source argument of the factory calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Reference {
    Name(Ident),
    Literal(Literal),
}

impl Reference {
    pub fn pos(&self) -> Position {
        match self {
            Reference::Name(id) => id.pos,
            Reference::Literal(lit) => lit.pos,
        }
    }
}

// ──────────────────────────────────────────────
// Program structure
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
    pub body: StmtBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: StmtBlock,
    /// Position of `fun`.
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StmtBlock {
    pub statements: Vec<Stmt>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Assignment(Assignment),
    Execution(ExecStmt),
    Return(ReturnStmt),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: Ident,
    pub value: Assignable,
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Assignable {
    Expression(Expr),
    Artifact(Artifact),
    ArgMap(ArgMap),
    Actor(Actor),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExecStmt {
    Print {
        actor: Actor,
        pos: Position,
    },
    Execute {
        actor: Actor,
        inputs: ExecInputs,
        pos: Position,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExecInputs {
    Name(Ident),
    Map(ArgMap),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnStmt {
    pub value: Ident,
    pub pos: Position,
}

// ──────────────────────────────────────────────
// Actors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Actor {
    Atomic {
        actor_type: TypeName,
        source: Reference,
        pos: Position,
    },
    FunctionCall {
        name: Ident,
        args: Vec<Ident>,
    },
    Utility(UtilityActor),
    /// `first` runs before `second`.
    Sequence {
        first: Box<Actor>,
        second: Box<Actor>,
        pos: Position,
    },
    IfThenElse {
        condition: Expr,
        then_actor: Box<Actor>,
        else_actor: Box<Actor>,
        pos: Position,
    },
    /// `REPEAT('var', body)`
    Iterative {
        variable: Ident,
        body: Box<Actor>,
        pos: Position,
    },
    Parallel {
        first: Box<Actor>,
        second: Box<Actor>,
        pos: Position,
    },
    Alias(Ident),
    Parenthesized {
        inner: Box<Actor>,
        pos: Position,
    },
}

impl Actor {
    pub fn pos(&self) -> Position {
        match self {
            Actor::Atomic { pos, .. }
            | Actor::Sequence { pos, .. }
            | Actor::IfThenElse { pos, .. }
            | Actor::Iterative { pos, .. }
            | Actor::Parallel { pos, .. }
            | Actor::Parenthesized { pos, .. } => *pos,
            Actor::FunctionCall { name, .. } => name.pos,
            Actor::Utility(u) => u.pos(),
            Actor::Alias(id) => id.pos,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Actor::Atomic { .. } => NodeKind::Atomic,
            Actor::FunctionCall { .. } => NodeKind::FunctionCall,
            Actor::Utility(_) => NodeKind::Utility,
            Actor::Sequence { .. } => NodeKind::Sequence,
            Actor::IfThenElse { .. } => NodeKind::IfThenElse,
            Actor::Iterative { .. } => NodeKind::Iterative,
            Actor::Parallel { .. } => NodeKind::Parallel,
            Actor::Alias(_) => NodeKind::ActorAlias,
            Actor::Parenthesized { .. } => NodeKind::ParenthesizedActor,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Actor {
        let mut actor = self;
        while let Actor::Parenthesized { inner, .. } = actor {
            actor = inner;
        }
        actor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UtilityActor {
    Joiner {
        artifact_type: TypeName,
        merge: ArgMap,
        output: Ident,
        pos: Position,
    },
    Copy {
        map: ArgMap,
        pos: Position,
    },
    Rename {
        map: ArgMap,
        pos: Position,
    },
    TestSpecToSpec {
        pos: Position,
    },
    SpecToTestSpec {
        pos: Position,
    },
    Identity {
        target: IdentityTarget,
        pos: Position,
    },
}

impl UtilityActor {
    pub fn pos(&self) -> Position {
        match self {
            UtilityActor::Joiner { pos, .. }
            | UtilityActor::Copy { pos, .. }
            | UtilityActor::Rename { pos, .. }
            | UtilityActor::TestSpecToSpec { pos }
            | UtilityActor::SpecToTestSpec { pos }
            | UtilityActor::Identity { pos, .. } => *pos,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            UtilityActor::Joiner { .. } => NodeKind::Joiner,
            UtilityActor::Copy { .. } => NodeKind::Copy,
            UtilityActor::Rename { .. } => NodeKind::Rename,
            UtilityActor::TestSpecToSpec { .. } => NodeKind::TestSpecToSpec,
            UtilityActor::SpecToTestSpec { .. } => NodeKind::SpecToTestSpec,
            UtilityActor::Identity { .. } => NodeKind::Identity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IdentityTarget {
    Actor(Box<Actor>),
    Map(ArgMap),
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    And,
    Or,
    Eq,
    NotEq,
}

impl BinOp {
    pub fn from_lexeme(text: &str) -> Option<BinOp> {
        match text {
            "AND" => Some(BinOp::And),
            "OR" => Some(BinOp::Or),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::NotEq),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::And => "AND",
            BinOp::Or => "OR",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    True,
    False,
    Unknown,
    Error,
}

impl Verdict {
    pub fn from_lexeme(text: &str) -> Option<Verdict> {
        match text {
            "TRUE" => Some(Verdict::True),
            "FALSE" => Some(Verdict::False),
            "UNKNOWN" => Some(Verdict::Unknown),
            "ERROR" => Some(Verdict::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::True => "TRUE",
            Verdict::False => "FALSE",
            Verdict::Unknown => "UNKNOWN",
            Verdict::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Not {
        operand: Box<Expr>,
        pos: Position,
    },
    InstanceOf {
        subject: Ident,
        artifact_type: TypeName,
        pos: Position,
    },
    ElementOf {
        subject: Ident,
        verdicts: Vec<Verdict>,
        pos: Position,
    },
    Alias(Ident),
    Parenthesized {
        inner: Box<Expr>,
        pos: Position,
    },
    /// Chains fold to the left: `a OR b OR c` is `(a OR b) OR c`.
    Binary {
        left: Box<Expr>,
        op: BinOp,
        op_pos: Position,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn pos(&self) -> Position {
        match self {
            Expr::Not { pos, .. }
            | Expr::InstanceOf { pos, .. }
            | Expr::ElementOf { pos, .. }
            | Expr::Parenthesized { pos, .. } => *pos,
            Expr::Alias(id) => id.pos,
            Expr::Binary { left, .. } => left.pos(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Not { .. } => NodeKind::Not,
            Expr::InstanceOf { .. } => NodeKind::InstanceOf,
            Expr::ElementOf { .. } => NodeKind::ElementOf,
            Expr::Alias(_) => NodeKind::ExpressionAlias,
            Expr::Parenthesized { .. } => NodeKind::ParenthesizedExpression,
            Expr::Binary { .. } => NodeKind::BinaryLogical,
        }
    }
}

// ──────────────────────────────────────────────
// Argument maps and artifacts
// ──────────────────────────────────────────────

/// `{ 'key': value, ... }` with at least one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgMap {
    pub items: Vec<MapItem>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapItem {
    pub key: Ident,
    pub value: Option<MapValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MapValue {
    Artifact(Artifact),
    ArtifactType(TypeName),
    Quoted(Ident),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Artifact {
    Literal {
        artifact_type: TypeName,
        source: Reference,
        pos: Position,
    },
    Alias(Ident),
}

impl Artifact {
    pub fn pos(&self) -> Position {
        match self {
            Artifact::Literal { pos, .. } => *pos,
            Artifact::Alias(id) => id.pos,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Artifact::Literal { .. } => NodeKind::ArtifactLiteral,
            Artifact::Alias(_) => NodeKind::ArtifactAlias,
        }
    }
}

// ──────────────────────────────────────────────
// Node kinds
// ──────────────────────────────────────────────

/// Discriminant of every node a walk visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Program,
    FunctionDeclaration,
    StatementBlock,
    AssignmentStatement,
    PrintActor,
    ExecuteActor,
    ReturnStatement,
    Atomic,
    FunctionCall,
    Utility,
    Sequence,
    IfThenElse,
    Iterative,
    Parallel,
    ActorAlias,
    ParenthesizedActor,
    Joiner,
    Copy,
    Rename,
    TestSpecToSpec,
    SpecToTestSpec,
    Identity,
    Not,
    InstanceOf,
    ElementOf,
    ExpressionAlias,
    ParenthesizedExpression,
    BinaryLogical,
    ArgumentMap,
    MapItem,
    ArtifactLiteral,
    ArtifactAlias,
    Literal,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::StatementBlock => "StatementBlock",
            NodeKind::AssignmentStatement => "AssignmentStatement",
            NodeKind::PrintActor => "PrintActor",
            NodeKind::ExecuteActor => "ExecuteActor",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::Atomic => "Atomic",
            NodeKind::FunctionCall => "FunctionCall",
            NodeKind::Utility => "Utility",
            NodeKind::Sequence => "Sequence",
            NodeKind::IfThenElse => "IfThenElse",
            NodeKind::Iterative => "Iterative",
            NodeKind::Parallel => "Parallel",
            NodeKind::ActorAlias => "ActorAlias",
            NodeKind::ParenthesizedActor => "ParenthesizedActor",
            NodeKind::Joiner => "Joiner",
            NodeKind::Copy => "Copy",
            NodeKind::Rename => "Rename",
            NodeKind::TestSpecToSpec => "TestSpecToSpec",
            NodeKind::SpecToTestSpec => "SpecToTestSpec",
            NodeKind::Identity => "Identity",
            NodeKind::Not => "Not",
            NodeKind::InstanceOf => "InstanceOf",
            NodeKind::ElementOf => "ElementOf",
            NodeKind::ExpressionAlias => "ExpressionAlias",
            NodeKind::ParenthesizedExpression => "ParenthesizedExpression",
            NodeKind::BinaryLogical => "BinaryLogical",
            NodeKind::ArgumentMap => "ArgumentMap",
            NodeKind::MapItem => "MapItem",
            NodeKind::ArtifactLiteral => "ArtifactLiteral",
            NodeKind::ArtifactAlias => "ArtifactAlias",
            NodeKind::Literal => "Literal",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::Assignment(_) => NodeKind::AssignmentStatement,
            Stmt::Execution(ExecStmt::Print { .. }) => NodeKind::PrintActor,
            Stmt::Execution(ExecStmt::Execute { .. }) => NodeKind::ExecuteActor,
            Stmt::Return(_) => NodeKind::ReturnStatement,
        }
    }

    pub fn pos(&self) -> Position {
        match self {
            Stmt::Assignment(a) => a.target.pos,
            Stmt::Execution(ExecStmt::Print { pos, .. })
            | Stmt::Execution(ExecStmt::Execute { pos, .. }) => *pos,
            Stmt::Return(r) => r.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Ident {
        Ident {
            name: name.to_owned(),
            pos: Position::start(),
        }
    }

    #[test]
    fn unparenthesized_strips_every_layer() {
        let alias = Actor::Alias(id("a"));
        let wrapped = Actor::Parenthesized {
            inner: Box::new(Actor::Parenthesized {
                inner: Box::new(alias.clone()),
                pos: Position::start(),
            }),
            pos: Position::start(),
        };
        assert_eq!(wrapped.kind(), NodeKind::ParenthesizedActor);
        assert_eq!(wrapped.unparenthesized(), &alias);
    }

    #[test]
    fn literal_value_unquotes() {
        let lit = Literal {
            raw: "\"tools/cpachecker.yml\"".to_owned(),
            pos: Position::start(),
        };
        assert_eq!(lit.value(), "tools/cpachecker.yml");
    }

    #[test]
    fn operator_and_verdict_lexemes() {
        assert_eq!(BinOp::from_lexeme("!="), Some(BinOp::NotEq));
        assert_eq!(BinOp::from_lexeme("XOR"), None);
        assert_eq!(BinOp::Or.to_string(), "OR");
        assert_eq!(Verdict::from_lexeme("UNKNOWN"), Some(Verdict::Unknown));
        assert_eq!(Verdict::Error.as_str(), "ERROR");
    }

    #[test]
    fn binary_position_is_its_left_operand() {
        let mut left = id("a");
        left.pos.column = 5;
        let e = Expr::Binary {
            left: Box::new(Expr::Alias(left)),
            op: BinOp::And,
            op_pos: Position::start(),
            right: Box::new(Expr::Alias(id("b"))),
        };
        assert_eq!(e.pos().column, 5);
        assert_eq!(e.kind(), NodeKind::BinaryLogical);
    }
}
