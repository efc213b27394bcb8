//! Indented node-kind dump, one line per node.

use std::fmt::Write;

use crate::ast::{
    Actor, ArgMap, Artifact, Assignable, ExecInputs, ExecStmt, Expr, FunctionDecl, Literal,
    MapItem, MapValue, NodeKind, Program, Reference, Stmt, StmtBlock, UtilityActor,
};
use crate::visit::{walk, Listener};

pub fn outline(program: &Program) -> String {
    let mut out = Outline::default();
    walk(program, &mut out);
    out.text
}

#[derive(Default)]
struct Outline {
    text: String,
    depth: usize,
}

impl Outline {
    fn open(&mut self, kind: NodeKind, detail: Option<String>) {
        let _ = write!(self.text, "{:width$}{}", "", kind, width = self.depth * 2);
        if let Some(detail) = detail {
            let _ = write!(self.text, " {}", detail);
        }
        self.text.push('\n');
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
    }
}

fn source(reference: &Reference) -> Option<String> {
    match reference {
        Reference::Name(id) => Some(id.name.clone()),
        // the literal gets its own line
        Reference::Literal(_) => None,
    }
}

impl Listener for Outline {
    fn enter_program(&mut self, _: &Program) {
        self.open(NodeKind::Program, None);
    }
    fn exit_program(&mut self, _: &Program) {
        self.close();
    }

    fn enter_function(&mut self, function: &FunctionDecl) {
        let params: Vec<&str> = function.params.iter().map(|p| p.name.as_str()).collect();
        self.open(
            NodeKind::FunctionDeclaration,
            Some(format!("{}({})", function.name.name, params.join(", "))),
        );
    }
    fn exit_function(&mut self, _: &FunctionDecl) {
        self.close();
    }

    fn enter_block(&mut self, _: &StmtBlock) {
        self.open(NodeKind::StatementBlock, None);
    }
    fn exit_block(&mut self, _: &StmtBlock) {
        self.close();
    }

    fn enter_stmt(&mut self, stmt: &Stmt) {
        let detail = match stmt {
            Stmt::Assignment(a) => {
                let form = match &a.value {
                    Assignable::Expression(_) => "expression",
                    Assignable::Artifact(_) => "artifact",
                    Assignable::ArgMap(_) => "map",
                    Assignable::Actor(_) => "actor",
                    Assignable::Literal(_) => "literal",
                };
                Some(format!("{} ({})", a.target.name, form))
            }
            Stmt::Execution(ExecStmt::Execute {
                inputs: ExecInputs::Name(id),
                ..
            }) => Some(format!("inputs={}", id.name)),
            Stmt::Execution(_) => None,
            Stmt::Return(r) => Some(r.value.name.clone()),
        };
        self.open(stmt.kind(), detail);
    }
    fn exit_stmt(&mut self, _: &Stmt) {
        self.close();
    }

    fn enter_actor(&mut self, actor: &Actor) {
        let detail = match actor {
            Actor::Atomic {
                actor_type, source: src, ..
            } => Some(match source(src) {
                Some(name) => format!("{} {}", actor_type.name, name),
                None => actor_type.name.clone(),
            }),
            Actor::FunctionCall { name, args } => {
                let args: Vec<&str> = args.iter().map(|a| a.name.as_str()).collect();
                Some(format!("{}({})", name.name, args.join(", ")))
            }
            Actor::Iterative { variable, .. } => Some(format!("'{}'", variable.name)),
            Actor::Alias(id) => Some(id.name.clone()),
            _ => None,
        };
        self.open(actor.kind(), detail);
    }
    fn exit_actor(&mut self, _: &Actor) {
        self.close();
    }

    fn enter_utility(&mut self, utility: &UtilityActor) {
        let detail = match utility {
            UtilityActor::Joiner {
                artifact_type,
                output,
                ..
            } => Some(format!("{} -> '{}'", artifact_type.name, output.name)),
            _ => None,
        };
        self.open(utility.kind(), detail);
    }
    fn exit_utility(&mut self, _: &UtilityActor) {
        self.close();
    }

    fn enter_expr(&mut self, expr: &Expr) {
        let detail = match expr {
            Expr::InstanceOf {
                subject,
                artifact_type,
                ..
            } => Some(format!("{} {}", subject.name, artifact_type.name)),
            Expr::ElementOf {
                subject, verdicts, ..
            } => {
                let verdicts: Vec<&str> = verdicts.iter().map(|v| v.as_str()).collect();
                Some(format!("{} {{{}}}", subject.name, verdicts.join(", ")))
            }
            Expr::Alias(id) => Some(id.name.clone()),
            Expr::Binary { op, .. } => Some(op.to_string()),
            _ => None,
        };
        self.open(expr.kind(), detail);
    }
    fn exit_expr(&mut self, _: &Expr) {
        self.close();
    }

    fn enter_arg_map(&mut self, _: &ArgMap) {
        self.open(NodeKind::ArgumentMap, None);
    }
    fn exit_arg_map(&mut self, _: &ArgMap) {
        self.close();
    }

    fn enter_map_item(&mut self, item: &MapItem) {
        let detail = match &item.value {
            Some(MapValue::ArtifactType(t)) => format!("'{}': {}", item.key.name, t.name),
            Some(MapValue::Quoted(id)) => format!("'{}': '{}'", item.key.name, id.name),
            Some(MapValue::Artifact(_)) | None => format!("'{}'", item.key.name),
        };
        self.open(NodeKind::MapItem, Some(detail));
    }
    fn exit_map_item(&mut self, _: &MapItem) {
        self.close();
    }

    fn enter_artifact(&mut self, artifact: &Artifact) {
        let detail = match artifact {
            Artifact::Literal {
                artifact_type,
                source: src,
                ..
            } => Some(match source(src) {
                Some(name) => format!("{} {}", artifact_type.name, name),
                None => artifact_type.name.clone(),
            }),
            Artifact::Alias(id) => Some(id.name.clone()),
        };
        self.open(artifact.kind(), detail);
    }
    fn exit_artifact(&mut self, _: &Artifact) {
        self.close();
    }

    fn enter_literal(&mut self, literal: &Literal) {
        self.open(NodeKind::Literal, Some(literal.raw.clone()));
    }
    fn exit_literal(&mut self, _: &Literal) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[test]
    fn nested_program_outline() {
        let program = parse_source(
            "fun f(a) { return a; }\n\
             v = ActorFactory.create(ProgramVerifier, \"cpa.yml\");\n\
             execute(SEQUENCE(v, f(v)), inputs);",
        )
        .unwrap();
        let expected = "\
Program
  FunctionDeclaration f(a)
    StatementBlock
      ReturnStatement a
  StatementBlock
    AssignmentStatement v (actor)
      Atomic ProgramVerifier
        Literal \"cpa.yml\"
    ExecuteActor inputs=inputs
      Sequence
        ActorAlias v
        FunctionCall f(v)
";
        assert_eq!(outline(&program), expected);
    }

    #[test]
    fn expressions_show_operators() {
        let program = parse_source("c = NOT x AND INSTANCEOF(p, CProgram);").unwrap();
        let text = outline(&program);
        assert!(text.contains("    AssignmentStatement c (expression)\n      Not\n        BinaryLogical AND\n"));
        assert!(text.contains("          InstanceOf p CProgram\n"));
    }

    #[test]
    fn bare_alias_assignment_is_an_expression() {
        let program = parse_source("x = a;\ny = ActorFactory.create(a);").unwrap();
        assert_eq!(
            outline(&program),
            "Program\n  StatementBlock\n    AssignmentStatement x (expression)\n      ExpressionAlias a\n    AssignmentStatement y (actor)\n      ActorAlias a\n"
        );
    }
}
