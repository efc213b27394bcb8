//! Canonical source rendering.
//!
//! Statements go one per line, function bodies are indented, and every
//! actor or expression is printed on a single line with `, ` between
//! arguments. Parentheses written in the source are kept as nodes, so
//! printing a parsed program and parsing the result gives the same tree
//! shape.

use serde::Deserialize;

use crate::ast::{
    Actor, ArgMap, Artifact, Assignable, ExecInputs, ExecStmt, Expr, FunctionDecl, Ident,
    IdentityTarget, MapValue, Program, Reference, Stmt, StmtBlock, UtilityActor, Verdict,
};
use crate::visit::{Accept, Visitor};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintOptions {
    /// Spaces per nesting level of function bodies.
    pub indent: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions { indent: 4 }
    }
}

pub fn print_program(program: &Program, options: &PrintOptions) -> String {
    program.accept(&mut Printer::new(options))
}

pub fn print_actor(actor: &Actor) -> String {
    actor.accept(&mut Printer::new(&PrintOptions::default()))
}

pub fn print_expression(expr: &Expr) -> String {
    expr.accept(&mut Printer::new(&PrintOptions::default()))
}

struct Printer<'o> {
    options: &'o PrintOptions,
    level: usize,
}

impl<'o> Printer<'o> {
    fn new(options: &'o PrintOptions) -> Self {
        Printer { options, level: 0 }
    }

    fn assignable(&mut self, value: &Assignable) -> String {
        match value {
            Assignable::Expression(expr) => expr.accept(self),
            Assignable::Artifact(artifact) => artifact.accept(self),
            Assignable::ArgMap(map) => map.accept(self),
            // a bare alias would come back as an expression
            Assignable::Actor(actor) if matches!(actor.unparenthesized(), Actor::Alias(_)) => {
                format!("ActorFactory.create({})", actor.accept(self))
            }
            Assignable::Actor(actor) => actor.accept(self),
            Assignable::Literal(literal) => literal.raw.clone(),
        }
    }

    /// Operand of a binary operator, parenthesized where printing it bare
    /// would regroup the chain.
    fn operand(&mut self, expr: &Expr, right: bool) -> String {
        let text = expr.accept(self);
        let regroups = if right {
            matches!(expr, Expr::Binary { .. })
        } else {
            ends_in_not(expr)
        };
        if regroups {
            format!("({})", text)
        } else {
            text
        }
    }
}

/// Whether printing `expr` bare leaves a `NOT` at its right edge, which
/// would take any operator printed after it as part of its operand.
fn ends_in_not(expr: &Expr) -> bool {
    match expr {
        Expr::Not { .. } => true,
        // a binary right operand is printed in parentheses
        Expr::Binary { right, .. } => matches!(**right, Expr::Not { .. }),
        _ => false,
    }
}

fn names(ids: &[Ident]) -> String {
    ids.iter()
        .map(|id| id.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn reference(source: &Reference) -> &str {
    match source {
        Reference::Name(id) => &id.name,
        Reference::Literal(lit) => &lit.raw,
    }
}

fn quoted(id: &Ident) -> String {
    format!("'{}'", id.name)
}

impl Visitor for Printer<'_> {
    type Output = String;

    fn visit_program(&mut self, program: &Program) -> String {
        let mut out = String::new();
        for function in &program.functions {
            out.push_str(&function.accept(self));
            out.push('\n');
        }
        out.push_str(&program.body.accept(self));
        out
    }

    fn visit_function(&mut self, function: &FunctionDecl) -> String {
        self.level += 1;
        let body = function.body.accept(self);
        self.level -= 1;
        format!(
            "fun {}({}) {{\n{}}}\n",
            function.name.name,
            names(&function.params),
            body
        )
    }

    fn visit_block(&mut self, block: &StmtBlock) -> String {
        let pad = " ".repeat(self.level * self.options.indent);
        let mut out = String::new();
        for stmt in &block.statements {
            out.push_str(&pad);
            out.push_str(&stmt.accept(self));
            out.push_str(";\n");
        }
        out
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Assignment(a) => format!("{} = {}", a.target.name, self.assignable(&a.value)),
            Stmt::Execution(ExecStmt::Print { actor, .. }) => {
                format!("print({})", actor.accept(self))
            }
            Stmt::Execution(ExecStmt::Execute { actor, inputs, .. }) => {
                let inputs = match inputs {
                    ExecInputs::Name(id) => id.name.clone(),
                    ExecInputs::Map(map) => map.accept(self),
                };
                format!("execute({}, {})", actor.accept(self), inputs)
            }
            Stmt::Return(r) => format!("return {}", r.value.name),
        }
    }

    fn visit_actor(&mut self, actor: &Actor) -> String {
        match actor {
            Actor::Atomic {
                actor_type, source, ..
            } => format!(
                "ActorFactory.create({}, {})",
                actor_type.name,
                reference(source)
            ),
            Actor::FunctionCall { name, args } => format!("{}({})", name.name, names(args)),
            Actor::Utility(utility) => utility.accept(self),
            Actor::Sequence { first, second, .. } => {
                format!("SEQUENCE({}, {})", first.accept(self), second.accept(self))
            }
            Actor::Parallel { first, second, .. } => {
                format!("PARALLEL({}, {})", first.accept(self), second.accept(self))
            }
            Actor::IfThenElse {
                condition,
                then_actor,
                else_actor,
                ..
            } => format!(
                "ITE({}, {}, {})",
                condition.accept(self),
                then_actor.accept(self),
                else_actor.accept(self)
            ),
            Actor::Iterative { variable, body, .. } => {
                format!("REPEAT({}, {})", quoted(variable), body.accept(self))
            }
            Actor::Alias(id) => id.name.clone(),
            Actor::Parenthesized { inner, .. } => format!("({})", inner.accept(self)),
        }
    }

    fn visit_utility(&mut self, utility: &UtilityActor) -> String {
        match utility {
            UtilityActor::Joiner {
                artifact_type,
                merge,
                output,
                ..
            } => format!(
                "Joiner({}, {}, {})",
                artifact_type.name,
                merge.accept(self),
                quoted(output)
            ),
            UtilityActor::Copy { map, .. } => format!("Copy({})", map.accept(self)),
            UtilityActor::Rename { map, .. } => format!("Rename({})", map.accept(self)),
            UtilityActor::TestSpecToSpec { .. } => "TestSpecToSpec()".to_owned(),
            UtilityActor::SpecToTestSpec { .. } => "SpecToTestSpec()".to_owned(),
            UtilityActor::Identity { target, .. } => {
                let inner = match target {
                    IdentityTarget::Actor(actor) => actor.accept(self),
                    IdentityTarget::Map(map) => map.accept(self),
                };
                format!("Identity({})", inner)
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Not { operand, .. } => format!("NOT {}", operand.accept(self)),
            Expr::InstanceOf {
                subject,
                artifact_type,
                ..
            } => format!("INSTANCEOF({}, {})", subject.name, artifact_type.name),
            Expr::ElementOf {
                subject, verdicts, ..
            } => {
                let verdicts: Vec<&str> = verdicts.iter().map(|v| Verdict::as_str(*v)).collect();
                format!("ELEMENTOF({}, {{{}}})", subject.name, verdicts.join(", "))
            }
            Expr::Alias(id) => id.name.clone(),
            Expr::Parenthesized { inner, .. } => format!("({})", inner.accept(self)),
            Expr::Binary {
                left, op, right, ..
            } => format!(
                "{} {} {}",
                self.operand(left, false),
                op,
                self.operand(right, true)
            ),
        }
    }

    fn visit_arg_map(&mut self, map: &ArgMap) -> String {
        let items: Vec<String> = map
            .items
            .iter()
            .map(|item| match &item.value {
                None => quoted(&item.key),
                Some(MapValue::Artifact(artifact)) => {
                    format!("{}: {}", quoted(&item.key), artifact.accept(self))
                }
                Some(MapValue::ArtifactType(t)) => format!("{}: {}", quoted(&item.key), t.name),
                Some(MapValue::Quoted(id)) => format!("{}: {}", quoted(&item.key), quoted(id)),
            })
            .collect();
        format!("{{{}}}", items.join(", "))
    }

    fn visit_artifact(&mut self, artifact: &Artifact) -> String {
        match artifact {
            Artifact::Literal {
                artifact_type,
                source,
                ..
            } => format!(
                "ArtifactFactory.create({}, {})",
                artifact_type.name,
                reference(source)
            ),
            Artifact::Alias(id) => id.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;
    use crate::{parse_expression, parse_source};

    fn reformat(src: &str) -> String {
        print_program(&parse_source(src).unwrap(), &PrintOptions::default())
    }

    #[test]
    fn statements_are_normalized() {
        assert_eq!(
            reformat("x=5 ;print( SEQUENCE(a,b) ) ;"),
            "x = 5;\nprint(SEQUENCE(a, b));\n"
        );
    }

    #[test]
    fn function_bodies_are_indented() {
        let src = "fun f(a,b){y=ITE(ok,a,b);return y;} execute(f(p, q), {'program':prog});";
        assert_eq!(
            reformat(src),
            "fun f(a, b) {\n    y = ITE(ok, a, b);\n    return y;\n}\n\n\
             execute(f(p, q), {'program': prog});\n"
        );
        let narrow = PrintOptions { indent: 2 };
        let program = parse_source(src).unwrap();
        assert!(print_program(&program, &narrow).contains("\n  return y;\n"));
    }

    #[test]
    fn assigned_alias_actor_keeps_its_factory_call() {
        assert_eq!(
            reformat("x = ActorFactory.create(a); y = ActorFactory.create((b)); z = c;"),
            "x = ActorFactory.create(a);\ny = ActorFactory.create((b));\nz = c;\n"
        );
    }

    #[test]
    fn factory_wrapper_is_dropped() {
        assert_eq!(
            reformat("y = ActorFactory.create(SEQUENCE(a, b));"),
            "y = SEQUENCE(a, b);\n"
        );
    }

    #[test]
    fn literals_and_maps_keep_their_text() {
        assert_eq!(
            reformat(
                "v = ActorFactory.create(ProgramVerifier, \"cpa.yml\"); \
                 m = {'spec' : Spec, 'out' : 'o', 'k'};"
            ),
            "v = ActorFactory.create(ProgramVerifier, \"cpa.yml\");\n\
             m = {'spec': Spec, 'out': 'o', 'k'};\n"
        );
    }

    #[test]
    fn expressions_print_as_written() {
        let e = parse_expression("NOT a AND (b OR ELEMENTOF(v, {TRUE,ERROR}))").unwrap();
        assert_eq!(
            print_expression(&e),
            "NOT a AND (b OR ELEMENTOF(v, {TRUE, ERROR}))"
        );
    }

    #[test]
    fn constructed_trees_keep_their_grouping() {
        let a = || Box::new(parse_expression("a").unwrap());
        let negated_left = Expr::Binary {
            left: Box::new(Expr::Not {
                operand: a(),
                pos: Default::default(),
            }),
            op: BinOp::And,
            op_pos: Default::default(),
            right: a(),
        };
        assert_eq!(print_expression(&negated_left), "(NOT a) AND a");

        let name = |n: &str| Box::new(parse_expression(n).unwrap());
        let binary = |left, op, right| Expr::Binary {
            left,
            op,
            op_pos: Default::default(),
            right,
        };
        let inner = binary(
            name("a"),
            BinOp::And,
            Box::new(Expr::Not {
                operand: name("b"),
                pos: Default::default(),
            }),
        );
        let outer = binary(Box::new(inner), BinOp::Or, name("c"));
        let printed = print_expression(&outer);
        assert_eq!(printed, "(a AND NOT b) OR c");
        match parse_expression(&printed).unwrap() {
            Expr::Binary { op, .. } => assert_eq!(op, BinOp::Or),
            other => panic!("regrouped as {:?}", other),
        }
    }
}
