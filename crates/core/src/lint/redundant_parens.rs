//! Lint: parentheses that group nothing.
//!
//! ```text
//! x = (a);            // alias needs no grouping
//! y = ((a OR b));     // the inner pair already groups
//! z = (a OR b) AND c; // OK
//! ```

use crate::ast::{Actor, Expr, Program};
use crate::lexer::Position;
use crate::lint::{LintDiagnostic, LintPass};
use crate::visit::{walk, Listener};

pub(crate) struct RedundantParens;

impl LintPass for RedundantParens {
    fn name(&self) -> &'static str {
        "redundant-parens"
    }

    fn check(&self, program: &Program, diagnostics: &mut Vec<LintDiagnostic>) {
        let mut finder = Finder {
            rule: self.name(),
            diagnostics,
        };
        walk(program, &mut finder);
    }
}

struct Finder<'d> {
    rule: &'static str,
    diagnostics: &'d mut Vec<LintDiagnostic>,
}

impl Finder<'_> {
    fn report(&mut self, what: &str, position: Position) {
        self.diagnostics.push(LintDiagnostic {
            rule: self.rule,
            message: format!("redundant parentheses around {}", what),
            position,
        });
    }
}

impl Listener for Finder<'_> {
    fn enter_actor(&mut self, actor: &Actor) {
        if let Actor::Parenthesized { inner, pos } = actor {
            match &**inner {
                Actor::Alias(id) => self.report(&format!("'{}'", id.name), *pos),
                Actor::Parenthesized { .. } => self.report("a parenthesized actor", *pos),
                _ => {}
            }
        }
    }

    fn enter_expr(&mut self, expr: &Expr) {
        if let Expr::Parenthesized { inner, pos } = expr {
            match &**inner {
                Expr::Alias(id) => self.report(&format!("'{}'", id.name), *pos),
                Expr::Parenthesized { .. } => self.report("a parenthesized expression", *pos),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    fn messages(src: &str) -> Vec<String> {
        let mut diagnostics = Vec::new();
        RedundantParens.check(&parse_source(src).unwrap(), &mut diagnostics);
        diagnostics.into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn alias_in_parentheses() {
        assert_eq!(
            messages("x = (a);"),
            vec!["redundant parentheses around 'a'"]
        );
        assert_eq!(messages("x = (a) == b;").len(), 1);
    }

    #[test]
    fn double_parentheses_report_the_outer_pair() {
        let mut diagnostics = Vec::new();
        let program = parse_source("x = ((SEQUENCE(a, b)));").unwrap();
        RedundantParens.check(&program, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position.column, 5);
        assert_eq!(
            diagnostics[0].message,
            "redundant parentheses around a parenthesized actor"
        );
    }

    #[test]
    fn grouping_parentheses_are_kept() {
        assert!(messages("x = (a OR b) AND c;").is_empty());
        assert!(messages("print((SEQUENCE(a, b)));").is_empty());
    }
}
