//! Lint: `NOT NOT e` is `e`.

use crate::ast::{Expr, Program};
use crate::lint::{LintDiagnostic, LintPass};
use crate::visit::{walk, Listener};

pub(crate) struct DoubleNegation;

impl LintPass for DoubleNegation {
    fn name(&self) -> &'static str {
        "double-negation"
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

impl Listener for Finder<'_> {
    fn enter_expr(&mut self, expr: &Expr) {
        if let Expr::Not { operand, pos } = expr {
            if matches!(**operand, Expr::Not { .. }) {
                self.diagnostics.push(LintDiagnostic {
                    rule: self.rule,
                    message: "double negation cancels out".to_owned(),
                    position: *pos,
                });
            }
        }
    }
}
