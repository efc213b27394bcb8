//! Style lints over a parsed program.
//!
//! Lints never reject a program; they only report. Each pass is a
//! [`Listener`](crate::visit::Listener) in its own module.
//!
//! To add a lint, create `lint/<name>.rs` with a unit struct implementing
//! [`LintPass`] and register it in `all_passes()` (alphabetical).

mod double_negation;
mod redundant_parens;

use serde::Serialize;

use crate::ast::Program;
use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintDiagnostic {
    /// Name of the pass that produced it, e.g. `redundant-parens`.
    pub rule: &'static str,
    pub message: String,
    pub position: Position,
}

pub trait LintPass {
    fn name(&self) -> &'static str;
    fn check(&self, program: &Program, diagnostics: &mut Vec<LintDiagnostic>);
}

fn all_passes() -> Vec<Box<dyn LintPass>> {
    vec![
        Box::new(double_negation::DoubleNegation),
        Box::new(redundant_parens::RedundantParens),
    ]
}

/// Names of the registered passes.
pub fn lint_names() -> Vec<&'static str> {
    all_passes().iter().map(|p| p.name()).collect()
}

/// Run every pass; diagnostics come back ordered by position, then rule.
#[must_use]
pub fn run_lints(program: &Program) -> Vec<LintDiagnostic> {
    let mut diagnostics = Vec::new();
    for pass in all_passes() {
        pass.check(program, &mut diagnostics);
    }
    diagnostics.sort_by(|a, b| (a.position, a.rule).cmp(&(b.position, b.rule)));
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[test]
    fn diagnostics_are_sorted_by_position() {
        let program = parse_source("x = NOT NOT ok;\ny = (a);\nz = (b) OR c;").unwrap();
        let found: Vec<(&str, u32)> = run_lints(&program)
            .iter()
            .map(|d| (d.rule, d.position.line))
            .collect();
        assert_eq!(
            found,
            vec![
                ("double-negation", 1),
                ("redundant-parens", 2),
                ("redundant-parens", 3),
            ]
        );
    }

    #[test]
    fn clean_program_has_no_diagnostics() {
        let program = parse_source("x = SEQUENCE(a, b); c = (a OR b) AND d;").unwrap();
        assert!(run_lints(&program).is_empty());
        assert_eq!(lint_names(), vec!["double-negation", "redundant-parens"]);
    }
}
