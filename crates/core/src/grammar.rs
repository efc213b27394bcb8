//! Static grammar tables.
//!
//! For every non-terminal: its ordered alternatives, the tokens each
//! alternative can start with, and how much lookahead the parser needs to
//! choose between them. The parser consults these tables for loop
//! conditions and for the expected-token sets of syntax errors; the tables
//! themselves are plain constants and never change after startup.

use std::sync::LazyLock;

use crate::lexer::TokenKind::{self, *};

/// Non-terminals, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    Program,
    FunDecl,
    StmtBlock,
    IdList,
    Stmt,
    SpecStmt,
    ExecStmt,
    ReturnStmt,
    ArgMap,
    MapItemList,
    MapItem,
    Assignable,
    Actor,
    UtilityActor,
    Artifact,
    ArtifactType,
    ActorType,
    Exp,
    VerdictList,
    QuotedId,
}

/// How an alternative is chosen once the first token is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// A fixed number of tokens is enough.
    Tokens(usize),
    /// Leading `(` tokens are skipped before deciding; bounded by
    /// `ParserConfig::max_lookahead`.
    ParenSkipping,
}

#[derive(Debug)]
pub struct Alternative {
    pub label: &'static str,
    pub first: &'static [TokenKind],
}

#[derive(Debug)]
pub struct RuleDef {
    pub rule: Rule,
    pub name: &'static str,
    pub alternatives: &'static [Alternative],
    pub lookahead: Lookahead,
    /// Can derive the empty string.
    pub nullable: bool,
    /// Token of a left-recursive suffix (`exp BIN_OP exp`), unrolled by the
    /// parser into a loop.
    pub continuation: Option<TokenKind>,
}

impl RuleDef {
    pub fn starts_with(&self, kind: TokenKind) -> bool {
        self.alternatives.iter().any(|alt| alt.first.contains(&kind))
    }

    /// Alternatives whose first set contains `kind`, in table order.
    pub fn alternatives_for(&self, kind: TokenKind) -> impl Iterator<Item = &'static Alternative> {
        self.alternatives
            .iter()
            .filter(move |alt| alt.first.contains(&kind))
    }
}

/// Precedence tier of `BIN_OP`. The grammar has exactly one.
pub const BINARY_PRECEDENCE: u8 = 1;
/// Minimum precedence at the start of a full expression.
pub const LOWEST_PRECEDENCE: u8 = 0;

// Expands to a `RuleDef` struct literal so the nested slices are
// lifetime-extended to 'static.
macro_rules! rule_def {
    ($rule:ident, $name:literal, $lookahead:expr, nullable: $nullable:literal, continuation: $cont:expr, [$(($label:literal, $first:expr)),+ $(,)?]) => {
        RuleDef {
            rule: Rule::$rule,
            name: $name,
            alternatives: &[$(Alternative { label: $label, first: $first }),+],
            lookahead: $lookahead,
            nullable: $nullable,
            continuation: $cont,
        }
    };
    ($rule:ident, $name:literal, $lookahead:expr, [$($alts:tt)+]) => {
        rule_def!($rule, $name, $lookahead, nullable: false, continuation: None, [$($alts)+])
    };
}

const STMT_START: &[TokenKind] = &[Print, Execute, Return, Id];

const UTILITY_START: &[TokenKind] = &[
    Joiner,
    Copy,
    Rename,
    TestSpecToSpec,
    SpecToTestSpec,
    Identity,
];

const EXP_START: &[TokenKind] = &[Not, InstanceOf, ElementOf, Id, LParen];

const ACTOR_START: &[TokenKind] = &[
    ActorFactoryCreate,
    Sequence,
    Ite,
    Repeat,
    Parallel,
    Joiner,
    Copy,
    Rename,
    TestSpecToSpec,
    SpecToTestSpec,
    Identity,
    LParen,
    Id,
];

const ONE: Lookahead = Lookahead::Tokens(1);

pub static RULES: &[RuleDef] = &[
    rule_def!(Program, "program", ONE, [
        ("fun_decl", &[Fun]),
        ("stmt_block", &[Print, Execute, Return, Id, Eof]),
    ]),
    rule_def!(FunDecl, "fun_decl", ONE, [("fun_decl", &[Fun])]),
    rule_def!(StmtBlock, "stmt_block", ONE, nullable: true, continuation: None, [
        ("stmt", STMT_START),
    ]),
    rule_def!(IdList, "id_list", ONE, [("id_list", &[Id])]),
    rule_def!(Stmt, "stmt", ONE, [
        ("spec_stmt", &[Id]),
        ("exec_stmt", &[Print, Execute]),
        ("return_stmt", &[Return]),
    ]),
    rule_def!(SpecStmt, "spec_stmt", ONE, [("spec_stmt", &[Id])]),
    rule_def!(ExecStmt, "exec_stmt", ONE, [
        ("PrintActor", &[Print]),
        ("ExecuteActor", &[Execute]),
    ]),
    rule_def!(ReturnStmt, "return_stmt", ONE, [("return_stmt", &[Return])]),
    rule_def!(ArgMap, "arg_map", ONE, [("arg_map", &[LBrace])]),
    rule_def!(MapItemList, "map_item_list", ONE, [("map_item_list", &[Quote])]),
    rule_def!(MapItem, "map_item", ONE, [("map_item", &[Quote])]),
    rule_def!(Assignable, "assignable", Lookahead::ParenSkipping, [
        ("exp", EXP_START),
        ("artifact", &[ArtifactFactoryCreate, Id]),
        ("arg_map", &[LBrace]),
        ("actor", ACTOR_START),
        ("literal", &[Str]),
    ]),
    rule_def!(Actor, "actor", Lookahead::Tokens(2), [
        ("Atomic", &[ActorFactoryCreate]),
        ("FunCall", &[Id]),
        ("Utility", UTILITY_START),
        ("Sequence", &[Sequence]),
        ("ITE", &[Ite]),
        ("Iterative", &[Repeat]),
        ("Parallel", &[Parallel]),
        ("ActorAlias", &[Id]),
        ("Parenthesis", &[LParen]),
    ]),
    rule_def!(UtilityActor, "utility_actor", ONE, [
        ("Joiner", &[Joiner]),
        ("Copy", &[Copy]),
        ("Rename", &[Rename]),
        ("TestSpecToSpec", &[TestSpecToSpec]),
        ("SpecToTestSpec", &[SpecToTestSpec]),
        ("Identity", &[Identity]),
    ]),
    rule_def!(Artifact, "artifact", ONE, [
        ("ArtifactLiteral", &[ArtifactFactoryCreate]),
        ("ArtifactAlias", &[Id]),
    ]),
    rule_def!(ArtifactType, "artifact_type", ONE, [("artifact_type", &[TypeName])]),
    rule_def!(ActorType, "actor_type", ONE, [("actor_type", &[TypeName])]),
    rule_def!(Exp, "exp", ONE, nullable: false, continuation: Some(BinOp), [
        ("NotLogical", &[Not]),
        ("InstanceOf", &[InstanceOf]),
        ("ElementOf", &[ElementOf]),
        ("ExpAlias", &[Id]),
        ("Paren", &[LParen]),
    ]),
    rule_def!(VerdictList, "verdict_list", ONE, [("verdict_list", &[Verdict])]),
    rule_def!(QuotedId, "quoted_ID", ONE, [("quoted_ID", &[Quote])]),
];

pub fn rule(rule: Rule) -> &'static RuleDef {
    &RULES[rule as usize]
}

/// Does `kind` start some alternative of `rule`?
pub fn starts(rule: Rule, kind: TokenKind) -> bool {
    self::rule(rule).starts_with(kind)
}

static FIRST_SETS: LazyLock<Vec<Vec<TokenKind>>> = LazyLock::new(|| {
    debug_assert_eq!(check_tables(), Ok(()));
    RULES
        .iter()
        .map(|def| {
            let mut set: Vec<TokenKind> = def
                .alternatives
                .iter()
                .flat_map(|alt| alt.first.iter().copied())
                .collect();
            set.sort();
            set.dedup();
            set
        })
        .collect()
});

/// Union of the first sets of all alternatives of `rule`, sorted.
pub fn first_set(rule: Rule) -> &'static [TokenKind] {
    &FIRST_SETS[rule as usize]
}

/// Verify the tables: rows are in `Rule` order, and rules that decide on a
/// single token have pairwise disjoint alternatives.
pub fn check_tables() -> Result<(), String> {
    for (index, def) in RULES.iter().enumerate() {
        if def.rule as usize != index {
            return Err(format!("rule '{}' is out of order at row {}", def.name, index));
        }
        if def.alternatives.is_empty() {
            return Err(format!("rule '{}' has no alternatives", def.name));
        }
        if def.lookahead != Lookahead::Tokens(1) {
            continue;
        }
        for (i, a) in def.alternatives.iter().enumerate() {
            for b in &def.alternatives[i + 1..] {
                if let Some(shared) = a.first.iter().find(|k| b.first.contains(k)) {
                    return Err(format!(
                        "rule '{}': alternatives '{}' and '{}' both start with {} but lookahead is 1",
                        def.name, a.label, b.label, shared
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_consistent() {
        assert_eq!(check_tables(), Ok(()));
        assert_eq!(RULES.len(), Rule::QuotedId as usize + 1);
    }

    #[test]
    fn overlapping_rules_declare_extra_lookahead() {
        assert_eq!(rule(Rule::Actor).lookahead, Lookahead::Tokens(2));
        let id_alts: Vec<_> = rule(Rule::Actor)
            .alternatives_for(Id)
            .map(|a| a.label)
            .collect();
        assert_eq!(id_alts, vec!["FunCall", "ActorAlias"]);
        assert_eq!(rule(Rule::Assignable).lookahead, Lookahead::ParenSkipping);
    }

    #[test]
    fn first_sets_are_sorted_unions() {
        let exp = first_set(Rule::Exp);
        assert_eq!(exp, &[Not, InstanceOf, ElementOf, LParen, Id]);
        assert!(first_set(Rule::Assignable).contains(&Str));
        assert!(first_set(Rule::Assignable).contains(&LBrace));
        assert!(starts(Rule::Stmt, Return));
        assert!(!starts(Rule::Stmt, Fun));
    }

    #[test]
    fn only_the_expression_rule_is_left_recursive() {
        let recursive: Vec<_> = RULES
            .iter()
            .filter(|d| d.continuation.is_some())
            .map(|d| d.rule)
            .collect();
        assert_eq!(recursive, vec![Rule::Exp]);
        assert!(rule(Rule::StmtBlock).nullable);
    }
}
