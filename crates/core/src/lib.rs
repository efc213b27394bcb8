#![allow(clippy::result_large_err)]
//! coverilang-core: CoVeriLang front end.
//!
//! Turns CoVeriLang source text into a typed parse tree and ships the tree
//! consumers built on the traversal protocol.
//!
//! # Public API
//!
//! - [`tokenize()`] -- source text to tokens
//! - [`parse()`] -- tokens to a [`Program`]
//! - [`parse_source()`], [`parse_actor()`], [`parse_expression()`] -- tokenize
//!   and parse in one call, plus `*_with` variants taking a [`ParserConfig`]
//! - [`ParseError`] -- everything the entry points can fail with
//! - [`visit`] -- [`Listener`]/[`walk`] and [`Visitor`]/[`Accept`]
//! - [`print_program()`], [`outline()`], [`lint::run_lints()`] -- consumers

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod lint;
pub mod outline;
pub mod parser;
pub mod printer;
pub mod visit;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Actor, Expr, NodeKind, Program};
pub use error::{InternalError, LexError, ParseError, SyntaxError};
pub use lexer::{Position, Token, TokenKind};
pub use parser::ParserConfig;
pub use printer::PrintOptions;
pub use visit::{preorder_kinds, walk, Accept, Listener, Visitor};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use lexer::tokenize;
pub use outline::outline;
pub use parser::{parse, parse_with};
pub use printer::{print_actor, print_expression, print_program};

pub fn parse_source(src: &str) -> Result<Program, ParseError> {
    parse_source_with(src, &ParserConfig::default())
}

pub fn parse_source_with(src: &str, config: &ParserConfig) -> Result<Program, ParseError> {
    let tokens = tokenize(src)?;
    parse_with(&tokens, config)
}

/// Parse text that is exactly one actor, e.g. `SEQUENCE(a, b)`.
pub fn parse_actor(src: &str) -> Result<Actor, ParseError> {
    parse_actor_with(src, &ParserConfig::default())
}

pub fn parse_actor_with(src: &str, config: &ParserConfig) -> Result<Actor, ParseError> {
    let tokens = tokenize(src)?;
    parser::parse_actor_tokens(&tokens, config)
}

/// Parse text that is exactly one boolean expression.
pub fn parse_expression(src: &str) -> Result<Expr, ParseError> {
    parse_expression_with(src, &ParserConfig::default())
}

pub fn parse_expression_with(src: &str, config: &ParserConfig) -> Result<Expr, ParseError> {
    let tokens = tokenize(src)?;
    parser::parse_expression_tokens(&tokens, config)
}
