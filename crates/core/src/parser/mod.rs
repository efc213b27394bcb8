//! Recursive-descent parser over the token stream.
//!
//! One method per non-terminal. Alternatives are chosen from the next one or
//! two tokens, except for the right-hand side of an assignment which uses the
//! bounded paren-skipping lookahead in `lookahead.rs`. The first error aborts
//! the parse; there is no recovery.

use serde::Deserialize;
use tracing::debug;

use crate::ast::{
    Actor, Assignable, Assignment, ExecInputs, ExecStmt, Expr, FunctionDecl, Ident, Program,
    ReturnStmt, Stmt, StmtBlock,
};
use crate::error::{InternalError, ParseError, SyntaxError};
use crate::grammar::{first_set, starts, Rule, LOWEST_PRECEDENCE};
use crate::lexer::{Token, TokenKind};

mod actors;
mod artifacts;
mod expressions;
mod lookahead;

use lookahead::AssignableChoice;

/// Resource bounds for a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Tokens the assignment lookahead may inspect before giving up with an
    /// internal error.
    pub max_lookahead: usize,
    /// Nesting depth of actors and expressions.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_lookahead: 64,
            max_depth: 256,
        }
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    config: &'a ParserConfig,
    depth: usize,
    /// Closers of the delimiters opened and not yet closed, innermost last.
    open: Vec<TokenKind>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], config: &'a ParserConfig) -> Result<Self, ParseError> {
        match tokens.last() {
            Some(last) if last.kind == TokenKind::Eof => Ok(Parser {
                tokens,
                pos: 0,
                config,
                depth: 0,
                open: Vec::new(),
            }),
            other => Err(InternalError {
                position: other.map(|t| t.pos).unwrap_or_default(),
                message: "token stream does not end with end of input".to_owned(),
            }
            .into()),
        }
    }

    fn cur(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Kind of the token `n` places after the cursor; `Eof` past the end.
    fn peek_at(&self, n: usize) -> TokenKind {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.cur().kind == kind
    }

    fn advance(&mut self) -> &'a Token {
        let t = self.cur();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        match t.kind {
            TokenKind::RParen | TokenKind::RBrace => {
                self.open.pop();
            }
            kind => {
                if let Some(closer) = kind.closer() {
                    self.open.push(closer);
                }
            }
        }
        t
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        self.expect_after(kind, &[])
    }

    /// Like `expect`, but the error also lists the tokens that could have
    /// continued the construct just parsed.
    fn expect_after(
        &mut self,
        kind: TokenKind,
        continuations: &[TokenKind],
    ) -> Result<&'a Token, ParseError> {
        if self.at(kind) {
            return Ok(self.advance());
        }
        let mut expected = continuations.to_vec();
        expected.push(kind);
        Err(self.unexpected(&expected))
    }

    fn take_ident(&mut self) -> Result<Ident, ParseError> {
        let t = self.expect(TokenKind::Id)?;
        Ok(Ident {
            name: t.text.clone(),
            pos: t.pos,
        })
    }

    fn unexpected(&self, expected: &[TokenKind]) -> ParseError {
        let found = self.cur();
        let mut expected = expected.to_vec();
        if found.kind == TokenKind::Eof {
            expected.extend(self.open.iter().copied());
        }
        expected.sort();
        expected.dedup();
        SyntaxError {
            expected,
            found: found.kind,
            lexeme: found.text.clone(),
            position: found.pos,
        }
        .into()
    }

    fn unexpected_in(&self, rule: Rule) -> ParseError {
        self.unexpected(first_set(rule))
    }

    fn internal(&self, message: impl Into<String>) -> ParseError {
        InternalError {
            position: self.cur().pos,
            message: message.into(),
        }
        .into()
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.config.max_depth,
                position: self.cur().pos,
            });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn expect_end(&self, continuations: &[TokenKind]) -> Result<(), ParseError> {
        if self.at(TokenKind::Eof) {
            return Ok(());
        }
        let mut expected = continuations.to_vec();
        expected.push(TokenKind::Eof);
        Err(self.unexpected(&expected))
    }

    // -- Program structure ----------------------------------

    fn program(&mut self) -> Result<Program, ParseError> {
        let mut functions = Vec::new();
        while self.at(TokenKind::Fun) {
            functions.push(self.fun_decl()?);
        }
        let body = self.stmt_block()?;
        self.expect_end(first_set(Rule::Stmt))?;
        Ok(Program { functions, body })
    }

    fn fun_decl(&mut self) -> Result<FunctionDecl, ParseError> {
        let pos = self.expect(TokenKind::Fun)?.pos;
        let name = self.take_ident()?;
        self.expect(TokenKind::LParen)?;
        let params = self.opt_id_list()?;
        self.expect_after(TokenKind::RParen, id_list_continuation(&params))?;
        self.expect(TokenKind::LBrace)?;
        let body = self.stmt_block()?;
        self.expect_after(TokenKind::RBrace, first_set(Rule::Stmt))?;
        Ok(FunctionDecl {
            name,
            params,
            body,
            pos,
        })
    }

    /// `(stmt ';')*`; stops at the first token that cannot start a statement.
    fn stmt_block(&mut self) -> Result<StmtBlock, ParseError> {
        let pos = self.cur().pos;
        let mut statements = Vec::new();
        while starts(Rule::Stmt, self.cur().kind) {
            statements.push(self.stmt()?);
            self.expect(TokenKind::Delimiter)?;
        }
        Ok(StmtBlock { statements, pos })
    }

    fn id_list(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut ids = vec![self.take_ident()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            ids.push(self.take_ident()?);
        }
        Ok(ids)
    }

    fn opt_id_list(&mut self) -> Result<Vec<Ident>, ParseError> {
        if self.at(TokenKind::Id) {
            self.id_list()
        } else {
            Ok(Vec::new())
        }
    }

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.cur().kind {
            TokenKind::Id => self.spec_stmt().map(Stmt::Assignment),
            TokenKind::Print | TokenKind::Execute => self.exec_stmt().map(Stmt::Execution),
            TokenKind::Return => self.return_stmt().map(Stmt::Return),
            _ => Err(self.unexpected_in(Rule::Stmt)),
        }
    }

    fn spec_stmt(&mut self) -> Result<Assignment, ParseError> {
        let target = self.take_ident()?;
        self.expect(TokenKind::Assign)?;
        let value = self.assignable()?;
        Ok(Assignment { target, value })
    }

    fn assignable(&mut self) -> Result<Assignable, ParseError> {
        Ok(match self.predict_assignable()? {
            AssignableChoice::Expression => Assignable::Expression(self.exp(LOWEST_PRECEDENCE)?),
            AssignableChoice::Artifact => Assignable::Artifact(self.artifact()?),
            AssignableChoice::ArgMap => Assignable::ArgMap(self.arg_map()?),
            AssignableChoice::Actor => Assignable::Actor(self.actor()?),
            AssignableChoice::Literal => Assignable::Literal(self.literal()?),
        })
    }

    fn exec_stmt(&mut self) -> Result<ExecStmt, ParseError> {
        let t = self.advance();
        let pos = t.pos;
        match t.kind {
            TokenKind::Print => {
                let actor = self.actor()?;
                self.expect(TokenKind::RParen)?;
                Ok(ExecStmt::Print { actor, pos })
            }
            TokenKind::Execute => {
                let actor = self.actor()?;
                self.expect(TokenKind::Comma)?;
                let inputs = match self.cur().kind {
                    TokenKind::Id => ExecInputs::Name(self.take_ident()?),
                    TokenKind::LBrace => ExecInputs::Map(self.arg_map()?),
                    _ => return Err(self.unexpected(&[TokenKind::LBrace, TokenKind::Id])),
                };
                self.expect(TokenKind::RParen)?;
                Ok(ExecStmt::Execute { actor, inputs, pos })
            }
            other => Err(self.internal(format!("exec statement entered on {}", other))),
        }
    }

    fn return_stmt(&mut self) -> Result<ReturnStmt, ParseError> {
        let pos = self.expect(TokenKind::Return)?.pos;
        let value = self.take_ident()?;
        Ok(ReturnStmt { value, pos })
    }
}

fn id_list_continuation(ids: &[Ident]) -> &'static [TokenKind] {
    if ids.is_empty() {
        &[TokenKind::Id]
    } else {
        &[TokenKind::Comma]
    }
}

// ──────────────────────────────────────────────
// Entry points
// ──────────────────────────────────────────────

/// Parse a whole program with default limits.
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    parse_with(tokens, &ParserConfig::default())
}

pub fn parse_with(tokens: &[Token], config: &ParserConfig) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens, config)?;
    let program = parser.program()?;
    debug!(
        functions = program.functions.len(),
        statements = program.body.statements.len(),
        "parsed program"
    );
    Ok(program)
}

/// Parse a single actor that must span the whole token stream.
pub fn parse_actor_tokens(tokens: &[Token], config: &ParserConfig) -> Result<Actor, ParseError> {
    let mut parser = Parser::new(tokens, config)?;
    let actor = parser.actor()?;
    parser.expect_end(&[])?;
    Ok(actor)
}

/// Parse a single expression that must span the whole token stream.
pub fn parse_expression_tokens(
    tokens: &[Token],
    config: &ParserConfig,
) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokens, config)?;
    let expr = parser.exp(LOWEST_PRECEDENCE)?;
    parser.expect_end(&[TokenKind::BinOp])?;
    Ok(expr)
}
