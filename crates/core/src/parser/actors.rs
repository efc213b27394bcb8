use tracing::trace;

use super::Parser;
use crate::ast::{Actor, ArgMap, IdentityTarget, UtilityActor};
use crate::error::ParseError;
use crate::grammar::{first_set, starts, Rule, LOWEST_PRECEDENCE};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn actor(&mut self) -> Result<Actor, ParseError> {
        self.descend()?;
        let actor = self.actor_alternative();
        self.ascend();
        actor
    }

    fn actor_alternative(&mut self) -> Result<Actor, ParseError> {
        match self.cur().kind {
            TokenKind::ActorFactoryCreate => self.factory_actor(),
            TokenKind::Id if self.peek_at(1) == TokenKind::LParen => self.function_call(),
            TokenKind::Id => Ok(Actor::Alias(self.take_ident()?)),
            TokenKind::Joiner
            | TokenKind::Copy
            | TokenKind::Rename
            | TokenKind::TestSpecToSpec
            | TokenKind::SpecToTestSpec
            | TokenKind::Identity => self.utility_actor().map(Actor::Utility),
            TokenKind::Sequence => {
                let pos = self.advance().pos;
                let (first, second) = self.actor_pair()?;
                Ok(Actor::Sequence { first, second, pos })
            }
            TokenKind::Parallel => {
                let pos = self.advance().pos;
                let (first, second) = self.actor_pair()?;
                Ok(Actor::Parallel { first, second, pos })
            }
            TokenKind::Ite => {
                let pos = self.advance().pos;
                self.expect(TokenKind::LParen)?;
                let condition = self.exp(LOWEST_PRECEDENCE)?;
                self.expect_after(TokenKind::Comma, &[TokenKind::BinOp])?;
                let (then_actor, else_actor) = self.actor_pair_tail()?;
                Ok(Actor::IfThenElse {
                    condition,
                    then_actor,
                    else_actor,
                    pos,
                })
            }
            TokenKind::Repeat => {
                let pos = self.advance().pos;
                self.expect(TokenKind::LParen)?;
                let variable = self.quoted_id()?;
                self.expect(TokenKind::Comma)?;
                let body = Box::new(self.actor()?);
                self.expect(TokenKind::RParen)?;
                Ok(Actor::Iterative {
                    variable,
                    body,
                    pos,
                })
            }
            TokenKind::LParen => {
                let pos = self.advance().pos;
                let inner = Box::new(self.actor()?);
                self.expect(TokenKind::RParen)?;
                Ok(Actor::Parenthesized { inner, pos })
            }
            _ => Err(self.unexpected_in(Rule::Actor)),
        }
    }

    /// `'(' actor ',' actor ')'` after a binary combinator keyword.
    fn actor_pair(&mut self) -> Result<(Box<Actor>, Box<Actor>), ParseError> {
        self.expect(TokenKind::LParen)?;
        self.actor_pair_tail()
    }

    /// `actor ',' actor ')'` once the opening part has been consumed.
    fn actor_pair_tail(&mut self) -> Result<(Box<Actor>, Box<Actor>), ParseError> {
        let first = Box::new(self.actor()?);
        self.expect(TokenKind::Comma)?;
        let second = Box::new(self.actor()?);
        self.expect(TokenKind::RParen)?;
        Ok((first, second))
    }

    /// `ActorFactory.create(` followed by either `TYPE_NAME ',' (ID | STRING) ')'`
    /// or a nested actor, in which case the call is transparent.
    fn factory_actor(&mut self) -> Result<Actor, ParseError> {
        let pos = self.expect(TokenKind::ActorFactoryCreate)?.pos;
        if !self.at(TokenKind::TypeName) {
            if !starts(Rule::Actor, self.cur().kind) {
                let mut expected = first_set(Rule::Actor).to_vec();
                expected.push(TokenKind::TypeName);
                return Err(self.unexpected(&expected));
            }
            let inner = self.actor()?;
            self.expect(TokenKind::RParen)?;
            trace!(%pos, "factory call wraps an actor");
            return Ok(inner);
        }
        let actor_type = self.type_name()?;
        self.expect(TokenKind::Comma)?;
        let source = self.reference()?;
        self.expect(TokenKind::RParen)?;
        Ok(Actor::Atomic {
            actor_type,
            source,
            pos,
        })
    }

    fn function_call(&mut self) -> Result<Actor, ParseError> {
        let name = self.take_ident()?;
        self.expect(TokenKind::LParen)?;
        let args = self.opt_id_list()?;
        self.expect_after(TokenKind::RParen, super::id_list_continuation(&args))?;
        Ok(Actor::FunctionCall { name, args })
    }

    fn utility_actor(&mut self) -> Result<UtilityActor, ParseError> {
        let t = self.advance();
        let pos = t.pos;
        match t.kind {
            TokenKind::Joiner => {
                self.expect(TokenKind::LParen)?;
                let artifact_type = self.type_name()?;
                self.expect(TokenKind::Comma)?;
                let merge = self.arg_map()?;
                self.expect(TokenKind::Comma)?;
                let output = self.quoted_id()?;
                self.expect(TokenKind::RParen)?;
                Ok(UtilityActor::Joiner {
                    artifact_type,
                    merge,
                    output,
                    pos,
                })
            }
            TokenKind::Copy => {
                let map = self.parenthesized_map()?;
                Ok(UtilityActor::Copy { map, pos })
            }
            TokenKind::Rename => {
                let map = self.parenthesized_map()?;
                Ok(UtilityActor::Rename { map, pos })
            }
            TokenKind::TestSpecToSpec => Ok(UtilityActor::TestSpecToSpec { pos }),
            TokenKind::SpecToTestSpec => Ok(UtilityActor::SpecToTestSpec { pos }),
            TokenKind::Identity => {
                self.expect(TokenKind::LParen)?;
                let target = if self.at(TokenKind::LBrace) {
                    IdentityTarget::Map(self.arg_map()?)
                } else if starts(Rule::Actor, self.cur().kind) {
                    IdentityTarget::Actor(Box::new(self.actor()?))
                } else {
                    let mut expected = first_set(Rule::Actor).to_vec();
                    expected.push(TokenKind::LBrace);
                    return Err(self.unexpected(&expected));
                };
                self.expect(TokenKind::RParen)?;
                Ok(UtilityActor::Identity { target, pos })
            }
            other => Err(self.internal(format!("utility actor entered on {}", other))),
        }
    }

    fn parenthesized_map(&mut self) -> Result<ArgMap, ParseError> {
        self.expect(TokenKind::LParen)?;
        let map = self.arg_map()?;
        self.expect(TokenKind::RParen)?;
        Ok(map)
    }
}
