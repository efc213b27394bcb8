use tracing::trace;

use super::Parser;
use crate::error::ParseError;
use crate::grammar::{starts, Rule};
use crate::lexer::TokenKind;

/// Which alternative of `assignable` the upcoming tokens select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AssignableChoice {
    Expression,
    Artifact,
    ArgMap,
    Actor,
    Literal,
}

impl<'a> Parser<'a> {
    /// Decide the right-hand side of an assignment without consuming tokens.
    ///
    /// Leading `(` are skipped; the first other token decides, except for an
    /// identifier, which needs the token after it. Where an identifier could
    /// be an expression, an artifact or an actor alias, the expression wins.
    pub(super) fn predict_assignable(&self) -> Result<AssignableChoice, ParseError> {
        let parens = self.skip_open_parens()?;

        let head = self.peek_at(parens);
        let choice = match head {
            TokenKind::Not | TokenKind::InstanceOf | TokenKind::ElementOf => {
                AssignableChoice::Expression
            }
            TokenKind::ArtifactFactoryCreate if parens == 0 => AssignableChoice::Artifact,
            TokenKind::LBrace if parens == 0 => AssignableChoice::ArgMap,
            TokenKind::Str if parens == 0 => AssignableChoice::Literal,
            TokenKind::Id => match self.lookahead(parens, 1)? {
                TokenKind::LParen => AssignableChoice::Actor,
                _ => AssignableChoice::Expression,
            },
            // inside parentheses only actors and expressions are possible;
            // the actor rule reports anything else
            _ if parens > 0 || starts(Rule::Actor, head) => AssignableChoice::Actor,
            _ => return Err(self.unexpected_in(Rule::Assignable)),
        };
        trace!(?head, parens, ?choice, "assignable lookahead");
        Ok(choice)
    }

    /// Count the run of `(` at the cursor. Each one opens a nesting level,
    /// so the run is bounded by the remaining `max_depth`.
    fn skip_open_parens(&self) -> Result<usize, ParseError> {
        let room = self.config.max_depth.saturating_sub(self.depth);
        let mut parens = 0;
        while self.peek_at(parens) == TokenKind::LParen {
            if parens == room {
                return Err(ParseError::NestingTooDeep {
                    limit: self.config.max_depth,
                    position: self.tokens[(self.pos + parens).min(self.tokens.len() - 1)].pos,
                });
            }
            parens += 1;
        }
        Ok(parens)
    }

    /// Kind of the token `n` places past `start`, bounded by `max_lookahead`.
    fn lookahead(&self, start: usize, n: usize) -> Result<TokenKind, ParseError> {
        if n >= self.config.max_lookahead {
            return Err(self.internal(format!(
                "assignment lookahead exceeded {} tokens",
                self.config.max_lookahead
            )));
        }
        Ok(self.peek_at(start + n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::ParserConfig;

    fn predict(rhs: &str) -> Result<AssignableChoice, ParseError> {
        let tokens = tokenize(rhs).unwrap();
        let config = ParserConfig::default();
        let parser = Parser::new(&tokens, &config)?;
        parser.predict_assignable()
    }

    #[test]
    fn first_token_decides_unambiguous_forms() {
        assert_eq!(predict("NOT a").unwrap(), AssignableChoice::Expression);
        assert_eq!(
            predict("ArtifactFactory.create(Program, \"a.c\")").unwrap(),
            AssignableChoice::Artifact
        );
        assert_eq!(predict("{'a': b}").unwrap(), AssignableChoice::ArgMap);
        assert_eq!(predict("\"text\"").unwrap(), AssignableChoice::Literal);
        assert_eq!(predict("SEQUENCE(a, b)").unwrap(), AssignableChoice::Actor);
    }

    #[test]
    fn identifier_needs_the_next_token() {
        assert_eq!(predict("f(x)").unwrap(), AssignableChoice::Actor);
        assert_eq!(predict("a AND b").unwrap(), AssignableChoice::Expression);
        assert_eq!(predict("a").unwrap(), AssignableChoice::Expression);
    }

    #[test]
    fn parentheses_are_skipped() {
        assert_eq!(predict("((a)) == b").unwrap(), AssignableChoice::Expression);
        assert_eq!(predict("((a))").unwrap(), AssignableChoice::Expression);
        assert_eq!(predict("(NOT a)").unwrap(), AssignableChoice::Expression);
        assert_eq!(predict("(f(x))").unwrap(), AssignableChoice::Actor);
        assert_eq!(predict("(SEQUENCE(a, b))").unwrap(), AssignableChoice::Actor);
    }

    #[test]
    fn long_paren_runs_count_as_nesting() {
        let rhs = format!("{}a{}", "(".repeat(70), ")".repeat(70));
        assert_eq!(predict(&rhs).unwrap(), AssignableChoice::Expression);

        let tokens = tokenize(&rhs).unwrap();
        let config = ParserConfig {
            max_depth: 32,
            ..ParserConfig::default()
        };
        let parser = Parser::new(&tokens, &config).unwrap();
        let err = parser.predict_assignable().unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { limit: 32, .. }));
        assert!(!err.is_internal());
    }

    #[test]
    fn lookahead_bound_is_internal() {
        let tokens = tokenize("a b").unwrap();
        let config = ParserConfig {
            max_lookahead: 1,
            ..ParserConfig::default()
        };
        let parser = Parser::new(&tokens, &config).unwrap();
        assert!(parser.predict_assignable().unwrap_err().is_internal());
    }

    #[test]
    fn nothing_assignable_is_a_syntax_error() {
        let err = predict(";").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }
}
