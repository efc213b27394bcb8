//! Boolean expressions.
//!
//! The left-recursive `exp BIN_OP exp` alternative is unrolled into a loop
//! that folds each operator into the accumulated left operand. `NOT` parses
//! its operand at the binary tier, so it covers a whole operator chain,
//! while the right operand of a `BIN_OP` is parsed one tier higher and
//! therefore never absorbs the operators that follow it.

use super::Parser;
use crate::ast::{BinOp, Expr, Verdict};
use crate::error::ParseError;
use crate::grammar::{Rule, BINARY_PRECEDENCE, LOWEST_PRECEDENCE};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn exp(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        self.descend()?;
        let expr = self.exp_climb(min_precedence);
        self.ascend();
        expr
    }

    fn exp_climb(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.exp_prefix()?;
        while self.at(TokenKind::BinOp) && BINARY_PRECEDENCE >= min_precedence {
            let t = self.advance();
            let op = BinOp::from_lexeme(&t.text)
                .ok_or_else(|| self.internal(format!("unknown binary operator '{}'", t.text)))?;
            let right = self.exp(BINARY_PRECEDENCE + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                op_pos: t.pos,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn exp_prefix(&mut self) -> Result<Expr, ParseError> {
        match self.cur().kind {
            TokenKind::Not => {
                let pos = self.advance().pos;
                let operand = Box::new(self.exp(BINARY_PRECEDENCE)?);
                Ok(Expr::Not { operand, pos })
            }
            TokenKind::InstanceOf => {
                let pos = self.advance().pos;
                self.expect(TokenKind::LParen)?;
                let subject = self.take_ident()?;
                self.expect(TokenKind::Comma)?;
                let artifact_type = self.type_name()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::InstanceOf {
                    subject,
                    artifact_type,
                    pos,
                })
            }
            TokenKind::ElementOf => {
                let pos = self.advance().pos;
                self.expect(TokenKind::LParen)?;
                let subject = self.take_ident()?;
                self.expect(TokenKind::Comma)?;
                self.expect(TokenKind::LBrace)?;
                let verdicts = self.verdict_list()?;
                self.expect_after(TokenKind::RBrace, &[TokenKind::Comma])?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::ElementOf {
                    subject,
                    verdicts,
                    pos,
                })
            }
            TokenKind::Id => Ok(Expr::Alias(self.take_ident()?)),
            TokenKind::LParen => {
                let pos = self.advance().pos;
                let inner = Box::new(self.exp(LOWEST_PRECEDENCE)?);
                self.expect_after(TokenKind::RParen, &[TokenKind::BinOp])?;
                Ok(Expr::Parenthesized { inner, pos })
            }
            _ => Err(self.unexpected_in(Rule::Exp)),
        }
    }

    fn verdict_list(&mut self) -> Result<Vec<Verdict>, ParseError> {
        let mut verdicts = vec![self.verdict()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            verdicts.push(self.verdict()?);
        }
        Ok(verdicts)
    }

    fn verdict(&mut self) -> Result<Verdict, ParseError> {
        let t = self.expect(TokenKind::Verdict)?;
        Verdict::from_lexeme(&t.text)
            .ok_or_else(|| self.internal(format!("unknown verdict '{}'", t.text)))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinOp, Expr};
    use crate::error::ParseError;
    use crate::lexer::{tokenize, TokenKind};
    use crate::parser::{parse_expression_tokens, ParserConfig};

    fn exp(src: &str) -> Result<Expr, ParseError> {
        parse_expression_tokens(&tokenize(src).unwrap(), &ParserConfig::default())
    }

    /// Fully parenthesized rendering, for comparing tree shapes.
    fn shape(e: &Expr) -> String {
        match e {
            Expr::Not { operand, .. } => format!("NOT({})", shape(operand)),
            Expr::InstanceOf {
                subject,
                artifact_type,
                ..
            } => format!("{} is {}", subject.name, artifact_type.name),
            Expr::ElementOf {
                subject, verdicts, ..
            } => format!("{} in {}", subject.name, verdicts.len()),
            Expr::Alias(id) => id.name.clone(),
            Expr::Parenthesized { inner, .. } => format!("[{}]", shape(inner)),
            Expr::Binary {
                left, op, right, ..
            } => format!("({} {} {})", shape(left), op, shape(right)),
        }
    }

    #[test]
    fn chains_associate_to_the_left() {
        assert_eq!(shape(&exp("a == b == c").unwrap()), "((a == b) == c)");
        assert_eq!(
            shape(&exp("a AND b OR c != d").unwrap()),
            "(((a AND b) OR c) != d)"
        );
    }

    #[test]
    fn not_covers_the_rest_of_the_chain() {
        assert_eq!(shape(&exp("NOT a AND b").unwrap()), "NOT((a AND b))");
        assert_eq!(shape(&exp("a AND NOT b OR c").unwrap()), "(a AND NOT((b OR c)))");
        assert_eq!(shape(&exp("(NOT a) AND b").unwrap()), "([NOT(a)] AND b)");
    }

    #[test]
    fn prefix_forms() {
        assert_eq!(
            shape(&exp("INSTANCEOF(p, CProgram) OR ELEMENTOF(v, {TRUE, UNKNOWN})").unwrap()),
            "(p is CProgram OR v in 2)"
        );
        match exp("a != b").unwrap() {
            Expr::Binary { op, op_pos, .. } => {
                assert_eq!(op, BinOp::NotEq);
                assert_eq!(op_pos.column, 3);
            }
            other => panic!("unexpected expression {:?}", other),
        }
    }

    #[test]
    fn dangling_operator_is_a_syntax_error() {
        match exp("a AND") {
            Err(ParseError::Syntax(e)) => {
                assert_eq!(e.found, TokenKind::Eof);
                assert!(e.expected.contains(&TokenKind::Not));
                assert!(e.expected.contains(&TokenKind::Id));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn empty_verdict_set_is_rejected() {
        assert!(matches!(exp("ELEMENTOF(v, {})"), Err(ParseError::Syntax(_))));
    }
}
