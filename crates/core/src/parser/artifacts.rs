use super::Parser;
use crate::ast::{ArgMap, Artifact, Ident, Literal, MapItem, MapValue, Reference, TypeName};
use crate::error::ParseError;
use crate::grammar::Rule;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    /// `'{' map_item (',' map_item)* '}'`
    pub(super) fn arg_map(&mut self) -> Result<ArgMap, ParseError> {
        let pos = self.expect(TokenKind::LBrace)?.pos;
        let mut items = vec![self.map_item()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            items.push(self.map_item()?);
        }
        self.expect_after(TokenKind::RBrace, &[TokenKind::Comma])?;
        Ok(ArgMap { items, pos })
    }

    fn map_item(&mut self) -> Result<MapItem, ParseError> {
        let key = self.quoted_id()?;
        if !self.at(TokenKind::Colon) {
            return Ok(MapItem { key, value: None });
        }
        self.advance();
        let value = match self.cur().kind {
            TokenKind::ArtifactFactoryCreate | TokenKind::Id => MapValue::Artifact(self.artifact()?),
            TokenKind::TypeName => MapValue::ArtifactType(self.type_name()?),
            TokenKind::Quote => MapValue::Quoted(self.quoted_id()?),
            _ => {
                return Err(self.unexpected(&[
                    TokenKind::ArtifactFactoryCreate,
                    TokenKind::Quote,
                    TokenKind::Id,
                    TokenKind::TypeName,
                ]))
            }
        };
        Ok(MapItem {
            key,
            value: Some(value),
        })
    }

    pub(super) fn artifact(&mut self) -> Result<Artifact, ParseError> {
        match self.cur().kind {
            TokenKind::ArtifactFactoryCreate => {
                let pos = self.advance().pos;
                let artifact_type = self.type_name()?;
                self.expect(TokenKind::Comma)?;
                let source = self.reference()?;
                self.expect(TokenKind::RParen)?;
                Ok(Artifact::Literal {
                    artifact_type,
                    source,
                    pos,
                })
            }
            TokenKind::Id => Ok(Artifact::Alias(self.take_ident()?)),
            _ => Err(self.unexpected_in(Rule::Artifact)),
        }
    }

    /// `ID | STRING`
    pub(super) fn reference(&mut self) -> Result<Reference, ParseError> {
        match self.cur().kind {
            TokenKind::Id => Ok(Reference::Name(self.take_ident()?)),
            TokenKind::Str => Ok(Reference::Literal(self.literal()?)),
            _ => Err(self.unexpected(&[TokenKind::Id, TokenKind::Str])),
        }
    }

    pub(super) fn type_name(&mut self) -> Result<TypeName, ParseError> {
        let t = self.expect(TokenKind::TypeName)?;
        Ok(TypeName {
            name: t.text.clone(),
            pos: t.pos,
        })
    }

    /// `'\'' ID '\''`; the only place a quote token is accepted.
    pub(super) fn quoted_id(&mut self) -> Result<Ident, ParseError> {
        self.expect(TokenKind::Quote)?;
        let id = self.take_ident()?;
        self.expect(TokenKind::Quote)?;
        Ok(id)
    }

    pub(super) fn literal(&mut self) -> Result<Literal, ParseError> {
        let t = self.expect(TokenKind::Str)?;
        Ok(Literal {
            raw: t.text.clone(),
            pos: t.pos,
        })
    }
}
