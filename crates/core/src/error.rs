use serde::Serialize;

use crate::lexer::{Position, TokenKind};

/// Input text that matches no terminal class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{position}: {message}")]
pub struct LexError {
    pub position: Position,
    pub message: String,
}

impl LexError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        LexError {
            position,
            message: message.into(),
        }
    }
}

/// The next token starts no alternative of the rule being parsed.
///
/// `expected` is sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{position}: expected {}, found {}", describe_expected(.expected), describe_found(.found, .lexeme))]
pub struct SyntaxError {
    pub expected: Vec<TokenKind>,
    pub found: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl SyntaxError {
    /// The message without the position prefix.
    pub fn message(&self) -> String {
        format!(
            "expected {}, found {}",
            describe_expected(&self.expected),
            describe_found(&self.found, &self.lexeme)
        )
    }
}

/// A fault in the parser or its tables rather than in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{position}: {message}")]
pub struct InternalError {
    pub position: Position,
    pub message: String,
}

/// Everything the top-level entry points can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("lexical error at {0}")]
    Lex(#[from] LexError),
    #[error("syntax error at {0}")]
    Syntax(#[from] SyntaxError),
    #[error("internal parser error at {0}")]
    Internal(#[from] InternalError),
    #[error("nesting deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position,
            ParseError::Syntax(e) => e.position,
            ParseError::Internal(e) => e.position,
            ParseError::NestingTooDeep { position, .. } => *position,
        }
    }

    /// Internal errors are parser bugs and should not be shown as user mistakes.
    pub fn is_internal(&self) -> bool {
        matches!(self, ParseError::Internal(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Lex(_) => "lex",
            ParseError::Syntax(_) => "syntax",
            ParseError::Internal(_) => "internal",
            ParseError::NestingTooDeep { .. } => "nesting",
        }
    }

    /// The message without the position prefix.
    pub fn message(&self) -> String {
        match self {
            ParseError::Lex(e) => e.message.clone(),
            ParseError::Syntax(e) => e.message(),
            ParseError::Internal(e) => e.message.clone(),
            ParseError::NestingTooDeep { limit, .. } => {
                format!("nesting deeper than {} levels", limit)
            }
        }
    }

    /// Stable JSON shape for tooling. All keys are always present; `expected`
    /// and `found` are null unless this is a syntax error.
    pub fn to_json_value(&self) -> serde_json::Value {
        let pos = self.position();
        let (expected, found) = match self {
            ParseError::Syntax(e) => (
                Some(e.expected.iter().map(|k| k.tag()).collect::<Vec<_>>()),
                Some(e.found.tag()),
            ),
            _ => (None, None),
        };
        serde_json::json!({
            "column":   pos.column,
            "expected": expected,
            "found":    found,
            "kind":     self.kind(),
            "line":     pos.line,
            "message":  self.message(),
            "offset":   pos.offset,
        })
    }
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "nothing".to_owned(),
        [only] => only.describe().to_owned(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|k| k.describe()).collect();
            format!("{} or {}", head.join(", "), last.describe())
        }
    }
}

fn describe_found(found: &TokenKind, lexeme: &str) -> String {
    match found {
        TokenKind::Eof => found.describe().to_owned(),
        TokenKind::Id | TokenKind::TypeName | TokenKind::Str => {
            format!("{} '{}'", found.describe(), lexeme)
        }
        _ => found.describe().to_owned(),
    }
}
