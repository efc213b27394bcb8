//! Tokenizer for CoVeriLang source text.
//!
//! Whitespace and comments are dropped. Keywords that embed punctuation
//! (`print(`, `ActorFactory.create(`, `TestSpecToSpec()`, ...) are single
//! tokens and win over a shorter identifier by longest match.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::LexError;

/// Location of a token: 1-based line and column (in characters) plus the
/// byte offset into the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Terminal categories of the grammar.
///
/// The declaration order is the order used when listing expected tokens in
/// syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TokenKind {
    Fun,
    Return,
    Print,
    Execute,
    ActorFactoryCreate,
    ArtifactFactoryCreate,
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
    Not,
    InstanceOf,
    ElementOf,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Assign,
    Colon,
    Delimiter,
    Quote,
    Verdict,
    BinOp,
    Id,
    Str,
    TypeName,
    Eof,
}

impl TokenKind {
    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Fun => "'fun'",
            TokenKind::Return => "'return'",
            TokenKind::Print => "'print('",
            TokenKind::Execute => "'execute('",
            TokenKind::ActorFactoryCreate => "'ActorFactory.create('",
            TokenKind::ArtifactFactoryCreate => "'ArtifactFactory.create('",
            TokenKind::Sequence => "'SEQUENCE'",
            TokenKind::Ite => "'ITE'",
            TokenKind::Repeat => "'REPEAT'",
            TokenKind::Parallel => "'PARALLEL'",
            TokenKind::Joiner => "'Joiner'",
            TokenKind::Copy => "'Copy'",
            TokenKind::Rename => "'Rename'",
            TokenKind::TestSpecToSpec => "'TestSpecToSpec()'",
            TokenKind::SpecToTestSpec => "'SpecToTestSpec()'",
            TokenKind::Identity => "'Identity'",
            TokenKind::Not => "'NOT'",
            TokenKind::InstanceOf => "'INSTANCEOF'",
            TokenKind::ElementOf => "'ELEMENTOF'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Assign => "'='",
            TokenKind::Colon => "':'",
            TokenKind::Delimiter => "';'",
            TokenKind::Quote => "quote (')",
            TokenKind::Verdict => "verdict",
            TokenKind::BinOp => "binary operator",
            TokenKind::Id => "identifier",
            TokenKind::Str => "string literal",
            TokenKind::TypeName => "type name",
            TokenKind::Eof => "end of input",
        }
    }

    /// Upper-case tag used by token dumps.
    pub fn tag(self) -> &'static str {
        match self {
            TokenKind::Fun => "FUN",
            TokenKind::Return => "RETURN",
            TokenKind::Print => "PRINT",
            TokenKind::Execute => "EXECUTE",
            TokenKind::ActorFactoryCreate => "ACTOR_FACTORY",
            TokenKind::ArtifactFactoryCreate => "ARTIFACT_FACTORY",
            TokenKind::Sequence => "SEQUENCE",
            TokenKind::Ite => "ITE",
            TokenKind::Repeat => "REPEAT",
            TokenKind::Parallel => "PARALLEL",
            TokenKind::Joiner => "JOINER",
            TokenKind::Copy => "COPY",
            TokenKind::Rename => "RENAME",
            TokenKind::TestSpecToSpec => "TEST_SPEC_TO_SPEC",
            TokenKind::SpecToTestSpec => "SPEC_TO_TEST_SPEC",
            TokenKind::Identity => "IDENTITY",
            TokenKind::Not => "NOT",
            TokenKind::InstanceOf => "INSTANCEOF",
            TokenKind::ElementOf => "ELEMENTOF",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Colon => "COLON",
            TokenKind::Delimiter => "DELIMITER",
            TokenKind::Quote => "QUOTE",
            TokenKind::Verdict => "VERDICT",
            TokenKind::BinOp => "BIN_OP",
            TokenKind::Id => "ID",
            TokenKind::Str => "STRING",
            TokenKind::TypeName => "TYPE_NAME",
            TokenKind::Eof => "EOF",
        }
    }

    /// The token that closes a delimiter opened by this one, if any.
    pub fn closer(self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen
            | TokenKind::Print
            | TokenKind::Execute
            | TokenKind::ActorFactoryCreate
            | TokenKind::ArtifactFactoryCreate => Some(TokenKind::RParen),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexed token. `text` is the exact source slice (string literals keep
/// their quotes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Position,
}

// Checked before the plain word table; each entry is longer than the word
// it starts with, so longest match picks it.
const PUNCTUATED_KEYWORDS: &[(&str, TokenKind)] = &[
    ("ActorFactory.create(", TokenKind::ActorFactoryCreate),
    ("ArtifactFactory.create(", TokenKind::ArtifactFactoryCreate),
    ("TestSpecToSpec()", TokenKind::TestSpecToSpec),
    ("SpecToTestSpec()", TokenKind::SpecToTestSpec),
    ("execute(", TokenKind::Execute),
    ("print(", TokenKind::Print),
];

fn word_kind(word: &str) -> TokenKind {
    match word {
        "fun" => TokenKind::Fun,
        "return" => TokenKind::Return,
        "SEQUENCE" => TokenKind::Sequence,
        "ITE" => TokenKind::Ite,
        "REPEAT" => TokenKind::Repeat,
        "PARALLEL" => TokenKind::Parallel,
        "Joiner" => TokenKind::Joiner,
        "Copy" => TokenKind::Copy,
        "Rename" => TokenKind::Rename,
        "Identity" => TokenKind::Identity,
        "NOT" => TokenKind::Not,
        "INSTANCEOF" => TokenKind::InstanceOf,
        "ELEMENTOF" => TokenKind::ElementOf,
        "TRUE" | "FALSE" | "UNKNOWN" | "ERROR" => TokenKind::Verdict,
        "AND" | "OR" => TokenKind::BinOp,
        w if w.starts_with(|c: char| c.is_ascii_uppercase()) => TokenKind::TypeName,
        _ => TokenKind::Id,
    }
}

struct Scanner<'a> {
    src: &'a str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner {
            src,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn pos(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, start: Position) -> Result<(), LexError> {
        self.bump();
        self.bump();
        loop {
            match self.peek() {
                None => return Err(LexError::new(start, "unterminated block comment")),
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn lex_string(&mut self, start: Position) -> Result<(), LexError> {
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(LexError::new(start, "unterminated string literal"))
                }
                Some('"') => return Ok(()),
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(LexError::new(start, "unterminated escape in string"));
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn lex_word(&mut self) -> TokenKind {
        let start = self.offset;
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let word = &self.src[start..self.offset];
        for &(keyword, kind) in PUNCTUATED_KEYWORDS {
            if keyword.len() > word.len() && self.src[start..].starts_with(keyword) {
                // keywords are ASCII, so bytes and chars agree
                for _ in word.len()..keyword.len() {
                    self.bump();
                }
                return kind;
            }
        }
        word_kind(word)
    }
}

/// Convert source text into tokens, terminated by exactly one `Eof`.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut sc = Scanner::new(src);
    let mut tokens = Vec::new();

    while let Some(c) = sc.peek() {
        if c.is_whitespace() {
            sc.bump();
            continue;
        }
        if c == '/' && sc.peek_at(1) == Some('/') {
            sc.bump_while(|c| c != '\n');
            continue;
        }
        let start = sc.pos();
        if c == '/' && sc.peek_at(1) == Some('*') {
            sc.skip_block_comment(start)?;
            continue;
        }

        let kind = match c {
            '"' => {
                sc.lex_string(start)?;
                TokenKind::Str
            }
            c if c.is_ascii_digit() => {
                sc.bump_while(|c| c.is_ascii_digit());
                TokenKind::Str
            }
            c if c.is_ascii_alphabetic() || c == '_' => sc.lex_word(),
            '=' | '!' => {
                sc.bump();
                if sc.peek() == Some('=') {
                    sc.bump();
                    TokenKind::BinOp
                } else if c == '=' {
                    TokenKind::Assign
                } else {
                    return Err(LexError::new(start, "expected '=' after '!'"));
                }
            }
            '(' | ')' | '{' | '}' | ',' | ':' | ';' | '\'' => {
                sc.bump();
                match c {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    ';' => TokenKind::Delimiter,
                    _ => TokenKind::Quote,
                }
            }
            other => {
                return Err(LexError::new(
                    start,
                    format!("unexpected character '{}'", other),
                ))
            }
        };

        tokens.push(Token {
            kind,
            text: src[start.offset..sc.offset].to_owned(),
            pos: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        pos: sc.pos(),
    });
    debug!(tokens = tokens.len(), bytes = src.len(), "tokenized source");
    Ok(tokens)
}

/// The value of a `STRING` token: quotes stripped and `\"`/`\\` resolved.
/// Numeric literals are returned unchanged.
pub fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_owned();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn punctuated_keywords_win_by_longest_match() {
        assert_eq!(
            kinds("print(x) execute( ActorFactory.create( TestSpecToSpec()"),
            vec![
                TokenKind::Print,
                TokenKind::Id,
                TokenKind::RParen,
                TokenKind::Execute,
                TokenKind::ActorFactoryCreate,
                TokenKind::TestSpecToSpec,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_followed_by_space_is_an_identifier() {
        assert_eq!(
            kinds("print ("),
            vec![TokenKind::Id, TokenKind::LParen, TokenKind::Eof]
        );
    }

    #[test]
    fn words_are_classified_by_exact_match_then_case() {
        assert_eq!(
            kinds("fun funny SEQUENCE SEQUENCEX ProgramVerifier TRUE AND _tmp"),
            vec![
                TokenKind::Fun,
                TokenKind::Id,
                TokenKind::Sequence,
                TokenKind::TypeName,
                TokenKind::TypeName,
                TokenKind::Verdict,
                TokenKind::BinOp,
                TokenKind::Id,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_and_punctuation() {
        assert_eq!(
            kinds("a == b != c = 'k' : ; { }"),
            vec![
                TokenKind::Id,
                TokenKind::BinOp,
                TokenKind::Id,
                TokenKind::BinOp,
                TokenKind::Id,
                TokenKind::Assign,
                TokenKind::Quote,
                TokenKind::Id,
                TokenKind::Quote,
                TokenKind::Colon,
                TokenKind::Delimiter,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_and_whitespace_are_discarded() {
        let src = "// header\nx /* inline\n comment */ = 5; // trailing";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::Id,
                TokenKind::Assign,
                TokenKind::Str,
                TokenKind::Delimiter,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn positions_track_line_column_and_offset() {
        let tokens = tokenize("x =\n  \"é\";").unwrap();
        assert_eq!(tokens[0].pos, Position::start());
        assert_eq!(
            tokens[2].pos,
            Position {
                line: 2,
                column: 3,
                offset: 6
            }
        );
        assert_eq!(tokens[2].text, "\"é\"");
        // 'é' is two bytes but one column
        assert_eq!(tokens[3].pos.column, 6);
        assert_eq!(tokens[3].pos.offset, 10);
    }

    #[test]
    fn eof_is_appended_exactly_once() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn unexpected_character_reports_position() {
        let err = tokenize("x = 5;\ny = @").unwrap_err();
        assert_eq!(err.position.line, 2);
        assert_eq!(err.position.column, 5);
        assert!(err.message.contains('@'));
    }

    #[test]
    fn unterminated_string_and_comment_are_errors() {
        assert!(tokenize("x = \"open").is_err());
        assert!(tokenize("x = \"line\nbreak\"").is_err());
        assert!(tokenize("/* never closed").is_err());
        assert!(tokenize("a ! b").is_err());
    }

    #[test]
    fn unquote_resolves_escapes() {
        assert_eq!(unquote(r#""a\"b\\c""#), "a\"b\\c");
        assert_eq!(unquote("42"), "42");
        // only quote and backslash are escapes
        assert_eq!(unquote(r#""a\nb""#), "a\\nb");
    }
}
