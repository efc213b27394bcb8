use std::path::Path;

use coverilang_core::{tokenize, ParseError, TokenKind};

use super::print_json;
use crate::{fail_parse, read_source, OutputFormat};

pub(crate) fn cmd_tokens(file: &Path, output: OutputFormat, quiet: bool) {
    let src = read_source(file, output, quiet);
    let tokens = match tokenize(&src) {
        Ok(t) => t,
        Err(e) => fail_parse(file, &ParseError::from(e), output, quiet),
    };

    match output {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = tokens
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "kind": t.kind.tag(),
                        "text": t.text,
                        "line": t.pos.line,
                        "column": t.pos.column,
                        "offset": t.pos.offset,
                    })
                })
                .collect();
            print_json(&rows, output, quiet);
        }
        OutputFormat::Text => {
            for t in &tokens {
                let at = format!("{}:{}", t.pos.line, t.pos.column);
                if t.kind == TokenKind::Eof {
                    println!("{:<8} {}", at, t.kind.tag());
                } else {
                    println!("{:<8} {:<24} '{}'", at, t.kind.tag(), t.text);
                }
            }
        }
    }
}
