mod check;
mod fmt;
mod lint;
mod parse;
mod tokens;

pub(crate) use check::cmd_check;
pub(crate) use fmt::cmd_fmt;
pub(crate) use lint::cmd_lint;
pub(crate) use parse::cmd_parse;
pub(crate) use tokens::cmd_tokens;

use std::path::Path;

use coverilang_core::{parse_source_with, Program};

use crate::config::CliConfig;
use crate::{fail_parse, read_source, OutputFormat};

/// Read and parse `file`, exiting with status 1 on any failure.
fn parse_file(file: &Path, config: &CliConfig, output: OutputFormat, quiet: bool) -> Program {
    let src = read_source(file, output, quiet);
    match parse_source_with(&src, &config.parser) {
        Ok(program) => program,
        Err(e) => fail_parse(file, &e, output, quiet),
    }
}

fn print_json(value: &impl serde::Serialize, output: OutputFormat, quiet: bool) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            crate::report_error(&format!("JSON serialization error: {}", e), output, quiet);
            std::process::exit(1);
        }
    }
}
