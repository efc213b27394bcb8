use std::path::Path;

use coverilang_core::print_program;

use super::parse_file;
use crate::config::CliConfig;
use crate::OutputFormat;

/// Formatted source always goes to stdout as plain text; `--output` only
/// affects how errors are reported.
pub(crate) fn cmd_fmt(file: &Path, config: &CliConfig, output: OutputFormat, quiet: bool) {
    let program = parse_file(file, config, output, quiet);
    print!("{}", print_program(&program, &config.format));
}
