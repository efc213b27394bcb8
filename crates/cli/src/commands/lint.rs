use std::path::Path;

use coverilang_core::lint::run_lints;

use super::{parse_file, print_json};
use crate::config::CliConfig;
use crate::OutputFormat;

/// Lint findings are reported on stdout and never change the exit status;
/// only a parse failure does.
pub(crate) fn cmd_lint(file: &Path, config: &CliConfig, output: OutputFormat, quiet: bool) {
    let program = parse_file(file, config, output, quiet);
    let diagnostics = run_lints(&program);
    tracing::debug!(count = diagnostics.len(), "lint finished");

    match output {
        OutputFormat::Json => print_json(&diagnostics, output, quiet),
        OutputFormat::Text => {
            for d in &diagnostics {
                println!(
                    "{}:{}:{}: {}: {}",
                    file.display(),
                    d.position.line,
                    d.position.column,
                    d.rule,
                    d.message
                );
            }
            if diagnostics.is_empty() && !quiet {
                println!("{}: no lints", file.display());
            }
        }
    }
}
