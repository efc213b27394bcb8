use std::path::Path;

use super::{parse_file, print_json};
use crate::config::CliConfig;
use crate::OutputFormat;

pub(crate) fn cmd_check(file: &Path, config: &CliConfig, output: OutputFormat, quiet: bool) {
    let program = parse_file(file, config, output, quiet);
    match output {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "file": file.display().to_string(),
                "ok": true,
                "functions": program.functions.len(),
                "statements": program.body.statements.len(),
            });
            print_json(&summary, output, quiet);
        }
        OutputFormat::Text => {
            if !quiet {
                println!("{}: ok", file.display());
            }
        }
    }
}
