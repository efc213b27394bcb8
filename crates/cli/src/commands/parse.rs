use std::path::Path;

use coverilang_core::outline;

use super::{parse_file, print_json};
use crate::config::CliConfig;
use crate::OutputFormat;

pub(crate) fn cmd_parse(file: &Path, config: &CliConfig, output: OutputFormat, quiet: bool) {
    let program = parse_file(file, config, output, quiet);
    match output {
        OutputFormat::Json => print_json(&program, output, quiet),
        OutputFormat::Text => print!("{}", outline(&program)),
    }
}
