//! `--config` file loading.
//!
//! ```toml
//! [parser]
//! max_lookahead = 64
//! max_depth = 256
//!
//! [format]
//! indent = 4
//! ```
//!
//! Every table and key is optional; unknown keys are rejected.

use std::path::Path;

use coverilang_core::{ParserConfig, PrintOptions};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub parser: ParserConfig,
    pub format: PrintOptions,
}

pub(crate) fn load_config(path: &Path) -> Result<CliConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    let config = parse_config(&content)
        .map_err(|e| format!("could not parse '{}': {}", path.display(), e))?;
    tracing::debug!(
        path = %path.display(),
        max_lookahead = config.parser.max_lookahead,
        max_depth = config.parser.max_depth,
        indent = config.format.indent,
        "loaded config"
    );
    Ok(config)
}

fn parse_config(content: &str) -> Result<CliConfig, toml::de::Error> {
    toml::from_str(content)
}
