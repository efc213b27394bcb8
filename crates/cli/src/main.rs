mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use coverilang_core::ParseError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::commands::{cmd_check, cmd_fmt, cmd_lint, cmd_parse, cmd_tokens};
use crate::config::{load_config, CliConfig};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// CoVeriLang parser toolchain.
#[derive(Parser)]
#[command(name = "coverilang", version, about = "CoVeriLang parser toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log parser activity to stderr
    #[arg(long, global = true)]
    verbose: bool,

    /// TOML file with [parser] and [format] settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a source file
    Tokens {
        /// Path to the .cvt source file
        file: PathBuf,
    },

    /// Parse a source file and print its outline (or the tree as JSON)
    Parse {
        /// Path to the .cvt source file
        file: PathBuf,
    },

    /// Print a source file in canonical form
    Fmt {
        /// Path to the .cvt source file
        file: PathBuf,
    },

    /// Check that a source file parses
    Check {
        /// Path to the .cvt source file
        file: PathBuf,
    },

    /// Report style lints for a source file
    Lint {
        /// Path to the .cvt source file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => {
                report_error(&e, cli.output, cli.quiet);
                process::exit(1);
            }
        },
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Tokens { file } => cmd_tokens(&file, cli.output, cli.quiet),
        Commands::Parse { file } => cmd_parse(&file, &config, cli.output, cli.quiet),
        Commands::Fmt { file } => cmd_fmt(&file, &config, cli.output, cli.quiet),
        Commands::Check { file } => cmd_check(&file, &config, cli.output, cli.quiet),
        Commands::Lint { file } => cmd_lint(&file, &config, cli.output, cli.quiet),
    }
}

/// Logs go to stderr. `COVERILANG_LOG` takes an env-filter directive string;
/// without it only warnings are shown, and `--verbose` raises that to debug.
fn init_tracing(verbose: bool) {
    let mut filter =
        EnvFilter::try_from_env("COVERILANG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        filter = filter.add_directive(LevelFilter::DEBUG.into());
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}

/// Report a failed parse of `file` and exit with status 1.
///
/// Text mode prints `file:line:col: message`; json mode prints the error
/// object with a `file` key added. Json errors are printed even with
/// `--quiet`, since tooling depends on them.
pub(crate) fn fail_parse(file: &Path, err: &ParseError, output: OutputFormat, quiet: bool) -> ! {
    match output {
        OutputFormat::Json => {
            let mut value = err.to_json_value();
            if let Some(obj) = value.as_object_mut() {
                obj.insert(
                    "file".to_owned(),
                    serde_json::Value::String(file.display().to_string()),
                );
            }
            let err_json = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|_| serde_json::json!({ "error": err.to_string() }).to_string());
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                let pos = err.position();
                let prefix = if err.is_internal() {
                    "internal parser error: "
                } else {
                    ""
                };
                eprintln!(
                    "{}:{}:{}: {}{}",
                    file.display(),
                    pos.line,
                    pos.column,
                    prefix,
                    err.message()
                );
            }
        }
    }
    process::exit(1);
}

/// Read a source file, exiting with status 1 if it cannot be read.
pub(crate) fn read_source(file: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(file) {
        Ok(src) => src,
        Err(e) => {
            report_error(
                &format!("could not read '{}': {}", file.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}
