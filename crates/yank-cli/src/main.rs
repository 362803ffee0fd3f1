//! `yank` CLI — project JSON documents and check schemas from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Select properties (stdin → stdout)
//! echo '{"firstName":"John","lastName":"Doe"}' | yank project firstName
//!
//! # Rename and nest, reading from a file
//! yank project -i user.json 'firstName->name' 'address: { city }'
//!
//! # Write null for anything missing instead of omitting it
//! yank project --absent -i user.json 'email, address: { city, zip }'
//!
//! # Fragments as a JSON array (nested arrays are flattened)
//! yank project --fragments-json '["id", ["name->title"]]' -i item.json
//!
//! # Validate schemas and print their canonical form
//! yank check 'id , owner : { name }'
//! ```
//!
//! Set `RUST_LOG` or pass `-v` for diagnostic logging on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{self, Read};
use yank_core::{Mode, Schema};

#[derive(Parser)]
#[command(
    name = "yank",
    version,
    about = "Select, rename and nest properties of JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a JSON document through one or more schema fragments
    Project {
        /// Schema fragments, applied in order
        fragments: Vec<String>,
        /// Additional fragment (repeatable, applied after positional fragments)
        #[arg(short, long = "schema")]
        schema: Vec<String>,
        /// JSON array of fragments, possibly nested (applied last)
        #[arg(long)]
        fragments_json: Option<String>,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write null for unmatched properties instead of omitting them
        #[arg(long)]
        absent: bool,
        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,
    },
    /// Compile schema fragments and print their canonical form
    Check {
        /// Schema fragments to validate
        #[arg(required = true)]
        fragments: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Project {
            fragments,
            schema,
            fragments_json,
            input,
            output,
            absent,
            pretty,
        } => {
            let fragments = collect_fragments(fragments, schema, fragments_json.as_deref())?;
            let schema =
                Schema::compile(fragments.as_slice()).context("Failed to compile schema")?;

            let json = read_input(input.as_deref())?;
            let source: Value =
                serde_json::from_str(&json).context("Failed to parse input JSON")?;

            let mode = if absent {
                Mode::AbsentMarkers
            } else {
                Mode::Strict
            };
            let projected = schema.apply(&source, mode);

            let rendered = if pretty {
                serde_json::to_string_pretty(&projected)?
            } else {
                serde_json::to_string(&projected)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { fragments } => {
            for fragment in &fragments {
                let tree = yank_core::compile(fragment)
                    .with_context(|| format!("Invalid schema: {}", fragment))?;
                println!("{}", tree);
            }
        }
    }

    Ok(())
}

/// Install the stderr logger. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Merge fragments from positional args, `--schema`, and `--fragments-json`,
/// in that order.
///
/// `--fragments-json` goes through the same string check as any
/// loosely-typed caller: a non-string element fails the whole command.
fn collect_fragments(
    positional: Vec<String>,
    flagged: Vec<String>,
    fragments_json: Option<&str>,
) -> Result<Vec<String>> {
    let mut fragments = positional;
    fragments.extend(flagged);

    if let Some(raw) = fragments_json {
        let value: Value =
            serde_json::from_str(raw).context("--fragments-json is not valid JSON")?;
        let args = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        let flattened =
            yank_core::flatten_fragments(&args).context("Invalid --fragments-json")?;
        fragments.extend(flattened);
    }

    log::debug!("{} fragment(s) from command line", fragments.len());
    Ok(fragments)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Files get `content` as-is; stdout gets it followed by a newline.
fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
