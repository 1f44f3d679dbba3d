//! `yamlet` CLI — convert documents between the YAML-subset format and JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Parse to JSON (stdin → stdout)
//! echo 'name: Alice' | yamlet parse
//!
//! # Parse from file to file
//! yamlet parse -i config.yml -o config.json
//!
//! # Emit JSON back as a document
//! echo '{"name":"Alice"}' | yamlet emit
//!
//! # Validate without producing output
//! yamlet check -i config.yml
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use yamlet_core::Value;

#[derive(Parser)]
#[command(name = "yamlet", version, about = "YAML-subset codec CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse documents and print them as JSON
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Minified JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Emit JSON input as a document
    Emit {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate input and report the document count
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            compact,
        } => {
            let text = read_input(input.as_deref())?;
            let docs = yamlet_core::parse(&text).context("failed to parse input")?;
            // A single document prints bare; multiple documents print as a
            // JSON array, one element per document.
            let json = match docs.as_slice() {
                [only] => only.to_json(),
                many => serde_json::Value::Array(many.iter().map(Value::to_json).collect()),
            };
            let rendered = if compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Emit { input, output } => {
            let text = read_input(input.as_deref())?;
            let json: serde_json::Value =
                serde_json::from_str(&text).context("input is not valid JSON")?;
            let value = Value::from_json(&json);
            let rendered = yamlet_core::stringify(&[value]).context("failed to emit document")?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            match yamlet_core::parse(&text) {
                Ok(docs) => println!("OK: {} document(s)", docs.len()),
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content.as_bytes())
            .with_context(|| format!("failed to write {path}")),
        None => {
            if content.ends_with('\n') {
                print!("{content}");
            } else {
                println!("{content}");
            }
            Ok(())
        }
    }
}
