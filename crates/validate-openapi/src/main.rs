//! Command-line validator for OpenAPI 3.0 documents

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;

use openapi3_parser::{Document, SourceInput};

mod report;

use report::Report;

#[derive(Parser, Debug)]
#[command(name = "validate-openapi")]
#[command(about = "Validate an OpenAPI 3.0 document and report every problem found")]
struct Args {
    /// OpenAPI document to validate (JSON or YAML)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log reference resolution and source loading to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!(file = %args.file.display(), "Loading document");

    let document = match Document::load(SourceInput::file(&args.file)) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::from(2);
        }
    };

    let report = Report::new(&document);
    let output = match args.format {
        Format::Text => Ok(report.to_text(&args.file.display().to_string())),
        Format::Json => report.to_json(),
    };

    match output {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("✗ Failed to write report: {}", e);
            return ExitCode::from(2);
        }
    }

    if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
