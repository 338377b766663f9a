#![deny(missing_docs)]

//! # List Command
//!
//! Prints every operation of a document, one per line.

use crate::error::CliResult;
use reqgen_core::OpenApiDocument;
use std::fs;
use std::path::PathBuf;

/// Arguments for the list command.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Path to the OpenAPI document (JSON or YAML).
    #[clap(long)]
    pub document: PathBuf,
}

/// Executes the list command and returns the text to print.
pub fn execute(args: &ListArgs) -> CliResult<String> {
    let content = fs::read_to_string(&args.document)?;
    let document: OpenApiDocument = content.parse()?;

    let lines: Vec<String> = document
        .operations()
        .into_iter()
        .map(|op| {
            let mut line = format!("{:<7} {}", op.method.to_uppercase(), op.path);
            if let Some(id) = op.operation_id {
                line.push_str(&format!("  ({})", id));
            }
            if let Some(summary) = op.summary {
                line.push_str(&format!("  {}", summary));
            }
            line
        })
        .collect();
    Ok(lines.join("\n"))
}
