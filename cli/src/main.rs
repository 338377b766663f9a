#![deny(missing_docs)]

//! # Reqgen CLI
//!
//! Command Line Interface for compiling OpenAPI operations into requests.
//!
//! Supported Commands:
//! - `assemble`: Prints the HAR-shaped request for one operation.
//! - `list`: Lists the operations of a document.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod assemble;
mod config;
mod error;
mod list;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI request compiler")]
struct Cli {
    /// Log skipped parameters, schemes and bodies.
    #[clap(long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble the request of one operation.
    Assemble(assemble::AssembleArgs),
    /// List the operations of a document.
    List(list::ListArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match &cli.command {
        Commands::Assemble(args) => assemble::execute(args)?,
        Commands::List(args) => list::execute(args)?,
    };
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_assemble_flags() {
        let cli = Cli::try_parse_from([
            "reqgen",
            "assemble",
            "--document",
            "api.yaml",
            "--path",
            "/users/{id}",
            "--method",
            "post",
            "--no-default-headers",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Assemble(args) => {
                assert_eq!(args.path, "/users/{id}");
                assert!(args.no_default_headers);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
