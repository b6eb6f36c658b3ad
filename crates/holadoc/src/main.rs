//! holadoc CLI - multi-language, multi-version documentation generator.
//!
//! Provides commands for:
//! - `build`: Render the source tree into a static site
//! - `serve`: Serve the generated site locally
//! - `tree`: Print the loaded source tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ServeArgs, TreeArgs};
use error::CliError;
use output::Output;

/// holadoc - multi-language, multi-version documentation generator.
#[derive(Parser)]
#[command(name = "holadoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the documentation into the output directory.
    Build(BuildArgs),
    /// Serve the output directory over HTTP.
    Serve(ServeArgs),
    /// Print the source tree with the variation count of every node.
    Tree(TreeArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.verbose,
            Self::Serve(args) => args.verbose,
            Self::Tree(_) => false,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Tree(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_flag_per_command() {
        let build = Cli::try_parse_from(["holadoc", "build", "--languages", "en,es", "-v"]).unwrap();
        let tree = Cli::try_parse_from(["holadoc", "tree", "--source-dir", "docs"]).unwrap();

        assert!(build.command.verbose());
        assert!(!tree.command.verbose());
    }

    #[test]
    fn test_serve_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["holadoc", "serve", "--port", "http"]).is_err());
    }
}
