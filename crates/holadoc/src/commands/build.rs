//! `holadoc build` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use holadoc_build::StaticSiteBuilder;
use holadoc_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover holadoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory, cleared before every build (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Comma-separated languages, default first (overrides config).
    #[arg(long, env = "HOLADOC_LANGUAGES")]
    languages: Option<String>,

    /// Comma-separated versions, default first (overrides config).
    #[arg(long, env = "HOLADOC_VERSIONS")]
    versions: Option<String>,

    /// Render pages one at a time instead of on a worker pool.
    #[arg(long)]
    sequential: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the build fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            languages: self.languages,
            versions: self.versions,
            parallel: self.sequential.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Building {} into {}",
            config.site_resolved.source_dir.display(),
            config.site_resolved.output_dir.display()
        ));
        output.info(&format!(
            "Languages: {}  Versions: {}",
            config.content.languages.join(", "),
            config.content.versions.join(", ")
        ));

        let started = Instant::now();
        let report = StaticSiteBuilder::new(config).build()?;

        if report.skipped > 0 {
            output.warning(&format!(
                "{} combinations without content were skipped",
                report.skipped
            ));
        }
        output.success(&format!(
            "Built {} pages and copied {} assets in {:.2?}",
            report.pages.len(),
            report.assets,
            started.elapsed()
        ));
        Ok(())
    }
}
