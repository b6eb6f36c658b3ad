//! `holadoc tree` command implementation.

use std::path::PathBuf;

use clap::Args;
use holadoc_config::{CliSettings, Config};
use holadoc_site::{SiteContext, SiteLoader};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Path to configuration file (default: auto-discover holadoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the source tree
    /// cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let context = SiteContext::new(config.content.languages, config.content.versions)?;
        let site = SiteLoader::new(&context, &config.site_resolved.source_dir).load()?;

        output.print(&site.tree.pretty_print());
        output.info(&format!(
            "{} nodes, {} assets",
            site.tree.len() - 1,
            site.assets.len()
        ));
        Ok(())
    }
}
