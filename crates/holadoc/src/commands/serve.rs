//! `holadoc serve` command implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use clap::Args;
use holadoc_build::StaticSiteBuilder;
use holadoc_config::{CliSettings, Config};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover holadoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to serve (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Build the site before serving it.
    #[arg(short, long)]
    build: bool,

    /// Enable verbose output (request logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the build fails or the
    /// server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let output_dir = config.site_resolved.output_dir.clone();
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| CliError::Server(format!("Invalid server address: {e}")))?;

        if self.build {
            let report = StaticSiteBuilder::new(config).build()?;
            output.success(&format!("Built {} pages", report.pages.len()));
        } else if !output_dir.is_dir() {
            output.warning(&format!(
                "{} does not exist yet, run `holadoc build` or pass --build",
                output_dir.display()
            ));
        }

        output.highlight(&format!("Serving {} on http://{addr}", output_dir.display()));
        run_server(&output_dir, addr)
            .await
            .map_err(|e| CliError::Server(e.to_string()))
    }
}

/// Serve `root` as static files until Ctrl-C.
async fn run_server(root: &Path, addr: SocketAddr) -> std::io::Result<()> {
    let app = Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(TraceLayer::new_for_http());

    tracing::info!(address = %addr, root = %root.display(), "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
