//! `dt serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use dt_config::{CliSettings, Config};
use dt_server::{run_server, server_config_from_dt_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover dt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (overrides config).
    #[arg(short, long)]
    template_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON file with page bindings (overrides config).
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Minify rendered pages.
    #[arg(long)]
    minify: bool,

    /// Do not minify rendered pages.
    #[arg(long, conflicts_with = "minify")]
    no_minify: bool,

    /// Enable verbose output (request and template logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            template_dir: self.template_dir,
            data: self.data,
            minify: resolve_minify(self.minify, self.no_minify),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        output.serving(&config);

        let server_config = server_config_from_dt_config(&config, version.to_owned())?;
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Resolve the minify override from --minify/--no-minify flags.
pub(crate) fn resolve_minify(minify: bool, no_minify: bool) -> Option<bool> {
    if no_minify {
        Some(false)
    } else {
        minify.then_some(true)
    }
}
