//! HTTP server for data-bound HTML templates.
//!
//! Serves a template directory over HTTP with axum:
//! - `.html` and directory paths are composed with the configured bindings
//! - any other path is served as a static file
//!
//! [`DataTemplate`] builds individual routes for applications that compute
//! bindings per request.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use dt_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         template_dir: PathBuf::from("public"),
//!         bindings: serde_json::json!({"title": "Shop"}),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod page;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use dt_cache::{DEFAULT_INDEX, TemplateCache};
use dt_config::ConfigError;
use dt_template::Composer;
use serde_json::Value;
use state::AppState;

pub use error::ServerError;
pub use page::DataTemplate;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory with pages, templates and static files.
    pub template_dir: PathBuf,
    /// Document served for directory paths.
    pub index: String,
    /// Bindings every page is composed with.
    pub bindings: Value,
    /// Minify rendered pages.
    pub minify: bool,
    /// Application version (for `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8100,
            template_dir: PathBuf::from("public"),
            index: DEFAULT_INDEX.to_owned(),
            bindings: Value::Object(serde_json::Map::new()),
            minify: false,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cache = Arc::new(TemplateCache::new(config.index));
    let state = Arc::new(AppState {
        composer: Composer::new(config.template_dir, cache),
        bindings: config.bindings,
        minify: config.minify,
        version: config.version,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from dt config, reading the bindings file.
///
/// # Arguments
///
/// * `config` - dt configuration
/// * `version` - Application version
pub fn server_config_from_dt_config(
    config: &dt_config::Config,
    version: String,
) -> Result<ServerConfig, ConfigError> {
    let templates = &config.templates_resolved;
    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        template_dir: templates.dir.clone(),
        index: templates.index.clone(),
        bindings: templates.load_bindings()?,
        minify: templates.minify,
        version,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use dt_config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_server_config_from_dt_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("dt.toml"),
            "[server]\nport = 9000\n\n[templates]\ndir = \"site\"\ndata = \"data.json\"\nminify = true\n",
        )
        .unwrap();
        fs::write(dir.path().join("data.json"), r#"{"title": "Shop"}"#).unwrap();

        let config = Config::load(Some(&dir.path().join("dt.toml")), None).unwrap();
        let server = server_config_from_dt_config(&config, "1.2.3".to_owned()).unwrap();

        assert_eq!(server.port, 9000);
        assert_eq!(server.template_dir, dir.path().join("site"));
        assert_eq!(server.bindings, json!({"title": "Shop"}));
        assert!(server.minify);
        assert_eq!(server.version, "1.2.3");
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.index, "index.html");
        assert_eq!(config.bindings, json!({}));
    }
}
