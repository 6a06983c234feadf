//! CLI error types.

use dt_config::ConfigError;
use dt_template::ComposeError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Compose(#[from] ComposeError),

    #[error("{0}")]
    Server(String),
}
