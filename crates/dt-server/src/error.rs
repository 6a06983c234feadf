//! Server error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dt_bind::FormError;
use dt_cache::CacheError;
use dt_template::ComposeError;

/// Error raised while serving a page.
///
/// Converts into a plain-text HTTP response: missing pages are `404`, bad
/// request paths `400`, anything else `500` (logged, details not exposed).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The page does not exist.
    #[error("Page not found: {0}")]
    PageNotFound(String),
    /// The request path is not a valid page path.
    #[error("Invalid request path: {0}")]
    InvalidPath(String),
    /// Composition failed.
    #[error(transparent)]
    Compose(ComposeError),
    /// A render callback could not fill a form.
    #[error(transparent)]
    Form(#[from] FormError),
    /// The blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ComposeError> for ServerError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::Cache(CacheError::InvalidPath(path)) => Self::InvalidPath(path),
            ComposeError::Cache(CacheError::Io { ref path, .. }) if err.is_not_found() => {
                Self::PageNotFound(path.display().to_string())
            }
            err => Self::Compose(err),
        }
    }
}

impl ServerError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::Compose(_) | Self::Form(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Page rendering failed");
            return (status, "Internal Server Error").into_response();
        }
        tracing::debug!(error = %self, status = %status, "Page request rejected");
        (status, self.to_string()).into_response()
    }
}
