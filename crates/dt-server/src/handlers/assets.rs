//! Static files next to the templates.

use std::convert::Infallible;
use std::path::Path;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serve `request` from `dir`.
pub(crate) async fn serve_asset(dir: &Path, request: Request) -> Response {
    let result: Result<_, Infallible> = ServeDir::new(dir).oneshot(request).await;
    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
