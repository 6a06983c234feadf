//! Page rendering handler.
//!
//! HTML paths are composed from the template directory with the configured
//! bindings. Everything else is served as a static file.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use dt_dom::Document;
use md5::{Digest, Md5};
use percent_encoding::percent_decode_str;

use super::serve_asset;
use crate::error::ServerError;
use crate::state::AppState;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Handle any GET request.
pub(crate) async fn get_page(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ServerError> {
    let path = decode_path(request.uri().path())?;
    if !is_page_path(&path) {
        return Ok(serve_asset(state.composer.template_dir(), request).await);
    }

    let document = state.composer.load_async(&path).await?;
    // File partials are read synchronously while composing.
    let html = tokio::task::spawn_blocking({
        let state = Arc::clone(&state);
        move || render_page(&state, document)
    })
    .await??;

    tracing::debug!(path = %path, bytes = html.len(), "Rendered page");
    Ok(html_response(request.headers(), &state.version, html))
}

/// Compose `document` with the configured bindings and serialize it.
fn render_page(state: &AppState, mut document: Document) -> Result<String, ServerError> {
    state.composer.scan_templates(&mut document, &state.bindings)?;
    Ok(if state.minify {
        document.minified_outer_html()
    } else {
        document.outer_html()
    })
}

/// Percent-decode a request path.
pub(crate) fn decode_path(path: &str) -> Result<String, ServerError> {
    percent_decode_str(path)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| ServerError::InvalidPath(path.to_owned()))
}

/// Whether the path names a page rather than an asset: a directory or an
/// `.html` file.
pub(crate) fn is_page_path(path: &str) -> bool {
    path.ends_with('/')
        || Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Respond with rendered HTML, or `304 Not Modified` when the client's
/// `If-None-Match` matches.
pub(crate) fn html_response(headers: &HeaderMap, version: &str, html: String) -> Response {
    let etag = compute_etag(version, &html);

    if headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| value.as_bytes() == etag.as_bytes())
    {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        [
            (header::CONTENT_TYPE, HTML_CONTENT_TYPE.to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        html,
    )
        .into_response()
}

/// Compute a quoted `ETag` from the application version and page content.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
