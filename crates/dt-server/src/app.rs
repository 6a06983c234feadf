//! Router construction.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Every GET goes through the page handler: `.html` and directory paths are
/// composed, other paths are served from the template directory as-is.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(handlers::get_page)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::nosniff_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
