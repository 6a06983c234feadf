//! Application state.

use dt_template::Composer;
use serde_json::Value;

/// Shared state for the page handlers.
pub(crate) struct AppState {
    /// Composer over the served template directory.
    pub composer: Composer,
    /// Bindings every page is composed with.
    pub bindings: Value,
    /// Serialize pages without comments and extra whitespace.
    pub minify: bool,
    /// Application version, part of every `ETag`.
    pub version: String,
}
