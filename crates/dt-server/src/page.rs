//! Route adapter for hand-written page handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get};
use dt_cache::TemplateCache;
use dt_template::{Composer, Context};

use crate::error::ServerError;
use crate::handlers::{decode_path, html_response};

/// Builds GET routes that load the requested page, let a callback fill it,
/// and send the result.
///
/// ```no_run
/// use axum::Router;
/// use dt_server::DataTemplate;
/// use serde_json::json;
///
/// let pages = DataTemplate::new("public");
/// let app: Router = Router::new().route(
///     "/products.html",
///     pages.handle(|context, _uri| {
///         context.scan_templates(&json!({"products": [{"name": "Tuna"}]}))?;
///         Ok(())
///     }),
/// );
/// ```
#[derive(Clone)]
pub struct DataTemplate {
    composer: Composer,
    minify: bool,
    version: String,
}

impl DataTemplate {
    /// Serve pages from `template_dir` with a fresh cache.
    #[must_use]
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self::with_cache(template_dir, Arc::new(TemplateCache::default()))
    }

    /// Serve pages from `template_dir` through a shared cache.
    #[must_use]
    pub fn with_cache(template_dir: impl Into<PathBuf>, cache: Arc<TemplateCache>) -> Self {
        Self::from_composer(Composer::new(template_dir, cache))
    }

    /// Serve pages through an existing composer.
    #[must_use]
    pub fn from_composer(composer: Composer) -> Self {
        Self {
            composer,
            minify: false,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }

    /// Minify rendered pages.
    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Version mixed into response `ETag`s.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Directory pages are loaded from.
    #[must_use]
    pub fn template_dir(&self) -> &Path {
        self.composer.template_dir()
    }

    /// Route that renders the page named by the request path.
    ///
    /// `render` receives the loaded page and the request URI. It runs on the
    /// blocking pool, so it may compose file templates. An error it returns
    /// becomes the response.
    pub fn handle<S, F>(&self, render: F) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&mut Context, &Uri) -> Result<(), ServerError> + Clone + Send + Sync + 'static,
    {
        let pages = self.clone();
        get(move |uri: Uri, headers: HeaderMap| {
            let pages = pages.clone();
            let render = render.clone();
            async move {
                match pages.render(uri, &headers, render).await {
                    Ok(response) => response,
                    Err(err) => err.into_response(),
                }
            }
        })
    }

    /// Load the page, then run `render` and serialize on the blocking pool.
    async fn render<F>(
        &self,
        uri: Uri,
        headers: &HeaderMap,
        render: F,
    ) -> Result<Response, ServerError>
    where
        F: Fn(&mut Context, &Uri) -> Result<(), ServerError> + Send + 'static,
    {
        let path = decode_path(uri.path())?;
        let mut context = Context::load_async(self.composer.clone(), &path).await?;

        let minify = self.minify;
        let html = tokio::task::spawn_blocking(move || {
            render(&mut context, &uri)?;
            Ok::<_, ServerError>(if minify {
                context.minified_outer_html()
            } else {
                context.outer_html()
            })
        })
        .await??;
        Ok(html_response(headers, &self.version, html))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("search.html"),
            concat!(
                r#"<h1 data-text="title">T</h1>"#,
                r#"<form id="f"><input name="q"></form>"#,
            ),
        )
        .unwrap();
        dir
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_handle_renders_page() {
        let dir = site();
        let pages = DataTemplate::new(dir.path());
        let app: Router = Router::new().route(
            "/search.html",
            pages.handle(|context, uri| {
                let query = uri.query().unwrap_or_default().trim_start_matches("q=").to_owned();
                context.render_bindings(&json!({"title": format!("Results for {query}")}));
                context.fill_form("f", &json!({"q": query}))?;
                Ok(())
            }),
        );

        let response = app
            .oneshot(Request::get("/search.html?q=fish").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert_eq!(
            html,
            concat!(
                r#"<h1 data-text="title">Results for fish</h1>"#,
                r#"<form id="f"><input name="q" value="fish"></form>"#,
            )
        );
    }

    #[tokio::test]
    async fn test_handle_composes_file_partials() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("list.html"), r#"<ul data-template="item.html"></ul>"#).unwrap();
        fs::write(dir.path().join("item.html"), r#"<li data-text="name"></li>"#).unwrap();
        let pages = DataTemplate::new(dir.path());
        let app: Router = Router::new().route(
            "/list.html",
            pages.handle(|context, _uri| {
                context.scan_templates(&json!([{"name": "a"}, {"name": "b"}]))?;
                Ok(())
            }),
        );

        let response = app
            .oneshot(Request::get("/list.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            body_text(response).await,
            r#"<ul data-template="item.html"><li data-text="name">a</li><li data-text="name">b</li></ul>"#
        );
    }

    #[tokio::test]
    async fn test_handle_render_error() {
        let dir = site();
        let pages = DataTemplate::new(dir.path());
        let app: Router = Router::new().route(
            "/search.html",
            pages.handle(|context, _uri| {
                context.fill_form("missing", &json!({}))?;
                Ok(())
            }),
        );

        let response = app
            .oneshot(Request::get("/search.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_handle_missing_page() {
        let dir = site();
        let pages = DataTemplate::new(dir.path());
        let app: Router = Router::new().route("/gone.html", pages.handle(|_, _| Ok(())));

        let response = app
            .oneshot(Request::get("/gone.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_minified() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<p>\n  <!-- note -->\n  hi\n</p>").unwrap();
        let pages = DataTemplate::new(dir.path()).with_minify(true);
        let app: Router = Router::new().route("/", pages.handle(|_, _| Ok(())));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_text(response).await, "<p> hi </p>");
    }
}
