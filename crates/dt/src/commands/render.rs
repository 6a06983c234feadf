//! `dt render` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dt_cache::TemplateCache;
use dt_config::{CliSettings, Config, TemplatesConfig};
use dt_template::Composer;

use super::serve::resolve_minify;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Page path relative to the template directory (e.g. `/` or `/products.html`).
    #[arg(default_value = "/")]
    page: String,

    /// Path to configuration file (default: auto-discover dt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (overrides config).
    #[arg(short, long)]
    template_dir: Option<PathBuf>,

    /// JSON file with page bindings (overrides config).
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Minify the output.
    #[arg(long)]
    minify: bool,

    /// Do not minify the output.
    #[arg(long, conflicts_with = "minify")]
    no_minify: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, bindings or templates fail to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            template_dir: self.template_dir,
            data: self.data,
            minify: resolve_minify(self.minify, self.no_minify),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let html = render_page(&config.templates_resolved, &self.page)?;
        Output::new().markup(&html)?;
        Ok(())
    }
}

/// Compose `page` with the configured bindings.
fn render_page(templates: &TemplatesConfig, page: &str) -> Result<String, CliError> {
    let bindings = templates.load_bindings()?;
    let cache = Arc::new(TemplateCache::new(templates.index.clone()));
    let composer = Composer::new(templates.dir.clone(), cache);

    let mut document = composer.load(page)?;
    composer.scan_templates(&mut document, &bindings)?;
    tracing::info!(page, templates = composer.cache().len(), "Rendered page");

    Ok(if templates.minify {
        document.minified_outer_html()
    } else {
        document.outer_html()
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn site() -> (TempDir, TemplatesConfig) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<ol data-template=\"step.html\" data-bind=\"steps\">\n</ol>\n<!-- end -->\n",
        )
        .unwrap();
        fs::write(dir.path().join("step.html"), r#"<li data-text="label"></li>"#).unwrap();
        fs::write(
            dir.path().join("data.json"),
            r#"{"steps": [{"label": "Mix"}, {"label": "Bake"}]}"#,
        )
        .unwrap();

        let templates = TemplatesConfig {
            dir: dir.path().to_path_buf(),
            data: Some(dir.path().join("data.json")),
            ..TemplatesConfig::default()
        };
        (dir, templates)
    }

    #[test]
    fn test_render_page() {
        let (_dir, templates) = site();

        assert_eq!(
            render_page(&templates, "/").unwrap(),
            concat!(
                r#"<ol data-template="step.html" data-bind="steps"><li data-text="label">Mix</li><li data-text="label">Bake</li></ol>"#,
                "\n<!-- end -->\n",
            )
        );
    }

    #[test]
    fn test_render_page_minified() {
        let (_dir, mut templates) = site();
        templates.minify = true;

        assert_eq!(
            render_page(&templates, "/index.html").unwrap(),
            r#"<ol data-template="step.html" data-bind="steps"><li data-text="label">Mix</li><li data-text="label">Bake</li></ol>"#
        );
    }

    #[test]
    fn test_render_missing_page() {
        let (_dir, templates) = site();

        let err = render_page(&templates, "/nope.html").unwrap_err();
        assert!(matches!(err, CliError::Compose(ref e) if e.is_not_found()));
    }
}
