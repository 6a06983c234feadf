//! Terminal output for the dt commands.
//!
//! Status lines go to stderr. Rendered markup goes to stdout so that
//! `dt render` can be piped.

use std::io::{self, Write};

use console::{Style, Term};
use dt_config::Config;

/// Terminal output formatter.
pub(crate) struct Output {
    stderr: Term,
    stdout: Term,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stderr: Term::stderr(),
            stdout: Term::stdout(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print where the server listens and what it serves.
    pub(crate) fn serving(&self, config: &Config) {
        let mut lines = serving_lines(config).into_iter();
        if let Some(url) = lines.next() {
            let _ = self.stderr.write_line(&self.cyan_bold.apply_to(url).to_string());
        }
        for line in lines {
            let _ = self.stderr.write_line(&self.dim.apply_to(line).to_string());
        }
    }

    /// Write rendered markup to stdout, ending with exactly one newline.
    pub(crate) fn markup(&self, html: &str) -> io::Result<()> {
        let mut stdout = &self.stdout;
        stdout.write_all(html.trim_end_matches('\n').as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()
    }
}

/// Startup summary: the URL first, then the served directory and options.
fn serving_lines(config: &Config) -> Vec<String> {
    let templates = &config.templates_resolved;
    let bindings = templates.data.as_ref().map_or_else(
        || "none (no data file configured)".to_owned(),
        |data| data.display().to_string(),
    );
    vec![
        format!(
            "Serving on http://{}:{}/",
            config.server.host, config.server.port
        ),
        format!("  templates: {}", templates.dir.display()),
        format!("  index:     {}", templates.index),
        format!("  bindings:  {bindings}"),
        format!("  minify:    {}", if templates.minify { "on" } else { "off" }),
    ]
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serving_lines() {
        let mut config = Config::default();
        config.server.port = 9000;
        config.templates_resolved.dir = PathBuf::from("/srv/site");
        config.templates_resolved.data = Some(PathBuf::from("/srv/data.json"));
        config.templates_resolved.minify = true;

        assert_eq!(
            serving_lines(&config),
            vec![
                "Serving on http://127.0.0.1:9000/",
                "  templates: /srv/site",
                "  index:     index.html",
                "  bindings:  /srv/data.json",
                "  minify:    on",
            ]
        );
    }

    #[test]
    fn test_serving_lines_without_data() {
        let config = Config::default();

        assert_eq!(serving_lines(&config)[3], "  bindings:  none (no data file configured)");
    }
}
