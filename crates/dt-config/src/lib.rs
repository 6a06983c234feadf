//! Configuration management for dt.
//!
//! Parses `dt.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8100
//!
//! [templates]
//! dir = "public"        # relative to the config file
//! index = "index.html"  # served for directory requests
//! data = "data.json"    # bindings for every page (optional)
//! minify = false
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `templates.dir`
//! - `templates.data`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override template directory.
    pub template_dir: Option<PathBuf>,
    /// Override bindings data file.
    pub data: Option<PathBuf>,
    /// Override minified output flag.
    pub minify: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dt.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Template configuration (paths are relative strings from TOML).
    templates: TemplatesConfigRaw,

    /// Resolved template configuration (set after loading).
    #[serde(skip)]
    pub templates_resolved: TemplatesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8100,
        }
    }
}

/// Raw template configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplatesConfigRaw {
    dir: Option<String>,
    index: Option<String>,
    data: Option<String>,
    minify: Option<bool>,
}

/// Resolved template configuration with absolute paths.
#[derive(Debug)]
pub struct TemplatesConfig {
    /// Directory pages and file templates are loaded from.
    pub dir: PathBuf,
    /// Document served for directory requests.
    pub index: String,
    /// JSON file with the bindings every page is composed with.
    pub data: Option<PathBuf>,
    /// Whether responses are minified.
    pub minify: bool,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public"),
            index: "index.html".to_owned(),
            data: None,
            minify: false,
        }
    }
}

impl TemplatesConfig {
    /// Read the bindings data file.
    ///
    /// Returns an empty object when no data file is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file is missing, `ConfigError::Io`
    /// if it cannot be read and `ConfigError::Data` if it is not valid JSON.
    pub fn load_bindings(&self) -> Result<serde_json::Value, ConfigError> {
        let Some(path) = &self.data else {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path.clone()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Data {
            path: path.clone(),
            source,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Bindings data file is not valid JSON.
    #[error("Invalid bindings data in {}: {source}", path.display())]
    Data {
        /// Data file path.
        path: PathBuf,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`DT_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dt.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(dir) = &settings.template_dir {
            self.templates_resolved.dir.clone_from(dir);
        }
        if let Some(data) = &settings.data {
            self.templates_resolved.data = Some(data.clone());
        }
        if let Some(minify) = settings.minify {
            self.templates_resolved.minify = minify;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            templates: TemplatesConfigRaw::default(),
            templates_resolved: TemplatesConfig {
                dir: base.join("public"),
                ..TemplatesConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_templates()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate template configuration.
    fn validate_templates(&self) -> Result<(), ConfigError> {
        let index = &self.templates_resolved.index;
        require_non_empty(index, "templates.index")?;

        if !index.ends_with(".html") {
            return Err(ConfigError::Validation(
                "templates.index must end with .html".to_owned(),
            ));
        }
        if index.contains('/') {
            return Err(ConfigError::Validation(
                "templates.index must be a file name, not a path".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref dir) = self.templates.dir {
            self.templates.dir = Some(expand::expand_env(dir, "templates.dir")?);
        }
        if let Some(ref data) = self.templates.data {
            self.templates.data = Some(expand::expand_env(data, "templates.data")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = TemplatesConfig::default();
        self.templates_resolved = TemplatesConfig {
            dir: config_dir.join(self.templates.dir.as_deref().unwrap_or("public")),
            index: self.templates.index.clone().unwrap_or(defaults.index),
            data: self.templates.data.as_deref().map(|data| config_dir.join(data)),
            minify: self.templates.minify.unwrap_or(defaults.minify),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8100);
        assert_eq!(config.templates_resolved.dir, PathBuf::from("/test/public"));
        assert_eq!(config.templates_resolved.index, "index.html");
        assert_eq!(config.templates_resolved.data, None);
        assert!(!config.templates_resolved.minify);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8100);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[templates]
dir = "site"
index = "home.html"
data = "data/site.json"
minify = true
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.templates_resolved.dir, PathBuf::from("/project/site"));
        assert_eq!(config.templates_resolved.index, "home.html");
        assert_eq!(
            config.templates_resolved.data,
            Some(PathBuf::from("/project/data/site.json"))
        );
        assert!(config.templates_resolved.minify);
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.templates_resolved.dir, PathBuf::from("/project/public"));
        assert_eq!(config.templates_resolved.index, "index.html");
        assert_eq!(config.templates_resolved.data, None);
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(3000),
            template_dir: Some(PathBuf::from("/srv/pages")),
            data: Some(PathBuf::from("/srv/data.json")),
            minify: Some(true),
        };
        config.apply_cli_settings(&settings);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.templates_resolved.dir, PathBuf::from("/srv/pages"));
        assert_eq!(
            config.templates_resolved.data,
            Some(PathBuf::from("/srv/data.json"))
        );
        assert!(config.templates_resolved.minify);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.port, 8100);
        assert_eq!(config.templates_resolved.dir, PathBuf::from("/test/public"));
        assert!(!config.templates_resolved.minify);
    }

    #[test]
    fn test_expand_env_vars_templates() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_DT_SITE", "/srv/site");
        }

        let toml = r#"
[templates]
dir = "${TEST_DT_SITE}/public"
data = "${TEST_DT_DATA:-data.json}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.templates_resolved.dir, PathBuf::from("/srv/site/public"));
        assert_eq!(
            config.templates_resolved.data,
            Some(PathBuf::from("/project/data.json"))
        );

        unsafe {
            std::env::remove_var("TEST_DT_SITE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_DT_CONFIG_TEST");
        }

        let toml = r#"
[server]
host = "${MISSING_VAR_DT_CONFIG_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_DT_CONFIG_TEST"));
        assert!(err.to_string().contains("server.host"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_index_extension() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.templates_resolved.index = "index.htm".to_owned();
        assert_validation_error(&config, &["templates.index", ".html"]);
    }

    #[test]
    fn test_validate_index_is_file_name() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.templates_resolved.index = "pages/index.html".to_owned();
        assert_validation_error(&config, &["templates.index", "file name"]);
    }

    #[test]
    fn test_load_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dt.toml");
        fs::write(&path, "[server]\nport = 9100\n\n[templates]\ndir = \"www\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.templates_resolved.dir, tmp.path().join("www"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dt.toml");
        fs::write(&path, "").unwrap();
        let settings = CliSettings {
            port: Some(0),
            ..CliSettings::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_bindings() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data.json");
        fs::write(&data, r#"{"title": "Home", "items": [1, 2]}"#).unwrap();
        let templates = TemplatesConfig {
            data: Some(data),
            ..TemplatesConfig::default()
        };

        let bindings = templates.load_bindings().unwrap();
        assert_eq!(bindings["title"], "Home");
        assert_eq!(bindings["items"][1], 2);
    }

    #[test]
    fn test_load_bindings_without_data_file() {
        let bindings = TemplatesConfig::default().load_bindings().unwrap();
        assert_eq!(bindings, serde_json::json!({}));
    }

    #[test]
    fn test_load_bindings_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data.json");
        fs::write(&data, "{not json").unwrap();
        let templates = TemplatesConfig {
            data: Some(data),
            ..TemplatesConfig::default()
        };

        let err = templates.load_bindings().unwrap_err();
        assert!(matches!(err, ConfigError::Data { .. }));
    }
}
