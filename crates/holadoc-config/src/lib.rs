//! Configuration management for holadoc.
//!
//! Parses `holadoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Language and version lists
//!
//! `content.languages` and `content.versions` accept either a TOML array or a
//! comma-separated string. The first entry of each list is the default:
//!
//! ```toml
//! [content]
//! languages = "en,es,zh"
//! versions = ["v1", "v2"]
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.source_dir`
//! - `site.output_dir`
//! - `server.host`

mod expand;

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override languages (comma-separated, default first).
    pub languages: Option<String>,
    /// Override versions (comma-separated, default first).
    pub versions: Option<String>,
    /// Override parallel rendering flag.
    pub parallel: Option<bool>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "holadoc.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site paths (relative strings from TOML).
    site: SiteConfigRaw,
    /// Languages and versions.
    pub content: ContentConfig,
    /// Build behaviour.
    pub build: BuildConfig,
    /// Local preview server.
    pub server: ServerConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory holding the ordered source tree.
    pub source_dir: PathBuf,
    /// Directory the static site is written to. Cleared on every build.
    pub output_dir: PathBuf,
}

/// Configured languages and versions.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Ordered languages; the first one is the default and is not prefixed in URLs.
    #[serde(deserialize_with = "deserialize_list")]
    pub languages: Vec<String>,
    /// Ordered versions; the first one is the default.
    #[serde(deserialize_with = "deserialize_list")]
    pub versions: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_owned(), "es".to_owned(), "zh".to_owned()],
            versions: vec!["v1".to_owned(), "v2".to_owned()],
        }
    }
}

/// Build behaviour configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Prefix pages that reuse an older version's content with a notice.
    pub unchanged_banner: bool,
    /// Render pages on a worker pool.
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            unchanged_banner: true,
            parallel: true,
        }
    }
}

/// Local preview server configuration.
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
            port: 8080,
        }
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
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.output_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_OUT`} not set").
        message: String,
    },
}

/// Accept either a TOML array or a comma-separated string.
fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(items) => items,
        ListOrCsv::Csv(value) => split_list(&value),
    })
}

/// Split a comma-separated list, keeping empty entries for validation.
///
/// ```
/// assert_eq!(holadoc_config::split_list("en, es,zh"), vec!["en", "es", "zh"]);
/// ```
pub fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_owned()).collect()
}

/// Require a string field to be non-empty.
/// Absolute form of `path` with `.` and `..` folded and symlinks resolved
/// as far as the path exists.
fn comparable_path(path: &Path) -> PathBuf {
    let Ok(absolute) = std::path::absolute(path) else {
        return path.to_path_buf();
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    for existing in normalized.ancestors() {
        if let Ok(canonical) = existing.canonicalize() {
            let rest = normalized.strip_prefix(existing).unwrap_or(Path::new(""));
            return canonical.join(rest);
        }
    }
    normalized
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Validate an ordered token list (languages or versions).
///
/// Tokens are matched against `_`-separated file name parts, so they can
/// contain neither `_` nor path separators.
fn validate_tokens(tokens: &[String], field: &str) -> Result<(), ConfigError> {
    if tokens.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} needs at least one entry"
        )));
    }

    let mut seen = HashSet::new();
    for token in tokens {
        require_non_empty(token, field)?;
        if token.contains(['_', '/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "{field} entry '{token}' cannot contain '_' or path separators"
            )));
        }
        if !seen.insert(token.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{field} lists '{token}' more than once"
            )));
        }
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `holadoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged
    /// configuration is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
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
        }

        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.site_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(languages) = &settings.languages {
            self.content.languages = split_list(languages);
        }
        if let Some(versions) = &settings.versions {
            self.content.versions = split_list(versions);
        }
        if let Some(parallel) = settings.parallel {
            self.build.parallel = parallel;
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
    }

    /// Trim and lower-case language and version tokens.
    ///
    /// File name parts are case-folded before matching, so the configured
    /// tokens must be too.
    fn normalize(&mut self) {
        for token in self
            .content
            .languages
            .iter_mut()
            .chain(self.content.versions.iter_mut())
        {
            *token = token.trim().to_lowercase();
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_content()?;
        self.validate_server()?;
        Ok(())
    }

    /// Validate source and output directories.
    ///
    /// The output directory is wiped before every build, so it must never
    /// be (or contain) the source directory. Both are compared in absolute
    /// form, relative paths taken from the working directory.
    fn validate_site(&self) -> Result<(), ConfigError> {
        let output = &self.site_resolved.output_dir;
        if output.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "site.output_dir cannot be empty".to_owned(),
            ));
        }

        let source = comparable_path(&self.site_resolved.source_dir);
        let output = comparable_path(output);
        if source == output {
            return Err(ConfigError::Validation(
                "site.output_dir cannot be the same as site.source_dir".to_owned(),
            ));
        }
        if source.starts_with(&output) {
            return Err(ConfigError::Validation(format!(
                "site.output_dir ({}) cannot contain site.source_dir",
                output.display()
            )));
        }
        Ok(())
    }

    /// Validate languages and versions.
    fn validate_content(&self) -> Result<(), ConfigError> {
        validate_tokens(&self.content.languages, "content.languages")?;
        validate_tokens(&self.content.versions, "content.versions")?;

        if let Some(shared) = self
            .content
            .languages
            .iter()
            .find(|l| self.content.versions.contains(l))
        {
            return Err(ConfigError::Validation(format!(
                "'{shared}' is listed both as a language and as a version"
            )));
        }
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
            site: SiteConfigRaw::default(),
            content: ContentConfig::default(),
            build: BuildConfig::default(),
            server: ServerConfig::default(),
            site_resolved: SiteConfig {
                source_dir: base.join("src"),
                output_dir: base.join("www"),
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

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.site.source_dir {
            self.site.source_dir = Some(expand::expand_env(dir, "site.source_dir")?);
        }
        if let Some(ref dir) = self.site.output_dir {
            self.site.output_dir = Some(expand::expand_env(dir, "site.output_dir")?);
        }
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.site_resolved = SiteConfig {
            source_dir: resolve(self.site.source_dir.as_deref(), "src"),
            output_dir: resolve(self.site.output_dir.as_deref(), "www"),
        };
    }
}
