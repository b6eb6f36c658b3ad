//! Immutable build context.

/// Directory name that expands to every configured version.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Prefix of every generated link.
pub const BASE_PATH: &str = "/";

/// Extension of page template files.
pub const TEMPLATE_EXTENSION: &str = "jinja";

/// Invalid language or version list.
#[derive(Debug, thiserror::Error)]
#[error("At least one {0} must be configured")]
pub struct ContextError(&'static str);

/// Configured languages and versions, in priority order.
///
/// The first entry of each list is the default. Built once per build and
/// shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    languages: Vec<String>,
    versions: Vec<String>,
}

impl SiteContext {
    /// Create a context. Both lists must be non-empty.
    pub fn new(languages: Vec<String>, versions: Vec<String>) -> Result<Self, ContextError> {
        if languages.is_empty() {
            return Err(ContextError("language"));
        }
        if versions.is_empty() {
            return Err(ContextError("version"));
        }
        Ok(Self {
            languages,
            versions,
        })
    }

    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Language whose URLs carry no language prefix.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.languages[0]
    }

    #[must_use]
    pub fn default_version(&self) -> &str {
        &self.versions[0]
    }

    #[must_use]
    pub fn is_language(&self, token: &str) -> bool {
        self.languages.iter().any(|l| l == token)
    }

    #[must_use]
    pub fn is_version(&self, token: &str) -> bool {
        self.versions.iter().any(|v| v == token)
    }
}
