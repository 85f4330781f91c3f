//! Platform settings and the `docbuild.toml` file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::project::{BuildEnvironment, Project, Version};

/// Platform-wide values injected into every build.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// Public domain of the hosting platform
    pub production_domain: String,

    /// Static asset URL, absolute or relative to the production domain
    pub static_url: String,

    pub media_url: String,

    /// Base URL of the public API
    pub public_api_url: String,

    /// Platform-wide analytics code, shared by every project
    pub global_analytics_code: Option<String>,

    /// Sphinx static files appended to `html_static_path`
    pub sphinx_static_dir: PathBuf,

    /// Sphinx templates listed first in `templates_path`
    pub sphinx_template_dir: PathBuf,

    /// Mkdocs theme override directory for the platform's own theme
    pub mkdocs_template_override_dir: PathBuf,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            production_domain: "readthedocs.org".to_string(),
            static_url: "/static/".to_string(),
            media_url: "/media/".to_string(),
            public_api_url: "https://readthedocs.org".to_string(),
            global_analytics_code: None,
            sphinx_static_dir: PathBuf::from("/usr/share/docbuild/templates/sphinx/_static"),
            sphinx_template_dir: PathBuf::from("/usr/share/docbuild/templates/sphinx"),
            mkdocs_template_override_dir: PathBuf::from(
                "/usr/share/docbuild/templates/mkdocs/readthedocs",
            ),
        }
    }
}

impl PlatformSettings {
    /// Static URL with a scheme and host.
    ///
    /// Mkdocs links assets verbatim, so a relative static URL is prefixed
    /// with the production domain.
    pub fn absolute_static_url(&self) -> String {
        if self.static_url.starts_with("http") {
            self.static_url.clone()
        } else {
            format!("http://{}{}", self.production_domain, self.static_url)
        }
    }
}

/// Configuration file structure (docbuild.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: Project,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub platform: PlatformSettings,
}

/// Errors that can occur when loading docbuild.toml.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

impl ConfigFile {
    /// Load and parse a config file.
    ///
    /// A relative `checkout_path` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigFileError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut config = Self::parse(&content).map_err(|message| ConfigFileError::Parse {
            path: path.display().to_string(),
            message,
        })?;

        if config.project.checkout_path.is_relative() {
            let base = path.parent().unwrap_or(Path::new(""));
            config.project.checkout_path = base.join(&config.project.checkout_path);
        }

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config file contents.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut config: ConfigFile = toml::from_str(content).map_err(|e| e.to_string())?;

        if config.project.name.is_empty() {
            config.project.name = config.project.slug.clone();
        }

        Ok(config)
    }

    /// Split into the build environment and platform settings.
    pub fn into_parts(self) -> (BuildEnvironment, PlatformSettings) {
        (
            BuildEnvironment::new(self.project, self.version),
            self.platform,
        )
    }
}
