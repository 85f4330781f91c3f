//! Project and version model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Candidate docs directories, checked in order under the checkout.
const DOCS_DIR_CANDIDATES: &[&str] = &["docs", "doc", "Doc", "book"];

/// Documentation tool a project builds with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentationType {
    #[default]
    Sphinx,
    SphinxHtmldir,
    SphinxSinglehtml,
    Mkdocs,
}

impl DocumentationType {
    /// Whether the project is configured through a Sphinx `conf.py`.
    pub fn is_sphinx(self) -> bool {
        !matches!(self, DocumentationType::Mkdocs)
    }
}

/// A documentation project.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Project {
    /// URL-safe identifier
    pub slug: String,

    /// Human-readable name, used as the default `site_name`
    pub name: String,

    /// Root directory of the fetched documentation source
    pub checkout_path: PathBuf,

    pub documentation_type: DocumentationType,

    /// Documentation language code (e.g. "en")
    pub language: String,

    pub programming_language: String,

    /// Remote repository URL
    pub repo: String,

    /// VCS kind: "git", "hg", "svn", "bzr"
    pub repo_type: String,

    /// Per-project analytics code
    pub analytics_code: Option<String>,

    pub canonical_url: Option<String>,

    pub single_version: bool,

    pub show_advertising: bool,

    /// Slugs of the versions shown in the version selector
    pub active_versions: Vec<String>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            slug: String::new(),
            name: String::new(),
            checkout_path: PathBuf::from("."),
            documentation_type: DocumentationType::default(),
            language: "en".to_string(),
            programming_language: "words".to_string(),
            repo: String::new(),
            repo_type: "git".to_string(),
            analytics_code: None,
            canonical_url: None,
            single_version: false,
            show_advertising: true,
            active_versions: vec![],
        }
    }
}

impl Project {
    /// Root of the checked-out source for this build.
    pub fn checkout_path(&self) -> &Path {
        &self.checkout_path
    }

    /// Locate the docs directory inside the checkout.
    ///
    /// A user-declared directory is returned verbatim. Otherwise the first
    /// existing candidate is returned as an absolute path, falling back to
    /// the checkout root.
    pub fn docs_dir(&self, declared: Option<&str>) -> PathBuf {
        if let Some(dir) = declared {
            return PathBuf::from(dir);
        }

        let root = self.checkout_path();
        DOCS_DIR_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_dir())
            .unwrap_or_else(|| root.to_path_buf())
    }
}

/// Whether a version tracks a branch or a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionKind {
    #[default]
    Branch,
    Tag,
}

/// A buildable snapshot of a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Version {
    pub slug: String,

    /// Display name; also the branch or tag name
    pub verbose_name: String,

    pub kind: VersionKind,

    /// Commit being built, if known
    pub commit: Option<String>,

    /// Explicit config file, relative to the checkout
    pub config_file: Option<PathBuf>,

    /// Download format -> URL
    pub downloads: BTreeMap<String, String>,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            slug: "latest".to_string(),
            verbose_name: "latest".to_string(),
            kind: VersionKind::default(),
            commit: None,
            config_file: None,
            downloads: BTreeMap::new(),
        }
    }
}

/// The (project, version) pair a build runs against.
#[derive(Debug, Clone)]
pub struct BuildEnvironment {
    pub project: Project,
    pub version: Version,
}

impl BuildEnvironment {
    pub fn new(project: Project, version: Version) -> Self {
        Self { project, version }
    }

    pub fn checkout_path(&self) -> &Path {
        self.project.checkout_path()
    }
}
