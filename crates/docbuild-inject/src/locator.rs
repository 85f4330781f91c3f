//! Sphinx `conf.py` discovery.

use std::path::{Path, PathBuf};

use docbuild_project::{BuildEnvironment, ProjectConfigurationError};
use walkdir::WalkDir;

use crate::traits::ConfigLocator;

const CONF_PY: &str = "conf.py";

/// Looks up the config file declared on the version being built.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionConfigLocator;

impl ConfigLocator for VersionConfigLocator {
    fn conf_py_path(&self, env: &BuildEnvironment) -> Result<PathBuf, ProjectConfigurationError> {
        let Some(declared) = env.version.config_file.as_ref() else {
            return Err(ProjectConfigurationError::NotFound);
        };

        let path = env.checkout_path().join(declared);
        if path.is_file() {
            Ok(path)
        } else {
            tracing::warn!(
                "Declared config file {} does not exist in {}",
                declared.display(),
                env.checkout_path().display()
            );
            Err(ProjectConfigurationError::NotFound)
        }
    }
}

/// Find every `conf.py` in `docs_dir` and its immediate subdirectories.
///
/// Results are sorted so callers see a stable order.
pub fn find_conf_py(docs_dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(docs_dir)
        .min_depth(1)
        .max_depth(2)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == CONF_PY)
        .map(|e| e.into_path())
        .collect();

    found.sort();
    found
}
