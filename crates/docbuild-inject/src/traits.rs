//! Collaborators the injectors depend on.
//!
//! Each build-specific lookup sits behind a trait so an injector can be
//! driven against a scratch checkout without touching the real platform.

use std::path::{Path, PathBuf};

use docbuild_project::{BuildEnvironment, ProjectConfigurationError};
use serde_json::{Map, Value};

use crate::error::InjectError;

/// Resolves the explicitly configured Sphinx `conf.py`.
pub trait ConfigLocator: Send + Sync {
    /// Path to the declared config file.
    ///
    /// Returns [`ProjectConfigurationError::NotFound`] when nothing usable
    /// was declared.
    fn conf_py_path(&self, env: &BuildEnvironment) -> Result<PathBuf, ProjectConfigurationError>;
}

/// Creates a fallback index page when the docs have none.
pub trait IndexCreator: Send + Sync {
    /// Ensure an index exists in `docs_dir` and return its stem
    /// (e.g. "index" or "README").
    fn create_index(&self, docs_dir: &Path, extension: &str) -> Result<String, InjectError>;
}

/// Computes the per-build values rendered into the injected config.
pub trait ConfigParamsSource: Send + Sync {
    /// Template context for the injected block.
    ///
    /// # Arguments
    /// * `env` - The project and version being built
    /// * `conf_py_path` - The config file the block is appended to
    fn config_params(
        &self,
        env: &BuildEnvironment,
        conf_py_path: &Path,
    ) -> Result<Map<String, Value>, InjectError>;
}

/// Output of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands as part of the build log.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, InjectError>;
}
