//! Test doubles for the injector collaborators.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use docbuild_project::{BuildEnvironment, ProjectConfigurationError};
use serde_json::{Map, Value};

use crate::error::InjectError;
use crate::traits::{CommandOutput, CommandRunner, ConfigLocator, ConfigParamsSource, IndexCreator};

/// A recorded command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Records commands instead of running them.
#[derive(Debug, Default, Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls().last().cloned()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, InjectError> {
        self.calls.lock().unwrap().push(Call {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        });
        Ok(CommandOutput::default())
    }
}

/// Always fails the explicit config lookup.
pub struct MissingConfig;

impl ConfigLocator for MissingConfig {
    fn conf_py_path(&self, _env: &BuildEnvironment) -> Result<PathBuf, ProjectConfigurationError> {
        Err(ProjectConfigurationError::NotFound)
    }
}

/// Fails the explicit config lookup with an ambiguity error.
pub struct AmbiguousConfig;

impl ConfigLocator for AmbiguousConfig {
    fn conf_py_path(&self, _env: &BuildEnvironment) -> Result<PathBuf, ProjectConfigurationError> {
        Err(ProjectConfigurationError::MultipleConfFiles)
    }
}

/// Returns a fixed index name without touching the filesystem.
pub struct FixedIndex(pub &'static str);

impl IndexCreator for FixedIndex {
    fn create_index(&self, _docs_dir: &Path, _extension: &str) -> Result<String, InjectError> {
        Ok(self.0.to_string())
    }
}

/// Supplies no build parameters at all.
pub struct EmptyParams;

impl ConfigParamsSource for EmptyParams {
    fn config_params(
        &self,
        _env: &BuildEnvironment,
        _conf_py_path: &Path,
    ) -> Result<Map<String, Value>, InjectError> {
        Ok(Map::new())
    }
}
