//! Injection errors.

use docbuild_project::ProjectConfigurationError;

/// Errors that can occur while injecting build configuration.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    #[error(transparent)]
    Configuration(#[from] ProjectConfigurationError),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Your mkdocs.yml could not be loaded, possibly due to a syntax error{0}")]
    InvalidYaml(String),

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to serialize {0}")]
    Serialize(String),

    #[error("Command failed: {0}")]
    Command(String),
}

impl InjectError {
    pub(crate) fn read(path: &std::path::Path, e: impl std::fmt::Display) -> Self {
        InjectError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, e: impl std::fmt::Display) -> Self {
        InjectError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }
}
