//! Build context for the docbuild configuration injector.
//!
//! Holds the project and version model a build runs against, the platform
//! settings that shape injected assets, and the configuration error kind
//! raised when the governing config file can't be determined.

pub mod error;
pub mod project;
pub mod repo;
pub mod settings;

pub use error::ProjectConfigurationError;
pub use project::{BuildEnvironment, DocumentationType, Project, Version, VersionKind};
pub use repo::{parse_remote, RemoteRepo, RepoHost};
pub use settings::{ConfigFile, ConfigFileError, PlatformSettings};
