//! Configuration injection for hosted documentation builds.
//!
//! Before Sphinx or Mkdocs runs, the project's native config file is located
//! (or synthesized) and the platform's theme, analytics and static assets
//! are wired into it.

pub mod error;
pub mod index;
pub mod locator;
pub mod mkdocs;
pub mod params;
pub mod runner;
pub mod sphinx;
pub mod templates;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::InjectError;
pub use index::FallbackIndex;
pub use locator::{find_conf_py, VersionConfigLocator};
pub use mkdocs::{MkdocsInjector, DEFAULT_THEME_NAME};
pub use params::BuildConfigParams;
pub use runner::ProcessRunner;
pub use sphinx::SphinxInjector;
pub use templates::TemplateEngine;
pub use traits::{CommandOutput, CommandRunner, ConfigLocator, ConfigParamsSource, IndexCreator};
