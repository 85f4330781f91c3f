//! Config injection command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docbuild_inject::{MkdocsInjector, SphinxInjector};
use docbuild_project::ConfigFile;

use crate::Builder;

/// Run the inject command.
pub fn run(config_path: &Path, builder: Option<Builder>, checkout: Option<PathBuf>) -> Result<()> {
    let mut file_config = ConfigFile::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    if let Some(checkout) = checkout {
        file_config.project.checkout_path = checkout;
    }

    let builder = builder.unwrap_or(if file_config.project.documentation_type.is_sphinx() {
        Builder::Sphinx
    } else {
        Builder::Mkdocs
    });

    let (env, settings) = file_config.into_parts();
    tracing::info!(
        "Injecting {:?} configuration for {} ({}) in {}",
        builder,
        env.project.name,
        env.version.slug,
        env.checkout_path().display()
    );

    let written = match builder {
        Builder::Sphinx => SphinxInjector::new(env, settings)?
            .append_conf()
            .context("Failed to inject Sphinx configuration")?,
        Builder::Mkdocs => MkdocsInjector::new(env, settings)?
            .append_conf()
            .context("Failed to inject Mkdocs configuration")?,
    };

    tracing::info!("Configuration written to {}", written.display());

    Ok(())
}
