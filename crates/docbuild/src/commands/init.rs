//! Write a starter docbuild.toml.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'docbuild inject' to prepare the checkout for a build.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# docbuild configuration

[project]
# URL-safe identifier and display name
slug = "my-project"
name = "My Project"

# Root of the checked-out documentation source
checkout_path = "."

# One of: sphinx, sphinx_htmldir, sphinx_singlehtml, mkdocs
documentation_type = "sphinx"

language = "en"
repo = "https://github.com/example/my-project"
repo_type = "git"
active_versions = ["latest"]

[version]
slug = "latest"
verbose_name = "main"
kind = "branch"

# Explicit config file relative to the checkout (conf.py or mkdocs.yml)
# config_file = "docs/conf.py"

[platform]
production_domain = "readthedocs.org"
static_url = "/static/"
"#;
