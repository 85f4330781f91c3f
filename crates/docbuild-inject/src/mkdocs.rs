//! Mkdocs `mkdocs.yml` injection.
//!
//! Loads the user's configuration (or synthesizes a minimal one), merges in
//! the platform's assets and analytics settings, applies the theme
//! overrides and writes the document back.

use std::fs;
use std::path::{Path, PathBuf};

use docbuild_project::{BuildEnvironment, PlatformSettings};
use serde_yaml::{Mapping, Value};

use crate::error::InjectError;
use crate::index::FallbackIndex;
use crate::runner::ProcessRunner;
use crate::templates::{TemplateEngine, MKDOCS_DATA_JS};
use crate::traits::{CommandRunner, IndexCreator};

/// The platform's own Mkdocs theme identifier.
pub const DEFAULT_THEME_NAME: &str = "readthedocs";

const MKDOCS_YML: &str = "mkdocs.yml";
const DATA_SCRIPT: &str = "readthedocs-data.js";

/// Merges platform configuration into a project's `mkdocs.yml`.
pub struct MkdocsInjector {
    env: BuildEnvironment,
    settings: PlatformSettings,
    index: Box<dyn IndexCreator>,
    runner: Box<dyn CommandRunner>,
    templates: TemplateEngine,
}

impl MkdocsInjector {
    /// Create an injector using the default collaborators.
    pub fn new(env: BuildEnvironment, settings: PlatformSettings) -> Result<Self, InjectError> {
        Ok(Self {
            env,
            settings,
            index: Box::new(FallbackIndex),
            runner: Box::new(ProcessRunner),
            templates: TemplateEngine::new()?,
        })
    }

    pub fn with_index_creator(mut self, index: impl IndexCreator + 'static) -> Self {
        self.index = Box::new(index);
        self
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Path of the config file this build reads and writes.
    pub fn yaml_path(&self) -> PathBuf {
        let root = self.env.checkout_path();
        match &self.env.version.config_file {
            Some(declared) => root.join(declared),
            None => root.join(MKDOCS_YML),
        }
    }

    /// Load the user's config, or a minimal one when the file is absent.
    fn load_config(&self, path: &Path) -> Result<Mapping, InjectError> {
        if !path.exists() {
            tracing::info!("No {} found, generating one", path.display());
            let mut config = Mapping::new();
            config.insert(
                "site_name".into(),
                Value::String(self.env.project.name.clone()),
            );
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|e| InjectError::read(path, e))?;
        let value: Value = serde_yaml::from_str(&content).map_err(|e| {
            let note = e
                .location()
                .map(|loc| format!(" (line {}, column {})", loc.line(), loc.column()))
                .unwrap_or_default();
            InjectError::InvalidYaml(note)
        })?;

        match value {
            Value::Mapping(config) => Ok(config),
            Value::Null => Ok(Mapping::new()),
            _ => Err(InjectError::InvalidYaml(
                " (the top level must be a mapping)".to_string(),
            )),
        }
    }

    /// Merge the platform configuration into `mkdocs.yml`.
    ///
    /// Returns the path of the file that was written.
    pub fn append_conf(&self) -> Result<PathBuf, InjectError> {
        let yaml_path = self.yaml_path();
        let root = self.env.checkout_path();
        let mut config = self.load_config(&yaml_path)?;

        let declared = config.get("docs_dir").and_then(Value::as_str).map(String::from);
        let docs_dir = self.env.project.docs_dir(declared.as_deref());
        config.insert(
            "docs_dir".into(),
            Value::String(docs_dir.display().to_string()),
        );

        // Relative docs dirs are resolved from the config file's location
        let config_dir = yaml_path.parent().unwrap_or(root);
        let docs_path = config_dir.join(&docs_dir);

        self.index.create_index(&docs_path, "md")?;

        let static_url = self.settings.absolute_static_url();
        extend_unique(
            &mut config,
            "extra_javascript",
            &[
                DATA_SCRIPT.to_string(),
                format!("{}core/js/readthedocs-doc-embed.js", static_url),
                format!("{}javascript/readthedocs-analytics.js", static_url),
            ],
        );
        extend_unique(
            &mut config,
            "extra_css",
            &[
                format!("{}css/badge_only.css", static_url),
                format!("{}css/readthedocs-doc-embed.css", static_url),
            ],
        );

        let analytics = match &self.env.project.analytics_code {
            Some(code) => Value::Sequence(vec![
                Value::String(code.clone()),
                Value::String(self.settings.production_domain.clone()),
            ]),
            None => Value::Null,
        };
        config.insert("google_analytics".into(), analytics);

        if !config.contains_key("site_name") {
            config.insert(
                "site_name".into(),
                Value::String(self.env.project.name.clone()),
            );
        }

        apply_theme_override(&mut config, &self.settings.mkdocs_template_override_dir);

        self.write_data_script(&docs_path, &docs_dir, &config)?;

        let yaml = serde_yaml::to_string(&Value::Mapping(config))
            .map_err(|e| InjectError::Serialize(format!("{}: {}", yaml_path.display(), e)))?;
        if let Some(parent) = yaml_path.parent() {
            fs::create_dir_all(parent).map_err(|e| InjectError::write(parent, e))?;
        }
        fs::write(&yaml_path, yaml).map_err(|e| InjectError::write(&yaml_path, e))?;
        tracing::info!("Wrote {}", yaml_path.display());

        let relative = yaml_path.strip_prefix(root).unwrap_or(&yaml_path);
        let relative = relative.to_string_lossy().into_owned();
        self.runner.run("cat", &[relative.as_str()], root)?;

        Ok(yaml_path)
    }

    /// Write the build data script read by the platform's embed JavaScript.
    fn write_data_script(
        &self,
        docs_path: &Path,
        docs_dir: &Path,
        config: &Mapping,
    ) -> Result<(), InjectError> {
        let project = &self.env.project;
        let version = &self.env.version;

        let theme = match config.get("theme") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Mapping(theme)) => theme
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };

        let data = serde_json::json!({
            "project": project.slug,
            "version": version.slug,
            "language": project.language,
            "programming_language": project.programming_language,
            "page": null,
            "theme": theme,
            "builder": "mkdocs",
            "docroot": docs_dir.display().to_string(),
            "source_suffix": ".md",
            "api_host": self.settings.public_api_url,
            "commit": version.commit,
            "ad_free": !project.show_advertising,
            "global_analytics_code": self.settings.global_analytics_code,
            "user_analytics_code": project.analytics_code,
        });
        let data_json = serde_json::to_string(&data)
            .map_err(|e| InjectError::Serialize(format!("build data: {}", e)))?;

        let script = self
            .templates
            .render(MKDOCS_DATA_JS, serde_json::json!({ "data_json": data_json }))?;

        let path = docs_path.join(DATA_SCRIPT);
        fs::write(&path, script).map_err(|e| InjectError::write(&path, e))?;

        Ok(())
    }
}

/// Append each entry to the sequence under `key` unless already present.
fn extend_unique(config: &mut Mapping, key: &str, entries: &[String]) {
    let slot = config
        .entry(key.into())
        .or_insert(Value::Sequence(vec![]));

    // A single entry may be written as a bare value
    let items = match &*slot {
        Value::Sequence(_) => None,
        Value::Null => Some(vec![]),
        other => Some(vec![other.clone()]),
    };
    if let Some(items) = items {
        *slot = Value::Sequence(items);
    }

    if let Value::Sequence(items) = slot {
        for entry in entries {
            let value = Value::String(entry.clone());
            if !items.contains(&value) {
                items.push(value);
            }
        }
    }
}

/// Point the platform's own theme at the bundled override directory.
///
/// A mapping-style `theme` named after the platform theme gains a
/// `custom_dir`. A string-style `theme` gains a `theme_dir` unless one is
/// already set. Any other theme is left alone.
fn apply_theme_override(config: &mut Mapping, override_dir: &Path) {
    let override_dir = Value::String(override_dir.display().to_string());

    let platform_theme_string = match config.get_mut("theme") {
        Some(Value::Mapping(theme)) => {
            if theme.get("name").and_then(Value::as_str) == Some(DEFAULT_THEME_NAME) {
                theme.insert("custom_dir".into(), override_dir);
            }
            return;
        }
        Some(Value::String(name)) => name.as_str() == DEFAULT_THEME_NAME,
        _ => false,
    };

    if platform_theme_string && !config.contains_key("theme_dir") {
        config.insert("theme_dir".into(), override_dir);
    }
}
