//! Sphinx `conf.py` injection.
//!
//! Finds the project's `conf.py` (or writes one from the bootstrap template
//! when the project has none) and appends the platform's configuration
//! block to it. The block is delimited by sentinel comments, so injecting
//! into an already-injected file replaces the previous block.

use std::fs;
use std::path::{Path, PathBuf};

use docbuild_project::{BuildEnvironment, PlatformSettings, ProjectConfigurationError};
use serde_json::json;

use crate::error::InjectError;
use crate::index::FallbackIndex;
use crate::locator::{find_conf_py, VersionConfigLocator};
use crate::params::BuildConfigParams;
use crate::runner::ProcessRunner;
use crate::templates::{
    TemplateEngine, CONF_PY_BOOTSTRAP, CONF_PY_INJECTED, INJECTED_BEGIN, INJECTED_END,
};
use crate::traits::{CommandRunner, ConfigLocator, ConfigParamsSource, IndexCreator};

/// Appends platform configuration to a Sphinx project's `conf.py`.
pub struct SphinxInjector {
    env: BuildEnvironment,
    settings: PlatformSettings,
    locator: Box<dyn ConfigLocator>,
    index: Box<dyn IndexCreator>,
    params: Box<dyn ConfigParamsSource>,
    runner: Box<dyn CommandRunner>,
    templates: TemplateEngine,
}

impl SphinxInjector {
    /// Create an injector using the default collaborators.
    pub fn new(env: BuildEnvironment, settings: PlatformSettings) -> Result<Self, InjectError> {
        Ok(Self {
            params: Box::new(BuildConfigParams::new(settings.clone())),
            env,
            settings,
            locator: Box::new(VersionConfigLocator),
            index: Box::new(FallbackIndex),
            runner: Box::new(ProcessRunner),
            templates: TemplateEngine::new()?,
        })
    }

    pub fn with_locator(mut self, locator: impl ConfigLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn with_index_creator(mut self, index: impl IndexCreator + 'static) -> Self {
        self.index = Box::new(index);
        self
    }

    pub fn with_config_params(mut self, params: impl ConfigParamsSource + 'static) -> Self {
        self.params = Box::new(params);
        self
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Directory holding the Sphinx sources.
    pub fn docs_dir(&self) -> PathBuf {
        self.env.project.docs_dir(None)
    }

    /// Resolve the `conf.py` governing this build, creating one if needed.
    ///
    /// Fails with [`ProjectConfigurationError::MultipleConfFiles`] when no
    /// file is declared and more than one candidate exists.
    pub fn resolve_conf_py(&self) -> Result<PathBuf, InjectError> {
        match self.locator.conf_py_path(&self.env) {
            Ok(path) => return Ok(path),
            Err(ProjectConfigurationError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let docs_dir = self.docs_dir();
        let mut candidates = find_conf_py(&docs_dir);

        match candidates.len() {
            0 => {
                tracing::info!("No conf.py found in {}, creating one", docs_dir.display());
                let master_doc = self.index.create_index(&docs_dir, "rst")?;
                self.write_bootstrap(&docs_dir, &master_doc)
            }
            1 => Ok(candidates.remove(0)),
            n => {
                tracing::warn!(
                    "Found {} conf.py files in {}, refusing to guess",
                    n,
                    docs_dir.display()
                );
                Err(ProjectConfigurationError::MultipleConfFiles.into())
            }
        }
    }

    /// Write a fresh `conf.py` from the bootstrap template.
    fn write_bootstrap(&self, docs_dir: &Path, master_doc: &str) -> Result<PathBuf, InjectError> {
        let project = &self.env.project;
        let content = self.templates.render(
            CONF_PY_BOOTSTRAP,
            json!({
                "template_dir": self.settings.sphinx_template_dir.display().to_string(),
                "master_doc": master_doc,
                "project_name": project.name,
                "project_slug": project.slug,
                "version_name": self.env.version.verbose_name,
                "author": "",
            }),
        )?;

        let path = docs_dir.join("conf.py");
        fs::write(&path, content).map_err(|e| InjectError::write(&path, e))?;
        tracing::info!("Created {}", path.display());

        Ok(path)
    }

    /// Locate or create `conf.py` and append the platform configuration.
    ///
    /// Returns the path of the file that was written.
    pub fn append_conf(&self) -> Result<PathBuf, InjectError> {
        let conf_path = self.resolve_conf_py()?;

        let params = self.params.config_params(&self.env, &conf_path)?;
        let block = self.templates.render(CONF_PY_INJECTED, params)?;

        // User files may declare any source encoding, so they stay raw bytes
        let existing = fs::read(&conf_path).map_err(|e| InjectError::read(&conf_path, e))?;
        let mut content = strip_injected_block(&existing);
        content.push(b'\n');
        content.extend_from_slice(block.as_bytes());

        fs::write(&conf_path, content).map_err(|e| InjectError::write(&conf_path, e))?;
        tracing::info!("Injected build configuration into {}", conf_path.display());

        let root = self.env.checkout_path();
        let relative = conf_path.strip_prefix(root).unwrap_or(&conf_path);
        let relative = relative.to_string_lossy().into_owned();
        self.runner.run("cat", &[relative.as_str()], root)?;

        Ok(conf_path)
    }
}

/// Remove a previously injected block, including the separating newline.
fn strip_injected_block(content: &[u8]) -> Vec<u8> {
    let Some(start) = find_bytes(content, INJECTED_BEGIN.as_bytes()) else {
        return content.to_vec();
    };

    let end = find_bytes(&content[start..], INJECTED_END.as_bytes())
        .map(|pos| start + pos + INJECTED_END.len())
        .unwrap_or(content.len());

    let before = content[..start].strip_suffix(b"\n").unwrap_or(&content[..start]);
    let after = content[end..].strip_prefix(b"\n").unwrap_or(&content[end..]);

    [before, after].concat()
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{AmbiguousConfig, EmptyParams, FixedIndex, MissingConfig, RecordingRunner};
    use docbuild_project::{Project, Version};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const BOOTSTRAP_LINES: usize = 28;

    fn pip_env(root: &Path) -> BuildEnvironment {
        BuildEnvironment::new(
            Project {
                slug: "pip".to_string(),
                name: "Pip".to_string(),
                checkout_path: root.to_path_buf(),
                ..Default::default()
            },
            Version {
                slug: "0.8.1".to_string(),
                verbose_name: "0.8.1".to_string(),
                ..Default::default()
            },
        )
    }

    fn injector(root: &Path, runner: &RecordingRunner) -> SphinxInjector {
        let settings = PlatformSettings {
            sphinx_template_dir: PathBuf::from("/tmp/sphinx-template-dir"),
            ..Default::default()
        };

        SphinxInjector::new(pip_env(root), settings)
            .unwrap()
            .with_locator(MissingConfig)
            .with_index_creator(FixedIndex("index"))
            .with_config_params(EmptyParams)
            .with_runner(runner.clone())
    }

    #[test]
    fn creates_conf_py_from_bootstrap() {
        let temp = tempdir().unwrap();
        let runner = RecordingRunner::default();

        let path = injector(temp.path(), &runner).append_conf().unwrap();

        assert_eq!(path, temp.path().join("conf.py"));

        let generated = fs::read_to_string(&path).unwrap();
        let expected = fs::read_to_string(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/files/conf.py"),
        )
        .unwrap();

        let generated: Vec<&str> = generated.lines().take(BOOTSTRAP_LINES).collect();
        let expected: Vec<&str> = expected.lines().take(BOOTSTRAP_LINES).collect();
        assert_eq!(generated, expected);
    }

    #[test]
    fn appends_non_ascii_content() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("conf.py"), "project = u'Pâtisserie ✓'\n").unwrap();
        let runner = RecordingRunner::default();

        let settings = PlatformSettings::default();
        let env = pip_env(temp.path());
        SphinxInjector::new(env, settings)
            .unwrap()
            .with_locator(MissingConfig)
            .with_runner(runner.clone())
            .append_conf()
            .unwrap();

        let content = fs::read_to_string(temp.path().join("conf.py")).unwrap();
        assert!(content.starts_with("project = u'Pâtisserie ✓'\n\n"));
        assert!(content.contains(INJECTED_BEGIN));
        assert!(content.contains("'name': u'Pip',"));
    }

    #[test]
    fn multiple_conf_py_is_an_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("conf.py"), "").unwrap();
        fs::create_dir(temp.path().join("test")).unwrap();
        fs::write(temp.path().join("test/conf.py"), "").unwrap();
        let runner = RecordingRunner::default();

        let result = injector(temp.path(), &runner).append_conf();

        assert!(matches!(
            result,
            Err(InjectError::Configuration(
                ProjectConfigurationError::MultipleConfFiles
            ))
        ));
        assert_eq!(fs::read_to_string(temp.path().join("conf.py")).unwrap(), "");
        assert_eq!(
            fs::read_to_string(temp.path().join("test/conf.py")).unwrap(),
            ""
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn single_nested_conf_py_is_used() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("source")).unwrap();
        fs::write(temp.path().join("source/conf.py"), "extensions = []\n").unwrap();
        let runner = RecordingRunner::default();

        let path = injector(temp.path(), &runner).append_conf().unwrap();

        assert_eq!(path, temp.path().join("source/conf.py"));
        assert!(!temp.path().join("conf.py").exists());

        let call = runner.last_call().unwrap();
        assert_eq!(call.command, "cat");
        assert_eq!(call.args, vec!["source/conf.py".to_string()]);
        assert_eq!(call.cwd, temp.path());
    }

    #[test]
    fn declared_conf_py_wins_over_scan() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("conf.py"), "").unwrap();
        fs::create_dir(temp.path().join("other")).unwrap();
        fs::write(temp.path().join("other/conf.py"), "").unwrap();
        let runner = RecordingRunner::default();

        let mut env = pip_env(temp.path());
        env.version.config_file = Some(PathBuf::from("other/conf.py"));

        let path = SphinxInjector::new(env, PlatformSettings::default())
            .unwrap()
            .with_config_params(EmptyParams)
            .with_runner(runner.clone())
            .append_conf()
            .unwrap();

        assert_eq!(path, temp.path().join("other/conf.py"));
        assert_eq!(fs::read_to_string(temp.path().join("conf.py")).unwrap(), "");
    }

    #[test]
    fn reinjection_replaces_previous_block() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("conf.py"), "extensions = []\n").unwrap();
        let runner = RecordingRunner::default();
        let injector = injector(temp.path(), &runner);

        injector.append_conf().unwrap();
        let first = fs::read_to_string(temp.path().join("conf.py")).unwrap();
        injector.append_conf().unwrap();
        let second = fs::read_to_string(temp.path().join("conf.py")).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.matches(INJECTED_BEGIN).count(), 1);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn strip_keeps_user_content_around_block() {
        let content = format!("a = 1\n\n{}\nx = 2\n{}\nb = 2\n", INJECTED_BEGIN, INJECTED_END);

        assert_eq!(strip_injected_block(content.as_bytes()), b"a = 1\nb = 2\n");
        assert_eq!(strip_injected_block(b"a = 1\n"), b"a = 1\n");
    }

    #[test]
    fn appends_to_latin1_conf_py() {
        let temp = tempdir().unwrap();
        let original = b"# -*- coding: latin-1 -*-\nproject = u'Caf\xe9'\n".to_vec();
        fs::write(temp.path().join("conf.py"), &original).unwrap();
        let runner = RecordingRunner::default();
        let injector = injector(temp.path(), &runner);

        injector.append_conf().unwrap();
        injector.append_conf().unwrap();

        let content = fs::read(temp.path().join("conf.py")).unwrap();
        assert!(content.starts_with(&original));
        assert_eq!(content[original.len()], b'\n');
        assert!(content[original.len() + 1..].starts_with(INJECTED_BEGIN.as_bytes()));
        assert_eq!(
            content
                .windows(INJECTED_BEGIN.len())
                .filter(|w| *w == INJECTED_BEGIN.as_bytes())
                .count(),
            1
        );
    }

    #[test]
    fn other_lookup_errors_propagate() {
        let temp = tempdir().unwrap();
        let runner = RecordingRunner::default();

        let result = injector(temp.path(), &runner)
            .with_locator(AmbiguousConfig)
            .append_conf();

        assert!(matches!(
            result,
            Err(InjectError::Configuration(
                ProjectConfigurationError::MultipleConfFiles
            ))
        ));
        // An empty checkout would have been bootstrapped had the scan run
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
        assert!(runner.calls().is_empty());
    }
}
