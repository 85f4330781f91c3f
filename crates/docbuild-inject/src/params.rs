//! Per-build values for the injected Sphinx configuration.

use std::collections::BTreeMap;
use std::path::Path;

use docbuild_project::{parse_remote, BuildEnvironment, PlatformSettings, RepoHost};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::InjectError;
use crate::traits::ConfigParamsSource;

/// An entry in the version selector.
#[derive(Debug, Clone, Serialize)]
struct VersionLink {
    slug: String,
    url: String,
}

#[derive(Debug, Clone, Default, Serialize)]
struct VcsLink {
    user: String,
    repo: String,
    display: bool,
}

/// Template context for `conf.py.tmpl`.
#[derive(Debug, Clone, Serialize)]
struct ConfigParams {
    html_theme: String,
    html_theme_import: String,
    current_version: String,
    version_slug: String,
    project_slug: String,
    project_name: String,
    language: String,
    programming_language: String,
    canonical_url: String,
    analytics_code: String,
    global_analytics_code: String,
    single_version: bool,
    ad_free: bool,
    conf_py_path: String,
    api_host: String,
    media_url: String,
    static_url: String,
    production_domain: String,
    static_path: String,
    template_path: String,
    commit: String,
    versions: Vec<VersionLink>,
    downloads: BTreeMap<String, String>,
    github_user: String,
    github_repo: String,
    github_version: String,
    display_github: bool,
    bitbucket_user: String,
    bitbucket_repo: String,
    bitbucket_version: String,
    display_bitbucket: bool,
    gitlab_user: String,
    gitlab_repo: String,
    gitlab_version: String,
    display_gitlab: bool,
}

/// Computes template values from the build environment and platform settings.
#[derive(Debug, Clone, Default)]
pub struct BuildConfigParams {
    settings: PlatformSettings,
}

impl BuildConfigParams {
    pub fn new(settings: PlatformSettings) -> Self {
        Self { settings }
    }

    fn vcs_link(env: &BuildEnvironment, host: RepoHost) -> VcsLink {
        match parse_remote(&env.project.repo) {
            Some(remote) if remote.host == host => VcsLink {
                user: remote.user,
                repo: remote.repo,
                display: true,
            },
            _ => VcsLink::default(),
        }
    }
}

/// Directory of the config file relative to the checkout, with a trailing slash.
fn relative_conf_dir(env: &BuildEnvironment, conf_py_path: &Path) -> String {
    let dir = conf_py_path.parent().unwrap_or(Path::new(""));
    let relative = dir.strip_prefix(env.checkout_path()).unwrap_or(dir);
    let relative = relative.to_string_lossy();
    let relative = relative.trim_matches('/');

    if relative.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", relative)
    }
}

impl ConfigParamsSource for BuildConfigParams {
    fn config_params(
        &self,
        env: &BuildEnvironment,
        conf_py_path: &Path,
    ) -> Result<Map<String, Value>, InjectError> {
        let project = &env.project;
        let version = &env.version;
        let settings = &self.settings;

        let commit = version.commit.clone().unwrap_or_default();
        let commit = if project.repo_type == "git" {
            commit.chars().take(8).collect()
        } else {
            commit
        };

        let versions = project
            .active_versions
            .iter()
            .map(|slug| VersionLink {
                slug: slug.clone(),
                url: format!("/{}/{}/", project.language, slug),
            })
            .collect();

        let github = Self::vcs_link(env, RepoHost::GitHub);
        let bitbucket = Self::vcs_link(env, RepoHost::Bitbucket);
        let gitlab = Self::vcs_link(env, RepoHost::GitLab);

        let params = ConfigParams {
            html_theme: "sphinx_rtd_theme".to_string(),
            html_theme_import: "sphinx_rtd_theme".to_string(),
            current_version: version.verbose_name.clone(),
            version_slug: version.slug.clone(),
            project_slug: project.slug.clone(),
            project_name: project.name.clone(),
            language: project.language.clone(),
            programming_language: project.programming_language.clone(),
            canonical_url: project.canonical_url.clone().unwrap_or_default(),
            analytics_code: project.analytics_code.clone().unwrap_or_default(),
            global_analytics_code: settings.global_analytics_code.clone().unwrap_or_default(),
            single_version: project.single_version,
            ad_free: !project.show_advertising,
            conf_py_path: relative_conf_dir(env, conf_py_path),
            api_host: settings.public_api_url.clone(),
            media_url: settings.media_url.clone(),
            static_url: settings.static_url.clone(),
            production_domain: settings.production_domain.clone(),
            static_path: settings.sphinx_static_dir.display().to_string(),
            template_path: settings.sphinx_template_dir.display().to_string(),
            commit,
            versions,
            downloads: version.downloads.clone(),
            github_user: github.user,
            github_repo: github.repo,
            github_version: version.verbose_name.clone(),
            display_github: github.display,
            bitbucket_user: bitbucket.user,
            bitbucket_repo: bitbucket.repo,
            bitbucket_version: version.verbose_name.clone(),
            display_bitbucket: bitbucket.display,
            gitlab_user: gitlab.user,
            gitlab_repo: gitlab.repo,
            gitlab_version: version.verbose_name.clone(),
            display_gitlab: gitlab.display,
        };

        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(e) => Err(InjectError::Serialize(format!("config params: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbuild_project::{Project, Version};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn env() -> BuildEnvironment {
        BuildEnvironment::new(
            Project {
                slug: "pip".to_string(),
                name: "Pip".to_string(),
                checkout_path: PathBuf::from("/srv/checkouts/pip"),
                repo: "https://github.com/pypa/pip.git".to_string(),
                active_versions: vec!["latest".to_string(), "stable".to_string()],
                ..Default::default()
            },
            Version {
                slug: "latest".to_string(),
                verbose_name: "master".to_string(),
                commit: Some("0123456789abcdef".to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn computes_vcs_links_and_commit() {
        let params = BuildConfigParams::default()
            .config_params(&env(), Path::new("/srv/checkouts/pip/docs/conf.py"))
            .unwrap();

        assert_eq!(params["github_user"], "pypa");
        assert_eq!(params["github_repo"], "pip");
        assert_eq!(params["github_version"], "master");
        assert_eq!(params["display_github"], true);
        assert_eq!(params["display_bitbucket"], false);
        assert_eq!(params["commit"], "01234567");
        assert_eq!(params["conf_py_path"], "/docs/");
    }

    #[test]
    fn lists_active_versions() {
        let params = BuildConfigParams::default()
            .config_params(&env(), Path::new("/srv/checkouts/pip/conf.py"))
            .unwrap();

        assert_eq!(
            params["versions"],
            serde_json::json!([
                {"slug": "latest", "url": "/en/latest/"},
                {"slug": "stable", "url": "/en/stable/"},
            ])
        );
        assert_eq!(params["conf_py_path"], "/");
    }

    #[test]
    fn keeps_full_commit_outside_git() {
        let mut env = env();
        env.project.repo_type = "hg".to_string();

        let params = BuildConfigParams::default()
            .config_params(&env, Path::new("/srv/checkouts/pip/conf.py"))
            .unwrap();

        assert_eq!(params["commit"], "0123456789abcdef");
    }
}
