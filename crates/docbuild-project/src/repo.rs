//! Remote repository URL parsing.
//!
//! Used to link built pages back to their source on the hosting service.

use std::sync::LazyLock;

use regex::Regex;

/// A supported source hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoHost {
    GitHub,
    Bitbucket,
    GitLab,
}

impl RepoHost {
    fn domain(self) -> &'static str {
        match self {
            RepoHost::GitHub => "github.com",
            RepoHost::Bitbucket => "bitbucket.org",
            RepoHost::GitLab => "gitlab.com",
        }
    }
}

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub host: RepoHost,
    pub user: String,
    pub repo: String,
}

static REMOTE_PATTERNS: LazyLock<Vec<(RepoHost, Regex)>> = LazyLock::new(|| {
    [RepoHost::GitHub, RepoHost::Bitbucket, RepoHost::GitLab]
        .into_iter()
        .filter_map(|host| {
            // Matches both https://host/user/repo and git@host:user/repo
            let pattern = format!(
                r"{}[/:]([^/]+)/([^/]+?)(?:\.git)?/?$",
                regex::escape(host.domain())
            );
            Regex::new(&pattern).ok().map(|re| (host, re))
        })
        .collect()
});

/// Parse a repository URL into its host, user and repository name.
///
/// Returns `None` for unsupported hosts or malformed URLs.
pub fn parse_remote(url: &str) -> Option<RemoteRepo> {
    let url = url.trim();

    REMOTE_PATTERNS.iter().find_map(|(host, re)| {
        let caps = re.captures(url)?;
        Some(RemoteRepo {
            host: *host,
            user: caps[1].to_string(),
            repo: caps[2].to_string(),
        })
    })
}
