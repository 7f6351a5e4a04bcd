//! Hosting platforms: adapters and dispatch
//!
//! Release metadata is published through wildly different conventions: a
//! release API on GitHub/GitLab, an RSS file feed on SourceForge, an infobox
//! on Wikipedia. Each platform gets one adapter producing plain
//! [`RawCandidate`](crate::version::RawCandidate)s; dispatch maps a
//! free-form repo specifier onto one of them through a static table.
//!
//! # Modules
//!
//! - [`adapter`]: the [`HostAdapter`] trait
//! - [`github`], [`gitlab`], [`sourceforge`], [`wikipedia`]: concrete adapters
//! - [`error`]: fetch and dispatch error types

pub mod adapter;
pub mod error;
pub mod github;
pub mod gitlab;
pub mod sourceforge;
pub mod wikipedia;

pub use adapter::HostAdapter;
pub use error::HostError;

/// A supported hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HostKind {
    #[value(name = "github")]
    GitHub,
    #[value(name = "gitlab")]
    GitLab,
    #[value(name = "sourceforge")]
    SourceForge,
    #[value(name = "wikipedia")]
    Wikipedia,
}

impl HostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostKind::GitHub => "github",
            HostKind::GitLab => "gitlab",
            HostKind::SourceForge => "sourceforge",
            HostKind::Wikipedia => "wikipedia",
        }
    }
}

impl std::fmt::Display for HostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hostname (and alias hostnames) to platform, resolved at startup; no
/// dynamic discovery.
const HOSTS: &[(&str, HostKind)] = &[
    ("github.com", HostKind::GitHub),
    ("gitlab.com", HostKind::GitLab),
    ("sourceforge.net", HostKind::SourceForge),
    ("en.wikipedia.org", HostKind::Wikipedia),
    ("wikipedia.org", HostKind::Wikipedia),
];

/// Construct the default adapter for a platform.
pub fn adapter_for(kind: HostKind) -> Box<dyn HostAdapter> {
    match kind {
        HostKind::GitHub => Box::new(github::GitHubHost::default()),
        HostKind::GitLab => Box::new(gitlab::GitLabHost::default()),
        HostKind::SourceForge => Box::new(sourceforge::SourceForgeHost::default()),
        HostKind::Wikipedia => Box::new(wikipedia::WikipediaHost::default()),
    }
}

/// Resolve a repo specifier to a host-native project path and an adapter.
///
/// Accepted forms, in order of precedence: a project URL on a known host, a
/// one-word specifier with an explicit `at` platform, `owner/name` (GitHub),
/// and a known Wikipedia project alias.
pub fn resolve(spec: &str, at: Option<HostKind>) -> Result<(String, Box<dyn HostAdapter>), HostError> {
    if let Some(rest) = spec
        .strip_prefix("https://")
        .or_else(|| spec.strip_prefix("http://"))
    {
        let (hostname, path) = rest
            .split_once('/')
            .ok_or_else(|| HostError::UnknownHost(spec.to_string()))?;
        let hostname = hostname.strip_prefix("www.").unwrap_or(hostname);
        let kind = HOSTS
            .iter()
            .find(|(host, _)| *host == hostname)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| HostError::UnknownHost(spec.to_string()))?;
        let project = project_from_path(kind, path)
            .ok_or_else(|| HostError::UnknownHost(spec.to_string()))?;
        return Ok((project, adapter_for(kind)));
    }

    if let Some(kind) = at {
        let project = match kind {
            HostKind::Wikipedia => wikipedia::page_title(spec),
            _ => spec.to_string(),
        };
        return Ok((project, adapter_for(kind)));
    }

    if spec.contains('/') {
        return Ok((spec.to_string(), adapter_for(HostKind::GitHub)));
    }

    if wikipedia::is_known_alias(spec) {
        return Ok((wikipedia::page_title(spec), adapter_for(HostKind::Wikipedia)));
    }

    Err(HostError::UnknownHost(spec.to_string()))
}

/// Extract the host-native project path from a URL path.
fn project_from_path(kind: HostKind, path: &str) -> Option<String> {
    let path = path.trim_end_matches('/');
    match kind {
        HostKind::GitHub => {
            let mut segments = path.split('/');
            let owner = segments.next().filter(|s| !s.is_empty())?;
            let name = segments.next().filter(|s| !s.is_empty())?;
            Some(format!("{owner}/{name}"))
        }
        // group/subgroup/project, with any "/-/..." page suffix dropped
        HostKind::GitLab => {
            let project = path.split("/-/").next()?.trim_end_matches('/');
            (!project.is_empty()).then(|| project.to_string())
        }
        HostKind::SourceForge => {
            let mut segments = path.split('/');
            let prefix = segments.next()?;
            if prefix != "projects" && prefix != "p" {
                return None;
            }
            segments.next().map(str::to_string)
        }
        HostKind::Wikipedia => {
            let page = path.strip_prefix("wiki/")?;
            let page = page.split('/').next()?;
            (!page.is_empty()).then(|| page.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://github.com/mautic/mautic", HostKind::GitHub, "mautic/mautic")]
    #[case(
        "https://github.com/openssl/openssl/releases",
        HostKind::GitHub,
        "openssl/openssl"
    )]
    #[case(
        "https://gitlab.com/gitlab-org/gitlab-runner",
        HostKind::GitLab,
        "gitlab-org/gitlab-runner"
    )]
    #[case(
        "https://gitlab.com/group/subgroup/project/-/releases",
        HostKind::GitLab,
        "group/subgroup/project"
    )]
    #[case(
        "https://sourceforge.net/projects/keepass/files/",
        HostKind::SourceForge,
        "keepass"
    )]
    #[case(
        "https://en.wikipedia.org/wiki/Rocky_Linux",
        HostKind::Wikipedia,
        "Rocky_Linux"
    )]
    #[case("http://www.github.com/owner/repo", HostKind::GitHub, "owner/repo")]
    fn resolve_maps_urls_to_hosts(
        #[case] url: &str,
        #[case] kind: HostKind,
        #[case] project: &str,
    ) {
        let (resolved, adapter) = resolve(url, None).unwrap();
        assert_eq!(adapter.kind(), kind);
        assert_eq!(resolved, project);
    }

    #[test]
    fn resolve_defaults_owner_name_to_github() {
        let (project, adapter) = resolve("mautic/mautic", None).unwrap();
        assert_eq!(adapter.kind(), HostKind::GitHub);
        assert_eq!(project, "mautic/mautic");
    }

    #[test]
    fn resolve_honors_explicit_at() {
        let (project, adapter) = resolve("keepass", Some(HostKind::SourceForge)).unwrap();
        assert_eq!(adapter.kind(), HostKind::SourceForge);
        assert_eq!(project, "keepass");
    }

    #[test]
    fn resolve_maps_known_aliases_to_wikipedia() {
        let (project, adapter) = resolve("fedora", None).unwrap();
        assert_eq!(adapter.kind(), HostKind::Wikipedia);
        assert_eq!(project, "Fedora_(operating_system)");
    }

    #[rstest]
    #[case("https://example.com/some/repo")]
    #[case("https://github.com")]
    #[case("unheard-of-project")]
    fn resolve_rejects_unknown_specifiers(#[case] spec: &str) {
        assert!(matches!(
            resolve(spec, None),
            Err(HostError::UnknownHost(_))
        ));
    }
}
