//! GitLab releases adapter

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::host::HostKind;
use crate::host::adapter::HostAdapter;
use crate::host::error::HostError;
use crate::version::select::RawCandidate;

/// Default base URL for GitLab API
const DEFAULT_BASE_URL: &str = "https://gitlab.com";

/// Release from the GitLab Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    upcoming_release: bool,
    #[serde(default)]
    assets: Assets,
}

#[derive(Debug, Default, Deserialize)]
struct Assets {
    #[serde(default)]
    links: Vec<AssetLink>,
}

#[derive(Debug, Deserialize)]
struct AssetLink {
    name: String,
}

/// Adapter for projects hosted on GitLab, including nested group paths.
pub struct GitLabHost {
    client: reqwest::Client,
    base_url: String,
}

impl GitLabHost {
    /// Creates a new GitLabHost with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("latestver")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for GitLabHost {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl HostAdapter for GitLabHost {
    fn kind(&self) -> HostKind {
        HostKind::GitLab
    }

    async fn fetch_candidates(&self, project: &str) -> Result<Vec<RawCandidate>, HostError> {
        // project paths are URL-encoded into a single path segment
        let url = format!(
            "{}/api/v4/projects/{}/releases",
            self.base_url,
            project.replace('/', "%2F")
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HostError::NotFound(project.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(HostError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitLab API returned status {}: {}", status, url);
            return Err(HostError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let releases: Vec<Release> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitLab releases response: {}", e);
            HostError::InvalidResponse(e.to_string())
        })?;

        let candidates = releases
            .into_iter()
            .filter(|r| !r.upcoming_release)
            .enumerate()
            .map(|(rank, r)| RawCandidate {
                text: r.tag_name,
                date: r.released_at,
                is_formal: Some(true),
                assets: r.assets.links.into_iter().map(|l| l.name).collect(),
                host_order_rank: rank,
            })
            .collect();

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_candidates_returns_releases_with_encoded_path() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v4/projects/gitlab-org%2Fgitlab-runner/releases")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {
                        "tag_name": "v16.5.0",
                        "released_at": "2023-10-20T00:00:00Z",
                        "upcoming_release": false,
                        "assets": {"links": [{"name": "linux amd64"}]}
                    }
                ]"#,
            )
            .create_async()
            .await;

        let host = GitLabHost::new(&server.url());
        let candidates = host
            .fetch_candidates("gitlab-org/gitlab-runner")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "v16.5.0");
        assert_eq!(candidates[0].is_formal, Some(true));
        assert_eq!(candidates[0].assets, vec!["linux amd64".to_string()]);
    }

    #[tokio::test]
    async fn fetch_candidates_skips_upcoming_releases() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/api/v4/projects/group%2Fproject/releases")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v2.0.0", "released_at": null, "upcoming_release": true, "assets": {"links": []}},
                    {"tag_name": "v1.0.0", "released_at": null, "upcoming_release": false, "assets": {"links": []}}
                ]"#,
            )
            .create_async()
            .await;

        let host = GitLabHost::new(&server.url());
        let candidates = host.fetch_candidates("group/project").await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "v1.0.0");
    }

    #[tokio::test]
    async fn fetch_candidates_returns_not_found_for_missing_project() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/api/v4/projects/no%2Fsuch/releases")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "404 Project Not Found"}"#)
            .create_async()
            .await;

        let host = GitLabHost::new(&server.url());
        let result = host.fetch_candidates("no/such").await;

        assert!(matches!(result, Err(HostError::NotFound(_))));
    }
}
