//! GitHub releases and tags adapter

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::host::HostKind;
use crate::host::adapter::HostAdapter;
use crate::host::error::HostError;
use crate::version::select::RawCandidate;

/// Default base URL for GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Release from the GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    draft: bool,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
}

/// Bare tag from the tag-list API
#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Adapter for repositories hosted on GitHub.
///
/// Formal releases come from the Releases API; repositories that only ever
/// push tags fall back to the tag list, where no release metadata exists.
pub struct GitHubHost {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubHost {
    /// Creates a new GitHubHost with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("latestver")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, project: &str) -> Result<T, HostError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

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
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(HostError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub response: {}", e);
            HostError::InvalidResponse(e.to_string())
        })
    }

    async fn fetch_releases(&self, project: &str) -> Result<Vec<RawCandidate>, HostError> {
        let url = format!("{}/repos/{}/releases", self.base_url, project);
        let releases: Vec<Release> = self.get_json(&url, project).await?;

        let candidates = releases
            .into_iter()
            .filter(|r| !r.draft)
            .enumerate()
            .map(|(rank, r)| RawCandidate {
                text: r.tag_name,
                date: r.published_at,
                is_formal: Some(true),
                assets: r.assets.into_iter().map(|a| a.name).collect(),
                host_order_rank: rank,
            })
            .collect();

        Ok(candidates)
    }

    async fn fetch_tags(&self, project: &str) -> Result<Vec<RawCandidate>, HostError> {
        let url = format!("{}/repos/{}/tags", self.base_url, project);
        let tags: Vec<Tag> = self.get_json(&url, project).await?;

        let candidates = tags
            .into_iter()
            .enumerate()
            .map(|(rank, t)| RawCandidate::new(t.name, rank))
            .collect();

        Ok(candidates)
    }
}

impl Default for GitHubHost {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl HostAdapter for GitHubHost {
    fn kind(&self) -> HostKind {
        HostKind::GitHub
    }

    async fn fetch_candidates(&self, project: &str) -> Result<Vec<RawCandidate>, HostError> {
        let releases = self.fetch_releases(project).await?;
        if !releases.is_empty() {
            return Ok(releases);
        }
        // tag-only repositories publish nothing through the Releases API
        self.fetch_tags(project).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_candidates_returns_formal_releases_with_assets() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/mautic/mautic/releases")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {
                        "tag_name": "4.4.4",
                        "draft": false,
                        "published_at": "2022-12-01T00:00:00Z",
                        "assets": [{"name": "mautic-4.4.4.zip"}]
                    },
                    {
                        "tag_name": "4.4.3",
                        "draft": false,
                        "published_at": "2022-10-01T00:00:00Z",
                        "assets": []
                    }
                ]"#,
            )
            .create_async()
            .await;

        let host = GitHubHost::new(&server.url());
        let candidates = host.fetch_candidates("mautic/mautic").await.unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text, "4.4.4");
        assert_eq!(candidates[0].is_formal, Some(true));
        assert_eq!(candidates[0].assets, vec!["mautic-4.4.4.zip".to_string()]);
        assert_eq!(candidates[0].host_order_rank, 0);
        assert_eq!(candidates[1].host_order_rank, 1);
    }

    #[tokio::test]
    async fn fetch_candidates_skips_draft_releases() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/repos/owner/repo/releases")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "2.0.0", "draft": true, "published_at": null, "assets": []},
                    {"tag_name": "1.0.0", "draft": false, "published_at": null, "assets": []}
                ]"#,
            )
            .create_async()
            .await;

        let host = GitHubHost::new(&server.url());
        let candidates = host.fetch_candidates("owner/repo").await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "1.0.0");
    }

    #[tokio::test]
    async fn fetch_candidates_falls_back_to_tags_when_no_releases() {
        let mut server = Server::new_async().await;

        let releases_mock = server
            .mock("GET", "/repos/openssl/openssl/releases")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let tags_mock = server
            .mock("GET", "/repos/openssl/openssl/tags")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "openssl-3.0.7"}, {"name": "openssl-3.0.6"}]"#)
            .create_async()
            .await;

        let host = GitHubHost::new(&server.url());
        let candidates = host.fetch_candidates("openssl/openssl").await.unwrap();

        releases_mock.assert_async().await;
        tags_mock.assert_async().await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text, "openssl-3.0.7");
        assert_eq!(candidates[0].is_formal, None);
        assert!(candidates[0].assets.is_empty());
    }

    #[tokio::test]
    async fn fetch_candidates_returns_not_found_for_nonexistent_repo() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/repos/nonexistent/repo/releases")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let host = GitHubHost::new(&server.url());
        let result = host.fetch_candidates("nonexistent/repo").await;

        assert!(matches!(result, Err(HostError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_candidates_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/repos/owner/repo/releases")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_header("retry-after", "60")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let host = GitHubHost::new(&server.url());
        let result = host.fetch_candidates("owner/repo").await;

        assert!(matches!(
            result,
            Err(HostError::RateLimited {
                retry_after_secs: Some(60)
            })
        ));
    }
}
