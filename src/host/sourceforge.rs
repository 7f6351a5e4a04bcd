//! SourceForge file-feed adapter
//!
//! SourceForge has no release API; the project RSS feed lists uploaded files
//! newest-first, and file names are all there is to work with. Each feed
//! item becomes one candidate whose text is the file name.

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::warn;

use crate::host::HostKind;
use crate::host::adapter::HostAdapter;
use crate::host::error::HostError;
use crate::version::select::RawCandidate;

/// Default base URL for SourceForge
const DEFAULT_BASE_URL: &str = "https://sourceforge.net";

/// Adapter for projects hosted on SourceForge.
pub struct SourceForgeHost {
    client: reqwest::Client,
    base_url: String,
    item_re: Regex,
    title_re: Regex,
    pubdate_re: Regex,
}

impl SourceForgeHost {
    /// Creates a new SourceForgeHost with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("latestver")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            item_re: Regex::new(r"(?s)<item>(.*?)</item>").unwrap(),
            title_re: Regex::new(r"(?s)<title>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</title>").unwrap(),
            pubdate_re: Regex::new(r"<pubDate>(.*?)</pubDate>").unwrap(),
        }
    }
}

impl Default for SourceForgeHost {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl HostAdapter for SourceForgeHost {
    fn kind(&self) -> HostKind {
        HostKind::SourceForge
    }

    async fn fetch_candidates(&self, project: &str) -> Result<Vec<RawCandidate>, HostError> {
        let url = format!("{}/projects/{}/rss?path=/", self.base_url, project);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HostError::NotFound(project.to_string()));
        }

        if !status.is_success() {
            warn!("SourceForge returned status {}: {}", status, url);
            return Err(HostError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.text().await?;

        let mut candidates = Vec::new();
        for caps in self.item_re.captures_iter(&body) {
            let item = &caps[1];
            let Some(path) = self
                .title_re
                .captures(item)
                .map(|c| c[1].trim().trim_end_matches('/').to_string())
            else {
                continue;
            };
            // feed titles are file paths; the file name carries the version
            let Some(file_name) = path.rsplit('/').next().filter(|s| !s.is_empty()) else {
                continue;
            };
            let date = self
                .pubdate_re
                .captures(item)
                .and_then(|c| DateTime::parse_from_rfc2822(c[1].trim()).ok())
                .map(|d| d.with_timezone(&Utc));

            candidates.push(RawCandidate {
                text: file_name.to_string(),
                date,
                is_formal: None,
                assets: vec![path.clone()],
                host_order_rank: candidates.len(),
            });
        }

        Ok(candidates)
    }
}
