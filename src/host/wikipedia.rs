//! Wikipedia infobox adapter
//!
//! Operating systems and large products often have no single code host, but
//! their Wikipedia infobox carries a "Latest release" or "Stable release"
//! row. That row yields exactly one candidate. Footnote superscripts and
//! auxiliary spans are stripped here so the version engine sees plain text.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use tracing::warn;

use crate::host::HostKind;
use crate::host::adapter::HostAdapter;
use crate::host::error::HostError;
use crate::version::select::RawCandidate;

/// Default base URL for Wikipedia
const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

/// Short project names with a known page title.
const KNOWN_PAGES: &[(&str, &str)] = &[
    ("rocky", "Rocky_Linux"),
    ("fedora", "Fedora_(operating_system)"),
    ("rhel", "Red_Hat_Enterprise_Linux"),
    ("redhat", "Red_Hat_Enterprise_Linux"),
    ("almalinux", "AlmaLinux"),
    ("ios", "IOS"),
    ("ubuntu", "Ubuntu"),
    ("debian", "Debian"),
    ("android", "Android_(operating_system)"),
    ("windows", "Microsoft_Windows"),
];

/// Whether a one-word specifier is a known project alias.
pub fn is_known_alias(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    KNOWN_PAGES.iter().any(|(alias, _)| *alias == name)
}

/// Page title for a specifier: the aliased page when known, the specifier
/// itself otherwise (explicit page titles pass through).
pub fn page_title(name: &str) -> String {
    let lowered = name.to_ascii_lowercase();
    KNOWN_PAGES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, page)| page.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Adapter reading release data from a Wikipedia infobox.
pub struct WikipediaHost {
    client: reqwest::Client,
    base_url: String,
    row_re: Regex,
    published_re: Regex,
    sup_re: Regex,
    span_re: Regex,
    tag_re: Regex,
}

impl WikipediaHost {
    /// Creates a new WikipediaHost with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("latestver")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            row_re: Regex::new(
                r#"(?is)(?:Latest|Stable)[ _]release.*?infobox-data[^>]*>(.*?)</td>"#,
            )
            .unwrap(),
            published_re: Regex::new(r#"(?s)<span class="published">([^<]*)</span>"#).unwrap(),
            sup_re: Regex::new(r"(?s)<sup[^>]*>.*?</sup>").unwrap(),
            span_re: Regex::new(r"(?s)<span[^>]*>.*?</span>").unwrap(),
            tag_re: Regex::new(r"<[^>]+>").unwrap(),
        }
    }

    fn parse_published(&self, cell: &str) -> Option<DateTime<Utc>> {
        let raw = self.published_re.captures(cell)?[1].trim().to_string();
        let raw = decode_entities(&raw);
        let raw = raw.trim();
        ["%Y-%m-%d", "%d %B %Y", "%B %d, %Y"]
            .into_iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
    }
}

impl Default for WikipediaHost {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl HostAdapter for WikipediaHost {
    fn kind(&self) -> HostKind {
        HostKind::Wikipedia
    }

    async fn fetch_candidates(&self, project: &str) -> Result<Vec<RawCandidate>, HostError> {
        let url = format!("{}/wiki/{}", self.base_url, page_title(project));

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HostError::NotFound(project.to_string()));
        }

        if !status.is_success() {
            warn!("Wikipedia returned status {}: {}", status, url);
            return Err(HostError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.text().await?;

        // a page without the infobox row simply has no release to offer
        let Some(cell) = self.row_re.captures(&body).map(|c| c[1].to_string()) else {
            return Ok(Vec::new());
        };

        let date = self.parse_published(&cell);

        // capture the date first, then drop footnotes and auxiliary spans
        // wholesale before flattening the remaining markup
        let cell = self.sup_re.replace_all(&cell, "");
        let cell = self.span_re.replace_all(&cell, "");
        let text = self.tag_re.replace_all(&cell, " ");
        let text = decode_entities(&text);

        // infoboxes list parallel branches as "5.12 / 5.13"; the first one
        // is the primary stable line
        let text = text.split('/').next().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![RawCandidate {
            text,
            date,
            is_formal: None,
            assets: Vec::new(),
            host_order_rank: 0,
        }])
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&#160;", " ")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use mockito::Server;

    const PAGE: &str = r##"<html><body>
<table class="infobox">
  <tr>
    <th class="infobox-label"><a href="/wiki/Software_release_life_cycle">Latest release</a></th>
    <td class="infobox-data">5.12<sup id="cite_ref-1"><a href="#cite_note-1">[1]</a></sup>
      <span class="published">2024-06-01</span> / 5.13 beta</td>
  </tr>
</table>
</body></html>"##;

    #[tokio::test]
    async fn fetch_candidates_extracts_infobox_release() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/wiki/Rocky_Linux")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;

        let host = WikipediaHost::new(&server.url());
        let candidates = host.fetch_candidates("Rocky_Linux").await.unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "5.12");
        assert_eq!(
            candidates[0].date,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn fetch_candidates_resolves_known_aliases() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/wiki/Fedora_(operating_system)")
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;

        let host = WikipediaHost::new(&server.url());
        let candidates = host.fetch_candidates("fedora").await.unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn fetch_candidates_returns_empty_without_release_row() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/wiki/Some_Page")
            .with_status(200)
            .with_body("<html><body><p>No infobox here.</p></body></html>")
            .create_async()
            .await;

        let host = WikipediaHost::new(&server.url());
        let candidates = host.fetch_candidates("Some_Page").await.unwrap();

        assert!(candidates.is_empty());
    }

    #[test]
    fn page_title_maps_aliases_and_passes_titles_through() {
        assert_eq!(page_title("fedora"), "Fedora_(operating_system)");
        assert_eq!(page_title("REDHAT"), "Red_Hat_Enterprise_Linux");
        assert_eq!(page_title("Rocky_Linux"), "Rocky_Linux");
        assert!(is_known_alias("debian"));
        assert!(!is_known_alias("some-random-project"));
    }
}
