//! Version sanitization
//!
//! Release feeds mix prose with version fragments ("Latest stable release:
//! 5.12", "v5.12-rc1"). Sanitization rewrites marker tokens into their
//! canonical spellings, drops purely descriptive words, and parses whatever
//! survives into a [`Version`]. Text with no extractable version yields
//! `None`; that is the normal outcome for boilerplate titles.

use regex::Regex;
use tracing::debug;

use crate::version::value::{PreKind, Version};

/// Words marking an in-progress snapshot, rewritten to `dev0`.
const DEV_WORDS: &[&str] = &["devel", "test", "dev"];

/// Turns free-form release text into a [`Version`].
pub struct Sanitizer {
    /// `pN` patch convention, standalone or attached (`2.3.4-p2`)
    patch_token_re: Regex,
    /// Marker tokens that travel separately from the release tuple
    marker_re: Regex,
    /// Unanchored version shape for digging a version out of a larger token
    extract_re: Regex,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self {
            patch_token_re: Regex::new(r"^(?P<prefix>.*[-._])?p(?P<num>\d+)$").unwrap(),
            marker_re: Regex::new(r"^(?P<label>dev|post|a|b|rc)(?P<num>\d+)$").unwrap(),
            extract_re: Regex::new(
                r"(?ix)\d+(?:\.\d+)*
                  (?:[-_.]?(?:alpha|beta|preview|pre|rc|a|b|c)[-_.]?\d*)?
                  (?:-\d+|[-_.]?(?:post|rev|r)[-_.]?\d*)?
                  (?:[-_.]?dev[-_.]?\d*)?",
            )
            .unwrap(),
        }
    }

    /// Sanitize raw tag or title text into a version, if it contains one.
    pub fn sanitize(&self, text: &str) -> Option<Version> {
        let text = strip_v_prefix(text.trim());

        let mut tokens: Vec<String> = Vec::new();
        for raw in text.split_whitespace() {
            let token = if DEV_WORDS.contains(&raw) {
                "dev0".to_string()
            } else {
                self.patch_token_re
                    .replace(raw, "${prefix}post${num}")
                    .into_owned()
            };
            // descriptive words carry no version information; rewritten
            // tokens contain digits and always survive this check
            if token.chars().all(char::is_alphabetic) {
                continue;
            }
            tokens.push(token);
        }

        if tokens.is_empty() {
            debug!("no version-bearing tokens in {text:?}");
            return None;
        }

        if let Some(version) = Version::parse(&tokens.join(" ")) {
            return Some(version);
        }

        // Marker tokens ("dev0", "rc1") can be separated from the release
        // tuple by prose; fold them onto the first token that yields one.
        let mut base: Option<Version> = None;
        let mut markers: Vec<(PreKind, &str, u64)> = Vec::new();
        for token in &tokens {
            if let Some(caps) = self.marker_re.captures(token) {
                let n = caps["num"].parse().unwrap_or(0);
                let label = caps.name("label").unwrap().as_str();
                let kind = match label {
                    "a" => PreKind::Alpha,
                    "b" => PreKind::Beta,
                    _ => PreKind::Rc,
                };
                markers.push((kind, label, n));
                continue;
            }
            if base.is_none() {
                base = Version::parse(token).or_else(|| self.extract(token));
            }
        }

        let mut version = base?;
        for (kind, label, n) in markers {
            match label {
                "dev" => version.set_dev_if_absent(n),
                "post" => version.set_post_if_absent(n),
                _ => version.set_pre_if_absent(kind, n),
            }
        }
        Some(version)
    }

    /// Dig a version out of a token that is not a version by itself, e.g. a
    /// file name like `KeePass-2.57.zip` or a leftover like `release: 5.12`.
    fn extract(&self, token: &str) -> Option<Version> {
        let token = strip_v_prefix(token);
        for m in self.extract_re.find_iter(token) {
            if glued_to_word(token, m.start()) {
                continue;
            }
            if let Some(version) = Version::parse(m.as_str()) {
                return Some(version);
            }
        }
        None
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the digits starting at `start` are glued to a preceding word
/// ("sha256", "utf8") rather than opening a version. A lone `v`/`V` prefix
/// does not count as a word (`release-v1.2.3`).
fn glued_to_word(token: &str, start: usize) -> bool {
    let mut before = token[..start].chars().rev();
    match before.next() {
        Some('v' | 'V') => before.next().is_some_and(|c| c.is_ascii_alphabetic()),
        Some(c) => c.is_ascii_alphabetic(),
        None => false,
    }
}

/// Strip a leading `v`/`V` when it prefixes a digit, e.g. `v1.2.3`.
fn strip_v_prefix(text: &str) -> &str {
    match text.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => text,
    }
}
