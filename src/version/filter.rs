//! Candidate filtering policy
//!
//! A [`FilterPolicy`] bundles the acceptance rules for a selection run. All
//! patterns are compiled and all constraints validated when the policy is
//! built, so a malformed configuration fails before any candidate is
//! scanned.

use regex::Regex;
use thiserror::Error;

use crate::version::select::RawCandidate;
use crate::version::value::Version;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("invalid major version constraint {0:?}")]
    InvalidMajor(String),
}

/// Text-matching rule for `only`/`exclude`/asset patterns.
///
/// Parsed once from the CLI mini-language: plain text is a substring match,
/// a leading `~` switches to a regular expression, and a leading `!` negates
/// the rest.
#[derive(Debug, Clone)]
pub enum TextMatch {
    Substring(String),
    Pattern(Regex),
    Not(Box<TextMatch>),
}

impl TextMatch {
    /// Parse the full mini-language, including `!` negation.
    pub fn parse(spec: &str) -> Result<Self, PolicyError> {
        if let Some(rest) = spec.strip_prefix('!') {
            return Ok(TextMatch::Not(Box::new(Self::parse(rest)?)));
        }
        Self::parse_plain(spec)
    }

    /// Parse substring/`~regex` only; `!` has no special meaning here.
    pub fn parse_plain(spec: &str) -> Result<Self, PolicyError> {
        if let Some(rest) = spec.strip_prefix('~') {
            let re = Regex::new(rest).map_err(|source| PolicyError::InvalidPattern {
                pattern: rest.to_string(),
                source,
            })?;
            return Ok(TextMatch::Pattern(re));
        }
        Ok(TextMatch::Substring(spec.to_string()))
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextMatch::Substring(s) => text.contains(s),
            TextMatch::Pattern(re) => re.is_match(text),
            TextMatch::Not(inner) => !inner.matches(text),
        }
    }
}

/// Asset-presence requirement.
#[derive(Debug, Clone)]
pub enum AssetRule {
    /// At least one asset of any kind.
    Any,
    /// At least one asset whose identifier matches.
    Matching(TextMatch),
}

impl AssetRule {
    /// An empty pattern means "any asset".
    pub fn parse(spec: &str) -> Result<Self, PolicyError> {
        if spec.is_empty() {
            return Ok(AssetRule::Any);
        }
        Ok(AssetRule::Matching(TextMatch::parse_plain(spec)?))
    }

    fn is_satisfied_by(&self, assets: &[String]) -> bool {
        match self {
            AssetRule::Any => !assets.is_empty(),
            AssetRule::Matching(m) => assets.iter().any(|a| m.matches(a)),
        }
    }
}

/// Acceptance policy for a selection run. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    only: Option<TextMatch>,
    exclude: Option<TextMatch>,
    having_asset: Option<AssetRule>,
    even: bool,
    formal: bool,
    major: Option<Vec<u64>>,
    pre_ok: bool,
}

impl FilterPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only consider candidates whose text matches. Supports `~regex` and
    /// `!` negation.
    pub fn with_only(mut self, spec: &str) -> Result<Self, PolicyError> {
        self.only = Some(TextMatch::parse(spec)?);
        Ok(self)
    }

    /// Reject candidates whose text matches. Substring or `~regex`.
    pub fn with_exclude(mut self, spec: &str) -> Result<Self, PolicyError> {
        self.exclude = Some(TextMatch::parse_plain(spec)?);
        Ok(self)
    }

    /// Require at least one asset; `spec` narrows it to matching names.
    pub fn with_having_asset(mut self, spec: &str) -> Result<Self, PolicyError> {
        self.having_asset = Some(AssetRule::parse(spec)?);
        Ok(self)
    }

    /// Pin acceptance to versions descending from this release prefix,
    /// e.g. `"2"` or `"2.3"`.
    pub fn with_major(mut self, spec: &str) -> Result<Self, PolicyError> {
        let prefix: Vec<u64> = spec
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<_, _>>()
            .map_err(|_| PolicyError::InvalidMajor(spec.to_string()))?;
        self.major = Some(prefix);
        Ok(self)
    }

    /// Only accept versions with an even minor component.
    pub fn even(mut self, even: bool) -> Self {
        self.even = even;
        self
    }

    /// Only accept candidates the host flagged as formal releases.
    pub fn formal(mut self, formal: bool) -> Self {
        self.formal = formal;
        self
    }

    /// Accept pre-release and development versions.
    pub fn pre_ok(mut self, pre_ok: bool) -> Self {
        self.pre_ok = pre_ok;
        self
    }

    /// Whether this candidate/version pair passes every configured rule.
    /// Cheap text checks run before the version-shape checks.
    pub fn accepts(&self, version: &Version, candidate: &RawCandidate) -> bool {
        if let Some(only) = &self.only {
            if !only.matches(&candidate.text) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.matches(&candidate.text) {
                return false;
            }
        }
        if let Some(rule) = &self.having_asset {
            if !rule.is_satisfied_by(&candidate.assets) {
                return false;
            }
        }
        if self.even && version.minor() % 2 != 0 {
            return false;
        }
        if self.formal && candidate.is_formal != Some(true) {
            return false;
        }
        if let Some(prefix) = &self.major {
            if !version.release_starts_with(prefix) {
                return false;
            }
        }
        if !self.pre_ok && version.is_prerelease() {
            return false;
        }
        true
    }
}
