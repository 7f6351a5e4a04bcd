//! Ordered version values
//!
//! A [`Version`] is the normalized form of a release tag: epoch, numeric
//! release tuple, and optional pre/post/dev markers plus an opaque local
//! segment. Values are built once (by parsing) and only compared after that.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Grammar for a single version string.
///
/// Accepts the spellings commonly seen in the wild: an optional `N!` epoch,
/// a dotted numeric release tuple, pre-release markers (`a`/`alpha`, `b`/
/// `beta`, `rc`/`c`/`pre`/`preview`) with optional separators and number,
/// post-release as `-N` or `post`/`rev`/`r`, a `devN` marker, and a local
/// segment after `+`.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^\s*
          (?:(?P<epoch>\d+)!)?
          (?P<release>\d+(?:\.\d+)*)
          (?:[-_.]?(?P<pre_l>alpha|beta|preview|pre|rc|a|b|c)[-_.]?(?P<pre_n>\d+)?)?
          (?:-(?P<post_raw>\d+)|[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n>\d+)?)?
          (?:[-_.]?(?P<dev_l>dev)[-_.]?(?P<dev_n>\d+)?)?
          (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
          \s*$",
    )
    .unwrap()
});

/// Pre-release phase, in ascending order of maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreKind {
    Alpha,
    Beta,
    Rc,
}

impl PreKind {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreKind::Alpha,
            "b" | "beta" => PreKind::Beta,
            // "c", "pre" and "preview" all mean a release candidate
            _ => PreKind::Rc,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::Rc => "rc",
        }
    }
}

/// An immutable, totally ordered release version.
///
/// Ordering is over `(epoch, release, pre, post, dev)`; the local segment is
/// carried and rendered but does not participate in comparisons. Release
/// tuples compare with implicit zero-padding, so `1.2` and `1.2.0` are equal
/// while each renders as parsed.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreKind, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

impl Version {
    /// Parse a version string. Returns `None` when the text is not a version
    /// on its own; absence is an expected outcome, not an error.
    pub fn parse(input: &str) -> Option<Version> {
        let caps = VERSION_RE.captures(input)?;

        let epoch = match caps.name("epoch") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let release: Vec<u64> = caps["release"]
            .split('.')
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;

        let pre = match caps.name("pre_l") {
            Some(label) => {
                let n = match caps.name("pre_n") {
                    Some(m) => m.as_str().parse().ok()?,
                    None => 0,
                };
                Some((PreKind::from_label(label.as_str()), n))
            }
            None => None,
        };

        let post = if let Some(m) = caps.name("post_raw") {
            Some(m.as_str().parse().ok()?)
        } else if caps.name("post_l").is_some() {
            match caps.name("post_n") {
                Some(m) => Some(m.as_str().parse().ok()?),
                None => Some(0),
            }
        } else {
            None
        };

        let dev = if caps.name("dev_l").is_some() {
            match caps.name("dev_n") {
                Some(m) => Some(m.as_str().parse().ok()?),
                None => Some(0),
            }
        } else {
            None
        };

        let local = caps.name("local").map(|m| m.as_str().to_string());

        Some(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The numeric release tuple, e.g. `[1, 2, 3]` for `1.2.3`.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The second release component, or 0 when the tuple has only one.
    pub fn minor(&self) -> u64 {
        self.release.get(1).copied().unwrap_or(0)
    }

    pub fn pre(&self) -> Option<(PreKind, u64)> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// True for alpha/beta/rc and development snapshots.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Whether the release tuple descends from `prefix`, with missing
    /// components treated as zero: `[2]` accepts `2.3.1`, `[2, 3]` does not
    /// accept `2.4.0`.
    pub fn release_starts_with(&self, prefix: &[u64]) -> bool {
        prefix
            .iter()
            .enumerate()
            .all(|(i, p)| self.release.get(i).copied().unwrap_or(0) == *p)
    }

    pub(crate) fn set_pre_if_absent(&mut self, kind: PreKind, n: u64) {
        if self.pre.is_none() {
            self.pre = Some((kind, n));
        }
    }

    pub(crate) fn set_post_if_absent(&mut self, n: u64) {
        if self.post.is_none() {
            self.post = Some(n);
        }
    }

    pub(crate) fn set_dev_if_absent(&mut self, n: u64) {
        if self.dev.is_none() {
            self.dev = Some(n);
        }
    }

    // Rank of the pre-release slot: a bare dev snapshot sorts below every
    // pre-release of the same tuple, and a final release above both.
    fn pre_key(&self) -> (u8, u8, u64) {
        match self.pre {
            Some((kind, n)) => (1, kind as u8, n),
            None if self.post.is_none() && self.dev.is_some() => (0, 0, 0),
            None => (2, 0, 0),
        }
    }

    fn post_key(&self) -> (u8, u64) {
        match self.post {
            Some(n) => (1, n),
            None => (0, 0),
        }
    }

    // A dev marker sorts below the same version without one.
    fn dev_key(&self) -> (u8, u64) {
        match self.dev {
            Some(n) => (0, n),
            None => (1, 0),
        }
    }
}

fn cmp_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        match av.cmp(&bv) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| cmp_release(&self.release, &other.release))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post_key().cmp(&other.post_key()))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        f.write_str(&release.join("."))?;
        if let Some((kind, n)) = self.pre {
            write!(f, "{}{}", kind.label(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{n}")?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{n}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}
