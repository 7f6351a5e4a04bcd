//! Candidate selection
//!
//! Hosts stream raw release candidates in whatever order their API returns;
//! selection sanitizes each one, applies the filter policy, and keeps the
//! maximal accepted version. The scan is a plain fold over the whole stream:
//! no ordering is assumed, so nothing is skipped early.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::version::filter::FilterPolicy;
use crate::version::sanitize::Sanitizer;
use crate::version::value::Version;

/// A raw release candidate as delivered by a host adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    /// Tag name, release title, or changelog heading.
    pub text: String,
    /// Publication timestamp, when the host supplies one.
    pub date: Option<DateTime<Utc>>,
    /// Whether the host flags this as an official release. `None` when the
    /// host has no such notion (bare tags, feeds).
    pub is_formal: Option<bool>,
    /// Downloadable asset identifiers attached to the candidate.
    pub assets: Vec<String>,
    /// Position in the host's native ordering; used only to break ties
    /// between candidates that sanitize to an equal version.
    pub host_order_rank: usize,
}

impl RawCandidate {
    pub fn new(text: impl Into<String>, host_order_rank: usize) -> Self {
        Self {
            text: text.into(),
            date: None,
            is_formal: None,
            assets: Vec::new(),
            host_order_rank,
        }
    }
}

/// The winning candidate of a selection run, with its sanitized version.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub version: Version,
    pub candidate: RawCandidate,
}

/// Fold a candidate stream into the latest accepted release.
///
/// Candidates that fail to sanitize or fail the policy are skipped, never
/// errors. On equal versions the earlier-ranked candidate wins, so a host
/// emitting the same version under two tag spellings yields a stable result.
/// Returns `None` when nothing is accepted.
pub fn select<I>(candidates: I, policy: &FilterPolicy) -> Option<SelectionResult>
where
    I: IntoIterator<Item = RawCandidate>,
{
    let sanitizer = Sanitizer::new();
    let mut best: Option<SelectionResult> = None;

    for candidate in candidates {
        let Some(version) = sanitizer.sanitize(&candidate.text) else {
            debug!("skipping candidate {:?}: no version", candidate.text);
            continue;
        };
        if !policy.accepts(&version, &candidate) {
            debug!("skipping candidate {:?}: rejected by policy", candidate.text);
            continue;
        }
        let better = match &best {
            None => true,
            Some(current) => {
                version > current.version
                    || (version == current.version
                        && candidate.host_order_rank < current.candidate.host_order_rank)
            }
        };
        if better {
            best = Some(SelectionResult { version, candidate });
        }
    }

    best
}
