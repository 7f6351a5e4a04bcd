//! Find the latest released version of a project, wherever it is hosted.
//!
//! Release metadata lives behind heterogeneous conventions: release APIs on
//! GitHub and GitLab, an RSS file feed on SourceForge, a wiki infobox for
//! projects with no single code host. Raw version strings are free-form
//! text, not well-formed semantic versions. The [`host`] layer normalizes
//! each platform into a stream of raw candidates; the [`version`] engine
//! sanitizes their text, applies the filter policy, and picks the maximal
//! release under a total version order.
//!
//! # Modules
//!
//! - [`version`]: sanitization, filtering, selection, and version ordering
//! - [`host`]: platform adapters and specifier dispatch
//! - [`config`]: YAML project files
//! - [`output`]: rendering a selection (version, tag, JSON)
//! - [`cli`]: command-line entry point

pub mod cli;
pub mod config;
pub mod host;
pub mod output;
pub mod version;
