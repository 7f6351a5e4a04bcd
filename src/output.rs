//! Rendering a selection for the caller
//!
//! The version string itself is lossless (parsing the rendered form yields
//! an equal value), so it can be substituted back into surrounding literal
//! text such as a `v`-prefixed tag. That substitution is what `spec_tag`
//! produces for templating.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::version::select::SelectionResult;
use crate::version::value::Version;

/// How a selection is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Canonical version string
    Version,
    /// Originating tag text, verbatim
    Tag,
    /// Full release data as JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Version => "version",
            OutputFormat::Tag => "tag",
            OutputFormat::Json => "json",
        })
    }
}

#[derive(Serialize)]
struct JsonRelease<'a> {
    version: String,
    tag_name: &'a str,
    tag_date: Option<DateTime<Utc>>,
    is_formal: Option<bool>,
    assets: &'a [String],
    v_prefix: bool,
    spec_tag: String,
}

/// Render a selection in the requested format.
pub fn render(result: &SelectionResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Version => result.version.to_string(),
        OutputFormat::Tag => result.candidate.text.clone(),
        OutputFormat::Json => {
            let tag = result.candidate.text.as_str();
            let release = JsonRelease {
                version: result.version.to_string(),
                tag_name: tag,
                tag_date: result.candidate.date,
                is_formal: result.candidate.is_formal,
                assets: &result.candidate.assets,
                v_prefix: tag.starts_with('v'),
                spec_tag: spec_tag(tag, &result.version),
            };
            serde_json::to_string_pretty(&release).expect("release data serializes")
        }
    }
}

/// Replace the version substring inside a tag with the `%{version}` macro,
/// preserving surrounding literal text: `v4.4.4` becomes `v%{version}`.
pub fn spec_tag(tag: &str, version: &Version) -> String {
    tag.replace(&version.to_string(), "%{version}")
}
