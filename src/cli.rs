//! Command-line interface
//!
//! Builds the filter policy from flags (and an optional YAML project file),
//! dispatches to a host adapter, runs the selection, and renders the
//! result. Policy errors surface before any network traffic.

use std::path::Path;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ProjectFile;
use crate::host::{self, HostKind};
use crate::output::{self, OutputFormat};
use crate::version::filter::FilterPolicy;
use crate::version::sanitize::Sanitizer;
use crate::version::select::select;

#[derive(Debug, Parser)]
#[command(name = "latestver")]
#[command(version, about = "Find the latest release version of a project")]
pub struct Cli {
    /// Repository specifier: owner/name, a project URL, a known project
    /// alias, or a YAML project file
    pub repo: String,

    /// Accept pre-releases (alpha/beta/rc/dev) as the latest version
    #[arg(long)]
    pub pre: bool,

    /// Only consider candidates whose text matches; prefix with `~` for a
    /// regex, `!` to negate
    #[arg(long, value_name = "PATTERN")]
    pub only: Option<String>,

    /// Skip candidates whose text matches; plain substring or `~regex`
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Option<String>,

    /// Only consider releases carrying an asset, optionally one whose name
    /// matches the given pattern
    #[arg(long, value_name = "PATTERN", num_args = 0..=1, default_missing_value = "")]
    pub having_asset: Option<String>,

    /// Only consider versions with an even minor component
    #[arg(long)]
    pub even: bool,

    /// Only consider formal releases published in the host UI, not bare tags
    #[arg(long)]
    pub formal: bool,

    /// Only consider versions descending from this release prefix,
    /// e.g. "2" or "2.3"
    #[arg(long, value_name = "PREFIX")]
    pub major: Option<String>,

    /// Hosting platform, for one-word specifiers that need disambiguation
    #[arg(long, value_enum, value_name = "HOST")]
    pub at: Option<HostKind>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Version)]
    pub format: OutputFormat,

    /// Print the result only if it is newer than this version; exit 2
    /// otherwise
    #[arg(long, value_name = "VERSION")]
    pub newer_than: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Route logs to stderr; `-v` flags set the level unless RUST_LOG does.
    pub fn init_tracing(&self) {
        let default = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut repo = cli.repo.clone();
    let mut only = cli.only.clone();
    let mut having_asset = cli.having_asset.clone();
    let mut major = cli.major.clone();

    let is_url = repo.starts_with("http://") || repo.starts_with("https://");
    if !is_url && (repo.ends_with(".yml") || repo.ends_with(".yaml")) {
        let file = ProjectFile::load(Path::new(&repo))?;
        repo = file
            .repo
            .ok_or_else(|| anyhow!("project file {} has no repo key", cli.repo))?;
        only = only.or(file.only);
        having_asset = having_asset.or(file.having_asset);
        major = major.or(file.major);
    }

    let newer_than = match &cli.newer_than {
        Some(raw) => Some(
            Sanitizer::new()
                .sanitize(raw)
                .ok_or_else(|| anyhow!("{raw:?} does not contain a version"))?,
        ),
        None => None,
    };

    let mut policy = FilterPolicy::new()
        .pre_ok(cli.pre)
        .even(cli.even)
        .formal(cli.formal);
    if let Some(spec) = &only {
        policy = policy.with_only(spec)?;
    }
    if let Some(spec) = &cli.exclude {
        policy = policy.with_exclude(spec)?;
    }
    if let Some(spec) = &having_asset {
        policy = policy.with_having_asset(spec)?;
    }
    if let Some(spec) = &major {
        policy = policy.with_major(spec)?;
    }

    let (project, adapter) = host::resolve(&repo, cli.at)?;
    info!("querying {} for {}", adapter.kind(), project);
    let candidates = adapter.fetch_candidates(&project).await?;

    let Some(result) = select(candidates, &policy) else {
        eprintln!("No release found for {}", cli.repo);
        return Ok(ExitCode::from(1));
    };
    info!(
        "located release tag {} as version {}",
        result.candidate.text, result.version
    );

    if let Some(current) = newer_than {
        if result.version <= current {
            eprintln!("No release newer than {current}");
            return Ok(ExitCode::from(2));
        }
    }

    println!("{}", output::render(&result, cli.format));
    Ok(ExitCode::SUCCESS)
}
