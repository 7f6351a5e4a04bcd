use std::process::ExitCode;

use clap::Parser;

use latestver::cli::{self, Cli};

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();
    args.init_tracing();

    let code = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(cli::run(args))?;
    Ok(code)
}
