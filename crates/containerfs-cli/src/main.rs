//! # containerfs
//!
//! Mounts a directory whose entries are symbolic links into the root
//! filesystems of running containers, named by id and by alias.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = i32::from(e.use_stderr());
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli::DEFAULT_LOG_FILTER)),
        )
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .init();

    cli::execute(&cli)
}
