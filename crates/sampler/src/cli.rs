use clap::{Parser, Subcommand};

use crate::commands::*;

/// Write a newline-normalized sample of a text dataset.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None, max_term_width = 72)]
pub(crate) struct Args {
    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub(crate) verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub(crate) quiet: bool,

    /// The command to run. If omitted, `generate` is run with the
    /// configured (or default) options.
    #[command(subcommand)]
    pub(crate) cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    Completions(Completions),
    Generate(Generate),
    #[clap(alias = "new")]
    Init(Init),
    Verify(Verify),
}
