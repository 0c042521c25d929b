use std::io::ErrorKind;
use std::process;

use clap::Parser;
use cli::{Args, Command};
use commands::Generate;
use error::{SamplerError, SamplerResult};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod prelude;
mod progress;
mod record;
mod sample;
mod source;
mod utils;

fn run(args: Args) -> SamplerResult<()> {
    let quiet = args.quiet;

    match args.cmd {
        None => Generate::default().execute(quiet),
        Some(Command::Completions(cmd)) => cmd.execute(),
        Some(Command::Generate(cmd)) => cmd.execute(quiet),
        Some(Command::Init(cmd)) => cmd.execute(),
        Some(Command::Verify(cmd)) => cmd.execute(),
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => process::exit(0),
        Err(SamplerError::IO(e)) if e.kind() == ErrorKind::BrokenPipe => {
            process::exit(0)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
