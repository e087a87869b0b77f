//! Command-line entry point for sweeper.
//!
//! The binary is a thin caller around the library pipeline: it reads the
//! input file, lowers the flags to an ordered operation list, runs one
//! pipeline invocation, and writes the returned buffer to disk.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use clap::Parser as _;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sweeper::logging::init()?;

    let cli = cli::Cli::parse();
    cli::run_command(cli.command)?;
    Ok(())
}
