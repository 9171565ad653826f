//! cinstall - concurrent installer for interdependent components
//!
//! Command line entry point; see the library crate for the installer itself.

use clap::Parser;

use cinstall::cli::{Cli, Commands};
use cinstall::commands;
use cinstall::logging::{self, LogConfig};

fn main() {
    let cli = Cli::parse();
    logging::init(&LogConfig::from_verbosity(cli.verbose));

    let root = cli.root.as_deref();
    let result = match &cli.command {
        Commands::Install(args) => commands::install::run(&cli.manifest, root, args),
        Commands::Status(args) => commands::status::run(&cli.manifest, root, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(err) = result {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
