use std::process::ExitCode;

use clap::Parser;

mod app;
mod args;
mod config;
mod effects;
mod logging;
mod render;

fn main() -> ExitCode {
    let args = args::Args::parse();
    let destination = if args.verbose {
        logging::LogDestination::Both
    } else {
        logging::LogDestination::File
    };
    logging::initialize(destination);

    app::run(args)
}
