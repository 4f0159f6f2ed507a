//! Springlint CLI entry point.

use clap::Parser;
use springlint::cli::{self, Cli, Commands, EXIT_ERROR};
use springlint::logging;

fn main() {
    logging::init_subscriber();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Scan(args) => match cli::run_scan(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                EXIT_ERROR
            }
        },
        Commands::Report(args) => match cli::run_report(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                EXIT_ERROR
            }
        },
    };

    std::process::exit(exit_code);
}
