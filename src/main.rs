use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

mod action;
mod cli;
mod config;
mod error;
mod logging;
mod parser;
mod session;
mod token;

// The workload is strictly sequential (one login, one action), so a
// single-threaded runtime is all this needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            err.exit_code()
        }
    }
}
