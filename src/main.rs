mod agents;
mod cli;
mod error;
mod report;
mod utils;
mod workflow;

use clap::Parser;
use clap::error::ErrorKind;
use cli::Cli;
use std::process;
use workflow::RunConfig;

fn main() {
    // Help and version are informational (exit 0); every other parse
    // problem, including a missing --email value, is a usage error (exit 1).
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    let status = workflow::execute_update(RunConfig {
        email: cli.email,
        assume_yes: cli.assume_yes,
        verbose: cli.verbose,
        log_dir: cli.log_dir,
    });
    process::exit(status.code());
}
