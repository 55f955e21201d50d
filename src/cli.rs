use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sysup",
    about = "System update helper for apt-based hosts - refresh, upgrade, clean up, report",
    version,
    author
)]
pub struct Cli {
    /// Mail the run summary to this address when the run finishes
    #[arg(short, long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Assume "yes" at every confirmation prompt
    #[arg(short = 'y', long = "yes")]
    pub assume_yes: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory the per-run log file is written to
    #[arg(long, value_name = "DIR", default_value = "/var/log/sysup")]
    pub log_dir: PathBuf,
}
