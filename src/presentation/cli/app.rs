use clap::Parser;
use std::path::PathBuf;

/// hostpulse: host resource monitor
///
/// Samples CPU, memory and disk usage on a fixed interval, appends them to a
/// daily log, sends a push notification when a threshold is exceeded and
/// mirrors every sample to a Google spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "hostpulse")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Path to config file (default: ./config.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single cycle, print it and exit
    #[arg(long)]
    pub once: bool,
}
