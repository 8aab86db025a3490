//! Command-line arguments

use clap::Parser;

/// linkping: URL shortener, click analytics and ping checker
#[derive(Debug, Parser)]
#[command(name = "linkping", version, about)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long = "generate-config")]
    pub generate_config: bool,
}
