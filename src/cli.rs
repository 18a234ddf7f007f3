use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skinevo-relay")]
#[command(author, version, about = "HTTP relay for skin photo analysis via a vision LLM")]
pub struct Cli {
    /// Path to config file (TOML)
    #[arg(short, long, env = "SKINEVO_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listening port (overrides config file and the PORT variable)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (overrides config file)
    #[arg(long)]
    pub bind: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
