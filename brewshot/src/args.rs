use std::path::PathBuf;

use clap::Parser;

/// Brewshot marketing studio
#[derive(Debug, Parser)]
#[command(
    name = "brewshot",
    about = "Turns product photos into marketing images, taglines and clips"
)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "brewshot.toml", env = "BREWSHOT_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "BREWSHOT_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "info", env = "BREWSHOT_LOG")]
    pub log: String,
}
