use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG: &str = "devcamper.toml";

/// DevCamper bootcamp directory API
#[derive(Debug, Parser)]
#[command(name = "devcamper", about = "Bootcamp directory API with normalized failure responses")]
pub struct Args {
    /// Path to configuration file; `devcamper.toml` is used when present
    #[arg(short, long, env = "DEVCAMPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "DEVCAMPER_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directives, e.g. `info,devcamper_server=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Args {
    /// Config file to load, falling back to [`DEFAULT_CONFIG`]
    pub fn config_path(&self) -> &Path {
        self.config.as_deref().unwrap_or_else(|| Path::new(DEFAULT_CONFIG))
    }
}
