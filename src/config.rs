//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Community dictionary server
#[derive(Debug, Clone, Parser)]
#[command(name = "dictio-core", version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "DICTIO_LISTEN_ADDR", default_value = "0.0.0.0:1111")]
    pub listen_addr: SocketAddr,

    /// JSON file holding entries and users; memory only when unset
    #[arg(long, env = "DICTIO_DATA_PATH")]
    pub data_path: Option<PathBuf>,

    /// Allow cross-origin requests
    #[arg(long, env = "DICTIO_CORS", default_value_t = false)]
    pub cors: bool,
}
