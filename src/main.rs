use clap::Parser;
use dictio_core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    dictio_core::init_logging();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.listen_addr,
        data_path = ?config.data_path,
        cors = config.cors,
        "Starting dictionary server"
    );

    dictio_core::start_server(config).await
}
