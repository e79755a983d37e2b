//! Community dictionary core.
//!
//! Users submit a term together with its translation, e.g.
//! `casa@spanish` / `house@english`. Both sides are stored as two entries
//! sharing one *definition node*; re-submitting an existing pair reuses the
//! node instead of creating a duplicate. Entries can be searched by whole
//! word (optionally scoped to a language) and a node is always deleted as a
//! whole.
//!
//! Layout:
//! - `model`: entries, users, ids and the language enum
//! - `parsers`: `text@language` submissions
//! - `store`: snapshot store with transactions and JSON persistence
//! - `services`: node linker, search, deletion, definition view, users
//! - `protocol`: axum routes
//!
//! ```sh
//! DICTIO_DATA_PATH=./dictionary.json RUST_LOG=info cargo run
//! ```

use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;
pub mod state;
pub mod store;

use config::Config;
use state::AppState;

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let state = AppState::open(&config).await?;

    let mut app = protocol::router(state);
    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }

    info!("Binding to {}", config.listen_addr);
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("Server running on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
