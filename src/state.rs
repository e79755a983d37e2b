use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::store::Store;

pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Arc<Self> {
        Arc::new(Self { store })
    }

    pub async fn open(config: &Config) -> Result<Arc<Self>> {
        let store = match &config.data_path {
            Some(path) => Store::open(path).await?,
            None => {
                info!("no data path configured, entries live in memory only");
                Store::in_memory()
            }
        };

        Ok(Self::new(store))
    }
}
