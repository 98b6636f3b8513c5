use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;

use checkin_application::AppState;
use checkin_domain::TicketStore;
use checkin_infrastructure::{AppConfig, InMemoryTicketStore, JsonDocumentStore};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let store = build_store(config).await?;
        let state = AppState::new(runtime_config, store);
        Ok(Self { state })
    }
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn TicketStore>> {
    match config.store_backend.as_str() {
        "memory" => {
            info!("using in-memory ticket store, data is lost on exit");
            Ok(Arc::new(InMemoryTicketStore::new()))
        }
        "file" => {
            let store = JsonDocumentStore::new(&config.data_dir);
            store.ensure_layout().await?;
            info!("using file ticket store at {}", config.data_dir);
            Ok(Arc::new(store))
        }
        other => Err(anyhow!("unsupported store_backend '{}'", other)),
    }
}
