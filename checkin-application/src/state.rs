use std::sync::Arc;

use checkin_domain::ports::TicketStore;
use checkin_domain::RuntimeConfig;

use crate::ops::{EventCache, TicketLocks, WriteBehind};
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub store: Arc<dyn TicketStore>,
    pub cache: Arc<EventCache>,
    pub locks: Arc<TicketLocks>,
    pub write_behind: Arc<WriteBehind>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wires the cache and the background writer around `store`.
    ///
    /// Spawns the write-behind worker, so it must be called inside a tokio
    /// runtime.
    pub fn new(config: RuntimeConfig, store: Arc<dyn TicketStore>) -> Self {
        let metrics = Arc::new(Metrics::default());
        let cache = Arc::new(EventCache::new(store.clone(), metrics.clone()));
        let write_behind = Arc::new(WriteBehind::spawn(
            store.clone(),
            metrics.clone(),
            config.dead_letter_capacity,
        ));
        Self {
            config,
            store,
            cache,
            locks: Arc::new(TicketLocks::default()),
            write_behind,
            metrics,
        }
    }
}
