use std::collections::HashMap;
use std::sync::Arc;

use checkin_domain::ports::TicketStore;
use checkin_domain::Ticket;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::{AppError, Metrics};

type Partition = HashMap<String, Ticket>;

/// Per-event ticket cache, filled lazily from the store.
///
/// Once an event's partition is resident it is the read path for that
/// event. Mutations land here first; the store catches up through the
/// write-behind queue.
pub struct EventCache {
    store: Arc<dyn TicketStore>,
    partitions: RwLock<HashMap<String, Partition>>,
    load_guards: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    metrics: Arc<Metrics>,
}

impl EventCache {
    pub fn new(store: Arc<dyn TicketStore>, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            partitions: RwLock::new(HashMap::new()),
            load_guards: Mutex::new(HashMap::new()),
            metrics,
        }
    }

    pub async fn is_loaded(&self, event_id: &str) -> bool {
        self.partitions.read().await.contains_key(event_id)
    }

    pub async fn loaded_events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.partitions.read().await.keys().cloned().collect();
        events.sort();
        events
    }

    pub async fn ensure_loaded(&self, event_id: &str) -> Result<(), AppError> {
        if self.is_loaded(event_id).await {
            return Ok(());
        }
        let guard = self.load_guard(event_id).await;
        let _loading = guard.lock().await;
        // Another task may have finished the load while we waited.
        if self.is_loaded(event_id).await {
            return Ok(());
        }

        let tickets = match self.store.get_all_tickets(event_id).await {
            Ok(tickets) => tickets,
            Err(err) => {
                self.metrics.record_partition_load_error();
                return Err(AppError::Persistence(
                    err.context(format!("loading tickets for event {}", event_id)),
                ));
            }
        };
        let partition: Partition = tickets
            .into_iter()
            .map(|ticket| (ticket.id.clone(), ticket))
            .collect();
        let count = partition.len();
        self.partitions
            .write()
            .await
            .insert(event_id.to_string(), partition);
        self.metrics.record_partition_load();
        info!("loaded {} tickets for event {}", count, event_id);
        Ok(())
    }

    /// Cached record only. An unloaded partition is a miss; the store is
    /// never consulted here.
    pub async fn get(&self, event_id: &str, ticket_id: &str) -> Option<Ticket> {
        let partitions = self.partitions.read().await;
        partitions
            .get(event_id)
            .and_then(|partition| partition.get(ticket_id))
            .cloned()
    }

    /// Returns false when the event was never loaded; the write is dropped.
    pub async fn put(&self, event_id: &str, ticket: Ticket) -> bool {
        let mut partitions = self.partitions.write().await;
        match partitions.get_mut(event_id) {
            Some(partition) => {
                partition.insert(ticket.id.clone(), ticket);
                true
            }
            None => {
                warn!(
                    "dropping cache write for ticket {}: event {} is not loaded",
                    ticket.id, event_id
                );
                false
            }
        }
    }

    pub async fn remove(&self, event_id: &str, ticket_id: &str) -> Option<Ticket> {
        let mut partitions = self.partitions.write().await;
        partitions
            .get_mut(event_id)
            .and_then(|partition| partition.remove(ticket_id))
    }

    pub async fn drop_partition(&self, event_id: &str) {
        let guard = self.load_guard(event_id).await;
        let _loading = guard.lock().await;
        self.partitions.write().await.remove(event_id);
        self.load_guards.lock().await.remove(event_id);
    }

    pub async fn list_all(&self, event_id: &str) -> Result<Vec<Ticket>, AppError> {
        self.ensure_loaded(event_id).await?;
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(event_id)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn load_guard(&self, event_id: &str) -> Arc<Mutex<()>> {
        let mut guards = self.load_guards.lock().await;
        guards
            .entry(event_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_ticket, RecordingStore};

    fn cache_over(store: &Arc<RecordingStore>) -> EventCache {
        EventCache::new(store.clone(), Arc::new(Metrics::default()))
    }

    #[tokio::test]
    async fn ensure_loaded_twice_reads_store_once() {
        let store = Arc::new(RecordingStore::default());
        store.insert_direct("E1", sample_ticket("Ada")).await;
        let cache = cache_over(&store);

        cache.ensure_loaded("E1").await.expect("first load");
        cache.ensure_loaded("E1").await.expect("second load");

        assert_eq!(store.get_all_calls(), 1);
        assert!(cache.is_loaded("E1").await);
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_store_read() {
        let store = Arc::new(RecordingStore::default());
        store.set_load_delay_ms(20);
        store.insert_direct("E1", sample_ticket("Ada")).await;
        let metrics = Arc::new(Metrics::default());
        let cache = EventCache::new(store.clone(), metrics.clone());

        let (a, b) = tokio::join!(cache.ensure_loaded("E1"), cache.ensure_loaded("E1"));
        a.expect("load a");
        b.expect("load b");

        assert_eq!(store.get_all_calls(), 1);
        assert_eq!(metrics.partition_loads(), 1);
    }

    #[tokio::test]
    async fn get_on_unloaded_event_is_a_miss_without_store_read() {
        let store = Arc::new(RecordingStore::default());
        let ticket = sample_ticket("Ada");
        store.insert_direct("E2", ticket.clone()).await;
        let cache = cache_over(&store);

        assert!(cache.get("E2", &ticket.id).await.is_none());
        assert_eq!(store.get_all_calls(), 0);
        assert_eq!(store.get_one_calls(), 0);
    }

    #[tokio::test]
    async fn put_before_load_is_dropped() {
        let store = Arc::new(RecordingStore::default());
        let cache = cache_over(&store);
        let ticket = sample_ticket("Ada");

        assert!(!cache.put("E1", ticket.clone()).await);
        assert!(!cache.is_loaded("E1").await);
        assert!(cache.get("E1", &ticket.id).await.is_none());
    }

    #[tokio::test]
    async fn list_all_is_a_snapshot_of_the_load() {
        let store = Arc::new(RecordingStore::default());
        let first = sample_ticket("Ada");
        store.insert_direct("E1", first.clone()).await;
        let cache = cache_over(&store);

        let listed = cache.list_all("E1").await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, first.id);

        // Written by someone else after the load: not visible.
        store.insert_direct("E1", sample_ticket("Grace")).await;
        let listed = cache.list_all("E1").await.expect("list again");
        assert_eq!(listed.len(), 1);
        assert_eq!(store.get_all_calls(), 1);
    }

    #[tokio::test]
    async fn failed_load_installs_nothing() {
        let store = Arc::new(RecordingStore::default());
        store.set_offline(true);
        let cache = cache_over(&store);

        let err = cache.ensure_loaded("E1").await.expect_err("offline store");
        assert_eq!(err.kind(), "persistence");
        assert!(!cache.is_loaded("E1").await);

        store.set_offline(false);
        cache.ensure_loaded("E1").await.expect("retry");
        assert!(cache.is_loaded("E1").await);
    }

    #[tokio::test]
    async fn drop_partition_forces_reload() {
        let store = Arc::new(RecordingStore::default());
        let cache = cache_over(&store);
        cache.ensure_loaded("E1").await.expect("load");
        cache.drop_partition("E1").await;

        assert!(!cache.is_loaded("E1").await);
        cache.ensure_loaded("E1").await.expect("reload");
        assert_eq!(store.get_all_calls(), 2);
        assert_eq!(cache.loaded_events().await, vec!["E1".to_string()]);
    }
}
