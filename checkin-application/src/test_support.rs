use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use checkin_domain::ports::TicketStore;
use checkin_domain::{Event, NewTicket, RuntimeConfig, Ticket};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::AppState;

pub fn sample_ticket(name: &str) -> Ticket {
    Ticket::issue(
        NewTicket {
            attendee_name: name.to_string(),
            attendee_email: Some(format!("{}@x.com", name.to_lowercase())),
        },
        Utc::now(),
    )
}

pub fn state_over(store: &Arc<RecordingStore>) -> AppState {
    AppState::new(RuntimeConfig::default(), store.clone())
}

/// Store double that counts reads and can be switched offline or made to
/// reject writes.
#[derive(Default)]
pub struct RecordingStore {
    tickets: Mutex<HashMap<String, HashMap<String, Ticket>>>,
    events: Mutex<HashMap<String, Event>>,
    event_docs: Mutex<BTreeSet<String>>,
    get_all_calls: AtomicUsize,
    get_one_calls: AtomicUsize,
    load_delay_ms: AtomicU64,
    batch_delete_delay_ms: AtomicU64,
    fail_batch_delete: AtomicBool,
    offline: AtomicBool,
    fail_writes: AtomicBool,
}

impl RecordingStore {
    pub fn get_all_calls(&self) -> usize {
        self.get_all_calls.load(Ordering::SeqCst)
    }

    pub fn get_one_calls(&self) -> usize {
        self.get_one_calls.load(Ordering::SeqCst)
    }

    pub fn set_load_delay_ms(&self, delay: u64) {
        self.load_delay_ms.store(delay, Ordering::SeqCst);
    }

    pub fn set_batch_delete_delay_ms(&self, delay: u64) {
        self.batch_delete_delay_ms.store(delay, Ordering::SeqCst);
    }

    /// Fails `batch_delete_tickets` only, as a partially failed cascade would.
    pub fn set_fail_batch_delete(&self, fail: bool) {
        self.fail_batch_delete.store(fail, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Writes straight into the store, as another process would.
    pub async fn insert_direct(&self, event_id: &str, ticket: Ticket) {
        self.event_docs.lock().await.insert(event_id.to_string());
        self.tickets
            .lock()
            .await
            .entry(event_id.to_string())
            .or_default()
            .insert(ticket.id.clone(), ticket);
    }

    pub async fn stored_ticket(&self, event_id: &str, ticket_id: &str) -> Option<Ticket> {
        self.tickets
            .lock()
            .await
            .get(event_id)
            .and_then(|tickets| tickets.get(ticket_id))
            .cloned()
    }

    pub async fn stored_ticket_count(&self, event_id: &str) -> usize {
        self.tickets
            .lock()
            .await
            .get(event_id)
            .map(|tickets| tickets.len())
            .unwrap_or(0)
    }

    fn check_online(&self) -> anyhow::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow!("store offline"));
        }
        Ok(())
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        self.check_online()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("write rejected"));
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for RecordingStore {
    async fn get_all_tickets(&self, event_id: &str) -> anyhow::Result<Vec<Ticket>> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.load_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check_online()?;
        Ok(self
            .tickets
            .lock()
            .await
            .get(event_id)
            .map(|tickets| tickets.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<Option<Ticket>> {
        self.get_one_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.stored_ticket(event_id, ticket_id).await)
    }

    async fn set_ticket(&self, event_id: &str, ticket: &Ticket) -> anyhow::Result<()> {
        self.check_writable()?;
        self.insert_direct(event_id, ticket.clone()).await;
        Ok(())
    }

    async fn delete_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<()> {
        self.check_writable()?;
        if let Some(tickets) = self.tickets.lock().await.get_mut(event_id) {
            tickets.remove(ticket_id);
        }
        Ok(())
    }

    async fn batch_delete_tickets(&self, event_id: &str) -> anyhow::Result<usize> {
        let delay = self.batch_delete_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check_writable()?;
        if self.fail_batch_delete.load(Ordering::SeqCst) {
            let total = self.stored_ticket_count(event_id).await;
            return Err(anyhow!("deleted 0 of {} tickets for event {}", total, event_id));
        }
        Ok(self
            .tickets
            .lock()
            .await
            .remove(event_id)
            .map(|tickets| tickets.len())
            .unwrap_or(0))
    }

    async fn delete_event_document(&self, event_id: &str) -> anyhow::Result<()> {
        self.check_writable()?;
        self.event_docs.lock().await.remove(event_id);
        Ok(())
    }

    async fn get_event_meta(&self, event_id: &str) -> anyhow::Result<Option<Event>> {
        self.check_online()?;
        Ok(self.events.lock().await.get(event_id).cloned())
    }

    async fn set_event_meta(&self, event: &Event) -> anyhow::Result<()> {
        self.check_writable()?;
        self.event_docs.lock().await.insert(event.id.clone());
        self.events.lock().await.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn delete_event_meta(&self, event_id: &str) -> anyhow::Result<()> {
        self.check_writable()?;
        self.events.lock().await.remove(event_id);
        Ok(())
    }

    async fn list_event_meta(&self) -> anyhow::Result<Vec<Event>> {
        self.check_online()?;
        Ok(self.events.lock().await.values().cloned().collect())
    }

    async fn list_event_ids(&self) -> anyhow::Result<Vec<String>> {
        self.check_online()?;
        Ok(self.event_docs.lock().await.iter().cloned().collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.check_online()
    }
}
