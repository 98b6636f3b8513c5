use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use checkin_domain::{Event, Ticket, TicketStore};

#[derive(Default)]
struct Documents {
    tickets: HashMap<String, HashMap<String, Ticket>>,
    events: HashMap<String, Event>,
    event_ids: BTreeSet<String>,
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryTicketStore {
    documents: RwLock<Documents>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn get_all_tickets(&self, event_id: &str) -> anyhow::Result<Vec<Ticket>> {
        let documents = self.documents.read().await;
        Ok(documents
            .tickets
            .get(event_id)
            .map(|tickets| tickets.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<Option<Ticket>> {
        let documents = self.documents.read().await;
        Ok(documents
            .tickets
            .get(event_id)
            .and_then(|tickets| tickets.get(ticket_id))
            .cloned())
    }

    async fn set_ticket(&self, event_id: &str, ticket: &Ticket) -> anyhow::Result<()> {
        let mut documents = self.documents.write().await;
        documents.event_ids.insert(event_id.to_string());
        documents
            .tickets
            .entry(event_id.to_string())
            .or_default()
            .insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }

    async fn delete_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<()> {
        let mut documents = self.documents.write().await;
        if let Some(tickets) = documents.tickets.get_mut(event_id) {
            tickets.remove(ticket_id);
        }
        Ok(())
    }

    async fn batch_delete_tickets(&self, event_id: &str) -> anyhow::Result<usize> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .tickets
            .remove(event_id)
            .map(|tickets| tickets.len())
            .unwrap_or(0))
    }

    async fn delete_event_document(&self, event_id: &str) -> anyhow::Result<()> {
        self.documents.write().await.event_ids.remove(event_id);
        Ok(())
    }

    async fn get_event_meta(&self, event_id: &str) -> anyhow::Result<Option<Event>> {
        Ok(self.documents.read().await.events.get(event_id).cloned())
    }

    async fn set_event_meta(&self, event: &Event) -> anyhow::Result<()> {
        let mut documents = self.documents.write().await;
        documents.event_ids.insert(event.id.clone());
        documents.events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn delete_event_meta(&self, event_id: &str) -> anyhow::Result<()> {
        self.documents.write().await.events.remove(event_id);
        Ok(())
    }

    async fn list_event_meta(&self) -> anyhow::Result<Vec<Event>> {
        Ok(self.documents.read().await.events.values().cloned().collect())
    }

    async fn list_event_ids(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.documents.read().await.event_ids.iter().cloned().collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
