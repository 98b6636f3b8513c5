use async_trait::async_trait;

use crate::entities::{Event, Ticket};

/// Durable document store holding event metadata and ticket records.
///
/// Tickets live under their event; event metadata lives in its own
/// collection. `list_event_ids` reports event documents regardless of
/// whether metadata exists for them.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn get_all_tickets(&self, event_id: &str) -> anyhow::Result<Vec<Ticket>>;
    async fn get_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<Option<Ticket>>;
    async fn set_ticket(&self, event_id: &str, ticket: &Ticket) -> anyhow::Result<()>;
    async fn delete_ticket(&self, event_id: &str, ticket_id: &str) -> anyhow::Result<()>;
    async fn batch_delete_tickets(&self, event_id: &str) -> anyhow::Result<usize>;
    async fn delete_event_document(&self, event_id: &str) -> anyhow::Result<()>;

    async fn get_event_meta(&self, event_id: &str) -> anyhow::Result<Option<Event>>;
    async fn set_event_meta(&self, event: &Event) -> anyhow::Result<()>;
    async fn delete_event_meta(&self, event_id: &str) -> anyhow::Result<()>;
    async fn list_event_meta(&self) -> anyhow::Result<Vec<Event>>;
    async fn list_event_ids(&self) -> anyhow::Result<Vec<String>>;

    async fn ping(&self) -> anyhow::Result<()>;
}
