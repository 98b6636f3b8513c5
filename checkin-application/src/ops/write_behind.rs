use std::collections::VecDeque;
use std::sync::Arc;

use checkin_domain::ports::TicketStore;
use checkin_domain::{DeadLetter, Ticket};
use chrono::Utc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::warn;

use crate::Metrics;

#[derive(Debug, Clone)]
pub enum StoreWrite {
    PutTicket { event_id: String, ticket: Ticket },
    DeleteTicket { event_id: String, ticket_id: String },
}

impl StoreWrite {
    pub fn operation(&self) -> &'static str {
        match self {
            StoreWrite::PutTicket { .. } => "set_ticket",
            StoreWrite::DeleteTicket { .. } => "delete_ticket",
        }
    }

    fn target(&self) -> (&str, &str) {
        match self {
            StoreWrite::PutTicket { event_id, ticket } => (event_id, &ticket.id),
            StoreWrite::DeleteTicket {
                event_id,
                ticket_id,
            } => (event_id, ticket_id),
        }
    }
}

enum Job {
    Write(StoreWrite),
    Flush(oneshot::Sender<()>),
}

/// Background persistence for ticket mutations.
///
/// Writes are applied one at a time in submission order. Failures are never
/// reported to the submitter: they are logged and kept in a bounded
/// dead-letter list, oldest dropped first. There is no retry.
pub struct WriteBehind {
    sender: mpsc::UnboundedSender<Job>,
    dead_letters: Arc<RwLock<VecDeque<DeadLetter>>>,
}

impl WriteBehind {
    pub fn spawn(store: Arc<dyn TicketStore>, metrics: Arc<Metrics>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let dead_letters = Arc::new(RwLock::new(VecDeque::new()));
        tokio::spawn(run_worker(
            receiver,
            store,
            metrics,
            dead_letters.clone(),
            capacity.max(1),
        ));
        Self {
            sender,
            dead_letters,
        }
    }

    pub fn submit(&self, write: StoreWrite) {
        if let Err(err) = self.sender.send(Job::Write(write)) {
            if let Job::Write(write) = err.0 {
                let (event_id, ticket_id) = write.target();
                warn!(
                    "write-behind worker stopped, {} for {}/{} was not persisted",
                    write.operation(),
                    event_id,
                    ticket_id
                );
            }
        }
    }

    /// Resolves once every write submitted before this call was attempted.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Job::Flush(tx)).is_err() {
            return;
        }
        let _ = rx.await;
    }

    /// Most recent first.
    pub async fn dead_letters(&self, limit: usize) -> Vec<DeadLetter> {
        let letters = self.dead_letters.read().await;
        letters.iter().rev().take(limit).cloned().collect()
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<Job>,
    store: Arc<dyn TicketStore>,
    metrics: Arc<Metrics>,
    dead_letters: Arc<RwLock<VecDeque<DeadLetter>>>,
    capacity: usize,
) {
    while let Some(job) = receiver.recv().await {
        let write = match job {
            Job::Write(write) => write,
            Job::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };
        metrics.record_background_write();
        if let Err(err) = apply(store.as_ref(), &write).await {
            let (event_id, ticket_id) = write.target();
            warn!(
                "background {} failed for {}/{}: {:#}",
                write.operation(),
                event_id,
                ticket_id,
                err
            );
            metrics.record_background_write_failure();
            let mut letters = dead_letters.write().await;
            if letters.len() >= capacity {
                letters.pop_front();
            }
            letters.push_back(DeadLetter {
                timestamp_ms: Utc::now().timestamp_millis(),
                event_id: event_id.to_string(),
                ticket_id: ticket_id.to_string(),
                operation: write.operation().to_string(),
                error: format!("{:#}", err),
            });
        }
    }
}

async fn apply(store: &dyn TicketStore, write: &StoreWrite) -> anyhow::Result<()> {
    match write {
        StoreWrite::PutTicket { event_id, ticket } => store.set_ticket(event_id, ticket).await,
        StoreWrite::DeleteTicket {
            event_id,
            ticket_id,
        } => store.delete_ticket(event_id, ticket_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_ticket, RecordingStore};

    #[tokio::test]
    async fn flush_waits_for_queued_writes() {
        let store = Arc::new(RecordingStore::default());
        let writer = WriteBehind::spawn(store.clone(), Arc::new(Metrics::default()), 8);
        let ticket = sample_ticket("Ada");

        writer.submit(StoreWrite::PutTicket {
            event_id: "E1".to_string(),
            ticket: ticket.clone(),
        });
        writer.flush().await;

        let stored = store.stored_ticket("E1", &ticket.id).await.expect("persisted");
        assert_eq!(stored.attendee_name, "Ada");
    }

    #[tokio::test]
    async fn writes_apply_in_submission_order() {
        let store = Arc::new(RecordingStore::default());
        let writer = WriteBehind::spawn(store.clone(), Arc::new(Metrics::default()), 8);
        let ticket = sample_ticket("Ada");

        writer.submit(StoreWrite::PutTicket {
            event_id: "E1".to_string(),
            ticket: ticket.clone(),
        });
        writer.submit(StoreWrite::DeleteTicket {
            event_id: "E1".to_string(),
            ticket_id: ticket.id.clone(),
        });
        writer.flush().await;

        assert!(store.stored_ticket("E1", &ticket.id).await.is_none());
    }

    #[tokio::test]
    async fn failures_are_dead_lettered_up_to_capacity() {
        let store = Arc::new(RecordingStore::default());
        store.set_fail_writes(true);
        let metrics = Arc::new(Metrics::default());
        let writer = WriteBehind::spawn(store.clone(), metrics.clone(), 2);

        let names = ["Ada", "Grace", "Edsger"];
        let tickets: Vec<Ticket> = names.iter().map(|name| sample_ticket(name)).collect();
        for ticket in &tickets {
            writer.submit(StoreWrite::PutTicket {
                event_id: "E1".to_string(),
                ticket: ticket.clone(),
            });
        }
        writer.flush().await;

        let letters = writer.dead_letters(10).await;
        assert_eq!(letters.len(), 2);
        assert_eq!(letters[0].ticket_id, tickets[2].id);
        assert_eq!(letters[1].ticket_id, tickets[1].id);
        assert_eq!(letters[0].operation, "set_ticket");
        assert_eq!(metrics.background_write_failures(), 3);
    }
}
