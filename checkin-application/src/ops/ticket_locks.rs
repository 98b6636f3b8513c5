use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Mutation locks for events and tickets.
///
/// Every ticket mutation holds its event's gate shared plus an async mutex
/// for the ticket itself, for the whole read-modify-write. Deleting an
/// event holds the gate exclusively, so no ticket mutation of that event
/// can interleave with the cascade.
///
/// Locks are always taken event first, then ticket. Entries exist only while
/// somebody holds or waits on them; `release` and `release_event` prune
/// idle ones.
#[derive(Default)]
pub struct TicketLocks {
    events: Mutex<HashMap<String, Arc<RwLock<()>>>>,
    tickets: Mutex<HashMap<(String, String), Arc<Mutex<()>>>>,
}

enum Gate {
    Shared(OwnedRwLockReadGuard<()>),
    Exclusive(OwnedRwLockWriteGuard<()>),
}

pub struct EventGuard {
    event_id: String,
    gate: Gate,
}

pub struct TicketGuard {
    ticket_id: String,
    ticket: OwnedMutexGuard<()>,
    event: EventGuard,
}

impl TicketLocks {
    pub async fn share_event(&self, event_id: &str) -> EventGuard {
        let gate = self.event_gate(event_id).await;
        EventGuard {
            event_id: event_id.to_string(),
            gate: Gate::Shared(gate.read_owned().await),
        }
    }

    pub async fn exclusive_event(&self, event_id: &str) -> EventGuard {
        let gate = self.event_gate(event_id).await;
        EventGuard {
            event_id: event_id.to_string(),
            gate: Gate::Exclusive(gate.write_owned().await),
        }
    }

    pub async fn acquire(&self, event_id: &str, ticket_id: &str) -> TicketGuard {
        let event = self.share_event(event_id).await;
        let lock = {
            let mut tickets = self.tickets.lock().await;
            tickets
                .entry((event_id.to_string(), ticket_id.to_string()))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        TicketGuard {
            ticket_id: ticket_id.to_string(),
            ticket: lock.lock_owned().await,
            event,
        }
    }

    pub async fn release(&self, guard: TicketGuard) {
        let TicketGuard {
            ticket_id,
            ticket,
            event,
        } = guard;
        drop(ticket);
        {
            let key = (event.event_id.clone(), ticket_id);
            let mut tickets = self.tickets.lock().await;
            if tickets.get(&key).is_some_and(is_idle) {
                tickets.remove(&key);
            }
        }
        self.release_event(event).await;
    }

    pub async fn release_event(&self, guard: EventGuard) {
        let EventGuard { event_id, gate } = guard;
        match gate {
            Gate::Shared(read) => drop(read),
            Gate::Exclusive(write) => drop(write),
        }
        let mut events = self.events.lock().await;
        if events.get(&event_id).is_some_and(is_idle) {
            events.remove(&event_id);
        }
    }

    /// Ticket locks currently held or waited on.
    pub async fn tracked(&self) -> usize {
        self.tickets.lock().await.len()
    }

    pub async fn tracked_events(&self) -> usize {
        self.events.lock().await.len()
    }

    async fn event_gate(&self, event_id: &str) -> Arc<RwLock<()>> {
        let mut events = self.events.lock().await;
        events
            .entry(event_id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }
}

// Clones are only handed out under the map lock, so a count of one while
// that lock is held means nobody holds or waits on the entry.
fn is_idle<T>(lock: &Arc<T>) -> bool {
    Arc::strong_count(lock) == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_ticket_is_serialized() {
        let locks = Arc::new(TicketLocks::default());
        let held = locks.acquire("E1", "T1").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let guard = locks.acquire("E1", "T1").await;
                locks.release(guard).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!contender.is_finished());

        locks.release(held).await;
        contender.await.expect("contender finishes");
        assert_eq!(locks.tracked().await, 0);
        assert_eq!(locks.tracked_events().await, 0);
    }

    #[tokio::test]
    async fn different_tickets_do_not_block() {
        let locks = TicketLocks::default();
        let _first = locks.acquire("E1", "T1").await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire("E1", "T2")).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn exclusive_event_waits_for_ticket_holders() {
        let locks = Arc::new(TicketLocks::default());
        let ticket = locks.acquire("E1", "T1").await;

        let deleter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let gate = locks.exclusive_event("E1").await;
                locks.release_event(gate).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!deleter.is_finished());

        let other_event =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("E2", "T1")).await;
        assert!(other_event.is_ok());

        locks.release(ticket).await;
        deleter.await.expect("deleter finishes");
    }

    #[tokio::test]
    async fn ticket_mutations_wait_for_exclusive_event() {
        let locks = Arc::new(TicketLocks::default());
        let gate = locks.exclusive_event("E1").await;

        let mutation = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let guard = locks.acquire("E1", "T1").await;
                locks.release(guard).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!mutation.is_finished());
        assert_eq!(locks.tracked().await, 0);

        locks.release_event(gate).await;
        mutation.await.expect("mutation finishes");
        assert_eq!(locks.tracked_events().await, 0);
    }

    #[tokio::test]
    async fn release_keeps_entries_that_others_wait_on() {
        let locks = Arc::new(TicketLocks::default());
        let held = locks.acquire("E1", "T1").await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire("E1", "T1").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        locks.release(held).await;
        let second = waiter.await.expect("waiter acquires");
        assert_eq!(locks.tracked().await, 1);

        locks.release(second).await;
        assert_eq!(locks.tracked().await, 0);
    }
}
