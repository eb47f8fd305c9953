//! # Journal: in-memory event record with ordered queries.
//!
//! Stores every event it receives. Queries return events sorted by `seq`, which
//! restores each actor's exact step order even though delivery is asynchronous.
//!
//! ## Architecture
//! ```text
//! SubscriberSet worker ──► Journal::on_event() ──► RwLock<Vec<Event>>
//!                                                      │
//!                             events() / for_actor() / count() (sorted by seq)
//! ```

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::events::{Event, EventKind};
use crate::model::{Actor, CustomerId};
use crate::subscribers::Subscribe;

/// Thread-safe recorder of events.
#[derive(Default)]
pub struct Journal {
    events: RwLock<Vec<Event>>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, ordered by `seq`.
    pub async fn events(&self) -> Vec<Event> {
        let mut all = self.events.read().await.clone();
        all.sort_unstable_by_key(|e| e.seq);
        all
    }

    /// Events emitted by `actor`, ordered by `seq`.
    pub async fn for_actor(&self, actor: impl Into<Actor>) -> Vec<Event> {
        let actor = actor.into();
        let mut out: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.actor == actor)
            .cloned()
            .collect();
        out.sort_unstable_by_key(|e| e.seq);
        out
    }

    /// Teller-side rendezvous signals for one customer, ordered by `seq`.
    ///
    /// A correct run yields exactly `[TellerCalls, TellerIntroduced, TellerAsks, TransactionCompleted]`.
    pub async fn signals_for(&self, customer: CustomerId) -> Vec<EventKind> {
        let peer = Some(Actor::Customer(customer));
        let mut out: Vec<(u64, EventKind)> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.peer == peer && e.is_teller_signal())
            .map(|e| (e.seq, e.kind))
            .collect();
        out.sort_unstable_by_key(|(seq, _)| *seq);
        out.into_iter().map(|(_, kind)| kind).collect()
    }

    /// Number of events of `kind`.
    pub async fn count(&self, kind: EventKind) -> usize {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// First event of `kind`, by `seq`.
    pub async fn first(&self, kind: EventKind) -> Option<Event> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.kind == kind)
            .min_by_key(|e| e.seq)
            .cloned()
    }

    /// Total number of events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// True if nothing was recorded.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl Subscribe for Journal {
    async fn on_event(&self, event: &Event) {
        self.events.write().await.push(event.clone());
    }

    fn name(&self) -> &'static str {
        "Journal"
    }

    fn queue_capacity(&self) -> usize {
        1 << 16
    }
}
