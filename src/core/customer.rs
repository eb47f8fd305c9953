//! # CustomerActor: one visit, one transaction.
//!
//! ## Architecture
//! ```text
//! CustomerActor::run()
//!   ├─► publish CustomerDecided
//!   ├─► sleep(arrival delay)
//!   ├─► lifecycle.wait_open()
//!   ├─► door.acquire()                 (held until the customer leaves)
//!   ├─► rendezvous() ─► push Ticket into the dispatch queue
//!   ├─► wait_call ─► introduce ─► wait_ask ─► (tell) ─► wait_done
//!   └─► publish CustomerLeaves ─► drop(door permit)
//! ```

use std::sync::Arc;

use crate::core::bank::Bank;
use crate::core::handle::ActorExit;
use crate::error::ActorError;
use crate::events::{Event, EventKind};
use crate::model::{CustomerId, TransactionKind};
use crate::sync::{DispatchEntry, rendezvous};

/// A single bank customer.
pub struct CustomerActor {
    id: CustomerId,
    transaction: TransactionKind,
    bank: Arc<Bank>,
}

impl CustomerActor {
    /// Creates a customer that will perform `transaction`.
    pub fn new(id: CustomerId, transaction: TransactionKind, bank: Arc<Bank>) -> Self {
        Self {
            id,
            transaction,
            bank,
        }
    }

    /// Runs the visit to completion.
    pub async fn run(self) -> Result<ActorExit, ActorError> {
        let bus = self.bank.bus();
        let step = |kind| Event::new(kind, self.id);

        bus.publish(step(EventKind::CustomerDecided).with_transaction(self.transaction));

        let delay = self.bank.config().arrival_delay().sample();
        bus.publish(step(EventKind::CustomerDelaying).with_delay(delay));
        tokio::time::sleep(delay).await;
        bus.publish(step(EventKind::CustomerArriving));

        bus.publish(step(EventKind::CustomerAwaitsOpen));
        self.bank.lifecycle().wait_open().await;
        bus.publish(step(EventKind::CustomerSeesOpen));

        bus.publish(step(EventKind::CustomerAtDoor));
        let door = self.bank.door().acquire().await;
        bus.publish(step(EventKind::CustomerEntered));

        let (visit, ticket) = rendezvous(self.id, self.transaction);
        let idle = self.bank.tellers_waiting() > 0;
        bus.publish(step(EventKind::CustomerQueued).with_teller_idle(idle));
        self.bank.queue().push(DispatchEntry::Customer(ticket)).await;

        let called = visit.wait_call().await?;
        let teller = called.teller();
        bus.publish(step(EventKind::CustomerGoesToTeller).with_peer(teller));

        bus.publish(step(EventKind::CustomerIntroduces).with_peer(teller));
        let introduced = called.introduce()?;

        let asked = introduced.wait_ask().await?;
        bus.publish(step(EventKind::CustomerHearsAsk).with_peer(teller));

        bus.publish(
            step(EventKind::CustomerTells)
                .with_peer(teller)
                .with_transaction(self.transaction),
        );
        bus.publish(step(EventKind::CustomerAwaitsCompletion).with_peer(teller));
        let served_by = asked.wait_done().await?;
        bus.publish(step(EventKind::CustomerSeesCompletion).with_peer(served_by));

        bus.publish(step(EventKind::CustomerLeaves).with_peer(served_by));
        drop(door);

        Ok(ActorExit::Customer {
            id: self.id,
            served_by,
            transaction: self.transaction,
        })
    }
}
