//! # TellerActor: serves customers from the dispatch queue.
//!
//! ## Architecture
//! ```text
//! TellerActor::run()
//!   ├─► publish TellerReadyFirst
//!   ├─► lifecycle.mark_ready()          (last teller publishes BankOpened)
//!   └─► loop {
//!         ├─► publish TellerReady, TellerWaiting
//!         ├─► bank.next_entry()          (blocks; counted as waiting)
//!         ├─► Shutdown     → publish TellerClosing → exit
//!         └─► Customer(t)  → serve(t)
//!                             ├─► call → introduction → ask
//!                             ├─► withdrawal? manager phase
//!                             ├─► safe phase
//!                             └─► complete, served += 1
//!       }
//! ```
//!
//! ## Rules
//! - the manager phase always ends before the safe phase begins;
//! - permits are RAII guards, so no path leaves a gate held;
//! - each teller consumes exactly one shutdown entry, then stops.

use std::sync::Arc;

use crate::core::bank::Bank;
use crate::core::handle::ActorExit;
use crate::error::ActorError;
use crate::events::{Event, EventKind};
use crate::model::TellerId;
use crate::sync::{AskedTicket, DispatchEntry, Ticket};

/// One teller station.
pub struct TellerActor {
    id: TellerId,
    bank: Arc<Bank>,
}

impl TellerActor {
    /// Creates a teller bound to `bank`.
    pub fn new(id: TellerId, bank: Arc<Bank>) -> Self {
        Self { id, bank }
    }

    /// Runs until the teller consumes a shutdown entry.
    pub async fn run(self) -> Result<ActorExit, ActorError> {
        self.publish(EventKind::TellerReadyFirst);
        self.bank.lifecycle().mark_ready(|| {
            self.bank.bus().publish(Event::bank(EventKind::BankOpened));
        });

        let mut served = 0u64;
        loop {
            self.publish(EventKind::TellerReady);
            self.publish(EventKind::TellerWaiting);
            match self.bank.next_entry().await {
                DispatchEntry::Shutdown => {
                    self.publish(EventKind::TellerClosing);
                    return Ok(ActorExit::Teller {
                        id: self.id,
                        served,
                    });
                }
                DispatchEntry::Customer(ticket) => {
                    self.serve(ticket).await?;
                    served += 1;
                }
            }
        }
    }

    async fn serve(&self, ticket: Ticket) -> Result<(), ActorError> {
        let customer = ticket.customer();
        let step = |kind| Event::new(kind, self.id).with_peer(customer);

        self.bank.bus().publish(step(EventKind::TellerCalls));
        let called = ticket.call(self.id)?;

        self.bank.bus().publish(step(EventKind::TellerAwaitsIntroduction));
        let introduced = called.introduction().await?;
        self.bank.bus().publish(step(EventKind::TellerIntroduced));

        self.bank.bus().publish(step(EventKind::TellerAsks));
        let asked = introduced.ask()?;
        let kind = asked.transaction();
        self.bank
            .bus()
            .publish(step(EventKind::TellerAwaitsAnswer).with_transaction(kind));

        if kind.needs_manager() {
            self.manager_phase(&asked).await;
        }
        self.safe_phase(&asked).await;

        self.bank
            .bus()
            .publish(step(EventKind::TransactionCompleted).with_transaction(kind));
        asked.complete()?;
        self.bank.record_served();
        Ok(())
    }

    async fn manager_phase(&self, asked: &AskedTicket) {
        let step = |kind| {
            Event::new(kind, self.id)
                .with_peer(asked.customer())
                .with_transaction(asked.transaction())
        };

        self.bank.bus().publish(step(EventKind::ManagerRequested));
        let permit = self.bank.manager().acquire().await;
        self.bank.bus().publish(step(EventKind::ManagerAcquired));

        let delay = self.bank.config().manager_service.sample();
        self.bank
            .bus()
            .publish(step(EventKind::ManagerWaiting).with_delay(delay));
        tokio::time::sleep(delay).await;
        self.bank.bus().publish(step(EventKind::ManagerDone));

        self.bank.bus().publish(step(EventKind::ManagerReleased));
        drop(permit);
    }

    async fn safe_phase(&self, asked: &AskedTicket) {
        let step = |kind| {
            Event::new(kind, self.id)
                .with_peer(asked.customer())
                .with_transaction(asked.transaction())
        };

        self.bank.bus().publish(step(EventKind::SafeRequested));
        let permit = self.bank.safe().acquire().await;
        self.bank.bus().publish(step(EventKind::SafeAcquired));

        let delay = self.bank.config().safe_service.sample();
        self.bank
            .bus()
            .publish(step(EventKind::SafeWaiting).with_delay(delay));
        tokio::time::sleep(delay).await;
        self.bank.bus().publish(step(EventKind::SafeDone));

        self.bank.bus().publish(step(EventKind::SafeReleased));
        drop(permit);
    }

    fn publish(&self, kind: EventKind) {
        self.bank.bus().publish(Event::new(kind, self.id));
    }
}
