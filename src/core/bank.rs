//! # Bank: shared state for every teller and customer.
//!
//! One [`Bank`] is created per run and handed to each actor behind an [`Arc`].
//! It owns the gates, the dispatch queue, the lifecycle and the counters; actors
//! never touch global state.
//!
//! ## Architecture
//! ```text
//! Bank::start() ──► spawn N × TellerActor::run()      (TaskTracker)
//! Bank::submit_customer(kind) ──► spawn CustomerActor::run()
//!
//!                 ┌──────────── Arc<Bank> ─────────────┐
//!                 │ lifecycle   Booting/Open/Closing/… │
//!                 │ door        ResourceGate(door_cap) │
//!                 │ safe        ResourceGate(safe_cap) │
//!                 │ manager     ExclusiveResource      │
//!                 │ queue       DispatchQueue          │
//!                 │ counters    waiting / served       │
//!                 └────────────────────────────────────┘
//!
//! Bank::inject_shutdown() ──► Open → Closing ──► push N × DispatchEntry::Shutdown
//! Bank::close()           ──► wait for every actor ──► Closing → Closed ──► BankClosed
//! ```
//!
//! ## Rules
//! - `start` runs once; a second call fails with [`RuntimeError::AlreadyStarted`];
//! - exactly `tellers` shutdown entries are queued, one per teller;
//! - `close` only succeeds after `inject_shutdown`;
//! - no customer is accepted once shutdown has been injected.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use tokio_util::task::TaskTracker;

use crate::config::Config;
use crate::core::customer::CustomerActor;
use crate::core::handle::ActorHandle;
use crate::core::lifecycle::{BankLifecycle, Phase};
use crate::core::teller::TellerActor;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::model::{Actor, CustomerId, TellerId, TransactionKind};
use crate::sync::{DispatchEntry, DispatchQueue, ExclusiveResource, ResourceGate};

/// Shared facility state.
pub struct Bank {
    cfg: Config,
    bus: Bus,
    lifecycle: BankLifecycle,
    door: ResourceGate,
    safe: ResourceGate,
    manager: ExclusiveResource,
    queue: DispatchQueue<DispatchEntry>,
    tellers_waiting: AtomicUsize,
    customers_served: AtomicU64,
    next_customer: AtomicUsize,
    started: AtomicBool,
    tracker: TaskTracker,
}

impl Bank {
    /// Validates `cfg` and builds the shared state. Nothing is spawned yet.
    pub fn new(cfg: Config, bus: Bus) -> Result<Arc<Self>, RuntimeError> {
        cfg.validate()?;
        Ok(Arc::new(Self {
            lifecycle: BankLifecycle::new(cfg.tellers),
            door: ResourceGate::new("door", cfg.door_capacity),
            safe: ResourceGate::new("safe", cfg.safe_capacity),
            manager: ExclusiveResource::new("manager"),
            queue: DispatchQueue::new(),
            tellers_waiting: AtomicUsize::new(0),
            customers_served: AtomicU64::new(0),
            next_customer: AtomicUsize::new(0),
            started: AtomicBool::new(false),
            tracker: TaskTracker::new(),
            cfg,
            bus,
        }))
    }

    /// Spawns one teller per configured slot and returns their exit handles.
    ///
    /// The bank opens once every teller has announced itself.
    pub fn start(self: &Arc<Self>) -> Result<Vec<ActorHandle>, RuntimeError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(RuntimeError::AlreadyStarted);
        }
        let handles = (0..self.cfg.tellers)
            .map(|n| {
                let id = TellerId(n);
                let actor = TellerActor::new(id, Arc::clone(self));
                ActorHandle::new(Actor::Teller(id), self.tracker.spawn(actor.run()))
            })
            .collect();
        Ok(handles)
    }

    /// Spawns a customer that will perform one `kind` transaction.
    ///
    /// Customers may be submitted before [`start`](Self::start); they wait for
    /// the bank to open like everyone else. Ids are assigned in submission order.
    ///
    /// Once [`inject_shutdown`](Self::inject_shutdown) has run no teller is left
    /// to serve, so the customer is refused with [`RuntimeError::Closing`].
    /// Submitting concurrently with `inject_shutdown` is not supported.
    pub fn submit_customer(
        self: &Arc<Self>,
        kind: TransactionKind,
    ) -> Result<ActorHandle, RuntimeError> {
        if self.lifecycle.phase() >= Phase::Closing {
            return Err(RuntimeError::Closing);
        }
        let id = CustomerId(self.next_customer.fetch_add(1, Ordering::Relaxed));
        let actor = CustomerActor::new(id, kind, Arc::clone(self));
        Ok(ActorHandle::new(Actor::Customer(id), self.tracker.spawn(actor.run())))
    }

    /// Moves the bank to [`Phase::Closing`] and queues one shutdown entry per teller.
    ///
    /// Call this after every customer has left. Waits for the bank to open
    /// first, so it is safe to call right after [`start`](Self::start).
    pub async fn inject_shutdown(&self) -> Result<(), RuntimeError> {
        if !self.started.load(Ordering::Acquire) {
            return Err(RuntimeError::NotStarted);
        }
        self.lifecycle.wait_open().await;
        self.lifecycle.begin_closing()?;

        let n = self.cfg.tellers;
        self.bus
            .publish(Event::bank(EventKind::ShutdownInjected).with_count(n));
        for _ in 0..n {
            self.queue.push(DispatchEntry::Shutdown).await;
        }
        Ok(())
    }

    /// Waits for every spawned actor, then moves the bank to [`Phase::Closed`].
    pub async fn close(&self) -> Result<(), RuntimeError> {
        let phase = self.lifecycle.phase();
        if phase != Phase::Closing {
            return Err(RuntimeError::InvalidTransition {
                from: phase,
                to: Phase::Closed,
            });
        }
        self.tracker.close();
        self.tracker.wait().await;
        self.lifecycle.close()?;
        self.bus.publish(Event::bank(EventKind::BankClosed));
        Ok(())
    }

    /// Pops the next dispatch entry, counting the caller as waiting meanwhile.
    pub(crate) async fn next_entry(&self) -> DispatchEntry {
        self.tellers_waiting.fetch_add(1, Ordering::AcqRel);
        let entry = self.queue.pop().await;
        self.tellers_waiting.fetch_sub(1, Ordering::AcqRel);
        entry
    }

    pub(crate) fn record_served(&self) {
        self.customers_served.fetch_add(1, Ordering::AcqRel);
    }

    /// Run configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Event bus shared with every actor.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Readiness counter and phase.
    pub fn lifecycle(&self) -> &BankLifecycle {
        &self.lifecycle
    }

    /// Entrance gate.
    pub fn door(&self) -> &ResourceGate {
        &self.door
    }

    /// Vault gate.
    pub fn safe(&self) -> &ResourceGate {
        &self.safe
    }

    /// Withdrawal approver.
    pub fn manager(&self) -> &ExclusiveResource {
        &self.manager
    }

    /// Customer/teller hand-off queue.
    pub fn queue(&self) -> &DispatchQueue<DispatchEntry> {
        &self.queue
    }

    /// Transactions completed by all tellers so far.
    pub fn customers_served(&self) -> u64 {
        self.customers_served.load(Ordering::Acquire)
    }

    /// Tellers currently blocked on the dispatch queue.
    pub fn tellers_waiting(&self) -> usize {
        self.tellers_waiting.load(Ordering::Acquire)
    }
}
