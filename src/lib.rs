//! # bankvisor
//!
//! **Bankvisor** is a concurrent bank simulation built on tokio.
//!
//! Tellers and customers run as independent tasks. They coordinate only through
//! a handful of synchronization primitives: capacity-bounded gates for the door,
//! the safe and the manager, a FIFO dispatch queue, and a four-step rendezvous
//! per customer. Every step is published as an [`Event`], so a run can be
//! printed, recorded and checked after the fact.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Customer 0  │   │  Customer 1  │   │  Customer M  │
//!     │ (one visit)  │   │ (one visit)  │   │ (one visit)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ wait_open ─► door ─► push Ticket    │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bank (shared state, Arc)                                         │
//! │  - BankLifecycle (readiness counter, Booting/Open/Closing/Closed) │
//! │  - ResourceGate door / safe, ExclusiveResource manager            │
//! │  - DispatchQueue<DispatchEntry> (Customer(Ticket) | Shutdown)     │
//! │  - counters: tellers waiting, customers served                    │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │   Teller 0   │   │   Teller 1   │   │   Teller N   │   │
//!     │ (serve loop) │   │ (serve loop) │   │ (serve loop) │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ Publishes        │ Publishes        │ Publishes       │
//!      │ - TellerCalls    │ - ManagerAcq.    │ - SafeAcquired  │
//!      │ - ...            │ - ...            │ - ...           │
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │    (in Simulation)     │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                                  ┌─────────┼─────────┐
//!                                  ▼         ▼         ▼
//!                             LogWriter   Journal    custom
//! ```
//!
//! ### One customer, one teller
//! ```text
//! Customer                              Teller
//!   wait_open()                           mark_ready()   (last one opens the bank)
//!   door.acquire()                        next_entry()   (blocks on the queue)
//!   push(Customer(ticket)) ────────────►  pop
//!   wait_call()            ◄── called ──  call(id)
//!   introduce()            ── introduced► introduction()
//!   wait_ask()             ◄── asked ───  ask()
//!                                         [withdrawal] manager.acquire() … release
//!                                         safe.acquire() … release
//!   wait_done()            ◄── done ────  complete()
//!   drop(door permit)
//! ```
//!
//! ### Shutdown
//! ```text
//! all customers exited ─► inject_shutdown(): Open → Closing, push N × Shutdown
//!                      ─► each teller pops exactly one Shutdown and exits
//!                      ─► close(): Closing → Closed, publish BankClosed
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Orchestration** | Run a whole bank from opening to closing.                     | [`Simulation`], [`Report`]                  |
//! | **Manual drive**  | Start tellers, submit customers, inject shutdown yourself.    | [`Bank`], [`ActorHandle`]                   |
//! | **Primitives**    | Gates, dispatch queue, typestate rendezvous.                  | [`sync`]                                    |
//! | **Subscriber API**| Hook into every step (logging, recording, custom).            | [`Subscribe`], [`Journal`]                  |
//! | **Errors**        | Typed errors for the runtime and the actors.                  | [`RuntimeError`], [`ActorError`]            |
//! | **Configuration** | Counts, capacities and delay bounds.                          | [`Config`], [`DelayRange`], [`TransactionMix`] |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] that prints one line per event.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use bankvisor::{Config, Simulation, Subscribe};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { customers: 10, ..Config::instant() };
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(bankvisor::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let report = Simulation::builder(cfg)
//!         .with_subscribers(subs)
//!         .build()?
//!         .run()
//!         .await?;
//!
//!     assert_eq!(report.customers_served, 10);
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod model;
mod policies;
mod subscribers;
pub mod sync;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{
    ActorExit, ActorHandle, Bank, BankLifecycle, Phase, Report, Simulation, SimulationBuilder,
    TellerSummary,
};
pub use error::{ActorError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use model::{Actor, CustomerId, TellerId, TransactionKind};
pub use policies::{DelayRange, TransactionMix};
pub use subscribers::{Journal, Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
