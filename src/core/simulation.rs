//! # Simulation: orchestrates one full bank run.
//!
//! The [`Simulation`] owns the configuration and the subscribers. [`Simulation::run`]
//! builds the [`Bank`], starts the tellers, submits every customer, and drives
//! the shutdown sequence to the end.
//!
//! ## Key responsibilities
//! - subscribe to the [`Bus`] before anything is published and **fan-out** events via [`SubscriberSet`]
//! - start `tellers` teller actors and submit `customers` customer actors
//! - wait for every customer, then inject exactly one shutdown entry per teller
//! - wait for every teller, close the bank, and return a [`Report`]
//!
//! ## High-level architecture
//! ```text
//! Simulation::run()
//!   ├─► Bus::new(bus_capacity)
//!   ├─► listener: Bus.subscribe() ─► SubscriberSet::emit(&Event)   (until BankClosed)
//!   ├─► Bank::new(cfg, bus)
//!   ├─► bank.start()                       ─► N × TellerActor
//!   ├─► bank.submit_customer(mix.pick())   ─► M × CustomerActor
//!   ├─► wait every customer handle
//!   ├─► bank.inject_shutdown()             ─► N × DispatchEntry::Shutdown
//!   ├─► wait every teller handle
//!   ├─► bank.close()                       ─► BankClosed
//!   └─► listener drains, SubscriberSet::shutdown()
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use bankvisor::{Config, Journal, Simulation};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { customers: 5, ..Config::instant() };
//!     let journal = Arc::new(Journal::new());
//!
//!     let report = Simulation::builder(cfg)
//!         .with_subscriber(journal.clone())
//!         .build()?
//!         .run()
//!         .await?;
//!
//!     assert_eq!(report.customers_served, 5);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::core::bank::Bank;
use crate::core::builder::SimulationBuilder;
use crate::core::handle::{ActorExit, ActorHandle};
use crate::error::RuntimeError;
use crate::events::{Bus, EventKind};
use crate::model::TellerId;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Per-teller line of a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TellerSummary {
    /// Teller identity.
    pub id: TellerId,
    /// Customers served by this teller.
    pub served: u64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct Report {
    /// Teller-side completion counter.
    pub customers_served: u64,
    /// Customers that reached the exit.
    pub customers_exited: usize,
    /// One entry per teller, ordered by id.
    pub tellers: Vec<TellerSummary>,
    /// Most customers inside the door at once.
    pub peak_door: usize,
    /// Most tellers inside the safe at once.
    pub peak_safe: usize,
    /// Most tellers with the manager at once (at most 1).
    pub peak_manager: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Runs a bank from opening to closing.
pub struct Simulation {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Simulation {
    /// Starts building a simulation for `cfg`.
    pub fn builder(cfg: Config) -> SimulationBuilder {
        SimulationBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { cfg, subscribers }
    }

    /// Configuration this simulation runs with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Runs until every customer has been served and every teller has exited.
    pub async fn run(self) -> Result<Report, RuntimeError> {
        let started_at = Instant::now();
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = subscriber_listener(&bus, SubscriberSet::new(self.subscribers));

        let bank = Bank::new(self.cfg.clone(), bus)?;
        let tellers = bank.start()?;
        let customers = (0..self.cfg.customers)
            .map(|_| bank.submit_customer(self.cfg.mix.pick()))
            .collect::<Result<Vec<ActorHandle>, _>>()?;

        let mut first_err = None;
        let mut customers_exited = 0;
        for handle in customers {
            match handle.wait().await {
                Ok(_) => customers_exited += 1,
                Err(e) => {
                    eprintln!("[bankvisor] customer failed: {}", e.as_message());
                    first_err.get_or_insert(e);
                }
            }
        }

        bank.inject_shutdown().await?;

        let mut summaries = Vec::with_capacity(tellers.len());
        for handle in tellers {
            match handle.wait().await {
                Ok(ActorExit::Teller { id, served }) => summaries.push(TellerSummary { id, served }),
                Ok(ActorExit::Customer { .. }) => {}
                Err(e) => {
                    eprintln!("[bankvisor] teller failed: {}", e.as_message());
                    first_err.get_or_insert(e);
                }
            }
        }

        bank.close().await?;
        join_listener(listener).await;

        if let Some(e) = first_err {
            return Err(e);
        }
        summaries.sort_unstable_by_key(|s| s.id);
        Ok(Report {
            customers_served: bank.customers_served(),
            customers_exited,
            tellers: summaries,
            peak_door: bank.door().peak(),
            peak_safe: bank.safe().peak(),
            peak_manager: bank.manager().gate().peak(),
            elapsed: started_at.elapsed(),
        })
    }
}

/// Subscribes to the bus and forwards events to the subscriber set until the bank closes.
///
/// The receiver is created before the task is spawned, so no event published
/// after this call is missed.
fn subscriber_listener(bus: &Bus, set: SubscriberSet) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    set.emit(&ev);
                    if ev.kind == EventKind::BankClosed {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    eprintln!("[bankvisor] listener lagged, skipped {n} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
        set.shutdown().await;
    })
}

/// Waits for the listener; returns `false` (and reports it) if the task failed.
async fn join_listener(listener: JoinHandle<()>) -> bool {
    match listener.await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("[bankvisor] subscriber listener failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::model::{Actor, CustomerId, TransactionKind};
    use crate::policies::TransactionMix;
    use crate::subscribers::Journal;

    const RUN_TIMEOUT: Duration = Duration::from_secs(30);

    async fn run_with_journal(cfg: Config) -> (Report, Arc<Journal>) {
        let journal = Arc::new(Journal::new());
        let sim = Simulation::builder(cfg)
            .with_subscriber(journal.clone())
            .build()
            .expect("valid config");
        let report = tokio::time::timeout(RUN_TIMEOUT, sim.run())
            .await
            .expect("simulation deadlocked")
            .expect("simulation failed");
        (report, journal)
    }

    fn seq_of(events: &[Event], kind: EventKind, peer: Actor) -> Option<u64> {
        events
            .iter()
            .find(|e| e.kind == kind && e.peer == Some(peer))
            .map(|e| e.seq)
    }

    fn seq_by(events: &[Event], kind: EventKind, actor: Actor) -> Option<u64> {
        events
            .iter()
            .find(|e| e.kind == kind && e.actor == actor)
            .map(|e| e.seq)
    }

    /// Checks each signal across both actors: the raising side's event must
    /// precede the observing side's event.
    async fn assert_handshakes_ordered(journal: &Journal, customers: usize) {
        let events = journal.events().await;
        for n in 0..customers {
            let customer = Actor::Customer(CustomerId(n));
            assert_eq!(
                journal.signals_for(CustomerId(n)).await,
                vec![
                    EventKind::TellerCalls,
                    EventKind::TellerIntroduced,
                    EventKind::TellerAsks,
                    EventKind::TransactionCompleted,
                ],
                "customer {n} handshake out of order"
            );

            let teller = |kind| seq_of(&events, kind, customer).expect("teller step missing");
            let own = |kind| seq_by(&events, kind, customer).expect("customer step missing");

            assert!(
                teller(EventKind::TellerCalls) < own(EventKind::CustomerGoesToTeller),
                "customer {n} moved before being called"
            );
            assert!(
                own(EventKind::CustomerIntroduces) < teller(EventKind::TellerIntroduced),
                "teller saw customer {n} introduce itself too early"
            );
            assert!(
                teller(EventKind::TellerAsks) < own(EventKind::CustomerHearsAsk),
                "customer {n} heard an ask that was not raised"
            );
            assert!(
                teller(EventKind::TransactionCompleted) < own(EventKind::CustomerSeesCompletion),
                "customer {n} saw completion too early"
            );
            assert!(
                own(EventKind::CustomerHearsAsk) < own(EventKind::CustomerSeesCompletion),
                "customer {n} observed signals out of order"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_full_run_serves_everyone() {
        let cfg = Config {
            customers: 50,
            ..Config::instant()
        };
        let (report, journal) = run_with_journal(cfg.clone()).await;

        assert_eq!(report.customers_served, 50);
        assert_eq!(report.customers_exited, 50);
        assert_eq!(report.tellers.len(), cfg.tellers);
        assert_eq!(report.tellers.iter().map(|t| t.served).sum::<u64>(), 50);
        assert!(report.peak_door <= cfg.door_capacity);
        assert!(report.peak_safe <= cfg.safe_capacity);
        assert!(report.peak_manager <= 1);

        assert_handshakes_ordered(&journal, 50).await;
        assert_eq!(journal.count(EventKind::CustomerLeaves).await, 50);
        assert_eq!(journal.count(EventKind::TellerClosing).await, cfg.tellers);
        assert_eq!(journal.count(EventKind::BankClosed).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_opens_once_after_every_teller_is_ready() {
        let cfg = Config {
            tellers: 4,
            customers: 20,
            ..Config::instant()
        };
        let (_, journal) = run_with_journal(cfg).await;
        let events = journal.events().await;

        assert_eq!(journal.count(EventKind::BankOpened).await, 1);
        let opened = journal
            .first(EventKind::BankOpened)
            .await
            .expect("bank never opened")
            .seq;

        let ready: Vec<u64> = events
            .iter()
            .filter(|e| e.kind == EventKind::TellerReadyFirst)
            .map(|e| e.seq)
            .collect();
        assert_eq!(ready.len(), 4);
        assert!(ready.iter().all(|&s| s < opened));

        for e in events.iter().filter(|e| {
            matches!(e.kind, EventKind::CustomerSeesOpen | EventKind::CustomerEntered)
        }) {
            assert!(e.seq > opened, "{} acted before the bank opened", e.actor);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_teller_under_maximal_contention() {
        let cfg = Config {
            tellers: 1,
            customers: 3,
            door_capacity: 1,
            safe_capacity: 1,
            ..Config::instant()
        };
        let (report, journal) = run_with_journal(cfg).await;

        assert_eq!(report.customers_served, 3);
        assert_eq!(report.customers_exited, 3);
        assert_eq!(report.peak_door, 1);
        assert_eq!(report.peak_safe, 1);
        assert_eq!(
            report.tellers,
            vec![TellerSummary {
                id: TellerId(0),
                served: 3
            }]
        );
        assert_handshakes_ordered(&journal, 3).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_customers_still_closes() {
        let cfg = Config {
            tellers: 3,
            customers: 0,
            ..Config::instant()
        };
        let (report, journal) = run_with_journal(cfg).await;

        assert_eq!(report.customers_served, 0);
        assert_eq!(report.customers_exited, 0);
        assert_eq!(report.tellers.len(), 3);
        assert!(report.tellers.iter().all(|t| t.served == 0));
        assert_eq!(report.peak_door, 0);

        assert_eq!(journal.count(EventKind::BankOpened).await, 1);
        assert_eq!(journal.count(EventKind::TellerClosing).await, 3);
        let injected = journal
            .first(EventKind::ShutdownInjected)
            .await
            .expect("no shutdown notice");
        assert_eq!(injected.count, Some(3));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_withdrawal_sees_manager_before_safe() {
        let cfg = Config {
            tellers: 1,
            customers: 1,
            mix: TransactionMix::all(TransactionKind::Withdrawal),
            ..Config::instant()
        };
        let (report, journal) = run_with_journal(cfg).await;
        assert_eq!(report.customers_served, 1);
        assert_eq!(report.peak_manager, 1);

        let events = journal.events().await;
        let customer = Actor::Customer(CustomerId(0));
        let manager = seq_of(&events, EventKind::ManagerAcquired, customer).expect("no manager");
        let released = seq_of(&events, EventKind::ManagerReleased, customer).expect("no release");
        let safe = seq_of(&events, EventKind::SafeAcquired, customer).expect("no safe");
        assert!(manager < released);
        assert!(released < safe);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_deposits_skip_the_manager() {
        let cfg = Config {
            tellers: 2,
            customers: 6,
            mix: TransactionMix::all(TransactionKind::Deposit),
            ..Config::instant()
        };
        let (report, journal) = run_with_journal(cfg).await;
        assert_eq!(report.customers_served, 6);
        assert_eq!(report.peak_manager, 0);
        assert_eq!(journal.count(EventKind::ManagerRequested).await, 0);
        assert_eq!(journal.count(EventKind::SafeAcquired).await, 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_timed_run_respects_capacities() {
        let cfg = Config {
            customers: 12,
            max_customer_delay: Duration::from_millis(20),
            ..Config::default()
        };
        let (report, journal) = run_with_journal(cfg.clone()).await;

        assert_eq!(report.customers_served, 12);
        assert!(report.peak_door <= cfg.door_capacity);
        assert!(report.peak_safe <= cfg.safe_capacity);
        assert!(report.peak_manager <= 1);
        assert_handshakes_ordered(&journal, 12).await;

        for e in journal.events().await.iter().filter(|e| e.kind == EventKind::SafeWaiting) {
            let ms = u64::from(e.delay_ms.expect("safe delay recorded"));
            assert!(ms >= cfg.safe_service.min.as_millis() as u64);
            assert!(ms <= cfg.safe_service.max.as_millis() as u64);
        }
    }

    #[tokio::test]
    async fn test_failed_listener_is_reported() {
        let ok = tokio::spawn(async {});
        assert!(join_listener(ok).await);

        let failed = tokio::spawn(async { panic!("listener down") });
        assert!(!join_listener(failed).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_handshakes_hold_under_contention() {
        for tellers in 1..=4 {
            let cfg = Config {
                tellers,
                customers: 80,
                door_capacity: 1 + tellers % 2,
                safe_capacity: 1,
                ..Config::instant()
            };
            let (report, journal) = run_with_journal(cfg).await;
            assert_eq!(report.customers_served, 80);
            assert_handshakes_ordered(&journal, 80).await;
        }
    }

    #[tokio::test]
    async fn test_builder_rejects_invalid_config() {
        let cfg = Config {
            door_capacity: 0,
            ..Config::instant()
        };
        assert!(matches!(
            Simulation::builder(cfg).build(),
            Err(RuntimeError::InvalidConfig { field: "door_capacity", .. })
        ));
    }
}
