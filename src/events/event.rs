//! # Runtime events emitted by the bank, its tellers and its customers.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Bank events**: facility lifecycle (opens, closing notice, closes)
//! - **Teller events**: one per step of the teller state machine
//! - **Customer events**: one per step of the customer state machine
//! - **Resource events**: manager/safe requested, acquired, released
//!
//! The [`Event`] struct carries the acting [`Actor`], an optional peer (the
//! other side of a rendezvous) and small payloads such as the transaction kind
//! or a delay.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Events created by one actor are numbered in program order, so
//! sorting by `seq` restores each actor's exact step sequence.
//!
//! ## Example
//! ```rust
//! use bankvisor::{Actor, CustomerId, Event, EventKind, TellerId};
//!
//! let ev = Event::new(EventKind::TellerCalls, Actor::Teller(TellerId(0)))
//!     .with_peer(CustomerId(3));
//!
//! assert_eq!(ev.line(), "Teller 0 [Customer 3]: calls customer from line");
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::model::{Actor, TransactionKind};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Bank events ===
    /// All tellers are ready; customers may enter.
    BankOpened,
    /// Every customer has left; shutdown tokens are being queued.
    ///
    /// Sets:
    /// - `count`: number of tokens injected
    ShutdownInjected,
    /// All tellers have exited.
    BankClosed,

    // === Teller events ===
    /// First readiness announcement (counts towards opening the bank).
    TellerReadyFirst,
    /// Top of each service loop iteration.
    TellerReady,
    /// Blocked on the dispatch queue.
    TellerWaiting,
    /// Claimed a ticket and raised `called`. Sets `peer`.
    TellerCalls,
    /// Waiting for `introduced`. Sets `peer`.
    TellerAwaitsIntroduction,
    /// Observed `introduced`. Sets `peer`.
    TellerIntroduced,
    /// Raised `asked`. Sets `peer`.
    TellerAsks,
    /// Transaction kind is now known. Sets `peer`, `transaction`.
    TellerAwaitsAnswer,
    /// Raised `done`. Sets `peer`, `transaction`.
    TransactionCompleted,
    /// Consumed a shutdown token and exits.
    TellerClosing,

    // === Resource events (teller side) ===
    /// Requesting the manager for a withdrawal. Sets `peer`.
    ManagerRequested,
    /// Holding the manager. Sets `peer`.
    ManagerAcquired,
    /// Service interval with the manager starts. Sets `peer`, `delay_ms`.
    ManagerWaiting,
    /// Service interval with the manager ends. Sets `peer`.
    ManagerDone,
    /// Manager released. Sets `peer`.
    ManagerReleased,
    /// Requesting the safe. Sets `peer`.
    SafeRequested,
    /// Holding the safe. Sets `peer`.
    SafeAcquired,
    /// Service interval in the safe starts. Sets `peer`, `delay_ms`.
    SafeWaiting,
    /// Service interval in the safe ends. Sets `peer`.
    SafeDone,
    /// Safe released. Sets `peer`.
    SafeReleased,

    // === Customer events ===
    /// Transaction chosen. Sets `transaction`.
    CustomerDecided,
    /// Pre-arrival delay starts. Sets `delay_ms`.
    CustomerDelaying,
    /// Pre-arrival delay ends.
    CustomerArriving,
    /// Blocked until the bank opens.
    CustomerAwaitsOpen,
    /// Observed the open bank.
    CustomerSeesOpen,
    /// Requesting the door.
    CustomerAtDoor,
    /// Holding the door.
    CustomerEntered,
    /// Ticket pushed onto the dispatch queue. Sets `teller_idle`.
    CustomerQueued,
    /// Observed `called`. Sets `peer`.
    CustomerGoesToTeller,
    /// Raised `introduced`. Sets `peer`.
    CustomerIntroduces,
    /// Observed `asked`. Sets `peer`.
    CustomerHearsAsk,
    /// States the transaction. Sets `peer`, `transaction`.
    CustomerTells,
    /// Waiting for `done`. Sets `peer`.
    CustomerAwaitsCompletion,
    /// Observed `done`. Sets `peer`.
    CustomerSeesCompletion,
    /// Door released; the customer exits. Sets `peer`.
    CustomerLeaves,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Who emitted the event.
    pub actor: Actor,
    /// The other side of the interaction, if any.
    pub peer: Option<Actor>,
    /// Transaction kind, where relevant.
    pub transaction: Option<TransactionKind>,
    /// Delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Whether a teller was idle when the customer queued.
    pub teller_idle: Option<bool>,
    /// Generic counter payload (e.g. shutdown tokens injected).
    pub count: Option<u32>,
}

impl Event {
    /// Creates a new event with current timestamp and next sequence number.
    pub fn new(kind: EventKind, actor: impl Into<Actor>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            actor: actor.into(),
            peer: None,
            transaction: None,
            delay_ms: None,
            teller_idle: None,
            count: None,
        }
    }

    /// Creates a bank-level event.
    #[inline]
    pub fn bank(kind: EventKind) -> Self {
        Self::new(kind, Actor::Bank)
    }

    /// Attaches the peer actor.
    #[inline]
    pub fn with_peer(mut self, peer: impl Into<Actor>) -> Self {
        self.peer = Some(peer.into());
        self
    }

    /// Attaches the transaction kind.
    #[inline]
    pub fn with_transaction(mut self, kind: TransactionKind) -> Self {
        self.transaction = Some(kind);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Records whether a teller was idle.
    #[inline]
    pub fn with_teller_idle(mut self, idle: bool) -> Self {
        self.teller_idle = Some(idle);
        self
    }

    /// Attaches a counter payload.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Human-readable description of the step.
    pub fn message(&self) -> String {
        let kind = self.transaction.map(|t| t.as_str()).unwrap_or("unknown");
        let delay = self.delay_ms.unwrap_or(0);
        match self.kind {
            EventKind::BankOpened => "opens".into(),
            EventKind::ShutdownInjected => format!(
                "no more customers; sends {} closing notices",
                self.count.unwrap_or(0)
            ),
            EventKind::BankClosed => "closes".into(),

            EventKind::TellerReadyFirst => "ready to serve for the first time".into(),
            EventKind::TellerReady => "ready to serve".into(),
            EventKind::TellerWaiting => "waiting for a customer".into(),
            EventKind::TellerCalls => "calls customer from line".into(),
            EventKind::TellerAwaitsIntroduction => "waits for customer introduction".into(),
            EventKind::TellerIntroduced => "received customer introduction".into(),
            EventKind::TellerAsks => "asks for transaction".into(),
            EventKind::TellerAwaitsAnswer => "waits for customer to tell transaction".into(),
            EventKind::TransactionCompleted => format!("completes {kind} transaction"),
            EventKind::TellerClosing => "no more customers; closing station".into(),

            EventKind::ManagerRequested => "going to manager for withdrawal permission".into(),
            EventKind::ManagerAcquired => "talking to manager".into(),
            EventKind::ManagerWaiting => {
                format!("waiting {delay}ms while speaking with manager")
            }
            EventKind::ManagerDone => "done speaking with manager".into(),
            EventKind::ManagerReleased => "leaves manager".into(),
            EventKind::SafeRequested => "going to safe".into(),
            EventKind::SafeAcquired => "using safe".into(),
            EventKind::SafeWaiting => {
                format!("waiting {delay}ms while processing transaction in safe")
            }
            EventKind::SafeDone => "done processing transaction in safe".into(),
            EventKind::SafeReleased => "leaves safe".into(),

            EventKind::CustomerDecided => format!("wants to perform a {kind} transaction"),
            EventKind::CustomerDelaying => format!("waits {delay}ms before going to the bank"),
            EventKind::CustomerArriving => "is done waiting before going to the bank".into(),
            EventKind::CustomerAwaitsOpen => "is waiting for the bank to open".into(),
            EventKind::CustomerSeesOpen => "sees that the bank is open".into(),
            EventKind::CustomerAtDoor => "trying to enter the bank".into(),
            EventKind::CustomerEntered => "enters the bank".into(),
            EventKind::CustomerQueued => {
                if self.teller_idle.unwrap_or(false) {
                    "finds a ready teller and goes directly to line for that teller".into()
                } else {
                    "gets in line and waits to be called".into()
                }
            }
            EventKind::CustomerGoesToTeller => "goes to teller".into(),
            EventKind::CustomerIntroduces => "introduces itself to teller".into(),
            EventKind::CustomerHearsAsk => "hears teller ask for transaction".into(),
            EventKind::CustomerTells => {
                format!("tells teller it wants to perform a {kind} transaction")
            }
            EventKind::CustomerAwaitsCompletion => {
                "waits for teller to complete transaction".into()
            }
            EventKind::CustomerSeesCompletion => "sees that the transaction is complete".into(),
            EventKind::CustomerLeaves => "leaves the bank".into(),
        }
    }

    /// Renders `ACTOR [PEER]: message`.
    pub fn line(&self) -> String {
        let peer = self.peer.map(|p| p.to_string()).unwrap_or_default();
        format!("{} [{}]: {}", self.actor, peer, self.message())
    }

    /// True if this event is one of the four rendezvous signals being raised
    /// or observed by the teller side.
    #[inline]
    pub fn is_teller_signal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TellerCalls
                | EventKind::TellerIntroduced
                | EventKind::TellerAsks
                | EventKind::TransactionCompleted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, TellerId};

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::bank(EventKind::BankOpened);
        let b = Event::bank(EventKind::BankClosed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_line_without_peer() {
        let ev = Event::new(EventKind::TellerReady, TellerId(1));
        assert_eq!(ev.line(), "Teller 1 []: ready to serve");
        assert_eq!(Event::bank(EventKind::BankOpened).line(), "Bank []: opens");
    }

    #[test]
    fn test_line_with_payloads() {
        let ev = Event::new(EventKind::TransactionCompleted, TellerId(2))
            .with_peer(CustomerId(9))
            .with_transaction(TransactionKind::Withdrawal);
        assert_eq!(
            ev.line(),
            "Teller 2 [Customer 9]: completes withdrawal transaction"
        );

        let ev = Event::new(EventKind::CustomerDelaying, CustomerId(4))
            .with_delay(Duration::from_millis(42));
        assert_eq!(ev.message(), "waits 42ms before going to the bank");
    }

    #[test]
    fn test_queued_message_depends_on_idle_teller() {
        let idle = Event::new(EventKind::CustomerQueued, CustomerId(0)).with_teller_idle(true);
        let busy = Event::new(EventKind::CustomerQueued, CustomerId(0)).with_teller_idle(false);
        assert!(idle.message().starts_with("finds a ready teller"));
        assert!(busy.message().starts_with("gets in line"));
    }

    #[test]
    fn test_delay_saturates() {
        let ev = Event::bank(EventKind::BankOpened).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
