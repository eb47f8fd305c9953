//! # Bank lifecycle: Booting → Open → Closing → Closed.
//!
//! Tracks teller readiness and the facility phase.
//!
//! ## Architecture
//! ```text
//! Teller::run() ─► mark_ready() ─┐  lock(tellers_ready)
//!                                ├─ ready += 1
//!                                └─ ready == teller_count? ─► on_open() ─► phase = Open (watch::send) ─► returns true
//!
//! Customer::run() ─► wait_open() ─► watch::Receiver::wait_for(phase >= Open)
//!
//! Orchestrator ─► begin_closing() (Open → Closing) ─► close() (Closing → Closed)
//! ```
//!
//! ## Rules
//! - phases only move forward, one step at a time;
//! - `Booting → Open` happens exactly once, only when every teller is ready;
//! - the counter check and the transition happen under one lock.

use std::sync::Mutex;

use tokio::sync::watch;

use crate::error::RuntimeError;

/// Facility phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Tellers are still coming online; customers wait.
    Booting,
    /// Every teller is ready; customers may enter.
    Open,
    /// No more customers; shutdown tokens have been queued.
    Closing,
    /// Every teller has exited.
    Closed,
}

/// Readiness counter plus broadcast-once phase flag.
#[derive(Debug)]
pub struct BankLifecycle {
    teller_count: usize,
    tellers_ready: Mutex<usize>,
    phase: watch::Sender<Phase>,
}

impl BankLifecycle {
    /// Creates a lifecycle in [`Phase::Booting`] that opens after `teller_count` readiness marks.
    pub fn new(teller_count: usize) -> Self {
        let (phase, _rx) = watch::channel(Phase::Booting);
        Self {
            teller_count,
            tellers_ready: Mutex::new(0),
            phase,
        }
    }

    /// Records one teller as ready.
    ///
    /// Returns `true` to exactly one caller: the one whose mark completes the
    /// set. That call runs `on_open` (still under the readiness lock), then
    /// moves the bank to [`Phase::Open`] and wakes every `wait_open` waiter.
    ///
    /// # Panics
    ///
    /// Panics if called more than `teller_count` times.
    pub fn mark_ready(&self, on_open: impl FnOnce()) -> bool {
        let mut ready = match self.tellers_ready.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *ready += 1;
        assert!(
            *ready <= self.teller_count,
            "more tellers ready ({}) than configured ({})",
            *ready,
            self.teller_count
        );

        if *ready == self.teller_count {
            on_open();
            let opened = self.phase.send_if_modified(|p| {
                if *p == Phase::Booting {
                    *p = Phase::Open;
                    true
                } else {
                    false
                }
            });
            assert!(opened, "bank left Booting before every teller was ready");
            return true;
        }
        false
    }

    /// Waits until the bank is open (or already past open).
    pub async fn wait_open(&self) {
        let mut rx = self.phase.subscribe();
        // The sender lives in `self`, so the channel cannot close while we borrow it.
        let _ = rx.wait_for(|p| *p >= Phase::Open).await;
    }

    /// Moves `Open → Closing`.
    pub fn begin_closing(&self) -> Result<(), RuntimeError> {
        self.advance(Phase::Open, Phase::Closing)
    }

    /// Moves `Closing → Closed`.
    pub fn close(&self) -> Result<(), RuntimeError> {
        self.advance(Phase::Closing, Phase::Closed)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Number of tellers that have marked themselves ready.
    pub fn tellers_ready(&self) -> usize {
        match self.tellers_ready.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn advance(&self, from: Phase, to: Phase) -> Result<(), RuntimeError> {
        let mut actual = from;
        let moved = self.phase.send_if_modified(|p| {
            actual = *p;
            if *p == from {
                *p = to;
                true
            } else {
                false
            }
        });
        if moved {
            Ok(())
        } else {
            Err(RuntimeError::InvalidTransition { from: actual, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_opens_exactly_once_on_last_ready() {
        let lc = BankLifecycle::new(3);
        assert!(!lc.mark_ready(|| {}));
        assert_eq!(lc.phase(), Phase::Booting);
        assert!(!lc.mark_ready(|| {}));
        assert!(lc.mark_ready(|| {}));
        assert_eq!(lc.phase(), Phase::Open);
        assert_eq!(lc.tellers_ready(), 3);
    }

    #[test]
    #[should_panic(expected = "more tellers ready")]
    fn test_extra_ready_mark_panics() {
        let lc = BankLifecycle::new(1);
        assert!(lc.mark_ready(|| {}));
        lc.mark_ready(|| {});
    }

    #[test]
    fn test_concurrent_marks_elect_one_opener() {
        let lc = Arc::new(BankLifecycle::new(16));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let lc = Arc::clone(&lc);
                std::thread::spawn(move || lc.mark_ready(|| {}))
            })
            .collect();
        let openers = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|opened| *opened)
            .count();
        assert_eq!(openers, 1);
        assert_eq!(lc.phase(), Phase::Open);
    }

    #[tokio::test]
    async fn test_wait_open_blocks_until_open() {
        let lc = Arc::new(BankLifecycle::new(1));
        let waiter = {
            let lc = Arc::clone(&lc);
            tokio::spawn(async move { lc.wait_open().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished(), "customer saw an unopened bank");

        lc.mark_ready(|| {});
        tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter never woke")
            .expect("waiter panicked");
    }

    #[test]
    fn test_transitions_only_move_forward() {
        let lc = BankLifecycle::new(1);
        assert!(matches!(
            lc.begin_closing(),
            Err(RuntimeError::InvalidTransition { from: Phase::Booting, to: Phase::Closing })
        ));
        lc.mark_ready(|| {});
        assert!(lc.close().is_err());
        lc.begin_closing().expect("open -> closing");
        assert!(lc.begin_closing().is_err());
        lc.close().expect("closing -> closed");
        assert_eq!(lc.phase(), Phase::Closed);
    }
}
