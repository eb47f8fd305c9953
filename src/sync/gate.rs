//! # Capacity-bounded gates over a tokio semaphore.
//!
//! [`ResourceGate`] admits at most `capacity` concurrent holders. A holder is
//! represented by a [`GatePermit`]; dropping the permit releases it, so every
//! exit path of an actor gives the permit back exactly once.
//!
//! [`ExclusiveResource`] is the capacity-1 specialization (the manager).
//!
//! ## Architecture
//! ```text
//! acquire() ──► Semaphore::acquire_owned() ──► held += 1 ──► GatePermit
//!                   (blocks while 0 permits)     (peak tracked)
//!
//! drop(GatePermit) ──► held -= 1 ──► OwnedSemaphorePermit dropped ──► one waiter wakes
//! ```
//!
//! ## Rules
//! - `held()` never exceeds `capacity()`; a violation panics
//! - no fairness among waiters is promised
//! - the semaphore is never closed; a closed semaphore panics

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Capacity-N mutual-exclusion gate with occupancy instrumentation.
#[derive(Debug)]
pub struct ResourceGate {
    name: &'static str,
    capacity: usize,
    semaphore: Arc<Semaphore>,
    occupancy: Arc<Occupancy>,
}

#[derive(Debug, Default)]
struct Occupancy {
    held: AtomicUsize,
    peak: AtomicUsize,
}

impl ResourceGate {
    /// Creates a gate that admits up to `capacity` holders.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        assert!(capacity > 0, "gate '{name}' needs a positive capacity");
        Self {
            name,
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            occupancy: Arc::new(Occupancy::default()),
        }
    }

    /// Waits until a permit is available and takes it.
    pub async fn acquire(&self) -> GatePermit {
        let permit = match self.semaphore.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_closed) => panic!("gate '{}' semaphore closed while in use", self.name),
        };

        let held = self.occupancy.held.fetch_add(1, Ordering::AcqRel) + 1;
        assert!(
            held <= self.capacity,
            "gate '{}' over capacity: {held} holders, capacity {}",
            self.name,
            self.capacity
        );
        self.occupancy.peak.fetch_max(held, Ordering::AcqRel);

        GatePermit {
            gate: self.name,
            occupancy: Arc::clone(&self.occupancy),
            _permit: permit,
        }
    }

    /// Gate name (`"door"`, `"safe"`, `"manager"`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of holders.
    pub fn held(&self) -> usize {
        self.occupancy.held.load(Ordering::Acquire)
    }

    /// Highest number of simultaneous holders observed so far.
    pub fn peak(&self) -> usize {
        self.occupancy.peak.load(Ordering::Acquire)
    }
}

/// One held slot of a [`ResourceGate`]; released on drop.
#[must_use = "dropping the permit releases the gate immediately"]
#[derive(Debug)]
pub struct GatePermit {
    gate: &'static str,
    occupancy: Arc<Occupancy>,
    // Dropped after `Drop::drop` runs, so `held` is decremented before the
    // next waiter can be admitted.
    _permit: OwnedSemaphorePermit,
}

impl GatePermit {
    /// Name of the gate this permit belongs to.
    pub fn gate(&self) -> &'static str {
        self.gate
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        let prev = self.occupancy.held.fetch_sub(1, Ordering::AcqRel);
        assert!(prev > 0, "gate '{}' released more often than acquired", self.gate);
    }
}

/// Capacity-1 gate: at most one holder at a time.
#[derive(Debug)]
pub struct ExclusiveResource {
    inner: ResourceGate,
}

impl ExclusiveResource {
    /// Creates an exclusive resource.
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: ResourceGate::new(name, 1),
        }
    }

    /// Waits until the resource is free and takes it.
    pub async fn acquire(&self) -> GatePermit {
        self.inner.acquire().await
    }

    /// Underlying gate (for instrumentation).
    pub fn gate(&self) -> &ResourceGate {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_and_release_tracks_occupancy() {
        let gate = ResourceGate::new("safe", 2);
        let a = gate.acquire().await;
        let b = gate.acquire().await;
        assert_eq!(gate.held(), 2);
        assert_eq!(a.gate(), "safe");

        drop(a);
        assert_eq!(gate.held(), 1);
        drop(b);
        assert_eq!(gate.held(), 0);
        assert_eq!(gate.peak(), 2);
    }

    #[tokio::test]
    async fn test_acquire_blocks_at_capacity() {
        let gate = Arc::new(ResourceGate::new("door", 1));
        let first = gate.acquire().await;

        let g = Arc::clone(&gate);
        let waiter = tokio::spawn(async move {
            let _p = g.acquire().await;
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!waiter.is_finished(), "second holder admitted past capacity");

        drop(first);
        tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("waiter never admitted")
            .expect("waiter panicked");
        assert_eq!(gate.peak(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peak_never_exceeds_capacity_under_contention() {
        let gate = Arc::new(ResourceGate::new("safe", 3));
        let mut joins = Vec::new();
        for _ in 0..32 {
            let g = Arc::clone(&gate);
            joins.push(tokio::spawn(async move {
                let _p = g.acquire().await;
                tokio::time::sleep(Duration::from_millis(2)).await;
            }));
        }
        for j in joins {
            j.await.expect("holder panicked");
        }
        assert!(gate.peak() <= 3);
        assert!(gate.peak() >= 1);
        assert_eq!(gate.held(), 0);
    }

    #[tokio::test]
    async fn test_exclusive_resource_has_capacity_one() {
        let manager = ExclusiveResource::new("manager");
        assert_eq!(manager.gate().capacity(), 1);
        let p = manager.acquire().await;
        assert_eq!(manager.gate().held(), 1);
        drop(p);
        assert_eq!(manager.gate().peak(), 1);
    }

    #[test]
    #[should_panic(expected = "positive capacity")]
    fn test_zero_capacity_panics() {
        let _ = ResourceGate::new("broken", 0);
    }
}
