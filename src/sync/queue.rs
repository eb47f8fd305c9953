//! # FIFO dispatch queue between customers and tellers.
//!
//! [`DispatchQueue`] pairs a mutex-protected `VecDeque` with a counting
//! semaphore that tracks how many entries are available.
//!
//! ## Architecture
//! ```text
//! Producers (customers):                          Consumers (tellers):
//!   push(e) ─► lock ─► push_back ─► unlock ─► add_permits(1)
//!                                                 pop() ─► acquire permit (blocks) ─► forget
//!                                                       ─► lock ─► pop_front ─► unlock
//! ```
//!
//! ## Rules
//! - one permit is added **after** each entry is physically queued, and one
//!   permit is consumed **before** each removal, so a consumer never observes an empty queue;
//! - observing an empty queue after taking a permit is a broken invariant and panics;
//! - unbounded: at most (live customers + shutdown tokens) entries at once.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Semaphore};

use super::rendezvous::Ticket;

/// Entry handed from the customer population to the teller population.
#[derive(Debug)]
pub enum DispatchEntry {
    /// A customer waiting to be called; carries the teller half of its rendezvous.
    Customer(Ticket),
    /// Instructs exactly one teller to stop serving.
    Shutdown,
}

impl DispatchEntry {
    /// True for the shutdown entry.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        matches!(self, DispatchEntry::Shutdown)
    }
}

/// Unbounded multi-producer / multi-consumer FIFO with blocking pop.
#[derive(Debug)]
pub struct DispatchQueue<T> {
    entries: Mutex<VecDeque<T>>,
    available: Semaphore,
}

impl<T> DispatchQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            available: Semaphore::new(0),
        }
    }

    /// Appends `entry` to the tail and signals one unit of availability.
    pub async fn push(&self, entry: T) {
        {
            let mut entries = self.entries.lock().await;
            entries.push_back(entry);
        }
        self.available.add_permits(1);
    }

    /// Waits until an entry is available and removes the head.
    pub async fn pop(&self) -> T {
        match self.available.acquire().await {
            Ok(permit) => permit.forget(),
            Err(_closed) => panic!("dispatch queue availability semaphore closed"),
        }

        let mut entries = self.entries.lock().await;
        match entries.pop_front() {
            Some(entry) => entry,
            None => panic!("dispatch queue popped while empty"),
        }
    }

    /// Number of entries currently queued.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True if nothing is queued.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl<T> Default for DispatchQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fifo_order() {
        let q = DispatchQueue::new();
        for i in 0..5 {
            q.push(i).await;
        }
        assert_eq!(q.len().await, 5);
        for i in 0..5 {
            assert_eq!(q.pop().await, i);
        }
        assert!(q.is_empty().await);
    }

    #[tokio::test]
    async fn test_pop_blocks_until_push() {
        let q = Arc::new(DispatchQueue::<u32>::new());
        let consumer = {
            let q = Arc::clone(&q);
            tokio::spawn(async move { q.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!consumer.is_finished(), "pop returned without an entry");

        q.push(42).await;
        let got = tokio::time::timeout(Duration::from_secs(2), consumer)
            .await
            .expect("consumer never woke")
            .expect("consumer panicked");
        assert_eq!(got, 42);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_producers_and_consumers_lose_nothing() {
        let q = Arc::new(DispatchQueue::<usize>::new());
        let mut producers = Vec::new();
        for p in 0..8 {
            let q = Arc::clone(&q);
            producers.push(tokio::spawn(async move {
                for i in 0..25 {
                    q.push(p * 100 + i).await;
                }
            }));
        }

        let mut consumers = Vec::new();
        for _ in 0..4 {
            let q = Arc::clone(&q);
            consumers.push(tokio::spawn(async move {
                let mut got = Vec::new();
                for _ in 0..50 {
                    got.push(q.pop().await);
                }
                got
            }));
        }

        for p in producers {
            p.await.expect("producer panicked");
        }
        let mut all = Vec::new();
        for c in consumers {
            all.extend(c.await.expect("consumer panicked"));
        }
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 200, "entries lost or duplicated");
        assert!(q.is_empty().await);
    }

    #[tokio::test]
    async fn test_shutdown_entry_is_tagged() {
        let q = DispatchQueue::new();
        q.push(DispatchEntry::Shutdown).await;
        assert!(q.pop().await.is_shutdown());
    }
}
