//! Randomness policies.
//!
//! This module groups the knobs that decide **what** a customer wants and
//! **how long** each timed step lasts.
//!
//! ## Contents
//! - [`DelayRange`] bounded uniform delays (arrival, manager, safe)
//! - [`TransactionMix`] deposit/withdrawal split
//!
//! ## Defaults
//! - arrival `[0, 100ms]`, manager `[10ms, 30ms]`, safe `[10ms, 50ms]` (see [`Config`](crate::Config))
//! - `TransactionMix::default()` → 50/50

mod delay;
mod mix;

pub use delay::DelayRange;
pub use mix::TransactionMix;
