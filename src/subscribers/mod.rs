//! # Event subscribers for the bank runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations for handling events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Teller/Customer ── publish(Event) ──► Bus ──► Simulation listener ──► SubscriberSet
//!                                                                             │
//!                                                              ┌──────────────┼──────────┐
//!                                                              ▼              ▼          ▼
//!                                                          LogWriter       Journal     Custom
//! ```
//!
//! ## Built-ins
//! - [`LogWriter`] prints one line per event (feature `logging`)
//! - [`Journal`] records events for ordered queries (tests, reports)

mod journal;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

pub use journal::Journal;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
