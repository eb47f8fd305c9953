//! Synchronization primitives the bank is built from.
//!
//! ## Contents
//! - [`ResourceGate`] / [`ExclusiveResource`] capacity-bounded gates with RAII [`GatePermit`]s
//! - [`DispatchQueue`] FIFO hand-off with blocking pop, carrying [`DispatchEntry`] values
//! - [`rendezvous`] the typestate four-signal handshake ([`Ticket`] / [`Visit`])
//!
//! None of these know about tellers or customers as actors; the wiring lives in
//! the bank core.

mod gate;
mod queue;
mod rendezvous;

pub use gate::{ExclusiveResource, GatePermit, ResourceGate};
pub use queue::{DispatchEntry, DispatchQueue};
pub use rendezvous::{
    AskedTicket, AskedVisit, CalledTicket, CalledVisit, IntroducedTicket, IntroducedVisit, Ticket,
    Visit, rendezvous,
};
