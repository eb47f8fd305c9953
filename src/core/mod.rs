//! Runtime core: the bank, its actors and the orchestration of one run.
//!
//! The public entry point is [`Simulation`]; [`Bank`] is exposed for callers
//! that want to drive tellers and customers by hand.
//!
//! Internal modules:
//! - [`lifecycle`]: readiness counter and the `Booting → Open → Closing → Closed` phase;
//! - [`bank`]: shared state, actor spawning, shutdown injection;
//! - [`teller`]: the teller service loop;
//! - [`customer`]: one customer visit;
//! - [`handle`]: per-actor exit handles;
//! - [`simulation`]: the orchestrator and its [`Report`].

mod bank;
mod builder;
mod customer;
mod handle;
mod lifecycle;
mod simulation;
mod teller;

pub use bank::Bank;
pub use builder::SimulationBuilder;
pub use handle::{ActorExit, ActorHandle};
pub use lifecycle::{BankLifecycle, Phase};
pub use simulation::{Report, Simulation, TellerSummary};
