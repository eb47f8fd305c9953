//! # Simulation configuration.
//!
//! Provides [`Config`], the centralized settings for one bank run. Everything
//! is fixed at start; nothing is reconfigured while actors are running.
//!
//! ## Fixed values
//! - the manager is always exclusive (capacity 1), so it has no field here.
//!
//! ## Validation
//! [`Config::validate`] is called by the [`Simulation`](crate::Simulation)
//! builder and by [`Bank::new`](crate::Bank::new); it rejects zero tellers,
//! zero-capacity gates, inverted delay ranges and a withdrawal ratio outside `[0, 1]`.

use std::time::Duration;

use crate::error::RuntimeError;
use crate::policies::{DelayRange, TransactionMix};

/// Global configuration for one bank run.
///
/// ## Field semantics
/// - `tellers`: number of teller actors (`>= 1`)
/// - `customers`: number of customers the orchestrator submits (`>= 0`)
/// - `door_capacity`: customers inside the door at once (`>= 1`)
/// - `safe_capacity`: tellers inside the safe at once (`>= 1`)
/// - `max_customer_delay`: upper bound of the pre-arrival delay
/// - `manager_service` / `safe_service`: bounds of the two service intervals
/// - `mix`: deposit/withdrawal split used by the orchestrator
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of teller actors.
    pub tellers: usize,

    /// Number of customers submitted by [`Simulation::run`](crate::Simulation::run).
    pub customers: usize,

    /// How many customers may be inside the door simultaneously.
    pub door_capacity: usize,

    /// How many tellers may use the safe simultaneously.
    pub safe_capacity: usize,

    /// Upper bound of the random delay before a customer heads to the bank.
    pub max_customer_delay: Duration,

    /// Time a teller spends talking to the manager.
    pub manager_service: DelayRange,

    /// Time a teller spends processing inside the safe.
    pub safe_service: DelayRange,

    /// Deposit/withdrawal split.
    pub mix: TransactionMix,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow listeners that lag behind more than `bus_capacity` events skip
    /// the oldest ones. A full 50-customer run emits roughly 1200 events.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the arrival delay window `[0, max_customer_delay]`.
    #[inline]
    pub fn arrival_delay(&self) -> DelayRange {
        DelayRange::up_to(self.max_customer_delay)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Configuration with every timed step set to zero.
    ///
    /// Counts and capacities keep their defaults.
    pub fn instant() -> Self {
        Self {
            max_customer_delay: Duration::ZERO,
            manager_service: DelayRange::zero(),
            safe_service: DelayRange::zero(),
            ..Self::default()
        }
    }

    /// Checks every field against its documented range.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.tellers == 0 {
            return Err(invalid("tellers", "must be at least 1"));
        }
        if self.door_capacity == 0 {
            return Err(invalid("door_capacity", "must be at least 1"));
        }
        if self.safe_capacity == 0 {
            return Err(invalid("safe_capacity", "must be at least 1"));
        }
        if !self.manager_service.is_ordered() {
            return Err(invalid(
                "manager_service",
                format!("min {:?} exceeds max {:?}", self.manager_service.min, self.manager_service.max),
            ));
        }
        if !self.safe_service.is_ordered() {
            return Err(invalid(
                "safe_service",
                format!("min {:?} exceeds max {:?}", self.safe_service.min, self.safe_service.max),
            ));
        }
        if !self.mix.is_valid() {
            return Err(invalid(
                "mix",
                format!("withdrawal ratio {} is not in [0, 1]", self.mix.withdrawal_ratio),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> RuntimeError {
    RuntimeError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tellers = 3`, `customers = 50`
    /// - `door_capacity = 2`, `safe_capacity = 2`
    /// - `max_customer_delay = 100ms`
    /// - `manager_service = 10..=30ms`, `safe_service = 10..=50ms`
    /// - `mix = 50/50`
    /// - `bus_capacity = 4096`
    fn default() -> Self {
        Self {
            tellers: 3,
            customers: 50,
            door_capacity: 2,
            safe_capacity: 2,
            max_customer_delay: Duration::from_millis(100),
            manager_service: DelayRange::new(Duration::from_millis(10), Duration::from_millis(30)),
            safe_service: DelayRange::new(Duration::from_millis(10), Duration::from_millis(50)),
            mix: TransactionMix::default(),
            bus_capacity: 4096,
        }
    }
}
