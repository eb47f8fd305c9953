//! Error types used by the bank runtime and its actors.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`] errors raised by the orchestration runtime itself.
//! - [`ActorError`] errors raised by an individual teller or customer.
//!
//! Broken synchronization invariants (empty pop, over-capacity gate) are not
//! represented here: they panic, because no caller can recover from them.
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

use crate::core::Phase;
use crate::model::{Actor, CustomerId};

/// # Errors produced by the bank runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A configuration value is outside its documented range.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        /// Offending field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A lifecycle transition was requested out of order.
    #[error("invalid lifecycle transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// Phase the bank was in.
        from: Phase,
        /// Phase that was requested.
        to: Phase,
    },

    /// [`Bank::start`](crate::Bank::start) was called twice.
    #[error("bank already started")]
    AlreadyStarted,

    /// Shutdown was requested before the tellers were started.
    #[error("bank not started")]
    NotStarted,

    /// A customer was submitted after shutdown was injected.
    #[error("bank is closing; no new customers")]
    Closing,

    /// An actor task panicked or was aborted before it could report.
    #[error("actor {actor} panicked")]
    ActorPanicked {
        /// The actor whose task failed to join.
        actor: Actor,
    },

    /// An actor finished with an error.
    #[error(transparent)]
    Actor(#[from] ActorError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use bankvisor::RuntimeError;
    ///
    /// let err = RuntimeError::InvalidConfig { field: "tellers", reason: "must be >= 1".into() };
    /// assert_eq!(err.as_label(), "runtime_invalid_config");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidConfig { .. } => "runtime_invalid_config",
            RuntimeError::InvalidTransition { .. } => "runtime_invalid_transition",
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::NotStarted => "runtime_not_started",
            RuntimeError::Closing => "runtime_closing",
            RuntimeError::ActorPanicked { .. } => "runtime_actor_panicked",
            RuntimeError::Actor(e) => e.as_label(),
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::InvalidConfig { field, reason } => {
                format!("config field {field} rejected: {reason}")
            }
            RuntimeError::InvalidTransition { from, to } => {
                format!("lifecycle cannot move from {from:?} to {to:?}")
            }
            RuntimeError::AlreadyStarted => "tellers were already started".to_string(),
            RuntimeError::NotStarted => "tellers were never started".to_string(),
            RuntimeError::Closing => "customer refused: shutdown already injected".to_string(),
            RuntimeError::ActorPanicked { actor } => format!("{actor} panicked"),
            RuntimeError::Actor(e) => e.as_message(),
        }
    }
}

/// # Errors produced by a teller or customer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// The other half of a customer's rendezvous was dropped mid-handshake.
    #[error("rendezvous for customer {customer} abandoned while {step}")]
    Abandoned {
        /// Customer the rendezvous belongs to.
        customer: CustomerId,
        /// Handshake step that could not complete.
        step: &'static str,
    },
}

impl ActorError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActorError::Abandoned { .. } => "actor_rendezvous_abandoned",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActorError::Abandoned { customer, step } => {
                format!("customer {customer}: counterpart gone while {step}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_error_lifts_into_runtime_error() {
        let err: RuntimeError = ActorError::Abandoned {
            customer: CustomerId(4),
            step: "waiting for call",
        }
        .into();
        assert_eq!(err.as_label(), "actor_rendezvous_abandoned");
        assert_eq!(
            err.to_string(),
            "rendezvous for customer 4 abandoned while waiting for call"
        );
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = RuntimeError::InvalidTransition {
            from: Phase::Booting,
            to: Phase::Closed,
        };
        assert_eq!(err.as_message(), "lifecycle cannot move from Booting to Closed");
    }
}
