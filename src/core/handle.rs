//! Exit handles for spawned tellers and customers.

use tokio::task::JoinHandle;

use crate::error::{ActorError, RuntimeError};
use crate::model::{Actor, CustomerId, TellerId, TransactionKind};

/// How an actor finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorExit {
    /// A teller consumed its shutdown entry.
    Teller {
        /// Teller identity.
        id: TellerId,
        /// Customers this teller served.
        served: u64,
    },
    /// A customer left the bank.
    Customer {
        /// Customer identity.
        id: CustomerId,
        /// Teller that handled the transaction.
        served_by: TellerId,
        /// What was done.
        transaction: TransactionKind,
    },
}

/// Blocking "wait for exit" handle for one actor.
pub struct ActorHandle {
    actor: Actor,
    join: JoinHandle<Result<ActorExit, ActorError>>,
}

impl ActorHandle {
    pub(crate) fn new(actor: Actor, join: JoinHandle<Result<ActorExit, ActorError>>) -> Self {
        Self { actor, join }
    }

    /// The actor behind this handle.
    pub fn actor(&self) -> Actor {
        self.actor
    }

    /// True once the actor task has finished (without consuming the handle).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the actor to exit.
    ///
    /// A panicking actor surfaces as [`RuntimeError::ActorPanicked`].
    pub async fn wait(self) -> Result<ActorExit, RuntimeError> {
        match self.join.await {
            Ok(res) => Ok(res?),
            Err(_) => Err(RuntimeError::ActorPanicked { actor: self.actor }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicking_actor_is_reported() {
        let actor = Actor::Teller(TellerId(7));
        let join: JoinHandle<Result<ActorExit, ActorError>> =
            tokio::spawn(async { panic!("boom") });
        let handle = ActorHandle::new(actor, join);
        assert!(matches!(
            handle.wait().await,
            Err(RuntimeError::ActorPanicked { actor: Actor::Teller(TellerId(7)) })
        ));
    }

    #[tokio::test]
    async fn test_actor_error_is_lifted() {
        let actor = Actor::Customer(CustomerId(1));
        let join = tokio::spawn(async {
            Err(ActorError::Abandoned {
                customer: CustomerId(1),
                step: "waiting to be called",
            })
        });
        let err = ActorHandle::new(actor, join)
            .wait()
            .await
            .expect_err("abandoned");
        assert_eq!(err.as_label(), "actor_rendezvous_abandoned");
    }
}
