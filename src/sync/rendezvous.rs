//! # Four-step teller/customer handshake.
//!
//! Each customer owns one rendezvous made of four one-shot signals:
//!
//! ```text
//!   Teller half (Ticket)                      Customer half (Visit)
//!   ────────────────────                      ─────────────────────
//!   call(teller_id)      ── called(id) ──►    wait_call()        -> teller id known
//!   introduction()       ◄── introduced ──    introduce()
//!   ask()                ── asked ──────►     wait_ask()
//!   complete()           ── done ───────►     wait_done()
//! ```
//!
//! The handshake is a typestate: every step consumes the current state and
//! returns the next one, so a signal can only be raised once and only in order
//! (`called → introduced → asked → done`). The signals themselves are
//! [`tokio::sync::oneshot`] channels, whose senders are consumed by `send`.
//!
//! The teller id travels inside the `called` signal, so it is written exactly
//! once, by the teller that claimed the ticket.
//!
//! ## Failure
//! If one half is dropped mid-handshake, the other half gets
//! [`ActorError::Abandoned`] at its next step instead of hanging.

use tokio::sync::oneshot;

use crate::error::ActorError;
use crate::model::{CustomerId, TellerId, TransactionKind};

/// Creates a fresh rendezvous for `customer`.
///
/// The [`Visit`] stays with the customer; the [`Ticket`] goes into the dispatch queue.
pub fn rendezvous(customer: CustomerId, transaction: TransactionKind) -> (Visit, Ticket) {
    let (called_tx, called_rx) = oneshot::channel();
    let (introduced_tx, introduced_rx) = oneshot::channel();
    let (asked_tx, asked_rx) = oneshot::channel();
    let (done_tx, done_rx) = oneshot::channel();

    let visit = Visit {
        customer,
        called: called_rx,
        introduced: introduced_tx,
        asked: asked_rx,
        done: done_rx,
    };
    let ticket = Ticket {
        customer,
        transaction,
        called: called_tx,
        introduced: introduced_rx,
        asked: asked_tx,
        done: done_tx,
    };
    (visit, ticket)
}

fn abandoned(customer: CustomerId, step: &'static str) -> ActorError {
    ActorError::Abandoned { customer, step }
}

// ---------------------------
// Teller half
// ---------------------------

/// Teller half, waiting in the queue to be claimed.
#[derive(Debug)]
pub struct Ticket {
    customer: CustomerId,
    transaction: TransactionKind,
    called: oneshot::Sender<TellerId>,
    introduced: oneshot::Receiver<()>,
    asked: oneshot::Sender<()>,
    done: oneshot::Sender<()>,
}

impl Ticket {
    /// Customer this ticket belongs to.
    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    /// Claims the ticket for `teller` and raises `called`.
    pub fn call(self, teller: TellerId) -> Result<CalledTicket, ActorError> {
        self.called
            .send(teller)
            .map_err(|_| abandoned(self.customer, "calling the customer"))?;
        Ok(CalledTicket {
            customer: self.customer,
            teller,
            transaction: self.transaction,
            introduced: self.introduced,
            asked: self.asked,
            done: self.done,
        })
    }
}

/// Customer has been called; teller waits for the introduction.
#[derive(Debug)]
pub struct CalledTicket {
    customer: CustomerId,
    teller: TellerId,
    transaction: TransactionKind,
    introduced: oneshot::Receiver<()>,
    asked: oneshot::Sender<()>,
    done: oneshot::Sender<()>,
}

impl CalledTicket {
    /// Customer this ticket belongs to.
    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    /// Waits for the customer's `introduced` signal.
    pub async fn introduction(self) -> Result<IntroducedTicket, ActorError> {
        self.introduced
            .await
            .map_err(|_| abandoned(self.customer, "waiting for the introduction"))?;
        Ok(IntroducedTicket {
            customer: self.customer,
            teller: self.teller,
            transaction: self.transaction,
            asked: self.asked,
            done: self.done,
        })
    }
}

/// Customer has introduced itself; teller may ask for the transaction.
#[derive(Debug)]
pub struct IntroducedTicket {
    customer: CustomerId,
    teller: TellerId,
    transaction: TransactionKind,
    asked: oneshot::Sender<()>,
    done: oneshot::Sender<()>,
}

impl IntroducedTicket {
    /// Raises `asked`; the transaction kind becomes readable.
    pub fn ask(self) -> Result<AskedTicket, ActorError> {
        self.asked
            .send(())
            .map_err(|_| abandoned(self.customer, "asking for the transaction"))?;
        Ok(AskedTicket {
            customer: self.customer,
            teller: self.teller,
            transaction: self.transaction,
            done: self.done,
        })
    }
}

/// Transaction is known; teller works on it and then completes.
#[derive(Debug)]
pub struct AskedTicket {
    customer: CustomerId,
    teller: TellerId,
    transaction: TransactionKind,
    done: oneshot::Sender<()>,
}

impl AskedTicket {
    /// Customer being served.
    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    /// Teller that claimed the ticket.
    pub fn teller(&self) -> TellerId {
        self.teller
    }

    /// What the customer came for.
    pub fn transaction(&self) -> TransactionKind {
        self.transaction
    }

    /// Raises `done`, ending the teller's part of the handshake.
    pub fn complete(self) -> Result<(), ActorError> {
        self.done
            .send(())
            .map_err(|_| abandoned(self.customer, "completing the transaction"))
    }
}

// ---------------------------
// Customer half
// ---------------------------

/// Customer half, waiting in line to be called.
#[derive(Debug)]
pub struct Visit {
    customer: CustomerId,
    called: oneshot::Receiver<TellerId>,
    introduced: oneshot::Sender<()>,
    asked: oneshot::Receiver<()>,
    done: oneshot::Receiver<()>,
}

impl Visit {
    /// Waits for a teller to call; learns which teller it is.
    pub async fn wait_call(self) -> Result<CalledVisit, ActorError> {
        let teller = self
            .called
            .await
            .map_err(|_| abandoned(self.customer, "waiting to be called"))?;
        Ok(CalledVisit {
            customer: self.customer,
            teller,
            introduced: self.introduced,
            asked: self.asked,
            done: self.done,
        })
    }
}

/// Called by a teller; customer introduces itself next.
#[derive(Debug)]
pub struct CalledVisit {
    customer: CustomerId,
    teller: TellerId,
    introduced: oneshot::Sender<()>,
    asked: oneshot::Receiver<()>,
    done: oneshot::Receiver<()>,
}

impl CalledVisit {
    /// Teller serving this customer.
    pub fn teller(&self) -> TellerId {
        self.teller
    }

    /// Raises `introduced`.
    pub fn introduce(self) -> Result<IntroducedVisit, ActorError> {
        self.introduced
            .send(())
            .map_err(|_| abandoned(self.customer, "introducing itself"))?;
        Ok(IntroducedVisit {
            customer: self.customer,
            teller: self.teller,
            asked: self.asked,
            done: self.done,
        })
    }
}

/// Introduced; waiting for the teller to ask.
#[derive(Debug)]
pub struct IntroducedVisit {
    customer: CustomerId,
    teller: TellerId,
    asked: oneshot::Receiver<()>,
    done: oneshot::Receiver<()>,
}

impl IntroducedVisit {
    /// Teller serving this customer.
    pub fn teller(&self) -> TellerId {
        self.teller
    }

    /// Waits for the `asked` signal.
    pub async fn wait_ask(self) -> Result<AskedVisit, ActorError> {
        self.asked
            .await
            .map_err(|_| abandoned(self.customer, "waiting to be asked"))?;
        Ok(AskedVisit {
            customer: self.customer,
            teller: self.teller,
            done: self.done,
        })
    }
}

/// Asked and answered; waiting for the teller to finish.
#[derive(Debug)]
pub struct AskedVisit {
    customer: CustomerId,
    teller: TellerId,
    done: oneshot::Receiver<()>,
}

impl AskedVisit {
    /// Teller serving this customer.
    pub fn teller(&self) -> TellerId {
        self.teller
    }

    /// Waits for `done`; returns the teller that served the customer.
    pub async fn wait_done(self) -> Result<TellerId, ActorError> {
        self.done
            .await
            .map_err(|_| abandoned(self.customer, "waiting for completion"))?;
        Ok(self.teller)
    }
}
