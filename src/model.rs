//! # Domain identities: actors and transaction kinds.
//!
//! Small `Copy` types shared by the core, the rendezvous primitive and the
//! event model:
//! - [`TellerId`], [`CustomerId`] stable numeric identities (0-based);
//! - [`Actor`] who an event or a handle belongs to;
//! - [`TransactionKind`] what a customer came for (fixed for its lifetime).

use std::fmt;

/// Identity of a teller actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TellerId(pub usize);

/// Identity of a customer actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub usize);

impl fmt::Display for TellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant of the simulation.
///
/// `Bank` stands for the facility itself (open/close announcements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// The facility itself.
    Bank,
    /// A teller station.
    Teller(TellerId),
    /// A visiting customer.
    Customer(CustomerId),
}

impl Actor {
    /// Actor type label as printed in log lines.
    pub fn type_label(&self) -> &'static str {
        match self {
            Actor::Bank => "Bank",
            Actor::Teller(_) => "Teller",
            Actor::Customer(_) => "Customer",
        }
    }

    /// Numeric id, if the actor has one.
    pub fn id(&self) -> Option<usize> {
        match self {
            Actor::Bank => None,
            Actor::Teller(t) => Some(t.0),
            Actor::Customer(c) => Some(c.0),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{} {}", self.type_label(), id),
            None => f.write_str(self.type_label()),
        }
    }
}

impl From<TellerId> for Actor {
    fn from(id: TellerId) -> Self {
        Actor::Teller(id)
    }
}

impl From<CustomerId> for Actor {
    fn from(id: CustomerId) -> Self {
        Actor::Customer(id)
    }
}

/// Transaction a customer wants to perform.
///
/// Withdrawals additionally require the manager's approval before the safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money in; safe only.
    Deposit,
    /// Money out; manager, then safe.
    Withdrawal,
}

impl TransactionKind {
    /// True if the teller must see the manager first.
    #[inline]
    pub fn needs_manager(&self) -> bool {
        matches!(self, TransactionKind::Withdrawal)
    }

    /// Lowercase label (`"deposit"` / `"withdrawal"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_display() {
        assert_eq!(Actor::Teller(TellerId(2)).to_string(), "Teller 2");
        assert_eq!(Actor::Customer(CustomerId(17)).to_string(), "Customer 17");
        assert_eq!(Actor::Bank.to_string(), "Bank");
    }

    #[test]
    fn test_only_withdrawal_needs_manager() {
        assert!(TransactionKind::Withdrawal.needs_manager());
        assert!(!TransactionKind::Deposit.needs_manager());
    }
}
