//! # Transaction mix: how customers pick deposit vs. withdrawal.

use rand::Rng;

use crate::model::TransactionKind;

/// Probability split between [`TransactionKind::Withdrawal`] and [`TransactionKind::Deposit`].
///
/// - `withdrawal_ratio = 0.0` → everyone deposits
/// - `withdrawal_ratio = 1.0` → everyone withdraws
/// - default `0.5` → fair coin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransactionMix {
    /// Probability in `[0, 1]` of choosing a withdrawal.
    pub withdrawal_ratio: f64,
}

impl TransactionMix {
    /// Creates a mix with the given withdrawal probability.
    pub const fn new(withdrawal_ratio: f64) -> Self {
        Self { withdrawal_ratio }
    }

    /// Deterministic mix that always yields `kind`.
    pub const fn all(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Deposit => Self::new(0.0),
            TransactionKind::Withdrawal => Self::new(1.0),
        }
    }

    /// True if the ratio is a probability.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.withdrawal_ratio)
    }

    /// Picks a transaction kind.
    ///
    /// Out-of-range ratios are clamped (`NaN` counts as 0).
    pub fn pick(&self) -> TransactionKind {
        let p = if self.withdrawal_ratio.is_nan() {
            0.0
        } else {
            self.withdrawal_ratio.clamp(0.0, 1.0)
        };
        if rand::rng().random_bool(p) {
            TransactionKind::Withdrawal
        } else {
            TransactionKind::Deposit
        }
    }
}

impl Default for TransactionMix {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_deterministic() {
        let w = TransactionMix::all(TransactionKind::Withdrawal);
        let d = TransactionMix::all(TransactionKind::Deposit);
        for _ in 0..50 {
            assert_eq!(w.pick(), TransactionKind::Withdrawal);
            assert_eq!(d.pick(), TransactionKind::Deposit);
        }
    }

    #[test]
    fn test_validity() {
        assert!(TransactionMix::default().is_valid());
        assert!(!TransactionMix::new(1.5).is_valid());
        assert!(!TransactionMix::new(f64::NAN).is_valid());
    }

    #[test]
    fn test_nan_ratio_picks_deposit() {
        assert_eq!(TransactionMix::new(f64::NAN).pick(), TransactionKind::Deposit);
    }
}
