//! Gold wallet used to pay currency costs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Economy error types.
#[derive(Debug, Error)]
pub enum EconomyError {
    /// Insufficient funds
    #[error("Insufficient funds: need {needed}, have {have}")]
    InsufficientFunds {
        /// Amount needed
        needed: u64,
        /// Amount available
        have: u64,
    },
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// A wallet holding gold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    gold: u64,
}

impl Wallet {
    /// Creates a wallet with an initial balance.
    #[must_use]
    pub const fn new(initial_gold: u64) -> Self {
        Self { gold: initial_gold }
    }

    /// Returns the balance.
    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.gold
    }

    /// Checks whether the wallet covers `amount`.
    #[must_use]
    pub const fn can_spend(&self, amount: u64) -> bool {
        self.gold >= amount
    }

    /// Removes gold from the wallet.
    pub fn spend(&mut self, amount: u64) -> EconomyResult<()> {
        if self.gold < amount {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                have: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }
}
