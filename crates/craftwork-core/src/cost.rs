//! Non-item crafting costs (health, stamina, magic, gold).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::economy::Wallet;

/// The stats a crafter pays non-item costs from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vitals {
    /// Current health
    pub health: u32,
    /// Current stamina
    pub stamina: u32,
    /// Current magic
    pub magic: u32,
    /// Gold
    pub wallet: Wallet,
}

impl Vitals {
    /// Creates a vitals block.
    #[must_use]
    pub const fn new(health: u32, stamina: u32, magic: u32, gold: u64) -> Self {
        Self {
            health,
            stamina,
            magic,
            wallet: Wallet::new(gold),
        }
    }
}

/// Affordability check and payment for a recipe's non-item cost.
pub trait CostPolicy: std::fmt::Debug + Send + Sync {
    /// Checks whether `vitals` can cover the cost.
    fn can_afford(&self, vitals: &Vitals) -> bool;

    /// Deducts the cost. Runs even if the cost is not affordable.
    fn pay(&self, vitals: &mut Vitals);
}

/// A cost policy that costs nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCost;

impl CostPolicy for NoCost {
    fn can_afford(&self, _vitals: &Vitals) -> bool {
        true
    }

    fn pay(&self, _vitals: &mut Vitals) {}
}

/// Flat stat cost.
///
/// Health is "safely" affordable only if paying it leaves at least one
/// point of health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatCost {
    /// Health deducted
    pub health: u32,
    /// Stamina deducted
    pub stamina: u32,
    /// Magic deducted
    pub magic: u32,
    /// Gold deducted
    pub gold: u64,
}

impl StatCost {
    /// Returns true if every component is zero.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.health == 0 && self.stamina == 0 && self.magic == 0 && self.gold == 0
    }
}

impl CostPolicy for StatCost {
    fn can_afford(&self, vitals: &Vitals) -> bool {
        let health_ok = self.health == 0 || vitals.health > self.health;
        health_ok
            && vitals.stamina >= self.stamina
            && vitals.magic >= self.magic
            && vitals.wallet.can_spend(self.gold)
    }

    fn pay(&self, vitals: &mut Vitals) {
        if self.is_free() {
            return;
        }
        if !self.can_afford(vitals) {
            warn!(cost = ?self, "paying a cost the crafter cannot safely afford");
        }

        vitals.health = vitals.health.saturating_sub(self.health);
        vitals.stamina = vitals.stamina.saturating_sub(self.stamina);
        vitals.magic = vitals.magic.saturating_sub(self.magic);

        let gold = self.gold.min(vitals.wallet.balance());
        if let Err(e) = vitals.wallet.spend(gold) {
            warn!("Gold cost not paid: {e}");
        }

        debug!(cost = ?self, "paid crafting cost");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cost_always_affordable() {
        let mut vitals = Vitals::default();
        assert!(NoCost.can_afford(&vitals));
        NoCost.pay(&mut vitals);
        assert_eq!(vitals, Vitals::default());
    }

    #[test]
    fn test_default_stat_cost_is_free() {
        let cost = StatCost::default();
        assert!(cost.is_free());
        assert!(cost.can_afford(&Vitals::default()));
    }

    #[test]
    fn test_stat_cost_affordability() {
        let cost = StatCost {
            stamina: 10,
            gold: 5,
            ..StatCost::default()
        };
        assert!(cost.can_afford(&Vitals::new(100, 10, 0, 5)));
        assert!(!cost.can_afford(&Vitals::new(100, 9, 0, 5)));
        assert!(!cost.can_afford(&Vitals::new(100, 10, 0, 4)));
    }

    #[test]
    fn test_health_cost_must_leave_one_point() {
        let cost = StatCost {
            health: 10,
            ..StatCost::default()
        };
        assert!(!cost.can_afford(&Vitals::new(10, 0, 0, 0)));
        assert!(cost.can_afford(&Vitals::new(11, 0, 0, 0)));
    }

    #[test]
    fn test_pay_deducts_every_component() {
        let cost = StatCost {
            health: 5,
            stamina: 4,
            magic: 3,
            gold: 2,
        };
        let mut vitals = Vitals::new(50, 40, 30, 20);
        cost.pay(&mut vitals);
        assert_eq!(vitals, Vitals::new(45, 36, 27, 18));
    }

    #[test]
    fn test_pay_unaffordable_saturates() {
        let cost = StatCost {
            stamina: 10,
            gold: 100,
            ..StatCost::default()
        };
        let mut vitals = Vitals::new(20, 3, 0, 7);
        cost.pay(&mut vitals);
        assert_eq!(vitals.stamina, 0);
        assert_eq!(vitals.wallet.balance(), 0);
        assert_eq!(vitals.health, 20);
    }
}
