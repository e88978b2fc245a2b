//! Crafting policy knobs.

use serde::{Deserialize, Serialize};

/// How consumption treats several stacks matching one ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStacks {
    /// Every matching stack pays the full required amount.
    #[default]
    EveryMatch,
    /// Matching stacks are drawn in slot order until the amount is covered.
    UntilSatisfied,
}

/// Policy applied by [`Recipe::craft`](crate::crafting::Recipe::craft) and
/// the player path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftPolicy {
    /// Duplicate stack handling during consumption
    pub duplicate_stacks: DuplicateStacks,
    /// Refuse to craft (before any mutation) when ingredients or the cost
    /// are not covered, instead of producing after a no-op consumption
    pub validate_ingredients: bool,
}

impl CraftPolicy {
    /// Policy that validates up front and consumes exactly the required amounts.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            duplicate_stacks: DuplicateStacks::UntilSatisfied,
            validate_ingredients: true,
        }
    }
}
