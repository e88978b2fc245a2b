//! Command implementations behind the `craftwork` binary.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use craftwork_core::{
    Actor, CraftReport, CraftingError, Direction, DropSite, GroundDrops, InventoryView, ItemDrop,
    Overflow, Player, Recipe,
};

use crate::config::CraftworkConfig;
use crate::recipe_loader::{RecipeComponent, RecipeDefinition, RecipeRegistry};
use crate::snapshot::InventorySnapshot;

/// Result of `check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Recipe display name
    pub recipe: String,
    /// Every ingredient is present
    pub craftable: bool,
    /// Vitals cover the cost (None without vitals)
    pub affordable: Option<bool>,
    /// First missing ingredient
    pub missing: Option<String>,
}

/// Result of `craft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftOutput {
    /// Recipe display name
    pub recipe: String,
    /// What the craft did
    pub report: CraftReport,
    /// Items that landed on the ground
    pub drops: Vec<ItemDrop>,
}

fn describe(components: &[RecipeComponent]) -> String {
    components
        .iter()
        .map(|c| format!("{} {}", c.quantity, c.item.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary(recipe: &RecipeDefinition) -> String {
    format!(
        "#{} {} [{}]: {} -> {}",
        recipe.id,
        recipe.name,
        recipe.category,
        describe(&recipe.ingredients),
        describe(&recipe.outputs)
    )
}

/// One line per recipe, ordered by ID.
#[must_use]
pub fn list(registry: &RecipeRegistry) -> Vec<String> {
    registry.sorted().into_iter().map(summary).collect()
}

/// Checks whether `recipe` can be crafted from `snapshot`.
pub fn check(
    recipe: &Recipe,
    snapshot: &InventorySnapshot,
    config: &CraftworkConfig,
) -> Result<CheckOutcome> {
    let inventory = snapshot
        .to_inventory(config.inventory_capacity, config.stack_limit)
        .context("inventory snapshot does not fit its capacity")?;
    let missing = match recipe.check_ingredients(inventory.slots()) {
        Ok(()) => None,
        Err(e @ CraftingError::MissingIngredient { .. }) => Some(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    Ok(CheckOutcome {
        recipe: recipe.output_name().to_string(),
        craftable: missing.is_none(),
        affordable: snapshot.vitals.map(|v| recipe.cost().can_afford(&v)),
        missing,
    })
}

/// Crafts `recipe` against `snapshot`, returning the updated snapshot.
///
/// Snapshots with vitals craft as a player; overflow then always drops at
/// the configured position. Without vitals the inventory is a container
/// and overflow follows `drop_to_ground`.
pub fn craft(
    recipe: &Recipe,
    snapshot: &InventorySnapshot,
    config: &CraftworkConfig,
) -> Result<(InventorySnapshot, CraftOutput)> {
    let mut inventory = snapshot
        .to_inventory(config.inventory_capacity, config.stack_limit)
        .context("inventory snapshot does not fit its capacity")?;
    let site = DropSite::new(config.drop_position, Direction::Down);
    let mut ground = GroundDrops::new();

    let (report, updated) = if let Some(vitals) = snapshot.vitals {
        let mut player = Player::new(inventory)
            .with_vitals(vitals)
            .at(site.position, site.facing);
        let report = recipe.craft_for(&mut player, &mut ground, &config.policy)?;
        let vitals = *player.vitals();
        let updated = InventorySnapshot::capture(&player.into_inventory(), Some(vitals));
        (report, updated)
    } else {
        let report = if config.drop_to_ground {
            let mut overflow = Overflow::drop_to_ground(&mut ground, site);
            recipe.craft_in_place(&mut inventory, &mut overflow, &config.policy)?
        } else {
            recipe.craft_in_place(&mut inventory, &mut Overflow::Discard, &config.policy)?
        };
        (report, InventorySnapshot::capture(&inventory, None))
    };

    info!(recipe = %recipe.output_name(), "craft finished");

    Ok((
        updated,
        CraftOutput {
            recipe: recipe.output_name().to_string(),
            report,
            drops: ground.drain(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftwork_common::WorldCoord;
    use craftwork_core::{Consumption, Item, ItemClass, StatCost, Vitals};

    fn wood(stack: u32) -> Item {
        Item::new("Wood", "Resource", ItemClass::Resource).with_stack(stack)
    }

    fn plank(stack: u32) -> Item {
        Item::new("Plank", "Material", ItemClass::Object).with_stack(stack)
    }

    fn plank_recipe(output: u32) -> Recipe {
        Recipe::builder("Plank")
            .ingredient(wood(1), 2)
            .output(plank(1), output)
            .cost(StatCost {
                gold: 1,
                ..StatCost::default()
            })
            .build()
            .expect("valid recipe")
    }

    fn snapshot(capacity: usize, vitals: Option<Vitals>, items: Vec<Item>) -> InventorySnapshot {
        InventorySnapshot {
            version: "1.0.0".to_string(),
            capacity: Some(capacity),
            vitals,
            items,
        }
    }

    #[test]
    fn test_list_orders_by_id() {
        let mut registry = RecipeRegistry::new();
        for (id, name) in [(2, "Torch"), (1, "Plank")] {
            registry
                .register(RecipeDefinition {
                    id,
                    name: name.to_string(),
                    description: String::new(),
                    category: "misc".to_string(),
                    ingredients: vec![RecipeComponent {
                        item: wood(1),
                        quantity: 2,
                    }],
                    outputs: vec![RecipeComponent {
                        item: plank(1),
                        quantity: 1,
                    }],
                    display_item: None,
                    cost: StatCost::default(),
                    craft_time_minutes: 0,
                })
                .expect("register");
        }

        let lines = list(&registry);
        assert_eq!(lines[0], "#1 Plank [misc]: 2 Wood -> 1 Plank");
        assert!(lines[1].starts_with("#2 Torch"));
    }

    #[test]
    fn test_check_reports_missing() {
        let outcome = check(
            &plank_recipe(1),
            &snapshot(4, None, vec![wood(1)]),
            &CraftworkConfig::default(),
        )
        .expect("check");

        assert!(!outcome.craftable);
        assert_eq!(outcome.affordable, None);
        assert!(outcome.missing.expect("missing").contains("Wood"));
    }

    #[test]
    fn test_check_with_vitals() {
        let outcome = check(
            &plank_recipe(1),
            &snapshot(4, Some(Vitals::new(1, 0, 0, 0)), vec![wood(2)]),
            &CraftworkConfig::default(),
        )
        .expect("check");

        assert!(outcome.craftable);
        assert_eq!(outcome.affordable, Some(false));
    }

    #[test]
    fn test_craft_container_snapshot() {
        let (updated, output) = craft(
            &plank_recipe(1),
            &snapshot(4, None, vec![wood(5)]),
            &CraftworkConfig::default(),
        )
        .expect("craft");

        assert_eq!(updated.items, vec![wood(3), plank(1)]);
        assert_eq!(updated.vitals, None);
        assert!(output.drops.is_empty());
        assert!(matches!(output.report.consumption, Consumption::Applied { .. }));
    }

    #[test]
    fn test_craft_player_snapshot_pays_and_drops() {
        let config = CraftworkConfig {
            stack_limit: 5,
            drop_position: WorldCoord::new(2, 2),
            ..CraftworkConfig::default()
        };
        let (updated, output) = craft(
            &plank_recipe(40),
            &snapshot(4, Some(Vitals::new(1, 0, 0, 3)), vec![wood(2), wood(1)]),
            &config,
        )
        .expect("craft");

        assert_eq!(updated.vitals.map(|v| v.wallet.balance()), Some(2));
        assert_eq!(output.drops.len(), 1);
        assert_eq!(output.drops[0].position, WorldCoord::new(2, 3));
        assert_eq!(output.drops[0].item.stack(), 40);
    }

    #[test]
    fn test_craft_container_discards_when_configured() {
        let config = CraftworkConfig {
            drop_to_ground: false,
            stack_limit: 5,
            ..CraftworkConfig::default()
        };
        let (_, output) = craft(
            &plank_recipe(40),
            &snapshot(4, None, vec![wood(2), wood(1)]),
            &config,
        )
        .expect("craft");

        assert!(output.drops.is_empty());
        assert_eq!(output.report.production.discarded.len(), 1);
    }

    #[test]
    fn test_craft_full_inventory_is_error() {
        let result = craft(
            &plank_recipe(1),
            &snapshot(2, None, vec![wood(2), plank(1)]),
            &CraftworkConfig::default(),
        );
        let err = result.expect_err("guard refuses");
        assert!(matches!(
            err.downcast_ref::<CraftingError>(),
            Some(CraftingError::DestinationFull { .. })
        ));
    }
}
