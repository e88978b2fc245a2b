//! Crafting on behalf of an actor (the player or an NPC).
//!
//! The actor owns the inventory, the vitals that pay costs, and the spot
//! where overflow lands. [`Recipe::craft_for`] runs the whole flow against
//! one actor: guard, consume, produce, merge, pay.

use crossbeam_channel::Sender;
use tracing::{debug, info};

use craftwork_common::{EntityId, WorldCoord};

use crate::cost::Vitals;
use crate::crafting::{CraftReport, CraftingError, CraftingResult, Production, Recipe};
use crate::events::{CraftEvent, Notice};
use crate::inventory::{Inventory, InventoryView};
use crate::policy::CraftPolicy;
use crate::world::{Direction, DropSite, Overflow, WorldDrop};

/// Something that crafts from its own inventory.
pub trait Actor {
    /// Inventory implementation the actor carries.
    type Inventory: InventoryView;

    /// The actor's inventory.
    fn inventory(&self) -> &Self::Inventory;

    /// Mutable access to the actor's inventory.
    fn inventory_mut(&mut self) -> &mut Self::Inventory;

    /// Stats that pay crafting costs.
    fn vitals(&self) -> &Vitals;

    /// Mutable access to the stats.
    fn vitals_mut(&mut self) -> &mut Vitals;

    /// Where items land when they are dropped.
    fn drop_site(&self) -> DropSite;

    /// Shows a message to the actor.
    fn notify(&mut self, notice: Notice);
}

impl Recipe {
    /// Checks ingredients against the actor's inventory and the cost against
    /// its vitals.
    #[must_use]
    pub fn player_can_craft<A: Actor + ?Sized>(&self, actor: &A) -> bool {
        self.can_craft(actor.inventory().slots()) && self.cost().can_afford(actor.vitals())
    }

    /// Crafts from and into the actor's own inventory.
    ///
    /// Outputs are produced into a temporary container and then merged;
    /// anything that does not merge is dropped at the actor's drop site.
    /// The cost is paid whenever the capacity guard passes, whether or
    /// not ingredients were consumed. A strict policy also refuses when
    /// ingredients or the cost are not covered.
    pub fn craft_for<A: Actor + ?Sized>(
        &self,
        actor: &mut A,
        world: &mut dyn WorldDrop,
        policy: &CraftPolicy,
    ) -> CraftingResult<CraftReport> {
        if let Err(e) = self.check_destination(actor.inventory()) {
            debug!(recipe = %self.output_name(), "craft aborted: {e}");
            actor.notify(Notice::InventoryFull);
            return Err(e);
        }

        if policy.validate_ingredients {
            if let Err(e) = self.check_ingredients(actor.inventory().slots()) {
                actor.notify(Notice::MissingIngredients {
                    recipe: self.output_name().to_string(),
                });
                return Err(e);
            }
            if !self.cost().can_afford(actor.vitals()) {
                actor.notify(Notice::CannotAfford {
                    recipe: self.output_name().to_string(),
                });
                return Err(CraftingError::CannotAfford);
            }
        }

        let consumption = self.consume_with(actor.inventory_mut(), policy.duplicate_stacks);

        let site = actor.drop_site();
        let capacity = actor.inventory().capacity();
        let stack_limit = actor.inventory().stack_limit();
        let (fresh, produced) = {
            let mut overflow = Overflow::drop_to_ground(world, site);
            self.produce_fresh(capacity, stack_limit, &mut overflow)
        };

        let mut production = Production {
            placed: Vec::new(),
            dropped: produced.dropped,
            discarded: produced.discarded,
        };
        for item in fresh.into_items() {
            let record = item.clone();
            match actor.inventory_mut().add_item(item) {
                Ok(()) => production.placed.push(record),
                Err(e) => {
                    let item = e.into_rejected();
                    debug!(item = %item, "merge failed, dropping");
                    world.drop_item(item, site);
                    production.dropped.push(record);
                },
            }
        }

        self.cost().pay(actor.vitals_mut());

        Ok(self.report(consumption, production))
    }
}

/// A player: an inventory, vitals, and a place in the world.
#[derive(Debug)]
pub struct Player {
    /// Player entity ID
    entity_id: EntityId,
    /// Carried items
    inventory: Inventory,
    /// Cost-paying stats
    vitals: Vitals,
    /// Current tile
    position: WorldCoord,
    /// Facing direction
    facing: Direction,
    /// Event sink for notices
    events: Option<Sender<CraftEvent>>,
}

impl Player {
    /// Create a player carrying `inventory`.
    #[must_use]
    pub fn new(inventory: Inventory) -> Self {
        Self {
            entity_id: EntityId::new(),
            inventory,
            vitals: Vitals::default(),
            position: WorldCoord::default(),
            facing: Direction::Down,
            events: None,
        }
    }

    /// Sets the starting vitals.
    #[must_use]
    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = vitals;
        self
    }

    /// Places the player at `position`, facing `facing`.
    #[must_use]
    pub fn at(mut self, position: WorldCoord, facing: Direction) -> Self {
        self.position = position;
        self.facing = facing;
        self
    }

    /// Publishes crafting events to `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: Sender<CraftEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Get the player's entity ID.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Get the player's current position.
    #[must_use]
    pub fn position(&self) -> WorldCoord {
        self.position
    }

    /// Get the direction the player is facing.
    #[must_use]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Moves the player.
    pub fn set_position(&mut self, position: WorldCoord, facing: Direction) {
        self.position = position;
        self.facing = facing;
    }

    /// Consumes the player, returning the inventory.
    #[must_use]
    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    /// Crafts `recipe` and publishes the outcome as events.
    pub fn craft(
        &mut self,
        recipe: &Recipe,
        world: &mut dyn WorldDrop,
        policy: &CraftPolicy,
    ) -> CraftingResult<CraftReport> {
        let report = recipe.craft_for(self, world, policy)?;
        let landing = self.drop_site().landing();

        for item in &report.production.dropped {
            self.publish(CraftEvent::ItemDropped {
                entity_id: self.entity_id,
                item: item.clone(),
                position: landing,
            });
        }
        self.publish(CraftEvent::CostPaid {
            entity_id: self.entity_id,
            recipe: recipe.output_name().to_string(),
        });
        self.publish(CraftEvent::Crafted {
            entity_id: self.entity_id,
            recipe: recipe.output_name().to_string(),
            placed: report.production.placed.len(),
        });

        Ok(report)
    }

    fn publish(&self, event: CraftEvent) {
        if let Some(sender) = &self.events {
            // Non-blocking send - if full, event is dropped
            let _ = sender.try_send(event);
        }
    }
}

impl Actor for Player {
    type Inventory = Inventory;

    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn drop_site(&self) -> DropSite {
        DropSite::new(self.position, self.facing)
    }

    fn notify(&mut self, notice: Notice) {
        info!(entity = self.entity_id.raw(), "{notice}");
        self.publish(CraftEvent::Notice {
            entity_id: self.entity_id,
            notice,
        });
    }
}
