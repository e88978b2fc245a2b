//! Crafting recipes: ingredient matching, consumption and production.

use std::sync::Arc;

use craftwork_common::RecipeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::cost::{CostPolicy, NoCost};
use crate::inventory::{Inventory, InventoryView};
use crate::item::Item;
use crate::policy::{CraftPolicy, DuplicateStacks};
use crate::world::Overflow;

/// Crafting error types.
#[derive(Debug, Error)]
pub enum CraftingError {
    /// Recipe definition is unusable
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),
    /// A requirement asks for zero items
    #[error("Requirement for {name} has zero quantity")]
    ZeroQuantity {
        /// Item name
        name: String,
    },
    /// Missing specific ingredient
    #[error("Missing ingredient: {name}, need {needed}, have {have}")]
    MissingIngredient {
        /// Item that's missing
        name: String,
        /// Amount needed
        needed: u32,
        /// Largest matching stack, or the total held when the kind is
        /// required more than once
        have: u32,
    },
    /// Destination has no room for the outputs
    #[error("Destination full: {item_count} items + {outputs} outputs >= capacity {capacity}")]
    DestinationFull {
        /// Occupied slots in the destination
        item_count: usize,
        /// Number of recipe outputs
        outputs: usize,
        /// Destination capacity
        capacity: usize,
    },
    /// The crafter cannot pay the recipe's cost
    #[error("Cannot afford crafting cost")]
    CannotAfford,
}

/// Result type for crafting operations.
pub type CraftingResult<T> = Result<T, CraftingError>;

/// An item kind paired with a quantity.
///
/// Used both as an ingredient requirement and as an output descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    item: Item,
    required_amount: u32,
}

impl ComponentRequirement {
    /// Creates a requirement. The stack of `item` is ignored.
    #[must_use]
    pub fn new(item: Item, required_amount: u32) -> Self {
        Self {
            item,
            required_amount,
        }
    }

    /// Prototype item carrying the kind.
    #[must_use]
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Quantity required or produced.
    #[must_use]
    pub const fn required_amount(&self) -> u32 {
        self.required_amount
    }
}

/// Whether a single stack covers a requirement on its own.
fn satisfies(item: &Item, requirement: &ComponentRequirement) -> bool {
    item.is_same_kind(&requirement.item) && item.stack() >= requirement.required_amount
}

/// Outcome of [`Recipe::consume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Consumption {
    /// Ingredients were not all present; nothing was touched.
    Skipped,
    /// Ingredients were taken.
    Applied {
        /// Slots emptied
        removed: usize,
        /// Stacks reduced in place
        decremented: usize,
    },
}

/// Outcome of [`Recipe::produce`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Production {
    /// Outputs added to the destination
    pub placed: Vec<Item>,
    /// Outputs that did not fit and went to the ground
    pub dropped: Vec<Item>,
    /// Outputs that did not fit and were lost
    pub discarded: Vec<Item>,
}

/// Outcome of a full craft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftReport {
    /// What consumption did
    pub consumption: Consumption,
    /// What production did
    pub production: Production,
    /// In-game minutes the craft takes
    pub minutes: u32,
}

/// A crafting recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Recipe identifier (registry-assigned)
    id: Option<RecipeId>,
    /// Required ingredients
    ingredients: Vec<ComponentRequirement>,
    /// Produced items, never empty
    outputs: Vec<ComponentRequirement>,
    /// Item shown for the recipe
    display_item: Option<Item>,
    /// Display name
    output_name: String,
    /// Display description
    output_description: String,
    /// Non-item cost
    cost: Arc<dyn CostPolicy>,
    /// Time to craft in game minutes
    craft_time_minutes: u32,
}

impl Recipe {
    /// Creates a new recipe builder.
    #[must_use]
    pub fn builder(output_name: impl Into<String>) -> RecipeBuilder {
        RecipeBuilder::new(output_name)
    }

    /// Creates a recipe from explicit ingredient and output lists.
    pub fn new(
        ingredients: Vec<ComponentRequirement>,
        outputs: Vec<ComponentRequirement>,
        output_name: impl Into<String>,
        output_description: impl Into<String>,
    ) -> CraftingResult<Self> {
        let mut builder = Self::builder(output_name).description(output_description);
        builder.ingredients = ingredients;
        builder.outputs = outputs;
        builder.build()
    }

    /// Creates a single-output recipe named and described after its output.
    pub fn single_output(
        ingredients: Vec<ComponentRequirement>,
        output: ComponentRequirement,
    ) -> CraftingResult<Self> {
        let item = output.item().clone();
        let mut builder = Self::builder(item.name())
            .description(item.description())
            .display_item(item);
        builder.ingredients = ingredients;
        builder.outputs = vec![output];
        builder.build()
    }

    /// Returns the recipe id, if registered.
    #[must_use]
    pub const fn id(&self) -> Option<RecipeId> {
        self.id
    }

    /// Returns the ingredient requirements.
    #[must_use]
    pub fn ingredients(&self) -> &[ComponentRequirement] {
        &self.ingredients
    }

    /// Returns the output descriptors.
    #[must_use]
    pub fn outputs(&self) -> &[ComponentRequirement] {
        &self.outputs
    }

    /// Returns the display item, falling back to the first output.
    #[must_use]
    pub fn display_item(&self) -> &Item {
        // `build` rejects recipes without outputs.
        self.display_item
            .as_ref()
            .unwrap_or_else(|| &self.outputs[0].item)
    }

    /// Returns the display name.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns the display description.
    #[must_use]
    pub fn output_description(&self) -> &str {
        &self.output_description
    }

    /// Returns the cost policy.
    #[must_use]
    pub fn cost(&self) -> &dyn CostPolicy {
        self.cost.as_ref()
    }

    /// Returns the craft time in game minutes.
    #[must_use]
    pub const fn craft_time_minutes(&self) -> u32 {
        self.craft_time_minutes
    }

    /// Checks if `items` holds one stack covering `requirement`.
    ///
    /// Empty slots never match.
    #[must_use]
    pub fn contains_ingredient(
        &self,
        items: &[Option<Item>],
        requirement: &ComponentRequirement,
    ) -> bool {
        items
            .iter()
            .flatten()
            .any(|item| satisfies(item, requirement))
    }

    /// Checks if every ingredient is covered by some stack in `items`.
    ///
    /// Stops at the first ingredient that is not covered.
    #[must_use]
    pub fn contains_all_ingredients(&self, items: &[Option<Item>]) -> bool {
        self.ingredients
            .iter()
            .all(|requirement| self.contains_ingredient(items, requirement))
    }

    /// Checks if the recipe can be crafted from `items`.
    #[must_use]
    pub fn can_craft(&self, items: &[Option<Item>]) -> bool {
        self.contains_all_ingredients(items)
    }

    /// Validates ingredients, describing the first one that is missing.
    pub fn check_ingredients(&self, items: &[Option<Item>]) -> CraftingResult<()> {
        for requirement in &self.ingredients {
            if self.contains_ingredient(items, requirement) {
                continue;
            }
            let have = items
                .iter()
                .flatten()
                .filter(|item| item.is_same_kind(&requirement.item))
                .map(Item::stack)
                .max()
                .unwrap_or(0);
            return Err(CraftingError::MissingIngredient {
                name: requirement.item.name().to_string(),
                needed: requirement.required_amount,
                have,
            });
        }
        self.check_totals(items)
    }

    /// Checks kinds listed as more than one ingredient against the total
    /// held across all matching stacks.
    fn check_totals(&self, items: &[Option<Item>]) -> CraftingResult<()> {
        let mut totals: Vec<(&Item, u32)> = Vec::new();
        for requirement in &self.ingredients {
            match totals
                .iter_mut()
                .find(|(item, _)| item.is_same_kind(&requirement.item))
            {
                Some((_, needed)) => *needed = needed.saturating_add(requirement.required_amount),
                None => totals.push((&requirement.item, requirement.required_amount)),
            }
        }

        for (kind, needed) in totals {
            let have = items
                .iter()
                .flatten()
                .filter(|item| item.is_same_kind(kind))
                .fold(0u32, |sum, item| sum.saturating_add(item.stack()));
            if have < needed {
                return Err(CraftingError::MissingIngredient {
                    name: kind.name().to_string(),
                    needed,
                    have,
                });
            }
        }
        Ok(())
    }

    /// Checks the coarse destination capacity guard.
    ///
    /// Compares the number of outputs, not their stack sizes, against the
    /// free slot count; an exact fit is refused.
    pub fn check_destination<D>(&self, destination: &D) -> CraftingResult<()>
    where
        D: InventoryView + ?Sized,
    {
        let item_count = destination.item_count();
        let outputs = self.outputs.len();
        let capacity = destination.capacity();
        if item_count + outputs >= capacity {
            return Err(CraftingError::DestinationFull {
                item_count,
                outputs,
                capacity,
            });
        }
        Ok(())
    }

    /// Consumes ingredients, with every matching stack paying in full.
    ///
    /// A no-op if any ingredient is missing.
    pub fn consume<I>(&self, inventory: &mut I) -> Consumption
    where
        I: InventoryView + ?Sized,
    {
        self.consume_with(inventory, DuplicateStacks::EveryMatch)
    }

    /// Consumes ingredients using the given duplicate-stack mode.
    pub fn consume_with<I>(&self, inventory: &mut I, mode: DuplicateStacks) -> Consumption
    where
        I: InventoryView + ?Sized,
    {
        if !self.contains_all_ingredients(inventory.slots()) {
            debug!(recipe = %self.output_name, "ingredients missing, nothing consumed");
            return Consumption::Skipped;
        }

        // Slots are emptied after the scan so indices stay stable.
        let mut marked: Vec<usize> = Vec::new();
        let mut decremented = 0;

        for requirement in &self.ingredients {
            let mut outstanding = requirement.required_amount;

            for (index, slot) in inventory.slots_mut().iter_mut().enumerate() {
                let Some(item) = slot.as_mut() else {
                    continue;
                };
                if marked.contains(&index) || !item.is_same_kind(&requirement.item) {
                    continue;
                }

                let stack = item.stack();
                let take = match mode {
                    DuplicateStacks::EveryMatch => requirement.required_amount,
                    DuplicateStacks::UntilSatisfied => outstanding.min(stack),
                };

                if stack <= take {
                    marked.push(index);
                } else {
                    item.set_stack(stack - take);
                    decremented += 1;
                }
                trace!(slot = index, item = item.name(), take, "consumed from stack");

                outstanding = outstanding.saturating_sub(take);
                if mode == DuplicateStacks::UntilSatisfied && outstanding == 0 {
                    break;
                }
            }
        }

        for &index in &marked {
            inventory.take_slot(index);
        }

        Consumption::Applied {
            removed: marked.len(),
            decremented,
        }
    }

    /// Produces every output into `destination`.
    ///
    /// Outputs that do not fit are routed through `overflow`; this never
    /// fails.
    pub fn produce<D>(&self, destination: &mut D, overflow: &mut Overflow<'_>) -> Production
    where
        D: InventoryView + ?Sized,
    {
        let mut production = Production::default();

        for output in &self.outputs {
            let mut item = output.item.get_one();
            item.add_to_stack(output.required_amount.saturating_sub(1));
            let record = item.clone();

            match destination.add_item(item) {
                Ok(()) => production.placed.push(record),
                Err(e) => match overflow.spill(e.into_rejected()) {
                    Ok(()) => production.dropped.push(record),
                    Err(lost) => {
                        debug!(item = %lost, "output did not fit, discarded");
                        production.discarded.push(lost);
                    },
                },
            }
        }

        production
    }

    /// Produces every output into a brand-new empty inventory.
    ///
    /// The new inventory splits stacks at `stack_limit`, like the one it
    /// will be merged into. The caller is responsible for the merge.
    pub fn produce_fresh(
        &self,
        capacity: usize,
        stack_limit: u32,
        overflow: &mut Overflow<'_>,
    ) -> (Inventory, Production) {
        let mut fresh = Inventory::with_stack_limit(capacity, stack_limit);
        let production = self.produce(&mut fresh, overflow);
        (fresh, production)
    }

    /// Consumes from `source` and produces into `destination`.
    ///
    /// The capacity guard runs first and aborts before any mutation. Past
    /// the guard, consumption and production run independently: unless
    /// the policy validates ingredients, outputs are produced even when
    /// consumption was skipped.
    pub fn craft<S, D>(
        &self,
        source: &mut S,
        destination: &mut D,
        overflow: &mut Overflow<'_>,
        policy: &CraftPolicy,
    ) -> CraftingResult<CraftReport>
    where
        S: InventoryView + ?Sized,
        D: InventoryView + ?Sized,
    {
        self.preflight(source.slots(), destination, policy)?;
        let consumption = self.consume_with(source, policy.duplicate_stacks);
        let production = self.produce(destination, overflow);
        Ok(self.report(consumption, production))
    }

    /// [`craft`](Self::craft) with one inventory as both source and destination.
    pub fn craft_in_place<I>(
        &self,
        inventory: &mut I,
        overflow: &mut Overflow<'_>,
        policy: &CraftPolicy,
    ) -> CraftingResult<CraftReport>
    where
        I: InventoryView + ?Sized,
    {
        self.preflight(inventory.slots(), inventory, policy)?;
        let consumption = self.consume_with(inventory, policy.duplicate_stacks);
        let production = self.produce(inventory, overflow);
        Ok(self.report(consumption, production))
    }

    fn preflight<D>(
        &self,
        source: &[Option<Item>],
        destination: &D,
        policy: &CraftPolicy,
    ) -> CraftingResult<()>
    where
        D: InventoryView + ?Sized,
    {
        if let Err(e) = self.check_destination(destination) {
            debug!(recipe = %self.output_name, "craft aborted: {e}");
            return Err(e);
        }
        if policy.validate_ingredients {
            self.check_ingredients(source)?;
        }
        Ok(())
    }

    pub(crate) fn report(&self, consumption: Consumption, production: Production) -> CraftReport {
        info!(
            recipe = %self.output_name,
            placed = production.placed.len(),
            dropped = production.dropped.len(),
            discarded = production.discarded.len(),
            "crafted"
        );
        CraftReport {
            consumption,
            production,
            minutes: self.craft_time_minutes,
        }
    }
}

/// Builder for creating recipes.
#[derive(Debug)]
pub struct RecipeBuilder {
    id: Option<RecipeId>,
    output_name: String,
    output_description: String,
    ingredients: Vec<ComponentRequirement>,
    outputs: Vec<ComponentRequirement>,
    display_item: Option<Item>,
    cost: Arc<dyn CostPolicy>,
    craft_time_minutes: u32,
}

impl RecipeBuilder {
    /// Creates a new recipe builder.
    fn new(output_name: impl Into<String>) -> Self {
        Self {
            id: None,
            output_name: output_name.into(),
            output_description: String::new(),
            ingredients: Vec::new(),
            outputs: Vec::new(),
            display_item: None,
            cost: Arc::new(NoCost),
            craft_time_minutes: 0,
        }
    }

    /// Sets the recipe id.
    #[must_use]
    pub const fn id(mut self, id: RecipeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.output_description = description.into();
        self
    }

    /// Adds an ingredient requirement.
    #[must_use]
    pub fn ingredient(mut self, item: Item, quantity: u32) -> Self {
        self.ingredients.push(ComponentRequirement::new(item, quantity));
        self
    }

    /// Adds an output.
    #[must_use]
    pub fn output(mut self, item: Item, quantity: u32) -> Self {
        self.outputs.push(ComponentRequirement::new(item, quantity));
        self
    }

    /// Sets the display item.
    #[must_use]
    pub fn display_item(mut self, item: Item) -> Self {
        self.display_item = Some(item);
        self
    }

    /// Sets the non-item cost.
    #[must_use]
    pub fn cost(mut self, cost: impl CostPolicy + 'static) -> Self {
        self.cost = Arc::new(cost);
        self
    }

    /// Sets the craft time in game minutes.
    #[must_use]
    pub const fn craft_time(mut self, minutes: u32) -> Self {
        self.craft_time_minutes = minutes;
        self
    }

    /// Builds the recipe.
    pub fn build(self) -> CraftingResult<Recipe> {
        if self.outputs.is_empty() {
            return Err(CraftingError::InvalidRecipe(format!(
                "{} has no outputs",
                self.output_name
            )));
        }

        if let Some(zero) = self
            .ingredients
            .iter()
            .chain(&self.outputs)
            .find(|requirement| requirement.required_amount == 0)
        {
            return Err(CraftingError::ZeroQuantity {
                name: zero.item.name().to_string(),
            });
        }

        Ok(Recipe {
            id: self.id,
            ingredients: self.ingredients,
            outputs: self.outputs,
            display_item: self.display_item,
            output_name: self.output_name,
            output_description: self.output_description,
            cost: self.cost,
            craft_time_minutes: self.craft_time_minutes,
        })
    }
}
