//! Inventory system.
//!
//! [`InventoryView`] is the narrow contract the crafting core works through.
//! [`Inventory`] is the slot-based implementation used by players and
//! containers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::Item;

/// Default maximum stack size per slot.
pub const DEFAULT_STACK_LIMIT: u32 = 999;

/// Inventory error types.
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// Inventory full
    #[error("Inventory full: capacity {capacity}, cannot add {rejected}")]
    Full {
        /// Inventory capacity
        capacity: usize,
        /// The item that did not fit, returned untouched
        rejected: Item,
    },
}

impl InventoryError {
    /// Recovers the item that could not be placed.
    #[must_use]
    pub fn into_rejected(self) -> Item {
        match self {
            Self::Full { rejected, .. } => rejected,
        }
    }
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// A capacity-bounded collection of item slots.
///
/// Slots may be empty. Implementations own stacking rules: `add_item` may
/// merge into existing compatible stacks, but must either place the whole
/// item or leave the inventory untouched.
pub trait InventoryView {
    /// Ordered slots; `None` is an empty slot.
    fn slots(&self) -> &[Option<Item>];

    /// Mutable access to the slots for in-place stack edits.
    fn slots_mut(&mut self) -> &mut [Option<Item>];

    /// Maximum number of occupied slots.
    fn capacity(&self) -> usize;

    /// Adds an item, returning it inside the error if there is no room.
    fn add_item(&mut self, item: Item) -> InventoryResult<()>;

    /// Empties a slot, returning what it held.
    fn take_slot(&mut self, index: usize) -> Option<Item>;

    /// Largest stack a single slot holds.
    fn stack_limit(&self) -> u32 {
        DEFAULT_STACK_LIMIT
    }

    /// Number of occupied slots.
    fn item_count(&self) -> usize {
        self.slots().iter().filter(|slot| slot.is_some()).count()
    }
}

/// An inventory container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Item slots
    slots: Vec<Option<Item>>,
    /// Maximum number of slots
    capacity: usize,
    /// Maximum stack size per slot
    stack_limit: u32,
}

impl Inventory {
    /// Creates a new inventory with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_stack_limit(capacity, DEFAULT_STACK_LIMIT)
    }

    /// Creates a new inventory with a custom stack limit.
    #[must_use]
    pub fn with_stack_limit(capacity: usize, stack_limit: u32) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            stack_limit: stack_limit.max(1),
        }
    }

    /// Creates an inventory holding the given items, one slot each.
    ///
    /// Items are placed verbatim without merging, so duplicate stacks of
    /// the same kind stay separate.
    pub fn from_slots(capacity: usize, items: impl IntoIterator<Item = Item>) -> InventoryResult<Self> {
        Self::new(capacity).with_items(items)
    }

    /// Appends items verbatim, one slot each.
    pub fn with_items(mut self, items: impl IntoIterator<Item = Item>) -> InventoryResult<Self> {
        for item in items {
            if self.slots.len() >= self.capacity {
                return Err(InventoryError::Full {
                    capacity: self.capacity,
                    rejected: item,
                });
            }
            self.slots.push(Some(item));
        }
        Ok(self)
    }

    /// Returns the total quantity of items of the same kind as `item`.
    #[must_use]
    pub fn count(&self, item: &Item) -> u32 {
        self.iter()
            .filter(|held| held.is_same_kind(item))
            .map(Item::stack)
            .sum()
    }

    /// Checks whether `item` would fit without mutating anything.
    #[must_use]
    pub fn can_add(&self, item: &Item) -> bool {
        self.slots_needed(item) <= self.free_slots()
    }

    /// Returns an iterator over occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.slots.iter().flatten()
    }

    /// Consumes the inventory, returning its items in slot order.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.slots.into_iter().flatten().collect()
    }

    fn free_slots(&self) -> usize {
        let empty = self.slots.iter().filter(|slot| slot.is_none()).count();
        empty + self.capacity.saturating_sub(self.slots.len())
    }

    /// Number of new slots `item` needs after topping up existing stacks.
    fn slots_needed(&self, item: &Item) -> usize {
        let merge_room: u64 = self
            .iter()
            .filter(|held| held.is_same_kind(item))
            .map(|held| u64::from(self.stack_limit.saturating_sub(held.stack())))
            .sum();
        let overflow = u64::from(item.stack()).saturating_sub(merge_room);
        overflow.div_ceil(u64::from(self.stack_limit)) as usize
    }
}

impl InventoryView for Inventory {
    fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut [Option<Item>] {
        &mut self.slots
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn add_item(&mut self, item: Item) -> InventoryResult<()> {
        if item.stack() == 0 {
            return Ok(());
        }
        if !self.can_add(&item) {
            return Err(InventoryError::Full {
                capacity: self.capacity,
                rejected: item,
            });
        }

        let limit = self.stack_limit;
        let mut remaining = item.stack();

        for held in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if held.is_same_kind(&item) && held.stack() < limit {
                let moved = remaining.min(limit - held.stack());
                held.add_to_stack(moved);
                remaining -= moved;
            }
        }

        while remaining > 0 {
            let chunk = remaining.min(limit);
            let placed = item.get_one().with_stack(chunk);
            match self.slots.iter_mut().find(|slot| slot.is_none()) {
                Some(slot) => *slot = Some(placed),
                None => self.slots.push(Some(placed)),
            }
            remaining -= chunk;
        }

        Ok(())
    }

    fn take_slot(&mut self, index: usize) -> Option<Item> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    fn stack_limit(&self) -> u32 {
        self.stack_limit
    }
}
