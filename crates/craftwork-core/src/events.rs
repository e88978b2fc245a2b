//! Event bus for crafting notifications.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use craftwork_common::{EntityId, WorldCoord};

use crate::item::Item;

/// Player-facing messages raised by the crafting flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// The inventory has no room for a recipe's outputs
    InventoryFull,
    /// The crafter cannot pay the recipe's cost
    CannotAfford {
        /// Recipe display name
        recipe: String,
    },
    /// Ingredients were not present
    MissingIngredients {
        /// Recipe display name
        recipe: String,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InventoryFull => f.write_str("Inventory full"),
            Self::CannotAfford { recipe } => write!(f, "Cannot afford to craft {recipe}"),
            Self::MissingIngredients { recipe } => {
                write!(f, "Missing ingredients for {recipe}")
            },
        }
    }
}

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftEvent {
    /// A recipe was crafted
    Crafted {
        /// Entity that crafted
        entity_id: EntityId,
        /// Recipe display name
        recipe: String,
        /// Number of outputs that reached the inventory
        placed: usize,
    },
    /// An item was dropped to the ground
    ItemDropped {
        /// Entity that dropped it
        entity_id: EntityId,
        /// Dropped item
        item: Item,
        /// Landing tile
        position: WorldCoord,
    },
    /// A crafting cost was paid
    CostPaid {
        /// Entity that paid
        entity_id: EntityId,
        /// Recipe display name
        recipe: String,
    },
    /// A notice for the entity
    Notice {
        /// Entity notified
        entity_id: EntityId,
        /// Message
        notice: Notice,
    },
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<CraftEvent>,
    /// Receiver for collecting events
    receiver: Receiver<CraftEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: CraftEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<CraftEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<CraftEvent> {
        self.sender.clone()
    }
}
