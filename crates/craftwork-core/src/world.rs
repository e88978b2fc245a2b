//! Ground drops for items that do not fit their destination.

use craftwork_common::WorldCoord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::item::Item;

/// Direction an actor is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Facing up
    Up,
    /// Facing down (default)
    #[default]
    Down,
    /// Facing left
    Left,
    /// Facing right
    Right,
}

impl Direction {
    /// Unit tile offset in this direction (y grows downward).
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Where an actor stands when items spill onto the ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSite {
    /// Actor position
    pub position: WorldCoord,
    /// Actor facing
    pub facing: Direction,
}

impl DropSite {
    /// Creates a drop site.
    #[must_use]
    pub const fn new(position: WorldCoord, facing: Direction) -> Self {
        Self { position, facing }
    }

    /// The tile in front of the actor, where dropped items land.
    #[must_use]
    pub const fn landing(&self) -> WorldCoord {
        let (dx, dy) = self.facing.delta();
        self.position.offset(dx, dy)
    }
}

/// World placement collaborator. Fire-and-forget.
pub trait WorldDrop {
    /// Places `item` on the ground near `site`.
    fn drop_item(&mut self, item: Item, site: DropSite);
}

/// Intent to spawn an item on the ground (sent to the world for execution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    /// Dropped item
    pub item: Item,
    /// Tile the item lands on
    pub position: WorldCoord,
    /// Facing of the actor that dropped it
    pub facing: Direction,
}

/// Records ground drops as [`ItemDrop`] intents.
#[derive(Debug, Default, Clone)]
pub struct GroundDrops {
    drops: Vec<ItemDrop>,
}

impl GroundDrops {
    /// Creates an empty drop log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns recorded drops.
    #[must_use]
    pub fn drops(&self) -> &[ItemDrop] {
        &self.drops
    }

    /// Takes all recorded drops.
    pub fn drain(&mut self) -> Vec<ItemDrop> {
        std::mem::take(&mut self.drops)
    }
}

impl WorldDrop for GroundDrops {
    fn drop_item(&mut self, item: Item, site: DropSite) {
        let position = site.landing();
        debug!(item = %item, %position, "item dropped to ground");
        self.drops.push(ItemDrop {
            item,
            position,
            facing: site.facing,
        });
    }
}

/// What happens to a produced item that does not fit.
pub enum Overflow<'w> {
    /// Silently discard it.
    Discard,
    /// Hand it to the world at the actor's position and facing.
    DropToGround {
        /// World collaborator
        world: &'w mut dyn WorldDrop,
        /// Actor position and facing
        site: DropSite,
    },
}

impl<'w> Overflow<'w> {
    /// Drop overflow at `site` in `world`.
    pub fn drop_to_ground(world: &'w mut dyn WorldDrop, site: DropSite) -> Self {
        Self::DropToGround { world, site }
    }

    /// Routes an item that did not fit. Discarded items are handed back.
    pub(crate) fn spill(&mut self, item: Item) -> Result<(), Item> {
        match self {
            Self::Discard => Err(item),
            Self::DropToGround { world, site } => {
                world.drop_item(item, *site);
                Ok(())
            },
        }
    }
}

impl std::fmt::Debug for Overflow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discard => f.write_str("Discard"),
            Self::DropToGround { site, .. } => f
                .debug_struct("DropToGround")
                .field("site", site)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemClass;

    #[test]
    fn test_landing_tile_follows_facing() {
        let origin = WorldCoord::new(5, 5);
        assert_eq!(DropSite::new(origin, Direction::Up).landing(), WorldCoord::new(5, 4));
        assert_eq!(DropSite::new(origin, Direction::Down).landing(), WorldCoord::new(5, 6));
        assert_eq!(DropSite::new(origin, Direction::Left).landing(), WorldCoord::new(4, 5));
        assert_eq!(DropSite::new(origin, Direction::Right).landing(), WorldCoord::new(6, 5));
    }

    #[test]
    fn test_ground_drops_record_intents() {
        let mut ground = GroundDrops::new();
        let item = Item::new("Plank", "Material", ItemClass::Object).with_stack(3);
        ground.drop_item(item.clone(), DropSite::new(WorldCoord::new(0, 0), Direction::Right));

        assert_eq!(ground.drops().len(), 1);
        assert_eq!(ground.drops()[0].item, item);
        assert_eq!(ground.drops()[0].position, WorldCoord::new(1, 0));

        let drained = ground.drain();
        assert_eq!(drained.len(), 1);
        assert!(ground.drops().is_empty());
    }

    #[test]
    fn test_overflow_discard_hands_item_back() {
        let item = Item::new("Plank", "Material", ItemClass::Object);
        let mut overflow = Overflow::Discard;
        assert_eq!(overflow.spill(item.clone()), Err(item));
    }

    #[test]
    fn test_overflow_drop_to_ground() {
        let mut ground = GroundDrops::new();
        {
            let mut overflow = Overflow::drop_to_ground(&mut ground, DropSite::default());
            let item = Item::new("Plank", "Material", ItemClass::Object);
            assert!(overflow.spill(item).is_ok());
        }
        assert_eq!(ground.drops().len(), 1);
    }
}
